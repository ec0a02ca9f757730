//! Hosted demo: wires `Engine` to stdin/stdout under raw mode so the editor can be driven
//! interactively from a real terminal. Not part of the library surface — built only with
//! the `hosted` feature, the same way the library's own terminal raw-mode support is gated.

use std::io::{Read, Write};

use byteline::{
    ArgTag, ArgType, ControlFlow, Engine, ParsedLine, ParsedToken, RawMode, TokenEntry,
};

const LED_STATES: [TokenEntry; 2] = [TokenEntry::new(100, "on"), TokenEntry::new(101, "off")];

const GRAMMAR: [TokenEntry; 3] = [
    TokenEntry::new(1, "show").with_help("print the current demo state"),
    TokenEntry::new(2, "set")
        .with_help("set the counter")
        .with_arg(ArgType::Integer),
    TokenEntry::new(3, "led")
        .with_help("turn the demo LED on or off")
        .with_arg(ArgType::Token)
        .with_subtokens(&LED_STATES),
];

fn on_parsed(parsed: &ParsedLine) {
    let mut tokens = parsed.tokens.iter();
    match tokens.next() {
        Some(ParsedToken::Id(1)) => println!("demo: show"),
        Some(ParsedToken::Id(2)) => {
            if let Some(ParsedToken::Arg(ArgTag::Integer, off, len)) = tokens.next() {
                println!("demo: set -> {}", parsed.read_integer(*off, *len));
            }
        }
        Some(ParsedToken::Id(3)) => match tokens.next() {
            Some(ParsedToken::Id(100)) => println!("demo: led on"),
            Some(ParsedToken::Id(101)) => println!("demo: led off"),
            _ => {}
        },
        _ => {}
    }
}

fn main() {
    let _raw = RawMode::new(0);
    let mut stdout = std::io::stdout();
    let mut engine = Engine::new(&GRAMMAR, move |bytes: &[u8]| {
        stdout.write_all(bytes).ok();
        stdout.flush().ok();
    });
    engine.set_callback(on_parsed);
    engine.set_prompt("demo> ");

    let mut stdin = std::io::stdin();
    let mut byte = [0u8; 1];
    loop {
        match stdin.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                if engine.feed(byte[0]) == ControlFlow::Exit {
                    break;
                }
            }
            Err(_) => break,
        }
    }
    println!();
}
