// Simple command-line application to play chess

use chessrules::{board::PrettyStyle, notation::NumberPolicy, Coord, Game};
use std::io::{self, BufRead, Write};

fn parse_move(s: &str) -> Result<(Coord, Coord), String> {
    let mut parts = s.split_ascii_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(src), Some(dst), None) => {
            let src = src.parse().map_err(|e| format!("bad source square: {}", e))?;
            let dst = dst.parse().map_err(|e| format!("bad destination square: {}", e))?;
            Ok((src, dst))
        }
        _ => Err("expected two squares, like \"e2 e4\"".to_string()),
    }
}

fn main() -> io::Result<()> {
    let mut stdin = io::stdin().lock();

    let mut game = Game::new();

    loop {
        if let Some(outcome) = game.outcome() {
            println!("{}", game.board().pretty(PrettyStyle::Utf8));
            println!("Game finished: {}", outcome);
            println!("Notation:");
            println!("{}", game.notation_list(NumberPolicy::FromStart));
            break;
        }

        println!("{}", game.board().pretty(PrettyStyle::Utf8));
        println!("{}", game.status());
        print!("Move {} (e.g. \"e2 e4\"): ", game.move_number());
        io::stdout().flush()?;
        let mut s = String::new();
        if stdin.read_line(&mut s)? == 0 {
            break;
        }

        let (src, dst) = match parse_move(s.trim()) {
            Ok(mv) => mv,
            Err(e) => {
                println!("Bad move: {}", e);
                println!();
                continue;
            }
        };

        match game.make_move(src, dst) {
            Ok(rec) => println!("Played {}", rec),
            Err(e) => println!("Bad move: {}", e),
        }
        println!();
    }

    Ok(())
}
