//! The interactive PROSITE matcher shell.
//!
//! Prompts for a sequence and a pattern, compiles the pattern, and prints
//! the sequence with every match highlighted, followed by the list of
//! matches with their half-open ranges.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use prosite_matcher::{Match, PrositeMatcher};

const HIGHLIGHT: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// The sequence with every matched span wrapped in highlight escapes.
fn highlight_matches(sequence: &str, matches: &[Match]) -> String {
    let chars: Vec<char> = sequence.chars().collect();
    let segment = |from: usize, to: usize| chars[from..to].iter().collect::<String>();

    let mut output = String::new();
    let mut position = 0;
    for matched in matches {
        output.push_str(&segment(position, matched.start()));
        output.push_str(HIGHLIGHT);
        output.push_str(matched.lexeme());
        output.push_str(RESET);
        position = matched.end();
    }
    output.push_str(&segment(position, chars.len()));
    output
}

fn main() -> ExitCode {
    println!("\n Hi, this is Prosite Matcher! \n");

    let (sequence, pattern) = match (prompt("Sequence: "), prompt("Regular expression: ")) {
        (Ok(sequence), Ok(pattern)) => (sequence, pattern),
        (Err(error), _) | (_, Err(error)) => {
            eprintln!("input error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    if sequence.is_empty() || pattern.is_empty() {
        println!("Sequence and regular expression can't be empty.");
        return ExitCode::FAILURE;
    }

    let matcher = match PrositeMatcher::compile(&pattern) {
        Ok(matcher) => matcher,
        Err(error) => {
            eprintln!("pattern error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let matches = matcher.find_all(&sequence);
    println!("Found patterns: {}", highlight_matches(&sequence, &matches));
    println!();
    for matched in &matches {
        println!("{}", matched);
    }
    ExitCode::SUCCESS
}
