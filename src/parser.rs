//! The parser for the PROSITE pattern syntax.
//!
//! The grammar is small enough that the parser is a single left-to-right scan
//! over the pattern characters:
//!
//! * `-` separates elements and is ignored.
//! * A run of alphabet symbols is one literal atom, collected greedily.
//! * `x` matches any one alphabet symbol.
//! * `[S]` matches any symbol of the set `S`, `{S}` any symbol not in `S`.
//! * `(n)` or `(n,m)` directly after an atom repeats it.
//! * A leading `<` anchors the match to the sequence start, a trailing `>`
//!   to the sequence end.
//!
//! Any violation is reported as a [`PatternSyntaxError`] carrying the
//! offending character offset; parsing is not resumed after an error.

use std::collections::BTreeSet;

use log::trace;

use crate::{
    Alphabet, Atom, Pattern, PatternElement, PatternSyntaxError, Repetition, Result,
    SyntaxErrorKind,
};

/// Parse a PROSITE pattern against the given alphabet.
///
/// # Errors
/// Returns a [`PatternSyntaxError`] wrapped in the crate error type if the
/// pattern violates the grammar.
pub fn parse_pattern(input: &str, alphabet: &Alphabet) -> Result<Pattern> {
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    let mut end = chars.len();

    let anchored_start = chars.first() == Some(&'<');
    if anchored_start {
        i = 1;
    }
    let anchored_end = end > i && chars[end - 1] == '>';
    if anchored_end {
        end -= 1;
    }

    let mut elements = Vec::new();
    while i < end {
        if chars[i] == '-' {
            i += 1;
            continue;
        }
        let atom = parse_atom(&chars, &mut i, end, alphabet)?;
        let repetition = if i < end && chars[i] == '(' {
            parse_repetition(&chars, &mut i, end)?
        } else {
            Repetition::default()
        };
        elements.push(PatternElement::new(atom, repetition));
    }

    trace!(
        "parsed pattern '{}' into {} elements (anchors: start={}, end={})",
        input,
        elements.len(),
        anchored_start,
        anchored_end
    );
    Ok(Pattern::new(elements, anchored_start, anchored_end))
}

/// Parse one atom starting at `chars[*i]`.
fn parse_atom(
    chars: &[char],
    i: &mut usize,
    end: usize,
    alphabet: &Alphabet,
) -> Result<Atom> {
    let c = chars[*i];
    let atom = match c {
        c if alphabet.contains(c) => {
            // A literal run collects symbols greedily, skipping separators,
            // until a non-symbol character stops it. "C-G-G" is one atom.
            let mut word = String::new();
            while *i < end && (alphabet.contains(chars[*i]) || chars[*i] == '-') {
                if chars[*i] != '-' {
                    word.push(chars[*i]);
                }
                *i += 1;
            }
            Atom::Literal(word)
        }
        'x' => {
            *i += 1;
            Atom::Any
        }
        '[' => Atom::OneOf(parse_class(chars, i, end, '[', ']', alphabet)?),
        '{' => Atom::NoneOf(parse_class(chars, i, end, '{', '}', alphabet)?),
        c if c.is_ascii_uppercase() => {
            return Err(
                PatternSyntaxError::new(*i, SyntaxErrorKind::ForeignSymbol(c)).into(),
            );
        }
        c => {
            return Err(
                PatternSyntaxError::new(*i, SyntaxErrorKind::UnexpectedCharacter(c)).into(),
            );
        }
    };
    Ok(atom)
}

/// Parse a `[S]` or `{S}` symbol class. `chars[*i]` is the opening character.
fn parse_class(
    chars: &[char],
    i: &mut usize,
    end: usize,
    open: char,
    close: char,
    alphabet: &Alphabet,
) -> Result<BTreeSet<char>> {
    let open_offset = *i;
    *i += 1;

    let mut symbols = BTreeSet::new();
    while *i < end && chars[*i] != close {
        let c = chars[*i];
        if alphabet.contains(c) {
            symbols.insert(c);
        } else if c.is_ascii_uppercase() {
            return Err(PatternSyntaxError::new(*i, SyntaxErrorKind::ForeignSymbol(c)).into());
        } else {
            return Err(
                PatternSyntaxError::new(*i, SyntaxErrorKind::UnexpectedCharacter(c)).into(),
            );
        }
        *i += 1;
    }
    if *i >= end {
        return Err(
            PatternSyntaxError::new(open_offset, SyntaxErrorKind::UnterminatedClass(open)).into(),
        );
    }
    *i += 1;

    // An empty alternative could match nothing at all; reject it. An empty
    // negation is allowed and simply expands to the whole alphabet.
    if open == '[' && symbols.is_empty() {
        return Err(PatternSyntaxError::new(open_offset, SyntaxErrorKind::EmptyClass).into());
    }
    Ok(symbols)
}

/// Parse a `(n)` or `(n,m)` repetition range. `chars[*i]` is the `(`.
fn parse_repetition(chars: &[char], i: &mut usize, end: usize) -> Result<Repetition> {
    let open_offset = *i;
    *i += 1;

    let mut bounds: Vec<usize> = Vec::new();
    let mut digits = String::new();
    while *i < end && chars[*i] != ')' {
        let c = chars[*i];
        if c.is_ascii_digit() {
            digits.push(c);
        } else if c == ',' {
            bounds.push(parse_bound(&digits, open_offset)?);
            digits.clear();
        } else {
            return Err(
                PatternSyntaxError::new(*i, SyntaxErrorKind::MalformedRepetition).into(),
            );
        }
        *i += 1;
    }
    if *i >= end {
        return Err(PatternSyntaxError::new(
            open_offset,
            SyntaxErrorKind::UnterminatedRepetition,
        )
        .into());
    }
    bounds.push(parse_bound(&digits, open_offset)?);
    *i += 1;

    match bounds.as_slice() {
        [n] => Ok(Repetition::exactly(*n)),
        [n, m] if n <= m => Ok(Repetition::between(*n, *m)),
        _ => Err(PatternSyntaxError::new(open_offset, SyntaxErrorKind::MalformedRepetition).into()),
    }
}

/// Parse one repetition bound from its collected digits.
fn parse_bound(digits: &str, offset: usize) -> Result<usize> {
    digits
        .parse::<usize>()
        .map_err(|_| PatternSyntaxError::new(offset, SyntaxErrorKind::MalformedRepetition).into())
}
