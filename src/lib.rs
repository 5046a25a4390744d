#![forbid(missing_docs)]
//! The `prosite-matcher` crate compiles PROSITE-style sequence motifs into
//! finite automata and locates all non-overlapping occurrences of a motif in
//! an input sequence.
//!
//! A pattern is parsed into atoms, turned into an NFA with epsilon
//! transitions, determinized by subset construction, minimized by partition
//! refinement, and finally executed by a maximal-munch scanner:
//!
//! ```
//! use prosite_matcher::PrositeMatcher;
//!
//! let matcher = PrositeMatcher::compile("C-x(2,3)-G").unwrap();
//! assert!(matcher.matches("CVVG"));
//! let matches = matcher.find_all("ACVVGT");
//! assert_eq!(matches[0].lexeme(), "CVVG");
//! ```

/// The symbol alphabet the automata operate over.
mod alphabet;
pub use alphabet::Alphabet;

/// The abstract syntax of a pattern.
mod ast;
pub use ast::{Atom, Pattern, PatternElement, Repetition};

/// Module with error definitions.
mod errors;
pub use errors::{PatternSyntaxError, PrositeError, PrositeErrorKind, Result, SyntaxErrorKind};

/// The parser for the PROSITE pattern syntax.
mod parser;
pub use parser::parse_pattern;

/// The NFA implementation and the fragment builders.
mod nfa;
pub use nfa::{Nfa, NfaState, NfaTransition, StateId};

/// The DFA implementation: subset construction and minimization.
mod dfa;
pub use dfa::Dfa;

/// The compiled matcher and the scanning loop.
mod matcher;
pub use matcher::{FindMatches, Match, PrositeMatcher};

/// A half-open interval of sequence positions.
mod span;
pub use span::Span;

/// Module with conversion to graphviz dot format.
mod dot;
pub use dot::{render_dfa_to, render_nfa_to};
