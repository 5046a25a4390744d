//! The abstract syntax of a PROSITE pattern.
//!
//! A pattern is an ordered sequence of atoms, each with a repetition range,
//! plus two anchor flags. The parser produces this representation and the NFA
//! builder consumes it; nothing else in the crate looks at pattern syntax.

use std::collections::BTreeSet;

/// A single pattern atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// A run of literal symbols, matched in order.
    Literal(String),
    /// `x`: any one alphabet symbol.
    Any,
    /// `[S]`: any one symbol of the explicit set.
    OneOf(BTreeSet<char>),
    /// `{S}`: any one symbol of the alphabet that is not in the set.
    NoneOf(BTreeSet<char>),
}

/// An inclusive repetition range `[min, max]` attached to an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repetition {
    /// The minimum number of repeats.
    pub min: usize,
    /// The maximum number of repeats.
    pub max: usize,
}

impl Repetition {
    /// An exact repetition count `(n)`.
    pub fn exactly(n: usize) -> Self {
        Repetition { min: n, max: n }
    }

    /// A repetition range `(n,m)`.
    pub fn between(min: usize, max: usize) -> Self {
        Repetition { min, max }
    }
}

impl Default for Repetition {
    /// One repeat, the count of an atom without an explicit range.
    fn default() -> Self {
        Repetition::exactly(1)
    }
}

/// An atom together with its repetition range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternElement {
    /// The atom itself.
    pub atom: Atom,
    /// How often the atom repeats.
    pub repetition: Repetition,
}

impl PatternElement {
    /// Create a new pattern element.
    pub fn new(atom: Atom, repetition: Repetition) -> Self {
        PatternElement { atom, repetition }
    }
}

/// A parsed PROSITE pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    elements: Vec<PatternElement>,
    anchored_start: bool,
    anchored_end: bool,
}

impl Pattern {
    /// Create a new pattern from its elements and anchor flags.
    pub fn new(elements: Vec<PatternElement>, anchored_start: bool, anchored_end: bool) -> Self {
        Pattern {
            elements,
            anchored_start,
            anchored_end,
        }
    }

    /// Get the elements of the pattern.
    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }

    /// Whether a match must start at sequence position 0 (`<` prefix).
    pub fn anchored_start(&self) -> bool {
        self.anchored_start
    }

    /// Whether a match must end at the last sequence position (`>` suffix).
    pub fn anchored_end(&self) -> bool {
        self.anchored_end
    }
}
