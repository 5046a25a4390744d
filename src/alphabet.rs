//! The fixed symbol alphabet the automata operate over.
//!
//! The alphabet is explicit configuration rather than a module-wide constant,
//! so the automaton toolkit stays usable for symbol sets other than the
//! PROSITE one. The default alphabet is the set of ASCII uppercase letters.

use std::collections::BTreeSet;

/// The set of valid input symbols.
///
/// Wildcard and negation atoms are expanded against this set during NFA
/// construction, and the parser rejects literal symbols outside of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: BTreeSet<char>,
}

impl Alphabet {
    /// Create an alphabet from the given symbols.
    pub fn new<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        Alphabet {
            symbols: symbols.into_iter().collect(),
        }
    }

    /// Check if the given symbol is part of the alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Iterate over the symbols of the alphabet in ascending order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }

    /// Get the number of symbols in the alphabet.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the alphabet is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols of the alphabet that are not in `excluded`.
    /// This is the expansion of a negation atom.
    pub fn complement(&self, excluded: &BTreeSet<char>) -> BTreeSet<char> {
        self.symbols.difference(excluded).copied().collect()
    }
}

impl Default for Alphabet {
    /// The PROSITE alphabet: the ASCII uppercase letters.
    fn default() -> Self {
        Alphabet::new('A'..='Z')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alphabet() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.len(), 26);
        assert!(alphabet.contains('A'));
        assert!(alphabet.contains('Z'));
        assert!(!alphabet.contains('a'));
        assert!(!alphabet.contains('-'));
    }

    #[test]
    fn test_complement() {
        let alphabet = Alphabet::default();
        let excluded: BTreeSet<char> = ['A', 'B', 'C'].into_iter().collect();
        let complement = alphabet.complement(&excluded);
        assert_eq!(complement.len(), 23);
        assert!(!complement.contains(&'A'));
        assert!(complement.contains(&'D'));
    }

    #[test]
    fn test_custom_alphabet() {
        let alphabet = Alphabet::new("ACGT".chars());
        assert_eq!(alphabet.len(), 4);
        assert!(alphabet.contains('G'));
        assert!(!alphabet.contains('U'));
    }
}
