//! The compiled matcher and the scanning loop.
//!
//! [`PrositeMatcher::compile`] runs the whole pipeline — parse, NFA
//! construction, subset construction, minimization — and retains only the
//! minimal DFA together with the anchor flags. The matcher is immutable
//! afterwards; independent scans carry all mutable state in scan-local
//! variables, so one matcher may serve concurrent scans without locking.

use log::{debug, trace};

use crate::{parse_pattern, Alphabet, Dfa, Nfa, PrositeError, PrositeErrorKind, Result, Span};

/// A pattern compiled into a minimal DFA, ready for matching.
#[derive(Debug, Clone)]
pub struct PrositeMatcher {
    pattern: String,
    dfa: Dfa,
    anchored_start: bool,
    anchored_end: bool,
}

impl PrositeMatcher {
    /// Compile a pattern against the default PROSITE alphabet.
    ///
    /// # Errors
    /// Fails with a syntax error for a malformed pattern and with
    /// `EmptyInput` for an empty one; no partially compiled matcher is ever
    /// returned.
    pub fn compile(pattern: &str) -> Result<Self> {
        Self::compile_with_alphabet(pattern, &Alphabet::default())
    }

    /// Compile a pattern against an explicit alphabet.
    pub fn compile_with_alphabet(pattern: &str, alphabet: &Alphabet) -> Result<Self> {
        if pattern.is_empty() {
            return Err(PrositeError::new(PrositeErrorKind::EmptyInput("pattern")));
        }
        let parsed = parse_pattern(pattern, alphabet)?;
        let nfa = Nfa::from_pattern(&parsed, alphabet);
        let dfa = Dfa::from_nfa(&nfa).minimize();
        debug!(
            "compiled '{}' into a minimal DFA with {} states",
            pattern,
            dfa.num_states()
        );
        Ok(PrositeMatcher {
            pattern: pattern.to_string(),
            dfa,
            anchored_start: parsed.anchored_start(),
            anchored_end: parsed.anchored_end(),
        })
    }

    /// Get the pattern the matcher was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Get the minimal DFA backing the matcher.
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// Check whether the whole word matches the pattern.
    ///
    /// The word is fed through the DFA in one pass without the restart loop;
    /// anchors are irrelevant because the entire word must be consumed.
    pub fn matches(&self, word: &str) -> bool {
        self.dfa.run_on_word(word)
    }

    /// Returns an iterator over all non-overlapping matches in the sequence,
    /// in order of strictly increasing start position.
    pub fn find_iter<'r>(&'r self, sequence: &str) -> FindMatches<'r> {
        FindMatches::new(self, sequence)
    }

    /// Collect all non-overlapping matches in the sequence.
    pub fn find_all(&self, sequence: &str) -> Vec<Match> {
        self.find_iter(sequence).collect()
    }
}

/// One match found in a scanned sequence.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Match {
    span: Span,
    lexeme: String,
}

impl Match {
    /// Create a new match.
    pub fn new(span: Span, lexeme: String) -> Self {
        Match { span, lexeme }
    }

    /// Get the start position of the match.
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Get the end position of the match, exclusive.
    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Get the span of the match.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the matched substring.
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

impl std::fmt::Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.lexeme, self.span)
    }
}

/// An iterator over all non-overlapping matches in a sequence.
///
/// From each scan start the DFA consumes symbols as long as transitions
/// exist, remembering the last accepting position. The longest accepted
/// prefix wins (maximal munch); scanning restarts with a fresh automaton
/// state right behind an emitted match, or one position further on failure.
///
/// This iterator can be created with the [`PrositeMatcher::find_iter`]
/// method.
#[derive(Debug)]
pub struct FindMatches<'r> {
    matcher: &'r PrositeMatcher,
    chars: Vec<char>,
    scan_start: usize,
    finished: bool,
}

impl<'r> FindMatches<'r> {
    fn new(matcher: &'r PrositeMatcher, sequence: &str) -> Self {
        FindMatches {
            matcher,
            chars: sequence.chars().collect(),
            scan_start: 0,
            finished: false,
        }
    }

    /// Feed characters from `from` until the DFA rejects, returning the last
    /// position at which it accepted, if any.
    ///
    /// Acceptance is only recorded after at least one consumed symbol, so an
    /// automaton with an accepting start state never produces empty matches.
    fn longest_match_from(&self, from: usize) -> Option<usize> {
        let dfa = &self.matcher.dfa;
        let mut state = dfa.start_state();
        let mut last_accept = None;
        for (position, &symbol) in self.chars.iter().enumerate().skip(from) {
            match dfa.next(state, symbol) {
                Some(next) => {
                    state = next;
                    if dfa.is_accepting(state) {
                        last_accept = Some(position);
                    }
                }
                None => break,
            }
        }
        last_accept
    }

    fn emit(&self, start: usize, end: usize) -> Match {
        let lexeme: String = self.chars[start..end].iter().collect();
        Match::new(Span::new(start, end), lexeme)
    }
}

impl Iterator for FindMatches<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.finished {
            return None;
        }
        while self.scan_start < self.chars.len() {
            if self.matcher.anchored_start && self.scan_start > 0 {
                break;
            }
            match self.longest_match_from(self.scan_start) {
                Some(last_accept) => {
                    let end = last_accept + 1;
                    if self.matcher.anchored_end && end != self.chars.len() {
                        // The candidate does not reach the sequence end.
                        // Discard it and retry one position further; a later,
                        // shorter match may still reach the end.
                        trace!(
                            "discarding end-anchored candidate at [{}, {})",
                            self.scan_start,
                            end
                        );
                        if self.matcher.anchored_start {
                            break;
                        }
                        self.scan_start += 1;
                        continue;
                    }
                    let matched = self.emit(self.scan_start, end);
                    self.scan_start = end;
                    if self.matcher.anchored_start {
                        // Only the match beginning at position 0 is reported.
                        self.finished = true;
                    }
                    return Some(matched);
                }
                None => {
                    if self.matcher.anchored_start {
                        break;
                    }
                    self.scan_start += 1;
                }
            }
        }
        self.finished = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(matches: &[Match]) -> Vec<(String, usize, usize)> {
        matches
            .iter()
            .map(|m| (m.lexeme().to_string(), m.start(), m.end()))
            .collect()
    }

    #[test]
    fn test_unanchored_find_all() {
        let matcher = PrositeMatcher::compile("C-G-G").unwrap();
        let matches = matcher.find_all("CGGAAAACGGX");
        assert_eq!(
            spans(&matches),
            vec![("CGG".to_string(), 0, 3), ("CGG".to_string(), 7, 10)]
        );
    }

    #[test]
    fn test_adjacent_matches_do_not_overlap() {
        let matcher = PrositeMatcher::compile("C-G-G").unwrap();
        let matches = matcher.find_all("CGGCGGCGG");
        assert_eq!(
            spans(&matches),
            vec![
                ("CGG".to_string(), 0, 3),
                ("CGG".to_string(), 3, 6),
                ("CGG".to_string(), 6, 9)
            ]
        );
        for pair in matches.windows(2) {
            assert!(pair[0].end() <= pair[1].start());
            assert!(pair[0].start() < pair[1].start());
        }
    }

    #[test]
    fn test_start_anchor() {
        let matcher = PrositeMatcher::compile("<C-G-G").unwrap();
        assert_eq!(
            spans(&matcher.find_all("CGGCGG")),
            vec![("CGG".to_string(), 0, 3)]
        );
        assert!(matcher.find_all("XCGGCGG").is_empty());
    }

    #[test]
    fn test_end_anchor_keeps_scanning_for_a_final_match() {
        let matcher = PrositeMatcher::compile("C-G-G>").unwrap();
        assert_eq!(
            spans(&matcher.find_all("AACGGAACGG")),
            vec![("CGG".to_string(), 7, 10)]
        );
    }

    #[test]
    fn test_both_anchors() {
        let matcher = PrositeMatcher::compile("<C-G-G>").unwrap();
        assert_eq!(
            spans(&matcher.find_all("CGG")),
            vec![("CGG".to_string(), 0, 3)]
        );
        // A match starts at 0 but does not reach the end; nothing is
        // reported and scanning does not continue past the anchored attempt.
        assert!(matcher.find_all("CGGA").is_empty());
        assert!(matcher.find_all("ACGG").is_empty());
    }

    #[test]
    fn test_maximal_munch_prefers_longest() {
        let matcher = PrositeMatcher::compile("C-x(2,3)-G").unwrap();
        // "CVVGG": both "CVVG" and "CVVGG" are accepted from position 0; the
        // longer one wins.
        assert_eq!(
            spans(&matcher.find_all("CVVGG")),
            vec![("CVVGG".to_string(), 0, 5)]
        );
    }

    #[test]
    fn test_wildcard_range_full_match() {
        let matcher = PrositeMatcher::compile("C-x(2,3)-G").unwrap();
        assert!(matcher.matches("CVVG"));
        assert!(matcher.matches("CVVVG"));
        assert!(!matcher.matches("CVG"));
        assert!(!matcher.matches("CVVVVG"));
    }

    #[test]
    fn test_alternative_and_negation_are_complementary() {
        let alphabet = Alphabet::default();
        let one_of = PrositeMatcher::compile("[ABC]").unwrap();
        let none_of = PrositeMatcher::compile("{ABC}").unwrap();
        for symbol in alphabet.symbols() {
            let word = symbol.to_string();
            assert_ne!(
                one_of.matches(&word),
                none_of.matches(&word),
                "exactly one of [ABC]/{{ABC}} must match '{}'",
                word
            );
        }
    }

    #[test]
    fn test_empty_pattern_is_rejected() {
        let result = PrositeMatcher::compile("");
        assert!(matches!(
            *result.unwrap_err().source,
            PrositeErrorKind::EmptyInput("pattern")
        ));
    }

    #[test]
    fn test_malformed_pattern_produces_no_matcher() {
        assert!(PrositeMatcher::compile("[ABC").is_err());
    }

    #[test]
    fn test_empty_sequence_yields_no_matches() {
        let matcher = PrositeMatcher::compile("C-G-G").unwrap();
        assert!(matcher.find_all("").is_empty());
        assert!(!matcher.matches(""));
    }

    #[test]
    fn test_unmatched_symbols_are_ordinary_control_flow() {
        // Lowercase letters are not in the alphabet; scanning simply skips
        // them without any error.
        let matcher = PrositeMatcher::compile("C-G-G").unwrap();
        let matches = matcher.find_all("CGGaasdCGGdsadCGG");
        assert_eq!(
            spans(&matches),
            vec![
                ("CGG".to_string(), 0, 3),
                ("CGG".to_string(), 7, 10),
                ("CGG".to_string(), 14, 17)
            ]
        );
    }

    #[test]
    fn test_full_prosite_pattern_scan() {
        let matcher = PrositeMatcher::compile(
            "C-G-G-x(4,7)-{ABC}-G-x(3)-C-x(5)-C-x(3,5)-[NHG]-x-[FYWM]-x(2)-Q-C",
        )
        .unwrap();
        let sequence = "CGGVVVVNGVVVCVVVVVCVVVGVMVVQC";
        assert!(matcher.matches(sequence));
        let matches = matcher.find_all(sequence);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].span(), Span::new(0, sequence.len()));
    }

    #[test]
    fn test_scan_agrees_with_regex_crate() {
        // "C-G-G" and the regex "CGG" describe the same language, and both
        // scanners use non-overlapping left-to-right matching.
        let matcher = PrositeMatcher::compile("C-G-G").unwrap();
        let reference = regex::Regex::new("CGG").unwrap();
        let haystack = "CGGAAAACGGXCGGCGG";
        let ours: Vec<(usize, usize)> = matcher
            .find_all(haystack)
            .iter()
            .map(|m| (m.start(), m.end()))
            .collect();
        let theirs: Vec<(usize, usize)> = reference
            .find_iter(haystack)
            .map(|m| (m.start(), m.end()))
            .collect();
        assert_eq!(ours, theirs);
    }
}
