//! The DFA implementation.
//!
//! The DFA is produced from the NFA by the subset construction algorithm and
//! collapsed to the unique minimal automaton by Moore partition refinement.
//! The transition function is partial: the absence of an entry means the
//! symbol is rejected in that state, standing in for an unrepresented dead
//! sink. Only subsets reachable from the start state are ever materialized,
//! so minimality is with respect to the reachable automaton.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use log::trace;

use crate::{Nfa, StateId};

// The type definitions for the partition refinement algorithm.
pub(crate) type StateGroup = BTreeSet<StateId>;
pub(crate) type Partition = Vec<StateGroup>;

/// A deterministic finite automaton over the symbol alphabet.
#[derive(Debug, Clone, Default)]
pub struct Dfa {
    start_state: StateId,
    num_states: usize,
    // Partial transition function; a missing entry is a reject.
    transitions: BTreeMap<StateId, BTreeMap<char, StateId>>,
    accepting: BTreeSet<StateId>,
    // The alphabet carried over from the NFA.
    alphabet: BTreeSet<char>,
}

impl Dfa {
    /// Determinize an NFA with the standard worklist subset construction.
    ///
    /// Every DFA state corresponds to a set of NFA states; two identical
    /// subsets always map to the same DFA state id. A DFA state is accepting
    /// iff its subset intersects the NFA accepting set.
    pub fn from_nfa(nfa: &Nfa) -> Self {
        let mut dfa = Dfa {
            start_state: 0,
            num_states: 0,
            transitions: BTreeMap::new(),
            accepting: BTreeSet::new(),
            alphabet: nfa.alphabet().clone(),
        };
        let symbols: Vec<char> = dfa.alphabet.iter().copied().collect();

        // Subsets are the identity of DFA states; ids are handed out by a
        // monotonically increasing counter the first time a subset is seen.
        let mut subset_ids: BTreeMap<BTreeSet<StateId>, StateId> = BTreeMap::new();
        let start_subset = nfa.epsilon_closure(Nfa::START);
        subset_ids.insert(start_subset.clone(), dfa.alloc_state());
        let mut work_list = vec![start_subset];

        while let Some(subset) = work_list.pop() {
            let from = subset_ids[&subset];
            for &symbol in &symbols {
                let target_subset = nfa.epsilon_closure_set(&nfa.move_set(&subset, symbol));
                if target_subset.is_empty() {
                    continue;
                }
                let target = match subset_ids.get(&target_subset) {
                    Some(&id) => id,
                    None => {
                        let id = dfa.alloc_state();
                        subset_ids.insert(target_subset.clone(), id);
                        work_list.push(target_subset);
                        id
                    }
                };
                dfa.transitions.entry(from).or_default().insert(symbol, target);
            }
        }

        for (subset, &id) in &subset_ids {
            if nfa.is_accepting_set(subset) {
                dfa.accepting.insert(id);
            }
        }

        trace!(
            "subset construction: {} NFA states -> {} DFA states, {} accepting",
            nfa.num_states(),
            dfa.num_states,
            dfa.accepting.len()
        );
        dfa
    }

    fn alloc_state(&mut self) -> StateId {
        let id = self.num_states;
        self.num_states += 1;
        id
    }

    /// Get the start state.
    pub fn start_state(&self) -> StateId {
        self.start_state
    }

    /// Get the number of states.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Get the accepting states.
    pub fn accepting(&self) -> &BTreeSet<StateId> {
        &self.accepting
    }

    /// Get the alphabet the automaton was built over.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// Get the transition table.
    pub fn transitions(&self) -> &BTreeMap<StateId, BTreeMap<char, StateId>> {
        &self.transitions
    }

    /// Take one transition, or `None` if the state rejects the symbol.
    pub fn next(&self, state: StateId, symbol: char) -> Option<StateId> {
        self.transitions.get(&state)?.get(&symbol).copied()
    }

    /// Check if the state is accepting.
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(&state)
    }

    /// Feed a whole word through the automaton and report whether the final
    /// state is accepting.
    pub fn run_on_word(&self, word: &str) -> bool {
        let mut current = self.start_state;
        for symbol in word.chars() {
            match self.next(current, symbol) {
                Some(state) => current = state,
                None => return false,
            }
        }
        self.is_accepting(current)
    }

    /// Minimize the DFA with Moore partition refinement.
    ///
    /// The initial partition separates accepting from non-accepting states;
    /// blocks are then split at the first symbol on which their members
    /// disagree until a full pass changes nothing. Each refinement round is
    /// quadratic in the state count; no Hopcroft-style incremental structure
    /// is used.
    pub fn minimize(&self) -> Dfa {
        let mut partition_old = self.initial_partition();
        let mut round = 0;
        loop {
            let partition_new = self.refine_partition(&partition_old);
            round += 1;
            trace!(
                "minimization round {}: {} blocks",
                round,
                partition_new.len()
            );
            if partition_new == partition_old {
                break;
            }
            partition_old = partition_new;
        }
        self.from_partition(&partition_old)
    }

    /// The two-block partition {accepting, non-accepting}, dropping either
    /// block if it is empty.
    fn initial_partition(&self) -> Partition {
        let (accepting, rest): (StateGroup, StateGroup) =
            (0..self.num_states).partition(|state| self.accepting.contains(state));
        let mut partition = Partition::new();
        if !accepting.is_empty() {
            partition.push(accepting);
        }
        if !rest.is_empty() {
            partition.push(rest);
        }
        partition
    }

    /// One refinement pass: split every group that is splittable.
    fn refine_partition(&self, partition: &Partition) -> Partition {
        let mut refined = Partition::new();
        for group in partition {
            refined.extend(self.split_group(group, partition));
        }
        refined
    }

    /// Split a group into two at the first symbol/state divergence found, or
    /// return it unchanged if all members behave alike.
    ///
    /// A missing transition is its own distinguishable behavior: two states
    /// agree on a symbol only if both map into the same block or both reject.
    fn split_group(&self, group: &StateGroup, partition: &Partition) -> Partition {
        if group.len() < 2 {
            return vec![group.clone()];
        }
        let mut members = group.iter().copied();
        let head = members.next().expect("group is never empty");
        let tail: Vec<StateId> = members.collect();

        for &symbol in &self.alphabet {
            let head_block = self.target_block(head, symbol, partition);
            let mut first: StateGroup = [head].into_iter().collect();
            for &state in &tail {
                if self.target_block(state, symbol, partition) != head_block {
                    let second: StateGroup = group.difference(&first).copied().collect();
                    return vec![first, second];
                }
                first.insert(state);
            }
        }
        vec![group.clone()]
    }

    /// The partition block the state transitions into on the symbol, or
    /// `None` for a missing transition.
    fn target_block(
        &self,
        state: StateId,
        symbol: char,
        partition: &Partition,
    ) -> Option<usize> {
        self.next(state, symbol)
            .map(|target| Self::block_of(target, partition))
    }

    fn block_of(state: StateId, partition: &Partition) -> usize {
        partition
            .iter()
            .position(|group| group.contains(&state))
            .expect("every state belongs to a partition block")
    }

    /// Build the minimal DFA from a stable partition: one state per block,
    /// transitions rebuilt from one representative state per block.
    fn from_partition(&self, partition: &Partition) -> Dfa {
        let mut dfa = Dfa {
            start_state: 0,
            num_states: partition.len(),
            transitions: BTreeMap::new(),
            accepting: BTreeSet::new(),
            alphabet: self.alphabet.clone(),
        };
        for (id, group) in partition.iter().enumerate() {
            if group.contains(&self.start_state) {
                dfa.start_state = id;
            }
            if group.iter().any(|state| self.accepting.contains(state)) {
                dfa.accepting.insert(id);
            }
            let representative = *group.first().expect("partition blocks are never empty");
            if let Some(transitions) = self.transitions.get(&representative) {
                for (&symbol, &target) in transitions {
                    dfa.transitions
                        .entry(id)
                        .or_default()
                        .insert(symbol, Self::block_of(target, partition));
                }
            }
        }
        trace!(
            "minimized DFA: {} states -> {} states",
            self.num_states,
            dfa.num_states
        );
        dfa
    }
}

impl From<&Nfa> for Dfa {
    fn from(nfa: &Nfa) -> Self {
        Dfa::from_nfa(nfa)
    }
}

impl std::fmt::Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "DFA with {} states, start {}, accepting {{{}}}",
            self.num_states,
            self.start_state,
            self.accepting.iter().join(", ")
        )?;
        for (source, targets) in &self.transitions {
            writeln!(
                f,
                "{} -> {}",
                source,
                targets
                    .iter()
                    .map(|(symbol, target)| format!("{}:{}", symbol, target))
                    .join(" ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_pattern, Alphabet};

    // Expected automaton sizes for a handful of patterns.
    struct TestData {
        pattern: &'static str,
        states: usize,
        accepting_states: usize,
        min_states: usize,
    }

    const TEST_DATA: &[TestData] = &[
        TestData {
            pattern: "C-G-G",
            states: 4,
            accepting_states: 1,
            min_states: 4,
        },
        TestData {
            pattern: "A(1,2)-B",
            states: 4,
            accepting_states: 1,
            min_states: 4,
        },
        TestData {
            pattern: "x(2,3)",
            states: 4,
            accepting_states: 2,
            min_states: 4,
        },
        TestData {
            pattern: "[AB]-C",
            states: 3,
            accepting_states: 1,
            min_states: 3,
        },
    ];

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn build_dfa(pattern: &str) -> Dfa {
        let alphabet = Alphabet::default();
        let parsed = parse_pattern(pattern, &alphabet).unwrap();
        Dfa::from_nfa(&Nfa::from_pattern(&parsed, &alphabet))
    }

    #[test]
    fn test_subset_construction_sizes() {
        init();
        for data in TEST_DATA {
            let dfa = build_dfa(data.pattern);
            assert_eq!(dfa.num_states(), data.states, "states of {}", data.pattern);
            assert_eq!(
                dfa.accepting().len(),
                data.accepting_states,
                "accepting states of {}",
                data.pattern
            );

            let minimized = dfa.minimize();
            assert_eq!(
                minimized.num_states(),
                data.min_states,
                "min states of {}",
                data.pattern
            );
        }
    }

    #[test]
    fn test_run_on_word() {
        let dfa = build_dfa("C-G-G");
        assert!(dfa.run_on_word("CGG"));
        assert!(!dfa.run_on_word("CG"));
        assert!(!dfa.run_on_word("CGGC"));
        assert!(!dfa.run_on_word(""));
    }

    #[test]
    fn test_minimized_accepts_same_language() {
        init();
        let pattern = "C-G-G-x(4,7)-{ABC}-G-x(3)-C-x(5)-C-x(3,5)-[NHG]-x-[FYWM]-x(2)-Q-C";
        let dfa = build_dfa(pattern);
        let minimized = dfa.minimize();

        let words = [
            "CGGVVVVNGVVVCVVVVVCVVVGVMVVQC",
            "CGGVVVVNGVVVCVVVVVCVVVVGVMVVQC",
            "CGGAVVVNGVVVCVVVVVCVVVGVMVVQC",
            "CGGVVVANGVVVCVVVVVCVVVGVMVVQC",
            "CGG",
            "",
        ];
        for word in words {
            assert_eq!(
                dfa.run_on_word(word),
                minimized.run_on_word(word),
                "language disagreement on '{}'",
                word
            );
        }
        // The reference word from the original PROSITE example is accepted.
        assert!(minimized.run_on_word("CGGVVVVNGVVVCVVVVVCVVVGVMVVQC"));
    }

    #[test]
    fn test_minimize_merges_equivalent_states() {
        // A machine accepting 'A' followed by any run of 'B'/'C'. All three
        // accepting states are equivalent and collapse into one block.
        let mut transitions: BTreeMap<StateId, BTreeMap<char, StateId>> = BTreeMap::new();
        transitions.entry(0).or_default().insert('A', 1);
        transitions.entry(1).or_default().insert('B', 2);
        transitions.entry(1).or_default().insert('C', 3);
        transitions.entry(2).or_default().insert('B', 2);
        transitions.entry(2).or_default().insert('C', 3);
        transitions.entry(3).or_default().insert('B', 2);
        transitions.entry(3).or_default().insert('C', 3);
        let dfa = Dfa {
            start_state: 0,
            num_states: 4,
            transitions,
            accepting: [1, 2, 3].into_iter().collect(),
            alphabet: ['A', 'B', 'C'].into_iter().collect(),
        };

        let minimized = dfa.minimize();
        assert_eq!(minimized.num_states(), 2);
        assert_eq!(minimized.accepting().len(), 1);
        assert!(minimized.run_on_word("A"));
        assert!(minimized.run_on_word("ABCB"));
        assert!(!minimized.run_on_word(""));
        assert!(!minimized.run_on_word("B"));
        assert!(!minimized.run_on_word("AA"));
    }

    #[test]
    fn test_minimize_is_idempotent() {
        for data in TEST_DATA {
            let minimized = build_dfa(data.pattern).minimize();
            let twice = minimized.minimize();
            assert_eq!(
                minimized.num_states(),
                twice.num_states(),
                "idempotence for {}",
                data.pattern
            );
        }
    }

    #[test]
    fn test_missing_transition_distinguishes_states() {
        // Both states accept, but only state 1 can continue on 'A'. They
        // must not be merged.
        let mut transitions: BTreeMap<StateId, BTreeMap<char, StateId>> = BTreeMap::new();
        transitions.entry(0).or_default().insert('A', 1);
        transitions.entry(1).or_default().insert('A', 2);
        let dfa = Dfa {
            start_state: 0,
            num_states: 3,
            transitions,
            accepting: [1, 2].into_iter().collect(),
            alphabet: ['A'].into_iter().collect(),
        };

        let minimized = dfa.minimize();
        assert_eq!(minimized.num_states(), 3);
        assert!(minimized.run_on_word("A"));
        assert!(minimized.run_on_word("AA"));
        assert!(!minimized.run_on_word("AAA"));
    }
}
