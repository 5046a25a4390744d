//! The NFA (Non-deterministic Finite Automaton) implementation.
//!
//! The NFA is built directly from a parsed pattern and is later converted to
//! a DFA by subset construction. States are dense indices into an arena of
//! transition tables; state 0 is always the start state and states are never
//! removed. Fragment builders thread a *frontier*, the set of states where
//! matching currently sits, from one pattern element to the next: every
//! fragment entry state receives one epsilon transition from each frontier
//! state.

use std::collections::BTreeSet;

use log::trace;

use crate::{Alphabet, Atom, Pattern, Repetition};

/// The identifier of an automaton state.
pub type StateId = usize;

/// A nondeterministic finite automaton with epsilon transitions.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<NfaState>,
    accepting: BTreeSet<StateId>,
    // The symbols that actually occur on transitions. Carried over to the
    // DFA as its alphabet.
    alphabet: BTreeSet<char>,
}

impl Nfa {
    /// Create a new NFA holding only the start state.
    pub fn new() -> Self {
        Self {
            states: vec![NfaState::default()],
            accepting: BTreeSet::new(),
            alphabet: BTreeSet::new(),
        }
    }

    /// Build an NFA for a whole pattern.
    ///
    /// The frontier starts as the start state alone; every element advances
    /// it, and whatever it is after the last element becomes the accepting
    /// set.
    pub fn from_pattern(pattern: &Pattern, alphabet: &Alphabet) -> Self {
        let mut nfa = Nfa::new();
        let mut frontier = vec![Self::START];
        for element in pattern.elements() {
            frontier = nfa.add_repeated_atom(&element.atom, element.repetition, alphabet, frontier);
        }
        for state in frontier {
            nfa.accepting.insert(state);
        }
        trace!(
            "built NFA with {} states, {} accepting",
            nfa.states.len(),
            nfa.accepting.len()
        );
        nfa
    }

    /// The start state of every NFA.
    pub const START: StateId = 0;

    /// Get the states of the NFA.
    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    /// Get the number of states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Get the accepting states.
    pub fn accepting(&self) -> &BTreeSet<StateId> {
        &self.accepting
    }

    /// Get the symbols occurring on transitions.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// Allocate a fresh state and return its id.
    pub fn new_state(&mut self) -> StateId {
        let state = self.states.len();
        self.states.push(NfaState::default());
        state
    }

    /// Add a symbol transition. The symbol is recorded in the NFA alphabet.
    pub fn add_transition(&mut self, from: StateId, symbol: char, to: StateId) {
        self.alphabet.insert(symbol);
        self.states[from].transitions.push(NfaTransition {
            symbol,
            target: to,
        });
    }

    /// Add an epsilon transition, consuming no input symbol.
    pub fn add_epsilon_transition(&mut self, from: StateId, to: StateId) {
        self.states[from].epsilon_transitions.push(to);
    }

    /// Mark a state as accepting.
    pub fn add_accepting(&mut self, state: StateId) {
        self.accepting.insert(state);
    }

    /// Build the fragments for one repeated atom and return the new frontier.
    ///
    /// `max` copies of the atom fragment are chained; the exit of every copy
    /// `k` with `min <= k <= max` joins the output set, so the automaton may
    /// stop repeating after any permitted count instead of a fixed one. The
    /// returned set is the frontier for the next pattern element.
    fn add_repeated_atom(
        &mut self,
        atom: &Atom,
        repetition: Repetition,
        alphabet: &Alphabet,
        frontier: Vec<StateId>,
    ) -> Vec<StateId> {
        let Repetition { min, max } = repetition;
        let mut output = Vec::new();
        if min == 0 {
            // Zero repeats are permitted, so the incoming frontier itself
            // survives into the output set.
            output.extend(frontier.iter().copied());
        }
        let mut current = frontier;
        for count in 1..=max {
            let exit = self.add_atom_fragment(atom, alphabet, &current);
            if count >= min {
                output.push(exit);
            }
            current = vec![exit];
        }
        output
    }

    /// Build the fragment for a single atom occurrence and return its exit
    /// state. The entry state is attached to every frontier state by an
    /// epsilon transition.
    fn add_atom_fragment(
        &mut self,
        atom: &Atom,
        alphabet: &Alphabet,
        frontier: &[StateId],
    ) -> StateId {
        let entry = self.new_state();
        for &state in frontier {
            self.add_epsilon_transition(state, entry);
        }
        match atom {
            Atom::Literal(word) => {
                // One state per symbol, joined by symbol transitions.
                let mut current = entry;
                for symbol in word.chars() {
                    let next = self.new_state();
                    self.add_transition(current, symbol, next);
                    current = next;
                }
                current
            }
            Atom::Any => self.add_class_fragment(entry, alphabet.symbols()),
            Atom::OneOf(symbols) => self.add_class_fragment(entry, symbols.iter().copied()),
            Atom::NoneOf(symbols) => {
                let allowed = alphabet.complement(symbols);
                self.add_class_fragment(entry, allowed.into_iter())
            }
        }
    }

    /// A two-state fragment with one transition per matching symbol.
    fn add_class_fragment<I>(&mut self, entry: StateId, symbols: I) -> StateId
    where
        I: IntoIterator<Item = char>,
    {
        let exit = self.new_state();
        for symbol in symbols {
            self.add_transition(entry, symbol, exit);
        }
        exit
    }

    /// The epsilon closure of a single state: all states reachable through
    /// epsilon transitions alone, including the state itself.
    ///
    /// The visited set doubles as memoization so the closure terminates on
    /// cyclic epsilon graphs.
    pub fn epsilon_closure(&self, state: StateId) -> BTreeSet<StateId> {
        let mut closure = BTreeSet::new();
        closure.insert(state);
        let mut work = vec![state];
        while let Some(state) = work.pop() {
            for &target in &self.states[state].epsilon_transitions {
                if closure.insert(target) {
                    work.push(target);
                }
            }
        }
        closure
    }

    /// The epsilon closure of a set of states.
    pub fn epsilon_closure_set(&self, states: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        let mut closure = BTreeSet::new();
        let mut work: Vec<StateId> = states.iter().copied().collect();
        closure.extend(work.iter().copied());
        while let Some(state) = work.pop() {
            for &target in &self.states[state].epsilon_transitions {
                if closure.insert(target) {
                    work.push(target);
                }
            }
        }
        closure
    }

    /// The states directly reachable from any state of the set by consuming
    /// the given symbol. The result is not epsilon-closed.
    pub fn move_set(&self, states: &BTreeSet<StateId>, symbol: char) -> BTreeSet<StateId> {
        let mut targets = BTreeSet::new();
        for &state in states {
            for transition in &self.states[state].transitions {
                if transition.symbol == symbol {
                    targets.insert(transition.target);
                }
            }
        }
        targets
    }

    /// Check if any state of the set is accepting.
    pub fn is_accepting_set(&self, states: &BTreeSet<StateId>) -> bool {
        states.iter().any(|state| self.accepting.contains(state))
    }

    /// Run a whole word through the NFA and report acceptance.
    /// Used to validate construction; matching against text goes through the
    /// compiled DFA instead.
    pub fn run_on_word(&self, word: &str) -> bool {
        let mut current = self.epsilon_closure(Self::START);
        for symbol in word.chars() {
            current = self.epsilon_closure_set(&self.move_set(&current, symbol));
            if current.is_empty() {
                return false;
            }
        }
        self.is_accepting_set(&current)
    }
}

/// One NFA state: its outgoing symbol and epsilon transitions.
#[derive(Debug, Clone, Default)]
pub struct NfaState {
    transitions: Vec<NfaTransition>,
    epsilon_transitions: Vec<StateId>,
}

impl NfaState {
    /// Get the outgoing symbol transitions.
    pub fn transitions(&self) -> &[NfaTransition] {
        &self.transitions
    }

    /// Get the targets of the outgoing epsilon transitions.
    pub fn epsilon_transitions(&self) -> &[StateId] {
        &self.epsilon_transitions
    }
}

/// A transition consuming one input symbol.
#[derive(Debug, Clone)]
pub struct NfaTransition {
    symbol: char,
    target: StateId,
}

impl NfaTransition {
    /// Get the symbol the transition consumes.
    pub fn symbol(&self) -> char {
        self.symbol
    }

    /// Get the target state.
    pub fn target(&self) -> StateId {
        self.target
    }
}
