//! Conversion of the automata to the graphviz dot format.

use std::io::Write;

use dot_writer::{Attributes, DotWriter, RankDirection};

use crate::{Dfa, Nfa};

/// Render an NFA to graphviz dot format.
pub fn render_nfa_to<W: Write>(nfa: &Nfa, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for (id, state) in nfa.states().iter().enumerate() {
        {
            let mut node = digraph.node_auto();
            node.set_label(&id.to_string());
            if id == Nfa::START {
                node.set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Blue)
                    .set_pen_width(3.0);
            }
            if nfa.accepting().contains(&id) {
                node.set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Red)
                    .set_pen_width(3.0);
            }
        }
        for transition in state.transitions() {
            digraph
                .edge(
                    &format!("node_{}", id),
                    &format!("node_{}", transition.target()),
                )
                .attributes()
                .set_label(&transition.symbol().to_string());
        }
        for &target in state.epsilon_transitions() {
            digraph
                .edge(&format!("node_{}", id), &format!("node_{}", target))
                .attributes()
                .set_label("ε");
        }
    }
}

/// Render a DFA to graphviz dot format.
pub fn render_dfa_to<W: Write>(dfa: &Dfa, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for id in 0..dfa.num_states() {
        let mut node = digraph.node_auto();
        node.set_label(&id.to_string());
        if id == dfa.start_state() {
            node.set_shape(dot_writer::Shape::Circle)
                .set_color(dot_writer::Color::Blue)
                .set_pen_width(3.0);
        }
        if dfa.accepting().contains(&id) {
            node.set_shape(dot_writer::Shape::Circle)
                .set_color(dot_writer::Color::Red)
                .set_pen_width(3.0);
        }
    }
    for (source, targets) in dfa.transitions() {
        for (symbol, target) in targets {
            digraph
                .edge(&format!("node_{}", source), &format!("node_{}", target))
                .attributes()
                .set_label(&symbol.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_pattern, Alphabet};

    #[test]
    fn test_render_nfa_and_dfa() {
        let alphabet = Alphabet::default();
        let pattern = parse_pattern("C-G-G", &alphabet).unwrap();
        let nfa = Nfa::from_pattern(&pattern, &alphabet);
        let dfa = Dfa::from_nfa(&nfa).minimize();

        let mut nfa_dot = Vec::new();
        render_nfa_to(&nfa, "cgg_nfa", &mut nfa_dot);
        let rendered = String::from_utf8(nfa_dot).unwrap();
        assert!(rendered.contains("digraph"));
        assert!(rendered.contains("ε"));

        let mut dfa_dot = Vec::new();
        render_dfa_to(&dfa, "cgg_dfa", &mut dfa_dot);
        let rendered = String::from_utf8(dfa_dot).unwrap();
        assert!(rendered.contains("digraph"));
        assert!(rendered.contains("C"));
    }
}
