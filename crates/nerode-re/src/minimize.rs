// table-filling minimization
// two states are merged unless some word leads exactly one of them to acceptance

use std::collections::VecDeque;

use bit_set::BitSet;

use crate::dfa::{Dfa, DfaNode};

// lower triangle, rows[s1 - 1][s2] holds the pair s1 > s2
// true = distinguishable; entries are only ever set, never cleared
struct EquivalenceMatrix {
    rows: Vec<Vec<bool>>,
}

impl EquivalenceMatrix {
    fn new(dfa: &Dfa) -> EquivalenceMatrix {
        let rows = (1..dfa.size())
            .map(|s1| {
                (0..s1)
                    .map(|s2| dfa.is_final_state(s1) != dfa.is_final_state(s2))
                    .collect()
            })
            .collect();

        EquivalenceMatrix { rows }
    }

    fn is_marked(&self, a: usize, b: usize) -> bool {
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => self.rows[a - 1][b],
            std::cmp::Ordering::Less => self.rows[b - 1][a],
            std::cmp::Ordering::Equal => false,
        }
    }

    fn mark(&mut self, s1: usize, s2: usize) {
        debug_assert!(s1 > s2);
        self.rows[s1 - 1][s2] = true;
    }
}

fn distinguishable(
    dfa: &Dfa,
    alphabet: &[char],
    matrix: &EquivalenceMatrix,
    s1: usize,
    s2: usize,
) -> bool {
    alphabet.iter().copied().any(|symbol| {
        match (dfa.transition(s1, symbol), dfa.transition(s2, symbol)) {
            (Some(a), Some(b)) => matrix.is_marked(a, b),
            (None, None) => false,
            // only one of them can move
            _ => true,
        }
    })
}

fn fill(dfa: &Dfa) -> EquivalenceMatrix {
    let alphabet: Vec<char> = dfa.alphabet().into_iter().collect();
    let mut matrix = EquivalenceMatrix::new(dfa);

    // swept from the back: successors are mostly numbered after their
    // predecessors, so one sweep carries marks down a whole chain
    let mut changed = true;
    while changed {
        changed = false;
        for s1 in (1..dfa.size()).rev() {
            for s2 in (0..s1).rev() {
                if !matrix.is_marked(s1, s2) && distinguishable(dfa, &alphabet, &matrix, s1, s2) {
                    matrix.mark(s1, s2);
                    changed = true;
                }
            }
        }
    }

    matrix
}

// representative of every state: the smallest member of its class,
// which keeps 0 as the representative of the start state's class
fn representatives(size: usize, matrix: &EquivalenceMatrix) -> Vec<usize> {
    let mut representative: Vec<Option<usize>> = vec![None; size];

    for seed in 0..size {
        if representative[seed].is_some() {
            continue;
        }

        let mut queue: VecDeque<usize> = VecDeque::from([seed]);
        while let Some(state) = queue.pop_front() {
            if representative[state].is_some() {
                continue;
            }
            representative[state] = Some(seed);

            for other in 0..size {
                if other != state && representative[other].is_none() && !matrix.is_marked(state, other) {
                    queue.push_back(other);
                }
            }
        }
    }

    // every state seeds or joins a class above
    representative
        .into_iter()
        .enumerate()
        .map(|(state, x)| x.unwrap_or(state))
        .collect()
}

impl Dfa {
    pub fn minimize(dfa: &Dfa) -> Dfa {
        let matrix = fill(dfa);
        let representative = representatives(dfa.size(), &matrix);

        // representatives are renumbered densely, 0 stays 0
        let mut kept: BitSet = BitSet::with_capacity(dfa.size());
        for state in representative.iter().copied() {
            kept.insert(state);
        }
        let mut renumber: Vec<usize> = vec![0; dfa.size()];
        for (new_state, old_state) in kept.iter().enumerate() {
            renumber[old_state] = new_state;
        }
        let merged = |state: usize| renumber[representative[state]];

        let mut nodes: Vec<DfaNode> = Vec::with_capacity(kept.len());
        nodes.resize(kept.len(), DfaNode::default());
        for (from, symbol, to) in dfa.transitions() {
            nodes[merged(from)].transitions.insert(symbol, merged(to));
        }

        let finals: BitSet = dfa.finals.iter().map(merged).collect();

        Dfa { nodes, finals }
    }
}
