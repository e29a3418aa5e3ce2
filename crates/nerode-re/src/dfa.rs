use std::collections::{BTreeMap, BTreeSet, HashMap};

use bit_set::BitSet;

use crate::automaton::Automaton;
use crate::nfa::Nfa;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DfaNode {
    pub(crate) transitions: BTreeMap<char, usize>,
}

// state 0 is the only start state
// a missing transition means the input is rejected, there is no explicit dead state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) nodes: Vec<DfaNode>,
    pub(crate) finals: BitSet,
}

// bijection between (is_final, set of NFA states) and DFA state numbers
#[derive(Debug, Default)]
struct Mapping {
    subsets: Vec<(bool, BitSet)>,
    ids: HashMap<(bool, BitSet), usize>,
}

impl Mapping {
    fn map(&mut self, is_final: bool, subset: BitSet) -> usize {
        let key = (is_final, subset);
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }

        let id = self.subsets.len();
        self.subsets.push(key.clone());
        self.ids.insert(key, id);
        id
    }

    fn unmap(&self, id: usize) -> &BitSet {
        &self.subsets[id].1
    }

    fn len(&self) -> usize {
        self.subsets.len()
    }

    fn finals(&self) -> BitSet {
        self.subsets
            .iter()
            .enumerate()
            .filter(|(_, (is_final, _))| *is_final)
            .map(|(id, _)| id)
            .collect()
    }
}

impl Dfa {
    /// Builds a DFA from explicit `(from, symbol, to)` transitions.
    /// `size` must cover every state referenced.
    pub fn from_transitions(
        size: usize,
        transitions: &[(usize, char, usize)],
        finals: &[usize],
    ) -> Dfa {
        let mut nodes: Vec<DfaNode> = Vec::with_capacity(size);
        nodes.resize(size.max(1), DfaNode::default());
        for (from, symbol, to) in transitions.iter().copied() {
            assert!(to < nodes.len(), "transition target {} out of range", to);
            nodes[from].transitions.insert(symbol, to);
        }

        Dfa {
            nodes,
            finals: finals.iter().copied().collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn finals(&self) -> &BitSet {
        &self.finals
    }

    pub fn is_final_state(&self, state: usize) -> bool {
        self.finals.contains(state)
    }

    pub fn transition(&self, state: usize, symbol: char) -> Option<usize> {
        self.nodes[state].transitions.get(&symbol).copied()
    }

    pub fn transitions(&self) -> impl Iterator<Item = (usize, char, usize)> + '_ {
        self.nodes.iter().enumerate().flat_map(|(from, node)| {
            node.transitions
                .iter()
                .map(move |(symbol, to)| (from, *symbol, *to))
        })
    }

    pub fn alphabet(&self) -> BTreeSet<char> {
        self.nodes
            .iter()
            .flat_map(|node| node.transitions.keys().copied())
            .collect()
    }

    // moves out of `subset`, grouped by symbol: (any target final, union of targets)
    fn group(nfa: &Nfa, subset: &BitSet) -> BTreeMap<char, (bool, BitSet)> {
        let mut moves: BTreeMap<char, (bool, BitSet)> = BTreeMap::new();

        for state in subset.iter() {
            for (symbol, targets) in &nfa.nodes[state].transitions {
                let entry = moves
                    .entry(*symbol)
                    .or_insert_with(|| (false, BitSet::with_capacity(nfa.size())));
                entry.0 |= !targets.is_disjoint(&nfa.finals);
                entry.1.union_with(targets);
            }
        }

        moves
    }

    // creates a DFA from an NFA using subset construction
    pub fn from_nfa(nfa: &Nfa) -> Dfa {
        let mut mapping = Mapping::default();
        let initial = mapping.map(!nfa.starts.is_disjoint(&nfa.finals), nfa.starts.clone());

        let mut work_stack: Vec<usize> = vec![initial];
        let mut processed = BitSet::new();
        let mut transitions: Vec<(usize, char, usize)> = Vec::new();

        while let Some(id) = work_stack.pop() {
            if !processed.insert(id) {
                continue;
            }

            let moves = Self::group(nfa, mapping.unmap(id));
            for (symbol, (is_final, targets)) in moves {
                let next = mapping.map(is_final, targets);
                transitions.push((id, symbol, next));
                work_stack.push(next);
            }
        }

        let mut nodes: Vec<DfaNode> = Vec::with_capacity(mapping.len());
        nodes.resize(mapping.len(), DfaNode::default());
        for (from, symbol, to) in transitions {
            nodes[from].transitions.insert(symbol, to);
        }

        Dfa {
            nodes,
            finals: mapping.finals(),
        }
    }
}

impl Automaton for Dfa {
    // None once a transition was missing
    type Cursor = Option<usize>;

    fn start(&self) -> Option<usize> {
        Some(0)
    }

    fn advance(&self, cursor: &mut Option<usize>, symbol: char) -> bool {
        *cursor = cursor.and_then(|state| self.transition(state, symbol));
        cursor.is_some()
    }

    fn is_final(&self, cursor: &Option<usize>) -> bool {
        cursor.is_some_and(|state| self.is_final_state(state))
    }
}
