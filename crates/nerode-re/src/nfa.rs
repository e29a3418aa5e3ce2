use std::collections::{BTreeMap, BTreeSet};

use bit_set::BitSet;

use crate::ast::{Ast, Node};
use crate::automaton::Automaton;

// states are indices into `nodes`, so composing automata is integer arithmetic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NfaNode {
    pub(crate) transitions: BTreeMap<char, BitSet>,
}

// multiple entry states and multiple accept states, no epsilon transitions
// every primitive automaton has 0 as an entry state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    pub(crate) nodes: Vec<NfaNode>,
    pub(crate) starts: BitSet,
    pub(crate) finals: BitSet,
}

fn shift_set(set: &BitSet, offset: usize) -> BitSet {
    set.iter().map(|x| x + offset).collect()
}

fn edges(nodes: &[NfaNode]) -> impl Iterator<Item = (usize, char, usize)> + '_ {
    nodes.iter().enumerate().flat_map(|(from, node)| {
        node.transitions
            .iter()
            .flat_map(move |(symbol, targets)| targets.iter().map(move |to| (from, *symbol, to)))
    })
}

// pending work of `Nfa::from_node`
#[derive(Clone, Copy)]
enum Build<'a> {
    Node(&'a Node),
    // rest of a chain, joined onto the automaton on top of the stack
    Concatenation(&'a Node),
    Decision(&'a Node),
    Close,
    Append,
    Unite,
}

impl NfaNode {
    pub(crate) fn add(&mut self, symbol: char, target: usize) {
        self.transitions.entry(symbol).or_default().insert(target);
    }

    fn shifted(&self, offset: usize) -> NfaNode {
        let transitions = self
            .transitions
            .iter()
            .map(|(symbol, targets)| (*symbol, shift_set(targets, offset)))
            .collect();

        NfaNode { transitions }
    }
}

impl Nfa {
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn starts(&self) -> &BitSet {
        &self.starts
    }

    pub fn finals(&self) -> &BitSet {
        &self.finals
    }

    /// All transitions as `(from, symbol, to)` triples.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, char, usize)> + '_ {
        edges(&self.nodes)
    }

    pub fn alphabet(&self) -> BTreeSet<char> {
        self.nodes
            .iter()
            .flat_map(|node| node.transitions.keys().copied())
            .collect()
    }

    /// Accepts only the empty word.
    pub fn empty() -> Nfa {
        let initial: BitSet = std::iter::once(0).collect();
        Nfa {
            nodes: vec![NfaNode::default()],
            starts: initial.clone(),
            finals: initial,
        }
    }

    pub fn value(symbol: char) -> Nfa {
        let mut nodes = vec![NfaNode::default(), NfaNode::default()];
        nodes[0].add(symbol, 1);

        Nfa {
            nodes,
            starts: std::iter::once(0).collect(),
            finals: std::iter::once(1).collect(),
        }
    }

    // appends the nodes of `right`, renumbered past the current end
    fn extend_shifted(&mut self, right: &Nfa) -> usize {
        let offset = self.size();
        self.nodes.extend(right.nodes.iter().map(|node| node.shifted(offset)));
        offset
    }

    // (from, symbol) of every edge ending in a final state
    fn finishing_edges(&self) -> Vec<(usize, char)> {
        let finals: Vec<usize> = self.finals.iter().collect();
        let mut finishing = Vec::new();
        for (from, node) in self.nodes.iter().enumerate() {
            for (symbol, targets) in &node.transitions {
                if finals.iter().any(|state| targets.contains(*state)) {
                    finishing.push((from, *symbol));
                }
            }
        }

        finishing
    }

    // a single new state acts as both entry and exit of the loop
    fn close(&mut self) {
        let hub = self.size();
        let mut hub_node = NfaNode::default();
        for start in self.starts.iter() {
            for (symbol, targets) in &self.nodes[start].transitions {
                hub_node
                    .transitions
                    .entry(*symbol)
                    .or_default()
                    .union_with(targets);
            }
        }
        self.nodes.push(hub_node);

        for (from, symbol) in self.finishing_edges() {
            self.nodes[from].add(symbol, hub);
        }

        self.starts = std::iter::once(hub).collect();
        self.finals = self.starts.clone();
    }

    fn append(&mut self, right: &Nfa) {
        let finishing = self.finishing_edges();
        let nullable = !self.starts.is_disjoint(&self.finals);
        let offset = self.extend_shifted(right);
        let right_starts = shift_set(&right.starts, offset);

        // every edge finishing left also continues into right
        for (from, symbol) in finishing {
            for start in right_starts.iter() {
                self.nodes[from].add(symbol, start);
            }
        }

        // left may accept the empty word, in which case right can be entered directly
        if nullable {
            self.starts.union_with(&right_starts);
        }
        self.finals = shift_set(&right.finals, offset);
    }

    fn unite(&mut self, right: &Nfa) {
        let offset = self.extend_shifted(right);
        self.starts.union_with(&shift_set(&right.starts, offset));
        self.finals.union_with(&shift_set(&right.finals, offset));
    }

    pub fn closure(inner: &Nfa) -> Nfa {
        let mut nfa = inner.clone();
        nfa.close();
        nfa
    }

    pub fn concatenation(left: &Nfa, right: &Nfa) -> Nfa {
        let mut nfa = left.clone();
        nfa.append(right);
        nfa
    }

    pub fn decision(left: &Nfa, right: &Nfa) -> Nfa {
        let mut nfa = left.clone();
        nfa.unite(right);
        nfa
    }

    // post-order over the tree without recursion. a right-nested chain
    // x(yz) is built as (xy)z, which numbers and wires every state the same
    // way and only ever grows the automaton on the left.
    fn from_node(root: &Node) -> Nfa {
        let mut tasks: Vec<Build<'_>> = vec![Build::Node(root)];
        let mut built: Vec<Nfa> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Build::Node(Node::Value(c)) => built.push(Self::value(*c)),
                Build::Node(Node::Clini(inner)) => {
                    tasks.push(Build::Close);
                    tasks.push(Build::Node(inner));
                }
                Build::Node(Node::Concatenation(left, right)) => {
                    tasks.push(Build::Concatenation(right));
                    tasks.push(Build::Node(left));
                }
                Build::Node(Node::Decision(left, right)) => {
                    tasks.push(Build::Decision(right));
                    tasks.push(Build::Node(left));
                }
                Build::Concatenation(Node::Concatenation(left, right)) => {
                    tasks.push(Build::Concatenation(right));
                    tasks.push(Build::Append);
                    tasks.push(Build::Node(left));
                }
                Build::Concatenation(last) => {
                    tasks.push(Build::Append);
                    tasks.push(Build::Node(last));
                }
                Build::Decision(Node::Decision(left, right)) => {
                    tasks.push(Build::Decision(right));
                    tasks.push(Build::Unite);
                    tasks.push(Build::Node(left));
                }
                Build::Decision(last) => {
                    tasks.push(Build::Unite);
                    tasks.push(Build::Node(last));
                }
                Build::Close => {
                    if let Some(inner) = built.last_mut() {
                        inner.close();
                    }
                }
                Build::Append | Build::Unite => {
                    let right = built.pop();
                    if let (Some(left), Some(right)) = (built.last_mut(), right) {
                        match task {
                            Build::Append => left.append(&right),
                            _ => left.unite(&right),
                        }
                    }
                }
            }
        }

        built.pop().unwrap_or_else(Self::empty)
    }

    // structural translation, no epsilon transitions are ever created
    pub fn from_ast(ast: &Ast) -> Nfa {
        match ast.root() {
            Some(root) => Self::from_node(root),
            None => Self::empty(),
        }
    }

    pub(crate) fn delta(&self, set: &BitSet, symbol: char) -> BitSet {
        let mut result = BitSet::with_capacity(self.size());

        for i in set.iter() {
            if let Some(targets) = self.nodes[i].transitions.get(&symbol) {
                result.union_with(targets);
            }
        }

        result
    }
}

impl Automaton for Nfa {
    type Cursor = BitSet;

    fn start(&self) -> BitSet {
        self.starts.clone()
    }

    fn advance(&self, cursor: &mut BitSet, symbol: char) -> bool {
        *cursor = self.delta(cursor, symbol);
        !cursor.is_empty()
    }

    fn is_final(&self, cursor: &BitSet) -> bool {
        !cursor.is_disjoint(&self.finals)
    }
}
