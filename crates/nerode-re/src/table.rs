use serde::{Deserialize, Serialize};

use crate::automaton::Automaton;
use crate::dfa::Dfa;

// states = rows, 1 additional error state
// symbols of the automaton's alphabet = columns, sorted
// symbols outside the alphabet go straight to the error state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaTable {
    alphabet: Vec<char>,
    data: Vec<usize>,
    accepting: Vec<bool>,
    states: usize,
    inputs: usize,
}

impl DfaTable {
    fn column(&self, symbol: char) -> Option<usize> {
        self.alphabet.binary_search(&symbol).ok()
    }

    fn get_next_state(&self, current_state: usize, column: usize) -> usize {
        self.data[current_state * self.inputs + column]
    }

    pub fn error_state(&self) -> usize {
        self.states - 1
    }

    pub fn states(&self) -> usize {
        self.states
    }

    pub fn from_dfa(dfa: &Dfa) -> DfaTable {
        let alphabet: Vec<char> = dfa.alphabet().into_iter().collect();
        let num_states: usize = dfa.size() + 1;
        let num_inputs: usize = alphabet.len();
        let mut data: Vec<usize> = vec![num_states - 1; num_states * num_inputs];

        // fill table
        for (from, symbol, to) in dfa.transitions() {
            if let Ok(column) = alphabet.binary_search(&symbol) {
                data[from * num_inputs + column] = to;
            }
        }

        let mut accepting: Vec<bool> = (0..dfa.size()).map(|x| dfa.is_final_state(x)).collect();
        accepting.push(false); // add implicit error state

        DfaTable {
            alphabet,
            data,
            accepting,
            states: num_states,
            inputs: num_inputs,
        }
    }
}

impl Automaton for DfaTable {
    type Cursor = usize;

    fn start(&self) -> usize {
        0
    }

    fn advance(&self, cursor: &mut usize, symbol: char) -> bool {
        *cursor = match self.column(symbol) {
            Some(column) if *cursor != self.error_state() => self.get_next_state(*cursor, column),
            _ => self.error_state(),
        };
        *cursor != self.error_state()
    }

    fn is_final(&self, cursor: &usize) -> bool {
        self.accepting[*cursor]
    }
}

#[cfg(test)]
mod tests {
    use serde_binary::binary_stream::Endian;

    use super::*;
    use crate::compile;

    #[test]
    fn table_layout() {
        let dfa = compile("ab*").unwrap();
        let table = DfaTable::from_dfa(&dfa);
        assert_eq!(table.states(), dfa.size() + 1);
        assert_eq!(table.alphabet, vec!['a', 'b']);
        assert_eq!(table.data.len(), table.states() * 2);
        assert!(!table.is_final(&table.error_state()));
        // error row loops to itself
        assert_eq!(table.get_next_state(table.error_state(), 0), table.error_state());
    }

    #[test]
    fn table_agrees_with_dfa() {
        let dfa = compile("d(a|b)e*(g|k)").unwrap();
        let table = DfaTable::from_dfa(&dfa);
        for word in ["daeg", "dbk", "dbeeek", "dcegk", "", "d", "dae", "xyz"] {
            assert_eq!(table.matches(word), dfa.matches(word), "word '{}'", word);
        }
    }

    #[test]
    fn empty_alphabet() {
        let table = DfaTable::from_dfa(&compile("").unwrap());
        assert!(table.matches(""));
        assert!(!table.matches("a"));
    }

    #[test]
    fn table_survives_serialization() {
        let table = DfaTable::from_dfa(&compile("(a|b)*abb").unwrap());
        let bytes = serde_binary::to_vec(&table, Endian::Little).unwrap();
        let restored: DfaTable = serde_binary::from_slice(&bytes, Endian::Little).unwrap();

        assert_eq!(restored, table);
        for word in ["abb", "babb", "ab", "abba", ""] {
            assert_eq!(restored.matches(word), table.matches(word), "word '{}'", word);
        }
    }
}
