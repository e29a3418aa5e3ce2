// common simulation interface for NFA and DFA
// the automaton itself is never mutated by matching, the position lives in a cursor

pub trait Automaton {
    type Cursor: Clone;

    fn start(&self) -> Self::Cursor;

    /// Moves the cursor along `symbol`. Returns false once no live state remains.
    fn advance(&self, cursor: &mut Self::Cursor, symbol: char) -> bool;

    fn is_final(&self, cursor: &Self::Cursor) -> bool;

    fn matches(&self, word: &str) -> bool {
        let mut cursor = self.start();
        for symbol in word.chars() {
            if !self.advance(&mut cursor, symbol) {
                return false;
            }
        }

        self.is_final(&cursor)
    }
}

// stepwise driver, for callers feeding input one symbol at a time
pub struct Runner<'a, A: Automaton> {
    automaton: &'a A,
    cursor: A::Cursor,
}

impl<'a, A: Automaton> Runner<'a, A> {
    pub fn new(automaton: &'a A) -> Self {
        Runner {
            automaton,
            cursor: automaton.start(),
        }
    }

    pub fn reset(&mut self) {
        self.cursor = self.automaton.start();
    }

    pub fn step(&mut self, symbol: char) -> bool {
        self.automaton.advance(&mut self.cursor, symbol)
    }

    pub fn is_accepting(&self) -> bool {
        self.automaton.is_final(&self.cursor)
    }

    pub fn cursor(&self) -> &A::Cursor {
        &self.cursor
    }
}
