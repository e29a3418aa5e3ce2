use std::fmt;

use crate::scanner::is_escapable;

// binary tree, arity is fixed by the variant
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Value(char),
    Concatenation(Box<Node>, Box<Node>),
    Decision(Box<Node>, Box<Node>),
    Clini(Box<Node>),
}

/// Parsed pattern. `root` is `None` for the empty pattern, which only
/// matches the empty word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ast {
    pub(crate) root: Option<Node>,
}

impl Node {
    pub fn concatenation(left: Node, right: Node) -> Node {
        Node::Concatenation(Box::new(left), Box::new(right))
    }

    pub fn decision(left: Node, right: Node) -> Node {
        Node::Decision(Box::new(left), Box::new(right))
    }

    pub fn clini(child: Node) -> Node {
        Node::Clini(Box::new(child))
    }

    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Value(_) => vec![],
            Node::Clini(child) => vec![child.as_ref()],
            Node::Concatenation(left, right) | Node::Decision(left, right) => {
                vec![left.as_ref(), right.as_ref()]
            }
        }
    }

    /// Number of nodes in the subtree.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children());
        }

        count
    }

    // moves the boxed children out, leaving leaves behind
    fn detach(&mut self, out: &mut Vec<Node>) {
        let mut take = |child: &mut Box<Node>| {
            if !matches!(**child, Node::Value(_)) {
                out.push(std::mem::replace(child.as_mut(), Node::Value('\0')));
            }
        };

        match self {
            Node::Value(_) => (),
            Node::Clini(child) => take(child),
            Node::Concatenation(left, right) | Node::Decision(left, right) => {
                take(left);
                take(right);
            }
        }
    }
}

// chains are as deep as the pattern is long, so they are torn down with a stack
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach(&mut pending);
        }
    }
}

impl Ast {
    pub fn new(root: Option<Node>) -> Ast {
        Ast { root }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

enum Piece<'a> {
    Node(&'a Node),
    Text(&'static str),
}

// output reparses to the same tree
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pushed in reverse, popped in output order
        let mut pending = vec![Piece::Node(self)];
        while let Some(piece) = pending.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(node) => node,
            };

            match node {
                Node::Value(c) => {
                    if is_escapable(*c) {
                        write!(f, "\\{}", c)?;
                    } else {
                        write!(f, "{}", c)?;
                    }
                }
                // concatenation nests to the right when parsed
                Node::Concatenation(left, right) => {
                    pending.push(Piece::Node(right));
                    match left.as_ref() {
                        Node::Concatenation(_, _) => pending.extend([
                            Piece::Text(")"),
                            Piece::Node(left),
                            Piece::Text("("),
                        ]),
                        _ => pending.push(Piece::Node(left)),
                    }
                }
                Node::Decision(left, right) => pending.extend([
                    Piece::Text(")"),
                    Piece::Node(right),
                    Piece::Text("|"),
                    Piece::Node(left),
                    Piece::Text("("),
                ]),
                Node::Clini(child) => match child.as_ref() {
                    Node::Value(_) => pending.extend([Piece::Text("*"), Piece::Node(child)]),
                    _ => pending.extend([
                        Piece::Text(")*"),
                        Piece::Node(child),
                        Piece::Text("("),
                    ]),
                },
            }
        }

        Ok(())
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => fmt::Display::fmt(root, f),
            None => Ok(()),
        }
    }
}
