//! Content-model automaton nodes
//!
//! A parsed content model is a tree of [`Node`]s. The tree shape never
//! changes after parsing; each variant carries its own evaluation state,
//! which is only meaningful between one [`Node::reset`] and the next.
//!
//! The stepping protocol shared by all variants:
//! - `step` eats as many names from the [`Food`] as the grammar allows and
//!   returns `false` only on a structural mismatch. Running out of names is
//!   never a mismatch: completion queries feed a prefix, not a document.
//! - `terminated` tells whether the current state is a complete match.
//! - `is_optional` tells whether the current state is satisfiable without
//!   any further names.
//! - `possibilities` lists the names that may legally come next.

use std::fmt;
use std::iter;

use super::food::{Food, Mark};
use super::lexer::Multiplicity;

/// Lazy sequence of element names borrowed from a node tree
pub type Names<'a> = Box<dyn Iterator<Item = &'a str> + 'a>;

/// One node of a content-model automaton
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Exactly one occurrence of `name`
    Element {
        name: String,
        matched: bool,
    },

    /// Children in order, each exactly once
    Sequence {
        children: Vec<Node>,
        /// Index of the child currently being matched
        current: usize,
    },

    /// Exactly one of the children
    Choice {
        children: Vec<Node>,
        /// Per child: rejected the input, accepted without eating, or lost
        /// to a child that ate further
        idle: Vec<bool>,
        /// Some child ate at least one name
        progressed: bool,
        /// A child that ate furthest still wants more
        hungry: bool,
    },

    /// `peer` repeated between `min` and `max` times (`None` = unbounded)
    Repeat {
        peer: Box<Node>,
        min: usize,
        max: Option<usize>,
        /// Completed repetitions
        count: usize,
    },
}

impl Node {
    /// Create an element leaf
    pub fn element(name: impl Into<String>) -> Self {
        Node::Element {
            name: name.into(),
            matched: false,
        }
    }

    /// Create a sequence group
    pub fn sequence(children: Vec<Node>) -> Self {
        Node::Sequence {
            children,
            current: 0,
        }
    }

    /// Create a choice group
    pub fn choice(children: Vec<Node>) -> Self {
        let idle = vec![false; children.len()];
        Node::Choice {
            children,
            idle,
            progressed: false,
            hungry: false,
        }
    }

    /// Wrap a node in a multiplicity
    pub fn repeat(peer: Node, multiplicity: Multiplicity) -> Self {
        let (min, max) = multiplicity.bounds();
        Node::Repeat {
            peer: Box::new(peer),
            min,
            max,
            count: 0,
        }
    }

    /// Restore this node and all its descendants to the unmatched state
    pub fn reset(&mut self) {
        match self {
            Node::Element { matched, .. } => *matched = false,
            Node::Sequence { children, current } => {
                *current = 0;
                children.iter_mut().for_each(Node::reset);
            }
            Node::Choice {
                children,
                idle,
                progressed,
                hungry,
            } => {
                idle.iter_mut().for_each(|flag| *flag = false);
                *progressed = false;
                *hungry = false;
                children.iter_mut().for_each(Node::reset);
            }
            Node::Repeat { peer, count, .. } => {
                *count = 0;
                peer.reset();
            }
        }
    }

    /// Eat names from `food`; `false` means the next name cannot occur here
    pub fn step<I>(&mut self, food: &mut Food<I>) -> bool
    where
        I: Iterator,
        I::Item: AsRef<str>,
    {
        match self {
            Node::Element { name, matched } => {
                let start = food.mark();
                let hit = match food.next() {
                    None => return true,
                    Some(next) => next == name.as_str(),
                };
                if hit {
                    *matched = true;
                } else {
                    food.reset(start);
                }
                hit
            }

            Node::Sequence { children, current } => {
                while food.has_next() {
                    let Some(child) = children.get_mut(*current) else {
                        return true;
                    };
                    let store = food.mark();
                    if !child.step(food) {
                        return false;
                    }
                    if food.has_next() || child.terminated() {
                        *current += 1;
                    } else if food.mark() != store {
                        // The child stopped half way through the last names.
                        // Replay them against the following children so their
                        // state reflects the reading where this child ate nothing.
                        resync(&mut children[*current + 1..], food, store);
                    }
                }
                true
            }

            Node::Choice {
                children,
                idle,
                progressed,
                hungry,
            } => {
                if !food.has_next() {
                    return true;
                }

                let start = food.mark();
                let mut ends: Vec<Option<Mark>> = vec![None; children.len()];
                let mut accepted = false;

                for (i, child) in children.iter_mut().enumerate() {
                    if idle[i] {
                        continue;
                    }
                    food.reset(start);
                    if !child.step(food) {
                        idle[i] = true;
                        child.reset();
                        continue;
                    }
                    accepted = true;
                    let end = food.mark();
                    if end == start {
                        idle[i] = true;
                    } else {
                        ends[i] = Some(end);
                    }
                }

                let furthest = ends.iter().flatten().copied().max().unwrap_or(start);
                for (i, end) in ends.iter().enumerate() {
                    match end {
                        Some(end) if *end == furthest => {
                            *progressed = true;
                            if !children[i].terminated() {
                                *hungry = true;
                            }
                        }
                        Some(_) => idle[i] = true,
                        None => {}
                    }
                }

                food.reset(furthest);
                accepted
            }

            Node::Repeat {
                peer,
                min,
                max,
                count,
            } => loop {
                if !food.has_next() || Some(*count) == *max {
                    return true;
                }

                let start = food.mark();
                if !peer.step(food) {
                    food.reset(start);
                    peer.reset();
                    return *count >= *min;
                }

                if food.mark() == start {
                    // accepted without eating; another round would spin
                    return *count >= *min || peer.is_optional();
                }

                if food.has_next() {
                    *count += 1;
                    peer.reset();
                } else if peer.terminated() {
                    // last repetition stays as the current state
                    *count += 1;
                }
            },
        }
    }

    /// Whether the current state is a complete match
    pub fn terminated(&self) -> bool {
        match self {
            Node::Element { matched, .. } => *matched,
            Node::Sequence { children, current } => {
                *current >= children.len()
                    || (*current + 1 == children.len() && children[*current].terminated())
            }
            Node::Choice {
                progressed, hungry, ..
            } => *progressed && !*hungry,
            Node::Repeat {
                peer,
                min,
                max,
                count,
            } => match max {
                Some(max) => *count == *max && peer.terminated(),
                None => *count >= *min && peer.terminated(),
            },
        }
    }

    /// Whether the current state needs no further names
    pub fn is_optional(&self) -> bool {
        match self {
            Node::Element { matched, .. } => *matched,
            Node::Sequence { children, .. } => children.iter().all(Node::is_optional),
            Node::Choice { children, .. } => children.iter().any(Node::is_optional),
            Node::Repeat { min, count, .. } => *count >= *min,
        }
    }

    /// Names that may legally come next from the current state
    ///
    /// Repeats whose current repetition is complete are rewound first, so
    /// the names of the next repetition show up. That rewinding is why this
    /// takes `&mut self`.
    pub fn possibilities(&mut self) -> Names<'_> {
        self.rearm();
        self.first_names()
    }

    /// Element names of all leaves, in grammar order
    pub fn element_names(&self) -> Names<'_> {
        match self {
            Node::Element { name, .. } => Box::new(iter::once(name.as_str())),
            Node::Sequence { children, .. } | Node::Choice { children, .. } => {
                Box::new(children.iter().flat_map(Node::element_names))
            }
            Node::Repeat { peer, .. } => peer.element_names(),
        }
    }

    /// Check if this node is a group (sequence or choice)
    pub fn is_group(&self) -> bool {
        matches!(self, Node::Sequence { .. } | Node::Choice { .. })
    }

    /// Rewind completed repetitions along the frontier
    fn rearm(&mut self) {
        if self.terminated() && !matches!(self, Node::Repeat { .. }) {
            return;
        }
        match self {
            Node::Element { .. } => {}
            Node::Sequence { children, current } => {
                for child in children.iter_mut().skip(*current) {
                    child.rearm();
                    if !child.is_optional() {
                        break;
                    }
                }
            }
            Node::Choice { children, idle, .. } => {
                for (child, _) in children.iter_mut().zip(idle.iter()).filter(|(_, idle)| !**idle) {
                    child.rearm();
                }
            }
            Node::Repeat {
                peer, max, count, ..
            } => {
                if Some(*count) == *max {
                    return;
                }
                if peer.terminated() {
                    peer.reset();
                } else {
                    peer.rearm();
                }
            }
        }
    }

    /// Names the frontier accepts, without rewinding anything
    fn first_names(&self) -> Names<'_> {
        match self {
            Node::Element { name, matched } => {
                if *matched {
                    Box::new(iter::empty())
                } else {
                    Box::new(iter::once(name.as_str()))
                }
            }
            Node::Sequence { children, current } => {
                if self.terminated() {
                    return Box::new(iter::empty());
                }
                let tail = &children[(*current).min(children.len())..];
                let end = tail
                    .iter()
                    .position(|child| !child.is_optional())
                    .map_or(tail.len(), |i| i + 1);
                Box::new(tail[..end].iter().flat_map(Node::first_names))
            }
            Node::Choice { children, idle, .. } => {
                if self.terminated() {
                    return Box::new(iter::empty());
                }
                Box::new(
                    children
                        .iter()
                        .zip(idle.iter())
                        .filter(|(_, idle)| !**idle)
                        .flat_map(|(child, _)| child.first_names()),
                )
            }
            Node::Repeat {
                peer, max, count, ..
            } => {
                if Some(*count) == *max {
                    Box::new(iter::empty())
                } else {
                    peer.first_names()
                }
            }
        }
    }
}

/// Feed the names from `store` onwards to the nodes after a half-matched
/// sequence child, resetting each one that rejects them or eats nothing.
/// Stops after the first node that is not optional.
fn resync<I>(rest: &mut [Node], food: &mut Food<I>, store: Mark)
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    let level = food.mark();
    food.reset(store);

    for node in rest.iter_mut() {
        node.reset();
        let before = food.mark();
        let accepted = node.step(food);
        if !accepted || food.mark() == before {
            node.reset();
            food.reset(before);
        }
        if !node.is_optional() {
            break;
        }
    }

    food.reset(level);
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element { name, .. } => f.write_str(name),
            Node::Sequence { children, .. } => write_group(f, children, ','),
            Node::Choice { children, .. } => write_group(f, children, '|'),
            Node::Repeat { peer, min, max, .. } => {
                write!(f, "{peer}")?;
                match Multiplicity::from_bounds(*min, *max) {
                    Some(multiplicity) => write!(f, "{}", multiplicity.symbol()),
                    None => match max {
                        Some(max) => write!(f, "{{{min},{max}}}"),
                        None => write!(f, "{{{min},}}"),
                    },
                }
            }
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, children: &[Node], connector: char) -> fmt::Result {
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{connector}")?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}
