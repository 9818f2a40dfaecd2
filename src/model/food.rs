//! Lazy backtracking cursor over sibling element names
//!
//! `Food` is what a content model eats: an ordered sequence of element names
//! pulled from a caller-supplied iterator only as far as the automaton needs.
//! Every name pulled so far stays buffered, so the read position can be
//! marked and later moved back (or forward again) in O(1).

/// Position inside a [`Food`] buffer, as returned by [`Food::mark`]
pub type Mark = usize;

/// Pull-based, position-addressable view over element names
pub struct Food<I>
where
    I: Iterator,
{
    /// Producer of names not yet materialized
    source: I,
    /// Names materialized so far, oldest first
    buffer: Vec<I::Item>,
    /// Read position into `buffer`
    pos: usize,
    /// Set once `source` returned `None`
    drained: bool,
}

impl<I> Food<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Create a cursor over the given name producer
    pub fn new<T>(source: T) -> Self
    where
        T: IntoIterator<IntoIter = I, Item = I::Item>,
    {
        Self {
            source: source.into_iter(),
            buffer: Vec::new(),
            pos: 0,
            drained: false,
        }
    }

    /// Current read position
    pub fn mark(&self) -> Mark {
        self.pos
    }

    /// Move the read position to a previously returned mark
    ///
    /// Materialized names are never discarded, so jumping back and then
    /// forward to a later mark is fine.
    pub fn reset(&mut self, mark: Mark) {
        debug_assert!(mark <= self.buffer.len(), "mark {mark} was never handed out");
        self.pos = mark.min(self.buffer.len());
    }

    /// Check whether another name is available, pulling one if needed
    pub fn has_next(&mut self) -> bool {
        self.fill()
    }

    /// Consume and return the next name
    pub fn next(&mut self) -> Option<&str> {
        if !self.fill() {
            return None;
        }
        let item = &self.buffer[self.pos];
        self.pos += 1;
        Some(item.as_ref())
    }

    /// Number of names materialized so far
    pub fn materialized(&self) -> usize {
        self.buffer.len()
    }

    /// Make sure `buffer[pos]` exists if the source can still provide it
    fn fill(&mut self) -> bool {
        if self.pos < self.buffer.len() {
            return true;
        }
        if self.drained {
            return false;
        }
        match self.source.next() {
            Some(item) => {
                self.buffer.push(item);
                true
            }
            None => {
                self.drained = true;
                false
            }
        }
    }
}
