use crate::arena::Handle as NodeHandle;
use crate::node::{Node, Position};
use crate::skiplist::SkipList;

/// Walks one level of the list from its sentinel, in key order. A level
/// beyond the list's maximum height is walked as an empty one.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    list: &'a SkipList,
    level: usize,
    current: Position,
}

impl<'a> Cursor<'a> {
    pub fn new(list: &'a SkipList, level: usize) -> Cursor<'a> {
        Cursor {
            list,
            level,
            current: Position::Head,
        }
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if self.level >= self.list.max_height() {
            return None;
        }

        match self.list.next(self.current, self.level) {
            // Wrapped around to the sentinel.
            Position::Head => None,
            Position::Node(index) => {
                self.current = Position::Node(index);
                Some((index, self.list.node(index)))
            }
        }
    }
}

/// In-order `(key, value)` pairs, taken from the bottom level.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    cursor: Cursor<'a>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(list: &'a SkipList) -> Iter<'a> {
        Iter {
            cursor: Cursor::new(list, 0),
            remaining: list.len(),
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        let (_, node) = self.cursor.next()?;
        self.remaining -= 1;
        Some((*node.key(), *node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {}

/// Handles of the nodes linked at a single level, in key order.
#[derive(Debug, Clone)]
pub struct Handles<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Handles<'a> {
    pub(crate) fn new(list: &'a SkipList, level: usize) -> Handles<'a> {
        Handles {
            cursor: Cursor::new(list, level),
        }
    }
}

impl<'a> Iterator for Handles<'a> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, _) = self.cursor.next()?;
        self.cursor.list.handle_at(index)
    }
}

impl<'a> IntoIterator for &'a SkipList {
    type Item = (i32, i32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl SkipList {
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Iterates over the nodes linked at `level` (0-based). Levels at or
    /// above `level()`, including those past `max_height()`, are empty.
    pub fn handles(&self, level: usize) -> Handles<'_> {
        Handles::new(self, level)
    }
}
