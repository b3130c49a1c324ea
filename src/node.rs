use std::collections::TryReserveError;

/// Where a link points to within one level: either that level's sentinel in
/// the list header, or the node stored at the given arena index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Position {
    Head,
    Node(usize),
}

/// One entry of a circular doubly linked list. The sentinel of an empty
/// level points to itself in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link {
    pub prev: Position,
    pub next: Position,
}

impl Link {
    pub fn empty() -> Link {
        Link {
            prev: Position::Head,
            next: Position::Head,
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.next == Position::Head && self.prev == Position::Head
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    links_: Vec<Link>,
    key_: i32,
    value_: i32,
}

impl Node {
    // A node of height 1 lives only in the bottom level, a node of height 2
    // also in the level above it, and so on. The number of links never
    // changes after construction.
    pub fn new(key: i32, value: i32, height: usize) -> Result<Node, TryReserveError> {
        debug_assert!(height > 0);

        let mut links = Vec::new();
        links.try_reserve_exact(height)?;
        links.resize(height, Link::empty());

        Ok(Node {
            links_: links,
            key_: key,
            value_: value,
        })
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.links_.len()
    }

    #[inline(always)]
    pub fn key(&self) -> &i32 {
        &self.key_
    }

    #[inline(always)]
    pub fn value(&self) -> &i32 {
        &self.value_
    }

    pub fn value_mut(&mut self) -> &mut i32 {
        &mut self.value_
    }

    pub fn link(&self, level: usize) -> &Link {
        debug_assert!(level < self.height());
        &self.links_[level]
    }

    pub fn link_mut(&mut self, level: usize) -> &mut Link {
        debug_assert!(level < self.height());
        &mut self.links_[level]
    }
}
