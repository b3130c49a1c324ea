use std::fmt;
use std::ops::Index;

use log::{debug, trace};

use crate::arena::{Arena, Handle as NodeHandle};
use crate::error::{Error, Result};
use crate::height_control::{GeometricalGenerator, HeightControl};
use crate::node::{Link, Node, Position};
use crate::options::{Options, MAX_LEVEL};

pub struct SkipList {
    /// One sentinel per possible level. The sentinels make up the list
    /// header: each one closes the circular list of its level and points to
    /// itself while that level is empty. They are allocated once, in
    /// `SkipList::new`, and never hold a key.
    heads_: Vec<Link>,

    /// Storage for every node. Links refer to nodes by their index here.
    nodes_: Arena<Node>,

    /// Number of elements in the SkipList
    length_: usize,

    /// Number of active levels, always in `1..=max_height_`. Every level at
    /// or above it is empty.
    height_: usize,

    /// Cached from `controller_` so that bounds checks don't go through
    /// dynamic dispatch.
    max_height_: usize,

    /// Used to generate the height for any given node when inserting data.
    controller_: Box<dyn HeightControl>,
}

impl SkipList {
    pub fn new(controller: Box<dyn HeightControl>) -> Result<SkipList> {
        let max_height = controller.max_height();
        assert!(max_height > 0 && max_height <= MAX_LEVEL);

        let mut heads = Vec::new();
        heads.try_reserve_exact(max_height)?;
        heads.resize(max_height, Link::empty());

        Ok(SkipList {
            heads_: heads,
            nodes_: Arena::new(),
            length_: 0,
            height_: 1,
            max_height_: max_height,
            controller_: controller,
        })
    }

    /// Builds a list whose heights come from a geometric generator configured
    /// by `options`.
    pub fn with_options(options: &Options) -> Result<SkipList> {
        Self::new(Box::new(GeometricalGenerator::from_options(options)))
    }

    /// Returns the number of values stored in the structure.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.length_
    }

    /// Returns `true` if there are no values stored within the structure.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.length_ == 0
    }

    /// Returns the number of active levels (1-based).
    #[inline(always)]
    pub fn level(&self) -> usize {
        self.height_
    }

    /// Returns the maximum reachable height of the SkipList.
    #[inline(always)]
    pub fn max_height(&self) -> usize {
        self.max_height_
    }

    #[inline(always)]
    fn link(&self, position: Position, level: usize) -> &Link {
        match position {
            Position::Head => &self.heads_[level],
            Position::Node(index) => self.nodes_[index].link(level),
        }
    }

    #[inline(always)]
    fn link_mut(&mut self, position: Position, level: usize) -> &mut Link {
        match position {
            Position::Head => &mut self.heads_[level],
            Position::Node(index) => self.nodes_[index].link_mut(level),
        }
    }

    #[inline(always)]
    pub(crate) fn next(&self, position: Position, level: usize) -> Position {
        self.link(position, level).next
    }

    #[inline(always)]
    pub(crate) fn node(&self, index: usize) -> &Node {
        &self.nodes_[index]
    }

    pub(crate) fn handle_at(&self, index: usize) -> Option<NodeHandle> {
        self.nodes_.handle(index)
    }

    /// Moves forward from `position` on `level` for as long as the next
    /// node's key satisfies `advance`. Returns the last position visited.
    fn advance_while<F>(&self, mut position: Position, level: usize, advance: F) -> Position
    where
        F: Fn(i32) -> bool,
    {
        while let Position::Node(index) = self.next(position, level) {
            if advance(*self.nodes_[index].key()) {
                position = Position::Node(index);
            } else {
                break;
            }
        }

        position
    }

    /// Finds the last node whose key is lower than `key`, or the head if
    /// there is none. The position found on a level is where the search on
    /// the level below starts.
    fn find_lower_bound(&self, key: i32) -> Position {
        let mut current = Position::Head;

        for level in (0..self.height_).rev() {
            current = self.advance_while(current, level, |k| k < key);
        }

        current
    }

    /// Links the node at `index` right after `prev` on `level`.
    fn splice(&mut self, index: usize, level: usize, prev: Position) {
        let next = self.next(prev, level);
        let node = Position::Node(index);

        *self.nodes_[index].link_mut(level) = Link { prev, next };
        self.link_mut(prev, level).next = node;
        self.link_mut(next, level).prev = node;
    }

    /// Unlinks the node at `index` from every level it occupies and releases
    /// it. Returns `None` if the slot is already free.
    fn unlink(&mut self, index: usize) -> Option<Node> {
        let node = self.nodes_.remove(index)?;

        for level in 0..node.height() {
            let Link { prev, next } = *node.link(level);
            self.link_mut(prev, level).next = next;
            self.link_mut(next, level).prev = prev;
        }

        self.length_ -= 1;
        self.shrink();
        Some(node)
    }

    /// Drops empty levels from the top, keeping at least one.
    fn shrink(&mut self) {
        let before = self.height_;

        while self.height_ > 1 && self.heads_[self.height_ - 1].is_empty() {
            self.height_ -= 1;
        }

        if self.height_ != before {
            debug!("list level shrunk from {} to {}", before, self.height_);
        }
    }

    /// Inserts `key` with `value`. Duplicate keys are allowed; a new entry is
    /// placed after every existing entry with the same key.
    pub fn insert(&mut self, key: i32, value: i32) -> Result<NodeHandle> {
        let height = self.controller_.get_height().clamp(1, self.max_height_);

        // Both allocations happen before touching any link, so a failure
        // leaves the list exactly as it was.
        let node = Node::new(key, value, height)?;
        let handle = self.nodes_.insert(node)?;

        // Levels above the old height are empty sentinels already, so raising
        // the height requires no other change.
        if height > self.height_ {
            debug!("list level raised from {} to {}", self.height_, height);
            self.height_ = height;
        }

        let mut current = Position::Head;
        for level in (0..self.height_).rev() {
            current = self.advance_while(current, level, |k| k <= key);

            if level < height {
                self.splice(handle.index(), level, current);
            }
        }

        self.length_ += 1;
        trace!("inserted key {} with height {}", key, height);
        Ok(handle)
    }

    /// Finds the first node holding `key`. With duplicates, that is the one
    /// inserted earliest.
    pub fn search(&self, key: i32) -> Option<NodeHandle> {
        let lower_bound = self.find_lower_bound(key);

        // The list may be empty, or every key lower than `key`: in both cases
        // the next position is the sentinel.
        match self.next(lower_bound, 0) {
            Position::Node(index) if *self.nodes_[index].key() == key => self.nodes_.handle(index),
            _ => None,
        }
    }

    /// Returns the value of the first entry with `key`, if any.
    pub fn get(&self, key: i32) -> Option<i32> {
        self.search(key).and_then(|handle| self.value(handle))
    }

    /// Returns a mutable reference to the value of the first entry with
    /// `key`, if any.
    pub fn get_mut(&mut self, key: i32) -> Option<&mut i32> {
        let handle = self.search(key)?;
        self.value_mut(handle)
    }

    /// Returns true if `key` is in the list.
    #[inline(always)]
    pub fn contains_key(&self, key: i32) -> bool {
        self.search(key).is_some()
    }

    /// Removes every entry with `key` and returns how many were removed.
    pub fn delete(&mut self, key: i32) -> usize {
        let mut removed = 0;
        let mut current = Position::Head;

        // `height_` may drop while removing, which only empties levels this
        // loop would still visit; walking an empty level is a no-op.
        for level in (0..self.height_).rev() {
            current = self.advance_while(current, level, |k| k < key);

            // `current` holds a lower key and is never removed here, so its
            // next link always names the first matching node still linked. A
            // removed node leaves all of its levels at once and can't be met
            // again further down.
            while let Position::Node(index) = self.next(current, level) {
                if *self.nodes_[index].key() != key {
                    break;
                }

                match self.unlink(index) {
                    Some(_) => removed += 1,
                    None => break,
                }
            }
        }

        trace!("deleted {} entries with key {}", removed, key);
        removed
    }

    /// Removes the node behind `handle` from every level it occupies and
    /// returns its key and value.
    pub fn remove_node(&mut self, handle: NodeHandle) -> Result<(i32, i32)> {
        let index = self.nodes_.resolve(handle).ok_or(Error::NotFound)?;
        let node = self.unlink(index).ok_or(Error::NotFound)?;

        trace!("removed node with key {} and height {}", node.key(), node.height());
        Ok((*node.key(), *node.value()))
    }

    pub fn entry(&self, handle: NodeHandle) -> Option<(i32, i32)> {
        self.nodes_
            .get(handle)
            .map(|node| (*node.key(), *node.value()))
    }

    pub fn key(&self, handle: NodeHandle) -> Option<i32> {
        self.nodes_.get(handle).map(|node| *node.key())
    }

    pub fn value(&self, handle: NodeHandle) -> Option<i32> {
        self.nodes_.get(handle).map(|node| *node.value())
    }

    pub fn value_mut(&mut self, handle: NodeHandle) -> Option<&mut i32> {
        self.nodes_.get_mut(handle).map(|node| node.value_mut())
    }

    /// Number of levels the node behind `handle` is linked into.
    pub fn height(&self, handle: NodeHandle) -> Option<usize> {
        self.nodes_.get(handle).map(|node| node.height())
    }

    /// Returns the entry with the smallest key.
    pub fn first(&self) -> Option<(i32, i32)> {
        self.iter().next()
    }

    /// Lists the content of every active level, top level first.
    pub fn dump(&self) -> Dump {
        let levels = (0..self.height_)
            .rev()
            .map(|level| LevelDump {
                level: level + 1,
                entries: self
                    .handles(level)
                    .filter_map(|handle| {
                        self.entry(handle).map(|(key, value)| DumpEntry { handle, key, value })
                    })
                    .collect(),
            })
            .collect();

        Dump {
            count: self.length_,
            levels,
        }
    }

    /// Releases every node. Only the bottom level is walked: all nodes are
    /// linked there whatever their height.
    fn dispose(&mut self) -> usize {
        let mut released = 0;
        let mut current = self.heads_[0].next;

        while let Position::Node(index) = current {
            match self.nodes_.remove(index) {
                Some(node) => {
                    current = node.link(0).next;
                    released += 1;
                }
                None => break,
            }
        }

        debug_assert_eq!(released, self.length_);
        debug_assert_eq!(self.nodes_.len(), 0);

        for head in self.heads_.iter_mut() {
            *head = Link::empty();
        }
        self.length_ = 0;
        self.height_ = 1;

        released
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        let released = self.dispose();
        debug!("cleared list, released {} nodes", released);
    }

    /// Destroys the list, releasing every node exactly once. Returns the
    /// number of nodes released.
    pub fn teardown(mut self) -> usize {
        let released = self.dispose();
        debug!("tore down list, released {} nodes", released);
        released
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpEntry {
    pub handle: NodeHandle,
    pub key: i32,
    pub value: i32,
}

/// Entries linked at one level, in order. `level` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDump {
    pub level: usize,
    pub entries: Vec<DumpEntry>,
}

impl LevelDump {
    pub fn pairs(&self) -> Vec<(i32, i32)> {
        self.entries.iter().map(|e| (e.key, e.value)).collect()
    }
}

/// Snapshot produced by `SkipList::dump`, levels ordered from the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump {
    pub count: usize,
    pub levels: Vec<LevelDump>,
}

impl Dump {
    /// Returns the snapshot of the given 1-based level, if it was active.
    pub fn level(&self, level: usize) -> Option<&LevelDump> {
        self.levels.iter().find(|l| l.level == level)
    }
}

impl fmt::Display for Dump {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Total {} nodes:", self.count)?;

        for level in &self.levels {
            writeln!(f, "level {}:", level.level)?;
            for entry in &level.entries {
                writeln!(f, "key:0x{:08x} value:0x{:08x}", entry.key, entry.value)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for SkipList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;

        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }

        write!(f, "]")
    }
}

impl fmt::Debug for SkipList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SkipList")
            .field("level", &self.height_)
            .field("max_height", &self.max_height_)
            .field("len", &self.length_)
            .field("entries", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a> Index<&'a i32> for SkipList {
    type Output = i32;

    fn index(&self, key: &i32) -> &Self::Output {
        match self.search(*key).and_then(|handle| self.nodes_.get(handle)) {
            Some(node) => node.value(),
            None => panic!("key {} not found", key),
        }
    }
}
