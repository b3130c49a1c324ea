use std::collections::TryReserveError;
use std::ops::{Index, IndexMut};

/// Stable reference to a value stored in an `Arena`. The generation changes
/// every time a slot is released, so a handle outliving its value never
/// resolves to whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u32,
}

impl Handle {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
enum Slot<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next_free: Option<usize> },
}

/// Slab of values addressed by index. Released slots are chained into a free
/// list and reused before the backing vector grows.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    slots_: Vec<Slot<T>>,
    free_: Option<usize>,
    length_: usize,
}

impl<T> Arena<T> {
    pub fn new() -> Arena<T> {
        Arena {
            slots_: Vec::new(),
            free_: None,
            length_: 0,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.length_
    }

    /// Stores `value`, growing the backing storage if no slot is free. On
    /// failure the arena is left untouched and `value` is dropped.
    pub fn insert(&mut self, value: T) -> Result<Handle, TryReserveError> {
        match self.free_ {
            Some(index) => {
                let generation = match self.slots_[index] {
                    Slot::Vacant {
                        generation,
                        next_free,
                    } => {
                        self.free_ = next_free;
                        generation
                    }
                    Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
                };
                self.slots_[index] = Slot::Occupied { generation, value };
                self.length_ += 1;
                Ok(Handle { index, generation })
            }
            None => {
                self.slots_.try_reserve(1)?;
                let index = self.slots_.len();
                self.slots_.push(Slot::Occupied {
                    generation: 0,
                    value,
                });
                self.length_ += 1;
                Ok(Handle {
                    index,
                    generation: 0,
                })
            }
        }
    }

    /// Releases the slot at `index` and returns its value.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let generation = match self.slots_.get(index) {
            Some(Slot::Occupied { generation, .. }) => *generation,
            _ => return None,
        };

        let vacant = Slot::Vacant {
            generation: generation.wrapping_add(1),
            next_free: self.free_,
        };
        match std::mem::replace(&mut self.slots_[index], vacant) {
            Slot::Occupied { value, .. } => {
                self.free_ = Some(index);
                self.length_ -= 1;
                Some(value)
            }
            Slot::Vacant { .. } => None,
        }
    }

    /// Returns the index behind `handle` if it still refers to a live value.
    pub fn resolve(&self, handle: Handle) -> Option<usize> {
        match self.slots_.get(handle.index) {
            Some(Slot::Occupied { generation, .. }) if *generation == handle.generation => {
                Some(handle.index)
            }
            _ => None,
        }
    }

    /// Builds the handle for a live slot.
    pub fn handle(&self, index: usize) -> Option<Handle> {
        match self.slots_.get(index) {
            Some(Slot::Occupied { generation, .. }) => Some(Handle {
                index,
                generation: *generation,
            }),
            _ => None,
        }
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.resolve(handle).map(|index| &self[index])
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.resolve(handle) {
            Some(index) => Some(&mut self[index]),
            None => None,
        }
    }
}

// Raw indexing is reserved for indices taken from live links; hitting a
// vacant slot means the structure is corrupt.
impl<T> Index<usize> for Arena<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match &self.slots_[index] {
            Slot::Occupied { value, .. } => value,
            Slot::Vacant { .. } => panic!("dangling arena index {}", index),
        }
    }
}

impl<T> IndexMut<usize> for Arena<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match &mut self.slots_[index] {
            Slot::Occupied { value, .. } => value,
            Slot::Vacant { .. } => panic!("dangling arena index {}", index),
        }
    }
}
