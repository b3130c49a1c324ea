//! In-memory ordered index from `i32` keys to `i32` values, backed by a skip
//! list. Nodes get a random height on insertion; lookups, insertions and
//! deletions take expected logarithmic time without any rebalancing.
//!
//! ```
//! use skipindex::{Options, SkipList};
//!
//! let mut list = SkipList::with_options(&Options::with_seed(1)).unwrap();
//! list.insert(5, 50).unwrap();
//! list.insert(3, 30).unwrap();
//! assert_eq!(list.get(3), Some(30));
//! assert_eq!(list.delete(5), 1);
//! assert_eq!(list.len(), 1);
//! ```

mod arena;
mod error;
mod height_control;
mod iter;
mod node;
mod options;
mod skiplist;

pub use arena::Handle as NodeHandle;
pub use error::{Error, Result};
pub use height_control::{GeometricalGenerator, HeightControl, SequenceGenerator};
pub use iter::{Handles, Iter};
pub use options::{Options, DEFAULT_UPGRADE_PROBABILITY, MAX_LEVEL};
pub use skiplist::{Dump, DumpEntry, LevelDump, SkipList};
