//! avl-hashindex: a fixed-capacity hash index whose buckets are AVL trees
//! instead of chains, so lookups inside a bucket stay logarithmic even when
//! many keys collide.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the tree and the table independently verifiable; the table
//!   never reaches into tree nodes and the tree knows nothing about hashing.
//! - Layers:
//!   - AvlTree<K>: owned-node AVL tree. Insert/remove recurse down, then
//!     recompute heights and rebalance on the way back up.
//!   - BucketHash / PolynomialHash: maps key bytes to a bucket index with a
//!     base-128 polynomial reduced modulo the capacity at every step.
//!   - HashIndex<K, H>: boxed slice of optional trees; routes each key to
//!     one bucket and delegates to that bucket's tree.
//!
//! Constraints
//! - Single-threaded: mutation takes `&mut self`, so callers never observe a
//!   tree mid-rotation.
//! - Fixed capacity: chosen at construction (default 151) and never changed;
//!   there is no rehash path.
//! - Unique keys: inserting an existing key is a no-op reported as `false`.
//! - Keys must be `Ord + AsRef<[u8]>`. Borrowed lookups (`String` stored,
//!   `&str` queried) require `Borrow` to agree with both `Ord` and the bytes.
//!
//! Tree invariants (checked by `validate()`; the crate's unit tests also
//! assert them after every mutation)
//! - Ordering: left subtree keys are smaller, right subtree keys larger.
//! - Height cache: `height = 1 + max(left, right)`, absent subtree is 0.
//! - Balance: `height(right) - height(left)` is in `-1..=1` at every node.
//!
//! Bucket lifetime
//! - A bucket's tree is created on the first insert that hashes there and
//!   stays allocated even if later removals empty it.
//! - `height_of(key)` reports the height of the whole bucket tree holding
//!   `key`, not the depth of the key's node. Keys sharing a bucket therefore
//!   share a height.
//!
//! Notes and non-goals
//! - No resizing, persistence or concurrent access.
//! - Nodes carry no parent link; ownership flows strictly downwards and
//!   rotations move boxes between local bindings.
//! - Diagnostics are emitted through `tracing` (rotations at `trace`,
//!   index construction at `debug`); no subscriber is installed here.

pub mod avl_tree;
mod avl_tree_proptest;
mod config;
mod dot;
mod error;
mod hash;
mod hash_index;

// Public surface
pub use avl_tree::{AvlTree, NodeRef};
pub use config::IndexConfig;
pub use error::{IndexError, InvariantViolation, Result};
pub use hash::{BucketHash, PolynomialHash};
pub use hash_index::HashIndex;
