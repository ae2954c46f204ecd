//! In-memory implementation of every store trait.
//!
//! Used by the engine tests and by `dry_run` setups without a database.
//! Operations can be made to fail on demand with [`Fault`].

mod store;

pub use store::{Fault, MemoryStore};
