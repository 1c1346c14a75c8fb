//! Flat JSON patient record store.
//!
//! The store is one JSON file holding an array of objects:
//!
//! ```text
//! [
//!     { "case_id": "12", "gender": "Female", ..., "vital_signs": {...} },
//!     ...
//! ]
//! ```
//!
//! - `io/` - whole-file load and atomic save
//! - `store.rs` - list, append and delete-by-case-id
//! - `error.rs` - error types with user-facing messages

mod error;
mod io;
mod store;

pub use error::{PersistenceError, Result};
pub use store::RecordStore;
