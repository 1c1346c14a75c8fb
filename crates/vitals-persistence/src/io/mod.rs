//! Whole-file reads and atomic rewrites of the store.

mod load;
mod save;

pub use load::load_entries;
pub use save::save_entries;
