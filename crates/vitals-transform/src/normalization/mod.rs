//! Text-to-number normalization shared by the derived-metric code.

pub mod numeric;

pub use numeric::{parse_f64, parse_i64, round_half_even, round_to};
