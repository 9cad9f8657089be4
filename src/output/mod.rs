//! Result output
//!
//! Writers take any `io::Write` so the binary can hand them stdout and tests
//! can hand them a `Vec<u8>`.

pub mod json;
pub mod text;
