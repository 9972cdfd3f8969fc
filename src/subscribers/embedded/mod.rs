//! # Built-in subscribers
//!
//! These are small, self-contained implementations useful for demos and tests.
//!
//! - [`HexFormatter`] / [`BinaryFormatter`]: render the subject's value in base 16 / base 2.
//! - [`LogWriter`]: prints diagnostic events in a human-readable form (demo/debug).

mod formatter;
mod log;

pub use formatter::{BinaryFormatter, HexFormatter, to_binary, to_hex};
pub use log::LogWriter;
