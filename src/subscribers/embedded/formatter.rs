//! # Radix formatters: render a subject's value in another base
//!
//! Two independent reactions to the same change: [`HexFormatter`] renders
//! base 16, [`BinaryFormatter`] base 2. Each logs its rendering and keeps its
//! own history; they share nothing at runtime.
//!
//! ## Example output
//! ```text
//! INFO HexFormatter: DefaultFormatter has data 0x3
//! INFO BinaryFormatter: DefaultFormatter has data 0b101
//! ```

use parking_lot::Mutex;

use crate::core::Subject;
use crate::error::ReactionError;
use crate::subscribers::Subscribe;

/// Renders `value` as `0x..`, with a leading `-` for negative values.
pub fn to_hex(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}0x{:x}", value.unsigned_abs())
}

/// Renders `value` as `0b..`, with a leading `-` for negative values.
pub fn to_binary(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}0b{:b}", value.unsigned_abs())
}

/// Renderings produced so far, oldest first.
#[derive(Default)]
struct History(Mutex<Vec<String>>);

impl History {
    fn push(&self, rendered: String) {
        self.0.lock().push(rendered);
    }

    fn all(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    fn last(&self) -> Option<String> {
        self.0.lock().last().cloned()
    }
}

/// Base-16 formatter.
#[derive(Default)]
pub struct HexFormatter {
    history: History,
}

impl HexFormatter {
    /// Construct a new [`HexFormatter`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every rendering so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.all()
    }

    /// Most recent rendering.
    pub fn last(&self) -> Option<String> {
        self.history.last()
    }
}

impl Subscribe for HexFormatter {
    fn react(&self, subject: &Subject) -> Result<(), ReactionError> {
        let rendered = to_hex(subject.get_state());
        tracing::info!("{}: {} has data {}", self.name(), subject.identity(), rendered);
        self.history.push(rendered);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "HexFormatter"
    }
}

/// Base-2 formatter.
#[derive(Default)]
pub struct BinaryFormatter {
    history: History,
}

impl BinaryFormatter {
    /// Construct a new [`BinaryFormatter`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every rendering so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.all()
    }

    /// Most recent rendering.
    pub fn last(&self) -> Option<String> {
        self.history.last()
    }
}

impl Subscribe for BinaryFormatter {
    fn react(&self, subject: &Subject) -> Result<(), ReactionError> {
        let rendered = to_binary(subject.get_state());
        tracing::info!("{}: {} has data {}", self.name(), subject.identity(), rendered);
        self.history.push(rendered);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "BinaryFormatter"
    }
}
