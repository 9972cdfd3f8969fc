//! Subject core: validated state and synchronous fan-out.
//!
//! The public API from this module is [`Subject`] (with [`SubjectBuilder`]),
//! its configuration and the raw input type accepted by `set_state`.
//!
//! Internal modules:
//! - [`subject`]: state, dispatch cycle, re-entrancy queue;
//! - [`builder`]: configured construction;
//! - [`config`]: bounds and limits;
//! - [`input`]: coercion of raw inputs into the state domain.

mod builder;
mod config;
mod input;
mod subject;

pub use builder::SubjectBuilder;
pub use config::SubjectConfig;
pub use input::StateInput;
pub use subject::{Phase, Subject};
