//! # Example: formatters
//!
//! Two formatters observing one subject.
//!
//! Shows how to:
//! - Register built-in subscribers on a [`Subject`].
//! - Change the state and watch every subscriber react in registration order.
//! - Read the diagnostic [`Bus`](statecast::Bus) with [`LogWriter`].
//!
//! ## Flow
//! ```text
//! Subject("DefaultFormatter", 0)
//!     ├─► register(HexFormatter)
//!     ├─► set_state(3)        ──► HexFormatter: 0x3
//!     ├─► register(BinaryFormatter)
//!     ├─► set_state(5)        ──► HexFormatter: 0x5, BinaryFormatter: 0b101
//!     └─► set_state("five")   ──► ValidationError, nobody notified
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example formatters
//! ```

use std::sync::Arc;

use statecast::{BinaryFormatter, HexFormatter, LogWriter, Subject};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let subject = Subject::new("DefaultFormatter", 0);
    let mut events = subject.bus().subscribe();

    let hex = Arc::new(HexFormatter::new());
    subject.register(&hex);
    subject.set_state(3)?;

    let bin = Arc::new(BinaryFormatter::new());
    subject.register(&bin);
    subject.register(&bin);
    subject.set_state(5)?;

    if let Err(err) = subject.set_state("five") {
        println!("rejected: {err}");
    }
    println!("{subject}");

    println!();
    println!("Diagnostics:");
    let printed = LogWriter::new().drain(&mut events);
    println!(" └─► {printed} events");
    Ok(())
}
