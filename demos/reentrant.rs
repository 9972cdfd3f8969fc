//! # Example: reentrant
//!
//! A subscriber that corrects the subject from inside its own reaction, a
//! subscriber that fails, and a listener task printing diagnostics as they arrive.
//!
//! ## Flow
//! ```text
//! set_state(250)
//!   ├─► Clamp.react      → 250 > 100 → set_state(100)  (queued)
//!   ├─► Flaky.react      → Err        → ReactionFailed on the bus
//!   ├─► HexFormatter     → 0xfa
//!   └─► queued pass: state = 100
//!         ├─► Clamp.react   → ok
//!         ├─► Flaky.react   → ok
//!         └─► HexFormatter  → 0x64
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example reentrant
//! ```

use std::sync::Arc;
use std::time::Duration;

use statecast::{HexFormatter, LogWriter, ReactionError, Subject, Subscribe};
use tokio::sync::broadcast::error::RecvError;

/// Pulls the subject back under `limit`.
struct Clamp {
    limit: i64,
}

impl Subscribe for Clamp {
    fn react(&self, subject: &Subject) -> Result<(), ReactionError> {
        let value = subject.get_state();
        if value > self.limit {
            subject
                .set_state(self.limit)
                .map_err(|e| ReactionError::fail(e.to_string()))?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "clamp"
    }
}

/// Rejects values above 200.
struct Flaky;

impl Subscribe for Flaky {
    fn react(&self, subject: &Subject) -> Result<(), ReactionError> {
        if subject.get_state() > 200 {
            return Err(ReactionError::fail("value too large to store"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "flaky"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let subject = Subject::new("gauge", 0);
    let mut rx = subject.bus().subscribe();

    let listener = tokio::spawn(async move {
        let writer = LogWriter::new();
        loop {
            match rx.recv().await {
                Ok(ev) => println!("{}", writer.line(&ev)),
                Err(RecvError::Lagged(n)) => println!("[lagged] skipped={n}"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let clamp = Arc::new(Clamp { limit: 100 });
    let flaky = Arc::new(Flaky);
    let hex = Arc::new(HexFormatter::new());
    subject.register(&clamp);
    subject.register(&flaky);
    subject.register(&hex);

    subject.set_state(250)?;
    println!("final: {subject}, hex saw {:?}", hex.history());

    // Let the listener catch up, then close the bus by dropping the subject.
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(subject);
    listener.await?;
    Ok(())
}
