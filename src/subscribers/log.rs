//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [assigned] key=fetch-user
//! [pending] key=fetch-user
//! [started] key=fetch-user
//! [failed] key=fetch-user err="connection refused"
//! [succeeded] key=fetch-user
//! [discarded] key=fetch-user outcome="succeeded"
//! [removed] key=fetch-user
//! [cleared]
//! [lagged] slow_sub skipped 12 events
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let key = e.key.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::OpAssigned => println!("[assigned] key={key}"),
            EventKind::TriggerRejected => {
                println!("[rejected] key={key} reason={:?}", e.reason)
            }
            EventKind::TriggerPending => println!("[pending] key={key}"),
            EventKind::OpStarted => println!("[started] key={key}"),
            EventKind::OpSucceeded => println!("[succeeded] key={key}"),
            EventKind::OpFailed => {
                println!("[failed] key={key} err={:?}", e.reason.as_deref().unwrap_or(""))
            }
            EventKind::ResultDiscarded => {
                println!(
                    "[discarded] key={key} outcome={:?}",
                    e.reason.as_deref().unwrap_or("")
                )
            }
            EventKind::OpRemoved => println!("[removed] key={key}"),
            EventKind::ResultsCleared => println!("[cleared]"),
            EventKind::SubscriberLagged => {
                println!("[lagged] {}", e.reason.as_deref().unwrap_or(""))
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panic] name={}", e.reason.as_deref().unwrap_or("?"))
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
