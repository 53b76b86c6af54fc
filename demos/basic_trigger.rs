//! # Demo: basic_trigger
//!
//! Minimal walkthrough of the store lifecycle for a single key.
//!
//! Demonstrates how to:
//! - Register an operation with [`OpFn`].
//! - Trigger it and watch the record move through loading → settled.
//! - Clear results while keeping the operation registered.
//!
//! ## Run
//! ```bash
//! cargo run --example basic_trigger
//! ```

use std::time::Duration;

use keyops::{OpFailure, OpFn, OpStore, StoreConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store: OpStore<u64> = OpStore::new(StoreConfig::default());

    store.assign(
        "slow-count",
        OpFn::arc(|| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, OpFailure>(1234)
        }),
    );

    let settled = store.trigger("slow-count")?;
    println!("loading: {}", store.get("slow-count").is_loading);

    settled.await?;
    let rec = store.get("slow-count");
    println!("data: {:?}, error: {:?}", rec.data, rec.error);

    store.clear();
    println!("after clear: {:?}", store.get("slow-count"));

    // The operation survived the clear; trigger again.
    store.trigger("slow-count")?.await?;
    println!("re-triggered data: {:?}", store.get("slow-count").data);

    Ok(())
}
