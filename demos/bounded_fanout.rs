//! # Demo: bounded_fanout
//!
//! Eight keys competing for two admission slots, with the built-in
//! [`LogWriter`] subscriber printing the trigger flow.
//!
//! Watch the `[started]` lines: no more than two operations are in flight at
//! any instant, and queued triggers are admitted strictly in arrival order.
//!
//! ## Run
//! ```bash
//! cargo run --example bounded_fanout --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use keyops::{LogWriter, OpFailure, OpFn, OpStore, StoreConfig, Subscribe};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = StoreConfig {
        max_concurrent: 2,
        ..StoreConfig::default()
    };

    let store: OpStore<u32> = OpStore::builder(cfg)
        .with_subscriber(Arc::new(LogWriter) as Arc<dyn Subscribe>)
        .build();

    for i in 0..8u32 {
        store.assign(
            format!("job-{i}"),
            OpFn::arc(move || async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                if i % 3 == 0 {
                    Err(OpFailure::new(format!("job {i} hit a flaky backend")))
                } else {
                    Ok(i * 10)
                }
            }),
        );
    }

    let mut handles = Vec::new();
    for i in 0..8 {
        handles.push(store.trigger(&format!("job-{i}"))?);
    }
    for h in handles {
        h.await?;
    }

    for key in store.keys() {
        let rec = store.get(&key);
        println!("{key}: data={:?} error={:?}", rec.data, rec.error);
    }

    store.shutdown();
    Ok(())
}
