//! Shared access to one ledger
//!
//! Every mutation goes through the write half of the lock, so the incremental
//! update and the replay that follows it are never interleaved with another
//! request.

use crate::ledger::Ledger;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

pub type SharedLedger = Arc<RwLock<Ledger>>;

pub fn shared(ledger: Ledger) -> SharedLedger {
    Arc::new(RwLock::new(ledger))
}

/// Recalculate every balance and report on a fixed period.
/// The first run happens one full `period` after spawning.
pub fn spawn_periodic_recalculation(ledger: SharedLedger, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let mut guard = ledger.write().await;
            match guard.recalculate_all() {
                Ok(summary) => log::info!(
                    target: "arthik::batch",
                    "Scheduled recalculation: {} transactions, {} report rows, {} corrections",
                    summary.transactions,
                    summary.records.len(),
                    summary.corrected.len()
                ),
                Err(e) => log::error!(target: "arthik::batch", "Scheduled recalculation failed: {}", e),
            }
        }
    })
}
