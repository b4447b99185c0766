use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::SyncEngine;
use crate::api::SyncApi;
use crate::clock::Clock;
use crate::models::Scope;

impl<A: SyncApi, C: Clock> SyncEngine<A, C> {
    /// Run `sync_now` every `interval` until `shutdown` turns `true` or its sender drops.
    ///
    /// The first cycle starts immediately. Failed cycles are logged and the
    /// loop keeps going. Returns the number of cycles that settled.
    pub async fn run_periodic(
        &self,
        scope: &Scope,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> usize {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut settled = 0;

        tracing::info!(
            "Starting periodic sync for scope {} every {:?}",
            scope,
            interval
        );
        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    match self.sync_now(scope).await {
                        Ok(report) => {
                            settled += 1;
                            if let Some(error) = report.push_error {
                                tracing::warn!("Periodic sync settled without push: {}", error);
                            }
                        }
                        Err(error) => tracing::warn!("Periodic sync failed: {}", error),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Stopped periodic sync for scope {} after {} cycles", scope, settled);
        settled
    }
}
