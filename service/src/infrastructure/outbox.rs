//! Background delivery of queued notifications.
//!
//! Delivery is at-least-once: an entry is claimed, handed to the notifier and
//! then marked delivered. A crash between the two delivers it again later.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;

use crate::domain::notification::{Notifier, OutboxEntry};
use crate::domain::repository::{NotificationOutbox, RepositoryError};

#[derive(Debug, Clone, Deserialize)]
pub struct OutboxSettings {
    pub poll_interval_seconds: u64,
    pub batch_size: u32,
    /// Entries are abandoned after this many failed deliveries
    pub max_attempts: i32,
}

impl Default for OutboxSettings {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 5,
            batch_size: 20,
            max_attempts: 5,
        }
    }
}

/// Outcome of one polling round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

pub struct OutboxDispatcher<O: NotificationOutbox, N: Notifier> {
    outbox: O,
    notifier: N,
    settings: OutboxSettings,
}

impl<O: NotificationOutbox, N: Notifier> OutboxDispatcher<O, N> {
    pub fn new(outbox: O, notifier: N, settings: OutboxSettings) -> Self {
        Self {
            outbox,
            notifier,
            settings,
        }
    }

    /// Polls forever. Errors are logged and retried on the next tick.
    pub async fn run(self) {
        tracing::info!(
            poll_interval_seconds = self.settings.poll_interval_seconds,
            batch_size = self.settings.batch_size,
            "outbox dispatcher starting"
        );
        let mut interval =
            tokio::time::interval(Duration::from_secs(self.settings.poll_interval_seconds.max(1)));
        loop {
            interval.tick().await;
            match self.dispatch_once().await {
                Ok(report) if report.delivered + report.failed > 0 => {
                    tracing::debug!(
                        delivered = report.delivered,
                        failed = report.failed,
                        "outbox batch dispatched"
                    );
                }
                Ok(_) => {}
                Err(err) => tracing::error!(error = %err, "failed to claim outbox entries"),
            }
        }
    }

    pub async fn dispatch_once(&self) -> Result<DispatchReport, RepositoryError> {
        let entries = self
            .outbox
            .claim_pending(self.settings.batch_size, self.settings.max_attempts)
            .await?;

        let mut report = DispatchReport::default();
        for entry in entries {
            if self.deliver(&entry).await {
                report.delivered += 1;
            } else {
                report.failed += 1;
            }
        }
        Ok(report)
    }

    /// Hands one entry to the notifier and records the outcome.
    /// A failed mark leaves the claim to expire; the batch carries on.
    async fn deliver(&self, entry: &OutboxEntry) -> bool {
        match self.notifier.deliver(entry).await {
            Ok(()) => match self.outbox.mark_delivered(entry.id, Utc::now()).await {
                Ok(()) => true,
                Err(err) => {
                    tracing::error!(
                        dedupe_key = %entry.notification.dedupe_key,
                        error = %err,
                        "notification sent but not marked delivered"
                    );
                    false
                }
            },
            Err(err) => {
                let exhausted = entry.attempts >= self.settings.max_attempts;
                if exhausted {
                    tracing::error!(
                        dedupe_key = %entry.notification.dedupe_key,
                        attempts = entry.attempts,
                        error = %err,
                        "notification dropped after last attempt"
                    );
                } else {
                    tracing::warn!(
                        dedupe_key = %entry.notification.dedupe_key,
                        attempts = entry.attempts,
                        error = %err,
                        "notification delivery failed"
                    );
                }
                if let Err(mark_err) = self.outbox.mark_failed(entry.id, &err.to_string()).await {
                    tracing::error!(
                        dedupe_key = %entry.notification.dedupe_key,
                        error = %mark_err,
                        "failed to record delivery failure"
                    );
                }
                false
            }
        }
    }
}

/// Writes notifications to the log instead of sending mail
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn deliver(&self, entry: &OutboxEntry) -> Result<(), anyhow::Error> {
        let notification = &entry.notification;
        tracing::info!(
            notification_type = %notification.notification_type,
            to = %notification.to_email,
            dedupe_key = %notification.dedupe_key,
            payload = %notification.payload,
            "notification delivered"
        );
        Ok(())
    }
}
