use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::domain::notification::{Notification, OutboxEntry};
use crate::domain::repository::{NotificationOutbox, RepositoryError};
use crate::infrastructure::persistence::PostgresRepository;
use crate::infrastructure::persistence::rows::OutboxRow;

/// Claims older than this are treated as abandoned by a crashed dispatcher.
const CLAIM_TIMEOUT_SECONDS: i64 = 300;

/// Returns false when a row with the same dedupe key exists.
pub(super) async fn insert_notification(
    conn: &mut PgConnection,
    notification: &Notification,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO notification_outbox (id, notification_type, to_email, dedupe_key, payload) \
         VALUES ($1, $2, $3, $4, $5) ON CONFLICT (dedupe_key) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(notification.notification_type.as_str())
    .bind(&notification.to_email)
    .bind(&notification.dedupe_key)
    .bind(&notification.payload)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

impl NotificationOutbox for PostgresRepository {
    async fn claim_pending(
        &self,
        limit: u32,
        max_attempts: i32,
    ) -> Result<Vec<OutboxEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, OutboxRow>(
            r#"
            WITH next_entries AS (
                SELECT id
                FROM notification_outbox
                WHERE delivered_at IS NULL
                    AND attempts < $2
                    AND (claimed_at IS NULL OR claimed_at < now() - make_interval(secs => $3))
                ORDER BY created_at
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            UPDATE notification_outbox
            SET claimed_at = now(),
                attempts = attempts + 1
            WHERE id IN (SELECT id FROM next_entries)
            RETURNING id, notification_type, to_email, dedupe_key, payload, attempts, created_at
            "#,
        )
        .bind(i64::from(limit))
        .bind(max_attempts)
        .bind(CLAIM_TIMEOUT_SECONDS as f64)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(OutboxEntry::try_from).collect()
    }

    async fn mark_delivered(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE notification_outbox SET delivered_at = $2, claimed_at = NULL, last_error = NULL \
             WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE notification_outbox SET last_error = $2, claimed_at = NULL WHERE id = $1")
            .bind(id)
            .bind(error)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
