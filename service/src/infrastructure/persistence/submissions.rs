use sqlx::{Acquire, PgConnection};
use vernissage_common::SubmissionId;

use crate::domain::page::Page;
use crate::domain::repository::{RepositoryError, SubmissionFilter, SubmissionRepository, Transition};
use crate::domain::submission::{Submission, SubmissionTarget};
use crate::infrastructure::persistence::PostgresRepository;
use crate::infrastructure::persistence::content::apply_publication;
use crate::infrastructure::persistence::outbox::insert_notification;
use crate::infrastructure::persistence::rows::{SUBMISSION_COLUMNS, SubmissionRow};

pub(super) async fn insert_submission(
    conn: &mut PgConnection,
    submission: &Submission,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO submissions (id, submission_type, kind, status, submitter_user_id, \
         target_id, note, decision_reason, submitted_at, decided_at, decided_by_user_id, \
         version, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(submission.id)
    .bind(submission.target.submission_type().as_str())
    .bind(submission.kind.map(|kind| kind.as_str()))
    .bind(submission.status.as_str())
    .bind(submission.submitter_user_id)
    .bind(submission.target.target_id())
    .bind(&submission.note)
    .bind(&submission.decision_reason)
    .bind(submission.submitted_at)
    .bind(submission.decided_at)
    .bind(submission.decided_by_user_id)
    .bind(submission.version)
    .bind(submission.created_at)
    .bind(submission.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Compare-and-swap on the row version. Zero rows means someone else moved it first.
async fn update_submission(
    conn: &mut PgConnection,
    submission: &Submission,
    expected_version: i32,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        "UPDATE submissions SET kind = $3, status = $4, submitter_user_id = $5, note = $6, \
         decision_reason = $7, submitted_at = $8, decided_at = $9, decided_by_user_id = $10, \
         version = $11, updated_at = $12 \
         WHERE id = $1 AND version = $2",
    )
    .bind(submission.id)
    .bind(expected_version)
    .bind(submission.kind.map(|kind| kind.as_str()))
    .bind(submission.status.as_str())
    .bind(submission.submitter_user_id)
    .bind(&submission.note)
    .bind(&submission.decision_reason)
    .bind(submission.submitted_at)
    .bind(submission.decided_at)
    .bind(submission.decided_by_user_id)
    .bind(submission.version)
    .bind(submission.updated_at)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::Conflict);
    }
    Ok(())
}

fn into_submissions(rows: Vec<SubmissionRow>) -> Result<Vec<Submission>, RepositoryError> {
    rows.into_iter().map(Submission::try_from).collect()
}

impl SubmissionRepository for PostgresRepository {
    async fn find_submission(&self, id: SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        let sql = format!("SELECT {} FROM submissions WHERE id = $1", SUBMISSION_COLUMNS);
        sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .map(Submission::try_from)
            .transpose()
    }

    async fn latest_submission(
        &self,
        target: SubmissionTarget,
    ) -> Result<Option<Submission>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM submissions WHERE submission_type = $1 AND target_id = $2 \
             ORDER BY created_at DESC, id DESC LIMIT 1",
            SUBMISSION_COLUMNS
        );
        sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(target.submission_type().as_str())
            .bind(target.target_id())
            .fetch_optional(self.pool())
            .await?
            .map(Submission::try_from)
            .transpose()
    }

    async fn list_submissions(
        &self,
        filter: SubmissionFilter,
        page: Page,
    ) -> Result<Vec<Submission>, RepositoryError> {
        let limit = i64::from(page.limit);
        let offset = i64::from(page.offset);

        let rows = match filter {
            SubmissionFilter::Status(status) => {
                let sql = format!(
                    "SELECT {} FROM submissions WHERE status = $1 \
                     ORDER BY submitted_at ASC NULLS LAST, created_at ASC LIMIT $2 OFFSET $3",
                    SUBMISSION_COLUMNS
                );
                sqlx::query_as::<_, SubmissionRow>(&sql)
                    .bind(status.as_str())
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(self.pool())
                    .await?
            }
            SubmissionFilter::Submitter(user_id) => {
                let sql = format!(
                    "SELECT {} FROM submissions WHERE submitter_user_id = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                    SUBMISSION_COLUMNS
                );
                sqlx::query_as::<_, SubmissionRow>(&sql)
                    .bind(user_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(self.pool())
                    .await?
            }
        };
        into_submissions(rows)
    }

    async fn record_transition(&self, transition: Transition) -> Result<(), RepositoryError> {
        let Transition {
            submission,
            expected_version,
            publication,
            notification,
        } = transition;

        let mut tx = self.pool().begin().await?;
        match expected_version {
            Some(expected) => update_submission(&mut tx, &submission, expected).await?,
            None => insert_submission(&mut tx, &submission).await?,
        }
        if let Some(change) = publication {
            apply_publication(&mut tx, change).await?;
        }

        // The outbox write runs in a savepoint so its failure leaves the transition intact.
        if let Some(notification) = notification {
            let mut savepoint = tx.begin().await?;
            match insert_notification(&mut savepoint, &notification).await {
                Ok(queued) => {
                    savepoint.commit().await?;
                    if !queued {
                        tracing::debug!(dedupe_key = %notification.dedupe_key, "notification already queued");
                    }
                }
                Err(err) => {
                    savepoint.rollback().await?;
                    tracing::warn!(dedupe_key = %notification.dedupe_key, error = %err, "notification not queued");
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }
}
