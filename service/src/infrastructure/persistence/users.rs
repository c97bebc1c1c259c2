use chrono::{DateTime, Utc};
use vernissage_common::{OnboardingFlag, UserId};

use crate::domain::identity::{Actor, User};
use crate::domain::repository::{OnboardingFlags, RepositoryError, Sessions};
use crate::infrastructure::persistence::PostgresRepository;
use crate::infrastructure::persistence::rows::UserRow;

impl Sessions for PostgresRepository {
    async fn resolve_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Actor>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT u.id, u.email, u.display_name, u.role \
             FROM sessions s JOIN users u ON u.id = s.user_id \
             WHERE s.token = $1 AND s.expires_at > $2",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(self.pool())
        .await?;

        row.map(|row| User::try_from(row).map(Actor::from))
            .transpose()
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, UserRow>("SELECT id, email, display_name, role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .map(User::try_from)
            .transpose()
    }
}

impl OnboardingFlags for PostgresRepository {
    async fn set_flag(&self, user_id: UserId, flag: OnboardingFlag) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO onboarding_flags (user_id, flag) VALUES ($1, $2) \
             ON CONFLICT (user_id, flag) DO NOTHING",
        )
        .bind(user_id)
        .bind(flag.as_str())
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
