use super::DbRepository;
use crate::DbError;

impl DbRepository {
    /// Remembers that a user opened an element page. Only the first view of
    /// each pair is stored; returns whether this call stored it.
    pub async fn track_element_view(&self, user_id: i32, element_id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO element_views (user_id, element_id, viewed_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, element_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(element_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn track_equipment_view(&self, user_id: i32, equipment_id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO equipment_views (user_id, equipment_id, viewed_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, equipment_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(equipment_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Records one run of an experiment. Repeat runs each get their own row.
    pub async fn track_participation(&self, user_id: i32, experiment_id: i32) -> Result<i32, DbError> {
        let participation_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO experiment_participations (user_id, experiment_id, participated_at)
            VALUES ($1, $2, NOW())
            RETURNING participation_id
            "#,
        )
        .bind(user_id)
        .bind(experiment_id)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!(user_id, experiment_id, participation_id, "Participation recorded");
        Ok(participation_id)
    }
}
