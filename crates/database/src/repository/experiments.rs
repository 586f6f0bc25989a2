use super::reactions::DEFAULT_SAFETY_WARNING;
use super::DbRepository;
use crate::DbError;
use sqlx::{Postgres, Transaction};
use core_types::{
    CoreError, Experiment, ExperimentDetail, ExperimentEquipment, ParticipatedExperiment,
    SaveExperiment, SavedRun, UserAccount,
};

/// Result text stored on experiments created from the laboratory page.
pub(crate) const DEFAULT_RUN_RESULT: &str = "Experimental simulation";

const EXPERIMENT_DETAIL_SELECT: &str = r#"
    SELECT ex.experiment_id, ex.reaction_id, ex.result, ex.safety_warning, ex.created_at,
           r.product, r.conditions,
           e1.symbol AS element1_symbol, e1.element_name AS element1_name,
           e2.symbol AS element2_symbol, e2.element_name AS element2_name,
           u.user_name || ' ' || u.user_surname AS created_by
    FROM experiments AS ex
    JOIN reactions AS r ON r.reaction_id = ex.reaction_id
    JOIN elements AS e1 ON e1.element_id = r.element1_id
    JOIN elements AS e2 ON e2.element_id = r.element2_id
    JOIN users AS u ON u.user_id = ex.teacher_id
"#;

impl DbRepository {
    /// Inserts a standalone experiment for an existing reaction.
    pub async fn insert_experiment(
        &self,
        teacher_id: i32,
        reaction_id: i32,
        result: &str,
        safety_warning: Option<&str>,
    ) -> Result<i32, DbError> {
        let experiment_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO experiments (teacher_id, reaction_id, result, safety_warning, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING experiment_id
            "#,
        )
        .bind(teacher_id)
        .bind(reaction_id)
        .bind(result)
        .bind(safety_warning)
        .fetch_one(&self.pool)
        .await?;
        Ok(experiment_id)
    }

    pub async fn get_experiment(&self, experiment_id: i32) -> Result<Option<ExperimentDetail>, DbError> {
        let sql = format!("{EXPERIMENT_DETAIL_SELECT} WHERE ex.experiment_id = $1");
        let experiment = sqlx::query_as::<_, ExperimentDetail>(&sql)
            .bind(experiment_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(experiment)
    }

    /// An experiment with its equipment, loaded concurrently.
    pub async fn get_experiment_with_equipment(
        &self,
        experiment_id: i32,
    ) -> Result<Option<(ExperimentDetail, Vec<ExperimentEquipment>)>, DbError> {
        let (experiment, equipment) = tokio::try_join!(
            self.get_experiment(experiment_id),
            self.experiment_equipment(experiment_id)
        )?;
        Ok(experiment.map(|experiment| (experiment, equipment)))
    }

    /// Newest first.
    pub async fn list_experiments(&self) -> Result<Vec<ExperimentDetail>, DbError> {
        let sql = format!("{EXPERIMENT_DETAIL_SELECT} ORDER BY ex.created_at DESC, ex.experiment_id DESC");
        let experiments = sqlx::query_as::<_, ExperimentDetail>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(experiments)
    }

    pub async fn latest_experiment_for_reaction(
        &self,
        reaction_id: i32,
    ) -> Result<Option<Experiment>, DbError> {
        let experiment = sqlx::query_as::<_, Experiment>(
            r#"
            SELECT experiment_id, teacher_id, reaction_id, result, safety_warning, created_at
            FROM experiments
            WHERE reaction_id = $1
            ORDER BY created_at DESC, experiment_id DESC
            LIMIT 1
            "#,
        )
        .bind(reaction_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(experiment)
    }

    pub async fn experiment_equipment(&self, experiment_id: i32) -> Result<Vec<ExperimentEquipment>, DbError> {
        let equipment = sqlx::query_as::<_, ExperimentEquipment>(
            r#"
            SELECT le.equipment_id, le.equipment_name, le.equipment_type, le.safety_info
            FROM experiment_equipment AS ee
            JOIN lab_equipment AS le ON le.equipment_id = ee.equipment_id
            WHERE ee.experiment_id = $1
            ORDER BY le.equipment_name
            "#,
        )
        .bind(experiment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(equipment)
    }

    /// Attaches equipment to an experiment. Linking the same pair twice is a
    /// no-op; returns whether a new link was written.
    pub async fn link_equipment(&self, experiment_id: i32, equipment_id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO experiment_equipment (experiment_id, equipment_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(experiment_id)
        .bind(equipment_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Experiments a teacher authored, newest first.
    pub async fn experiments_created_by(&self, teacher_id: i32) -> Result<Vec<ExperimentDetail>, DbError> {
        let sql = format!(
            "{EXPERIMENT_DETAIL_SELECT} WHERE ex.teacher_id = $1 ORDER BY ex.created_at DESC, ex.experiment_id DESC"
        );
        let experiments = sqlx::query_as::<_, ExperimentDetail>(&sql)
            .bind(teacher_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(experiments)
    }

    /// Every participation of a user, most recent first. Repeat runs of the
    /// same experiment appear once per run.
    pub async fn experiments_participated_by(
        &self,
        user_id: i32,
    ) -> Result<Vec<ParticipatedExperiment>, DbError> {
        let experiments = sqlx::query_as::<_, ParticipatedExperiment>(
            r#"
            SELECT p.participation_id, ex.experiment_id, ex.reaction_id, ex.result, ex.safety_warning,
                   ex.created_at, r.product, r.conditions,
                   e1.symbol AS element1_symbol, e1.element_name AS element1_name,
                   e2.symbol AS element2_symbol, e2.element_name AS element2_name,
                   p.participated_at
            FROM experiment_participations AS p
            JOIN experiments AS ex ON ex.experiment_id = p.experiment_id
            JOIN reactions AS r ON r.reaction_id = ex.reaction_id
            JOIN elements AS e1 ON e1.element_id = r.element1_id
            JOIN elements AS e2 ON e2.element_id = r.element2_id
            WHERE p.user_id = $1
            ORDER BY p.participated_at DESC, p.participation_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(experiments)
    }

    /// Records that `user` ran a reaction.
    ///
    /// The most recent experiment of the reaction is reused. When there is
    /// none, one is created under the user's owning teacher (the teacher
    /// themselves, or a student's assigned teacher). The reaction row is
    /// locked for the whole transaction, so concurrent first runs of the same
    /// reaction share one experiment.
    pub async fn save_experiment(
        &self,
        user: &UserAccount,
        run: &SaveExperiment,
    ) -> Result<SavedRun, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT reaction_id FROM reactions WHERE reaction_id = $1 FOR UPDATE")
            .bind(run.reaction_id)
            .fetch_optional(&mut *tx)
            .await?;

        let existing: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT experiment_id
            FROM experiments
            WHERE reaction_id = $1
            ORDER BY created_at DESC, experiment_id DESC
            LIMIT 1
            "#,
        )
        .bind(run.reaction_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(experiment_id) = existing {
            let participation_id = insert_participation(&mut tx, user.user_id, experiment_id).await?;
            tx.commit().await?;
            return Ok(SavedRun {
                experiment_id,
                participation_id,
                created_experiment: false,
            });
        }

        let teacher_id = user.owning_teacher_id().ok_or_else(|| {
            CoreError::InvalidInput(
                "teacher_id".to_string(),
                "no teacher is responsible for this account".to_string(),
            )
        })?;

        let experiment_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO experiments (teacher_id, reaction_id, result, safety_warning, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING experiment_id
            "#,
        )
        .bind(teacher_id)
        .bind(run.reaction_id)
        .bind(run.result.as_deref().unwrap_or(DEFAULT_RUN_RESULT))
        .bind(run.safety_warning.as_deref().unwrap_or(DEFAULT_SAFETY_WARNING))
        .fetch_one(&mut *tx)
        .await?;

        let participation_id = insert_participation(&mut tx, user.user_id, experiment_id).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = user.user_id,
            reaction_id = run.reaction_id,
            experiment_id,
            "Created experiment on first run of reaction"
        );
        Ok(SavedRun {
            experiment_id,
            participation_id,
            created_experiment: true,
        })
    }
}

async fn insert_participation(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
    experiment_id: i32,
) -> Result<i32, DbError> {
    let participation_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO experiment_participations (user_id, experiment_id, participated_at)
        VALUES ($1, $2, NOW())
        RETURNING participation_id
        "#,
    )
    .bind(user_id)
    .bind(experiment_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(participation_id)
}
