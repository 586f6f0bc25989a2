use super::DbRepository;
use crate::DbError;
use core_types::{CreatedReaction, NewReaction, NewReactionExperiment, Reaction, ReactionDetail};
use sqlx::{Postgres, Transaction};

/// Safety note stored on experiments that were created without one.
pub(crate) const DEFAULT_SAFETY_WARNING: &str = "Standard safety measures";

const REACTION_DETAIL_SELECT: &str = r#"
    SELECT r.reaction_id, r.teacher_id, r.element1_id, r.element2_id, r.product, r.conditions,
           e1.symbol AS element1_symbol, e1.element_name AS element1_name,
           e2.symbol AS element2_symbol, e2.element_name AS element2_name,
           u.user_name || ' ' || u.user_surname AS created_by
    FROM reactions AS r
    JOIN elements AS e1 ON e1.element_id = r.element1_id
    JOIN elements AS e2 ON e2.element_id = r.element2_id
    JOIN users AS u ON u.user_id = r.teacher_id
"#;

/// The experiment description used when the teacher leaves the result blank.
///
/// Must stay in step with `create_reaction_and_experiment_fn` so both
/// creation paths write the same text.
pub fn synthesize_result(
    symbol1: &str,
    symbol2: &str,
    conditions: Option<&str>,
    product: Option<&str>,
) -> String {
    let conditions = non_blank(conditions).unwrap_or("standard");
    let product = non_blank(product).unwrap_or("unknown");
    format!("Experiment with {symbol1} and {symbol2} under {conditions}; expected product {product}")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl DbRepository {
    /// Creates a reaction and its first experiment, with equipment links, as
    /// one unit: either every row is written or none is.
    pub async fn create_reaction_and_experiment(
        &self,
        request: &NewReactionExperiment,
    ) -> Result<CreatedReaction, DbError> {
        request.validate()?;

        if self.prefer_stored_procedure {
            match self.create_via_stored_procedure(request).await {
                Err(DbError::MissingRoutine(routine)) => {
                    tracing::warn!(%routine, "Stored procedure missing; using client-side transaction");
                }
                outcome => return outcome,
            }
        }

        self.create_in_transaction(request).await
    }

    async fn create_in_transaction(
        &self,
        request: &NewReactionExperiment,
    ) -> Result<CreatedReaction, DbError> {
        // Dropping `tx` on an early return rolls everything back.
        let mut tx = self.pool.begin().await?;

        let reaction_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO reactions (teacher_id, element1_id, element2_id, product, conditions)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING reaction_id
            "#,
        )
        .bind(request.teacher_id)
        .bind(request.element1_id)
        .bind(request.element2_id)
        .bind(&request.product)
        .bind(&request.conditions)
        .fetch_one(&mut *tx)
        .await?;

        let result = match non_blank(request.experiment_result.as_deref()) {
            Some(result) => result.to_string(),
            None => {
                let (symbol1, symbol2) = element_symbols(&mut tx, request).await?;
                synthesize_result(
                    &symbol1,
                    &symbol2,
                    request.conditions.as_deref(),
                    request.product.as_deref(),
                )
            }
        };
        let safety_warning = non_blank(request.safety_warning.as_deref())
            .unwrap_or(DEFAULT_SAFETY_WARNING)
            .to_string();

        let experiment_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO experiments (teacher_id, reaction_id, result, safety_warning, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING experiment_id
            "#,
        )
        .bind(request.teacher_id)
        .bind(reaction_id)
        .bind(&result)
        .bind(&safety_warning)
        .fetch_one(&mut *tx)
        .await?;

        let equipment_ids = request.unique_equipment_ids();
        if !equipment_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO experiment_equipment (experiment_id, equipment_id)
                SELECT $1, UNNEST($2::INTEGER[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(experiment_id)
            .bind(&equipment_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            reaction_id,
            experiment_id,
            equipment = equipment_ids.len(),
            teacher_id = request.teacher_id,
            "Created reaction with its first experiment"
        );
        Ok(CreatedReaction {
            reaction_id,
            experiment_id,
        })
    }

    async fn create_via_stored_procedure(
        &self,
        request: &NewReactionExperiment,
    ) -> Result<CreatedReaction, DbError> {
        let created = sqlx::query_as::<_, CreatedReaction>(
            r#"
            SELECT new_reaction_id AS reaction_id, new_experiment_id AS experiment_id
            FROM create_reaction_and_experiment_fn($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(request.teacher_id)
        .bind(request.element1_id)
        .bind(request.element2_id)
        .bind(&request.product)
        .bind(&request.conditions)
        .bind(&request.experiment_result)
        .bind(&request.safety_warning)
        .bind(request.unique_equipment_ids())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            reaction_id = created.reaction_id,
            experiment_id = created.experiment_id,
            "Created reaction with its first experiment (stored procedure)"
        );
        Ok(created)
    }

    /// Inserts a bare reaction without an experiment.
    pub async fn add_reaction(&self, teacher_id: i32, reaction: &NewReaction) -> Result<i32, DbError> {
        reaction.validate()?;
        let reaction_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO reactions (teacher_id, element1_id, element2_id, product, conditions)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING reaction_id
            "#,
        )
        .bind(teacher_id)
        .bind(reaction.element1_id)
        .bind(reaction.element2_id)
        .bind(&reaction.product)
        .bind(&reaction.conditions)
        .fetch_one(&self.pool)
        .await?;
        Ok(reaction_id)
    }

    pub async fn update_reaction(&self, reaction_id: i32, reaction: &NewReaction) -> Result<bool, DbError> {
        reaction.validate()?;
        let result = sqlx::query(
            r#"
            UPDATE reactions
            SET element1_id = $1, element2_id = $2, product = $3, conditions = $4
            WHERE reaction_id = $5
            "#,
        )
        .bind(reaction.element1_id)
        .bind(reaction.element2_id)
        .bind(&reaction.product)
        .bind(&reaction.conditions)
        .bind(reaction_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes a reaction together with its experiments, their equipment
    /// links and participations. Returns `false` if the reaction did not exist.
    pub async fn delete_reaction(&self, reaction_id: i32) -> Result<bool, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM experiment_equipment
            WHERE experiment_id IN (SELECT experiment_id FROM experiments WHERE reaction_id = $1)
            "#,
        )
        .bind(reaction_id)
        .execute(&mut *tx)
        .await?;

        let participations = sqlx::query(
            r#"
            DELETE FROM experiment_participations
            WHERE experiment_id IN (SELECT experiment_id FROM experiments WHERE reaction_id = $1)
            "#,
        )
        .bind(reaction_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let experiments = sqlx::query("DELETE FROM experiments WHERE reaction_id = $1")
            .bind(reaction_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM reactions WHERE reaction_id = $1")
            .bind(reaction_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        tx.commit().await?;

        if deleted {
            tracing::info!(reaction_id, experiments, participations, "Reaction deleted");
        }
        Ok(deleted)
    }

    pub async fn get_reaction(&self, reaction_id: i32) -> Result<Option<ReactionDetail>, DbError> {
        let sql = format!("{REACTION_DETAIL_SELECT} WHERE r.reaction_id = $1");
        let reaction = sqlx::query_as::<_, ReactionDetail>(&sql)
            .bind(reaction_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reaction)
    }

    /// Newest reactions first.
    pub async fn list_reactions(&self) -> Result<Vec<ReactionDetail>, DbError> {
        let sql = format!("{REACTION_DETAIL_SELECT} ORDER BY r.reaction_id DESC");
        let reactions = sqlx::query_as::<_, ReactionDetail>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(reactions)
    }

    /// Finds the reaction between two elements regardless of their order.
    pub async fn find_reaction_by_elements(
        &self,
        element1_id: i32,
        element2_id: i32,
    ) -> Result<Option<Reaction>, DbError> {
        let reaction = sqlx::query_as::<_, Reaction>(
            r#"
            SELECT reaction_id, teacher_id, element1_id, element2_id, product, conditions
            FROM reactions
            WHERE (element1_id = $1 AND element2_id = $2)
               OR (element1_id = $2 AND element2_id = $1)
            ORDER BY reaction_id
            LIMIT 1
            "#,
        )
        .bind(element1_id)
        .bind(element2_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(reaction)
    }

    /// Same as [`Self::find_reaction_by_elements`] keyed by symbols, which
    /// are compared without regard to case.
    pub async fn find_reaction_by_symbols(
        &self,
        symbol1: &str,
        symbol2: &str,
    ) -> Result<Option<ReactionDetail>, DbError> {
        let sql = format!(
            r#"{REACTION_DETAIL_SELECT}
            WHERE (UPPER(e1.symbol) = UPPER($1) AND UPPER(e2.symbol) = UPPER($2))
               OR (UPPER(e1.symbol) = UPPER($2) AND UPPER(e2.symbol) = UPPER($1))
            ORDER BY r.reaction_id
            LIMIT 1
            "#
        );
        let reaction = sqlx::query_as::<_, ReactionDetail>(&sql)
            .bind(symbol1.trim())
            .bind(symbol2.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(reaction)
    }
}

async fn element_symbols(
    tx: &mut Transaction<'_, Postgres>,
    request: &NewReactionExperiment,
) -> Result<(String, String), DbError> {
    let symbols = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT e1.symbol, e2.symbol
        FROM elements AS e1, elements AS e2
        WHERE e1.element_id = $1 AND e2.element_id = $2
        "#,
    )
    .bind(request.element1_id)
    .bind(request.element2_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(symbols)
}
