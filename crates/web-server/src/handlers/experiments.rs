use crate::{gate::CurrentUser, state::AppState};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use core_types::{ExperimentDetail, ParticipatedExperiment, Role};
use database::{OptionalFallback, ReadFallback};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// `/my-experiments` differs by role: students see their runs, teachers the
/// experiments they authored.
#[derive(Debug, Serialize)]
#[serde(tag = "role", content = "experiments", rename_all = "lowercase")]
pub enum MyExperiments {
    Student(Vec<ParticipatedExperiment>),
    Teacher(Vec<ExperimentDetail>),
}

/// # GET /experiments
pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Json<Vec<ExperimentDetail>> {
    Json(state.db_repo.list_experiments().await.or_empty("list_experiments"))
}

/// # GET /experiments/:id
pub async fn detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(experiment_id): Path<i32>,
) -> Response {
    match state
        .db_repo
        .get_experiment_with_equipment(experiment_id)
        .await
        .or_none("get_experiment_with_equipment")
    {
        Some((experiment, equipment)) => {
            Json(json!({ "experiment": experiment, "equipment": equipment })).into_response()
        }
        None => Redirect::to("/experiments").into_response(),
    }
}

/// # GET /my-experiments
pub async fn mine(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Json<MyExperiments> {
    let experiments = match user.role {
        Role::Student => MyExperiments::Student(
            state
                .db_repo
                .experiments_participated_by(user.user_id)
                .await
                .or_empty("experiments_participated_by"),
        ),
        Role::Teacher => MyExperiments::Teacher(
            state
                .db_repo
                .experiments_created_by(user.user_id)
                .await
                .or_empty("experiments_created_by"),
        ),
    };
    Json(experiments)
}
