use crate::{
    error::AppError,
    gate::{CurrentUser, TeacherUser},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use core_types::{form::blank_as_none, NewReaction, NewReactionExperiment, ReactionDetail};
use database::{OptionalFallback, ReadFallback};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Body of `POST /reactions/add`. Equipment arrives as a comma-separated
/// list of ids, e.g. `equipment_ids=3,7`.
#[derive(Debug, Deserialize)]
pub struct ReactionForm {
    pub element1_id: i32,
    pub element2_id: i32,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub conditions: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub experiment_result: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub safety_warning: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub equipment_ids: Option<String>,
}

/// Body of `POST /api/reaction-experiment`. The teacher is taken from the
/// session, never from the payload.
#[derive(Debug, Deserialize)]
pub struct ReactionExperimentPayload {
    pub element1_id: i32,
    pub element2_id: i32,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub conditions: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub experiment_result: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub safety_warning: Option<String>,
    #[serde(default)]
    pub equipment_ids: Option<Vec<i32>>,
}

impl ReactionExperimentPayload {
    fn into_request(self, teacher_id: i32) -> NewReactionExperiment {
        NewReactionExperiment {
            teacher_id,
            element1_id: self.element1_id,
            element2_id: self.element2_id,
            product: self.product,
            conditions: self.conditions,
            experiment_result: self.experiment_result,
            safety_warning: self.safety_warning,
            equipment_ids: self.equipment_ids,
        }
    }
}

/// Parses `"3, 7,9"` into ids. Any non-numeric entry rejects the list.
pub fn parse_id_list(raw: &str) -> Result<Vec<i32>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i32>()
                .map_err(|_| AppError::BadRequest(format!("'{part}' is not a valid equipment id")))
        })
        .collect()
}

/// # GET /reactions
pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Json<Vec<ReactionDetail>> {
    Json(state.db_repo.list_reactions().await.or_empty("list_reactions"))
}

/// # GET /reactions/:id
pub async fn detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(reaction_id): Path<i32>,
) -> Response {
    match state.db_repo.get_reaction(reaction_id).await.or_none("get_reaction") {
        Some(reaction) => Json(reaction).into_response(),
        None => Redirect::to("/reactions").into_response(),
    }
}

/// # POST /reactions/add
/// Creates the reaction and its first experiment in one transaction.
pub async fn add(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
    Form(form): Form<ReactionForm>,
) -> Result<Redirect, AppError> {
    let equipment_ids = form.equipment_ids.as_deref().map(parse_id_list).transpose()?;
    let request = NewReactionExperiment {
        teacher_id: teacher.user_id,
        element1_id: form.element1_id,
        element2_id: form.element2_id,
        product: form.product,
        conditions: form.conditions,
        experiment_result: form.experiment_result,
        safety_warning: form.safety_warning,
        equipment_ids,
    };
    state.db_repo.create_reaction_and_experiment(&request).await?;
    Ok(Redirect::to("/reactions"))
}

/// # POST /api/reaction-experiment
pub async fn create_with_experiment(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
    Json(payload): Json<ReactionExperimentPayload>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let request = payload.into_request(teacher.user_id);
    let created = state.db_repo.create_reaction_and_experiment(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "ok": true,
            "reaction_id": created.reaction_id,
            "experiment_id": created.experiment_id,
        })),
    ))
}

/// # GET /reactions/:id/edit
/// The reaction plus the catalogue to pick replacement elements from.
pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    TeacherUser(_teacher): TeacherUser,
    Path(reaction_id): Path<i32>,
) -> Response {
    let Some(reaction) = state.db_repo.get_reaction(reaction_id).await.or_none("get_reaction") else {
        return Redirect::to("/reactions").into_response();
    };
    let elements = state.db_repo.list_elements().await.or_empty("list_elements");
    Json(json!({ "page": "edit_reaction", "reaction": reaction, "elements": elements })).into_response()
}

/// # POST /reactions/:id/edit
pub async fn update(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
    Path(reaction_id): Path<i32>,
    Form(reaction): Form<NewReaction>,
) -> Result<Redirect, AppError> {
    if state.db_repo.update_reaction(reaction_id, &reaction).await? {
        tracing::info!(reaction_id, teacher_id = teacher.user_id, "Reaction updated");
    }
    Ok(Redirect::to("/reactions"))
}

/// # POST /reactions/:id/delete
pub async fn delete(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
    Path(reaction_id): Path<i32>,
) -> Result<Redirect, AppError> {
    if !state.db_repo.delete_reaction(reaction_id).await? {
        tracing::debug!(reaction_id, teacher_id = teacher.user_id, "Delete of missing reaction");
    }
    Ok(Redirect::to("/reactions"))
}
