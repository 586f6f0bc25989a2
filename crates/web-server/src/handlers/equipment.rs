use crate::{
    error::AppError,
    gate::{CurrentUser, TeacherUser},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use core_types::{LabEquipment, NewEquipment};
use database::{OptionalFallback, ReadFallback};
use serde_json::json;
use std::sync::Arc;

/// # GET /equipment
pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Json<Vec<LabEquipment>> {
    Json(state.db_repo.list_equipment().await.or_empty("list_equipment"))
}

/// # GET /equipment/:id
pub async fn detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(equipment_id): Path<i32>,
) -> Response {
    let Some(equipment) = state
        .db_repo
        .get_equipment(equipment_id)
        .await
        .or_none("get_equipment")
    else {
        return Redirect::to("/equipment").into_response();
    };

    if let Err(e) = state.db_repo.track_equipment_view(user.user_id, equipment_id).await {
        tracing::warn!(error = %e, equipment_id, "Could not record equipment view");
    }
    Json(equipment).into_response()
}

/// # POST /equipment/add
pub async fn add(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
    Form(equipment): Form<NewEquipment>,
) -> Result<Redirect, AppError> {
    state.db_repo.add_equipment(teacher.user_id, &equipment).await?;
    Ok(Redirect::to("/dashboard"))
}

/// # GET /equipment/:id/edit
pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    TeacherUser(_teacher): TeacherUser,
    Path(equipment_id): Path<i32>,
) -> Response {
    match state.db_repo.get_equipment(equipment_id).await.or_none("get_equipment") {
        Some(equipment) => {
            Json(json!({ "page": "edit_equipment", "equipment": equipment })).into_response()
        }
        None => Redirect::to("/equipment").into_response(),
    }
}

/// # POST /equipment/:id/edit
pub async fn update(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
    Path(equipment_id): Path<i32>,
    Form(equipment): Form<NewEquipment>,
) -> Result<Redirect, AppError> {
    if state.db_repo.update_equipment(equipment_id, &equipment).await? {
        tracing::info!(equipment_id, teacher_id = teacher.user_id, "Equipment updated");
    }
    Ok(Redirect::to("/equipment"))
}
