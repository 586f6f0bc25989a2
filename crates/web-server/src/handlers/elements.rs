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
use core_types::{Element, NewElement};
use database::{OptionalFallback, ReadFallback};
use serde_json::json;
use std::sync::Arc;

/// # GET /elements
pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Json<Vec<Element>> {
    Json(state.db_repo.list_elements().await.or_empty("list_elements"))
}

/// # GET /elements/:id
/// Shows one element and remembers that the user looked at it.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(element_id): Path<i32>,
) -> Response {
    let Some(element) = state.db_repo.get_element(element_id).await.or_none("get_element") else {
        return Redirect::to("/elements").into_response();
    };

    if let Err(e) = state.db_repo.track_element_view(user.user_id, element_id).await {
        tracing::warn!(error = %e, element_id, "Could not record element view");
    }
    Json(element).into_response()
}

/// # POST /elements/add
pub async fn add(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
    Form(element): Form<NewElement>,
) -> Result<Redirect, AppError> {
    state.db_repo.add_element(teacher.user_id, &element).await?;
    Ok(Redirect::to("/dashboard"))
}

/// # GET /elements/:id/edit
pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    TeacherUser(_teacher): TeacherUser,
    Path(element_id): Path<i32>,
) -> Response {
    match state.db_repo.get_element(element_id).await.or_none("get_element") {
        Some(element) => Json(json!({ "page": "edit_element", "element": element })).into_response(),
        None => Redirect::to("/elements").into_response(),
    }
}

/// # POST /elements/:id/edit
pub async fn update(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
    Path(element_id): Path<i32>,
    Form(element): Form<NewElement>,
) -> Result<Redirect, AppError> {
    if state.db_repo.update_element(element_id, &element).await? {
        tracing::info!(element_id, teacher_id = teacher.user_id, "Element updated");
    }
    Ok(Redirect::to("/elements"))
}
