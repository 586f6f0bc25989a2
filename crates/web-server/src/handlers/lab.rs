use crate::{error::AppError, gate::CurrentUser, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use core_types::{ElementDetail, SaveExperiment};
use database::{OptionalFallback, ReadFallback};
use serde::Deserialize;
use serde_json::json;
use simulation::{Reactant, SimulationInput};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CheckReactionRequest {
    #[serde(default)]
    pub element1: String,
    #[serde(default)]
    pub element2: String,
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub element1_id: i32,
    pub element2_id: i32,
    /// Scales the reactivity; 1.0 when omitted.
    pub amount: Option<f64>,
}

fn reactant(element: &ElementDetail) -> Reactant {
    Reactant {
        atomic_number: Some(element.element.atomic_number),
        hazard_type: element.element.hazard_type.clone(),
    }
}

fn element_summary(element: &ElementDetail) -> serde_json::Value {
    json!({
        "id": element.element.element_id,
        "symbol": element.element.symbol,
        "name": element.element.element_name,
    })
}

/// # GET /laboratory
pub async fn laboratory(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Json<serde_json::Value> {
    let elements = state.db_repo.list_elements().await.or_empty("list_elements");
    Json(json!({ "page": "laboratory", "role": user.role, "elements": elements }))
}

/// # POST /api/check-reaction
/// Looks up the reaction between two symbols in either order.
pub async fn check_reaction(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Json(request): Json<CheckReactionRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let (symbol1, symbol2) = (request.element1.trim(), request.element2.trim());
    if symbol1.is_empty() || symbol2.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Two element symbols are required" })),
        );
    }
    if symbol1.eq_ignore_ascii_case(symbol2) {
        return (
            StatusCode::OK,
            Json(json!({ "success": false, "message": "An element cannot react with itself" })),
        );
    }

    let found = state
        .db_repo
        .find_reaction_by_symbols(symbol1, symbol2)
        .await
        .or_none("find_reaction_by_symbols");

    let body = match found {
        Some(reaction) => json!({
            "success": true,
            "reaction_id": reaction.reaction.reaction_id,
            "product": reaction.reaction.product,
            "conditions": reaction.reaction.conditions,
            "elements": format!("{symbol1}+{symbol2}"),
        }),
        None => json!({
            "success": false,
            "message": "No reaction is defined for this combination",
        }),
    };
    (StatusCode::OK, Json(body))
}

/// # POST /api/simulate-reaction
/// Temperature curve for mixing two elements.
pub async fn simulate_reaction(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Json(request): Json<SimulateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (first, second, reaction) = tokio::try_join!(
        state.db_repo.get_element(request.element1_id),
        state.db_repo.get_element(request.element2_id),
        state
            .db_repo
            .find_reaction_by_elements(request.element1_id, request.element2_id)
    )?;
    let (Some(first), Some(second)) = (first, second) else {
        return Err(AppError::NotFound("Element not found".to_string()));
    };

    let input = SimulationInput {
        first: reactant(&first),
        second: reactant(&second),
        reaction_known: reaction.is_some(),
        amount: request.amount.unwrap_or(1.0),
    };
    let reactivity = state.simulator.reactivity(&input)?;
    let curve = state.simulator.curve(reactivity);

    Ok(Json(json!({
        "success": true,
        "reaction_known": reaction.is_some(),
        "reaction_id": reaction.as_ref().map(|r| r.reaction_id),
        "product": reaction.as_ref().and_then(|r| r.product.clone()),
        "conditions": reaction.as_ref().and_then(|r| r.conditions.clone()),
        "e1": element_summary(&first),
        "e2": element_summary(&second),
        "reactivity": reactivity,
        "peak_temperature": curve.peak(),
        "time": curve.time,
        "temperature": curve.temperature,
    })))
}

/// # POST /save-experiment
/// Records that the user ran a reaction.
pub async fn save_experiment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(run): Json<SaveExperiment>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Some(account) = state.db_repo.get_user(user.user_id).await? else {
        return Err(AppError::Unauthorized("Account no longer exists".to_string()));
    };

    let saved = state.db_repo.save_experiment(&account, &run).await?;
    Ok(Json(json!({
        "success": true,
        "experiment_id": saved.experiment_id,
        "participation_id": saved.participation_id,
        "created_experiment": saved.created_experiment,
    })))
}
