use crate::{error::AppError, session::SessionUser, state::AppState};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use core_types::{form::empty_as_none, NewUser, Role};
use database::ReadFallback;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub teacher_id: Option<i32>,
}

impl RegisterForm {
    /// Only students carry a teacher; a teacher id sent along with a teacher
    /// registration is ignored.
    fn teacher_id(&self) -> Option<i32> {
        match self.role {
            Role::Student => self.teacher_id,
            Role::Teacher => None,
        }
    }
}

/// # GET /login
pub async fn login_page() -> Json<serde_json::Value> {
    Json(json!({ "page": "login", "fields": ["email", "password"] }))
}

/// # POST /login
/// Verifies the credentials, starts a session and sends the user to the
/// dashboard.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Some(account) = state.db_repo.find_user_by_email(&form.email).await? else {
        tracing::info!("Login failed: unknown email");
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    };

    // Hashing blocks; run it on the blocking pool.
    let hasher = state.hasher;
    let stored = account.password.clone();
    let password = form.password;
    let valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::info!(user_id = account.user_id, "Login failed: wrong password");
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    }

    let session_id = state.sessions.create(SessionUser::from(&account));
    tracing::info!(user_id = account.user_id, role = %account.role, "User logged in");

    let jar = jar.add(session_cookie(state.cookie_name(), session_id));
    Ok((jar, Redirect::to("/dashboard")).into_response())
}

/// # GET /register
/// Lists the teachers a new student can choose from.
pub async fn register_page(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let teachers = state.db_repo.list_teachers().await.or_empty("list_teachers");
    Json(json!({ "page": "register", "teachers": teachers }))
}

/// # POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    if form.password.is_empty() {
        return Err(AppError::BadRequest("Password must not be empty".to_string()));
    }
    if form.email.trim().is_empty() {
        return Err(AppError::BadRequest("Email must not be empty".to_string()));
    }

    let hasher = state.hasher;
    let password = form.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = NewUser {
        name: form.name.trim().to_string(),
        surname: form.surname.trim().to_string(),
        email: form.email.trim().to_string(),
        password_hash,
        role: form.role,
        teacher_id: form.teacher_id(),
    };
    state.db_repo.register_user(&user).await?;
    Ok(Redirect::to("/login"))
}

/// # GET /logout
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let session_id = jar
        .get(state.cookie_name())
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());
    if let Some(id) = session_id {
        state.sessions.remove(&id);
    }
    let jar = jar.remove(Cookie::build(state.cookie_name().to_string()).path("/"));
    (jar, Redirect::to("/"))
}

fn session_cookie(name: &str, id: Uuid) -> Cookie<'static> {
    Cookie::build((name.to_string(), id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
