//! Access control as axum extractors.
//!
//! A handler that takes [`CurrentUser`] only runs for a logged-in user; one
//! that takes [`TeacherUser`] only runs for a teacher. Everyone else is sent
//! to the login page with a `303 See Other`, never a bare 401/403.

use crate::session::SessionUser;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use uuid::Uuid;

pub const LOGIN_PATH: &str = "/login";

/// Rejection for gated routes.
#[derive(Debug)]
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

/// Reads the session id from the cookie and resolves it.
pub fn session_from_parts(parts: &Parts, state: &AppState) -> Option<(Uuid, SessionUser)> {
    let jar = CookieJar::from_headers(&parts.headers);
    let id = jar
        .get(state.cookie_name())
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())?;
    state.sessions.get(&id).map(|user| (id, user))
}

/// Any logged-in user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        session_from_parts(parts, state)
            .map(|(_, user)| CurrentUser(user))
            .ok_or(LoginRedirect)
    }
}

/// A logged-in teacher. Students are treated like anonymous visitors.
#[derive(Debug, Clone)]
pub struct TeacherUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for TeacherUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match session_from_parts(parts, state) {
            Some((_, user)) if user.role.is_teacher() => Ok(TeacherUser(user)),
            Some((_, user)) => {
                tracing::warn!(user_id = user.user_id, path = %parts.uri.path(), "Student refused from teacher route");
                Err(LoginRedirect)
            }
            None => Err(LoginRedirect),
        }
    }
}
