use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use crate::app_state::AppState;

/// Forget the session cookie and return to the home page
pub async fn handler(State(app_state): State<AppState>) -> Response {
    let cookie = format!("{}=; HttpOnly; Max-Age=0; SameSite=Strict; Path=/;",
                         app_state.config().identity.cookie_name);
    log::debug!("logout");
    ([(SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}
