use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use crate::app_state::AppState;
use crate::identity::AuthenticatedIdentity;
use super::HttpError;


/// Extractor for the identity of the current visitor.
/// Contains None for anonymous visitors.
pub struct CurrentIdentity(pub Option<AuthenticatedIdentity>);


#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let identity = app_state.identity_provider().identify(&parts.headers)?;
        Ok(Self(identity))
    }
}
