use axum::extract::State;
use axum::response::{IntoResponse, Response};
use crate::app_state::AppState;
use crate::http::http_user::CurrentIdentity;
use crate::http::HttpError;
use crate::identity::{AuthenticatedIdentity, IdentityError};
use crate::view::ViewModel;
use super::html_template;

/// logical name of the view rendered by the home page
pub const VIEW_NAME: &str = "home";


/// The view model of the home page: a copy of the visitor's attributes, empty for anonymous visitors
pub fn view_model(identity: Option<&AuthenticatedIdentity>) -> Result<ViewModel, IdentityError> {
    let mut model = ViewModel::new();
    if let Some(identity) = identity {
        for (key, value) in identity.attributes()? {
            model.insert(key.clone(), value.clone());
        }
    }
    Ok(model)
}


pub async fn handler(State(app_state): State<AppState>,
                     CurrentIdentity(identity): CurrentIdentity,
) -> Result<Response, HttpError> {
    let model = view_model(identity.as_ref())?;
    log::debug!("rendering view '{}' with {} attributes", VIEW_NAME, model.len());
    let body = app_state.renderer().render(VIEW_NAME, &model)?;

    let mut html = html_template(&app_state, identity.is_some());
    html.push_body(&body);
    Ok(html.into_response())
}
