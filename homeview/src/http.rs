use axum::extract::{Request, State};
use axum::handler::Handler;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{self, MethodFilter, MethodRouter};
use axum::Router;
use thiserror::Error;
use homeview_lib::html::HtmlTemplate;
use homeview_lib::http_routes::static_resources;
use crate::app_state::AppState;
use crate::identity::IdentityError;
use crate::view::RenderError;

pub mod http_user;
pub mod routes_html;


/// Who may reach a route
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessPolicy {

    /// Reachable without being logged in
    Anonymous,

    /// Answers 401 unless the visitor is logged in
    Authenticated,
}


/// An entry of the route table
pub struct Route {
    pub method: MethodFilter,
    pub path: &'static str,
    pub access: AccessPolicy,
    handler: MethodRouter<AppState>,
}

impl Route {
    fn new<H, T>(method: MethodFilter, path: &'static str, access: AccessPolicy, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self { method, path, access, handler: routing::on(method, handler) }
    }
}


/// All routes of the site
pub fn route_table() -> Vec<Route> {
    vec![
        Route::new(MethodFilter::GET, "/", AccessPolicy::Anonymous, routes_html::home::handler),
        Route::new(MethodFilter::GET, "/logout", AccessPolicy::Authenticated, routes_html::logout::handler),
        Route::new(MethodFilter::GET, "/rsc/*filepath", AccessPolicy::Anonymous, static_resources::route_handler),
    ]
}


pub fn create_router(app_state: AppState) -> Router {
    let mut router = Router::new();
    for route in route_table() {
        log::debug!("route {:?} {} ({:?})", route.method, route.path, route.access);
        let handler = match route.access {
            AccessPolicy::Anonymous => route.handler,
            AccessPolicy::Authenticated => route.handler
                .route_layer(middleware::from_fn_with_state(app_state.clone(), require_identity)),
        };
        router = router.route(route.path, handler);
    }
    router
        .fallback(handler_not_found)
        .with_state(app_state)
}


/// Guard for routes with AccessPolicy::Authenticated
async fn require_identity(State(app_state): State<AppState>, request: Request, next: Next) -> Response {
    let identity = app_state.identity_provider().identify(request.headers());
    match identity {
        Ok(Some(_)) => next.run(request).await,
        Ok(None) => HttpError::Unauthorized.into_response(),
        Err(e) => HttpError::from(e).into_response(),
    }
}


async fn handler_not_found() -> HttpError {
    HttpError::NotFound
}


/// Errors that abort a request.
/// The visitor gets a generic error page, the details go to the log.
#[derive(Error, Debug)]
pub enum HttpError {

    #[error("login required")]
    Unauthorized,

    #[error("page not found")]
    NotFound,

    #[error("cannot identify visitor: {0}")]
    Identity(#[from] IdentityError),

    #[error("cannot render page: {0}")]
    Render(#[from] RenderError),
}

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Identity(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("{}", self);
        }

        let summary = status_code.canonical_reason().unwrap_or("Error");
        let mut html = HtmlTemplate::new(summary);
        html.set_status(status_code);
        if status_code.is_server_error() {
            html.message_error(summary.to_string());
        } else {
            html.message_warning(self.to_string());
        }
        html.into_response()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::json;
    use test_log::test;
    use tower::ServiceExt;
    use crate::config::Config;
    use crate::identity::SessionCookieProvider;
    use crate::view::HandlebarsRenderer;

    pub(crate) fn app_state() -> AppState {
        let config = Config::parse("[http]\nurl_http = \"127.0.0.1:8080\"\n", std::path::Path::new(".")).unwrap();
        let provider = SessionCookieProvider::new("homeview_session", vec![
            ("alice".to_string(), json!({"name": "Alice", "email": "a@b.com"})),
            ("broken".to_string(), json!("not a table")),
        ]).unwrap();
        AppState::from_parts(config, Arc::new(HandlebarsRenderer::new(None).unwrap()), Arc::new(provider))
    }

    pub(crate) async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn table() {
        let table = route_table();
        let home = table.iter().find(|route| route.path == "/").unwrap();
        assert_eq!(home.method, MethodFilter::GET);
        assert_eq!(home.access, AccessPolicy::Anonymous);
        let logout = table.iter().find(|route| route.path == "/logout").unwrap();
        assert_eq!(logout.access, AccessPolicy::Authenticated);
    }

    #[test(tokio::test)]
    async fn not_found() {
        let response = create_router(app_state()).oneshot(get("/nowhere", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.contains("page not found"));
    }

    #[test(tokio::test)]
    async fn wrong_method() {
        let request = Request::builder().method("POST").uri("/").body(Body::empty()).unwrap();
        let response = create_router(app_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test(tokio::test)]
    async fn authenticated_route_rejects_anonymous() {
        let response = create_router(app_state()).oneshot(get("/logout", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = create_router(app_state()).oneshot(get("/logout", Some("homeview_session=mallory"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test(tokio::test)]
    async fn authenticated_route_admits_identity() {
        let response = create_router(app_state()).oneshot(get("/logout", Some("homeview_session=alice"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[test(tokio::test)]
    async fn static_resource_is_anonymous() {
        let response = create_router(app_state()).oneshot(get("/rsc/css/main.css", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test(tokio::test)]
    async fn server_errors_hide_details() {
        let err = HttpError::from(IdentityError::ClaimsNotATable("a string"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert!(body.contains("Internal Server Error"));
        assert!(!body.contains("claims"));
    }
}
