use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../rsc"]
struct Resources;


/// content-type for the supported static file types
pub fn mime_type(filepath: &str) -> Option<&'static str> {
    if      filepath.ends_with(".css") { Some("text/css") }
    else if filepath.ends_with(".js")  { Some("application/javascript") }
    else if filepath.ends_with(".png") { Some("image/png") }
    else if filepath.ends_with(".svg") { Some("image/svg+xml") }
    else if filepath.ends_with(".ico") { Some("image/x-icon") }
    else { None }
}


/// axum route handler for static resources in /rsc project directory
///
/// Integrate like: Router::new().route("/rsc/*filepath", routing::get(route_handler))
pub async fn route_handler(Path(filepath): Path<String>) -> Result<impl IntoResponse, StatusCode> {
    let filecontent = Resources::get(&filepath).ok_or_else(|| {
        log::debug!("static resource not found: {}", filepath);
        StatusCode::NOT_FOUND
    })?;

    let mime_type = mime_type(&filepath).ok_or(StatusCode::UNSUPPORTED_MEDIA_TYPE)?;

    // return file
    Ok((StatusCode::OK,
        [(header::CONTENT_TYPE, mime_type)],
        filecontent.data))
}
