pub mod error;
pub mod html;
pub mod http;
pub mod http_routes;
