use std::net::{SocketAddr, ToSocketAddrs};
use axum::extract::Host;
use axum::handler::HandlerWithoutStateExt;
use axum::http::uri::{Authority, Scheme};
use axum::http::{StatusCode, Uri};
use axum::response::Redirect;
use crate::error::HomeviewError;

/// Resolve a configured address like '127.0.0.1:8080' or 'localhost:8080'
pub fn resolve_socket_addr(url: &str) -> Result<SocketAddr, HomeviewError> {
    let mut addrs = url.to_socket_addrs()
        .map_err(|e| HomeviewError::InvalidSocketAddress(url.to_string(), e.to_string()))?;
    addrs.next()
        .ok_or_else(|| HomeviewError::InvalidSocketAddress(url.to_string(), "resolved to nothing".to_string()))
}


/// Convert an http request uri into the https uri of the same resource.
/// Any port of the requested host is replaced by port_https, which is omitted when it is 443.
pub fn make_https(host: &str, uri: Uri, port_https: u16) -> Result<Uri, axum::BoxError> {
    let mut parts = uri.into_parts();

    parts.scheme = Some(Scheme::HTTPS);

    if parts.path_and_query.is_none() {
        parts.path_and_query = Some("/".parse()?);
    }

    let authority: Authority = host.parse()?;
    let https_authority = match port_https {
        443 => authority.host().to_string(),
        port => format!("{}:{}", authority.host(), port),
    };
    parts.authority = Some(https_authority.parse()?);

    Ok(Uri::from_parts(parts)?)
}


/// Permanently redirects every request on addr_http to addr_https
pub async fn http2https_background_service(addr_http: SocketAddr, addr_https: SocketAddr) -> Result<(), HomeviewError> {
    // Implementation from:
    // https://github.com/tokio-rs/axum/blob/main/examples/tls-rustls/src/main.rs

    let redirect = move |Host(host): Host, uri: Uri| async move {
        match make_https(&host, uri, addr_https.port()) {
            Ok(uri) => Ok(Redirect::permanent(&uri.to_string())),
            Err(e) => {
                log::warn!("cannot forward request for host '{}' to https: {}", host, e);
                Err(StatusCode::BAD_REQUEST)
            }
        }
    };

    let listener = tokio::net::TcpListener::bind(addr_http).await?;
    log::info!("starting HTTP-to-HTTPS forwarding server on {}", addr_http);
    axum::serve(listener, redirect.into_make_service()).await?;
    Ok(())
}


/// Resolves when the process receives Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => { signal.recv().await; },
            Err(e) => {
                log::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("shutdown signal received");
}
