use std::error::Error;
use std::future::Future;
use std::time::Duration;
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use homeview_lib::error::HomeviewError;
use homeview_lib::http::{http2https_background_service, resolve_socket_addr, shutdown_signal};
use app_state::AppState;
use config::Config;

pub mod app_state;
pub mod config;
pub mod http;
pub mod identity;
pub mod view;

/// How long open connections may finish after a shutdown signal
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);


/// Serve the site on an already bound listener until shutdown resolves
pub async fn serve<F>(listener: TcpListener, app_state: AppState, shutdown: F) -> Result<(), HomeviewError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = http::create_router(app_state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}


/// Run the site as described by the config until the process receives a shutdown signal
pub async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let app_state = AppState::new(config.clone())?;
    let addr_http = resolve_socket_addr(&config.http.url_http)?;

    let Some(tls) = &config.http.tls else {
        let listener = TcpListener::bind(addr_http).await.map_err(HomeviewError::ServerIo)?;
        log::info!("starting HTTP server on {}", addr_http);
        serve(listener, app_state, shutdown_signal()).await?;
        log::info!("HTTP server stopped");
        return Ok(());
    };

    // create TLS config
    let addr_https = resolve_socket_addr(&tls.url_https)?;
    let tls_cfg = RustlsConfig::from_pem_file(&tls.tls_cert, &tls.tls_key).await.map_err(|e| {
        HomeviewError::TlsConfigUnloadable(tls.tls_cert.display().to_string(), tls.tls_key.display().to_string(), e)
    })?;

    // HTTP to HTTPS forwarder (background service)
    tokio::spawn(async move {
        if let Err(e) = http2https_background_service(addr_http, addr_https).await {
            log::error!("HTTP-to-HTTPS forwarding failed: {}", e);
        }
    });

    // stop accepting connections on shutdown signal
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
    });

    // run https server
    let app = http::create_router(app_state);
    log::info!("starting HTTPS server on {}", addr_https);
    axum_server::bind_rustls(addr_https, tls_cfg)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(HomeviewError::ServerIo)?;
    log::info!("HTTPS server stopped");
    Ok(())
}
