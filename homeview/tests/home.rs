use std::net::SocketAddr;
use std::path::Path;
use homeview::app_state::AppState;
use homeview::config::Config;
use test_log::test;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const CONFIG: &str = r#"
[general]
title = "Homeview Test"

[http]
url_http = "127.0.0.1:0"

[identity]
cookie_name = "homeview_session"

[[identity.sessions]]
token = "cypress"
attributes = { name = "cypress@example.org", email = "cypress@example.org" }
"#;

struct RunningServer {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<(), homeview_lib::error::HomeviewError>>,
}

impl RunningServer {

    async fn start() -> Self {
        let config = Config::parse(CONFIG, Path::new(".")).unwrap();
        let app_state = AppState::new(config).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(homeview::serve(listener, app_state, async {
            stopped.await.ok();
        }));
        Self { addr, stop, task }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn stop(self) {
        self.stop.send(()).unwrap();
        self.task.await.unwrap().unwrap();
    }
}

#[test(tokio::test)]
async fn server_is_running() {
    let server = RunningServer::start().await;
    assert!(!server.task.is_finished());
    server.stop().await;
}

#[test(tokio::test)]
async fn anonymous_home() {
    let server = RunningServer::start().await;

    let response = reqwest::get(server.url("/")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Just click on"));
    assert!(body.contains("<title>Homeview Test</title>"));

    server.stop().await;
}

#[test(tokio::test)]
async fn authenticated_home() {
    let server = RunningServer::start().await;

    let response = reqwest::Client::new()
        .get(server.url("/"))
        .header(reqwest::header::COOKIE, "homeview_session=cypress")
        .send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("<span id=\"name\">cypress@example.org</span>"));

    server.stop().await;
}

#[test(tokio::test)]
async fn unknown_page() {
    let server = RunningServer::start().await;

    let response = reqwest::get(server.url("/html/unknown")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    server.stop().await;
}
