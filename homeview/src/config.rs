use std::path::{Path, PathBuf};
use serde::Deserialize;
use homeview_lib::error::HomeviewError;

#[derive(Deserialize, Clone)]
pub struct Config {

    /// General configuration options
    #[serde(default)]
    pub general: General,

    /// Configuration for the http(s) server(s)
    pub http: Http,

    /// Configuration for rendering views
    #[serde(default)]
    pub views: Views,

    /// Configuration of how visitors are identified
    #[serde(default)]
    pub identity: Identity,
}


impl Config {

    /// Read config from a toml file
    pub fn from_file(file_path: &Path) -> Result<Self, HomeviewError> {
        let toml_content = std::fs::read_to_string(file_path).map_err(|e| {
            HomeviewError::ConfigFileUnreadable(file_path.display().to_string(), e)
        })?;
        let base_dir = match file_path.parent() {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from("."),
        };
        Self::parse(&toml_content, &base_dir).map_err(|e| {
            HomeviewError::ConfigFileUnparsable(file_path.display().to_string(), e)
        })
    }

    /// Parse config from toml content.
    /// Relative paths are resolved against base_dir.
    pub fn parse(toml_content: &str, base_dir: &Path) -> Result<Self, toml::de::Error> {
        let mut config : Self = toml::from_str(toml_content)?;
        config.resolve_paths(base_dir);
        Ok(config)
    }

    fn resolve_paths(&mut self, base_dir: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        };
        if let Some(tls) = self.http.tls.as_mut() {
            resolve(&mut tls.tls_cert);
            resolve(&mut tls.tls_key);
        }
        if let Some(templates_dir) = self.views.templates_dir.as_mut() {
            resolve(templates_dir);
        }
    }
}


#[derive(Deserialize, Clone)]
pub struct General {

    /// The title of the html pages
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for General {
    fn default() -> Self {
        Self { title: default_title() }
    }
}

fn default_title() -> String {
    "Homeview".to_string()
}


#[derive(Deserialize, Clone)]
pub struct Http {

    /// The address to run the http server onto (eg. '127.0.0.1:8080')
    /// When tls is configured, this serves only as forwarder to https
    pub url_http: String,

    /// When present, the site is served via https
    pub tls: Option<Tls>,
}


#[derive(Deserialize, Clone)]
pub struct Tls {

    /// The address to run the https server onto (eg. '127.0.0.1:8443')
    pub url_https: String,

    /// Path to the TLS cert file in PEM format
    pub tls_cert: PathBuf,

    /// Path to the TLS key file in PEM format
    pub tls_key: PathBuf,
}


#[derive(Deserialize, Clone, Default)]
pub struct Views {

    /// A directory with additional *.hbs templates.
    /// Templates in here replace the built-in templates of the same name.
    pub templates_dir: Option<PathBuf>,
}


#[derive(Deserialize, Clone)]
pub struct Identity {

    /// Name of the cookie that carries the session token
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Where the login link of the navigation bar points to
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Sessions that are accepted as logged in
    /// Without any sessions, all visitors are anonymous
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            login_url: default_login_url(),
            sessions: Vec::new(),
        }
    }
}

fn default_cookie_name() -> String {
    "homeview_session".to_string()
}

fn default_login_url() -> String {
    "/oauth/login".to_string()
}


#[derive(Deserialize, Clone)]
pub struct Session {

    /// The secret session token, as transmitted in the session cookie
    pub token: String,

    /// The claims of the identity provider
    /// Expected to be a table of attributes (eg. { name = "Alice", email = "alice@example.org" })
    pub attributes: serde_json::Value,
}
