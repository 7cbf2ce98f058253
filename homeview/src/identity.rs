use std::collections::HashMap;
use axum::http::{header, HeaderMap};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use crate::config;

/// The attribute mapping of an authenticated identity
pub type Attributes = Map<String, Value>;

#[derive(Error, Debug)]
pub enum IdentityError {

    /// kind of the claims value
    #[error("identity claims are not a table of attributes but {0}")]
    ClaimsNotATable(&'static str),

    #[error("invalid session cookie name '{0}': {1}")]
    InvalidCookieName(String, regex::Error),
}


/// A visitor whose credentials were accepted by an identity provider.
/// Lives for a single request and is only read by route handlers.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthenticatedIdentity {
    claims: Value,
}

impl AuthenticatedIdentity {

    /// Wrap the raw claims as delivered by an identity provider
    pub fn new(claims: Value) -> Self {
        Self { claims }
    }

    /// The string-keyed attributes of this identity (eg. profile claims)
    pub fn attributes(&self) -> Result<&Attributes, IdentityError> {
        match &self.claims {
            Value::Object(attributes) => Ok(attributes),
            Value::Null => Err(IdentityError::ClaimsNotATable("null")),
            Value::Bool(_) => Err(IdentityError::ClaimsNotATable("a boolean")),
            Value::Number(_) => Err(IdentityError::ClaimsNotATable("a number")),
            Value::String(_) => Err(IdentityError::ClaimsNotATable("a string")),
            Value::Array(_) => Err(IdentityError::ClaimsNotATable("an array")),
        }
    }
}


/// Identifies the visitor of a request
pub trait IdentityProvider: Send + Sync {

    /// Returns None for anonymous visitors
    fn identify(&self, headers: &HeaderMap) -> Result<Option<AuthenticatedIdentity>, IdentityError>;
}


/// Treats every visitor as anonymous
pub struct AnonymousProvider;

impl IdentityProvider for AnonymousProvider {
    fn identify(&self, _headers: &HeaderMap) -> Result<Option<AuthenticatedIdentity>, IdentityError> {
        Ok(None)
    }
}


/// Identifies visitors by a session token cookie
pub struct SessionCookieProvider {
    cookie_regex: Regex,
    sessions: HashMap<String, Value>,
}

impl SessionCookieProvider {

    /// sessions: pairs of session token and identity claims
    pub fn new<I>(cookie_name: &str, sessions: I) -> Result<Self, IdentityError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let pattern = format!(r"(?:^|;)\s*{}=([^;]*)", regex::escape(cookie_name));
        let cookie_regex = Regex::new(&pattern)
            .map_err(|e| IdentityError::InvalidCookieName(cookie_name.to_string(), e))?;
        Ok(Self {
            cookie_regex,
            sessions: sessions.into_iter().collect(),
        })
    }

    /// All session tokens transmitted in the cookie headers
    fn session_tokens<'h>(&'h self, headers: &'h HeaderMap) -> impl Iterator<Item = &'h str> + 'h {
        headers.get_all(header::COOKIE).iter()
            .filter_map(|cookie_header| cookie_header.to_str().ok())
            .flat_map(|cookie_string| self.cookie_regex.captures_iter(cookie_string))
            .filter_map(|captures| captures.get(1))
            .map(|token| token.as_str().trim().trim_matches('"'))
    }
}

impl IdentityProvider for SessionCookieProvider {
    fn identify(&self, headers: &HeaderMap) -> Result<Option<AuthenticatedIdentity>, IdentityError> {
        for token in self.session_tokens(headers) {
            if let Some(claims) = self.sessions.get(token) {
                return Ok(Some(AuthenticatedIdentity::new(claims.clone())));
            }
            log::debug!("ignoring unknown session token");
        }
        Ok(None)
    }
}


/// Create the identity provider that is described by the configuration
pub fn provider_from_config(cfg: &config::Identity) -> Result<Box<dyn IdentityProvider>, IdentityError> {
    if cfg.sessions.is_empty() {
        log::info!("no sessions configured, all visitors are anonymous");
        return Ok(Box::new(AnonymousProvider));
    }

    let sessions = cfg.sessions.iter()
        .map(|session| (session.token.clone(), session.attributes.clone()));
    let provider = SessionCookieProvider::new(&cfg.cookie_name, sessions)?;
    log::info!("identifying visitors by cookie '{}' ({} sessions)", cfg.cookie_name, cfg.sessions.len());
    Ok(Box::new(provider))
}
