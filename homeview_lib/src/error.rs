use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HomeviewError {

    /// config file path, io error
    #[error("failed to read config file '{0}': {1}")]
    ConfigFileUnreadable(String, io::Error),

    /// config file path, toml error
    #[error("failed to parse config file '{0}': {1}")]
    ConfigFileUnparsable(String, toml::de::Error),

    /// configured address, reason
    #[error("not a valid socket address: '{0}' ({1})")]
    InvalidSocketAddress(String, String),

    /// cert path, key path, io error
    #[error("failed to load TLS certificate '{0}' with key '{1}': {2}")]
    TlsConfigUnloadable(String, String, io::Error),

    #[error("server io error: {0}")]
    ServerIo(#[from] io::Error),
}
