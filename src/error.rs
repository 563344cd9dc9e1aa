use std::net::SocketAddr;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to listen on {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read request body")]
    Body(#[source] BoxError),
    #[error("Request body exceeds limit of {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("Invalid configuration: {0}")]
    Config(String),
}
