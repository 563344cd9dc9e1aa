use std::net::{Ipv6Addr, SocketAddr};

use crate::error::Error;

pub const PORT: u16 = 3000;

const BODY_LIMIT_VAR: &str = "POST_LISTENER_BODY_LIMIT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Always `[::]:3000`, dual-stack where the host allows it.
    pub addr: SocketAddr,
    /// Maximum accepted POST body in bytes. `None` buffers without bound.
    pub body_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv6Addr::UNSPECIFIED, PORT)),
            body_limit: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Config::default();
        if let Some(limit) = lookup(BODY_LIMIT_VAR) {
            let limit = limit
                .trim()
                .parse()
                .map_err(|err| Error::Config(format!("{BODY_LIMIT_VAR}={limit:?}: {err}")))?;
            config.body_limit = Some(limit);
        }
        Ok(config)
    }
}
