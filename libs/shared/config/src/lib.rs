use std::env;
use tracing::warn;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("AGENDA_BIND_ADDR").unwrap_or_else(|_| {
                warn!("AGENDA_BIND_ADDR not set, using default {}", DEFAULT_BIND_ADDR);
                DEFAULT_BIND_ADDR.to_string()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_bind_addr() {
        env::remove_var("AGENDA_BIND_ADDR");
        let config = AppConfig::from_env();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    }
}
