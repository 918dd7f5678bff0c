//! Error types for the TUI.

use crate::api_client::GatewayError;
use crate::config::ConfigError;
use crate::session::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] GatewayError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Logging setup failed: {0}")]
    Telemetry(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use tempfile::TempDir;

    fn startup(config: &str, session: &std::path::Path) -> Result<(), TuiError> {
        let config = crate::config::TuiConfig::from_toml(config)?;
        config.validate()?;
        SessionStore::open(session)?;
        Ok(())
    }

    #[test]
    fn test_startup_errors_keep_their_source() {
        let dir = TempDir::new().unwrap();
        let corrupt = dir.path().join("auth-storage.json");
        std::fs::write(&corrupt, "{not json").unwrap();

        assert!(matches!(
            startup("page_size = 0", &corrupt),
            Err(TuiError::Config(ConfigError::Parse(_)))
        ));
        let shipped = include_str!("../config.example.toml");
        assert!(matches!(
            startup(shipped, &corrupt),
            Err(TuiError::Session(SessionError::Serde(_)))
        ));

        let err = TuiError::from(GatewayError::MissingCredential);
        assert_eq!(err.to_string(), "Not signed in");
    }
}
