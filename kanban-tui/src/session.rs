//! File-backed session store.
//!
//! Every mutation is written through to disk before it returns, and the
//! file is read back verbatim at start-up.

use kanban_core::{Session, User};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    session: Session,
}

impl SessionStore {
    /// Restore the session saved at `path`, or start empty if there is none.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let session = load(&path)?.unwrap_or_default();
        tracing::debug!(
            path = %path.display(),
            authenticated = session.is_authenticated,
            "Restored session"
        );
        Ok(Self { path, session })
    }

    pub fn snapshot(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn login(&mut self, user: User, token: impl Into<String>) -> Result<(), SessionError> {
        let name = user.display_name().to_string();
        let next = Session::authenticated(user, token);
        save(&self.path, &next)?;
        tracing::info!(user = %name, "Signed in");
        self.session = next;
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        let next = Session::empty();
        save(&self.path, &next)?;
        tracing::info!("Signed out");
        self.session = next;
        Ok(())
    }

    /// `Bearer <token>` when signed in, otherwise an empty string.
    pub fn auth_header(&self) -> String {
        self.session.auth_header()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn load(path: &Path) -> Result<Option<Session>, SessionError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let session = serde_json::from_str::<Session>(&contents)?;
    Ok(Some(session))
}

/// Write to a sibling temp file and rename it over the target, so a crash
/// mid-write never leaves a truncated session behind.
pub fn save(path: &Path, session: &Session) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_json::to_string_pretty(session)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
