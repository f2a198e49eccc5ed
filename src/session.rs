//! Credential storage for the authenticated session
//!
//! A single-slot store holding the bearer token the login flow hands over.
//! The file-backed store keeps it in the user's config directory; the
//! in-memory store backs tests.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;

/// Storage key for the credential, kept from the login flow's hand-off
pub const TOKEN_KEY: &str = "jwt";

/// A single-slot credential store.
///
/// At most one credential is stored at a time; `save` replaces any
/// previous one.
pub trait SessionStore: Send + Sync {
    /// The stored credential, if any
    fn load(&self) -> Option<String>;

    /// Replace the stored credential
    fn save(&self, token: &str) -> Result<()>;

    /// Delete the stored credential
    fn clear(&self) -> Result<()>;

    /// Whether a credential is currently stored
    fn is_logged_in(&self) -> bool {
        self.load().is_some()
    }
}

/// Get the path to the token storage file
fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promise-client")
        .join(format!("{TOKEN_KEY}.token"))
}

/// Token file in the user's config directory.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new() -> Self {
        Self {
            path: default_token_path(),
        }
    }

    /// Store backed by a specific file, for tests and tooling
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<String> {
        let token = std::fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory single-slot store.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}
