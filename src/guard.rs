//! Login guard for page entry
//!
//! The appointment pages require a stored credential; the login pages and
//! the site root do not. Runs once per entry, no retry.

use crate::session::SessionStore;
use crate::ui::Interaction;

/// Pages reachable without a credential
pub const PUBLIC_PATHS: &[&str] = &["/login.html", "/login-done.html", "/"];

pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Check access to `path`, sending the user to the login page when a
/// credential is required but none is stored. Returns whether access is
/// granted.
pub fn enforce(path: &str, store: &dyn SessionStore, ui: &dyn Interaction) -> bool {
    if is_public(path) || store.is_logged_in() {
        return true;
    }

    tracing::info!("Login required for {}, redirecting to login page", path);
    ui.goto_login();
    false
}
