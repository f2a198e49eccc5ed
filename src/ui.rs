//! User-facing side effects of session recovery
//!
//! The request path needs two things from the outside world: a yes/no
//! answer to "log in again?" and a way to send the user to the login page.
//! Both sit behind a trait so the expiry branch is testable without a
//! terminal or a browser.

use std::io::{self, BufRead, Write};

/// Login page served by the appointment server
pub const LOGIN_PAGE: &str = "/login.html";

/// Confirm/navigate capability used on the session-expiry path.
pub trait Interaction: Send + Sync {
    /// Ask the user whether to re-authenticate after a session expiry
    fn confirm_reauth(&self, prompt: &str) -> bool;

    /// Send the user to the login page
    fn goto_login(&self);
}

/// Terminal-backed implementation: a y/N prompt on stdin, and the login
/// page opened in the system browser.
pub struct ConsoleInteraction {
    base_url: String,
}

impl ConsoleInteraction {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Interaction for ConsoleInteraction {
    fn confirm_reauth(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim(), "y" | "Y" | "yes")
    }

    fn goto_login(&self) {
        let url = format!("{}{}", self.base_url, LOGIN_PAGE);
        if let Err(e) = webbrowser::open(&url) {
            tracing::warn!("Failed to open browser automatically: {}", e);
            println!("Please open this URL to log in: {}", url);
        }
    }
}
