//! Command-line interface definition and argument parsing
//!
//! This module uses clap to define and parse command-line arguments.

use clap::{Parser, Subcommand};

/// Command-line arguments for the PromiseService client
#[derive(Parser, Debug)]
#[command(
    name = "promise-client",
    about = "Client for the PromiseService appointment API",
    version
)]
pub struct Cli {
    /// Base URL of the appointment server (overrides PROMISE_API_URL)
    #[arg(long)]
    pub server: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for the client
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store the token handed over by the login page
    Login {
        /// Bearer token issued by the login flow
        token: String,
    },

    /// Show the current login state
    Status,

    /// Clear the stored token and open the login page
    Logout,

    /// Confirm an appointment and notify accepted participants
    Confirm {
        /// ID of the appointment to confirm
        appointment_id: i64,
    },

    /// Show the participation status of an appointment
    Participants {
        /// ID of the appointment to inspect
        appointment_id: i64,
    },

    /// Resend failed notifications to selected participants
    Resend {
        /// ID of the appointment
        appointment_id: i64,

        /// Participant IDs to notify again
        participant_ids: Vec<i64>,
    },

    /// Cancel an appointment
    Cancel {
        /// ID of the appointment to cancel
        appointment_id: i64,

        /// Reason forwarded with the cancellation notice
        #[arg(long)]
        reason: Option<String>,
    },

    /// Accept or decline an invitation
    Respond {
        /// ID of the appointment
        appointment_id: i64,

        /// Accept the invitation (declines without this flag)
        #[arg(long)]
        accept: bool,
    },
}

impl Commands {
    /// Page this command corresponds to in the original UI, for the
    /// login guard
    pub fn page(&self) -> &'static str {
        match self {
            Commands::Login { .. } => "/login.html",
            Commands::Status | Commands::Logout => "/",
            Commands::Confirm { .. }
            | Commands::Participants { .. }
            | Commands::Resend { .. }
            | Commands::Cancel { .. }
            | Commands::Respond { .. } => "/appointments.html",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_commands_are_guarded() {
        let protected = Commands::Confirm { appointment_id: 1 };
        assert_eq!(protected.page(), "/appointments.html");
        assert!(!crate::guard::is_public(protected.page()));

        let login = Commands::Login {
            token: "t".to_string(),
        };
        assert!(crate::guard::is_public(login.page()));
    }
}
