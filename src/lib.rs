//! Client library for the PromiseService appointment API
//!
//! Every request goes through one wrapped call that attaches the stored
//! bearer token and normalizes error reporting; a detected session expiry
//! routes the user back to the login page. The endpoint helpers and the
//! login-state getters are thin composition over that call.

pub mod api;
pub mod cli;
pub mod config;
pub mod guard;
pub mod session;
pub mod ui;
