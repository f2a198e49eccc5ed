//! Appointment API client
//!
//! Every call to the appointment server goes through
//! [`ApiClient::request`], which injects the stored bearer token and
//! normalizes error bodies into [`ApiError`]. The endpoint helpers fix a
//! URL template and method on top of it.

mod client;
mod error;

pub use self::client::ApiClient;
pub use self::error::{ApiError, ApiResult};

use std::collections::HashMap;

/// HTTP method for an API call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Methods that carry a body and get the JSON Content-Type default
    pub fn is_write(self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Caller-specified options for one API call.
///
/// Read-only to the client: headers are merged into the outgoing request
/// but never removed, and the body is sent as given.
#[derive(Debug, Clone, Default)]
pub struct RequestSpec {
    /// HTTP method, GET when unspecified
    pub method: Method,

    /// Extra headers for the request
    pub headers: HashMap<String, String>,

    /// Pre-serialized request payload
    pub body: Option<String>,
}

impl RequestSpec {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self {
            method: Method::Post,
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}
