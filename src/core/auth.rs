//! # Login / Register Forms
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Success
//!   ▲                  │
//!   │                  └──err──▶ Failed (fields stay editable)
//!   └──────────── submit again ◀─────┘
//! ```
//!
//! Text editing lives in the TUI; the core only sees submitted values.

use crate::api::{Credentials, FetchError};

pub const REGISTER_SUCCESS_MESSAGE: &str = "Success! You are registered.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Login,
    Register,
}

impl AuthKind {
    pub fn heading(self) -> &'static str {
        match self {
            AuthKind::Login => "Login",
            AuthKind::Register => "Registration",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            AuthKind::Login => "Log in",
            AuthKind::Register => "Create account",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Success(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    pub kind: AuthKind,
    pub phase: FormPhase,
}

impl AuthForm {
    pub fn new(kind: AuthKind) -> Self {
        Self {
            kind,
            phase: FormPhase::Idle,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Validate and enter `Submitting`. Returns the credentials to send, or
    /// `None` if a request is already out or a field is empty (the latter
    /// moves the form to `Failed`).
    pub fn submit(&mut self, username: &str, password: &str) -> Option<Credentials> {
        if self.is_submitting() {
            return None;
        }

        match validate(username, password) {
            Ok(credentials) => {
                self.phase = FormPhase::Submitting;
                Some(credentials)
            }
            Err(e) => {
                self.phase = FormPhase::Failed(e.to_string());
                None
            }
        }
    }

    /// Leave `Submitting` with the outcome of the request.
    pub fn finish(&mut self, outcome: Result<String, FetchError>) {
        self.phase = match outcome {
            Ok(message) => FormPhase::Success(message),
            Err(e) => FormPhase::Failed(describe_auth_error(self.kind, &e)),
        };
    }

    pub fn reset(&mut self) {
        self.phase = FormPhase::Idle;
    }
}

fn validate(username: &str, password: &str) -> Result<Credentials, FetchError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(FetchError::Validation("Username must not be empty".to_string()));
    }
    if password.is_empty() {
        return Err(FetchError::Validation("Password must not be empty".to_string()));
    }
    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Turn auth failures into something a person can act on.
fn describe_auth_error(kind: AuthKind, error: &FetchError) -> String {
    match (kind, error) {
        (AuthKind::Login, FetchError::Http { status: 401, .. }) => {
            "Invalid username or password".to_string()
        }
        (AuthKind::Register, FetchError::Http { status: 409, .. }) => {
            "Username is already taken".to_string()
        }
        (_, FetchError::Network(_)) => format!("Server not reachable ({error})"),
        _ => error.to_string(),
    }
}
