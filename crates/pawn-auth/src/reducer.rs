//! Auth state and its transition function.
//!
//! ```text
//!  Uninitialized ──Initialize{user: None}──► Unauthenticated ◄──┐
//!        │                                      │             │
//!        └──Initialize{user: Some}──►  Authenticated ──Logout─┘
//!                                           ▲   │
//!                       Unauthenticated ─Login──┘
//! ```
//!
//! The reducer never rejects a transition. `Logout` while unauthenticated
//! and `Login` while authenticated both produce a well-formed state, and the
//! provider only issues them from the matching source state anyway.

use crate::UserProfile;
use serde::Serialize;

/// Authentication state visible to the rest of the application.
///
/// `is_authenticated` implies `user` is present, and `is_initialized` never
/// goes back to false once set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthState {
    is_authenticated: bool,
    is_initialized: bool,
    user: Option<UserProfile>,
}

/// Phase derived from the state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    Uninitialized,
    Unauthenticated,
    Authenticated,
}

impl AuthState {
    /// The state before startup initialization resolves.
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn phase(&self) -> AuthPhase {
        match (self.is_initialized, self.is_authenticated) {
            (false, _) => AuthPhase::Uninitialized,
            (true, false) => AuthPhase::Unauthenticated,
            (true, true) => AuthPhase::Authenticated,
        }
    }
}

/// Every action the provider can dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// Startup resolution. Claiming authentication without a user is
    /// treated as unauthenticated.
    Initialize {
        is_authenticated: bool,
        user: Option<UserProfile>,
    },
    Login {
        user: UserProfile,
    },
    Logout,
}

/// Pure transition function.
pub fn reduce(state: AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::Initialize {
            is_authenticated,
            user,
        } => {
            let user = user.filter(|_| is_authenticated);
            AuthState {
                is_authenticated: user.is_some(),
                is_initialized: true,
                user,
            }
        }
        AuthAction::Login { user } => AuthState {
            is_authenticated: true,
            user: Some(user),
            ..state
        },
        AuthAction::Logout => AuthState {
            is_authenticated: false,
            user: None,
            ..state
        },
    }
}
