//! Route gating on top of [`AuthState`].

use crate::reducer::{AuthPhase, AuthState};
use serde::Serialize;

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Anyone, signed in or not
    Public,
    /// Signed-in users only
    Protected,
    /// Signed-out users only (login, registration)
    GuestOnly,
}

/// What the shell should do for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    /// Startup has not resolved; show a loading indicator
    Loading,
    Render,
    RedirectToLogin,
    RedirectToHome,
}

pub fn resolve(state: &AuthState, access: RouteAccess) -> RouteDecision {
    match (state.phase(), access) {
        (AuthPhase::Uninitialized, _) => RouteDecision::Loading,
        (AuthPhase::Unauthenticated, RouteAccess::Protected) => RouteDecision::RedirectToLogin,
        (AuthPhase::Authenticated, RouteAccess::GuestOnly) => RouteDecision::RedirectToHome,
        _ => RouteDecision::Render,
    }
}
