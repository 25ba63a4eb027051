//! Authentication core for the PawnRepo client.
//!
//! - [`token`]: reads a bearer token's expiry without verifying it
//! - [`SessionStore`]: the persisted token pair and the outgoing bearer header
//! - [`reduce`]: the pure auth state transition function
//! - [`AuthProvider`]: startup restore, login, logout, registration
//! - [`guard`]: route gating on the current state

mod api_client;
mod error;
mod forms;
pub mod guard;
mod init_fsm;
mod profile;
mod provider;
mod reducer;
mod session;
pub mod token;

pub use api_client::{ApiClient, TokenPair};
pub use error::{AuthError, AuthResult};
pub use forms::{
    LoginForm, RegistrationForm, ValidationError, PASSWORD_MAX_LEN, PASSWORD_MIN_LEN,
    USERNAME_MAX_LEN, USERNAME_MIN_LEN,
};
pub use guard::{RouteAccess, RouteDecision};
pub use init_fsm::{InitInput, InitMachine, InitState};
pub use profile::UserProfile;
pub use provider::AuthProvider;
pub use reducer::{reduce, AuthAction, AuthPhase, AuthState};
pub use session::SessionStore;
pub use token::{DecodedToken, TokenDecodeError};
