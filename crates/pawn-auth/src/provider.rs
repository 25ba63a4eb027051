//! Auth provider: startup restore, login, logout, registration.
//!
//! The provider owns the session and the auth state. State only changes
//! through [`reduce`], and every change is published to subscribers.
//!
//! Concurrent `login` calls are not serialized. Each one persists its own
//! tokens and dispatches its own `Login`, so the last to finish wins.

use crate::api_client::ApiClient;
use crate::forms::{LoginForm, RegistrationForm};
use crate::init_fsm::{InitInput, InitMachine, InitState};
use crate::reducer::{reduce, AuthAction, AuthState};
use crate::session::SessionStore;
use crate::{token, AuthError, AuthResult, UserProfile};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub struct AuthProvider {
    api: ApiClient,
    session: SessionStore,
    init: Mutex<InitMachine>,
    state: watch::Sender<AuthState>,
}

impl AuthProvider {
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        let (state, _) = watch::channel(AuthState::initial());
        Self {
            api,
            session,
            init: Mutex::new(InitMachine::new()),
            state,
        }
    }

    /// Snapshot of the current auth state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Restore a persisted session, once per provider.
    ///
    /// Always ends with the state initialized. A stored token that is
    /// expired or unreadable, or whose profile cannot be fetched, is
    /// cleared and the user starts signed out. Only a second call fails.
    pub async fn initialize(&self) -> AuthResult<()> {
        self.advance_init(&InitInput::Begin)?;

        let (is_authenticated, user) = match self.restore_session().await {
            Some(user) => (true, Some(user)),
            None => (false, None),
        };
        self.dispatch(AuthAction::Initialize {
            is_authenticated,
            user,
        });

        self.advance_init(&InitInput::Resolved)?;
        Ok(())
    }

    async fn restore_session(&self) -> Option<UserProfile> {
        let stored = match self.session.access_token() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Could not read persisted session");
                self.session.reset_session();
                return None;
            }
        };

        let Some(access_token) = stored else {
            debug!("No persisted session");
            return None;
        };

        if !token::is_valid(Some(&access_token)) {
            info!("Persisted session is expired or unreadable, clearing it");
            self.session.reset_session();
            return None;
        }

        let refresh_token = self.session.refresh_token().ok().flatten();
        if let Err(e) = self
            .session
            .set_session(&access_token, refresh_token.as_deref())
        {
            warn!(error = %e, "Could not re-apply persisted session");
            self.session.reset_session();
            return None;
        }

        match self.api.fetch_profile(&self.session).await {
            Ok(user) => {
                let subject = token::decode(&access_token).ok().and_then(|t| t.subject);
                info!(subject = ?subject, "Restored persisted session");
                Some(user)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    transient = e.is_transient(),
                    "Profile fetch failed during startup, signing out"
                );
                self.session.reset_session();
                None
            }
        }
    }

    /// Sign in with an identifier (email) and secret.
    ///
    /// Nothing is persisted unless the credential exchange succeeds. A
    /// session that cannot be fully stored, or whose profile cannot be
    /// fetched, is cleared again before the error is returned.
    pub async fn login(&self, identifier: &str, secret: &str) -> AuthResult<UserProfile> {
        let tokens = self.api.exchange_credentials(identifier, secret).await?;

        if let Err(e) = self
            .session
            .set_session(&tokens.access_token, tokens.refresh_token.as_deref())
        {
            warn!(error = %e, "Could not persist session after login, discarding it");
            self.session.reset_session();
            return Err(e);
        }

        let user = match self.api.fetch_profile(&self.session).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Profile fetch failed after login, discarding session");
                self.session.reset_session();
                return Err(e);
            }
        };

        self.dispatch(AuthAction::Login { user: user.clone() });
        info!(user = ?user.display_name(), "Signed in");
        Ok(user)
    }

    /// Validate a login form, then sign in with it.
    pub async fn login_with_form(&self, form: &LoginForm) -> AuthResult<UserProfile> {
        form.validate()?;
        self.login(form.identifier.trim(), &form.secret).await
    }

    /// Sign out. Local cleanup only, and it cannot fail.
    pub fn logout(&self) {
        self.session.reset_session();
        self.dispatch(AuthAction::Logout);
        info!("Signed out");
    }

    /// Create an account. Does not sign in or touch the current session.
    pub async fn register(&self, form: &RegistrationForm) -> AuthResult<UserProfile> {
        form.validate()?;
        let user = self.api.register(form).await?;
        info!(user = ?user.display_name(), "Registered account");
        Ok(user)
    }

    fn advance_init(&self, input: &InitInput) -> AuthResult<()> {
        let mut machine = self.init.lock();
        machine.consume(input).map_err(|_| {
            debug!(state = ?machine.state(), input = ?input, "Rejected initialization step");
            AuthError::AlreadyInitialized
        })?;
        if *machine.state() == InitState::Initialized {
            debug!("Initialization resolved");
        }
        Ok(())
    }

    fn dispatch(&self, action: AuthAction) {
        self.state.send_modify(|state| {
            let before = state.phase();
            *state = reduce(std::mem::take(state), action);
            debug!(from = ?before, to = ?state.phase(), "Auth state transition");
        });
    }
}
