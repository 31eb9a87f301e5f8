use std::sync::Arc;

use trainmate_client::{AuthToken, TrainmateClient};

use crate::error::{AppError, AppResult};

/// Whether a screen's data is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
}

/// Guard for a screen's one-time initial load.
#[derive(Debug, Default)]
pub struct InitOnce(bool);

impl InitOnce {
    /// Returns true the first time only.
    pub fn claim(&mut self) -> bool {
        !std::mem::replace(&mut self.0, true)
    }

    pub fn is_done(&self) -> bool {
        self.0
    }
}

/// Gateway plus the signed-in user's credential, handed to every screen.
#[derive(Clone)]
pub struct Session {
    client: Arc<dyn TrainmateClient>,
    token: Option<AuthToken>,
    user_email: Option<String>,
}

impl Session {
    pub fn new(client: Arc<dyn TrainmateClient>, token: AuthToken) -> Self {
        Self {
            client,
            token: Some(token),
            user_email: None,
        }
    }

    pub fn with_user_email(mut self, email: Option<String>) -> Self {
        self.user_email = email;
        self
    }

    pub fn client(&self) -> &dyn TrainmateClient {
        self.client.as_ref()
    }

    pub fn token(&self) -> AppResult<&AuthToken> {
        self.token.as_ref().ok_or(AppError::Unauthenticated)
    }

    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.user_email = None;
    }
}
