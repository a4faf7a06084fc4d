// Signed-in user tracking
// One session value is published over a watch channel; readers subscribe instead of polling

use crate::error::ErrorKind;
use crate::models::User;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("Sign-in failed: {0}")]
    SignInFailed(String),
}

impl IdentityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::Unavailable(_) | IdentityError::SignInFailed(_) => ErrorKind::IoFailure,
        }
    }
}

// Hosted sign-in service
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    async fn current_user(&self) -> Result<Option<User>, IdentityError>;

    async fn sign_in(&self) -> Result<User, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSnapshot {
    pub user: Option<User>,
    // True until the provider has answered once
    pub is_loading: bool,
}

impl AuthSnapshot {
    fn loading() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }

    fn settled(user: Option<User>) -> Self {
        Self {
            user,
            is_loading: false,
        }
    }
}

pub struct SessionManager<P> {
    provider: P,
    state: watch::Sender<AuthSnapshot>,
}

impl<P: IdentityProvider> SessionManager<P> {
    pub fn new(provider: P) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::loading());
        Self { provider, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    // Asks the provider for the existing session; loading ends even on failure
    pub async fn refresh(&self) -> Result<Option<User>, IdentityError> {
        match self.provider.current_user().await {
            Ok(user) => {
                self.state.send_replace(AuthSnapshot::settled(user.clone()));
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Session lookup failed");
                self.state.send_replace(AuthSnapshot::settled(None));
                Err(e)
            }
        }
    }

    pub async fn sign_in(&self) -> Result<User, IdentityError> {
        let user = self.provider.sign_in().await?;
        info!(user_id = %user.id, "Signed in");
        self.state.send_replace(AuthSnapshot::settled(Some(user.clone())));
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<(), IdentityError> {
        self.provider.sign_out().await?;
        info!("Signed out");
        self.state.send_replace(AuthSnapshot::settled(None));
        Ok(())
    }
}

// In-process provider for a single configured account
pub struct StaticIdentity {
    account: User,
    session: RwLock<Option<User>>,
}

impl StaticIdentity {
    pub fn new(account: User) -> Self {
        Self {
            account,
            session: RwLock::new(None),
        }
    }

    pub fn signed_in(account: User) -> Self {
        Self {
            session: RwLock::new(Some(account.clone())),
            account,
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Result<Option<User>, IdentityError> {
        Ok(self.session.read().clone())
    }

    async fn sign_in(&self) -> Result<User, IdentityError> {
        *self.session.write() = Some(self.account.clone());
        Ok(self.account.clone())
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        *self.session.write() = None;
        Ok(())
    }
}
