use anyhow::{bail, Context, Result};
use log::{info, warn};

use crate::{
    models::{LoginOutcome, UserDetails},
    storage::KeyValueStore,
};

pub const ACCOUNT_KEY: &str = "userDetails";

/// Single on-device account. Credentials are compared as stored.
#[derive(Clone)]
pub struct AccountService<S> {
    store: S,
}

impl<S: KeyValueStore> AccountService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Replaces any existing account.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<()> {
        let details = validated(email, password)?;
        let serialized = serde_json::to_string(&details)?;
        self.store
            .set(ACCOUNT_KEY, serialized)
            .await
            .context("Failed to sign up")?;
        info!("account created for {}", details.email);
        Ok(())
    }

    pub async fn log_in(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let attempt = validated(email, password)?;

        let stored = self
            .store
            .get(ACCOUNT_KEY)
            .await
            .context("Failed to log in")?;
        let Some(raw) = stored else {
            return Ok(LoginOutcome::NoAccount);
        };
        let account: UserDetails =
            serde_json::from_str(&raw).context("Failed to log in")?;

        let outcome = if account == attempt {
            LoginOutcome::Success
        } else {
            LoginOutcome::InvalidCredentials
        };
        match outcome {
            LoginOutcome::Success => info!("{}: {}", attempt.email, outcome.message()),
            _ => warn!("{}: {}", attempt.email, outcome.message()),
        }
        Ok(outcome)
    }
}

fn validated(email: &str, password: &str) -> Result<UserDetails> {
    if email.is_empty() || password.is_empty() {
        bail!("Please enter both email and password");
    }
    Ok(UserDetails {
        email: email.to_string(),
        password: password.to_string(),
    })
}
