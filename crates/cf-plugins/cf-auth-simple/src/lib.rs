//! # cf-auth-simple
//!
//! Argon2-based, in-process implementation of `SessionProvider`.
//! Stands in for the hosted identity service: accounts live only as long
//! as the provider does, and one session is active at a time.

use std::sync::RwLock;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use cf_core::error::{AppError, Result};
use cf_core::models::User;
use cf_core::traits::SessionProvider;
use chrono::Utc;
use dashmap::DashMap;
use rand::RngCore;
use tracing::info;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    user: User,
    password_hash: String,
}

#[derive(Default)]
pub struct SimpleSessionProvider {
    /// Keyed by lowercased email
    accounts: DashMap<String, Account>,
    current: RwLock<Option<User>>,
}

impl SimpleSessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn hash_password(password: &str) -> Result<String> {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = SaltString::encode_b64(&salt).map_err(|e| AppError::Internal(e.to_string()))?;
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Verifies if a provided password matches a stored Argon2 hash.
    fn verify_password(password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    fn set_current(&self, user: Option<User>) {
        let mut current = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = user;
    }
}

#[async_trait]
impl SessionProvider for SimpleSessionProvider {
    fn current_user(&self) -> Option<User> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Registers the account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::Validation(format!("invalid email {email:?}")));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.accounts.contains_key(&email) {
            return Err(AppError::Validation(format!("{email} is already registered")));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            created_at: Utc::now(),
        };
        let password_hash = Self::hash_password(password)?;
        self.accounts.insert(
            email,
            Account {
                user: user.clone(),
                password_hash,
            },
        );

        info!(user_id = %user.id, "account created");
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim().to_lowercase();
        let user = self
            .accounts
            .get(&email)
            .filter(|account| Self::verify_password(password, &account.password_hash))
            .map(|account| account.user.clone())
            .ok_or_else(|| AppError::Unauthorized("invalid login credentials".to_string()))?;

        info!(user_id = %user.id, "signed in");
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in_with_google(&self) -> Result<User> {
        Err(AppError::Unauthorized(
            "google sign-in needs a hosted identity provider".to_string(),
        ))
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(user) = self.current_user() {
            info!(user_id = %user.id, "signed out");
        }
        self.set_current(None);
        Ok(())
    }
}
