//! Login, registration, verification and logout
//!
//! Information Hiding:
//! - Auth endpoint failures translated into `DashboardError`
//! - Notifications and redirects for each outcome decided here
//! - Token handed to `SessionManager`; never stored by this module

use super::navigation::{Navigator, Notification, Notifier, Route};
use super::session::SessionManager;
use crate::core::{ApiFailure, ConversationApi, Credentials, DashboardError, Registration};
use crate::storage::Token;
use std::sync::Arc;
use std::time::Duration;

pub struct AuthFlow {
    api: Arc<dyn ConversationApi>,
    session: Arc<SessionManager>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    verify_redirect_delay: Duration,
}

impl AuthFlow {
    pub fn new(
        api: Arc<dyn ConversationApi>,
        session: Arc<SessionManager>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            session,
            navigator,
            notifier,
            verify_redirect_delay: Duration::from_secs(3),
        }
    }

    pub fn with_verify_redirect_delay(mut self, delay: Duration) -> Self {
        self.verify_redirect_delay = delay;
        self
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), DashboardError> {
        let credentials = Credentials {
            email: require_field(email, "Email")?,
            password: require_secret(password, "Password")?,
        };

        let raw = match self.api.login(&credentials).await {
            Ok(raw) => raw,
            Err(failure) => {
                let error = auth_error(failure, "Login failed");
                tracing::error!("[AuthFlow] Login failed: {}", error);
                self.notifier.notify(Notification::error(error.user_message()));
                return Err(error);
            }
        };

        if let Err(error) = self.session.set_token(Token::new(raw)).await {
            tracing::error!("[AuthFlow] Could not store session token: {}", error);
            self.notifier.notify(Notification::error(error.user_message()));
            return Err(error);
        }

        tracing::info!("[AuthFlow] Logged in as {}", credentials.email);
        self.notifier.notify(Notification::success("Logged in"));
        self.navigator.redirect(Route::Overview);
        Ok(())
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        business_name: &str,
    ) -> Result<(), DashboardError> {
        let registration = Registration {
            email: require_field(email, "Email")?,
            password: require_secret(password, "Password")?,
            business_name: require_field(business_name, "Business name")?,
        };

        match self.api.register(&registration).await {
            Ok(()) => {
                tracing::info!("[AuthFlow] Registered {}", registration.email);
                self.notifier.notify(Notification::success(
                    "Account created. Check your email to verify it, then log in.",
                ));
                self.navigator.redirect(Route::Landing);
                Ok(())
            }
            Err(failure) => {
                let error = auth_error(failure, "Registration failed");
                tracing::error!("[AuthFlow] Registration failed: {}", error);
                self.notifier.notify(Notification::error(error.user_message()));
                Err(error)
            }
        }
    }

    /// Returns the backend's message; redirects to login after the delay
    pub async fn verify(&self, verification_token: &str) -> Result<String, DashboardError> {
        let verification_token = require_field(verification_token, "Verification token")?;

        match self.api.verify(&verification_token).await {
            Ok(message) => {
                tracing::info!("[AuthFlow] Email verified");
                self.notifier.notify(Notification::info(message.clone()));
                tokio::time::sleep(self.verify_redirect_delay).await;
                self.navigator.redirect(Route::Login);
                Ok(message)
            }
            Err(failure) => {
                let error = DashboardError::ValidationFailure(
                    failure
                        .detail()
                        .map(String::from)
                        .unwrap_or_else(|| "Verification failed.".to_string()),
                );
                tracing::error!("[AuthFlow] Verification failed: {}", error);
                self.notifier.notify(Notification::error(error.user_message()));
                Err(error)
            }
        }
    }

    pub async fn logout(&self) {
        self.session.clear().await;
        self.navigator.redirect(Route::Landing);
    }
}

fn require_field(value: &str, name: &str) -> Result<String, DashboardError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::ValidationFailure(format!("{} is required", name)));
    }
    Ok(trimmed.to_string())
}

/// Same presence check, but the value is sent exactly as typed
fn require_secret(value: &str, name: &str) -> Result<String, DashboardError> {
    if value.trim().is_empty() {
        return Err(DashboardError::ValidationFailure(format!("{} is required", name)));
    }
    Ok(value.to_string())
}

/// Auth endpoints answer bad credentials with 400/401, which must not be
/// mistaken for an expired session.
fn auth_error(failure: ApiFailure, fallback: &str) -> DashboardError {
    match failure {
        ApiFailure::Status { status, detail } if status.is_client_error() => {
            DashboardError::ValidationFailure(detail.unwrap_or_else(|| fallback.to_string()))
        }
        other => other.into_dashboard_error(fallback),
    }
}
