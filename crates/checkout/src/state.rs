//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::CheckoutConfig;
use crate::db::AddressRepository;
use crate::services::ValidationService;
use crate::services::verifier::{VerifierClient, VerifierError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the validation service and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CheckoutConfig,
    pool: PgPool,
    validation: ValidationService<AddressRepository>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the verification HTTP client fails to build.
    pub fn new(config: CheckoutConfig, pool: PgPool) -> Result<Self, VerifierError> {
        let verifier = VerifierClient::new(&config.verifier)?;
        let validation = ValidationService::new(
            verifier,
            AddressRepository::new(pool.clone()),
            config.grace_period_days,
            config.verifier.enabled,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                validation,
            }),
        })
    }

    /// Get a reference to the checkout configuration.
    #[must_use]
    pub fn config(&self) -> &CheckoutConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the validation service.
    #[must_use]
    pub fn validation(&self) -> &ValidationService<AddressRepository> {
        &self.inner.validation
    }
}
