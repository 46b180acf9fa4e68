//! Runtime-adjustable token lifetimes

use std::time::Duration;

use crate::AuthError;

const MIN_LIFETIME: Duration = Duration::from_millis(1);

/// Current access and refresh lifetimes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

/// Partial lifetime update; omitted fields keep their value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyUpdate {
    pub access: Option<Duration>,
    pub refresh: Option<Duration>,
}

impl PolicyUpdate {
    /// Update only the access lifetime
    pub fn access(lifetime: Duration) -> Self {
        Self {
            access: Some(lifetime),
            refresh: None,
        }
    }

    /// Update only the refresh lifetime
    pub fn refresh(lifetime: Duration) -> Self {
        Self {
            access: None,
            refresh: Some(lifetime),
        }
    }

    /// True if neither lifetime is set
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

/// Holds the lifetimes applied to newly minted tokens
#[derive(Debug, Clone)]
pub struct PolicyStore {
    current: Lifetimes,
}

impl PolicyStore {
    /// Create a store, validating the initial lifetimes
    pub fn new(initial: Lifetimes) -> Result<Self, AuthError> {
        validate("access", initial.access)?;
        validate("refresh", initial.refresh)?;
        Ok(Self { current: initial })
    }

    /// Current lifetimes
    pub fn get(&self) -> Lifetimes {
        self.current
    }

    /// Apply an update. A rejected update changes nothing.
    pub fn set(&mut self, update: PolicyUpdate) -> Result<Lifetimes, AuthError> {
        if update.is_empty() {
            return Err(AuthError::InvalidPolicy(
                "at least one of access or refresh lifetime is required".to_string(),
            ));
        }
        if let Some(access) = update.access {
            validate("access", access)?;
        }
        if let Some(refresh) = update.refresh {
            validate("refresh", refresh)?;
        }

        if let Some(access) = update.access {
            self.current.access = access;
        }
        if let Some(refresh) = update.refresh {
            self.current.refresh = refresh;
        }
        Ok(self.current)
    }
}

fn validate(name: &str, lifetime: Duration) -> Result<(), AuthError> {
    if lifetime < MIN_LIFETIME {
        return Err(AuthError::InvalidPolicy(format!(
            "{name} token lifetime must be positive"
        )));
    }
    Ok(())
}
