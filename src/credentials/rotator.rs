//! Health tracking and selection over a fixed credential pool.

use chrono::{DateTime, Utc};

use crate::error::ConfigError;

use super::{Credential, CredentialId};

/// Per-credential health record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CredentialHealth {
    pub error_count: u32,
    pub last_used: Option<DateTime<Utc>>,
}

/// Selects credentials from a fixed pool, steering away from failing ones.
///
/// Exactly one credential is current at any time. A current credential with
/// no recorded errors is kept; otherwise the healthiest member (lowest error
/// count, then least recently used, then pool order) takes over.
#[derive(Debug)]
pub struct CredentialRotator {
    credentials: Vec<Credential>,
    health: Vec<CredentialHealth>,
    current: usize,
}

impl CredentialRotator {
    /// Build a rotator over `credentials`. The pool size is fixed from here on.
    pub fn new(credentials: Vec<Credential>) -> Result<Self, ConfigError> {
        if credentials.is_empty() {
            return Err(ConfigError::NoCredentials);
        }

        let health = vec![CredentialHealth::default(); credentials.len()];
        Ok(Self {
            credentials,
            health,
            current: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn current(&self) -> CredentialId {
        CredentialId::new(self.current)
    }

    /// Token for `id`, or `None` if `id` is not a member of this pool.
    pub fn credential(&self, id: CredentialId) -> Option<&Credential> {
        self.credentials.get(id.index())
    }

    pub fn health(&self, id: CredentialId) -> Option<CredentialHealth> {
        self.health.get(id.index()).copied()
    }

    /// Pick the credential for the next attempt and make it current.
    pub fn best_candidate(&mut self) -> CredentialId {
        if self.health[self.current].error_count == 0 {
            return self.current();
        }

        // `min_by_key` keeps the first of equal keys, so pool order breaks ties.
        // `None` sorts before any timestamp, standing in for "never used".
        if let Some((index, _)) = self
            .health
            .iter()
            .enumerate()
            .min_by_key(|(_, h)| (h.error_count, h.last_used))
        {
            self.current = index;
        }

        self.current()
    }

    /// Like [`best_candidate`](Self::best_candidate), also returning the token.
    pub fn best_credential(&mut self) -> (CredentialId, &Credential) {
        let id = self.best_candidate();
        (id, &self.credentials[self.current])
    }

    /// Ids outside the pool are ignored by both recorders.
    pub fn record_failure(&mut self, id: CredentialId) {
        self.record_failure_at(id, Utc::now());
    }

    pub fn record_success(&mut self, id: CredentialId) {
        self.record_success_at(id, Utc::now());
    }

    pub(crate) fn record_failure_at(&mut self, id: CredentialId, at: DateTime<Utc>) {
        if let Some(health) = self.health.get_mut(id.index()) {
            health.error_count = health.error_count.saturating_add(1);
            health.last_used = Some(at);
        }
    }

    pub(crate) fn record_success_at(&mut self, id: CredentialId, at: DateTime<Utc>) {
        if let Some(health) = self.health.get_mut(id.index()) {
            health.error_count = health.error_count.saturating_sub(1);
            health.last_used = Some(at);
        }
    }

    /// Move current to the next pool slot, wrapping around.
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.credentials.len();
    }
}
