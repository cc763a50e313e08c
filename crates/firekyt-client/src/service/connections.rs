//! Connection management: create, edit, remove and re-validate.

use firekyt_core::lifecycle::INACTIVE_WITHOUT_DETAIL;
use firekyt_core::model::{ConnectionId, PlatformConnection, ValidationReport};
use firekyt_core::{ConnectionDraft, ConnectionEvent, ConnectionState};
use tracing::{info, warn};

use super::PublishingService;
use crate::cache::QueryKey;
use crate::error::PublishError;

/// A connection record returned by a submit, with the state it settled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionOutcome {
    pub connection: PlatformConnection,
    pub state: ConnectionState,
}

/// Result of re-checking one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub connection_id: ConnectionId,
    /// State known before the check, if the connection was cached.
    pub previous: Option<ConnectionState>,
    pub state: ConnectionState,
}

impl ConnectionCheck {
    /// An active connection was found to be invalid.
    pub fn deactivated(&self) -> bool {
        matches!(self.previous, Some(ConnectionState::Active))
            && matches!(self.state, ConnectionState::InactiveWithError { .. })
    }
}

fn failure_event(error: Option<&str>) -> ConnectionEvent {
    ConnectionEvent::ValidationFailed {
        error: error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(INACTIVE_WITHOUT_DETAIL)
            .to_string(),
    }
}

impl PublishingService {
    /// Validate the form locally, then create the connection.
    ///
    /// Field errors are returned before any request is made.
    pub async fn create_connection(
        &self,
        draft: &ConnectionDraft,
    ) -> Result<ConnectionOutcome, PublishError> {
        let request = draft.validate()?;
        let pending = ConnectionState::Unconfigured.apply(ConnectionEvent::Submitted)?;
        info!(platform = %request.platform(), state = %pending, "Submitting platform connection");

        let connection = self.api.create_connection(&request).await?;
        self.cache.invalidate(QueryKey::Connections).await;

        let state = pending.apply(ConnectionState::validation_event(&connection))?;
        log_settled(&connection, &state);
        Ok(ConnectionOutcome { connection, state })
    }

    /// Resubmit an edited connection (new token, URL, ...).
    pub async fn update_connection(
        &self,
        id: ConnectionId,
        draft: &ConnectionDraft,
    ) -> Result<ConnectionOutcome, PublishError> {
        let request = draft.validate()?;
        let current = ConnectionState::observe(&self.connection(id).await?);
        let pending = current.apply(ConnectionEvent::Submitted)?;
        info!(id, platform = %request.platform(), from = %current, "Resubmitting platform connection");

        let connection = self.api.update_connection(id, &request).await?;
        self.cache.invalidate(QueryKey::Connections).await;

        let state = pending.apply(ConnectionState::validation_event(&connection))?;
        log_settled(&connection, &state);
        Ok(ConnectionOutcome { connection, state })
    }

    pub async fn remove_connection(
        &self,
        id: ConnectionId,
    ) -> Result<ConnectionState, PublishError> {
        self.api.delete_connection(id).await?;
        self.cache.invalidate(QueryKey::Connections).await;
        info!(id, "Platform connection removed");
        Ok(ConnectionState::Removed)
    }

    /// Re-validate every stored connection ("Validate All Tokens").
    pub async fn validate_all(
        &self,
    ) -> Result<(ValidationReport, Vec<ConnectionCheck>), PublishError> {
        let report = self.api.validate_connections().await?;
        let known = self.known_states().await;
        self.record_verdicts(
            report
                .results
                .iter()
                .map(|r| (r.connection_id, r.is_valid, r.error.clone())),
        )
        .await;
        self.cache.invalidate(QueryKey::Connections).await;

        let mut checks = Vec::with_capacity(report.results.len());
        for result in &report.results {
            let event = if result.is_valid {
                ConnectionEvent::ValidationSucceeded
            } else {
                failure_event(result.error.as_deref())
            };
            let previous = known
                .iter()
                .find(|(id, _)| *id == result.connection_id)
                .map(|(_, s)| s.clone());
            let check = settle(result.connection_id, previous, event)?;
            if check.deactivated() {
                warn!(id = check.connection_id, error = ?check.state.error(), "Connection no longer valid");
            }
            checks.push(check);
        }
        info!(
            total = report.results.len(),
            invalid = report.invalid().count(),
            "Validated platform connections"
        );
        Ok((report, checks))
    }

    /// Live-test one connection.
    pub async fn test_connection(&self, id: ConnectionId) -> Result<ConnectionCheck, PublishError> {
        let result = self.api.test_connection(id).await?;
        let previous = self
            .known_states()
            .await
            .into_iter()
            .find(|(known, _)| *known == id)
            .map(|(_, s)| s);
        let detail = result
            .validation_error
            .clone()
            .or_else(|| result.message.clone());
        self.record_verdicts([(id, result.success, detail)]).await;
        self.cache.invalidate(QueryKey::Connections).await;

        let event = if result.success {
            ConnectionEvent::ValidationSucceeded
        } else {
            failure_event(result.validation_error.as_deref().or(result.message.as_deref()))
        };
        let check = settle(id, previous, event)?;
        info!(id, state = %check.state, "Tested platform connection");
        Ok(check)
    }

    /// Fold check results into the cached connection list so local
    /// preconditions see them before the next fetch.
    async fn record_verdicts(
        &self,
        verdicts: impl IntoIterator<Item = (ConnectionId, bool, Option<String>)>,
    ) {
        let verdicts: Vec<_> = verdicts.into_iter().collect();
        self.cache
            .patch::<Vec<PlatformConnection>, _>(QueryKey::Connections, |list| {
                for (id, valid, error) in &verdicts {
                    if let Some(c) = list.iter_mut().find(|c| c.id == *id) {
                        c.is_active = *valid;
                        c.validation_error = if *valid { None } else { error.clone() };
                        if *valid {
                            c.last_error = None;
                        }
                    }
                }
            })
            .await;
    }

    /// States of the cached connections, stale or not. Never fetches.
    async fn known_states(&self) -> Vec<(ConnectionId, ConnectionState)> {
        self.cache
            .peek::<Vec<PlatformConnection>>(QueryKey::Connections)
            .await
            .unwrap_or_default()
            .iter()
            .map(|c| (c.id, ConnectionState::observe(c)))
            .collect()
    }
}

fn settle(
    connection_id: ConnectionId,
    previous: Option<ConnectionState>,
    event: ConnectionEvent,
) -> Result<ConnectionCheck, PublishError> {
    let from = previous.clone().unwrap_or(ConnectionState::PendingValidation);
    let state = from.apply(event)?;
    Ok(ConnectionCheck {
        connection_id,
        previous,
        state,
    })
}

fn log_settled(connection: &PlatformConnection, state: &ConnectionState) {
    match state.error() {
        Some(error) => warn!(id = connection.id, %state, error, "Connection rejected by platform"),
        None => info!(id = connection.id, %state, "Connection settled"),
    }
}
