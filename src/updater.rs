//! Updater module for yadns
//!
//! One reconciliation pass: load the zone, pick the A record, resolve the
//! external address and push it to the provider if it changed. There is no
//! retry here; the next scheduled run is the retry.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, Instrument, Span};

use crate::constants::DNS_RECORD_TYPE_A;
use crate::dns_provider::{DnsProvider, RecordFields, RecordId};
use crate::error::{Error, Result};
use crate::external_ip::ExternalIpResolver;

//==============================================================================
// Outcome
//==============================================================================

/// Terminal state of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No IP source answered; nothing was written
    Skipped,
    /// The A record already holds the external address
    UpToDate { ip: String, ttl: u32 },
    /// The A record was rewritten
    Updated {
        record_id: RecordId,
        previous: String,
        current: String,
    },
    /// The provider refused the edit
    UpdateFailed { record_id: RecordId, attempted: String },
}

impl ReconcileOutcome {
    /// Whether the pass ended without a write failure
    pub fn is_success(&self) -> bool {
        !matches!(self, ReconcileOutcome::UpdateFailed { .. })
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileOutcome::Skipped => write!(f, "skipped (external IP unknown)"),
            ReconcileOutcome::UpToDate { ip, .. } => write!(f, "up to date ({})", ip),
            ReconcileOutcome::Updated {
                previous, current, ..
            } => write!(f, "updated {} -> {}", previous, current),
            ReconcileOutcome::UpdateFailed { attempted, .. } => {
                write!(f, "update to {} failed", attempted)
            }
        }
    }
}

//==============================================================================
// Updater
//==============================================================================

pub struct Updater {
    provider: Arc<dyn DnsProvider>,
    resolver: ExternalIpResolver,
    span: Span,
}

impl Updater {
    pub fn new(provider: Arc<dyn DnsProvider>, resolver: ExternalIpResolver) -> Self {
        let span = tracing::info_span!("update", domain = %provider.domain());
        Self {
            provider,
            resolver,
            span,
        }
    }

    /// Logging context the reconciliation runs in
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Runs one reconciliation pass
    ///
    /// # Errors
    ///
    /// - listing failures from the provider (network, envelope)
    /// - [`Error::EmptyResult`] when the listing has no records, which in
    ///   non-strict mode is also how a rejected listing arrives
    /// - [`Error::NoARecord`] when the zone has no A record
    /// - transport failures during the edit call
    ///
    /// A provider that answers the edit with a failure envelope yields
    /// [`ReconcileOutcome::UpdateFailed`], not an error.
    pub async fn reconcile(&self) -> Result<ReconcileOutcome> {
        self.reconcile_inner().instrument(self.span.clone()).await
    }

    async fn reconcile_inner(&self) -> Result<ReconcileOutcome> {
        let domain = self.provider.domain().to_string();

        let records = self.provider.list_records().await?;
        debug!("Got {} dns-records", records.len());
        if records.is_empty() {
            return Err(Error::EmptyResult(domain));
        }

        let record = records
            .first_of_type(DNS_RECORD_TYPE_A)
            .ok_or_else(|| Error::NoARecord(domain.clone()))?;
        let current = record.content.clone();

        let Some(ip) = self.resolver.resolve().await else {
            info!("External IP unknown, skipping this run");
            return Ok(ReconcileOutcome::Skipped);
        };

        if ip == current {
            info!(
                "External ip is actual. Domain: {} Ip: {} TTL: {}",
                domain, ip, record.ttl
            );
            return Ok(ReconcileOutcome::UpToDate {
                ip,
                ttl: record.ttl,
            });
        }

        info!("Dns record of type 'A': {}", current);
        info!("My current external ip: {}", ip);
        info!("Need update ip. {} <> {}", ip, current);

        let changes = RecordFields::new().with("content", &ip);
        let updated = match self.provider.update_record(record, &changes).await {
            Ok(ok) => ok,
            Err(e) if e.is_rejection() => {
                error!("{}", e);
                false
            }
            Err(e) => return Err(e),
        };

        if updated {
            info!("External ip(record A) update to '{}' successfully", ip);
            Ok(ReconcileOutcome::Updated {
                record_id: record.record_id.clone(),
                previous: current,
                current: ip,
            })
        } else {
            error!("Error when update external ip(record A) to '{}'", ip);
            Ok(ReconcileOutcome::UpdateFailed {
                record_id: record.record_id.clone(),
                attempted: ip,
            })
        }
    }
}

//==============================================================================
// Tests
//==============================================================================
