//! Yandex PDD API client for DNS operations
//!
//! Every call is authenticated with the static `PddToken` header and answers
//! with the same envelope: `{"success": "ok", "domain": ..., ...}`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn, Instrument, Span};
use urlencoding::encode;
use zeroize::Zeroizing;

use crate::constants::{ADD_REQUIRED_FIELDS, PDD_API_BASE, PDD_SUCCESS, PDD_TOKEN_HEADER};
use crate::dns_provider::{DnsProvider, DnsRecord, RecordFields, RecordSet};
use crate::error::{Error, Result};
use crate::transport::HttpTransport;

//==============================================================================
// Types
//==============================================================================

#[derive(Debug, Deserialize)]
struct Envelope {
    success: String,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    records: Option<Vec<DnsRecord>>,
}

//==============================================================================
// Client
//==============================================================================

pub struct PddClient {
    domain: String,
    token: Zeroizing<String>,
    api_base: String,
    strict: bool,
    transport: Arc<dyn HttpTransport>,
    span: Span,
}

impl PddClient {
    /// Creates a strict client bound to `domain`
    pub fn new(domain: &str, token: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            domain: domain.to_string(),
            token: Zeroizing::new(token.to_string()),
            api_base: PDD_API_BASE.to_string(),
            strict: true,
            transport,
            span: tracing::info_span!("pdd", domain = %domain),
        }
    }

    /// Strict mode turns logical failures into errors instead of `Ok(false)`
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Logging context every call of this client runs in
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    fn auth_header(&self) -> [(&'static str, &str); 1] {
        [(PDD_TOKEN_HEADER, self.token.as_str())]
    }

    /// Reports a logical failure according to the error policy
    fn reject(&self, err: Error) -> Result<bool> {
        if self.strict {
            Err(err)
        } else {
            warn!("{}", err);
            Ok(false)
        }
    }

    fn parse_envelope(&self, body: &str) -> Result<Envelope> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        serde_json::from_value(value)
            .map_err(|e| Error::provider(format!("Malformed response envelope: {}", e)))
    }

    /// `success` must be "ok" and the echoed domain must be ours
    fn check_envelope(&self, envelope: &Envelope) -> Result<bool> {
        if envelope.success != PDD_SUCCESS {
            let reason = envelope.error.as_deref().unwrap_or("no error given");
            return self.reject(Error::provider(format!(
                "API call failed: success={}, error={}",
                envelope.success, reason
            )));
        }
        if envelope.domain.as_deref() != Some(self.domain.as_str()) {
            return self.reject(Error::provider(format!(
                "Response domain {:?} does not match {}",
                envelope.domain, self.domain
            )));
        }
        Ok(true)
    }

    fn check_record_domain(&self, record: &DnsRecord) -> Result<()> {
        if record.domain != self.domain {
            return Err(Error::invalid_record(format!(
                "record {} belongs to {}, expected {}",
                record.record_id, record.domain, self.domain
            )));
        }
        Ok(())
    }

    async fn post(&self, action: &str, form: Vec<(String, String)>) -> Result<bool> {
        let url = format!("{}/{}", self.api_base, action);
        debug!("params: {:?}", form);
        let body = self
            .transport
            .post_form(&url, &self.auth_header(), &form)
            .await?;
        debug!("resp: {}", body);
        let envelope = self.parse_envelope(&body)?;
        self.check_envelope(&envelope)
    }

    async fn list_inner(&self) -> Result<RecordSet> {
        let url = format!("{}/list?domain={}", self.api_base, encode(&self.domain));
        let body = self.transport.get(&url, &self.auth_header()).await?;
        let envelope = self.parse_envelope(&body)?;

        if !self.check_envelope(&envelope)? {
            return Ok(RecordSet::default());
        }

        let Some(records) = envelope.records else {
            return Err(Error::provider(
                "Malformed response envelope: missing records",
            ));
        };
        for record in &records {
            self.check_record_domain(record)?;
        }
        debug!("Loaded {} records", records.len());

        if records.is_empty() {
            self.reject(Error::EmptyResult(self.domain.clone()))?;
        }
        Ok(RecordSet::new(records))
    }

    async fn add_inner(&self, fields: &RecordFields) -> Result<bool> {
        if let Some(missing) = ADD_REQUIRED_FIELDS.iter().find(|k| !fields.contains(k)) {
            return self.reject(Error::MissingField((*missing).to_string()));
        }

        let form = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.post("add", form).await
    }

    async fn update_inner(&self, existing: &DnsRecord, changes: &RecordFields) -> Result<bool> {
        self.check_record_domain(existing)?;

        let mut form = vec![
            ("domain".to_string(), self.domain.clone()),
            ("record_id".to_string(), existing.record_id.to_string()),
        ];
        form.extend(
            changes
                .iter()
                .filter(|(k, _)| *k != "domain" && *k != "record_id")
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        self.post("edit", form).await
    }

    async fn delete_inner(&self, existing: &DnsRecord) -> Result<bool> {
        self.check_record_domain(existing)?;
        info!("Deleting record: {}", existing);

        let form = vec![
            ("domain".to_string(), self.domain.clone()),
            ("record_id".to_string(), existing.record_id.to_string()),
        ];
        self.post("del", form).await
    }
}

#[async_trait]
impl DnsProvider for PddClient {
    fn domain(&self) -> &str {
        &self.domain
    }

    async fn list_records(&self) -> Result<RecordSet> {
        self.list_inner().instrument(self.span.clone()).await
    }

    async fn add_record(&self, fields: &RecordFields) -> Result<bool> {
        self.add_inner(fields).instrument(self.span.clone()).await
    }

    async fn update_record(&self, existing: &DnsRecord, changes: &RecordFields) -> Result<bool> {
        self.update_inner(existing, changes)
            .instrument(self.span.clone())
            .await
    }

    async fn delete_record(&self, existing: &DnsRecord) -> Result<bool> {
        self.delete_inner(existing)
            .instrument(self.span.clone())
            .await
    }
}

//==============================================================================
// Tests
//==============================================================================
