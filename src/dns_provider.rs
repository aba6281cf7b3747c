//! DNS provider abstraction layer
//!
//! Record types shared by the PDD client and the updater, plus the trait the
//! updater is written against.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

//==============================================================================
// Types
//==============================================================================

/// Provider-assigned record identifier
///
/// PDD sends a number, but the value is only ever echoed back, so a string
/// form is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        match value.parse::<u64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(value.to_string()),
        }
    }
}

/// One DNS record as returned by the provider
///
/// Records are snapshots: changing one means sending a delta with
/// [`DnsProvider::update_record`] and listing again. Keys this struct does
/// not model (`fqdn`, `priority`, ...) are kept in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub record_id: RecordId,
    pub domain: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub subdomain: String,
    pub content: String,
    pub ttl: u32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>5} {:>10.10} {:>20.20} {:>7}",
            self.record_id, self.record_type, self.subdomain, self.content, self.ttl
        )
    }
}

/// Records loaded by one listing call, in provider order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet(Vec<DnsRecord>);

impl RecordSet {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self(records)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DnsRecord> {
        self.0.iter()
    }

    /// All records of the given type, keeping provider order
    pub fn by_type<'a>(&'a self, record_type: &'a str) -> impl Iterator<Item = &'a DnsRecord> + 'a {
        self.0.iter().filter(move |r| r.record_type == record_type)
    }

    /// First record of the given type in provider order
    pub fn first_of_type(&self, record_type: &str) -> Option<&DnsRecord> {
        self.0.iter().find(|r| r.record_type == record_type)
    }

    pub fn find(&self, record_id: &RecordId) -> Option<&DnsRecord> {
        self.0.iter().find(|r| &r.record_id == record_id)
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a DnsRecord;
    type IntoIter = std::slice::Iter<'a, DnsRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Request parameters for `add` and `edit` calls
///
/// Keys are the provider's parameter names (`domain`, `type`, `subdomain`,
/// `content`, `ttl`, ...). Required keys are checked by the client at the
/// call boundary, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields(BTreeMap<String, String>);

impl RecordFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for RecordFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (k, v) in iter {
            fields.set(k, v);
        }
        fields
    }
}

//==============================================================================
// Trait
//==============================================================================

/// Remote record operations for a single zone
///
/// Methods returning `bool` report logical success; whether a logical
/// failure is an `Ok(false)` or an `Err` depends on the implementation's
/// error policy. Transport failures are always `Err`.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Zone this provider instance is bound to
    fn domain(&self) -> &str;

    /// Lists every record in the zone, in provider order
    async fn list_records(&self) -> Result<RecordSet>;

    /// Creates a record; `fields` must carry `domain`, `type` and `content`
    async fn add_record(&self, fields: &RecordFields) -> Result<bool>;

    /// Sends `changes` for an existing record; identity keys in `changes` are ignored
    async fn update_record(&self, existing: &DnsRecord, changes: &RecordFields) -> Result<bool>;

    /// Deletes an existing record
    async fn delete_record(&self, existing: &DnsRecord) -> Result<bool>;
}

//==============================================================================
// Tests
//==============================================================================
