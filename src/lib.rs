//! yadns - dynamic DNS updater for domains hosted on Yandex PDD
//!
//! Architecture:
//! - `pdd`: typed client for the PDD DNS API (list/add/edit/del) with a strict error policy
//! - `external_ip`: public IPv4 discovery from an ordered list of IP-echo services
//! - `updater`: one pass that points the zone's A record at the current address
//! - `logging`: rotated log file, timestamp formats and token redaction for the binary
//! - Uses reqwest for HTTP (rustls), behind the `transport` trait

pub mod config;
pub mod constants;
pub mod dns_provider;
pub mod error;
pub mod external_ip;
pub mod logging;
pub mod pdd;
pub mod transport;
pub mod updater;
pub mod validation;

pub use dns_provider::{DnsProvider, DnsRecord, RecordFields, RecordId, RecordSet};
pub use error::{Error, Result};
pub use updater::{ReconcileOutcome, Updater};
