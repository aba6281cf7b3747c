//! Test doubles shared by the integration tests
//!
//! `FakePdd` answers the PDD DNS API and the IP-echo services from memory,
//! so the real client, resolver and updater run end to end without network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use yadns::dns_provider::{DnsProvider, DnsRecord, RecordFields, RecordSet};
use yadns::external_ip::{ExternalIpResolver, IpSource};
use yadns::pdd::PddClient;
use yadns::transport::HttpTransport;
use yadns::{Error, Result};

pub const API_BASE: &str = "http://pdd.test/api2/admin/dns";
pub const DOMAIN: &str = "example.com";
pub const TOKEN: &str = "0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123";

/// A zone with an MX record followed by two A records
pub fn zone_records() -> Vec<Value> {
    vec![
        json!({"record_id": 100, "type": "MX", "domain": DOMAIN, "subdomain": "@",
               "fqdn": DOMAIN, "ttl": 21600, "content": "mx.yandex.net.", "priority": 10}),
        json!({"record_id": 101, "type": "A", "domain": DOMAIN, "subdomain": "@",
               "fqdn": DOMAIN, "ttl": 21600, "content": "198.51.100.1", "priority": ""}),
        json!({"record_id": 102, "type": "A", "domain": DOMAIN, "subdomain": "www",
               "fqdn": "www.example.com", "ttl": 900, "content": "198.51.100.2", "priority": ""}),
    ]
}

/// In-memory PDD zone plus IP-echo endpoints
pub struct FakePdd {
    records: Mutex<Vec<Value>>,
    next_id: AtomicUsize,
    echo: Mutex<HashMap<String, String>>,
    reject_writes: Mutex<Option<String>>,
    drop_writes: AtomicBool,
    pub gets: AtomicUsize,
    pub writes: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl FakePdd {
    pub fn new(records: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(records),
            next_id: AtomicUsize::new(500),
            echo: Mutex::new(HashMap::new()),
            reject_writes: Mutex::new(None),
            drop_writes: AtomicBool::new(false),
            gets: AtomicUsize::new(0),
            writes: Mutex::new(Vec::new()),
        })
    }

    /// Makes `url` answer with `body`
    pub fn serve(&self, url: &str, body: &str) {
        self.echo
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
    }

    /// Answers every write with `{"success":"error","error":<code>}`
    pub fn reject_writes(&self, code: &str) {
        *self.reject_writes.lock().unwrap() = Some(code.to_string());
    }

    /// Makes every write fail at the transport level, after it is recorded
    pub fn drop_writes(&self) {
        self.drop_writes.store(true, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn records(&self) -> Vec<Value> {
        self.records.lock().unwrap().clone()
    }

    fn ok(extra: Value) -> String {
        let mut body = json!({"success": "ok", "domain": DOMAIN});
        if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                body.insert(k.clone(), v.clone());
            }
        }
        body.to_string()
    }

    fn field<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn id_matches(record: &Value, id: &str) -> bool {
        record["record_id"].to_string().trim_matches('"') == id
    }

    fn handle_write(&self, action: &str, form: &[(String, String)]) -> String {
        if let Some(code) = self.reject_writes.lock().unwrap().clone() {
            return json!({"success": "error", "error": code}).to_string();
        }
        if Self::field(form, "domain") != Some(DOMAIN) {
            return json!({"success": "error", "error": "bad_domain"}).to_string();
        }

        let mut records = self.records.lock().unwrap();
        match action {
            "add" => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let mut record = json!({"record_id": id, "domain": DOMAIN, "subdomain": "@", "ttl": 21600});
                for (k, v) in form {
                    let value = match k.as_str() {
                        "ttl" => json!(v.parse::<u64>().unwrap_or(21600)),
                        _ => json!(v),
                    };
                    record[k.as_str()] = value;
                }
                records.push(record.clone());
                Self::ok(json!({"record": record}))
            }
            "edit" | "del" => {
                let Some(id) = Self::field(form, "record_id") else {
                    return json!({"success": "error", "error": "no_record_id"}).to_string();
                };
                let Some(pos) = records.iter().position(|r| Self::id_matches(r, id)) else {
                    return json!({"success": "error", "error": "not_found"}).to_string();
                };
                if action == "del" {
                    records.remove(pos);
                    return Self::ok(json!({"record_id": id}));
                }
                for (k, v) in form {
                    if k == "domain" || k == "record_id" {
                        continue;
                    }
                    let value = match k.as_str() {
                        "ttl" => json!(v.parse::<u64>().unwrap_or(21600)),
                        _ => json!(v),
                    };
                    records[pos][k.as_str()] = value;
                }
                Self::ok(json!({"record": records[pos].clone()}))
            }
            _ => json!({"success": "error", "error": "unknown_method"}).to_string(),
        }
    }
}

#[async_trait]
impl HttpTransport for FakePdd {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if let Some(body) = self.echo.lock().unwrap().get(url) {
            return Ok(body.clone());
        }
        if url == format!("{}/list?domain={}", API_BASE, DOMAIN) {
            if !headers.contains(&("PddToken", TOKEN)) {
                return Ok(json!({"success": "error", "error": "no_auth"}).to_string());
            }
            return Ok(Self::ok(json!({"records": self.records()})));
        }
        Err(Error::network(format!("request timed out: {}", url)))
    }

    async fn post_form(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        form: &[(String, String)],
    ) -> Result<String> {
        let Some(action) = url.strip_prefix(&format!("{}/", API_BASE)) else {
            return Err(Error::network(format!("unknown host: {}", url)));
        };
        self.writes
            .lock()
            .unwrap()
            .push((action.to_string(), form.to_vec()));
        if self.drop_writes.load(Ordering::SeqCst) {
            return Err(Error::network(format!("connection reset: {}", url)));
        }
        if !headers.contains(&("PddToken", TOKEN)) {
            return Ok(json!({"success": "error", "error": "no_auth"}).to_string());
        }
        Ok(self.handle_write(action, form))
    }
}

pub fn pdd_client(fake: &Arc<FakePdd>) -> PddClient {
    PddClient::new(DOMAIN, TOKEN, fake.clone()).with_api_base(API_BASE)
}

/// Resolver over three fake echo services; callers decide which ones answer
pub fn resolver(fake: &Arc<FakePdd>) -> ExternalIpResolver {
    ExternalIpResolver::with_sources(
        fake.clone(),
        vec![
            IpSource::new("http://echo-one.test/?format=json", "ip"),
            IpSource::new("http://echo-two.test/all.json", "ip_addr"),
            IpSource::new("http://echo-three.test/ip?json", "ip"),
        ],
    )
}

/// Wraps a provider and counts the calls made through the trait
pub struct CountingProvider<P> {
    inner: P,
    pub lists: AtomicUsize,
    pub updates: Mutex<Vec<(DnsRecord, RecordFields)>>,
}

impl<P: DnsProvider> CountingProvider<P> {
    pub fn new(inner: P) -> Arc<Self> {
        Arc::new(Self {
            inner,
            lists: AtomicUsize::new(0),
            updates: Mutex::new(Vec::new()),
        })
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl<P: DnsProvider> DnsProvider for CountingProvider<P> {
    fn domain(&self) -> &str {
        self.inner.domain()
    }

    async fn list_records(&self) -> Result<RecordSet> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list_records().await
    }

    async fn add_record(&self, fields: &RecordFields) -> Result<bool> {
        self.inner.add_record(fields).await
    }

    async fn update_record(&self, existing: &DnsRecord, changes: &RecordFields) -> Result<bool> {
        self.updates
            .lock()
            .unwrap()
            .push((existing.clone(), changes.clone()));
        self.inner.update_record(existing, changes).await
    }

    async fn delete_record(&self, existing: &DnsRecord) -> Result<bool> {
        self.inner.delete_record(existing).await
    }
}
