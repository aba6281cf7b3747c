//! Common constants used throughout the yadns application

//==============================================================================
// Yandex PDD API Constants
//==============================================================================

/// Base URL of the PDD DNS administration API
pub const PDD_API_BASE: &str = "https://pddimp.yandex.ru/api2/admin/dns";

/// Header carrying the PDD administrator token
pub const PDD_TOKEN_HEADER: &str = "PddToken";

/// User agent string for outgoing requests
pub const USER_AGENT: &str = "yadns/1.0";

/// Value of the envelope `success` field on a successful call
pub const PDD_SUCCESS: &str = "ok";

/// DNS record type for IPv4 addresses
pub const DNS_RECORD_TYPE_A: &str = "A";

/// Keys every `add` request must carry
pub const ADD_REQUIRED_FIELDS: [&str; 3] = ["domain", "type", "content"];

//==============================================================================
// External IP Sources
//==============================================================================

/// IP-echo services queried in order, with the JSON key holding the address
pub const EXTERNAL_IP_SOURCES: [(&str, &str); 3] = [
    ("http://api.ipify.org/?format=json", "ip"),
    ("http://ifconfig.me/all.json", "ip_addr"),
    ("http://www.trackip.net/ip?json", "ip"),
];

//==============================================================================
// Timeout Constants
//==============================================================================

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Timeout for each IP-echo request in seconds
pub const EXTERNAL_IP_TIMEOUT_SECS: u64 = 10;

/// Minimum HTTP request timeout in seconds
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Maximum HTTP request timeout in seconds
pub const MAX_TIMEOUT_SECS: u64 = 300;

//==============================================================================
// Files
//==============================================================================

/// Default location of the JSON config file
pub const DEFAULT_CONFIG_PATH: &str = "~/.yandexdns.json";

/// Log file name prefix; files live in the system temp directory
pub const LOG_FILE_PREFIX: &str = "yadns";

/// Log file name suffix
pub const LOG_FILE_SUFFIX: &str = "log";

/// Rotated log files kept, including the current one
pub const LOG_MAX_FILES: usize = 3;

//==============================================================================
// Validation Constants
//==============================================================================

/// Maximum DNS name length in characters
pub const MAX_DOMAIN_LENGTH: usize = 253;

/// Maximum DNS label length in characters
pub const MAX_LABEL_LENGTH: usize = 63;

//==============================================================================
// Environment Variable Names
//==============================================================================

/// Environment variable name for the managed domain
pub const ENV_DOMAIN: &str = "YADNS_DOMAIN";

/// Environment variable name for the PDD token
pub const ENV_TOKEN: &str = "YADNS_TOKEN";

/// Environment variable name for the strict error policy
pub const ENV_STRICT: &str = "YADNS_STRICT";
