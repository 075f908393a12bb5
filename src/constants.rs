//! Common constants used throughout hetzname

//==============================================================================
// Hetzner API Constants
//==============================================================================

/// Hetzner DNS API base URL
pub const HETZNER_API_BASE: &str = "https://dns.hetzner.com/api/v1";

/// Request header carrying the API token
pub const HETZNER_AUTH_HEADER: &str = "Auth-API-Token";

/// User agent string for API requests
pub const HETZNAME_USER_AGENT: &str = concat!("hetzname/", env!("CARGO_PKG_VERSION"));

/// Page size requested from listing endpoints (the API maximum is 100)
pub const LIST_PAGE_SIZE: u32 = 100;

/// Upper bound on pages fetched from one listing
pub const MAX_LIST_PAGES: u32 = 1000;

/// Longest slice of a non-JSON error body quoted in a diagnostic
pub const MAX_ERROR_BODY_CHARS: usize = 200;

//==============================================================================
// Public IP Discovery
//==============================================================================

/// Plain-text echo service reachable over IPv4 only
pub const DEFAULT_IPV4_URL: &str = "https://ipv4.icanhazip.com";

/// Plain-text echo service reachable over IPv6 only
pub const DEFAULT_IPV6_URL: &str = "https://ipv6.icanhazip.com";

//==============================================================================
// Timeout Constants
//==============================================================================

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Minimum HTTP request timeout in seconds
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Maximum HTTP request timeout in seconds
pub const MAX_TIMEOUT_SECS: u64 = 300;

//==============================================================================
// Validation Constants
//==============================================================================

/// Maximum DNS name length in characters
pub const MAX_RECORD_NAME_LENGTH: usize = 253;

/// Maximum DNS label length in characters
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum zone or record ID length in characters
pub const MAX_ID_LENGTH: usize = 64;

//==============================================================================
// Environment Variable Names
//==============================================================================

/// Environment variable name for the Hetzner DNS API token
pub const ENV_API_TOKEN: &str = "HETZNAME_API_TOKEN";

/// Environment variable name for the API base URL override
pub const ENV_API_BASE: &str = "HETZNAME_API_BASE";

/// Environment variable name for the HTTP timeout (seconds)
pub const ENV_TIMEOUT: &str = "HETZNAME_TIMEOUT";
