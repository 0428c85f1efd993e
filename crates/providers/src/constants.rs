// AnChain AML API
pub const DEFAULT_BASE_URL: &str = "https://aml.anchainai.com/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Endpoints
pub const CRYPTO_SCREENING_PATH: &str = "crypto_screening";
pub const SANCTIONS_SCREENING_PATH: &str = "sanctions_screening";
pub const IP_SCREENING_PATH: &str = "ip_screening";

// Headers
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_RETRY_AFTER: &str = "Retry-After";

// Provider error bodies are echoed back truncated to this many characters.
pub const MAX_ERROR_DETAIL_CHARS: usize = 512;
