pub const DEFAULT_ENDPOINT: &str = "https://api.mc.lolipop.jp/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENDPOINT_ENV_VAR: &str = "LOLP_ENDPOINT";
pub const TLS_NO_VERIFY_ENV_VAR: &str = "LOLP_TLS_NOVERIFY";
pub const TOKEN_ENV_VAR: &str = "LOLP_TOKEN";
pub const CONFIG_PATH_ENV_VAR: &str = "LOLP_CONFIG_PATH";

/// Relative to the platform config dir.
pub const CONFIG_FILE: &str = "lolp/config.yaml";

/// Target used for every record the client emits.
pub const LOG_TARGET: &str = "lolp";

pub const PROJECT_URL: &str = env!("CARGO_PKG_REPOSITORY");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
