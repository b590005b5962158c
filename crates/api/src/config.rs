use fleetwatch_core::error::CoreError;
use fleetwatch_core::records::{OfflineFilter, DEFAULT_OFFLINE_CLIENT, DEFAULT_OFFLINE_MIN_HOURS};
use fleetwatch_core::tabs::StaticTabDirectory;
use fleetwatch_sheets::client::DEFAULT_BASE_URL;
use fleetwatch_sheets::feed::{
    DEFAULT_AI_ALERTS_SHEET_ID, DEFAULT_OFFLINE_SHEET_ID, DEFAULT_SPEED_SHEET_ID,
};
use fleetwatch_sheets::FeedConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Postgres URL for status overrides. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Spreadsheet export host.
    pub sheets_base_url: String,
    /// Upstream fetch timeout in seconds (default: `30`).
    pub sheets_timeout_secs: u64,
    /// Spreadsheet ids for each feed.
    pub feeds: FeedConfig,
    /// Which offline rows are kept.
    pub offline_filter: OfflineFilter,
    /// Extra date-label entries, `{"speed": {"26 August": "123"}}`.
    pub tab_directory_json: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                 |
    /// |-------------------------|-----------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                               |
    /// | `PORT`                  | `3000`                                  |
    /// | `CORS_ORIGINS`          | `*`                                     |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                    |
    /// | `DATABASE_URL`          | unset (in-memory status store)          |
    /// | `SHEETS_BASE_URL`       | `https://docs.google.com/spreadsheets`  |
    /// | `SHEETS_TIMEOUT_SECS`   | `30`                                    |
    /// | `OFFLINE_SHEET_ID`      | published offline report                |
    /// | `SPEED_SHEET_ID`        | published speed report                  |
    /// | `AI_ALERTS_SHEET_ID`    | published AI alert report               |
    /// | `OFFLINE_CLIENT_FILTER` | `g4s`                                   |
    /// | `OFFLINE_MIN_HOURS`     | `24`                                    |
    /// | `TAB_DIRECTORY_JSON`    | unset                                   |
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let sheets_timeout_secs: u64 = env_or("SHEETS_TIMEOUT_SECS", "30")
            .parse()
            .expect("SHEETS_TIMEOUT_SECS must be a valid u64");

        let min_hours: f64 = env_or("OFFLINE_MIN_HOURS", &DEFAULT_OFFLINE_MIN_HOURS.to_string())
            .parse()
            .expect("OFFLINE_MIN_HOURS must be a number");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url: env_opt("DATABASE_URL"),
            sheets_base_url: env_or("SHEETS_BASE_URL", DEFAULT_BASE_URL),
            sheets_timeout_secs,
            feeds: FeedConfig {
                offline_sheet_id: env_or("OFFLINE_SHEET_ID", DEFAULT_OFFLINE_SHEET_ID),
                speed_sheet_id: env_or("SPEED_SHEET_ID", DEFAULT_SPEED_SHEET_ID),
                ai_alerts_sheet_id: env_or("AI_ALERTS_SHEET_ID", DEFAULT_AI_ALERTS_SHEET_ID),
            },
            offline_filter: OfflineFilter::new(
                env_or("OFFLINE_CLIENT_FILTER", DEFAULT_OFFLINE_CLIENT),
                min_hours,
            ),
            tab_directory_json: env_opt("TAB_DIRECTORY_JSON"),
        }
    }

    /// The built-in tab directory extended with `TAB_DIRECTORY_JSON`.
    pub fn tab_directory(&self) -> Result<StaticTabDirectory, CoreError> {
        let directory = StaticTabDirectory::default();
        match &self.tab_directory_json {
            Some(json) => directory.extend_from_json(json),
            None => Ok(directory),
        }
    }

    /// Whether CORS should allow any origin.
    pub fn cors_allows_any(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
            database_url: None,
            sheets_base_url: DEFAULT_BASE_URL.to_string(),
            sheets_timeout_secs: 30,
            feeds: FeedConfig::default(),
            offline_filter: OfflineFilter::default(),
            tab_directory_json: None,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
