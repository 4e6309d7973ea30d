use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_DB_PATH: &str = "tickler.db";
pub const DEFAULT_CONFIG_PATH: &str = "tickler.toml";
pub const DOTENV_PATH: &str = ".env";
/// Every day at 09:00 local time.
pub const DEFAULT_REMINDER_SCHEDULE: &str = "0 9 * * *";
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Top-level config (tickler.toml + TICKLER_* env overrides + legacy flat env vars).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicklerConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub todos: TodosConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            auth: AuthConfig::default(),
        }
    }
}

/// Access gate for the operator endpoints (`/admin`, `/notify`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub mode: AuthMode,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// Operator endpoints are open to any caller.
    #[default]
    None,
    /// `Authorization: Bearer <token>` must match `gateway.auth.token`.
    Token,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodosConfig {
    /// When true, `POST /toggle/{id}` answers 404 for an unknown id instead of
    /// redirecting back to the list.
    #[serde(default)]
    pub strict_toggle: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Start the timer-driven reminder. `/notify` works either way.
    #[serde(default = "bool_true")]
    pub enabled: bool,
    /// Cron expression (`m h dom mon dow`), `@daily`-style macro, or `@every 30m`.
    #[serde(default = "default_schedule")]
    pub schedule: String,
    /// chrono `strftime` pattern for the date line of the digest.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: default_schedule(),
            date_format: default_date_format(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    pub telegram: Option<TelegramConfig>,
    pub webhook: Option<WebhookConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Destination chat. Negative for groups and channels.
    pub chat_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Receives `POST {"text": "..."}`.
    pub url: String,
}

fn bool_true() -> bool {
    true
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}
fn default_schedule() -> String {
    DEFAULT_REMINDER_SCHEDULE.to_string()
}
fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

/// Flat variables understood for compatibility with older deployments.
/// Merged last, so they win over both the file and `TICKLER_*` keys.
fn legacy_key(name: &str) -> Option<&'static str> {
    match name {
        "PORT" => Some("gateway.port"),
        "DATABASE_PATH" => Some("database.path"),
        "TELEGRAM_BOT_TOKEN" => Some("notify.telegram.bot_token"),
        "TELEGRAM_CHAT_ID" => Some("notify.telegram.chat_id"),
        "CRON_SCHEDULE" => Some("reminder.schedule"),
        _ => None,
    }
}

/// Copy `./.env` into the process environment before [`TicklerConfig::load`],
/// so deployments that keep `TELEGRAM_BOT_TOKEN` and friends there still work.
///
/// Variables already present in the environment keep their values. Returns the
/// file that was read, or `None` when there is no `.env`.
pub fn load_dotenv() -> crate::error::Result<Option<PathBuf>> {
    let path = Path::new(DOTENV_PATH);
    match dotenvy::from_path(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(crate::error::TicklerError::Config(format!(
            "{DOTENV_PATH}: {e}"
        ))),
    }
}

impl TicklerConfig {
    /// Load config from a TOML file with env var overrides.
    ///
    /// Precedence (lowest first):
    ///   1. Built-in defaults
    ///   2. The TOML file (`config_path`, else `./tickler.toml`; a missing file is fine)
    ///   3. `TICKLER_*` variables, `__` separating nested keys (`TICKLER_GATEWAY__PORT`)
    ///   4. Legacy flat variables (`PORT`, `TELEGRAM_BOT_TOKEN`, `CRON_SCHEDULE`, ...)
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);

        let config: TicklerConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("TICKLER_").split("__"))
            .merge(Env::raw().filter_map(|key| {
                legacy_key(&key.as_str().to_ascii_uppercase()).map(Into::into)
            }))
            .extract()
            .map_err(|e| crate::error::TicklerError::Config(e.to_string()))?;

        Ok(config)
    }
}
