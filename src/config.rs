use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    #[serde(default)]
    pub url: String,
    /// Service-role key; bypasses row-level security.
    #[serde(default)]
    pub service_role_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    /// Only posts from this chat are stored when set (e.g. -1001234567890).
    #[serde(default)]
    pub channel_id: Option<i64>,
    /// Fall back to `update.message` when there is no `channel_post`.
    /// Handy when testing the webhook from a private chat.
    #[serde(default)]
    pub accept_direct_messages: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DebugConfig {
    /// Mounts `GET /test-insert` for checking Supabase connectivity.
    #[serde(default)]
    pub test_insert_route: bool,
}

fn default_table() -> String {
    "telegram_posts".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            service_role_key: String::new(),
            table: default_table(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the TOML file, then the process
    /// environment. With no explicit path, `config.toml` is read only if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay environment variables. Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("SUPABASE_URL") {
            self.supabase.url = url;
        }
        if let Some(key) = var("SUPABASE_SERVICE_ROLE_KEY") {
            self.supabase.service_role_key = key;
        }
        if let Some(table) = var("SUPABASE_TABLE") {
            self.supabase.table = table;
        }
        if let Some(id) = var("TELEGRAM_CHANNEL_ID") {
            let id = id
                .trim()
                .parse::<i64>()
                .with_context(|| format!("TELEGRAM_CHANNEL_ID is not a numeric chat id: {id}"))?;
            self.telegram.channel_id = Some(id);
        }
        if let Some(flag) = var("TELEGRAM_ACCEPT_MESSAGES") {
            self.telegram.accept_direct_messages = parse_bool("TELEGRAM_ACCEPT_MESSAGES", &flag)?;
        }
        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?;
        }
        if let Some(flag) = var("ENABLE_TEST_INSERT") {
            self.debug.test_insert_route = parse_bool("ENABLE_TEST_INSERT", &flag)?;
        }

        Ok(())
    }

    /// Check required settings and normalize the Supabase URL.
    pub fn validate(&mut self) -> Result<()> {
        if self.supabase.url.trim().is_empty() {
            anyhow::bail!("Supabase URL is not set (SUPABASE_URL)");
        }
        if self.supabase.service_role_key.trim().is_empty() {
            anyhow::bail!("Supabase service role key is not set (SUPABASE_SERVICE_ROLE_KEY)");
        }
        if self.supabase.table.trim().is_empty() {
            anyhow::bail!("Supabase table name is empty (SUPABASE_TABLE)");
        }

        self.supabase.url = self.supabase.url.trim().trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} must be a boolean (true/false), got: {other}"),
    }
}
