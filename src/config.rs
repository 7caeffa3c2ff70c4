//! Configuration management for scrapeboard using the prefer crate.
//!
//! Precedence, lowest to highest: built-in defaults, config file discovered
//! by prefer, `SCRAPEBOARD_*` environment variables, command-line flags.

use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardOptions;
use crate::error::ConfigError;
use crate::firestore::FirestoreSettings;
use crate::render::{DateFormatter, PageLayout, DEFAULT_DATE_FORMAT};

/// Name prefer uses to discover config files.
pub const CONFIG_NAME: &str = "scrapeboard";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Database connection.
    pub firestore: FirestoreSettings,
    /// Maximum scrape log entries per page view (None = all).
    pub log_limit: Option<u32>,
    /// chrono format string for timestamps.
    pub date_format: String,
    /// Viewer timezone as minutes east of UTC (None = host local time).
    pub utc_offset_minutes: Option<i32>,
    /// Whether the page has a model count label.
    pub show_model_count: bool,
    /// Render failures into the page instead of leaving regions empty.
    pub show_errors: bool,
    /// Placeholder item for an empty scrape history.
    pub empty_message: Option<String>,
    /// Page title.
    pub title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            firestore: FirestoreSettings::default(),
            log_limit: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            utc_offset_minutes: None,
            show_model_count: true,
            show_errors: false,
            empty_message: None,
            title: "Scrape Dashboard".to_string(),
        }
    }
}

impl Settings {
    /// Check settings and build the dashboard options they describe.
    pub fn dashboard_options(&self) -> Result<DashboardOptions, ConfigError> {
        let zone = DateFormatter::zone_from_offset_minutes(self.utc_offset_minutes)?;
        let formatter = DateFormatter::new(&self.date_format, zone)?;
        Ok(DashboardOptions {
            formatter,
            layout: PageLayout {
                show_model_count: self.show_model_count,
            },
            log_limit: self.log_limit,
            empty_message: self.empty_message.clone(),
            title: self.title.clone(),
        })
    }

    /// Apply `SCRAPEBOARD_*` environment variables.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    /// Apply overrides from a variable lookup.
    pub fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(project) = var("SCRAPEBOARD_PROJECT_ID") {
            self.firestore.project_id = project;
        }
        if let Some(key) = var("SCRAPEBOARD_API_KEY") {
            self.firestore.api_key = Some(key);
        }
        if let Some(token) = var("SCRAPEBOARD_AUTH_TOKEN") {
            self.firestore.auth_token = Some(token);
        }
        if let Some(endpoint) = var("SCRAPEBOARD_ENDPOINT") {
            self.firestore.endpoint = endpoint;
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Google Cloud project id.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Web API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Database id (defaults to "(default)").
    #[serde(default)]
    pub database: Option<String>,
    /// REST endpoint base URL, e.g. an emulator.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Bearer token for authenticated reads.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Maximum scrape log entries per page view.
    #[serde(default)]
    pub log_limit: Option<u32>,
    /// chrono format string for timestamps.
    #[serde(default)]
    pub date_format: Option<String>,
    /// Viewer timezone offset in minutes east of UTC.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
    #[serde(default)]
    pub show_model_count: Option<bool>,
    #[serde(default)]
    pub show_errors: Option<bool>,
    #[serde(default)]
    pub empty_message: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers scrapeboard config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load(CONFIG_NAME).await {
            Ok(pref_config) => Config {
                project_id: pref_config.get("project_id").ok(),
                api_key: pref_config.get("api_key").ok(),
                database: pref_config.get("database").ok(),
                endpoint: pref_config.get("endpoint").ok(),
                auth_token: pref_config.get("auth_token").ok(),
                request_timeout: pref_config.get("request_timeout").ok(),
                user_agent: pref_config.get("user_agent").ok(),
                log_limit: pref_config.get("log_limit").ok(),
                date_format: pref_config.get("date_format").ok(),
                utc_offset_minutes: pref_config.get("utc_offset_minutes").ok(),
                show_model_count: pref_config.get("show_model_count").ok(),
                show_errors: pref_config.get("show_errors").ok(),
                empty_message: pref_config.get("empty_message").ok(),
                title: pref_config.get("title").ok(),
            },
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        let fs = &mut settings.firestore;
        if let Some(ref project_id) = self.project_id {
            fs.project_id = project_id.clone();
        }
        if let Some(ref key) = self.api_key {
            fs.api_key = Some(key.clone());
        }
        if let Some(ref database) = self.database {
            fs.database = database.clone();
        }
        if let Some(ref endpoint) = self.endpoint {
            fs.endpoint = endpoint.clone();
        }
        if let Some(ref token) = self.auth_token {
            fs.auth_token = Some(token.clone());
        }
        if let Some(timeout) = self.request_timeout {
            fs.request_timeout = timeout;
        }
        if let Some(ref user_agent) = self.user_agent {
            fs.user_agent = user_agent.clone();
        }
        if let Some(limit) = self.log_limit {
            settings.log_limit = Some(limit);
        }
        if let Some(ref format) = self.date_format {
            settings.date_format = format.clone();
        }
        if let Some(offset) = self.utc_offset_minutes {
            settings.utc_offset_minutes = Some(offset);
        }
        if let Some(show) = self.show_model_count {
            settings.show_model_count = show;
        }
        if let Some(show) = self.show_errors {
            settings.show_errors = show;
        }
        if let Some(ref message) = self.empty_message {
            settings.empty_message = Some(message.clone());
        }
        if let Some(ref title) = self.title {
            settings.title = title.clone();
        }
    }
}

/// Load settings from configuration file and environment.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings.apply_env();
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.firestore.project_id.is_empty());
        assert_eq!(settings.firestore.database, "(default)");
        assert!(settings.show_model_count);
        assert!(!settings.show_errors);
        assert!(settings.log_limit.is_none());
    }

    #[test]
    fn test_apply_config() {
        let config: Config = serde_json::from_str(
            r#"{
                "project_id": "agency-database",
                "api_key": "abc",
                "log_limit": 50,
                "show_model_count": false,
                "utc_offset_minutes": 600
            }"#,
        )
        .unwrap();
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);

        assert_eq!(settings.firestore.project_id, "agency-database");
        assert_eq!(settings.firestore.api_key.as_deref(), Some("abc"));
        assert_eq!(settings.log_limit, Some(50));
        assert!(!settings.show_model_count);
        assert_eq!(settings.utc_offset_minutes, Some(600));
        // Untouched values keep their defaults
        assert_eq!(settings.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn test_env_overrides_config_file() {
        let config: Config = serde_json::from_str(
            r#"{
                "project_id": "file-project",
                "api_key": "file-key",
                "auth_token": "file-token",
                "endpoint": "http://file:8080",
                "log_limit": 10
            }"#,
        )
        .unwrap();
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);
        settings.apply_vars(|name| match name {
            "SCRAPEBOARD_PROJECT_ID" => Some("env-project".to_string()),
            "SCRAPEBOARD_AUTH_TOKEN" => Some("env-token".to_string()),
            "SCRAPEBOARD_ENDPOINT" => Some("http://localhost:8080".to_string()),
            _ => None,
        });

        assert_eq!(settings.firestore.project_id, "env-project");
        assert_eq!(settings.firestore.auth_token.as_deref(), Some("env-token"));
        assert_eq!(settings.firestore.endpoint, "http://localhost:8080");
        // Keys absent from the environment keep the file's values
        assert_eq!(settings.firestore.api_key.as_deref(), Some("file-key"));
        assert_eq!(settings.log_limit, Some(10));
    }

    #[test]
    fn test_apply_env_reads_process_environment() {
        // Not read by any other test or by the CLI's env fallbacks.
        std::env::set_var("SCRAPEBOARD_AUTH_TOKEN", "process-token");
        let mut settings = Settings {
            firestore: FirestoreSettings {
                auth_token: Some("file-token".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        settings.apply_env();
        std::env::remove_var("SCRAPEBOARD_AUTH_TOKEN");

        assert_eq!(
            settings.firestore.auth_token.as_deref(),
            Some("process-token")
        );
    }

    #[test]
    fn test_dashboard_options() {
        let settings = Settings {
            show_model_count: false,
            empty_message: Some("No scrape history yet".to_string()),
            ..Default::default()
        };
        let options = settings.dashboard_options().unwrap();
        assert!(!options.layout.show_model_count);
        assert_eq!(options.empty_message.as_deref(), Some("No scrape history yet"));
    }

    #[test]
    fn test_dashboard_options_rejects_bad_format() {
        let settings = Settings {
            date_format: "%Y-%".to_string(),
            ..Default::default()
        };
        assert!(settings.dashboard_options().is_err());
    }
}
