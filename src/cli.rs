//! Command-line interface.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use scrapeboard::config::{load_settings, Settings};
use scrapeboard::dashboard::render_dashboard;
use scrapeboard::firestore::FirestoreClient;
use scrapeboard::queries::{fetch_model_count, fetch_recent_scrape_logs};
use scrapeboard::render::{log_line, model_count_text};
use scrapeboard::server::{self, error_handler};

/// Read-only dashboard for agency scrape logs
#[derive(Parser, Debug)]
#[command(name = "scrapeboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Google Cloud project id
    #[arg(long, global = true, env = "SCRAPEBOARD_PROJECT_ID")]
    project_id: Option<String>,

    /// Web API key
    #[arg(long, global = true, env = "SCRAPEBOARD_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// REST endpoint, e.g. http://localhost:8080 for the emulator
    #[arg(long, global = true, env = "SCRAPEBOARD_ENDPOINT")]
    endpoint: Option<String>,

    /// Maximum scrape log entries to fetch
    #[arg(long, global = true)]
    limit: Option<u32>,

    /// Show query failures in the page instead of leaving sections empty
    #[arg(long, global = true)]
    show_errors: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the dashboard page once
    Render {
        /// Write HTML here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print scrape log lines, newest first
    Logs {
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the total number of models
    Count,
    /// Serve the dashboard over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(short, long, default_value = "3030")]
        port: u16,
    },
}

/// `RUST_LOG` when set, otherwise warn; `--verbose` adds debug for this crate either way.
fn log_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if !verbose {
        return filter;
    }
    match "scrapeboard=debug".parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .init();
}

impl Cli {
    /// Flags take precedence over config file and environment.
    fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref project_id) = self.project_id {
            settings.firestore.project_id = project_id.clone();
        }
        if let Some(ref key) = self.api_key {
            settings.firestore.api_key = Some(key.clone());
        }
        if let Some(ref endpoint) = self.endpoint {
            settings.firestore.endpoint = endpoint.clone();
        }
        if let Some(limit) = self.limit {
            settings.log_limit = Some(limit);
        }
        if self.show_errors {
            settings.show_errors = true;
        }
    }
}

/// Run the CLI
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = load_settings().await;
    cli.apply_to_settings(&mut settings);

    match cli.command {
        Commands::Render { output } => cmd_render(&settings, output).await,
        Commands::Logs { json } => cmd_logs(&settings, json).await,
        Commands::Count => cmd_count(&settings).await,
        Commands::Serve { host, port } => server::serve(&settings, &host, port).await,
    }
}

async fn cmd_render(settings: &Settings, output: Option<String>) -> anyhow::Result<()> {
    let store = FirestoreClient::new(&settings.firestore)?;
    let options = settings.dashboard_options()?;
    let handler = error_handler(settings.show_errors);

    let view = render_dashboard(&store, &options, handler.as_ref()).await;
    let html = view.page.to_document(&options.title);

    match output {
        Some(path) => {
            let path = PathBuf::from(shellexpand::tilde(&path).as_ref());
            tokio::fs::write(&path, html)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", html),
    }

    for (section, outcome) in [("scrape logs", &view.logs), ("model count", &view.model_count)] {
        if let Some(err) = outcome.error() {
            tracing::warn!("{} not rendered: {}", section, err);
        }
    }
    Ok(())
}

async fn cmd_logs(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let store = FirestoreClient::new(&settings.firestore)?;
    let options = settings.dashboard_options()?;
    let entries = fetch_recent_scrape_logs(&store, settings.log_limit)
        .await
        .context("loading scrape logs")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", log_line(entry, &options.formatter));
        }
    }
    Ok(())
}

async fn cmd_count(settings: &Settings) -> anyhow::Result<()> {
    let store = FirestoreClient::new(&settings.firestore)?;
    let count = fetch_model_count(&store)
        .await
        .context("counting models")?;
    println!("{}", model_count_text(count));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrapeboard::config::Config;

    #[test]
    fn test_flags_win_over_file_and_env() {
        let config: Config = serde_json::from_str(
            r#"{"project_id": "file-project", "api_key": "file-key", "log_limit": 10}"#,
        )
        .unwrap();
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);
        settings.apply_vars(|name| match name {
            "SCRAPEBOARD_PROJECT_ID" => Some("env-project".to_string()),
            "SCRAPEBOARD_ENDPOINT" => Some("http://env:8080".to_string()),
            _ => None,
        });

        let cli = Cli::try_parse_from([
            "scrapeboard",
            "--project-id",
            "flag-project",
            "--endpoint",
            "http://localhost:8080",
            "--limit",
            "5",
            "--show-errors",
            "logs",
            "--json",
        ])
        .unwrap();
        cli.apply_to_settings(&mut settings);

        assert_eq!(settings.firestore.project_id, "flag-project");
        assert_eq!(settings.firestore.endpoint, "http://localhost:8080");
        assert_eq!(settings.log_limit, Some(5));
        assert!(settings.show_errors);
        // Not given on the command line
        assert_eq!(settings.firestore.api_key.as_deref(), Some("file-key"));
        assert!(matches!(cli.command, Commands::Logs { json: true }));
    }

    #[test]
    fn test_absent_flags_leave_settings_alone() {
        let mut settings = Settings {
            log_limit: Some(10),
            show_errors: true,
            ..Default::default()
        };
        let cli = Cli::try_parse_from(["scrapeboard", "count"]).unwrap();
        cli.apply_to_settings(&mut settings);
        assert_eq!(settings.log_limit, Some(10));
        assert!(settings.show_errors);
    }

    #[test]
    fn test_verbose_adds_debug_directive() {
        assert!(log_filter(true).to_string().contains("scrapeboard=debug"));
        assert!(!log_filter(false).to_string().contains("scrapeboard=debug"));
    }
}
