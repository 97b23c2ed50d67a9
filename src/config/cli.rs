use crate::config::toml_config::TomlConfig;
use crate::domain::model::SortCriterion;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Parser)]
#[command(name = "tmdb-movies")]
#[command(about = "Browse the most popular and top rated movies on TMDB")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file; flags override its values")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "TMDB API key (falls back to $TMDB_API_KEY)")]
    pub api_key: Option<String>,

    #[arg(long)]
    pub api_base_url: Option<String>,

    #[arg(long)]
    pub image_base_url: Option<String>,

    #[arg(long)]
    pub image_size: Option<String>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "host:port used to check connectivity")]
    pub probe_addr: Option<String>,

    #[arg(long, help = "popular or top_rated")]
    pub sort: Option<SortCriterion>,

    #[arg(long, help = "Show the detail view for the movie at this position (1-based)")]
    pub show: Option<usize>,

    #[arg(long, help = "Print at most this many movies")]
    pub limit: Option<usize>,

    #[arg(long, help = "Restore list state from this file instead of fetching")]
    pub state_in: Option<PathBuf>,

    #[arg(long, help = "Save list state to this file on exit")]
    pub state_out: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// Effective settings: the config file (or defaults), then flags, then `$TMDB_API_KEY`.
    pub fn settings(&self) -> Result<TomlConfig> {
        let mut settings = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(api_key) = &self.api_key {
            settings.api.api_key = api_key.clone();
        } else if settings.api.api_key.is_empty() {
            if let Ok(api_key) = std::env::var(API_KEY_ENV) {
                settings.api.api_key = api_key;
            }
        }
        if let Some(base_url) = &self.api_base_url {
            settings.api.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.api.timeout_seconds = Some(timeout);
        }
        if let Some(base_url) = &self.image_base_url {
            settings.images.base_url = base_url.clone();
        }
        if let Some(size) = &self.image_size {
            settings.images.size = size.clone();
        }
        if let Some(probe_addr) = &self.probe_addr {
            settings.connectivity.probe_addr = probe_addr.clone();
        }
        if let Some(sort) = self.sort {
            settings.list.default_sort = sort;
        }

        settings.validate()?;
        Ok(settings)
    }
}
