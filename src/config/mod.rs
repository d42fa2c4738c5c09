use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::widget::saved::DEFAULT_SAVED_CAPACITY;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;
pub const DEFAULT_LOG_FILE: &str = "./repo-finder.log";
pub const PROJECT_CONFIG_DIR: &str = ".repo-finder";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub debounce_ms: u64,
    pub saved_capacity: usize,
    pub theme: String,
    pub http: HttpConfig,
    pub no_tui: bool,
    pub log_level: String,
    pub log_file: PathBuf,
    /// What happened to each config file found while loading.
    pub load_events: Vec<ConfigLoadEvent>,
}

/// Config loading runs before logging is up, so file outcomes are kept here
/// and logged once the subscriber exists.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigLoadEvent {
    Loaded { path: PathBuf },
    ParseFailed { path: PathBuf, error: String },
}

impl ConfigLoadEvent {
    pub fn log(&self) {
        match self {
            ConfigLoadEvent::Loaded { path } => {
                info!(path=%path.display(), "loaded config file");
            }
            ConfigLoadEvent::ParseFailed { path, error } => {
                warn!(path=%path.display(), error=%error, "parse config failed");
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HttpConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            request_timeout_ms: 15_000,
            user_agent: format!("repo-finder/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            saved_capacity: DEFAULT_SAVED_CAPACITY,
            theme: "dark".to_string(),
            http: HttpConfig::default(),
            no_tui: false,
            log_level: "info".to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            load_events: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub debounce_ms: Option<u64>,
    pub saved_capacity: Option<usize>,
    pub theme: Option<String>,
    pub log_file: Option<PathBuf>,
    pub http: Option<PartialHttpConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PartialHttpConfig {
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
}

impl AppConfig {
    pub fn from_cli(cli: crate::Cli) -> Result<Self> {
        let project_root = std::env::current_dir().context("resolve current dir")?;

        let mut events = Vec::new();
        // Project file wins over the global one.
        let project_cfg = load_project_config(&project_root, &mut events).unwrap_or_default();
        let file_cfg = load_file_config(&mut events).unwrap_or_default();

        let mut cfg = Self::merge(cli, EnvOverrides::from_env(), project_cfg, file_cfg);
        cfg.load_events = events;
        Ok(cfg)
    }

    pub fn log_load_events(&self) {
        for event in &self.load_events {
            event.log();
        }
    }

    fn merge(
        cli: crate::Cli,
        env: EnvOverrides,
        project_cfg: FileConfig,
        file_cfg: FileConfig,
    ) -> Self {
        let defaults = AppConfig::default();

        let api_base_url = cli
            .api_url
            .or(env.api_base_url)
            .or(project_cfg.api_base_url)
            .or(file_cfg.api_base_url)
            .unwrap_or(defaults.api_base_url);

        let debounce_ms = cli
            .debounce_ms
            .or(env.debounce_ms)
            .or(project_cfg.debounce_ms)
            .or(file_cfg.debounce_ms)
            .unwrap_or(defaults.debounce_ms);

        let saved_capacity = project_cfg
            .saved_capacity
            .or(file_cfg.saved_capacity)
            .unwrap_or(defaults.saved_capacity)
            .max(1);

        let theme = cli
            .theme
            .or(project_cfg.theme)
            .or(file_cfg.theme)
            .unwrap_or(defaults.theme);

        let log_file = cli
            .log_file
            .or(project_cfg.log_file)
            .or(file_cfg.log_file)
            .unwrap_or(defaults.log_file);

        let log_level = cli
            .log_level
            .or(env.log_level)
            .unwrap_or(defaults.log_level);

        let http = {
            let mut http = defaults.http;
            // Global file first, project file overrides it.
            for partial in [file_cfg.http, project_cfg.http].into_iter().flatten() {
                if let Some(v) = partial.connect_timeout_ms {
                    http.connect_timeout_ms = v;
                }
                if let Some(v) = partial.request_timeout_ms {
                    http.request_timeout_ms = v;
                }
                if let Some(v) = partial.user_agent {
                    http.user_agent = v;
                }
            }
            http
        };

        Self {
            api_base_url,
            debounce_ms,
            saved_capacity,
            theme,
            http,
            no_tui: cli.no_tui,
            log_level,
            log_file,
            load_events: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    api_base_url: Option<String>,
    debounce_ms: Option<u64>,
    log_level: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            api_base_url: std::env::var("REPO_FINDER_API_URL").ok(),
            debounce_ms: std::env::var("REPO_FINDER_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok()),
            log_level: std::env::var("REPO_FINDER_LOG").ok(),
        }
    }
}

pub fn load_file_config(events: &mut Vec<ConfigLoadEvent>) -> Result<FileConfig> {
    use std::env;

    fn candidate_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Ok(p) = env::var("REPO_FINDER_CONFIG") {
            v.push(PathBuf::from(p));
        }
        if let Ok(xdg_home) = env::var("XDG_CONFIG_HOME") {
            v.push(Path::new(&xdg_home).join("repo-finder/config.toml"));
        } else if let Ok(home) = env::var("HOME") {
            v.push(Path::new(&home).join(".config/repo-finder/config.toml"));
        }
        if let Ok(dirs) = env::var("XDG_CONFIG_DIRS") {
            for d in dirs.split(':') {
                if !d.is_empty() {
                    v.push(Path::new(d).join("repo-finder/config.toml"));
                }
            }
        }
        v
    }

    for p in candidate_paths() {
        if p.exists() {
            match read_config_file(&p, events)? {
                Some(cfg) => return Ok(cfg),
                None => continue,
            }
        }
    }
    Ok(FileConfig::default())
}

/// Load project-specific configuration from .repo-finder/config.toml
pub fn load_project_config(
    project_root: &Path,
    events: &mut Vec<ConfigLoadEvent>,
) -> Result<FileConfig> {
    let path = project_root.join(PROJECT_CONFIG_DIR).join("config.toml");
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    Ok(read_config_file(&path, events)?.unwrap_or_default())
}

/// `Ok(None)` when the file exists but does not parse.
fn read_config_file(
    path: &Path,
    events: &mut Vec<ConfigLoadEvent>,
) -> Result<Option<FileConfig>> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    match toml::from_str::<FileConfig>(&s) {
        Ok(cfg) => {
            events.push(ConfigLoadEvent::Loaded {
                path: path.to_path_buf(),
            });
            Ok(Some(cfg))
        }
        Err(e) => {
            events.push(ConfigLoadEvent::ParseFailed {
                path: path.to_path_buf(),
                error: e.to_string(),
            });
            Ok(None)
        }
    }
}
