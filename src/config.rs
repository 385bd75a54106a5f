use std::path::Path;

use serde::Deserialize;

use crate::analysis::budget::{self, ScanDefaults};

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Extra seconds granted on top of a request's own timeout before the
    /// dispatch wrapper gives up waiting for the engine.
    pub timeout_grace_seconds: u64,
    pub max_concurrent_scans: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    pub retain_per_path: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub analysis: ScanDefaults,
    pub dispatch: DispatchConfig,
    pub snapshots: SnapshotConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        let defaults: &str = include_str!("../config/default.toml");
        match ::config::Config::builder()
            .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        // Mirror defaults from config/default.toml
        Self { timeout_grace_seconds: 10, max_concurrent_scans: 2 }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let defaults: &str = include_str!("../config/default.toml");
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
        // Optional local file: speicherlupe.toml (in CWD)
        .add_source(::config::File::with_name("speicherlupe").required(false));

    if let Ok(custom_path) = std::env::var("SPEICHERLUPE_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("SPEICHERLUPE").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub(crate) fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    // Request defaults must already sit inside the clamp ranges; silently
    // clamping a misconfigured default would hide the mistake.
    let a = &cfg.analysis;
    check_range("analysis.max_depth", a.max_depth, budget::MAX_DEPTH_RANGE)?;
    check_range("analysis.top_files", a.top_files, budget::TOP_FILES_RANGE)?;
    check_range("analysis.top_dirs", a.top_dirs, budget::TOP_DIRS_RANGE)?;
    check_range("analysis.max_entries", a.max_entries, budget::MAX_ENTRIES_RANGE)?;
    check_range("analysis.timeout_seconds", a.timeout_seconds, budget::TIMEOUT_SECONDS_RANGE)?;

    // Dispatch
    if cfg.dispatch.timeout_grace_seconds == 0 || cfg.dispatch.timeout_grace_seconds > 300 {
        return Err(anyhow::anyhow!("dispatch.timeout_grace_seconds must be in 1..=300"));
    }
    if cfg.dispatch.max_concurrent_scans == 0 || cfg.dispatch.max_concurrent_scans > 64 {
        return Err(anyhow::anyhow!("dispatch.max_concurrent_scans must be in 1..=64"));
    }

    if cfg.snapshots.retain_per_path == 0 {
        return Err(anyhow::anyhow!("snapshots.retain_per_path must be > 0"));
    }

    Ok(())
}

fn check_range(field: &str, value: i64, (min, max): (i64, i64)) -> anyhow::Result<()> {
    if value < min || value > max {
        return Err(anyhow::anyhow!("{} must be in {}..={}, got {}", field, min, max, value));
    }
    Ok(())
}

pub fn ensure_sqlite_parent_dir(url: &str) -> anyhow::Result<()> {
    if let Some(path) = url.strip_prefix("sqlite://") {
        // On Windows, handle URLs like sqlite:///C:/... by stripping the leading '/'
        #[cfg(windows)]
        let path = {
            let bytes = path.as_bytes();
            if bytes.len() >= 3 && bytes[0] == b'/' && bytes[2] == b':' && bytes[1].is_ascii_alphabetic() {
                &path[1..]
            } else {
                path
            }
        };
        let p = Path::new(path);
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
