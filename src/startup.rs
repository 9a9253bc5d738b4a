//! Process bootstrap: config discovery, logging setup and the startup
//! summary, kept out of `main.rs` so it can be tested.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::config::{Config, LoggingConfig};
use crate::error::{NanoIvfError, Result};

const CONFIG_ENV: &str = "NANOIVF_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "nanoivf.toml";

/// Resolve the configuration file path.
///
/// Priority:
/// 1. `NANOIVF_CONFIG` environment variable
/// 2. `./nanoivf.toml` if it exists
/// 3. None (use defaults)
pub fn resolve_config_path() -> Option<String> {
    config_path_from(std::env::var(CONFIG_ENV).ok(), Path::new(DEFAULT_CONFIG_FILE))
}

fn config_path_from(from_env: Option<String>, fallback: &Path) -> Option<String> {
    from_env.or_else(|| {
        fallback
            .exists()
            .then(|| fallback.to_string_lossy().into_owned())
    })
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level`. `logging.format` selects JSON or
/// plain text output; an unknown format falls back to text with a warning.
///
/// # Errors
/// `Config` if a global subscriber is already installed.
pub fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let installed = match logging.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };
    installed.map_err(|e| NanoIvfError::Config(format!("failed to install logger: {e}")))?;

    if !matches!(logging.format.as_str(), "json" | "text") {
        tracing::warn!(format = %logging.format, "unknown log format, using text");
    }
    Ok(())
}

/// Load config, start logging and report the settings in effect.
pub fn bootstrap() -> Result<Config> {
    let path = resolve_config_path();
    let config = Config::load(path.as_deref())?;
    init_logging(&config.logging)?;

    let idx = &config.indexing;
    tracing::info!(
        config_path = path.as_deref().unwrap_or("<defaults>"),
        nlist = idx.default_nlist,
        nprobe = idx.default_nprobe,
        kmeans_max_iterations = idx.kmeans_max_iterations,
        kmeans_delta_threshold = idx.kmeans_delta_threshold,
        seed = ?idx.seed,
        "configuration loaded"
    );
    Ok(config)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_prefers_env() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&file, "").unwrap();

        let path = config_path_from(Some("/etc/nanoivf/custom.toml".into()), &file);
        assert_eq!(path.as_deref(), Some("/etc/nanoivf/custom.toml"));
    }

    #[test]
    fn test_config_path_falls_back_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(DEFAULT_CONFIG_FILE);
        assert_eq!(config_path_from(None, &file), None);

        std::fs::write(&file, "[indexing]\ndefault_nlist = 8\n").unwrap();
        let path = config_path_from(None, &file).unwrap();
        assert_eq!(Path::new(&path), file.as_path());
        assert_eq!(Config::load(Some(path.as_str())).unwrap().indexing.default_nlist, 8);
    }

    #[test]
    fn test_second_logger_install_is_an_error() {
        let logging = LoggingConfig::default();
        // The first call may lose to another test's subscriber; the second
        // always finds one installed.
        let _ = init_logging(&logging);
        assert!(matches!(
            init_logging(&logging),
            Err(NanoIvfError::Config(_))
        ));
    }
}
