use crate::config::{NetworkSpec, ServerFile, ValidationError};
use log::{debug, info};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Errors raised while loading the network description
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to read configuration {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("configuration {path:?} is invalid: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

/// Load, parse and validate the network description from a YAML file
pub fn load_config(config_path: &Path) -> Result<NetworkSpec, ConfigLoadError> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path).map_err(|source| ConfigLoadError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;

    let document: ServerFile =
        serde_yaml::from_reader(file).map_err(|source| ConfigLoadError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;
    let spec = document.server;

    debug!(
        "Parsed server {} with {} users ({} active)",
        spec.endpoint,
        spec.users.len(),
        spec.active_users().count()
    );

    spec.validate().map_err(|source| ConfigLoadError::Invalid {
        path: config_path.to_path_buf(),
        source,
    })?;

    Ok(spec)
}
