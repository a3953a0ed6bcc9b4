//! Secret sources for the server private key.
//!
//! Each variant of [`PrivateKeySource`] wraps a type implementing
//! [`SecretSource`], so adding a backend means adding a variant and its
//! type; callers only ever see [`PrivateKeySource::resolve`].

use super::KeyError;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A place a raw private key secret can be fetched from
pub trait SecretSource {
    /// Human-readable location, used in logs and errors. Never the secret.
    fn describe(&self) -> String;

    /// Fetch the raw secret, trimmed of surrounding whitespace
    fn fetch(&self) -> Result<String, KeyError>;
}

/// Reads the secret from a named environment variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVarSource {
    pub name: String,
}

impl SecretSource for EnvVarSource {
    fn describe(&self) -> String {
        format!("environment variable {}", self.name)
    }

    fn fetch(&self) -> Result<String, KeyError> {
        let value = std::env::var(&self.name).map_err(|e| KeyError::KeyNotFound {
            source_desc: self.describe(),
            reason: e.to_string(),
        })?;
        require_non_empty(value, self)
    }
}

/// Reads the secret from a file, as written by `wg genkey > file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    pub path: PathBuf,
}

impl SecretSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn fetch(&self) -> Result<String, KeyError> {
        let value = std::fs::read_to_string(&self.path).map_err(|e| KeyError::KeyNotFound {
            source_desc: self.describe(),
            reason: e.to_string(),
        })?;
        require_non_empty(value, self)
    }
}

fn require_non_empty(value: String, source: &dyn SecretSource) -> Result<String, KeyError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(KeyError::KeyNotFound {
            source_desc: source.describe(),
            reason: "value is empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Where the server private key comes from.
///
/// In YAML this is a single-entry mapping such as `{ envVar: WG_PRIVATE_KEY }`
/// or `{ file: /etc/wireguard/private.key }`. Unknown tags are kept as
/// [`PrivateKeySource::Unsupported`] and rejected at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, serde_yaml::Value>")]
pub enum PrivateKeySource {
    EnvVar(EnvVarSource),
    File(FileSource),
    Unsupported(String),
}

impl PrivateKeySource {
    pub fn env_var(name: impl Into<String>) -> Self {
        Self::EnvVar(EnvVarSource { name: name.into() })
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(FileSource { path: path.into() })
    }

    /// The capability backing this variant, if the variant is supported
    pub fn secret_source(&self) -> Option<&dyn SecretSource> {
        match self {
            Self::EnvVar(source) => Some(source),
            Self::File(source) => Some(source),
            Self::Unsupported(_) => None,
        }
    }

    /// Tag naming this variant in the network description
    pub fn kind(&self) -> &str {
        match self {
            Self::EnvVar(_) => "envVar",
            Self::File(_) => "file",
            Self::Unsupported(kind) => kind,
        }
    }

    /// Resolve the raw private key secret
    pub fn resolve(&self) -> Result<String, KeyError> {
        let source = self
            .secret_source()
            .ok_or_else(|| KeyError::UnsupportedKeySource(self.kind().to_string()))?;
        debug!("Resolving server private key from {}", source.describe());
        source.fetch()
    }
}

impl TryFrom<BTreeMap<String, serde_yaml::Value>> for PrivateKeySource {
    type Error = String;

    fn try_from(map: BTreeMap<String, serde_yaml::Value>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "privateKey must name exactly one source, found {}",
                map.len()
            ));
        }
        let Some((kind, value)) = map.into_iter().next() else {
            return Err("privateKey must name exactly one source".to_string());
        };

        match kind.as_str() {
            "envVar" | "env_var" => Ok(Self::env_var(string_value(&kind, &value)?)),
            "file" => Ok(Self::file(string_value(&kind, &value)?)),
            _ => Ok(Self::Unsupported(kind.clone())),
        }
    }
}

fn string_value(kind: &str, value: &serde_yaml::Value) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("privateKey.{} must be a string", kind))
}
