// ============================================================================
// config.rs — KeyIntent
// Viewer settings and binding-file loading.
// ============================================================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::binding::KeyBinding;
use crate::error::ConfigurationError;

/// Runtime settings for the interactive viewer.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Frames between status log lines. Clamped to at least 1.
    pub status_interval: u32,
    pub bindings_path: Option<PathBuf>,
    pub record_path: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: String::from("KeyIntent"),
            width: 800,
            height: 600,
            status_interval: 120,
            bindings_path: None,
            record_path: None,
        }
    }
}

impl ViewerConfig {
    /// The configured binding table, or WASD movement with Q/E turning.
    pub fn binding(&self) -> Result<KeyBinding, BindingFileError> {
        match &self.bindings_path {
            Some(path) => load_binding(path),
            None => Ok(KeyBinding::movement_with_turning()),
        }
    }
}

// ======================== Binding Files ========================

#[derive(Debug, Error)]
pub enum BindingFileError {
    #[error("failed to read binding file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse binding file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid binding file {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ConfigurationError,
    },
}

/// Reads a JSON array of `{"key", "intent"}` entries and validates it.
pub fn load_binding(path: &Path) -> Result<KeyBinding, BindingFileError> {
    let text = fs::read_to_string(path).map_err(|source| BindingFileError::Read {
        path: path.to_owned(),
        source,
    })?;
    let binding = parse_binding(&text).map_err(|source| BindingFileError::Parse {
        path: path.to_owned(),
        source,
    })?;
    binding.validate().map_err(|source| BindingFileError::Invalid {
        path: path.to_owned(),
        source,
    })?;
    log::info!("Loaded {} key bindings from {}", binding.len(), path.display());
    Ok(binding)
}

pub fn parse_binding(text: &str) -> Result<KeyBinding, serde_json::Error> {
    serde_json::from_str(text)
}

pub fn save_binding(path: &Path, binding: &KeyBinding) -> io::Result<()> {
    let json = serde_json::to_string_pretty(binding).map_err(io::Error::other)?;
    fs::write(path, json)?;
    log::info!("Saved {} key bindings to {}", binding.len(), path.display());
    Ok(())
}
