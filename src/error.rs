//! Composer error types

use std::error::Error as StdError;
use std::path::PathBuf;
use std::sync::Arc;

/// Prefix carried by every error raised by the composer itself
pub const ERROR_NAMESPACE: &str = "FlatConfigUtils";

/// Errors surfaced when resolving a composer.
///
/// Cloneable so a shared deferred source can hand the same failure to
/// every resolution that awaits it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ComposeError {
    /// A config source, override function or resolved hook failed
    #[error("{0}")]
    Input(Arc<dyn StdError + Send + Sync>),

    #[error("FlatConfigUtils: Failed to locate config at index {index}\n({total} configs in total)")]
    IndexOutOfRange { index: isize, total: usize },

    #[error("FlatConfigUtils: {}", describe_missing_name(.name, .available, .unnamed))]
    NameNotFound {
        name: String,
        available: Vec<String>,
        unnamed: usize,
    },

    #[error("{}", describe_conflicts(.0))]
    PluginConflicts(Vec<String>),

    #[error("FlatConfigUtils: Failed to load configs from {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    #[error("FlatConfigUtils: Failed to expand `extends` of config \"{config}\": {reason}")]
    InvalidExtends { config: String, reason: String },
}

impl ComposeError {
    /// Wrap a caller-side failure
    pub fn input(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        ComposeError::Input(Arc::from(error.into()))
    }
}

fn describe_missing_name(name: &str, available: &[String], unnamed: &usize) -> String {
    let mut message = format!(
        "Failed to locate config with name \"{}\"\nAvailable names are: {}",
        name,
        available.join(", ")
    );
    if *unnamed > 0 {
        message.push_str(&format!("\n({} unnamed configs)", unnamed));
    }
    message
}

fn describe_conflicts(messages: &[String]) -> String {
    match messages {
        [single] => format!("{}: {}", ERROR_NAMESPACE, single),
        _ => {
            let lines: Vec<String> = messages
                .iter()
                .enumerate()
                .map(|(i, message)| format!("  {}: {}", i + 1, message))
                .collect();
            format!("{}:\n{}", ERROR_NAMESPACE, lines.join("\n"))
        }
    }
}

/// Result type for composer operations
pub type Result<T, E = ComposeError> = std::result::Result<T, E>;
