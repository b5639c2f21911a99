//! CLI error type.

use std::fmt;

/// Errors surfaced to the terminal user.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    Config(String),
    /// A storefront call failed.
    Store(String),
    /// Checkout failed or was declined.
    Purchase(String),
    /// An asset transfer failed.
    Download(String),
    /// An interactive prompt failed.
    Prompt(String),
    /// A resource key could not be resolved.
    Resolve(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Store(msg) => write!(f, "store error: {}", msg),
            Self::Purchase(msg) => write!(f, "purchase failed: {}", msg),
            Self::Download(msg) => write!(f, "download failed: {}", msg),
            Self::Prompt(msg) => write!(f, "prompt error: {}", msg),
            Self::Resolve(msg) => write!(f, "resolve failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::Purchase("payment declined".to_string());
        assert_eq!(err.to_string(), "purchase failed: payment declined");
    }
}
