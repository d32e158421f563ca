//! Error handling for shieldcache
//!
//! This module provides the error types and user-friendly error reporting for
//! the badge resolution pipeline. The error system is designed around two core
//! principles:
//! 1. **Strongly-typed errors** for precise handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`ShieldError`] - Enumerated error types for all failure cases in the pipeline
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! - **Fetch**: [`ShieldError::Fetch`] - the shields.io endpoint answered with a
//!   non-2xx status, or the request never completed at all
//! - **Storage**: [`ShieldError::Storage`] - cache or asset I/O failed
//! - **Metadata**: [`ShieldError::Metadata`] - a badge payload is not parseable XML
//! - **Assets**: [`ShieldError::AssetMissing`] - a registered shield vanished from disk
//! - **Directives**: [`ShieldError::Directive`] - a badge directive is malformed
//!
//! None of these are retried anywhere in the library; the rendering layer decides
//! whether to degrade to fallback output, and [`user_friendly_error`] converts any
//! error into a displayable format with contextual suggestions at the CLI boundary.
//!
//! # Examples
//!
//! ```rust,no_run
//! use shieldcache::error::{ShieldError, user_friendly_error};
//!
//! fn fetch_badge() -> Result<Vec<u8>, ShieldError> {
//!     Err(ShieldError::Fetch {
//!         status: Some(503),
//!         reason: "service unavailable".to_string(),
//!     })
//! }
//!
//! match fetch_badge() {
//!     Ok(_) => println!("resolved"),
//!     Err(e) => {
//!         let ctx = user_friendly_error(anyhow::Error::from(e));
//!         ctx.display(); // Shows colored error with suggestions
//!     }
//! }
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All failure cases in the badge resolution pipeline.
///
/// Every variant carries enough context to render a useful message without
/// consulting external state. Apart from the catch-all [`ShieldError::Other`],
/// variants map one-to-one onto the pipeline stages: fetching, storing,
/// metadata extraction, asset registration, and directive parsing.
#[derive(Error, Debug)]
pub enum ShieldError {
    /// Remote badge fetch failed
    ///
    /// Raised when the shields.io endpoint answers with a status outside the
    /// 2xx class, or when the request fails before any response arrives
    /// (DNS, connect, timeout). No retry is attempted in either case.
    ///
    /// # Fields
    /// - `status`: HTTP status code for non-2xx responses, `None` for
    ///   transport failures
    /// - `reason`: human-readable description of the failure
    #[error("shield fetch failed{}: {reason}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Fetch {
        /// HTTP status code, if a response was received
        status: Option<u16>,
        /// Description of the failure
        reason: String,
    },

    /// Cache or asset I/O failed
    ///
    /// # Fields
    /// - `operation`: the store operation that failed (e.g. "write", "read")
    /// - `path`: the path the operation was touching
    /// - `source`: the underlying I/O error
    #[error("shield storage failed during {operation} at {}", path.display())]
    Storage {
        /// The store operation that failed
        operation: &'static str,
        /// Path the operation was touching
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Badge payload is not parseable as XML
    ///
    /// Only raised when the document itself cannot be parsed. Missing or
    /// malformed dimension attributes on a well-formed document degrade to
    /// zero instead of erroring.
    #[error("shield metadata unreadable: {reason}")]
    Metadata {
        /// Why the payload could not be parsed
        reason: String,
    },

    /// Registration referenced a cached shield that is not on disk
    #[error("shield asset missing at {}", path.display())]
    AssetMissing {
        /// Expected location of the cached SVG
        path: PathBuf,
    },

    /// Badge directive is malformed
    ///
    /// The directive must be a JSON object whose query values are scalars.
    #[error("malformed shield directive: {reason}")]
    Directive {
        /// What was wrong with the directive
        reason: String,
    },

    /// Other error
    ///
    /// Used at the CLI boundary for failures that do not map onto a
    /// pipeline stage, such as an unreadable manifest or a prefetch with
    /// failed badges.
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for ShieldError {
    fn clone(&self) -> Self {
        match self {
            Self::Fetch {
                status,
                reason,
            } => Self::Fetch {
                status: *status,
                reason: reason.clone(),
            },
            Self::Storage {
                operation,
                path,
                source,
            } => Self::Storage {
                operation,
                path: path.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            },
            Self::Metadata {
                reason,
            } => Self::Metadata {
                reason: reason.clone(),
            },
            Self::AssetMissing {
                path,
            } => Self::AssetMissing {
                path: path.clone(),
            },
            Self::Directive {
                reason,
            } => Self::Directive {
                reason: reason.clone(),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// User-facing wrapper around a [`ShieldError`].
///
/// Adds an optional suggestion (an actionable next step, shown in green) and
/// optional details (extra context, shown in yellow) on top of the error
/// message itself.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ShieldError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: ShieldError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining why the error occurred.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details, and suggestion to stderr with terminal colors.
    ///
    /// Error message in red and bold, details in yellow, suggestion in green.
    /// This is how the CLI presents failures to users.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into a user-friendly [`ErrorContext`] with suggestions.
///
/// Downcasts to [`ShieldError`] when possible and attaches a suggestion
/// matched to the failure category; raw I/O errors get permission and
/// missing-path hints; everything else falls through with a generic message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(shield_error) = error.downcast_ref::<ShieldError>() {
        return create_error_context(shield_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ShieldError::Storage {
                    operation: "file access",
                    path: PathBuf::from("unknown"),
                    source: std::io::Error::new(io_error.kind(), io_error.to_string()),
                })
                .with_suggestion(
                    "Check ownership of the site source directory and its _cache subtree",
                )
                .with_details("shieldcache could not read or write files in the site tree");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ShieldError::Storage {
                    operation: "file access",
                    path: PathBuf::from("unknown"),
                    source: std::io::Error::new(io_error.kind(), io_error.to_string()),
                })
                .with_suggestion("Check that the path exists and --source-dir points at the site");
            }
            _ => {}
        }
    }

    // Generic fallthrough preserving the anyhow context chain
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();
    if !chain.is_empty() {
        message = format!("{}\ncaused by: {}", message, chain.join("\ncaused by: "));
    }

    ErrorContext::new(ShieldError::Other {
        message,
    })
    .with_suggestion("Run with --verbose for detailed trace output")
}

fn create_error_context(error: ShieldError) -> ErrorContext {
    match &error {
        ShieldError::Fetch {
            status,
            ..
        } => {
            let ctx = ErrorContext::new(error.clone())
                .with_details("The badge was not cached, so a network fetch was required");
            match status {
                Some(code) if *code >= 500 => ctx.with_suggestion(
                    "img.shields.io reported a server error; try again once the service recovers",
                ),
                Some(_) => ctx.with_suggestion(
                    "Check the badge fields; shields.io rejected the query it was given",
                ),
                None => ctx.with_suggestion(
                    "Check your network connection and any proxy settings, then rerun",
                ),
            }
        }
        ShieldError::Storage {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Check permissions and free space under the site's _cache/shields_io directory",
        ),
        ShieldError::Metadata {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Clean the cache entry and refetch; the stored payload is not SVG")
            .with_details("Dimension extraction needs a well-formed XML document"),
        ShieldError::AssetMissing {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Rerun the resolve step; the cached file was removed after resolution"),
        ShieldError::Directive {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Directives are JSON objects of scalar fields, e.g. {\"label\":\"build\",\"message\":\"passing\"}",
        ),
        ShieldError::Other {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the error message above for more details"),
    }
}
