//! Badge request modeling and cache-key derivation.
//!
//! A [`BadgeRequest`] carries the query fields sent to the shields.io static
//! badge endpoint plus the presentation fields (`href`, `alt`, `class`) that
//! only affect the rendered markup. Query fields live in an insertion-ordered
//! map: the canonical query string preserves the order fields were given in,
//! and the cache key is derived from that exact string. Two requests that
//! differ only in field order are therefore distinct cache entries. Callers
//! that want stable keys across builds should emit fields in a stable order.
//!
//! # Examples
//!
//! ```rust
//! use shieldcache::request::BadgeRequest;
//!
//! let request = BadgeRequest::new()
//!     .param("label", "build")
//!     .param("message", "passing")
//!     .with_href("https://ci.example.com");
//!
//! assert_eq!(request.canonical_query(), "label=build&message=passing");
//! assert_eq!(request.cache_file_name(), "39e70a3f752c24c2c6b30b810cfb2b57.svg");
//! ```

use indexmap::IndexMap;
use md5::{Digest, Md5};
use serde_json::Value;

use crate::constants::SVG_EXTENSION;
use crate::error::ShieldError;

/// Fields that shape the markup around the badge instead of the badge
/// itself. They are stripped before canonicalization and never reach the
/// endpoint or the cache key.
pub const PRESENTATION_KEYS: [&str; 3] = ["href", "alt", "class"];

/// One badge to resolve: ordered query fields plus optional presentation.
///
/// The query field set is open; `label`, `message`, `color`, and `style`
/// are the common ones but anything the endpoint understands passes
/// through verbatim. Values are kept exactly as given, with no
/// URL-encoding, since the cache key is the canonical string itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeRequest {
    params: IndexMap<String, String>,
    href: Option<String>,
    alt: Option<String>,
    class: Option<String>,
}

impl BadgeRequest {
    /// Create an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query field, preserving insertion order.
    ///
    /// Re-inserting an existing key overwrites its value in place without
    /// changing its position.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set the link target the rendered badge is wrapped in.
    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Set the image alt text.
    #[must_use]
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Set the CSS class emitted on the image element.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Parse a JSON badge directive.
    ///
    /// The directive must be a JSON object. Presentation keys become the
    /// corresponding optional fields; everything else becomes a query field
    /// in the order the document lists them.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Directive`] if the input is not valid JSON,
    /// not an object, or carries a non-scalar field value.
    pub fn from_json_str(input: &str) -> Result<Self, ShieldError> {
        let value: Value = serde_json::from_str(input).map_err(|e| ShieldError::Directive {
            reason: format!("invalid JSON: {e}"),
        })?;
        Self::from_json_value(&value)
    }

    /// Build a request from an already-parsed JSON value.
    ///
    /// Scalar coercion is permissive: numbers and booleans render with
    /// their standard display form, a `null` query value becomes the empty
    /// string, and a `null` presentation value counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Directive`] for non-objects and for array or
    /// object field values.
    pub fn from_json_value(value: &Value) -> Result<Self, ShieldError> {
        let object = value.as_object().ok_or_else(|| ShieldError::Directive {
            reason: "directive must be a JSON object".to_string(),
        })?;

        let mut request = Self::new();
        for (key, value) in object {
            if PRESENTATION_KEYS.contains(&key.as_str()) {
                if let Some(text) = coerce_presentation(key, value)? {
                    match key.as_str() {
                        "href" => request.href = Some(text),
                        "alt" => request.alt = Some(text),
                        _ => request.class = Some(text),
                    }
                }
            } else {
                request.params.insert(key.clone(), coerce_scalar(key, value)?);
            }
        }
        Ok(request)
    }

    /// The ordered query fields.
    #[must_use]
    pub const fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    /// Link target, if any.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// Alt text, if any.
    #[must_use]
    pub fn alt(&self) -> Option<&str> {
        self.alt.as_deref()
    }

    /// CSS class, if any.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// The badge's left-side text, if given. Feeds the fallback renderer.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.params.get("label").map(String::as_str)
    }

    /// The badge's right-side text, if given. Feeds the fallback renderer.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.params.get("message").map(String::as_str)
    }

    /// Serialize the query fields as `key=value` pairs joined with `&`.
    ///
    /// Field order is insertion order and values are inserted verbatim.
    /// The result is both the request query string and the cache-key input,
    /// so it must stay byte-identical across calls for the same request.
    #[must_use]
    pub fn canonical_query(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Content-addressed cache file name: lowercase MD5 hex of the
    /// canonical query plus the `.svg` extension.
    #[must_use]
    pub fn cache_file_name(&self) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.canonical_query().as_bytes());
        format!("{}{}", hex::encode(hasher.finalize()), SVG_EXTENSION)
    }
}

fn coerce_scalar(key: &str, value: &Value) -> Result<String, ShieldError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(ShieldError::Directive {
            reason: format!("field '{key}' must be a scalar"),
        }),
    }
}

fn coerce_presentation(key: &str, value: &Value) -> Result<Option<String>, ShieldError> {
    match value {
        Value::Null => Ok(None),
        other => coerce_scalar(key, other).map(Some),
    }
}
