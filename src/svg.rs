//! Intrinsic dimension extraction for badge payloads.
//!
//! Shields.io badges declare their pixel size as `width` and `height`
//! attributes on the root `<svg>` element. Extraction is deliberately
//! permissive: only a payload that fails to parse as XML at all is an
//! error, while missing or malformed attributes degrade to zero so a badge
//! with unusual markup still renders (the browser falls back to its own
//! sizing when a dimension is zero).

use crate::error::ShieldError;

/// Read the `width`/`height` attributes off the payload's root element.
///
/// The root element's tag name is not checked; anything the endpoint
/// returns that parses as XML is accepted and probed for dimensions.
///
/// # Errors
///
/// Returns [`ShieldError::Metadata`] if the payload is not UTF-8 or not
/// well-formed XML. Missing or non-numeric attributes are not errors.
///
/// # Examples
///
/// ```rust
/// use shieldcache::svg::intrinsic_dimensions;
///
/// let payload = br#"<svg xmlns="http://www.w3.org/2000/svg" width="174" height="18"></svg>"#;
/// assert_eq!(intrinsic_dimensions(payload).unwrap(), (174, 18));
/// ```
pub fn intrinsic_dimensions(payload: &[u8]) -> Result<(u32, u32), ShieldError> {
    let text = std::str::from_utf8(payload).map_err(|e| ShieldError::Metadata {
        reason: format!("payload is not UTF-8: {e}"),
    })?;
    let document = roxmltree::Document::parse(text).map_err(|e| ShieldError::Metadata {
        reason: e.to_string(),
    })?;
    let root = document.root_element();
    Ok((coerce_px(root.attribute("width")), coerce_px(root.attribute("height"))))
}

/// Integer-prefix coercion: optional leading whitespace and `+`, then as
/// many ASCII digits as the value starts with. Everything else, including
/// an absent attribute or a leading `-`, degrades to 0. Values like
/// `"100%"` or `"42px"` keep their numeric prefix.
fn coerce_px(value: Option<&str>) -> u32 {
    let Some(text) = value else {
        return 0;
    };
    let trimmed = text.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned.find(|c: char| !c.is_ascii_digit()).unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return 0;
    }
    // Saturate rather than wrap on absurdly large declared sizes.
    digits.parse().unwrap_or(u32::MAX)
}
