//! Markup rendering for resolved badges.
//!
//! The happy path renders an `<img>` tag pointing at the registered asset
//! path, wrapped in `<a>` when the request carries a link. When anything in
//! resolution or registration fails, [`render_badge`] degrades to a plain
//! `<p>{label} {message}</p>` so one unreachable badge service cannot fail
//! a whole site build; the failure is logged and the build moves on.
//!
//! Values are emitted verbatim, matching the endpoint contract elsewhere in
//! the pipeline: badge fields are author-controlled site content, not
//! untrusted input.

use tracing::warn;

use crate::assets::{ShieldRegistrar, StaticAssets};
use crate::constants::SHIELD_ASSET_DIR;
use crate::error::ShieldError;
use crate::fetch::BadgeFetcher;
use crate::request::BadgeRequest;
use crate::resolver::ShieldFactory;
use crate::shield::Shield;

/// Render the `<img>` (and optional `<a>` wrapper) for a resolved shield.
///
/// The image source is the site-absolute asset path the registrar's
/// destination maps to. `alt` and `class` attributes appear only when the
/// request carried them.
#[must_use]
pub fn shield_markup(shield: &Shield) -> String {
    let mut img = format!(
        r#"<img src="/{SHIELD_ASSET_DIR}/{}" width="{}" height="{}""#,
        shield.basename, shield.width, shield.height
    );
    if let Some(alt) = &shield.alt {
        img.push_str(&format!(r#" alt="{alt}""#));
    }
    if let Some(class) = &shield.class {
        img.push_str(&format!(r#" class="{class}""#));
    }
    img.push('>');

    match &shield.href {
        Some(href) => format!(r#"<a href="{href}">{img}</a>"#),
        None => img,
    }
}

/// Plain-text stand-in emitted when a badge cannot be resolved:
/// `<p>{label} {message}</p>`, an absent field rendering as empty.
#[must_use]
pub fn fallback_markup(request: &BadgeRequest) -> String {
    format!("<p>{} {}</p>", request.label().unwrap_or(""), request.message().unwrap_or(""))
}

/// Resolve, register, and render one badge, degrading on failure.
///
/// Any [`ShieldError`] from resolution or registration is logged as a
/// warning and replaced by [`fallback_markup`]; this function never fails.
pub async fn render_badge<C: BadgeFetcher>(
    factory: &ShieldFactory<C>,
    registrar: &ShieldRegistrar,
    assets: &mut StaticAssets,
    request: &BadgeRequest,
) -> String {
    match resolve_and_register(factory, registrar, assets, request).await {
        Ok(markup) => markup,
        Err(e) => {
            warn!(error = %e, "shield could not be resolved; emitting fallback markup");
            fallback_markup(request)
        }
    }
}

async fn resolve_and_register<C: BadgeFetcher>(
    factory: &ShieldFactory<C>,
    registrar: &ShieldRegistrar,
    assets: &mut StaticAssets,
    request: &BadgeRequest,
) -> Result<String, ShieldError> {
    let shield = factory.resolve(request).await?;
    registrar.register(assets, &shield)?;
    Ok(shield_markup(&shield))
}
