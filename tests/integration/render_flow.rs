//! Integration tests for directive-to-markup rendering.
//!
//! Every test uses a seeded cache or an unreachable endpoint, so nothing
//! here touches the network.

use anyhow::Result;

use shieldcache::assets::{ShieldRegistrar, StaticAssets};
use shieldcache::render::render_badge;
use shieldcache::request::BadgeRequest;
use shieldcache::resolver::ShieldFactory;

use crate::common::TestSite;

#[tokio::test]
async fn test_directive_renders_exact_markup_from_seeded_cache() -> Result<()> {
    let site = TestSite::new()?;
    let directive = r#"{"message":"Right-side text","label":"Left-side text","color":"777777","style":"plastic","href":"https://example.com","alt":"example badge","class":"shield"}"#;
    let name = site.seed_directive(directive)?;
    assert_eq!(name, "8000e5e1833bc68ad07264c2b2e4c1cd.svg");

    let factory = ShieldFactory::new(&site.offline_config())?;
    let registrar = ShieldRegistrar::new();
    let mut assets = StaticAssets::new();

    let request = BadgeRequest::from_json_str(directive)?;
    let markup = render_badge(&factory, &registrar, &mut assets, &request).await;

    assert_eq!(
        markup,
        "<a href=\"https://example.com\">\
         <img src=\"/assets/img/shields/8000e5e1833bc68ad07264c2b2e4c1cd.svg\" \
         width=\"174\" height=\"18\" alt=\"example badge\" class=\"shield\">\
         </a>"
    );
    assert_eq!(assets.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_endpoint_falls_back_to_text() -> Result<()> {
    let site = TestSite::new()?;
    let factory = ShieldFactory::new(&site.offline_config())?;
    let registrar = ShieldRegistrar::new();
    let mut assets = StaticAssets::new();

    let request = BadgeRequest::from_json_str(r#"{"message":"test"}"#)?;
    let markup = render_badge(&factory, &registrar, &mut assets, &request).await;

    assert_eq!(markup, "<p> test</p>");
    assert!(assets.is_empty());
    assert!(site.cache_entries().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_fallback_preserves_label_then_message_order() -> Result<()> {
    let site = TestSite::new()?;
    let factory = ShieldFactory::new(&site.offline_config())?;
    let registrar = ShieldRegistrar::new();
    let mut assets = StaticAssets::new();

    let request = BadgeRequest::from_json_str(r#"{"label":"build","message":"passing"}"#)?;
    let markup = render_badge(&factory, &registrar, &mut assets, &request).await;

    assert_eq!(markup, "<p>build passing</p>");
    Ok(())
}

#[tokio::test]
async fn test_presentation_fields_do_not_affect_which_entry_is_hit() -> Result<()> {
    let site = TestSite::new()?;
    // Seed the plain variant; render a decorated one. Same cache entry.
    let name = site.seed_directive(r#"{"label":"build","message":"passing"}"#)?;

    let factory = ShieldFactory::new(&site.offline_config())?;
    let registrar = ShieldRegistrar::new();
    let mut assets = StaticAssets::new();

    let decorated = BadgeRequest::from_json_str(
        r#"{"label":"build","message":"passing","href":"https://ci.example.com"}"#,
    )?;
    let markup = render_badge(&factory, &registrar, &mut assets, &decorated).await;

    assert!(markup.starts_with("<a href=\"https://ci.example.com\">"), "markup: {markup}");
    assert!(markup.contains(&name));
    Ok(())
}

#[tokio::test]
async fn test_copied_assets_match_markup_src() -> Result<()> {
    let site = TestSite::new()?;
    let name = site.seed_directive(r#"{"label":"docs","message":"latest"}"#)?;

    let factory = ShieldFactory::new(&site.offline_config())?;
    let registrar = ShieldRegistrar::new();
    let mut assets = StaticAssets::new();

    let request = BadgeRequest::from_json_str(r#"{"label":"docs","message":"latest"}"#)?;
    let markup = render_badge(&factory, &registrar, &mut assets, &request).await;

    assert_eq!(assets.copy_all(&site.output_dir()).await?, 1);
    let copied = site.output_dir().join("assets/img/shields").join(&name);
    assert!(copied.is_file());
    assert!(markup.contains(&format!("/assets/img/shields/{name}")));
    Ok(())
}
