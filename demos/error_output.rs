//! Demonstration of the error messages shieldcache shows users.
//!
//! Runs each failure category through `user_friendly_error` and prints
//! what the CLI would display, without touching the real badge service.

use shieldcache::config::SiteConfig;
use shieldcache::error::{ErrorContext, ShieldError, user_friendly_error};
use shieldcache::fetch::{BadgeFetcher, ShieldsIoClient};
use shieldcache::request::BadgeRequest;
use shieldcache::svg;

fn show(title: &str, friendly: &ErrorContext) {
    println!("{title}");
    println!("─────────────────────────────────────────────────────────");
    println!("error: {}", friendly.error);
    if let Some(details) = &friendly.details {
        println!("details: {details}");
    }
    if let Some(suggestion) = &friendly.suggestion {
        println!("suggestion: {suggestion}");
    }
    println!();
}

#[tokio::main]
async fn main() {
    // Scenario 1: the badge service cannot be reached at all. Nothing
    // listens on this port, so the fetch fails before any response.
    let config = SiteConfig {
        endpoint: "http://127.0.0.1:1/static/v1".to_string(),
        timeout_secs: 1,
        ..SiteConfig::default()
    };
    let client = ShieldsIoClient::from_config(&config);
    if let Err(e) = client.fetch("label=build&message=passing").await {
        show(
            "Scenario 1: badge service unreachable",
            &user_friendly_error(anyhow::Error::from(e)),
        );
    }

    // Scenario 2: the service answered, but with a server error.
    let err = ShieldError::Fetch {
        status: Some(503),
        reason: "Service Unavailable".to_string(),
    };
    show("Scenario 2: shields.io reports a 5xx", &user_friendly_error(anyhow::Error::from(err)));

    // Scenario 3: a directive with a non-scalar query value.
    if let Err(e) = BadgeRequest::from_json_str(r#"{"message":["not","a","scalar"]}"#) {
        show("Scenario 3: malformed badge directive", &user_friendly_error(anyhow::Error::from(e)));
    }

    // Scenario 4: a cache entry that is not SVG, as happens when an
    // upstream error page was stored by something else.
    if let Err(e) = svg::intrinsic_dimensions(b"Too Many Requests") {
        show("Scenario 4: unreadable cached payload", &user_friendly_error(anyhow::Error::from(e)));
    }
}
