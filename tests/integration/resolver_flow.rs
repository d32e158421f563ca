//! Integration tests for cache hit/miss behavior, persistence, and
//! asset registration.

use anyhow::Result;
use async_trait::async_trait;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use shieldcache::assets::{RegisterOutcome, ShieldRegistrar, StaticAssets};
use shieldcache::error::ShieldError;
use shieldcache::fetch::BadgeFetcher;
use shieldcache::request::BadgeRequest;
use shieldcache::resolver::ShieldFactory;

use crate::common::{PLASTIC_BADGE, TestSite};

/// Serves one canned 200 response on a local port, then goes away.
fn spawn_one_shot_server(body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf).unwrap();
        let header = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: image/svg+xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(header.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
    });
    format!("http://{addr}/static/v1")
}

struct CountingFetcher {
    payload: Vec<u8>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl BadgeFetcher for CountingFetcher {
    async fn fetch(&self, _query: &str) -> Result<Vec<u8>, ShieldError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.clone())
    }
}

struct ErroringFetcher(u16);

#[async_trait]
impl BadgeFetcher for ErroringFetcher {
    async fn fetch(&self, _query: &str) -> Result<Vec<u8>, ShieldError> {
        Err(ShieldError::Fetch {
            status: Some(self.0),
            reason: "stub error".to_string(),
        })
    }
}

fn worked_example() -> BadgeRequest {
    BadgeRequest::new()
        .param("message", "Right-side text")
        .param("label", "Left-side text")
        .param("color", "777777")
        .param("style", "plastic")
}

#[tokio::test]
async fn test_full_pipeline_over_http_then_offline_hit() -> Result<()> {
    let site = TestSite::new()?;

    // First resolve goes over HTTP to the one-shot stub.
    let endpoint = spawn_one_shot_server(PLASTIC_BADGE);
    let online = ShieldFactory::new(&site.config_with_endpoint(&endpoint))?;
    let first = online.resolve(&worked_example()).await?;

    assert_eq!(first.basename, "8000e5e1833bc68ad07264c2b2e4c1cd.svg");
    assert_eq!((first.width, first.height), (174, 18));
    assert_eq!(std::fs::read(&first.path)?, PLASTIC_BADGE);
    assert_eq!(site.cache_entries(), vec!["8000e5e1833bc68ad07264c2b2e4c1cd.svg"]);

    // Second resolve uses a dead endpoint: only a cache hit can succeed.
    let offline = ShieldFactory::new(&site.offline_config())?;
    let second = offline.resolve(&worked_example()).await?;
    assert_eq!(second, first);
    Ok(())
}

#[tokio::test]
async fn test_identical_requests_share_one_entry_and_one_asset() -> Result<()> {
    let site = TestSite::new()?;
    let calls = Arc::new(AtomicUsize::new(0));
    let fetcher = CountingFetcher {
        payload: PLASTIC_BADGE.to_vec(),
        calls: Arc::clone(&calls),
    };
    let factory = ShieldFactory::with_client(&site.offline_config(), fetcher)?;

    let registrar = ShieldRegistrar::new();
    let mut assets = StaticAssets::new();

    for _ in 0..5 {
        let shield = factory.resolve(&worked_example()).await?;
        registrar.register(&mut assets, &shield)?;
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1, "only the first resolve may fetch");
    assert_eq!(site.cache_entries().len(), 1);
    assert_eq!(assets.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_error_status_leaves_the_cache_empty() -> Result<()> {
    let site = TestSite::new()?;
    let factory = ShieldFactory::with_client(&site.offline_config(), ErroringFetcher(503))?;

    let err = factory.resolve(&worked_example()).await.unwrap_err();
    assert!(matches!(
        err,
        ShieldError::Fetch {
            status: Some(503),
            ..
        }
    ));
    assert!(site.cache_entries().is_empty(), "a failed fetch must not persist anything");
    Ok(())
}

#[tokio::test]
async fn test_field_order_creates_distinct_entries() -> Result<()> {
    let site = TestSite::new()?;
    let calls = Arc::new(AtomicUsize::new(0));
    let fetcher = CountingFetcher {
        payload: PLASTIC_BADGE.to_vec(),
        calls: Arc::clone(&calls),
    };
    let factory = ShieldFactory::with_client(&site.offline_config(), fetcher)?;

    factory.resolve(&worked_example()).await?;

    let label_first = BadgeRequest::new()
        .param("label", "Left-side text")
        .param("message", "Right-side text")
        .param("color", "777777")
        .param("style", "plastic");
    factory.resolve(&label_first).await?;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        site.cache_entries(),
        vec![
            "49ab3c5415b748ee6ec9be883a6634c3.svg",
            "8000e5e1833bc68ad07264c2b2e4c1cd.svg",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_locale_gate_skips_and_missing_file_errors() -> Result<()> {
    let site = TestSite::new()?;
    let fetcher = CountingFetcher {
        payload: PLASTIC_BADGE.to_vec(),
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let factory = ShieldFactory::with_client(&site.offline_config(), fetcher)?;
    let shield = factory.resolve(&worked_example()).await?;

    let gated = ShieldRegistrar::new().with_locale_gate(|| false);
    let mut assets = StaticAssets::new();
    assert_eq!(gated.register(&mut assets, &shield)?, RegisterOutcome::SkippedLocale);
    assert!(assets.is_empty());

    // Remove the cached file out from under the registrar.
    std::fs::remove_file(&shield.path)?;
    let ungated = ShieldRegistrar::new();
    let err = ungated.register(&mut assets, &shield).unwrap_err();
    assert!(matches!(err, ShieldError::AssetMissing { .. }));
    Ok(())
}

#[tokio::test]
async fn test_stats_and_clear_reflect_resolutions() -> Result<()> {
    let site = TestSite::new()?;
    let fetcher = CountingFetcher {
        payload: PLASTIC_BADGE.to_vec(),
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let factory = ShieldFactory::with_client(&site.offline_config(), fetcher)?;

    factory.resolve(&BadgeRequest::new().param("message", "test")).await?;
    factory.resolve(&BadgeRequest::new().param("label", "build").param("message", "passing")).await?;

    let stats = factory.store().stats().await?;
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.total_bytes, (PLASTIC_BADGE.len() * 2) as u64);

    assert_eq!(factory.store().clear().await?, 2);
    assert!(site.cache_entries().is_empty());
    Ok(())
}
