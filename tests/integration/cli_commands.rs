//! End-to-end CLI tests driving the shieldcache binary.
//!
//! Site configs written by these tests point at an unreachable endpoint,
//! so every command here either runs from a seeded cache or is expected
//! to fail fast.

use anyhow::Result;
use predicates::prelude::*;

use crate::common::{TestSite, bin};

#[test]
fn test_render_prints_markup_from_seeded_cache() -> Result<()> {
    let site = TestSite::new()?;
    let directive = r#"{"label":"build","message":"passing"}"#;
    let name = site.seed_directive(directive)?;
    let config = site.write_config_file(&site.offline_config())?;

    bin()
        .args(["render", directive, "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(format!("<img src=\"/assets/img/shields/{name}\" width=\"174\" height=\"18\">\n"));
    Ok(())
}

#[test]
fn test_render_falls_back_when_endpoint_is_unreachable() -> Result<()> {
    let site = TestSite::new()?;
    let config = site.write_config_file(&site.offline_config())?;

    bin()
        .args(["render", r#"{"message":"test"}"#, "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout("<p> test</p>\n");
    Ok(())
}

#[test]
fn test_render_malformed_directive_fails() -> Result<()> {
    let site = TestSite::new()?;
    let config = site.write_config_file(&site.offline_config())?;

    bin()
        .args(["render", "{not json", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed shield directive"));
    Ok(())
}

#[test]
fn test_render_out_flag_copies_assets() -> Result<()> {
    let site = TestSite::new()?;
    let directive = r#"{"message":"test"}"#;
    let name = site.seed_directive(directive)?;
    let config = site.write_config_file(&site.offline_config())?;

    bin()
        .args(["render", directive, "--config"])
        .arg(&config)
        .arg("--out")
        .arg(site.output_dir())
        .assert()
        .success();

    assert!(site.output_dir().join("assets/img/shields").join(name).is_file());
    Ok(())
}

#[test]
fn test_verbose_flag_logs_cache_hits_to_stderr() -> Result<()> {
    let site = TestSite::new()?;
    let directive = r#"{"label":"build","message":"passing"}"#;
    site.seed_directive(directive)?;
    let config = site.write_config_file(&site.offline_config())?;

    bin()
        .args(["render", directive, "--verbose", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("<img src="))
        .stderr(predicate::str::contains("shield cache hit"));
    Ok(())
}

#[test]
fn test_config_env_variable_is_honored() -> Result<()> {
    let site = TestSite::new()?;
    let directive = r#"{"message":"test"}"#;
    let name = site.seed_directive(directive)?;
    let config = site.write_config_file(&site.offline_config())?;

    bin()
        .env("SHIELDCACHE_CONFIG", &config)
        .args(["render", directive])
        .assert()
        .success()
        .stdout(predicate::str::contains(name.as_str()));
    Ok(())
}

#[test]
fn test_explicit_config_flag_overrides_env() -> Result<()> {
    let site = TestSite::new()?;
    let directive = r#"{"message":"test"}"#;
    site.seed_directive(directive)?;
    let config = site.write_config_file(&site.offline_config())?;

    // The env points at nothing; only --config precedence lets this pass.
    bin()
        .env("SHIELDCACHE_CONFIG", "/nonexistent/shieldcache.toml")
        .args(["render", directive, "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("<img src="));
    Ok(())
}

#[test]
fn test_missing_explicit_config_is_an_error() -> Result<()> {
    let site = TestSite::new()?;
    bin()
        .args(["cache", "info", "--config", "/nonexistent/shieldcache.toml"])
        .current_dir(site.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Check that the path exists"));
    Ok(())
}

#[test]
fn test_cache_info_reports_entries() -> Result<()> {
    let site = TestSite::new()?;
    site.seed_directive(r#"{"message":"one"}"#)?;
    site.seed_directive(r#"{"message":"two"}"#)?;

    bin()
        .args(["cache", "info", "--source-dir"])
        .arg(site.path())
        .current_dir(site.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache root:"))
        .stdout(predicate::str::contains("Entries:    2"));
    Ok(())
}

#[test]
fn test_cache_clean_removes_entries() -> Result<()> {
    let site = TestSite::new()?;
    site.seed_directive(r#"{"message":"one"}"#)?;
    site.seed_directive(r#"{"message":"two"}"#)?;

    bin()
        .args(["cache", "clean", "--source-dir"])
        .arg(site.path())
        .current_dir(site.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 cached badge(s)"));

    assert!(site.cache_entries().is_empty());
    Ok(())
}

#[test]
fn test_prefetch_exits_zero_when_all_badges_are_cached() -> Result<()> {
    let site = TestSite::new()?;
    let directives = [r#"{"label":"build","message":"passing"}"#, r#"{"message":"test"}"#];
    for directive in &directives {
        site.seed_directive(directive)?;
    }
    let manifest = site.write_manifest(&directives)?;
    let config = site.write_config_file(&site.offline_config())?;

    bin()
        .arg("prefetch")
        .arg(&manifest)
        .args(["--max-parallel", "2", "--no-progress", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("39e70a3f752c24c2c6b30b810cfb2b57.svg"))
        .stdout(predicate::str::contains("Prefetched 2 badge(s), 2 registered"));
    Ok(())
}

#[test]
fn test_prefetch_exits_nonzero_when_a_badge_fails() -> Result<()> {
    let site = TestSite::new()?;
    let manifest = site.write_manifest(&[r#"{"message":"uncached"}"#])?;
    let config = site.write_config_file(&site.offline_config())?;

    bin()
        .arg("prefetch")
        .arg(&manifest)
        .args(["--no-progress", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to prefetch"));
    Ok(())
}

#[test]
fn test_verbose_and_quiet_conflict() {
    bin()
        .args(["-v", "-q", "cache", "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_help_describes_the_tool() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cached shields.io badge resolver"));
}
