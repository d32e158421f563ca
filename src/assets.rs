//! Static-asset registration for resolved shields.
//!
//! The host build keeps one [`StaticAssets`] set per site; the registrar
//! appends resolved shields to it so the site's asset pipeline copies each
//! cached SVG to `assets/img/shields/` in the output. Registration is
//! idempotent by basename: ten templates rendering the same badge yield one
//! registered asset, because identical requests share a cache file name.
//!
//! Multi-locale builds run once per locale over the same asset set. The
//! optional locale gate lets a host register assets only on its
//! default-locale pass so per-locale passes do not re-queue (or re-copy)
//! identical files.

use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::constants::SHIELD_ASSET_DIR;
use crate::error::ShieldError;
use crate::shield::Shield;

/// One registered shield asset: a cached SVG and where it lands in the
/// site output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticShieldFile {
    /// Output file name (the shield's basename).
    pub name: String,
    /// Cached SVG the asset is copied from.
    pub source: PathBuf,
    /// Destination directory relative to the site output root.
    pub dest_dir: PathBuf,
}

impl StaticShieldFile {
    /// Create an asset destined for the shield asset directory.
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            dest_dir: PathBuf::from(SHIELD_ASSET_DIR),
        }
    }

    /// Where this asset lands under a given site output root.
    #[must_use]
    pub fn destination(&self, site_dest: &Path) -> PathBuf {
        site_dest.join(&self.dest_dir).join(&self.name)
    }

    /// Copy the cached SVG to its destination, creating directories as
    /// needed. Returns the destination path.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Storage`] if the copy fails.
    pub async fn write_to(&self, site_dest: &Path) -> Result<PathBuf, ShieldError> {
        let destination = self.destination(site_dest);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).await.map_err(|e| ShieldError::Storage {
                operation: "create asset dir",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::copy(&self.source, &destination).await.map_err(|e| ShieldError::Storage {
            operation: "copy asset",
            path: destination.clone(),
            source: e,
        })?;
        Ok(destination)
    }
}

/// The set of shield assets registered with the current build.
#[derive(Debug, Default)]
pub struct StaticAssets {
    files: Vec<StaticShieldFile>,
}

impl StaticAssets {
    /// Create an empty asset set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an asset with this basename is already registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|file| file.name == name)
    }

    /// Number of registered assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no assets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate the registered assets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &StaticShieldFile> {
        self.files.iter()
    }

    /// Copy every registered asset into a site output root. Returns how
    /// many files were copied.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Storage`] on the first failed copy.
    pub async fn copy_all(&self, site_dest: &Path) -> Result<usize, ShieldError> {
        for file in &self.files {
            file.write_to(site_dest).await?;
        }
        Ok(self.files.len())
    }

    fn push(&mut self, file: StaticShieldFile) {
        self.files.push(file);
    }
}

/// What a registration attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The shield was added to the asset set.
    Registered,
    /// An asset with the same basename was already registered.
    AlreadyRegistered,
    /// The locale gate reported a non-default-locale pass.
    SkippedLocale,
}

/// Registers resolved shields with a build's asset set.
///
/// The optional locale gate answers "should this pass register assets?";
/// multi-locale hosts return `true` only for their default-locale pass.
#[derive(Default)]
pub struct ShieldRegistrar {
    locale_gate: Option<Box<dyn Fn() -> bool + Send + Sync>>,
}

impl ShieldRegistrar {
    /// Registrar with no locale gate: every pass registers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a locale gate.
    #[must_use]
    pub fn with_locale_gate(mut self, gate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.locale_gate = Some(Box::new(gate));
        self
    }

    /// Register one resolved shield.
    ///
    /// Skips when the locale gate says this pass should not register;
    /// otherwise verifies the cached file still exists and appends it to
    /// the set unless an asset with the same basename is already there.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::AssetMissing`] if the shield's cached file
    /// is not on disk.
    pub fn register(
        &self,
        assets: &mut StaticAssets,
        shield: &Shield,
    ) -> Result<RegisterOutcome, ShieldError> {
        if let Some(gate) = &self.locale_gate {
            if !gate() {
                debug!(asset = %shield.basename, "skipping registration outside default locale");
                return Ok(RegisterOutcome::SkippedLocale);
            }
        }

        if !shield.path.is_file() {
            return Err(ShieldError::AssetMissing {
                path: shield.path.clone(),
            });
        }

        if assets.contains(&shield.basename) {
            debug!(asset = %shield.basename, "shield asset already registered");
            return Ok(RegisterOutcome::AlreadyRegistered);
        }

        assets.push(StaticShieldFile::new(shield.basename.clone(), shield.path.clone()));
        info!(asset = %shield.basename, "registered shield asset");
        Ok(RegisterOutcome::Registered)
    }
}

impl fmt::Debug for ShieldRegistrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShieldRegistrar")
            .field("locale_gate", &self.locale_gate.is_some())
            .finish()
    }
}
