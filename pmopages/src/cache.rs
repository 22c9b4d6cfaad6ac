//! Cache de pages redimensionnées
//!
//! L'existence du fichier cible est le seul signal de présence dans le
//! cache : il n'y a ni manifeste ni éviction. Un artefact absent est généré
//! à la demande en lisant une seule entrée de l'archive.

use crate::archive::PageArchive;
use crate::catalog::ArchiveCatalog;
use crate::dimension::ResizeTarget;
use crate::error::{PageError, Result};
use crate::identity::archive_identity;
use crate::inflight::FillLocks;
use crate::paths::CachePaths;
use crate::prefetch::{PrefetchFailure, PrefetchReport};
use crate::render::{render_resized_jpeg, DEFAULT_JPEG_QUALITY};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Largeur par défaut des vignettes
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 512;

/// Paramètres de génération des artefacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCacheOptions {
    /// Qualité JPEG des pages
    pub page_quality: u8,
    /// Largeur des vignettes (hauteur libre)
    pub thumbnail_width: u32,
    /// Qualité JPEG des vignettes
    pub thumbnail_quality: u8,
}

impl Default for PageCacheOptions {
    fn default() -> Self {
        Self {
            page_quality: DEFAULT_JPEG_QUALITY,
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            thumbnail_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Cache de pages et de vignettes adossé au système de fichiers
///
/// Conçu pour être partagé derrière un `Arc<PageCache>`. Le travail ZIP et
/// image s'exécute sur le pool bloquant de tokio ; chaque opération se
/// termine avant de rendre la main à l'appelant.
pub struct PageCache {
    paths: CachePaths,
    catalog: Arc<dyn ArchiveCatalog>,
    options: PageCacheOptions,
    fills: FillLocks,
}

impl PageCache {
    /// Crée un cache avec les paramètres par défaut
    ///
    /// # Arguments
    ///
    /// * `pages_dir` - Racine des pages redimensionnées
    /// * `thumbnails_dir` - Racine des vignettes
    /// * `catalog` - Catalogue résolvant les identités d'archives
    pub fn new(
        pages_dir: impl Into<PathBuf>,
        thumbnails_dir: impl Into<PathBuf>,
        catalog: Arc<dyn ArchiveCatalog>,
    ) -> Result<Self> {
        Self::with_options(pages_dir, thumbnails_dir, catalog, PageCacheOptions::default())
    }

    /// Crée un cache avec des paramètres explicites
    pub fn with_options(
        pages_dir: impl Into<PathBuf>,
        thumbnails_dir: impl Into<PathBuf>,
        catalog: Arc<dyn ArchiveCatalog>,
        options: PageCacheOptions,
    ) -> Result<Self> {
        let paths = CachePaths::new(pages_dir, thumbnails_dir);
        for dir in [paths.pages_dir(), paths.thumbnails_dir()] {
            std::fs::create_dir_all(dir).map_err(|source| PageError::Create {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        Ok(Self {
            paths,
            catalog,
            options,
            fills: FillLocks::new(),
        })
    }

    pub fn paths(&self) -> &CachePaths {
        &self.paths
    }

    pub fn options(&self) -> PageCacheOptions {
        self.options
    }

    pub fn catalog(&self) -> &Arc<dyn ArchiveCatalog> {
        &self.catalog
    }

    /// Nombre de générations en cours
    pub fn fills_in_flight(&self) -> usize {
        self.fills.in_flight()
    }

    fn archive_path(&self, identity: &str) -> Result<PathBuf> {
        self.catalog
            .resolve_path(identity)
            .map_err(PageError::Catalog)?
            .ok_or_else(|| PageError::NotFound(identity.to_string()))
    }

    /// Indique si une page est déjà en cache, sans jamais ouvrir l'archive
    ///
    /// # Returns
    ///
    /// `(présente, chemin de l'artefact)`
    pub async fn page_exists(
        &self,
        identity: &str,
        index: usize,
        max_height: u32,
        max_width: u32,
    ) -> Result<(bool, PathBuf)> {
        self.archive_path(identity)?;
        let target = ResizeTarget::from_bounds(max_height, max_width);
        let output = self.paths.page_artifact_path(identity, index, target);
        Ok((output.exists(), output))
    }

    /// Retourne le chemin de la page, en la générant si elle est absente
    ///
    /// # Arguments
    ///
    /// * `identity` - Identité de l'archive
    /// * `index` - Index de l'entrée dans le conteneur
    /// * `max_height`, `max_width` - Boîte englobante demandée (voir [`ResizeTarget::from_bounds`])
    pub async fn resolve_page(
        &self,
        identity: &str,
        index: usize,
        max_height: u32,
        max_width: u32,
    ) -> Result<PathBuf> {
        let archive = self.archive_path(identity)?;
        let target = ResizeTarget::from_bounds(max_height, max_width);
        let output = self.paths.page_artifact_path(identity, index, target);

        if output.exists() {
            tracing::debug!("Page {} of {} found in cache: {}", index, identity, output.display());
            return Ok(output);
        }

        let fills = self.fills.clone();
        let quality = self.options.page_quality;
        let path = output.clone();
        let generated = tokio::task::spawn_blocking(move || {
            fill_page(&fills, &archive, index, target, quality, &path)
        })
        .await??;

        if generated {
            tracing::info!("Generated page {} of {}: {}", index, identity, output.display());
        }
        Ok(output)
    }

    /// Génère les pages absentes de `[start, start + limit)`
    ///
    /// Seule l'ouverture de l'archive est fatale : une page illisible est
    /// consignée dans le rapport et le parcours continue.
    pub async fn prefetch_range(
        &self,
        identity: &str,
        start: usize,
        limit: usize,
        max_height: u32,
        max_width: u32,
    ) -> Result<PrefetchReport> {
        let archive = self.archive_path(identity)?;
        let target = ResizeTarget::from_bounds(max_height, max_width);

        let paths = self.paths.clone();
        let fills = self.fills.clone();
        let quality = self.options.page_quality;
        let id = identity.to_string();
        let report = tokio::task::spawn_blocking(move || {
            prefetch_pages(&paths, &fills, &archive, &id, start, limit, target, quality)
        })
        .await??;

        tracing::info!(
            "Prefetched {} from {}: {} generated, {} cached, {} failed",
            identity,
            start,
            report.generated_count(),
            report.cached.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Chemin de la vignette d'une archive
    pub fn thumbnail_path(&self, identity: &str) -> PathBuf {
        self.paths.thumbnail_artifact_path(identity)
    }

    /// Indique si la vignette existe déjà
    pub fn thumbnail_exists(&self, identity: &str) -> bool {
        self.thumbnail_path(identity).exists()
    }

    /// Génère la vignette d'une archive connue du catalogue
    ///
    /// La vignette est tirée de la première entrée non répertoire, dans
    /// l'ordre du conteneur. Une archive sans aucune page ne produit pas de
    /// vignette et retourne `Ok(None)`. Une vignette existante est régénérée.
    ///
    /// # Errors
    ///
    /// Outre les erreurs de catalogue et d'ouverture de l'archive, un échec
    /// de lecture, de décodage ou d'écriture de cette première page est
    /// retourné tel quel : aucune autre entrée n'est essayée.
    pub async fn generate_thumbnail(&self, identity: &str) -> Result<Option<PathBuf>> {
        let archive = self.archive_path(identity)?;
        self.render_thumbnail(identity, archive).await
    }

    /// Génère la vignette d'une archive à partir de son chemin
    pub async fn thumbnail_for_path(&self, archive: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let archive = archive.as_ref().to_path_buf();
        let identity = archive_identity(&archive);
        self.render_thumbnail(&identity, archive).await
    }

    async fn render_thumbnail(&self, identity: &str, archive: PathBuf) -> Result<Option<PathBuf>> {
        let output = self.thumbnail_path(identity);
        let fills = self.fills.clone();
        let options = self.options;
        let result = tokio::task::spawn_blocking(move || {
            fill_thumbnail(&fills, &archive, options, output)
        })
        .await??;

        match &result {
            Some(path) => tracing::info!("Generated thumbnail for {}: {}", identity, path.display()),
            None => tracing::debug!("No page entry in {}, no thumbnail generated", identity),
        }
        Ok(result)
    }
}

/// Remplit un artefact de page sous son verrou.
///
/// Retourne `false` si un autre remplissage l'a produit entre-temps.
fn fill_page(
    fills: &FillLocks,
    archive: &Path,
    index: usize,
    target: ResizeTarget,
    quality: u8,
    output: &Path,
) -> Result<bool> {
    let _guard = fills.acquire(output);
    if output.exists() {
        return Ok(false);
    }

    let mut archive = PageArchive::open(archive)?;
    let bytes = archive.read_page(index)?;
    render_resized_jpeg(&bytes, target, quality, output)?;
    Ok(true)
}

#[allow(clippy::too_many_arguments)]
fn prefetch_pages(
    paths: &CachePaths,
    fills: &FillLocks,
    archive: &Path,
    identity: &str,
    start: usize,
    limit: usize,
    target: ResizeTarget,
    quality: u8,
) -> Result<PrefetchReport> {
    let mut archive = PageArchive::open(archive)?;
    let end = start.saturating_add(limit).min(archive.len());
    let mut report = PrefetchReport::default();

    for index in start..end {
        match archive.is_dir(index) {
            Ok(true) => {
                report.directories.push(index);
                continue;
            }
            Ok(false) => {}
            Err(error) => {
                tracing::warn!("Skipping page {} of {}: {}", index, identity, error);
                report.failures.push(PrefetchFailure { index, error });
                continue;
            }
        }

        let output = paths.page_artifact_path(identity, index, target);
        let _guard = fills.acquire(&output);
        if output.exists() {
            report.cached.push(index);
            continue;
        }

        match archive
            .read_page(index)
            .and_then(|bytes| render_resized_jpeg(&bytes, target, quality, &output))
        {
            Ok(()) => {
                tracing::debug!("Prefetched page {} of {}: {}", index, identity, output.display());
                report.generated.push(index);
            }
            Err(error) => {
                tracing::warn!("Skipping page {} of {}: {}", index, identity, error);
                report.failures.push(PrefetchFailure { index, error });
            }
        }
    }

    Ok(report)
}

fn fill_thumbnail(
    fills: &FillLocks,
    archive: &Path,
    options: PageCacheOptions,
    output: PathBuf,
) -> Result<Option<PathBuf>> {
    let mut archive = PageArchive::open(archive)?;
    let Some(index) = archive.first_page_index() else {
        return Ok(None);
    };

    let _guard = fills.acquire(&output);
    let bytes = archive.read_page(index)?;
    render_resized_jpeg(
        &bytes,
        ResizeTarget::width(options.thumbnail_width),
        options.thumbnail_quality,
        &output,
    )?;
    Ok(Some(output))
}
