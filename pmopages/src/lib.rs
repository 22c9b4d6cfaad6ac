//! # pmopages - Cache de pages d'archives de bandes dessinées
//!
//! Cette crate sert les pages d'archives ZIP (une image par entrée) sous
//! forme de JPEG redimensionnés, avec un cache sur disque indexé par
//! l'identité de l'archive et les dimensions demandées.
//!
//! ## Fonctionnalités
//!
//! - Identité d'archive dérivée de son chemin (SHA256 hexadécimal)
//! - Redimensionnement préservant le ratio (un seul axe libre)
//! - Génération à la demande d'une page, ou préchargement d'une plage
//! - Vignette unique par archive, tirée de la première page
//!
//! ## Structure des fichiers
//!
//! ```text
//! pages/
//! └── <identité>/
//!     ├── 0_0_800.jpg               # page 0, largeur 800
//!     └── 1_1200_0.jpg              # page 1, hauteur 1200
//! thumbnails/
//! └── <identité>.jpg
//! ```
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use pmopages::{MemoryCatalog, PageCache};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = Arc::new(MemoryCatalog::new());
//!     let id = catalog.insert("/comics/volume1.zip");
//!
//!     let cache = PageCache::new("./pages", "./thumbnails", catalog)?;
//!     let page = cache.resolve_page(&id, 0, 1600, 1200).await?;
//!     println!("Page servie depuis {page:?}");
//!
//!     let report = cache.prefetch_range(&id, 1, 5, 1600, 1200).await?;
//!     println!("{} pages préchargées", report.generated_count());
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cache;
pub mod catalog;
pub mod dimension;
pub mod error;
pub mod identity;
pub mod inflight;
pub mod paths;
pub mod prefetch;
pub mod render;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

pub use archive::{archive_page_count, PageArchive};
pub use cache::{PageCache, PageCacheOptions, DEFAULT_THUMBNAIL_WIDTH};
pub use catalog::{ArchiveCatalog, MemoryCatalog};
pub use dimension::ResizeTarget;
pub use error::{PageError, Result};
pub use identity::{archive_identity, is_identity};
pub use paths::CachePaths;
pub use prefetch::{PrefetchFailure, PrefetchReport};
pub use render::{render_resized_jpeg, DEFAULT_JPEG_QUALITY};

#[cfg(feature = "pmoconfig")]
pub use config_ext::PageCacheConfigExt;

// ============================================================================
// Registre global singleton
// ============================================================================

use once_cell::sync::OnceCell;
use std::sync::Arc;

static PAGE_CACHE: OnceCell<Arc<PageCache>> = OnceCell::new();

/// Enregistre le cache de pages global
///
/// Seul le premier appel prend effet, les suivants sont signalés en warning.
pub fn register_page_cache(cache: Arc<PageCache>) {
    if PAGE_CACHE.set(cache).is_err() {
        tracing::warn!("Page cache already registered, ignoring new registration");
    }
}

/// Accès global au cache de pages, `None` tant qu'aucun cache n'a été
/// enregistré via [`register_page_cache`]
pub fn get_page_cache() -> Option<Arc<PageCache>> {
    PAGE_CACHE.get().cloned()
}
