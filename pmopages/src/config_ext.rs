//! Extension pour intégrer le cache de pages dans pmoconfig
//!
//! Ce module fournit le trait `PageCacheConfigExt` qui ajoute à
//! `pmoconfig::Config` les réglages du cache de pages et des vignettes.

use crate::cache::{PageCacheOptions, DEFAULT_THUMBNAIL_WIDTH};
use crate::catalog::ArchiveCatalog;
use crate::render::DEFAULT_JPEG_QUALITY;
use crate::PageCache;
use anyhow::Result;
use pmoconfig::Config;
use std::sync::Arc;

const DEFAULT_PAGES_DIR: &str = "cache_pages";
const DEFAULT_THUMBNAILS_DIR: &str = "cache_thumbnails";

const PAGES_DIR_KEY: &[&str] = &["host", "page_cache", "directory"];
const PAGE_QUALITY_KEY: &[&str] = &["host", "page_cache", "jpeg_quality"];
const THUMBNAILS_DIR_KEY: &[&str] = &["host", "thumbnail_cache", "directory"];
const THUMBNAIL_WIDTH_KEY: &[&str] = &["host", "thumbnail_cache", "width"];
const THUMBNAIL_QUALITY_KEY: &[&str] = &["host", "thumbnail_cache", "jpeg_quality"];

/// Trait d'extension pour gérer le cache de pages dans pmoconfig
///
/// # Exemple
///
/// ```rust,ignore
/// use pmoconfig::get_config;
/// use pmopages::PageCacheConfigExt;
///
/// let config = get_config();
/// let cache = config.create_page_cache(catalog)?;
/// let page = cache.resolve_page(&identity, 0, 1600, 1200).await?;
/// ```
pub trait PageCacheConfigExt {
    /// Répertoire des pages (default: "cache_pages")
    fn get_pages_dir(&self) -> Result<String>;

    fn set_pages_dir(&self, directory: String) -> Result<()>;

    /// Répertoire des vignettes (default: "cache_thumbnails")
    fn get_thumbnails_dir(&self) -> Result<String>;

    fn set_thumbnails_dir(&self, directory: String) -> Result<()>;

    /// Qualité JPEG des pages (default: 70)
    fn get_page_quality(&self) -> u8;

    fn set_page_quality(&self, quality: u8) -> Result<()>;

    /// Largeur des vignettes (default: 512)
    fn get_thumbnail_width(&self) -> u32;

    fn set_thumbnail_width(&self, width: u32) -> Result<()>;

    /// Qualité JPEG des vignettes (default: 70)
    fn get_thumbnail_quality(&self) -> u8;

    fn set_thumbnail_quality(&self, quality: u8) -> Result<()>;

    /// Paramètres de génération issus de la configuration
    fn page_cache_options(&self) -> PageCacheOptions {
        PageCacheOptions {
            page_quality: self.get_page_quality(),
            thumbnail_width: self.get_thumbnail_width(),
            thumbnail_quality: self.get_thumbnail_quality(),
        }
    }

    /// Crée un cache de pages configuré
    fn create_page_cache(&self, catalog: Arc<dyn ArchiveCatalog>) -> Result<Arc<PageCache>>;
}

fn clamp_quality(value: u64) -> u8 {
    value.clamp(1, 100) as u8
}

impl PageCacheConfigExt for Config {
    fn get_pages_dir(&self) -> Result<String> {
        self.get_managed_dir(PAGES_DIR_KEY, DEFAULT_PAGES_DIR)
    }

    fn set_pages_dir(&self, directory: String) -> Result<()> {
        self.set_managed_dir(PAGES_DIR_KEY, directory)
    }

    fn get_thumbnails_dir(&self) -> Result<String> {
        self.get_managed_dir(THUMBNAILS_DIR_KEY, DEFAULT_THUMBNAILS_DIR)
    }

    fn set_thumbnails_dir(&self, directory: String) -> Result<()> {
        self.set_managed_dir(THUMBNAILS_DIR_KEY, directory)
    }

    fn get_page_quality(&self) -> u8 {
        clamp_quality(self.get_u64(PAGE_QUALITY_KEY, DEFAULT_JPEG_QUALITY as u64))
    }

    fn set_page_quality(&self, quality: u8) -> Result<()> {
        self.set_u64(PAGE_QUALITY_KEY, quality as u64)
    }

    fn get_thumbnail_width(&self) -> u32 {
        match self.get_u64(THUMBNAIL_WIDTH_KEY, DEFAULT_THUMBNAIL_WIDTH as u64) {
            0 => DEFAULT_THUMBNAIL_WIDTH,
            w => w.min(u32::MAX as u64) as u32,
        }
    }

    fn set_thumbnail_width(&self, width: u32) -> Result<()> {
        self.set_u64(THUMBNAIL_WIDTH_KEY, width as u64)
    }

    fn get_thumbnail_quality(&self) -> u8 {
        clamp_quality(self.get_u64(THUMBNAIL_QUALITY_KEY, DEFAULT_JPEG_QUALITY as u64))
    }

    fn set_thumbnail_quality(&self, quality: u8) -> Result<()> {
        self.set_u64(THUMBNAIL_QUALITY_KEY, quality as u64)
    }

    fn create_page_cache(&self, catalog: Arc<dyn ArchiveCatalog>) -> Result<Arc<PageCache>> {
        let cache = PageCache::with_options(
            self.get_pages_dir()?,
            self.get_thumbnails_dir()?,
            catalog,
            self.page_cache_options(),
        )?;
        Ok(Arc::new(cache))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCatalog;

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

        assert_eq!(config.page_cache_options(), PageCacheOptions::default());
        assert!(config.get_pages_dir().unwrap().ends_with(DEFAULT_PAGES_DIR));
    }

    #[test]
    fn test_create_page_cache_uses_configured_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        config.set_thumbnail_width(256).unwrap();

        let cache = config
            .create_page_cache(Arc::new(MemoryCatalog::new()))
            .unwrap();

        assert_eq!(cache.paths().pages_dir(), dir.path().join(DEFAULT_PAGES_DIR));
        assert_eq!(cache.options().thumbnail_width, 256);
    }
}
