//! Nommage des artefacts du cache
//!
//! ```text
//! <pages>/<identité>/<index>_<hauteur>_<largeur>.jpg
//! <thumbnails>/<identité>.jpg
//! ```

use crate::dimension::ResizeTarget;
use std::path::{Path, PathBuf};

/// Racines du cache sur disque
#[derive(Debug, Clone)]
pub struct CachePaths {
    pages_dir: PathBuf,
    thumbnails_dir: PathBuf,
}

impl CachePaths {
    pub fn new(pages_dir: impl Into<PathBuf>, thumbnails_dir: impl Into<PathBuf>) -> Self {
        Self {
            pages_dir: pages_dir.into(),
            thumbnails_dir: thumbnails_dir.into(),
        }
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    pub fn thumbnails_dir(&self) -> &Path {
        &self.thumbnails_dir
    }

    /// Répertoire des pages d'une archive (non créé)
    pub fn archive_dir(&self, identity: &str) -> PathBuf {
        self.pages_dir.join(identity)
    }

    /// Chemin de l'artefact d'une page, sans effet de bord
    pub fn page_file(&self, identity: &str, index: usize, target: ResizeTarget) -> PathBuf {
        self.archive_dir(identity).join(format!(
            "{}_{}_{}.jpg",
            index, target.height, target.width
        ))
    }

    /// Chemin de l'artefact d'une page, en créant le répertoire de l'archive.
    ///
    /// Un échec de création est seulement journalisé : il réapparaîtra comme
    /// erreur d'écriture au moment de sauvegarder l'artefact.
    pub fn page_artifact_path(&self, identity: &str, index: usize, target: ResizeTarget) -> PathBuf {
        let dir = self.archive_dir(identity);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!("Cannot create page cache directory {}: {}", dir.display(), e);
        }
        self.page_file(identity, index, target)
    }

    /// Chemin de la vignette d'une archive
    pub fn thumbnail_artifact_path(&self, identity: &str) -> PathBuf {
        self.thumbnails_dir.join(format!("{}.jpg", identity))
    }
}
