//! Interface vers le catalogue des archives
//!
//! Le cache de pages ne consomme du catalogue que la résolution
//! identité → chemin du fichier. Toute la gestion des enregistrements
//! (insertion, mise à jour, suppression) reste à la charge du catalogue.

use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::identity::archive_identity;

/// Catalogue d'archives consulté par le cache de pages
pub trait ArchiveCatalog: Send + Sync {
    /// Résout une identité en chemin de fichier.
    ///
    /// `Ok(None)` signifie que l'identité est inconnue.
    fn resolve_path(&self, identity: &str) -> Result<Option<PathBuf>>;

    /// Calcule l'identité d'un fichier
    fn compute_identity(&self, path: &Path) -> String {
        archive_identity(path)
    }
}

/// Catalogue en mémoire
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    entries: RwLock<HashMap<String, PathBuf>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre une archive et retourne son identité
    pub fn insert(&self, path: impl Into<PathBuf>) -> String {
        let path = path.into();
        let identity = archive_identity(&path);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identity.clone(), path);
        identity
    }

    /// Retire une archive du catalogue
    pub fn remove(&self, identity: &str) -> Option<PathBuf> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(identity)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArchiveCatalog for MemoryCatalog {
    fn resolve_path(&self, identity: &str) -> Result<Option<PathBuf>> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identity)
            .cloned())
    }
}
