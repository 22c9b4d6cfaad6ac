//! Gestion des erreurs du catalogue

use thiserror::Error;

/// Type Result personnalisé pour pmocatalog
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Erreurs possibles lors de l'utilisation du catalogue
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Erreur SQLite
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Erreur d'accès au fichier de l'archive
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chemin d'archive vide ou invalide
    #[error("Invalid archive path: {0:?}")]
    InvalidPath(String),

    /// Archive illisible lors du comptage des pages
    #[error("Archive error: {0}")]
    Archive(#[from] pmopages::PageError),
}
