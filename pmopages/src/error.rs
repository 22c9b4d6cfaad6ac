//! Gestion des erreurs du cache de pages

use std::path::PathBuf;
use thiserror::Error;

/// Type Result personnalisé pour pmopages
pub type Result<T> = std::result::Result<T, PageError>;

/// Erreurs possibles lors de la résolution ou de la génération d'une page
#[derive(Error, Debug)]
pub enum PageError {
    /// Identité d'archive inconnue du catalogue
    #[error("Archive not found in catalog: {0}")]
    NotFound(String),

    /// Le catalogue n'a pas pu répondre
    #[error("Catalog error: {0}")]
    Catalog(#[source] anyhow::Error),

    /// Conteneur ZIP illisible, corrompu ou absent
    #[error("Cannot open archive {path}: {source}")]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Index hors de la plage des entrées du conteneur
    #[error("Page {index} not found (archive has {count} entries)")]
    PageNotFound { index: usize, count: usize },

    /// L'entrée visée est un répertoire
    #[error("Entry {index} is a directory, not a page")]
    PageIsDirectory { index: usize },

    /// Échec de lecture du flux d'une entrée valide
    #[error("Cannot read entry {index}: {reason}")]
    EntryOpen { index: usize, reason: String },

    /// Contenu d'image illisible ou format non supporté
    #[error("Image decode error: {0}")]
    Decode(#[source] image::ImageError),

    /// Impossible de créer le fichier de sortie
    #[error("Cannot create output file in {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dimensions de sortie demandées hors du budget mémoire
    #[error("Requested output {width}x{height} exceeds the resize budget")]
    TooLarge { width: u32, height: u32 },

    /// Échec de l'encodage JPEG
    #[error("JPEG encode error: {0}")]
    Encode(#[source] image::ImageError),

    /// Échec de l'écriture finale de l'artefact
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// La tâche de génération a paniqué ou a été annulée
    #[error("Page worker failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PageError {
    /// Vrai pour les erreurs côté sortie (création, encodage ou écriture)
    pub fn is_output_error(&self) -> bool {
        matches!(
            self,
            Self::Create { .. } | Self::Encode(_) | Self::Write { .. }
        )
    }

    /// Vrai si l'archive elle-même est en cause (inconnue ou illisible)
    pub fn is_archive_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::ArchiveOpen { .. })
    }
}
