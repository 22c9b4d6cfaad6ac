//! # pmocatalog - Catalogue des archives pour PMOComics
//!
//! Cette crate tient la table SQLite des archives connues (chemin, taille,
//! nombre de pages, date de modification) et fournit au cache de pages
//! (`pmopages`) la résolution identité → chemin.
//!
//! ## Schéma de base de données
//!
//! ```sql
//! CREATE TABLE books (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     hash TEXT NOT NULL UNIQUE,      -- SHA256 du chemin de l'archive
//!     folder_hash TEXT NOT NULL,      -- SHA256 du dossier parent
//!     file_path TEXT NOT NULL,
//!     file_size INTEGER NOT NULL,
//!     page INTEGER NOT NULL,          -- nombre d'entrées du ZIP
//!     mod_time TEXT                   -- RFC3339
//! );
//! ```
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use pmocatalog::BookDB;
//! use pmopages::PageCache;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let db = Arc::new(BookDB::init(Path::new("books.db"))?);
//! let book = db.register_archive(Path::new("/comics/volume1.zip"))?;
//!
//! let cache = PageCache::new("./pages", "./thumbnails", db.clone())?;
//! let page = cache.resolve_page(&book.hash, 0, 1600, 1200).await?;
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod error;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

pub use db::{BookDB, BookEntry};
pub use error::{CatalogError, Result};

#[cfg(feature = "pmoconfig")]
pub use config_ext::CatalogConfigExt;
