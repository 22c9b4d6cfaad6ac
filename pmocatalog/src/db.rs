//! Module de gestion de la base SQLite des archives
//!
//! Une ligne par archive, indexée par son identité (hash du chemin).

use crate::error::{CatalogError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use pmopages::{archive_identity, archive_page_count, ArchiveCatalog};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

const COLUMNS: &str = "id, hash, folder_hash, file_path, file_size, page, mod_time";

/// Archive enregistrée dans le catalogue
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct BookEntry {
    /// Identifiant SQLite
    pub id: i64,
    /// Identité de l'archive (SHA256 du chemin)
    pub hash: String,
    /// Identité du répertoire parent
    pub folder_hash: String,
    /// Chemin absolu du fichier
    pub file_path: String,
    /// Taille du fichier en octets
    pub file_size: i64,
    /// Nombre d'entrées de l'archive
    pub page: i64,
    /// Date de modification du fichier (RFC3339)
    pub mod_time: String,
}

impl BookEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            hash: row.get(1)?,
            folder_hash: row.get(2)?,
            file_path: row.get(3)?,
            file_size: row.get(4)?,
            page: row.get(5)?,
            mod_time: row.get(6)?,
        })
    }
}

/// Base de données SQLite du catalogue
#[derive(Debug)]
pub struct BookDB {
    conn: Mutex<Connection>,
}

impl BookDB {
    /// Ouvre (ou crée) la base de données
    ///
    /// # Exemple
    ///
    /// ```rust,no_run
    /// use pmocatalog::BookDB;
    /// use std::path::Path;
    ///
    /// let db = BookDB::init(Path::new("books.db")).unwrap();
    /// ```
    pub fn init(path: &Path) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Base en mémoire, perdue à la fermeture
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                hash TEXT NOT NULL UNIQUE,
                folder_hash TEXT NOT NULL,
                file_path TEXT NOT NULL,
                file_size INTEGER NOT NULL DEFAULT 0,
                page INTEGER NOT NULL DEFAULT 0,
                mod_time TEXT
            )",
            [],
        )?;

        // Index pour lister rapidement les archives d'un dossier
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_books_folder ON books (folder_hash)",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ajoute une archive et retourne son identité
    ///
    /// # Arguments
    ///
    /// * `folder_hash` - Identité du dossier parent
    /// * `file_path` - Chemin de l'archive (non vide)
    /// * `file_size` - Taille en octets
    /// * `page` - Nombre d'entrées
    /// * `mod_time` - Date de modification
    pub fn insert_book(
        &self,
        folder_hash: &str,
        file_path: &str,
        file_size: i64,
        page: i64,
        mod_time: DateTime<Utc>,
    ) -> Result<String> {
        if file_path.is_empty() {
            return Err(CatalogError::InvalidPath(file_path.to_string()));
        }
        let hash = archive_identity(file_path);
        self.lock().execute(
            "INSERT INTO books (hash, folder_hash, file_path, file_size, page, mod_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                hash,
                folder_hash,
                file_path,
                file_size,
                page,
                mod_time.to_rfc3339_opts(SecondsFormat::Secs, true)
            ],
        )?;
        tracing::debug!("Inserted book {} ({})", file_path, hash);
        Ok(hash)
    }

    /// Met à jour taille, nombre de pages et date d'une archive existante
    ///
    /// # Returns
    ///
    /// `false` si aucune archive ne correspond à ce chemin
    pub fn update_book(
        &self,
        file_path: &str,
        file_size: i64,
        page: i64,
        mod_time: DateTime<Utc>,
    ) -> Result<bool> {
        if file_path.is_empty() {
            return Err(CatalogError::InvalidPath(file_path.to_string()));
        }
        let hash = archive_identity(file_path);
        let changed = self.lock().execute(
            "UPDATE books SET file_size = ?1, page = ?2, mod_time = ?3 WHERE hash = ?4",
            params![
                file_size,
                page,
                mod_time.to_rfc3339_opts(SecondsFormat::Secs, true),
                hash
            ],
        )?;
        Ok(changed > 0)
    }

    /// Supprime une archive par son identifiant SQLite
    pub fn delete_book(&self, id: i64) -> Result<()> {
        self.lock()
            .execute("DELETE FROM books WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Récupère une archive par son identité
    pub fn get_by_hash(&self, hash: &str) -> Result<Option<BookEntry>> {
        let sql = format!("SELECT {COLUMNS} FROM books WHERE hash = ?1");
        Ok(self
            .lock()
            .query_row(&sql, [hash], BookEntry::from_row)
            .optional()?)
    }

    /// Récupère une archive par son chemin
    pub fn get_by_path(&self, file_path: &str) -> Result<Option<BookEntry>> {
        self.get_by_hash(&archive_identity(file_path))
    }

    /// Liste les archives d'un dossier
    pub fn list_by_folder(&self, folder_hash: &str) -> Result<Vec<BookEntry>> {
        let conn = self.lock();
        let sql = format!("SELECT {COLUMNS} FROM books WHERE folder_hash = ?1 ORDER BY file_path");
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map([folder_hash], BookEntry::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Liste toutes les archives
    pub fn list_all(&self) -> Result<Vec<BookEntry>> {
        let conn = self.lock();
        let sql = format!("SELECT {COLUMNS} FROM books ORDER BY file_path");
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map([], BookEntry::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Nombre d'archives enregistrées
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Enregistre ou rafraîchit une archive à partir du fichier sur disque
    ///
    /// Lit la taille et la date de modification, compte les entrées du
    /// conteneur puis insère ou met à jour la ligne correspondante.
    pub fn register_archive(&self, path: &Path) -> Result<BookEntry> {
        let file_path = path
            .to_str()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CatalogError::InvalidPath(path.display().to_string()))?;

        let metadata = std::fs::metadata(path)?;
        let mod_time: DateTime<Utc> = metadata.modified()?.into();
        let file_size = metadata.len() as i64;
        let page = archive_page_count(path)? as i64;

        let updated = self.update_book(file_path, file_size, page, mod_time)?;
        if !updated {
            let folder_hash = archive_identity(path.parent().unwrap_or_else(|| Path::new("")));
            self.insert_book(&folder_hash, file_path, file_size, page, mod_time)?;
        }

        tracing::info!("Registered archive {} ({} entries)", file_path, page);
        self.get_by_path(file_path)?
            .ok_or_else(|| CatalogError::InvalidPath(file_path.to_string()))
    }
}

impl ArchiveCatalog for BookDB {
    fn resolve_path(&self, identity: &str) -> anyhow::Result<Option<PathBuf>> {
        Ok(self
            .get_by_hash(identity)?
            .map(|entry| PathBuf::from(entry.file_path)))
    }
}
