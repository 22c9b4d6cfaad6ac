//! Extension pour intégrer le catalogue dans pmoconfig

use crate::BookDB;
use anyhow::Result;
use pmoconfig::Config;
use std::path::Path;
use std::sync::Arc;

const DEFAULT_CATALOG_DIR: &str = "catalog";
const CATALOG_DB_FILE: &str = "books.db";

/// Trait d'extension pour gérer le catalogue dans pmoconfig
pub trait CatalogConfigExt {
    /// Répertoire de la base du catalogue (default: "catalog")
    fn get_catalog_dir(&self) -> Result<String>;

    fn set_catalog_dir(&self, directory: String) -> Result<()>;

    /// Ouvre la base `books.db` du répertoire configuré
    fn open_catalog(&self) -> Result<Arc<BookDB>>;
}

impl CatalogConfigExt for Config {
    fn get_catalog_dir(&self) -> Result<String> {
        self.get_managed_dir(&["host", "catalog", "directory"], DEFAULT_CATALOG_DIR)
    }

    fn set_catalog_dir(&self, directory: String) -> Result<()> {
        self.set_managed_dir(&["host", "catalog", "directory"], directory)
    }

    fn open_catalog(&self) -> Result<Arc<BookDB>> {
        let dir = self.get_catalog_dir()?;
        let db = BookDB::init(&Path::new(&dir).join(CATALOG_DB_FILE))?;
        Ok(Arc::new(db))
    }
}
