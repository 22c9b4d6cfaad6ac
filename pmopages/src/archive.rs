//! Accès aux pages d'une archive ZIP
//!
//! Les pages sont les entrées du conteneur dans leur ordre naturel ; l'index
//! d'une page est l'index de son entrée, répertoires compris.

use crate::error::{PageError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Archive ouverte en lecture seule
pub struct PageArchive {
    path: PathBuf,
    zip: ZipArchive<BufReader<File>>,
}

impl PageArchive {
    /// Ouvre le conteneur ZIP situé à `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let archive_err = |source| PageError::ArchiveOpen {
            path: path.clone(),
            source,
        };
        let file = File::open(&path).map_err(|e| archive_err(zip::result::ZipError::Io(e)))?;
        let zip = ZipArchive::new(BufReader::new(file)).map_err(archive_err)?;
        Ok(Self { path, zip })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Nombre total d'entrées (répertoires compris)
    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indique si l'entrée `index` est un répertoire
    pub fn is_dir(&mut self, index: usize) -> Result<bool> {
        let count = self.len();
        if index >= count {
            return Err(PageError::PageNotFound { index, count });
        }
        let entry = self
            .zip
            .by_index_raw(index)
            .map_err(|e| PageError::EntryOpen {
                index,
                reason: e.to_string(),
            })?;
        Ok(entry.is_dir())
    }

    /// Lit le contenu décompressé de la page `index`
    pub fn read_page(&mut self, index: usize) -> Result<Vec<u8>> {
        if self.is_dir(index)? {
            return Err(PageError::PageIsDirectory { index });
        }

        let entry_err = |reason: String| PageError::EntryOpen { index, reason };
        let mut entry = self
            .zip
            .by_index(index)
            .map_err(|e| entry_err(e.to_string()))?;

        let mut data = Vec::with_capacity(entry.size().min(64 * 1024 * 1024) as usize);
        entry
            .read_to_end(&mut data)
            .map_err(|e| entry_err(e.to_string()))?;
        Ok(data)
    }

    /// Index de la première entrée qui n'est pas un répertoire
    pub fn first_page_index(&mut self) -> Option<usize> {
        (0..self.len()).find(|&index| matches!(self.is_dir(index), Ok(false)))
    }
}

/// Nombre d'entrées d'une archive
pub fn archive_page_count(path: impl AsRef<Path>) -> Result<usize> {
    Ok(PageArchive::open(path)?.len())
}
