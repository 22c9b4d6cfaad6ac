//! Identité des archives
//!
//! L'identité d'une archive est le SHA256 de son chemin, encodé en hexadécimal
//! minuscule (64 caractères). Elle dépend uniquement de la chaîne du chemin,
//! pas du contenu du fichier : une archive déplacée change d'identité, et un
//! fichier remplacé au même chemin garde l'identité de l'ancien.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Longueur d'une identité en caractères hexadécimaux
pub const IDENTITY_LEN: usize = 64;

/// Calcule l'identité d'une archive à partir de son chemin
///
/// # Exemple
///
/// ```
/// use pmopages::archive_identity;
///
/// let id = archive_identity("/comics/vol1.zip");
/// assert_eq!(id.len(), 64);
/// assert_eq!(id, archive_identity("/comics/vol1.zip"));
/// ```
pub fn archive_identity(path: impl AsRef<Path>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_ref().as_os_str().as_encoded_bytes());
    hex::encode(hasher.finalize())
}

/// Vérifie qu'une chaîne a la forme d'une identité (64 hex minuscules)
pub fn is_identity(value: &str) -> bool {
    value.len() == IDENTITY_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
