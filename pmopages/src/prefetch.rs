//! Rapport de préchargement d'une plage de pages

use crate::error::PageError;

/// Échec de génération d'une page pendant un préchargement
#[derive(Debug)]
pub struct PrefetchFailure {
    pub index: usize,
    pub error: PageError,
}

/// Résultat détaillé d'un préchargement.
///
/// Chaque index de la plage demandée (et présent dans l'archive) apparaît
/// dans exactement une des listes.
#[derive(Debug, Default)]
pub struct PrefetchReport {
    /// Pages générées par cet appel
    pub generated: Vec<usize>,
    /// Pages déjà présentes dans le cache
    pub cached: Vec<usize>,
    /// Entrées répertoires ignorées
    pub directories: Vec<usize>,
    /// Pages en échec, avec leur cause
    pub failures: Vec<PrefetchFailure>,
}

impl PrefetchReport {
    /// Nombre d'artefacts nouvellement générés
    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.iter().map(|f| f.index).collect()
    }

    /// Vrai si aucune page n'a échoué
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Nombre d'entrées examinées
    pub fn visited(&self) -> usize {
        self.generated.len() + self.cached.len() + self.directories.len() + self.failures.len()
    }
}
