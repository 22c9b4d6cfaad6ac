//! Verrous de remplissage par artefact
//!
//! Deux remplissages concurrents d'un même artefact sont sérialisés : le
//! second attend la fin du premier, puis retrouve l'artefact sur disque.
//! Les clés ne restent dans la table que le temps du remplissage.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    in_flight: Mutex<HashSet<PathBuf>>,
    released: Condvar,
}

/// Table des remplissages en cours, partagée entre threads
#[derive(Debug, Clone, Default)]
pub struct FillLocks {
    inner: Arc<Inner>,
}

impl FillLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_set(&self) -> MutexGuard<'_, HashSet<PathBuf>> {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Prend le verrou de `key`, en bloquant tant qu'un autre remplissage
    /// de la même clé est en cours. À n'appeler que hors du runtime async.
    pub fn acquire(&self, key: &Path) -> FillGuard {
        let mut in_flight = self.lock_set();
        while in_flight.contains(key) {
            in_flight = self
                .inner
                .released
                .wait(in_flight)
                .unwrap_or_else(PoisonError::into_inner);
        }
        in_flight.insert(key.to_path_buf());
        FillGuard {
            locks: self.clone(),
            key: key.to_path_buf(),
        }
    }

    /// Nombre de remplissages en cours
    pub fn in_flight(&self) -> usize {
        self.lock_set().len()
    }
}

/// Verrou d'un artefact, relâché à la destruction
#[derive(Debug)]
pub struct FillGuard {
    locks: FillLocks,
    key: PathBuf,
}

impl Drop for FillGuard {
    fn drop(&mut self) {
        self.locks.lock_set().remove(&self.key);
        self.locks.inner.released.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_guard_releases_key() {
        let locks = FillLocks::new();
        {
            let _guard = locks.acquire(Path::new("/a"));
            assert_eq!(locks.in_flight(), 1);
        }
        assert_eq!(locks.in_flight(), 0);
    }

    #[test]
    fn test_same_key_is_serialized() {
        let locks = FillLocks::new();
        let active = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let locks = locks.clone();
                let active = active.clone();
                let max_seen = max_seen.clone();
                thread::spawn(move || {
                    let _guard = locks.acquire(Path::new("/same"));
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(10));
                    active.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert_eq!(locks.in_flight(), 0);
    }

    #[test]
    fn test_different_keys_do_not_block() {
        let locks = FillLocks::new();
        let _a = locks.acquire(Path::new("/a"));
        let _b = locks.acquire(Path::new("/b"));
        assert_eq!(locks.in_flight(), 2);
    }
}
