//! Politique de dimensionnement des pages
//!
//! Convertit une boîte englobante (hauteur max, largeur max) en une cible de
//! redimensionnement où un seul axe est libre, pour préserver le ratio.

/// Cible de redimensionnement. Une valeur `0` signifie "axe libre",
/// calculé à partir du ratio de l'image source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResizeTarget {
    pub height: u32,
    pub width: u32,
}

impl ResizeTarget {
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Largeur fixe, hauteur libre
    pub const fn width(width: u32) -> Self {
        Self { height: 0, width }
    }

    /// Résout une boîte englobante en cible :
    ///
    /// - largeur max > hauteur max : largeur fixée, hauteur libre
    /// - hauteur max > largeur max : hauteur fixée, largeur libre
    /// - égalité : les deux axes sont imposés tels quels
    ///
    /// `(0, 0)` donne donc `(0, 0)`, c'est-à-dire aucune mise à l'échelle.
    pub fn from_bounds(max_height: u32, max_width: u32) -> Self {
        if max_width > max_height {
            Self::new(0, max_width)
        } else if max_height > max_width {
            Self::new(max_height, 0)
        } else {
            Self::new(max_height, max_width)
        }
    }

    /// Vrai si aucun axe n'est contraint
    pub fn is_passthrough(&self) -> bool {
        self.height == 0 && self.width == 0
    }

    /// Dimensions concrètes pour une source `(src_width, src_height)`.
    ///
    /// Retourne `None` si l'image doit être conservée telle quelle.
    pub fn output_size(&self, src_width: u32, src_height: u32) -> Option<(u32, u32)> {
        if src_width == 0 || src_height == 0 {
            return None;
        }
        let scaled = |value: u32, num: u32, den: u32| -> u32 {
            ((value as f64 * num as f64 / den as f64).round() as u32).max(1)
        };
        match (self.width, self.height) {
            (0, 0) => None,
            (0, h) => Some((scaled(src_width, h, src_height), h)),
            (w, 0) => Some((w, scaled(src_height, w, src_width))),
            (w, h) => Some((w, h)),
        }
    }
}
