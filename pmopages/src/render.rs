//! Décodage, redimensionnement et encodage JPEG des pages
//!
//! L'artefact est entièrement encodé en mémoire, écrit dans un fichier
//! temporaire du même répertoire puis renommé sur sa destination. Un lecteur
//! concurrent voit donc soit l'ancien état (absent), soit un JPEG complet.

use crate::dimension::ResizeTarget;
use crate::error::{PageError, Result};
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage};
use std::io::Write;
use std::path::Path;

/// Qualité JPEG par défaut des pages et vignettes
pub const DEFAULT_JPEG_QUALITY: u8 = 70;

/// Décode une image dont le format est détecté depuis le contenu
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(PageError::Decode)
}

/// Budget mémoire d'un redimensionnement, aligné sur la limite
/// d'allocation par défaut du décodeur `image`
pub fn resize_budget() -> u64 {
    image::Limits::default().max_alloc.unwrap_or(512 * 1024 * 1024)
}

/// Vérifie qu'un redimensionnement vers `(width, height)` tient dans
/// [`resize_budget`].
///
/// Le filtre passe d'abord par un tampon intermédiaire RGBA `f32` de la
/// largeur source, puis produit l'image finale.
fn check_resize_budget(img: &DynamicImage, width: u32, height: u32) -> Result<()> {
    let budget = resize_budget();
    let pixel = u64::from(img.color().bytes_per_pixel());
    let output = u64::from(width)
        .saturating_mul(u64::from(height))
        .saturating_mul(pixel);
    let intermediate = u64::from(img.width())
        .saturating_mul(u64::from(height))
        .saturating_mul(16);
    if output > budget || intermediate > budget {
        return Err(PageError::TooLarge { width, height });
    }
    Ok(())
}

/// Redimensionne avec un filtre Lanczos3 selon la cible.
///
/// Une cible sans aucun axe contraint rend l'image inchangée. Une taille de
/// sortie hors budget est refusée avec [`PageError::TooLarge`] avant toute
/// allocation.
pub fn resize_image(img: DynamicImage, target: ResizeTarget) -> Result<DynamicImage> {
    match target.output_size(img.width(), img.height()) {
        Some((width, height)) if (width, height) != (img.width(), img.height()) => {
            check_resize_budget(&img, width, height)?;
            Ok(img.resize_exact(width, height, FilterType::Lanczos3))
        }
        _ => Ok(img),
    }
}

/// Encode en JPEG (sans canal alpha)
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let mut data = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut data, quality.clamp(1, 100));
    encoder.encode_image(&rgb).map_err(PageError::Encode)?;
    Ok(data)
}

/// Écrit `data` sur `output` via un fichier temporaire renommé
pub fn write_atomic(output: &Path, data: &[u8]) -> Result<()> {
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".page-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|source| PageError::Create {
            path: dir.to_path_buf(),
            source,
        })?;

    let write_err = |source| PageError::Write {
        path: output.to_path_buf(),
        source,
    };
    tmp.write_all(data).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(output).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Pipeline complet : décode `bytes`, redimensionne, encode en JPEG à
/// `quality` et écrit le résultat sur `output`.
///
/// Aucun fichier n'est laissé sur disque en cas d'échec.
pub fn render_resized_jpeg(
    bytes: &[u8],
    target: ResizeTarget,
    quality: u8,
    output: &Path,
) -> Result<()> {
    let img = decode_image(bytes)?;
    let resized = resize_image(img, target)?;
    let data = encode_jpeg(&resized, quality)?;
    write_atomic(output, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_fn(width, height, |x, _| Rgba([(x % 255) as u8, 0, 128, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_render_width_dominant() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.jpg");

        render_resized_jpeg(&png_bytes(200, 100), ResizeTarget::width(50), 70, &output).unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (50, 25));
    }

    #[test]
    fn test_render_passthrough_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.jpg");

        render_resized_jpeg(&png_bytes(64, 48), ResizeTarget::default(), 70, &output).unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (64, 48));
    }

    #[test]
    fn test_oversized_target_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.jpg");

        let err = render_resized_jpeg(&png_bytes(40, 20), ResizeTarget::width(200_000), 70, &output)
            .unwrap_err();

        assert!(matches!(
            err,
            PageError::TooLarge {
                width: 200_000,
                height: 100_000
            }
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_target_within_budget_is_resized() {
        let img = decode_image(&png_bytes(40, 20)).unwrap();
        let resized = resize_image(img, ResizeTarget::width(2000)).unwrap();
        assert_eq!((resized.width(), resized.height()), (2000, 1000));
    }

    #[test]
    fn test_output_is_jpeg() {
        let data = encode_jpeg(&decode_image(&png_bytes(8, 8)).unwrap(), 70).unwrap();
        assert_eq!(&data[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_decode_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.jpg");

        let err = render_resized_jpeg(b"not an image", ResizeTarget::default(), 70, &output)
            .unwrap_err();

        assert!(matches!(err, PageError::Decode(_)));
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_directory_is_a_create_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("out.jpg");

        let err = render_resized_jpeg(&png_bytes(4, 4), ResizeTarget::default(), 70, &output)
            .unwrap_err();

        assert!(matches!(err, PageError::Create { .. }));
        assert!(err.is_output_error());
    }
}
