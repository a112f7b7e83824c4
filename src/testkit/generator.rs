//! Test data generator for gallery fixtures
//!
//! Generates photo bytes and manifest entries for tests and simulations.
//! JPEG content carries real SOI/JFIF/EOI markers so file-flow tests see
//! plausible data without shipping fixture files; when a test needs bytes
//! the thumbnail pipeline can actually decode, use
//! [`GalleryDataGenerator::generate_renderable_png`].

use crate::core::photo::Photo;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Capture-time base for generated photo names: 2024-01-01 00:00:00 UTC
pub const BASE_CAPTURE_MILLIS: i64 = 1_704_067_200_000;

/// Default content size for generated JPEG files
pub const TEST_JPEG_SIZE: usize = 2 * 1024;

/// Test data generator for gallery fixtures
pub struct GalleryDataGenerator;

impl GalleryDataGenerator {
    /// Generate JPEG bytes with real markers and seed-determined content
    pub fn generate_jpeg(size: usize, seed: u64) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);

        // JPEG SOI marker
        data.extend_from_slice(&[0xFF, 0xD8]);

        // APP0 marker (JFIF)
        data.extend_from_slice(&[0xFF, 0xE0]);
        data.extend_from_slice(&[0x00, 0x10]);
        data.extend_from_slice(b"JFIF\0");
        data.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);

        // Seed-determined "image data"
        let mut rng = StdRng::seed_from_u64(seed);
        while data.len() < size.saturating_sub(2) {
            data.push(rng.gen());
        }

        // JPEG EOI marker
        data.extend_from_slice(&[0xFF, 0xD9]);

        data.truncate(size.max(4));
        data
    }

    /// Generate a small PNG the `image` crate can decode
    ///
    /// Pixels are seed-determined, so two calls with the same seed produce
    /// identical files.
    pub fn generate_renderable_png(width: u32, height: u32, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut img = RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            pixel.0 = [rng.gen(), rng.gen(), rng.gen()];
        }

        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .expect("encoding a generated image cannot fail");
        out
    }

    /// Timestamp-style file name for the nth generated photo
    ///
    /// Generated captures are one second apart, oldest first.
    pub fn photo_file_name(index: usize) -> String {
        format!("{}.jpeg", BASE_CAPTURE_MILLIS + (index as i64) * 1000)
    }

    /// Gallery entry the direct-access profile would have produced for the
    /// nth generated photo
    pub fn direct_photo(index: usize) -> Photo {
        let name = Self::photo_file_name(index);
        Photo::new(format!("file:///data/{}", name))
            .with_display_path(format!("asset://localhost/data/{}", name))
    }

    /// Gallery entry the materializing profile would have produced for the
    /// nth generated photo
    pub fn web_photo(index: usize) -> Photo {
        Photo::new(Self::photo_file_name(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_jpeg_has_markers() {
        let data = GalleryDataGenerator::generate_jpeg(TEST_JPEG_SIZE, 7);
        assert_eq!(&data[0..2], &[0xFF, 0xD8]);
        assert_eq!(&data[data.len() - 2..], &[0xFF, 0xD9]);
        assert_eq!(data.len(), TEST_JPEG_SIZE);
    }

    #[test]
    fn test_seeded_content_is_deterministic() {
        let a = GalleryDataGenerator::generate_jpeg(512, 42);
        let b = GalleryDataGenerator::generate_jpeg(512, 42);
        let c = GalleryDataGenerator::generate_jpeg(512, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_renderable_png_decodes() {
        let data = GalleryDataGenerator::generate_renderable_png(8, 6, 1);
        let img = image::load_from_memory(&data).unwrap();
        assert_eq!(img.width(), 8);
        assert_eq!(img.height(), 6);
    }

    #[test]
    fn test_photo_file_names_advance() {
        let first = GalleryDataGenerator::photo_file_name(0);
        let second = GalleryDataGenerator::photo_file_name(1);
        assert_eq!(first, "1704067200000.jpeg");
        assert_eq!(second, "1704067201000.jpeg");
    }

    #[test]
    fn test_direct_photo_shape() {
        let photo = GalleryDataGenerator::direct_photo(0);
        assert_eq!(photo.filepath, "file:///data/1704067200000.jpeg");
        assert_eq!(
            photo.display_path.as_deref(),
            Some("asset://localhost/data/1704067200000.jpeg")
        );
        assert_eq!(photo.file_name(), "1704067200000.jpeg");
    }
}
