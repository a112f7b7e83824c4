//! Preview and Thumbnail Support Module
//!
//! Provides functionality for generating and caching thumbnails of gallery
//! photos. Sources are resolved the same way a cell renders: inline data
//! first, then the stored file behind the photo's filepath.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use percent_encoding::percent_decode_str;

use crate::core::error::{GalleryError, Result};
use crate::core::photo::Photo;
use crate::platform::{FileStore, StorageDirectory};

// =============================================================================
// Thumbnail Configuration
// =============================================================================

/// Configuration for thumbnail generation
#[derive(Debug, Clone)]
pub struct ThumbnailConfig {
    /// Maximum width for thumbnails (in pixels)
    pub max_width: u32,
    /// Maximum height for thumbnails (in pixels)
    pub max_height: u32,
    /// JPEG quality for thumbnails (1-100)
    pub quality: u8,
    /// Maximum source size to attempt thumbnail generation (in bytes)
    pub max_source_size: u64,
    /// Whether to cache thumbnails in memory
    pub enable_cache: bool,
    /// Maximum number of thumbnails to cache
    pub cache_max_entries: usize,
    /// Cache entry lifetime
    pub cache_lifetime: Duration,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_width: 256,
            max_height: 256,
            quality: 80,
            max_source_size: 50 * 1024 * 1024, // 50 MB
            enable_cache: true,
            cache_max_entries: 500,
            cache_lifetime: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl ThumbnailConfig {
    /// Config sized for grid cells
    pub fn grid() -> Self {
        Self::default()
    }

    /// Config sized for the full-screen detail view
    pub fn detail() -> Self {
        Self {
            max_width: 1024,
            max_height: 1024,
            quality: 85,
            cache_max_entries: 50,
            ..Default::default()
        }
    }

    /// Set maximum dimensions
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    /// Set quality
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Set cache settings
    pub fn with_cache(mut self, enabled: bool, max_entries: usize) -> Self {
        self.enable_cache = enabled;
        self.cache_max_entries = max_entries;
        self
    }
}

// =============================================================================
// Thumbnail Data
// =============================================================================

/// A generated thumbnail
#[derive(Debug, Clone)]
pub struct Thumbnail {
    /// The thumbnail image data (JPEG bytes)
    pub data: Vec<u8>,
    /// Original width of the source image
    pub original_width: u32,
    /// Original height of the source image
    pub original_height: u32,
    /// Thumbnail width
    pub width: u32,
    /// Thumbnail height
    pub height: u32,
    /// MIME type of the thumbnail
    pub mime_type: String,
    /// Size of the source data in bytes
    pub source_bytes: u64,
    /// When this thumbnail was generated
    pub generated_at: Instant,
}

impl Thumbnail {
    /// Check if the thumbnail is still fresh according to lifetime
    pub fn is_fresh(&self, lifetime: Duration) -> bool {
        self.generated_at.elapsed() < lifetime
    }

    /// Get the aspect ratio of the original image
    pub fn original_aspect_ratio(&self) -> f64 {
        if self.original_height == 0 {
            1.0
        } else {
            self.original_width as f64 / self.original_height as f64
        }
    }

    /// Get the thumbnail as a data URL for use in HTML/web UIs
    pub fn as_data_url(&self) -> String {
        let base64_data = STANDARD.encode(&self.data);
        format!("data:{};base64,{}", self.mime_type, base64_data)
    }
}

// =============================================================================
// Thumbnail Cache
// =============================================================================

/// Cache entry with metadata
struct CacheEntry {
    thumbnail: Thumbnail,
    last_accessed: Instant,
}

/// In-memory thumbnail cache keyed by photo filepath
pub struct ThumbnailCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    config: ThumbnailConfig,
}

impl ThumbnailCache {
    /// Create a new cache with the given configuration
    pub fn new(config: ThumbnailConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Get a thumbnail from the cache
    pub fn get(&self, filepath: &str) -> Option<Thumbnail> {
        let mut entries = self.entries.write().unwrap();

        if let Some(entry) = entries.get_mut(filepath) {
            if entry.thumbnail.is_fresh(self.config.cache_lifetime) {
                entry.last_accessed = Instant::now();
                return Some(entry.thumbnail.clone());
            } else {
                // Expired - remove it
                entries.remove(filepath);
            }
        }

        None
    }

    /// Store a thumbnail in the cache
    pub fn put(&self, filepath: String, thumbnail: Thumbnail) {
        if !self.config.enable_cache {
            return;
        }

        let mut entries = self.entries.write().unwrap();

        // Evict old entries if at capacity
        if entries.len() >= self.config.cache_max_entries {
            self.evict_oldest(&mut entries);
        }

        entries.insert(
            filepath,
            CacheEntry {
                thumbnail,
                last_accessed: Instant::now(),
            },
        );
    }

    /// Remove a thumbnail from the cache
    ///
    /// Called when the photo behind it is deleted.
    pub fn remove(&self, filepath: &str) {
        self.entries.write().unwrap().remove(filepath);
    }

    /// Clear the entire cache
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Get the number of cached thumbnails
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Evict the oldest entries to make room
    fn evict_oldest(&self, entries: &mut HashMap<String, CacheEntry>) {
        // Remove 10% of entries, oldest first
        let to_remove = (entries.len() / 10).max(1);

        let mut items: Vec<_> = entries
            .iter()
            .map(|(k, v)| (k.clone(), v.last_accessed))
            .collect();

        items.sort_by(|a, b| a.1.cmp(&b.1));

        for (key, _) in items.into_iter().take(to_remove) {
            entries.remove(&key);
        }
    }

    /// Remove expired entries
    pub fn cleanup_expired(&self) {
        let mut entries = self.entries.write().unwrap();
        let lifetime = self.config.cache_lifetime;

        entries.retain(|_, entry| entry.thumbnail.is_fresh(lifetime));
    }
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        Self::new(ThumbnailConfig::default())
    }
}

// =============================================================================
// Thumbnail Generator
// =============================================================================

/// Result of a thumbnail generation attempt
#[derive(Debug)]
pub enum ThumbnailResult {
    /// Successfully generated thumbnail
    Success(Thumbnail),
    /// The photo's source data could not be found
    SourceMissing(String),
    /// Source data is too large to process
    SourceTooLarge(u64),
    /// Error during generation
    Error(String),
}

/// Thumbnail generator for gallery photos
pub struct ThumbnailGenerator {
    config: ThumbnailConfig,
    cache: ThumbnailCache,
}

impl ThumbnailGenerator {
    /// Create a new generator with default configuration
    pub fn new() -> Self {
        Self::with_config(ThumbnailConfig::default())
    }

    /// Create a generator with custom configuration
    pub fn with_config(config: ThumbnailConfig) -> Self {
        let cache = ThumbnailCache::new(config.clone());
        Self { config, cache }
    }

    /// Get the cache reference
    pub fn cache(&self) -> &ThumbnailCache {
        &self.cache
    }

    /// Generate a thumbnail for a gallery photo
    ///
    /// Resolves the photo's bytes, decodes them, resizes to the configured
    /// bounds preserving aspect ratio, and re-encodes as JPEG. Results are
    /// cached under the photo's filepath.
    pub async fn generate(&self, photo: &Photo, files: &dyn FileStore) -> ThumbnailResult {
        // Check cache first
        if let Some(cached) = self.cache.get(&photo.filepath) {
            return ThumbnailResult::Success(cached);
        }

        let data = match Self::resolve_bytes(photo, files).await {
            Ok(d) => d,
            Err(GalleryError::NotFound(what)) => return ThumbnailResult::SourceMissing(what),
            Err(e) => return ThumbnailResult::Error(format!("Failed to read photo: {}", e)),
        };

        if data.len() as u64 > self.config.max_source_size {
            return ThumbnailResult::SourceTooLarge(data.len() as u64);
        }

        match self.render(&data) {
            ThumbnailResult::Success(thumb) => {
                self.cache.put(photo.filepath.clone(), thumb.clone());
                ThumbnailResult::Success(thumb)
            }
            other => other,
        }
    }

    /// Resolve a photo to raw image bytes
    ///
    /// Same precedence as rendering: inline data, then a `file://` URI read
    /// from disk, then a bare name read from the app data directory.
    async fn resolve_bytes(photo: &Photo, files: &dyn FileStore) -> Result<Vec<u8>> {
        if let Some(ref inline) = photo.inline_data {
            return Self::decode_data_url(inline);
        }

        if let Some(uri_path) = photo.filepath.strip_prefix("file://") {
            let decoded = percent_decode_str(uri_path).decode_utf8_lossy();
            return files.read_external(Path::new(decoded.as_ref())).await;
        }

        files.read(&photo.filepath, StorageDirectory::Data).await
    }

    /// Decode the payload of a base64 data URL
    fn decode_data_url(url: &str) -> Result<Vec<u8>> {
        let payload = url
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .ok_or_else(|| GalleryError::Io("inline photo data is not a base64 data URL".to_string()))?;

        STANDARD
            .decode(payload)
            .map_err(|e| GalleryError::Io(format!("invalid base64 payload: {}", e)))
    }

    /// Decode, resize, and re-encode the source data
    fn render(&self, data: &[u8]) -> ThumbnailResult {
        let img = match image::load_from_memory(data) {
            Ok(i) => i,
            Err(e) => return ThumbnailResult::Error(format!("Failed to decode image: {}", e)),
        };

        let original_width = img.width();
        let original_height = img.height();

        // Resize maintaining aspect ratio
        let resized = img.thumbnail(self.config.max_width, self.config.max_height);

        // JPEG has no alpha channel
        let rgb = resized.to_rgb8();

        let mut output = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut output, self.config.quality);
        if let Err(e) = encoder.encode_image(&rgb) {
            return ThumbnailResult::Error(format!("Failed to encode thumbnail: {}", e));
        }

        ThumbnailResult::Success(Thumbnail {
            data: output,
            original_width,
            original_height,
            width: rgb.width(),
            height: rgb.height(),
            mime_type: "image/jpeg".to_string(),
            source_bytes: data.len() as u64,
            generated_at: Instant::now(),
        })
    }

    /// Clear the thumbnail cache
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.len(),
            max_entries: self.config.cache_max_entries,
        }
    }
}

impl Default for ThumbnailGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entries: usize,
    /// Maximum entries allowed
    pub max_entries: usize,
}

impl CacheStats {
    /// Get cache utilization as a percentage
    pub fn utilization(&self) -> f64 {
        if self.max_entries == 0 {
            0.0
        } else {
            (self.entries as f64 / self.max_entries as f64) * 100.0
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
