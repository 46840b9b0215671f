// Asset identifiers and loaded sprite handles

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;

/// Unique identifier for an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub(crate) u64);

impl AssetId {
    /// Create a new asset ID from a string path
    pub fn from_path(path: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        Self(hasher.finish())
    }

    /// Create an asset ID from a raw u64
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// A decoded sprite image, cheap to clone.
///
/// Clones share the same pixel buffer.
#[derive(Clone)]
pub struct SpriteImage {
    id: AssetId,
    source: Arc<str>,
    pixels: Arc<RgbaImage>,
}

impl SpriteImage {
    pub fn new(source: &str, pixels: RgbaImage) -> Self {
        Self {
            id: AssetId::from_path(source),
            source: source.into(),
            pixels: Arc::new(pixels),
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    /// The path or name this sprite was loaded from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl fmt::Debug for SpriteImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpriteImage")
            .field("source", &self.source)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl PartialEq for SpriteImage {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}
