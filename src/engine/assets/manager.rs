// Central sprite cache

use super::{AssetError, AssetId, AssetLoader, SpriteImage};
use image::RgbaImage;
use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// Loads sprite images and caches them by source.
pub struct AssetManager {
    /// Asset loader
    loader: AssetLoader,

    /// Loaded sprites
    sprites: HashMap<AssetId, SpriteImage>,
}

impl AssetManager {
    /// Create a new asset manager
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        Self {
            loader: AssetLoader::new(asset_path),
            sprites: HashMap::new(),
        }
    }

    /// Load a sprite from disk, or return the cached copy
    pub fn load_sprite(&mut self, source: &str) -> Result<SpriteImage, AssetError> {
        let id = AssetId::from_path(source);
        if let Some(sprite) = self.sprites.get(&id) {
            return Ok(sprite.clone());
        }

        let bytes = self.loader.load_bytes(source)?;
        let pixels = image::load_from_memory(&bytes)
            .map_err(|e| AssetError::Decode(format!("{}: {}", source, e)))?
            .to_rgba8();

        let sprite = SpriteImage::new(source, pixels);
        debug!(
            "Loaded sprite '{}' ({}x{})",
            source,
            sprite.width(),
            sprite.height()
        );
        self.sprites.insert(id, sprite.clone());
        Ok(sprite)
    }

    /// Register an already decoded image under `source`
    pub fn insert_sprite(
        &mut self,
        source: &str,
        pixels: RgbaImage,
    ) -> Result<SpriteImage, AssetError> {
        let id = AssetId::from_path(source);
        if self.sprites.contains_key(&id) {
            return Err(AssetError::AlreadyLoaded(source.to_string()));
        }

        let sprite = SpriteImage::new(source, pixels);
        self.sprites.insert(id, sprite.clone());
        Ok(sprite)
    }

    /// Get a cached sprite
    pub fn get_sprite(&self, id: AssetId) -> Option<&SpriteImage> {
        self.sprites.get(&id)
    }

    /// Check if a sprite is cached or exists on disk
    pub fn sprite_exists(&self, source: &str) -> bool {
        self.sprites.contains_key(&AssetId::from_path(source)) || self.loader.exists(source)
    }

    /// Get statistics about loaded assets
    pub fn stats(&self) -> AssetStats {
        AssetStats {
            sprite_count: self.sprites.len(),
        }
    }

    /// Get the asset loader
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }
}

/// Statistics about loaded assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetStats {
    pub sprite_count: usize,
}
