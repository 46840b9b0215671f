// Sprite file lookup and reading

use super::AssetError;
use std::path::{Path, PathBuf};

/// Directory under the asset root that holds sprite images
pub const SPRITE_DIRECTORY: &str = "sprites";

/// File extensions accepted as sprites
pub const SPRITE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Asset loader responsible for finding and reading sprite files
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for a sprite. Absolute sources are used as-is.
    pub fn resolve_path(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.base_path.join(SPRITE_DIRECTORY).join(source)
    }

    /// Read sprite bytes from disk
    pub fn load_bytes(&self, source: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve_path(source);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
        }

        Ok(std::fs::read(&path)?)
    }

    /// Check if a sprite exists
    pub fn exists(&self, source: &str) -> bool {
        self.resolve_path(source).exists()
    }

    /// List all sprite files under the sprite directory
    pub fn list_sprites(&self) -> Result<Vec<String>, AssetError> {
        let dir = self.base_path.join(SPRITE_DIRECTORY);

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut sprites = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let accepted = path
                .extension()
                .map(|ext| SPRITE_EXTENSIONS.contains(&ext.to_string_lossy().as_ref()))
                .unwrap_or(false);

            if accepted {
                if let Some(name) = path.file_name() {
                    sprites.push(name.to_string_lossy().to_string());
                }
            }
        }

        sprites.sort();
        Ok(sprites)
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_path_resolution() {
        let loader = AssetLoader::new("/game/assets");
        let path = loader.resolve_path("player.png");

        assert_eq!(path, PathBuf::from("/game/assets/sprites/player.png"));
    }

    #[test]
    fn test_absolute_source_is_kept() {
        let loader = AssetLoader::new("/game/assets");
        let path = loader.resolve_path("/tmp/ball.png");
        assert_eq!(path, PathBuf::from("/tmp/ball.png"));
    }

    #[test]
    fn test_missing_sprite() {
        let loader = AssetLoader::new("/definitely/not/here");
        assert!(!loader.exists("nothing.png"));
        assert!(matches!(
            loader.load_bytes("nothing.png"),
            Err(AssetError::NotFound(_))
        ));
        assert!(loader.list_sprites().unwrap().is_empty());
    }
}
