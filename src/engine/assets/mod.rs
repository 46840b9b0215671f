// Asset management system
//
// Sprite loading and caching. Entities ask for a sprite by source name and
// the scene completes pending loads through an `AssetManager`.

mod handle;
mod loader;
mod manager;

pub use handle::{AssetId, SpriteImage};
pub use loader::{AssetLoader, SPRITE_DIRECTORY, SPRITE_EXTENSIONS};
pub use manager::{AssetManager, AssetStats};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset already loaded: {0}")]
    AlreadyLoaded(String),

    #[error("Failed to decode asset: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
