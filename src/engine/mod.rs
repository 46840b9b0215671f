// Engine modules: scenes, layers, entities, physics, input, drawing

pub mod assets;
pub mod config;
pub mod entity;
pub mod error;
pub mod game_loop;
pub mod input;
pub mod layer;
pub mod physics;
pub mod renderer;
pub mod scene;
pub mod transform;

pub use config::EngineConfig;
pub use entity::{Entity, EntityId, InputHandler, Sprite};
pub use error::EngineError;
pub use layer::{Layer, RenderStrategy};
pub use scene::{FrameHandle, FrameScheduler, ManualScheduler, Scene};
pub use transform::Transform;
