// Prioritized entity collections bound to one surface

use image::RgbaImage;
use log::{debug, info, trace, warn};

use super::assets::AssetManager;
use super::config::EngineConfig;
use super::entity::{Entity, EntityId};
use super::input::{InputConfigManager, InputEvent, TargetId};
use super::renderer::{PixelSurface, Surface};

/// How a layer runs its frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStrategy {
    /// The three render phases only
    #[default]
    Plain,
    /// Pairwise collision response among physics entities, then the phases
    Physics,
    /// Rendered on the first frame, then left alone until cleared
    Static,
}

/// An ordered group of entities drawn onto one surface.
///
/// Entities are kept sorted by ascending priority. The sort is stable, so
/// equal priorities keep insertion order.
pub struct Layer {
    name: String,
    priority: i32,
    active: bool,
    strategy: RenderStrategy,
    entities: Vec<Entity>,
    surface: Box<dyn Surface>,
    config: EngineConfig,
    next_id: u64,
    rendered: bool,
}

impl Layer {
    pub fn new(name: impl Into<String>, priority: i32, surface: Box<dyn Surface>) -> Self {
        let name = name.into();
        info!(
            "Created layer '{}' (priority {}, {}x{})",
            name,
            priority,
            surface.width(),
            surface.height()
        );
        Self {
            name,
            priority,
            active: true,
            strategy: RenderStrategy::Plain,
            entities: Vec::new(),
            surface,
            config: EngineConfig::default(),
            next_id: 0,
            rendered: false,
        }
    }

    /// A layer drawing into a fresh pixel surface of the configured size
    pub fn with_pixels(name: impl Into<String>, priority: i32, config: &EngineConfig) -> Self {
        let surface = PixelSurface::new(config.layer_width, config.layer_height);
        Self::new(name, priority, Box::new(surface)).with_config(config.clone())
    }

    pub fn with_strategy(mut self, strategy: RenderStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn strategy(&self) -> RenderStrategy {
        self.strategy
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn width(&self) -> f32 {
        self.surface.width()
    }

    pub fn height(&self) -> f32 {
        self.surface.height()
    }

    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    /// Add an entity and return the id it can be looked up by
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.set_id(id);

        debug!(
            "Layer '{}': added entity {} (priority {})",
            self.name,
            id,
            entity.priority()
        );
        self.entities.push(entity);
        self.sort();
        id
    }

    pub fn add_all(&mut self, entities: impl IntoIterator<Item = Entity>) -> Vec<EntityId> {
        entities.into_iter().map(|e| self.add(e)).collect()
    }

    /// Take an entity out of the layer
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        debug!("Layer '{}': removed entity {}", self.name, id);
        Some(self.entities.remove(index))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == Some(id))
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == Some(id))
    }

    /// Change an entity's priority and restore the ordering
    pub fn set_entity_priority(&mut self, id: EntityId, priority: i32) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        entity.set_priority(priority);
        self.sort();
        true
    }

    /// Entities in render order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == Some(id))
    }

    fn sort(&mut self) {
        self.entities.sort_by_key(Entity::priority);
    }

    /// Run one frame
    pub fn render(&mut self) {
        if !self.active {
            return;
        }

        match self.strategy {
            RenderStrategy::Plain => {}
            RenderStrategy::Physics => self.resolve_collisions(),
            RenderStrategy::Static if self.rendered => return,
            RenderStrategy::Static => {}
        }

        let surface = self.surface.as_mut();
        for entity in &mut self.entities {
            entity.prepare(surface, &self.config);
        }
        for entity in &self.entities {
            entity.draw(surface, &self.config);
        }
        for entity in &mut self.entities {
            entity.finalize();
        }
        self.rendered = true;
    }

    /// Test every ordered pair of physics entities and let the first of each
    /// pair respond. Both directions are visited, so each body reacts to the
    /// other on its own.
    fn resolve_collisions(&mut self) {
        let count = self.entities.len();
        for i in 0..count {
            for j in 0..count {
                if i == j {
                    continue;
                }
                let Some(contact) = self.entities[i].collide(&self.entities[j]) else {
                    continue;
                };
                if contact.collided {
                    trace!(
                        "Layer '{}': {:?} hit {:?}",
                        self.name,
                        self.entities[i].id(),
                        self.entities[j].id()
                    );
                }
                if let Err(e) = self.entities[i].handle_collision(&contact) {
                    warn!(
                        "Layer '{}': skipped collision response for {:?}: {}",
                        self.name,
                        self.entities[i].id(),
                        e
                    );
                }
            }
        }
    }

    /// Wipe the surface and redraw everything on the next frame
    pub fn clear(&mut self) {
        self.surface.clear();
        for entity in &mut self.entities {
            entity.mark_dirty();
        }
        self.rendered = false;
    }

    /// Route an input event to the entities; returns how many consumed it
    pub fn dispatch(
        &mut self,
        target: TargetId,
        event: &InputEvent,
        bindings: &InputConfigManager,
    ) -> usize {
        let speed = self.config.movement_speed;
        let mut consumed = 0;
        for entity in &mut self.entities {
            match entity.handle_input(target, event, bindings, speed) {
                Ok(true) => consumed += 1,
                Ok(false) => {}
                Err(e) => {
                    consumed += 1;
                    warn!(
                        "Layer '{}': input handler for {:?} failed: {}",
                        self.name,
                        entity.id(),
                        e
                    );
                }
            }
        }
        consumed
    }

    /// Complete pending sprite loads; returns how many finished
    pub fn resolve_sprites(&mut self, assets: &mut AssetManager) -> usize {
        let mut loaded = 0;
        let mut changed = false;
        for entity in &mut self.entities {
            match entity.resolve_sprite(assets) {
                Ok(true) => {
                    loaded += 1;
                    changed = true;
                }
                Ok(false) => {}
                Err(e) => {
                    // the entity fell back to its default look and still needs drawing
                    changed = true;
                    warn!(
                        "Layer '{}': sprite for {:?} failed to load: {}",
                        self.name,
                        entity.id(),
                        e
                    );
                }
            }
        }
        if changed {
            self.rendered = false;
        }
        loaded
    }

    pub fn snapshot(&self) -> Option<RgbaImage> {
        self.surface.snapshot()
    }
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("active", &self.active)
            .field("strategy", &self.strategy)
            .field("entities", &self.entities.len())
            .finish()
    }
}
