// Drawable entities and their three-phase render contract

use std::fmt;

use log::debug;

use super::assets::{AssetManager, SpriteImage};
use super::config::{EngineConfig, DEFAULT_ENTITY_COLOR};
use super::error::EngineError;
use super::input::{
    Controller, ControllerKind, InputConfig, InputConfigManager, InputEvent, KeyboardController,
    TargetId,
};
use super::physics::{Collider, Contact, PhysicsBody};
use super::renderer::{Color, Surface};
use super::transform::Transform;
use crate::core::Vector2;

/// Identifier handed out by the layer an entity is added to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an entity is drawn
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Sprite {
    /// A filled and stroked rectangle in the entity's color
    #[default]
    Default,
    /// Waiting for the asset manager to load this source
    Loading(String),
    Loaded(SpriteImage),
}

/// Replacement for the built-in reflect-and-displace collision response
pub type CollisionHandler = Box<dyn FnMut(&mut Entity, &Contact) -> Result<(), EngineError>>;

/// Callback run when one of the entity's controllers accepts an event
pub type InputCallback = Box<dyn FnMut(&mut Entity, &InputEvent) -> Result<(), EngineError>>;

pub enum InputHandler {
    /// Keyboard movement using a player's key bindings
    Movement { player: usize },
    Custom(InputCallback),
}

impl fmt::Debug for InputHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movement { player } => f.debug_struct("Movement").field("player", player).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A positioned, rotatable and scalable drawable.
///
/// Entities with a [`PhysicsBody`] also move every frame and take part in
/// collisions when they live in a physics layer.
///
/// Every setter that changes how the entity looks marks it dirty, so it is
/// redrawn on the next frame.
pub struct Entity {
    id: Option<EntityId>,
    transform: Transform,
    sprite: Sprite,
    ready: bool,
    dirty: bool,
    active: bool,
    priority: i32,
    color: Color,
    controllers: Vec<Controller>,
    body: Option<PhysicsBody>,
    collision_handler: Option<CollisionHandler>,
    input_handler: Option<InputHandler>,
}

impl Entity {
    pub fn new() -> Self {
        Self {
            id: None,
            transform: Transform::new(),
            sprite: Sprite::Default,
            ready: false,
            dirty: true,
            active: true,
            priority: 0,
            color: DEFAULT_ENTITY_COLOR,
            controllers: Vec::new(),
            body: None,
            collision_handler: None,
            input_handler: None,
        }
    }

    /// An entity carrying `body`
    pub fn physics(body: PhysicsBody) -> Self {
        Self::new().with_body(body)
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controllers.push(controller);
        self
    }

    pub fn with_input_handler(mut self, handler: InputHandler) -> Self {
        self.input_handler = Some(handler);
        self
    }

    pub fn with_collision_handler(
        mut self,
        handler: impl FnMut(&mut Entity, &Contact) -> Result<(), EngineError> + 'static,
    ) -> Self {
        self.collision_handler = Some(Box::new(handler));
        self
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    // Geometry

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vector2 {
        self.transform.position()
    }

    pub fn x(&self) -> f32 {
        self.transform.position().x
    }

    pub fn y(&self) -> f32 {
        self.transform.position().y
    }

    /// Rotation in degrees
    pub fn rotation(&self) -> f32 {
        self.transform.rotation()
    }

    pub fn scale(&self) -> Vector2 {
        self.transform.scale()
    }

    pub fn width(&self) -> f32 {
        self.transform.width()
    }

    pub fn height(&self) -> f32 {
        self.transform.height()
    }

    pub fn set_position(&mut self, position: Vector2) -> Result<(), EngineError> {
        self.transform.set_position(position)?;
        self.dirty = true;
        Ok(())
    }

    pub fn translate(&mut self, delta: Vector2) -> Result<(), EngineError> {
        self.transform.translate(delta)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_rotation(&mut self, degrees: f32) -> Result<(), EngineError> {
        self.transform.set_rotation(degrees)?;
        self.dirty = true;
        Ok(())
    }

    pub fn rotate(&mut self, degrees: f32) -> Result<(), EngineError> {
        self.transform.rotate(degrees)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_scale(&mut self, scale: Vector2) -> Result<(), EngineError> {
        self.transform.set_scale(scale)?;
        self.dirty = true;
        Ok(())
    }

    /// Multiply width and height by `factor`
    pub fn scale_by(&mut self, factor: f32) -> Result<(), EngineError> {
        self.transform.scalar_scale(factor)?;
        self.dirty = true;
        Ok(())
    }

    // Appearance and render state

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// Start drawing the image at `source`; the entity is not ready until the
    /// load completes through [`Entity::resolve_sprite`]
    pub fn set_sprite(&mut self, source: impl Into<String>) {
        self.sprite = Sprite::Loading(source.into());
        self.ready = false;
    }

    pub fn set_sprite_image(&mut self, image: SpriteImage) {
        self.sprite = Sprite::Loaded(image);
        self.dirty = true;
    }

    /// Go back to drawing a plain rectangle
    pub fn clear_sprite(&mut self) {
        self.sprite = Sprite::Default;
        self.dirty = true;
    }

    /// Finish a pending sprite load. Returns true when a sprite was loaded.
    ///
    /// A failed load falls back to the default rectangle and reports the error.
    pub fn resolve_sprite(&mut self, assets: &mut AssetManager) -> Result<bool, EngineError> {
        let Sprite::Loading(source) = &self.sprite else {
            return Ok(false);
        };

        let loaded = assets.load_sprite(source);
        self.dirty = true;
        match loaded {
            Ok(image) => {
                debug!("Entity {:?} sprite '{}' ready", self.id, image.source());
                self.sprite = Sprite::Loaded(image);
                Ok(true)
            }
            Err(e) => {
                self.sprite = Sprite::Default;
                Err(e.into())
            }
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.dirty = true;
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub(crate) fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
        self.dirty = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.dirty = true;
    }

    // Controllers and input

    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    pub fn add_controller(&mut self, controller: Controller) {
        self.controllers.push(controller);
    }

    pub fn add_controllers(&mut self, controllers: impl IntoIterator<Item = Controller>) {
        self.controllers.extend(controllers);
    }

    /// Detach every controller of `kind`
    pub fn remove_controllers(&mut self, kind: ControllerKind) -> Vec<Controller> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.controllers)
            .into_iter()
            .partition(|c| c.kind() == kind);
        self.controllers = kept;
        removed
    }

    /// Move every controller over to `target`
    pub fn rebind_controllers(&mut self, target: TargetId) {
        self.controllers = std::mem::take(&mut self.controllers)
            .into_iter()
            .map(|c| c.rebind(target))
            .collect();
    }

    /// The first enabled keyboard
    pub fn keyboard(&self) -> Option<&KeyboardController> {
        self.controllers
            .iter()
            .filter_map(Controller::as_keyboard)
            .find(|k| k.enabled)
    }

    pub fn set_input_handler(&mut self, handler: Option<InputHandler>) {
        self.input_handler = handler;
    }

    /// Feed an event to the controllers bound to `target`, then run the input
    /// handler if any of them consumed it. Returns whether the event was consumed.
    pub fn handle_input(
        &mut self,
        target: TargetId,
        event: &InputEvent,
        bindings: &InputConfigManager,
        speed: f32,
    ) -> Result<bool, EngineError> {
        let mut consumed = false;
        for controller in &mut self.controllers {
            consumed |= controller.handle(target, event);
        }
        if !consumed {
            return Ok(false);
        }

        let Some(mut handler) = self.input_handler.take() else {
            return Ok(true);
        };
        let result = match &mut handler {
            InputHandler::Movement { player } => match bindings.config(*player) {
                Some(config) => self.movement(config, speed),
                None => Err(EngineError::mismatch(
                    "configured player",
                    format!("player {}", player),
                )),
            },
            InputHandler::Custom(callback) => callback(self, event),
        };
        if self.input_handler.is_none() {
            self.input_handler = Some(handler);
        }
        result.map(|_| true)
    }

    /// Set velocity straight from the held keys, bypassing forces.
    ///
    /// Opposite directions cancel out. Requires an enabled keyboard and a
    /// physics body.
    pub fn movement(&mut self, bindings: &InputConfig, speed: f32) -> Result<(), EngineError> {
        let keyboard = self
            .keyboard()
            .ok_or_else(|| EngineError::mismatch("keyboard controller", "none attached"))?;

        let mut direction = Vector2::ZERO;
        for key in keyboard.keys_down() {
            if let Some(d) = bindings.direction(key) {
                direction += d.offset();
            }
        }
        let unit = |v: f32| if v == 0.0 { 0.0 } else { v.signum() };
        let direction = Vector2::new(unit(direction.x), unit(direction.y));

        self.body_mut()?.set_velocity(direction * speed)
    }

    // Physics

    pub fn body(&self) -> Option<&PhysicsBody> {
        self.body.as_ref()
    }

    pub fn has_physics(&self) -> bool {
        self.body.is_some()
    }

    fn body_mut(&mut self) -> Result<&mut PhysicsBody, EngineError> {
        self.body
            .as_mut()
            .ok_or_else(|| EngineError::mismatch("physics body", "plain entity"))
    }

    pub fn velocity(&self) -> Option<Vector2> {
        self.body.as_ref().map(PhysicsBody::velocity)
    }

    pub fn set_velocity(&mut self, velocity: Vector2) -> Result<(), EngineError> {
        self.body_mut()?.set_velocity(velocity)
    }

    pub fn acceleration(&self) -> Option<Vector2> {
        self.body.as_ref().map(PhysicsBody::acceleration)
    }

    pub fn apply_force(&mut self, force: Vector2) -> Result<(), EngineError> {
        self.body_mut()?.apply_force(force)
    }

    /// Collision view over this entity's transform, for physics entities
    pub fn collider(&self) -> Option<Collider<'_>> {
        self.body.as_ref().map(|_| Collider::new(&self.transform))
    }

    /// Integrate one frame of motion
    pub fn update(&mut self) {
        if let Some(body) = &mut self.body {
            body.step(&mut self.transform);
            self.dirty = true;
        }
    }

    /// Test this entity against `other`; `None` unless both have bodies
    pub fn collide(&self, other: &Entity) -> Option<Contact> {
        let (mine, theirs) = (self.collider()?, other.collider()?);
        Some(mine.collide(&theirs, |contact| *contact))
    }

    pub fn set_collision_handler(&mut self, handler: Option<CollisionHandler>) {
        self.collision_handler = handler;
    }

    /// React to a contact, with the custom handler if one is set
    pub fn handle_collision(&mut self, contact: &Contact) -> Result<(), EngineError> {
        let Some(mut handler) = self.collision_handler.take() else {
            return self.resolve_collision(contact);
        };
        let result = handler(self, contact);
        if self.collision_handler.is_none() {
            self.collision_handler = Some(handler);
        }
        result
    }

    /// Built-in response: reflect the velocity off the struck edge and step
    /// back out of the other body
    pub fn resolve_collision(&mut self, contact: &Contact) -> Result<(), EngineError> {
        let Some(edge) = contact.edge.filter(|_| contact.collided) else {
            return Ok(());
        };
        let body = self
            .body
            .as_mut()
            .ok_or_else(|| EngineError::mismatch("physics body", "plain entity"))?;
        body.respond(&mut self.transform, &edge, contact.other_position)?;
        self.dirty = true;
        Ok(())
    }

    // Render phases

    /// First phase: clear what was drawn last frame and get ready to draw.
    ///
    /// Physics entities clear their rotated footprint plus a margin, then
    /// move, before the regular clear.
    pub fn prepare(&mut self, surface: &mut dyn Surface, config: &EngineConfig) {
        if self.body.is_some() {
            let (x, y) = (self.x(), self.y());
            let (w, h) = (self.width(), self.height());
            let radians = self.transform.rotation_radians();
            let margin = config.clear_margin;

            surface.translate(x, y);
            surface.rotate(radians);
            surface.translate(-x, -y);
            surface.clear_rect(
                x - margin - (w / 2.0).ceil(),
                y - margin - (h / 2.0).ceil(),
                w + 2.0 * margin,
                h + 2.0 * margin,
            );
            surface.translate(x, y);
            surface.rotate(-radians);
            surface.translate(-x, -y);

            self.update();
        }

        if self.dirty {
            let (w, h) = (self.width(), self.height());
            surface.clear_rect(self.x() - w / 2.0, self.y() - h / 2.0, w, h);
        }
        self.ready = !matches!(self.sprite, Sprite::Loading(_));
    }

    /// Second phase: draw when dirty, ready and active
    pub fn draw(&self, surface: &mut dyn Surface, config: &EngineConfig) {
        if !(self.dirty && self.ready && self.active) {
            return;
        }

        let (x, y) = (self.x(), self.y());
        let (w, h) = (self.width(), self.height());
        let radians = self.transform.rotation_radians();
        let (left, top) = (x - w / 2.0, y - h / 2.0);

        surface.translate(x, y);
        surface.rotate(radians);
        surface.translate(-x, -y);

        match &self.sprite {
            Sprite::Loaded(image) => surface.draw_image(image, left, top, w, h),
            _ => {
                surface.set_fill_color(self.color);
                surface.set_stroke_color(config.stroke_color);
                surface.fill_rect(left, top, w, h);
                surface.stroke_rect(left, top, w, h);
            }
        }

        surface.translate(x, y);
        surface.rotate(-radians);
        surface.translate(-x, -y);
    }

    /// Third phase
    pub fn finalize(&mut self) {
        self.ready = false;
        self.dirty = false;
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("transform", &self.transform)
            .field("sprite", &self.sprite)
            .field("ready", &self.ready)
            .field("dirty", &self.dirty)
            .field("active", &self.active)
            .field("priority", &self.priority)
            .field("color", &self.color)
            .field("controllers", &self.controllers)
            .field("body", &self.body)
            .field("collision_handler", &self.collision_handler.is_some())
            .field("input_handler", &self.input_handler)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Segment;
    use crate::engine::input::Direction;
    use crate::engine::physics::Freeze;
    use crate::engine::renderer::{DrawCall, RecordingSurface};
    use image::RgbaImage;
    use winit::keyboard::KeyCode;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Entity {
        let mut entity = Entity::new();
        entity.set_position(Vector2::new(x, y)).unwrap();
        entity.set_scale(Vector2::new(w, h)).unwrap();
        entity
    }

    fn keyboard_entity() -> Entity {
        Entity::physics(PhysicsBody::default()).with_controller(Controller::keyboard(TargetId(0)))
    }

    #[test]
    fn test_defaults() {
        let entity = Entity::new();
        assert!(!entity.is_ready());
        assert!(entity.is_dirty());
        assert!(entity.is_active());
        assert_eq!(entity.priority(), 0);
        assert_eq!(entity.color(), DEFAULT_ENTITY_COLOR);
        assert_eq!(entity.sprite(), &Sprite::Default);
        assert!(!entity.has_physics());
        assert!(entity.id().is_none());
    }

    #[test]
    fn test_visual_mutations_mark_dirty() {
        let mutations: Vec<Box<dyn Fn(&mut Entity)>> = vec![
            Box::new(|e: &mut Entity| e.set_position(Vector2::new(1.0, 1.0)).unwrap()),
            Box::new(|e: &mut Entity| e.translate(Vector2::new(1.0, 0.0)).unwrap()),
            Box::new(|e: &mut Entity| e.set_rotation(10.0).unwrap()),
            Box::new(|e: &mut Entity| e.rotate(10.0).unwrap()),
            Box::new(|e: &mut Entity| e.set_scale(Vector2::new(2.0, 2.0)).unwrap()),
            Box::new(|e: &mut Entity| e.scale_by(2.0).unwrap()),
            Box::new(|e: &mut Entity| e.set_color(Color::WHITE)),
            Box::new(|e: &mut Entity| e.set_active(false)),
            Box::new(|e: &mut Entity| e.clear_sprite()),
        ];

        for mutate in mutations {
            let mut entity = boxed(0.0, 0.0, 1.0, 1.0);
            entity.finalize();
            assert!(!entity.is_dirty());
            mutate(&mut entity);
            assert!(entity.is_dirty());
        }
    }

    #[test]
    fn test_rejected_setter_keeps_state() {
        let mut entity = boxed(1.0, 2.0, 3.0, 4.0);
        entity.finalize();
        let err = entity.set_position(Vector2::new(f32::NAN, 0.0));
        assert!(matches!(err, Err(EngineError::TypeMismatch { .. })));
        assert_eq!(entity.position(), Vector2::new(1.0, 2.0));
        assert!(!entity.is_dirty());
    }

    #[test]
    fn test_draw_sequence_for_default_sprite() {
        let config = EngineConfig::default();
        let (mut surface, log) = RecordingSurface::new(100.0, 100.0);
        let mut entity = boxed(10.0, 20.0, 4.0, 6.0);
        entity.set_color(Color::WHITE);

        entity.prepare(&mut surface, &config);
        assert!(entity.is_ready());
        entity.draw(&mut surface, &config);
        entity.finalize();

        assert_eq!(
            log.calls(),
            vec![
                DrawCall::ClearRect { x: 8.0, y: 17.0, w: 4.0, h: 6.0 },
                DrawCall::Translate { x: 10.0, y: 20.0 },
                DrawCall::Rotate(0.0),
                DrawCall::Translate { x: -10.0, y: -20.0 },
                DrawCall::SetFillColor(Color::WHITE),
                DrawCall::SetStrokeColor(Color::BLACK),
                DrawCall::FillRect { x: 8.0, y: 17.0, w: 4.0, h: 6.0 },
                DrawCall::StrokeRect { x: 8.0, y: 17.0, w: 4.0, h: 6.0 },
                DrawCall::Translate { x: 10.0, y: 20.0 },
                DrawCall::Rotate(-0.0),
                DrawCall::Translate { x: -10.0, y: -20.0 },
            ]
        );
        assert!(!entity.is_ready());
        assert!(!entity.is_dirty());
    }

    #[test]
    fn test_draw_skipped_unless_dirty_ready_active() {
        let config = EngineConfig::default();
        let (mut surface, log) = RecordingSurface::new(10.0, 10.0);

        // not prepared, so not ready
        let entity = boxed(1.0, 1.0, 1.0, 1.0);
        entity.draw(&mut surface, &config);
        assert!(log.is_empty());

        let mut inactive = boxed(1.0, 1.0, 1.0, 1.0);
        inactive.set_active(false);
        inactive.prepare(&mut surface, &config);
        log.clear();
        inactive.draw(&mut surface, &config);
        assert!(log.is_empty());

        let mut clean = boxed(1.0, 1.0, 1.0, 1.0);
        clean.finalize();
        clean.prepare(&mut surface, &config);
        assert!(log.is_empty());
        clean.draw(&mut surface, &config);
        assert!(log.is_empty());
    }

    #[test]
    fn test_rotated_draw_restores_transform() {
        let config = EngineConfig::default();
        let (mut surface, log) = RecordingSurface::new(50.0, 50.0);
        let mut entity = Entity::physics(PhysicsBody::default());
        entity.set_position(Vector2::new(25.0, 25.0)).unwrap();
        entity.set_scale(Vector2::new(10.0, 4.0)).unwrap();
        entity.set_rotation(33.0).unwrap();

        entity.prepare(&mut surface, &config);
        entity.draw(&mut surface, &config);
        assert!(log.transform_is_identity());
        assert!(log.calls().iter().any(DrawCall::is_paint));
    }

    #[test]
    fn test_physics_prepare_clears_margin_then_moves() {
        let config = EngineConfig::default();
        let (mut surface, log) = RecordingSurface::new(100.0, 100.0);
        let mut entity = Entity::physics(PhysicsBody::default());
        entity.set_position(Vector2::new(50.0, 50.0)).unwrap();
        entity.set_scale(Vector2::new(15.0, 15.0)).unwrap();
        entity.set_velocity(Vector2::new(-3.0, 0.0)).unwrap();

        entity.prepare(&mut surface, &config);

        let calls = log.calls();
        assert_eq!(
            calls[3],
            DrawCall::ClearRect { x: 37.0, y: 37.0, w: 25.0, h: 25.0 }
        );
        // the regular clear happens at the new position
        assert_eq!(
            calls.last(),
            Some(&DrawCall::ClearRect { x: 39.5, y: 42.5, w: 15.0, h: 15.0 })
        );
        assert_eq!(entity.position(), Vector2::new(47.0, 50.0));
        assert!(log.transform_is_identity());
    }

    #[test]
    fn test_sprite_loading_lifecycle() {
        let mut assets = AssetManager::new("/nowhere");
        assets
            .insert_sprite("ball.png", RgbaImage::new(2, 2))
            .unwrap();

        let config = EngineConfig::default();
        let (mut surface, log) = RecordingSurface::new(10.0, 10.0);
        let mut entity = boxed(5.0, 5.0, 2.0, 2.0);
        entity.set_sprite("ball.png");

        // pending loads keep the entity from drawing
        entity.prepare(&mut surface, &config);
        assert!(!entity.is_ready());
        entity.finalize();

        assert!(entity.resolve_sprite(&mut assets).unwrap());
        assert!(entity.is_dirty());
        assert!(matches!(entity.sprite(), Sprite::Loaded(_)));
        assert!(!entity.resolve_sprite(&mut assets).unwrap());

        log.clear();
        entity.prepare(&mut surface, &config);
        entity.draw(&mut surface, &config);
        assert!(log.calls().iter().any(|call| matches!(
            call,
            DrawCall::DrawImage { source, .. } if source == "ball.png"
        )));
    }

    #[test]
    fn test_failed_sprite_falls_back_to_default() {
        let mut assets = AssetManager::new("/nowhere");
        let mut entity = Entity::new();
        entity.set_sprite("missing.png");
        entity.finalize();

        let err = entity.resolve_sprite(&mut assets);
        assert!(matches!(err, Err(EngineError::Asset(_))));
        assert_eq!(entity.sprite(), &Sprite::Default);
        assert!(entity.is_dirty());
    }

    #[test]
    fn test_update_moves_physics_entities_only() {
        let mut plain = Entity::new();
        plain.update();
        assert_eq!(plain.position(), Vector2::ZERO);

        let mut moving = Entity::physics(PhysicsBody::default());
        moving.set_velocity(Vector2::new(1.0, 0.0)).unwrap();
        moving.finalize();
        for _ in 0..3 {
            moving.update();
        }
        assert_eq!(moving.position(), Vector2::new(3.0, 0.0));
        assert!(moving.is_dirty());
    }

    #[test]
    fn test_physics_calls_on_plain_entity_fail() {
        let mut plain = Entity::new();
        assert!(matches!(
            plain.set_velocity(Vector2::ONE),
            Err(EngineError::TypeMismatch { .. })
        ));
        assert!(plain.apply_force(Vector2::ONE).is_err());
        assert!(plain.velocity().is_none());
        assert!(plain.collider().is_none());
    }

    #[test]
    fn test_head_on_collision_scenario() {
        let mut mover = Entity::physics(PhysicsBody::default());
        mover.set_position(Vector2::new(10.0, 10.0)).unwrap();
        mover.set_scale(Vector2::new(4.0, 4.0)).unwrap();
        mover.set_velocity(Vector2::new(2.0, 0.0)).unwrap();

        let mut wall = Entity::physics(PhysicsBody::default().with_freeze(Freeze::BOTH));
        wall.set_position(Vector2::new(13.5, 10.0)).unwrap();
        wall.set_scale(Vector2::new(2.0, 20.0)).unwrap();

        mover.update();
        let contact = mover.collide(&wall).unwrap();
        assert!(contact.collided);
        mover.handle_collision(&contact).unwrap();

        assert!(mover.velocity().unwrap().x < 0.0);
        assert!(mover.x() < 12.0);
    }

    #[test]
    fn test_custom_collision_handler_replaces_response() {
        let mut paddle = Entity::physics(PhysicsBody::default()).with_collision_handler(|e, contact| {
            if contact.collided {
                let v = e.velocity().unwrap_or_default();
                e.set_velocity(Vector2::new(v.x, 0.0))?;
            }
            Ok(())
        });
        paddle.set_velocity(Vector2::new(0.0, 4.0)).unwrap();

        let contact = Contact {
            collided: true,
            edge: Some(Segment::new(Vector2::ZERO, Vector2::new(10.0, 0.0))),
            other_position: Vector2::new(0.0, 5.0),
            other_size: Vector2::ONE,
        };
        paddle.handle_collision(&contact).unwrap();
        assert_eq!(paddle.velocity(), Some(Vector2::ZERO));
        assert_eq!(paddle.position(), Vector2::ZERO);

        // the handler stays installed
        paddle.set_velocity(Vector2::new(0.0, 4.0)).unwrap();
        paddle.handle_collision(&contact).unwrap();
        assert_eq!(paddle.velocity(), Some(Vector2::ZERO));
    }

    #[test]
    fn test_miss_leaves_entity_alone() {
        let mut entity = Entity::physics(PhysicsBody::default());
        entity.set_velocity(Vector2::new(1.0, 0.0)).unwrap();
        entity.finalize();
        let contact = Contact {
            collided: false,
            edge: None,
            other_position: Vector2::new(9.0, 9.0),
            other_size: Vector2::ONE,
        };
        entity.handle_collision(&contact).unwrap();
        assert_eq!(entity.velocity(), Some(Vector2::new(1.0, 0.0)));
        assert!(!entity.is_dirty());
    }

    #[test]
    fn test_movement_from_held_keys() {
        let bindings = InputConfigManager::default();
        let mut entity = keyboard_entity().with_input_handler(InputHandler::Movement { player: 0 });

        entity
            .handle_input(TargetId(0), &InputEvent::KeyDown(KeyCode::KeyS), &bindings, 4.0)
            .unwrap();
        assert_eq!(entity.velocity(), Some(Vector2::new(0.0, 4.0)));

        entity
            .handle_input(TargetId(0), &InputEvent::KeyDown(KeyCode::KeyA), &bindings, 4.0)
            .unwrap();
        assert_eq!(entity.velocity(), Some(Vector2::new(-4.0, 4.0)));

        // opposite keys cancel
        entity
            .handle_input(TargetId(0), &InputEvent::KeyDown(KeyCode::KeyW), &bindings, 4.0)
            .unwrap();
        assert_eq!(entity.velocity(), Some(Vector2::new(-4.0, 0.0)));

        for key in [KeyCode::KeyS, KeyCode::KeyA, KeyCode::KeyW] {
            entity
                .handle_input(TargetId(0), &InputEvent::KeyUp(key), &bindings, 4.0)
                .unwrap();
        }
        assert_eq!(entity.velocity(), Some(Vector2::ZERO));
    }

    #[test]
    fn test_movement_ignores_other_players_keys() {
        let config = InputConfig::from_bindings(0, vec![(KeyCode::KeyD, Direction::Right)]);
        let mut entity = keyboard_entity();
        entity.add_controller(Controller::mouse(TargetId(0)));
        entity
            .handle_input(
                TargetId(0),
                &InputEvent::KeyDown(KeyCode::ArrowRight),
                &InputConfigManager::default(),
                4.0,
            )
            .unwrap();
        entity.movement(&config, 4.0).unwrap();
        assert_eq!(entity.velocity(), Some(Vector2::ZERO));
    }

    #[test]
    fn test_movement_requires_keyboard_and_body() {
        let config = InputConfig::default();

        let mut no_keyboard = Entity::physics(PhysicsBody::default());
        assert!(matches!(
            no_keyboard.movement(&config, 4.0),
            Err(EngineError::TypeMismatch { .. })
        ));

        let mut no_body = Entity::new().with_controller(Controller::keyboard(TargetId(0)));
        assert!(matches!(
            no_body.movement(&config, 4.0),
            Err(EngineError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_custom_input_handler() {
        let bindings = InputConfigManager::default();
        let mut entity = Entity::new()
            .with_controller(Controller::mouse(TargetId(0)))
            .with_input_handler(InputHandler::Custom(Box::new(|e: &mut Entity, event: &InputEvent| {
                if let Some(position) = event.position() {
                    e.set_position(position)?;
                }
                Ok(())
            })));

        let event = InputEvent::Click {
            button: winit::event::MouseButton::Left,
            position: Vector2::new(7.0, 8.0),
        };
        assert!(entity.handle_input(TargetId(0), &event, &bindings, 4.0).unwrap());
        assert_eq!(entity.position(), Vector2::new(7.0, 8.0));

        // a different target never reaches the handler
        let event = InputEvent::Click {
            button: winit::event::MouseButton::Left,
            position: Vector2::new(1.0, 1.0),
        };
        assert!(!entity.handle_input(TargetId(5), &event, &bindings, 4.0).unwrap());
        assert_eq!(entity.position(), Vector2::new(7.0, 8.0));
    }

    #[test]
    fn test_controller_management() {
        let mut entity = Entity::new();
        entity.add_controllers([
            Controller::keyboard(TargetId(0)),
            Controller::mouse(TargetId(0)),
            Controller::keyboard(TargetId(1)),
        ]);
        assert!(entity.keyboard().is_some());

        entity.rebind_controllers(TargetId(9));
        assert!(entity.controllers().iter().all(|c| c.target() == TargetId(9)));

        let removed = entity.remove_controllers(ControllerKind::Keyboard);
        assert_eq!(removed.len(), 2);
        assert_eq!(entity.controllers().len(), 1);
        assert!(entity.keyboard().is_none());
    }
}
