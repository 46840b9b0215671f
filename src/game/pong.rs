// Single-paddle Pong: a background layer and a physics layer with four
// walls, a keyboard paddle and a ball

use std::cell::Cell;
use std::rc::Rc;

use log::info;

use crate::core::Vector2;
use crate::engine::input::{Controller, TargetId};
use crate::engine::physics::{Contact, Freeze, PhysicsBody};
use crate::engine::renderer::Color;
use crate::engine::{
    EngineConfig, EngineError, Entity, EntityId, InputHandler, Layer, RenderStrategy, Scene,
};

pub const BACKGROUND_LAYER: &str = "background";
pub const GROUND_LAYER: &str = "ground";

/// Thickness of the walls placed just outside the playfield
const WALL_THICKNESS: f32 = 50.0;

const PADDLE_X: f32 = 30.0;
const PADDLE_SIZE: Vector2 = Vector2::new(15.0, 150.0);
const BALL_SIZE: Vector2 = Vector2::new(15.0, 15.0);
const BALL_VELOCITY: Vector2 = Vector2::new(-3.0, 0.0);
const BALL_ROTATION: f32 = 1.0;

/// Wall hits on each side. A hit on the left wall is a point for the right.
#[derive(Debug, Clone, Default)]
pub struct Score {
    left: Rc<Cell<u32>>,
    right: Rc<Cell<u32>>,
}

impl Score {
    pub fn left(&self) -> u32 {
        self.left.get()
    }

    pub fn right(&self) -> u32 {
        self.right.get()
    }
}

/// A ready-to-start Pong scene
pub struct Pong {
    pub scene: Scene,
    pub paddle: EntityId,
    pub ball: EntityId,
    pub score: Score,
}

impl Pong {
    /// Build the scene. The paddle listens to keyboard events sent to `target`
    /// and moves with player 0's bindings.
    pub fn new(config: EngineConfig, target: TargetId) -> Result<Self, EngineError> {
        let (width, height) = (config.layer_width as f32, config.layer_height as f32);
        let center = Vector2::new(width / 2.0, height / 2.0);
        let score = Score::default();

        let mut background = Layer::with_pixels(BACKGROUND_LAYER, 0, &config);
        let mut backdrop = Entity::new().with_color(Color::BLACK);
        backdrop.set_position(center)?;
        backdrop.set_scale(Vector2::new(width, height))?;
        background.add(backdrop);

        let mut ground =
            Layer::with_pixels(GROUND_LAYER, 1, &config).with_strategy(RenderStrategy::Physics);

        let half = WALL_THICKNESS / 2.0;
        let left = wall(
            Vector2::new(-half, height / 2.0),
            Vector2::new(WALL_THICKNESS, height),
        )?
        .with_collision_handler(point_for(score.right.clone(), "right"));
        let top = wall(
            Vector2::new(width / 2.0, -half),
            Vector2::new(width, WALL_THICKNESS),
        )?;
        let right = wall(
            Vector2::new(width + half, height / 2.0),
            Vector2::new(WALL_THICKNESS, height),
        )?
        .with_collision_handler(point_for(score.left.clone(), "left"));
        let bottom = wall(
            Vector2::new(width / 2.0, height + half),
            Vector2::new(width, WALL_THICKNESS),
        )?;
        ground.add_all([left, top, right, bottom]);

        let mut paddle = Entity::physics(config.body().with_freeze(Freeze::X))
            .with_color(Color::WHITE)
            .with_controller(Controller::keyboard(target))
            .with_input_handler(InputHandler::Movement { player: 0 })
            .with_collision_handler(|paddle: &mut Entity, contact| {
                match paddle.velocity() {
                    Some(v) if contact.collided => paddle.set_velocity(Vector2::new(v.x, 0.0)),
                    _ => Ok(()),
                }
            });
        paddle.set_position(Vector2::new(PADDLE_X, height / 2.0))?;
        paddle.set_scale(PADDLE_SIZE)?;
        let paddle = ground.add(paddle);

        let mut ball = Entity::physics(config.body()).with_color(Color::WHITE);
        ball.set_position(center)?;
        ball.set_scale(BALL_SIZE)?;
        ball.set_velocity(BALL_VELOCITY)?;
        ball.set_rotation(BALL_ROTATION)?;
        let ball = ground.add(ball);

        let mut scene = Scene::with_config(config);
        scene.add_layers([background, ground]);

        Ok(Self {
            scene,
            paddle,
            ball,
            score,
        })
    }

    pub fn paddle(&self) -> Option<&Entity> {
        self.scene.layer(GROUND_LAYER)?.get(self.paddle)
    }

    pub fn ball(&self) -> Option<&Entity> {
        self.scene.layer(GROUND_LAYER)?.get(self.ball)
    }

    pub fn ball_mut(&mut self) -> Option<&mut Entity> {
        self.scene.layer_mut(GROUND_LAYER)?.get_mut(self.ball)
    }

    pub fn paddle_mut(&mut self) -> Option<&mut Entity> {
        self.scene.layer_mut(GROUND_LAYER)?.get_mut(self.paddle)
    }
}

/// A body that never moves
fn wall(position: Vector2, size: Vector2) -> Result<Entity, EngineError> {
    let mut wall = Entity::physics(PhysicsBody::default().with_freeze(Freeze::BOTH));
    wall.set_position(position)?;
    wall.set_scale(size)?;
    Ok(wall)
}

fn point_for(
    tally: Rc<Cell<u32>>,
    side: &'static str,
) -> impl FnMut(&mut Entity, &Contact) -> Result<(), EngineError> {
    move |_: &mut Entity, contact: &Contact| {
        if contact.collided {
            tally.set(tally.get() + 1);
            info!("{} wins", side);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::InputEvent;
    use crate::engine::ManualScheduler;
    use image::Rgba;
    use winit::keyboard::KeyCode;

    const TARGET: TargetId = TargetId(7);

    fn pong() -> Pong {
        Pong::new(EngineConfig::default(), TARGET).unwrap()
    }

    #[test]
    fn test_scene_layout() {
        let pong = pong();
        let names: Vec<_> = pong.scene.layers().iter().map(Layer::name).collect();
        assert_eq!(names, vec![BACKGROUND_LAYER, GROUND_LAYER]);
        assert_eq!(pong.scene.layer(GROUND_LAYER).unwrap().len(), 6);

        let ball = pong.ball().unwrap();
        assert_eq!(ball.position(), Vector2::new(320.0, 240.0));
        assert_eq!(ball.velocity(), Some(BALL_VELOCITY));
        assert_eq!(ball.rotation(), 1.0);

        let paddle = pong.paddle().unwrap();
        assert_eq!(paddle.position(), Vector2::new(30.0, 240.0));
        assert_eq!(paddle.body().unwrap().freeze, Freeze::X);
    }

    #[test]
    fn test_ball_bounces_off_paddle() {
        let mut pong = pong();
        let mut scheduler = ManualScheduler::new();
        pong.scene.start(&mut scheduler);

        let mut bounced = false;
        for _ in 0..150 {
            scheduler.advance(&mut pong.scene);
            let ball = pong.ball().unwrap();
            assert!(ball.x() > 0.0, "ball got past the paddle");
            if ball.velocity().unwrap().x > 0.0 {
                bounced = true;
                break;
            }
        }
        assert!(bounced);
        assert_eq!(pong.paddle().unwrap().x(), PADDLE_X);
        assert_eq!((pong.score.left(), pong.score.right()), (0, 0));
    }

    #[test]
    fn test_left_wall_scores_for_right() {
        let mut pong = pong();
        pong.ball_mut()
            .unwrap()
            .set_position(Vector2::new(5.0, 240.0))
            .unwrap();
        pong.scene.render();
        assert!(pong.score.right() > 0);
        assert_eq!(pong.score.left(), 0);
    }

    #[test]
    fn test_paddle_moves_with_keys() {
        let mut pong = pong();
        let consumed = pong.scene.dispatch(TARGET, &InputEvent::KeyDown(KeyCode::KeyS));
        assert_eq!(consumed, 1);
        pong.scene.render();
        assert_eq!(pong.paddle().unwrap().position(), Vector2::new(30.0, 244.0));

        pong.scene.dispatch(TARGET, &InputEvent::KeyUp(KeyCode::KeyS));
        pong.scene.render();
        assert_eq!(pong.paddle().unwrap().y(), 244.0);

        // other windows do not steer the paddle
        assert_eq!(
            pong.scene.dispatch(TargetId(8), &InputEvent::KeyDown(KeyCode::KeyW)),
            0
        );
    }

    #[test]
    fn test_paddle_stops_at_wall() {
        let mut pong = pong();
        pong.paddle_mut()
            .unwrap()
            .set_position(Vector2::new(PADDLE_X, 404.0))
            .unwrap();
        pong.scene.dispatch(TARGET, &InputEvent::KeyDown(KeyCode::KeyS));

        for _ in 0..5 {
            pong.scene.render();
        }
        let paddle = pong.paddle().unwrap();
        assert_eq!(paddle.y(), 408.0);
        assert_eq!(paddle.velocity(), Some(Vector2::ZERO));
    }

    #[test]
    fn test_composite_shows_ball_on_black() {
        let mut pong = pong();
        pong.scene.render();
        let image = pong.scene.composite().unwrap();
        assert_eq!(image.dimensions(), (640, 480));
        assert_eq!(*image.get_pixel(600, 100), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(317, 240), Rgba([255, 255, 255, 255]));
    }
}
