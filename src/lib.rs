//! A small 2D scene engine.
//!
//! A [`Scene`](engine::Scene) holds layers, each layer holds entities drawn
//! onto its own surface. Physics layers also move their entities and bounce
//! them off each other. `game::pong` builds the demo scene on top.

pub mod core;
pub mod engine;
pub mod game;
