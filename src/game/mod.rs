// Demo scenes built on the engine

pub mod pong;

pub use pong::{Pong, Score};
