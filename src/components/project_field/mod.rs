mod color;
mod component;
mod forces;
mod geometry;
mod interaction;
mod physics;
mod registry;
mod render;
pub mod scale;
mod state;
mod types;

pub use component::ProjectField;
