pub mod grid_features;
pub mod grid_world;

pub use grid_features::{BasisConfig, GridFeatures};
pub use grid_world::{Action, GridError, GridWorld, Pos};
