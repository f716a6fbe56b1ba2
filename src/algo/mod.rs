pub mod linear;
pub mod sarsa;

pub use linear::{FeatureMap, LinearModel};
pub use sarsa::{Episode, LinearSarsaAgent, LinearSarsaConfig};
