/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Exploration policies
pub mod exploration;

/// Grid world environment and its features
pub mod gym;

/// Text rendering of learned values and policies
pub mod viz;

mod util;
