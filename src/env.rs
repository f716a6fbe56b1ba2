use std::{
    collections::{btree_map::Entry, BTreeMap},
    ops::Index,
};

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Determine if the state is active or terminal
    fn is_active(&self) -> bool;

    /// Update the environment in response to a an action taken by an agent, producing a new state and associated reward
    ///
    /// **Returns** `(next_state, reward)`, where `next_state` is `None` if the new state is terminal
    fn step(&mut self, action: Self::Action) -> (Option<Self::State>, f32);

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;
}

/// An environment with a finite, enumerable action space
pub trait DiscreteActionSpace: Environment {
    /// Get every action in the action space, in a fixed order
    ///
    /// This is the whole space, not only the actions that have an effect in the current state.
    fn actions(&self) -> Vec<Self::Action>;
}

/// Named numeric statistics accumulated by an environment over one episode
#[derive(Debug, Clone)]
pub struct Report {
    keys: Vec<&'static str>,
    values: BTreeMap<&'static str, f64>,
}

impl Report {
    /// Create a report tracking `keys`, all starting at zero
    pub fn new(keys: Vec<&'static str>) -> Self {
        let values = keys.iter().map(|&k| (k, 0.0)).collect();
        Self { keys, values }
    }

    /// The tracked keys, in the order they were given
    pub fn keys(&self) -> &[&'static str] {
        &self.keys
    }

    /// Access the entry for `key` to modify it in place
    pub fn entry(&mut self, key: &'static str) -> Entry<'_, &'static str, f64> {
        self.values.entry(key)
    }

    /// Take the accumulated values and reset every key to zero
    pub fn take(&mut self) -> BTreeMap<&'static str, f64> {
        let fresh = self.keys.iter().map(|&k| (k, 0.0)).collect();
        std::mem::replace(&mut self.values, fresh)
    }
}

impl Index<&str> for Report {
    type Output = f64;

    fn index(&self, key: &str) -> &Self::Output {
        &self.values[key]
    }
}
