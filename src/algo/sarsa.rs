use std::marker::PhantomData;

use burn::{config::Config, prelude::*};
use log::{info, trace};
use rand::rngs::StdRng;

use crate::{
    algo::linear::{FeatureMap, LinearModel},
    assert_interval,
    decay::{self, Decay, Temperature},
    env::{DiscreteActionSpace, Environment},
    exploration::EpsilonGreedy,
};

/// Configuration for the [`LinearSarsaAgent`]
///
/// Both the exploration rate and the learning rate are divided by a temperature that starts
/// at `temperature_start` and grows by `temperature_increment` every `temperature_interval`
/// episodes. The first action of each episode is sampled with the undecayed `start_epsilon`.
#[derive(Config, Debug)]
pub struct LinearSarsaConfig {
    /// Number of episodes run by [`LinearSarsaAgent::train`]
    #[config(default = 20000)]
    pub episodes: usize,
    /// The discount factor
    #[config(default = 0.9)]
    pub gamma: f32,
    /// The learning rate at temperature 1
    #[config(default = 0.01)]
    pub learning_rate: f32,
    /// Exploration rate for the first action of an episode
    #[config(default = 0.3)]
    pub start_epsilon: f32,
    /// Exploration rate at temperature 1 for every later action
    #[config(default = 0.3)]
    pub epsilon: f32,
    #[config(default = 1.0)]
    pub temperature_start: f32,
    #[config(default = 0.001)]
    pub temperature_increment: f32,
    #[config(default = 100)]
    pub temperature_interval: usize,
    /// Standard deviation of the initial weights
    #[config(default = 0.2)]
    pub init_std: f32,
    /// Log progress every this many episodes, never if zero
    #[config(default = 1000)]
    pub log_interval: usize,
}

/// Summary of a single training episode
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Episode {
    pub steps: usize,
    pub reward: f32,
}

/// An on-policy SARSA agent with a linear action-value approximator
///
/// ### Generics
/// - `B` - A burn backend holding the weights
/// - `F` - The [`FeatureMap`] over the environment's states and actions
/// - `E` - The [`Environment`] in which the agent will learn
///     - Every action of the action space is considered in every state, so actions
///       that have no effect in a state are still explored and valued
pub struct LinearSarsaAgent<B, F, E>
where
    B: Backend,
    E: Environment + DiscreteActionSpace,
    E::State: Copy,
    E::Action: Copy + PartialEq,
    F: FeatureMap<State = E::State, Action = E::Action>,
{
    model: LinearModel<B, F>,
    start_exploration: EpsilonGreedy<decay::Constant>,
    exploration: EpsilonGreedy<decay::Reciprocal>,
    learning_rate: decay::Reciprocal,
    temperature: Temperature,
    gamma: f32,      // discount factor
    episodes: usize, // episodes per training run
    log_interval: usize,
    episode: usize,  // current episode
    rng: StdRng,
    phantom: PhantomData<E>,
}

impl<B, F, E> LinearSarsaAgent<B, F, E>
where
    B: Backend,
    E: Environment + DiscreteActionSpace,
    E::State: Copy,
    E::Action: Copy + PartialEq,
    F: FeatureMap<State = E::State, Action = E::Action>,
{
    /// Initialize a new `LinearSarsaAgent`
    ///
    /// ### Arguments
    /// - `features` The feature map of the linear model
    /// - `config` Hyperparameters of the agent
    /// - `rng` The random source for weight initialization and exploration
    /// - `device` The device holding the weights
    ///
    /// **Panics** if `gamma` or either exploration rate is not in the interval `[0,1]`, or if
    /// `temperature_start` is below 1
    pub fn new(
        features: F,
        config: &LinearSarsaConfig,
        mut rng: StdRng,
        device: &B::Device,
    ) -> Self {
        assert_interval!(config.gamma, 0.0, 1.0);
        assert_interval!(config.start_epsilon, 0.0, 1.0);
        assert_interval!(config.epsilon, 0.0, 1.0);
        assert!(config.learning_rate > 0.0, "Learning rate must be positive.");

        let model = LinearModel::new(features, config.init_std, &mut rng, device);
        Self {
            model,
            start_exploration: EpsilonGreedy::new(decay::Constant::new(config.start_epsilon)),
            exploration: EpsilonGreedy::new(decay::Reciprocal::new(config.epsilon)),
            learning_rate: decay::Reciprocal::new(config.learning_rate),
            temperature: Temperature::new(
                config.temperature_start,
                config.temperature_increment,
                config.temperature_interval,
            ),
            gamma: config.gamma,
            episodes: config.episodes,
            log_interval: config.log_interval,
            episode: 0,
            rng,
            phantom: PhantomData,
        }
    }

    pub fn model(&self) -> &LinearModel<B, F> {
        &self.model
    }

    /// Current temperature of the learning schedule
    pub fn temperature(&self) -> f32 {
        self.temperature.value()
    }

    /// Number of episodes run so far
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Greedy action and its estimated value for each of `states`
    pub fn policy(
        &self,
        states: &[E::State],
        actions: &[E::Action],
    ) -> Vec<(E::State, E::Action, f32)> {
        states
            .iter()
            .map(|s| {
                let (a, v) = self.model.greedy(s, actions);
                (*s, a, v)
            })
            .collect()
    }

    /// Run a single episode, updating the weights after every step
    pub fn go(&mut self, env: &mut E) -> Episode {
        let t = self.temperature.advance(self.episode);
        let alpha = self.learning_rate.evaluate(t);
        let actions = env.actions();

        let mut state = env.reset();
        let (greedy, _) = self.model.greedy(&state, &actions);
        let mut action = self
            .start_exploration
            .perturb(greedy, &actions, t, &mut self.rng);

        let mut summary = Episode::default();
        while env.is_active() {
            let (next_state, reward) = env.step(action);
            summary.steps += 1;
            summary.reward += reward;

            let next = next_state.map(|s| {
                let (greedy, _) = self.model.greedy(&s, &actions);
                let a = self.exploration.perturb(greedy, &actions, t, &mut self.rng);
                (s, a)
            });

            // The target is held fixed; only the estimate of (state, action) is differentiated
            let target = match next {
                Some((s, a)) => reward + self.gamma * self.model.predict(&s, &a),
                None => reward,
            };
            let td_error = target - self.model.predict(&state, &action);
            self.model.update(&state, &action, alpha * td_error);
            trace!("step {} td error {td_error:.5}", summary.steps);

            match next {
                Some((s, a)) => (state, action) = (s, a),
                None => break,
            }
        }

        self.episode += 1;
        if self.log_interval > 0 && self.episode % self.log_interval == 0 {
            info!(
                "episode {} | t {:.3} | epsilon {:.4} | alpha {:.5} | steps {} | return {:.2}",
                self.episode,
                t,
                self.exploration.epsilon(t),
                alpha,
                summary.steps,
                summary.reward,
            );
        }

        summary
    }

    /// Run the configured number of episodes
    pub fn train(&mut self, env: &mut E) -> Vec<Episode> {
        (0..self.episodes).map(|_| self.go(env)).collect()
    }
}
