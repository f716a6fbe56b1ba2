use rand::{seq::SliceRandom, Rng};

use crate::{assert_interval, decay::Decay};

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// The exploration rate at time `t`
    pub fn epsilon(&self, t: f32) -> f32 {
        self.epsilon.evaluate(t)
    }

    /// Invoke epsilon greedy policy at time `t`
    pub fn choose<R: Rng + ?Sized>(&self, t: f32, rng: &mut R) -> Choice {
        choose(self.epsilon(t), rng)
    }

    /// Keep `action` or swap it for a uniformly chosen different one, at time `t`
    pub fn perturb<A, R>(&self, action: A, actions: &[A], t: f32, rng: &mut R) -> A
    where
        A: Copy + PartialEq,
        R: Rng + ?Sized,
    {
        explore(action, actions, self.epsilon(t), rng)
    }
}

fn choose<R: Rng + ?Sized>(epsilon: f32, rng: &mut R) -> Choice {
    if rng.gen::<f32>() < 1.0 - epsilon {
        Choice::Exploit
    } else {
        Choice::Explore
    }
}

/// Return `action` with probability `1 - epsilon`, otherwise a uniformly random
/// member of `actions` other than `action`
///
/// Falls back to `action` when `actions` has no alternative.
///
/// **Panics** if `epsilon` is not in the interval `[0,1]`
pub fn explore<A, R>(action: A, actions: &[A], epsilon: f32, rng: &mut R) -> A
where
    A: Copy + PartialEq,
    R: Rng + ?Sized,
{
    assert_interval!(epsilon, 0.0, 1.0);
    match choose(epsilon, rng) {
        Choice::Exploit => action,
        Choice::Explore => {
            let others = actions
                .iter()
                .copied()
                .filter(|&a| a != action)
                .collect::<Vec<_>>();
            others.choose(rng).copied().unwrap_or(action)
        }
    }
}
