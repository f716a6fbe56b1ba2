use burn::{prelude::*, tensor::ElementConversion};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::util::argmax;

/// Maps a state-action pair to a fixed-length feature vector
pub trait FeatureMap {
    type State;
    type Action;

    /// Length of every vector produced by [`features`](FeatureMap::features)
    fn len(&self) -> usize;

    /// Compute the features of taking `action` in `state`
    fn features(&self, state: &Self::State, action: &Self::Action) -> Vec<f32>;
}

/// A linear action-value approximator: `q(s, a) = w · x(s, a)`
///
/// The weights live in a burn tensor; the feature map is recomputed for every prediction.
pub struct LinearModel<B: Backend, F: FeatureMap> {
    weights: Tensor<B, 1>,
    features: F,
    device: B::Device,
}

impl<B: Backend, F: FeatureMap> LinearModel<B, F> {
    /// Initialize weights from `Normal(0, init_std)` using the provided random source
    ///
    /// **Panics** if `init_std` is negative or not finite
    pub fn new<R: Rng + ?Sized>(
        features: F,
        init_std: f32,
        rng: &mut R,
        device: &B::Device,
    ) -> Self {
        let normal =
            Normal::new(0.0, init_std).expect("`init_std` must be finite and non-negative");
        let mut weights = Vec::with_capacity(features.len());
        for _ in 0..features.len() {
            weights.push(normal.sample(rng));
        }
        Self::from_weights(features, &weights, device)
    }

    /// Build a model with the given weights
    ///
    /// **Panics** if the weight count doesn't match the feature length
    pub fn from_weights(features: F, weights: &[f32], device: &B::Device) -> Self {
        assert_eq!(
            weights.len(),
            features.len(),
            "Weight count must match the feature length."
        );
        Self {
            weights: Tensor::from_floats(weights, device),
            features,
            device: device.clone(),
        }
    }

    /// Snapshot of the current weights
    pub fn weights(&self) -> Vec<f32> {
        self.weights.clone().into_data().convert::<f32>().value
    }

    pub fn feature_map(&self) -> &F {
        &self.features
    }

    fn to_tensor(&self, x: &[f32]) -> Tensor<B, 1> {
        Tensor::from_floats(x, &self.device)
    }

    /// Estimated value of taking `action` in `state`
    pub fn predict(&self, state: &F::State, action: &F::Action) -> f32 {
        let x = self.to_tensor(&self.features.features(state, action));
        self.weights
            .clone()
            .mul(x)
            .sum()
            .into_scalar()
            .elem::<f32>()
    }

    /// Estimated values of every action in `actions`, in the same order
    pub fn q_values(&self, state: &F::State, actions: &[F::Action]) -> Vec<f32> {
        let len = self.features.len();
        let rows = actions
            .iter()
            .flat_map(|a| self.features.features(state, a))
            .collect::<Vec<_>>();
        let x: Tensor<B, 2> = self.to_tensor(&rows).reshape([-1, len as i32]);
        let w: Tensor<B, 2> = self.weights.clone().unsqueeze_dim(1);
        x.matmul(w).into_data().convert::<f32>().value
    }

    /// The action with the highest estimated value and that value
    ///
    /// Ties go to the action listed first. **Panics** if `actions` is empty.
    pub fn greedy(&self, state: &F::State, actions: &[F::Action]) -> (F::Action, f32)
    where
        F::Action: Copy,
    {
        let q = self.q_values(state, actions);
        let (i, value) = argmax(&q).expect("There is always at least one action available");
        (actions[i], value)
    }

    /// Move the weights along the features of `(state, action)`: `w += step * x(s, a)`
    pub fn update(&mut self, state: &F::State, action: &F::Action, step: f32) {
        let x = self.to_tensor(&self.features.features(state, action));
        self.weights = self.weights.clone() + x.mul_scalar(step);
    }
}
