/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f32) -> f32 {
        self.value
    }
}

/// v(t) = v / t
///
/// Meant to be evaluated at a [`Temperature`], which never drops below its starting value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reciprocal {
    value: f32,
}

impl Reciprocal {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Reciprocal {
    fn evaluate(&self, t: f32) -> f32 {
        self.value / t
    }
}

/// A monotonically increasing training temperature
///
/// Bumped by `increment` on every episode whose index is a multiple of `interval`,
/// including episode 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Temperature {
    value: f32,
    increment: f32,
    interval: usize,
}

impl Temperature {
    /// **Panics** if `start` is below 1, `increment` is negative, or `interval` is zero
    pub fn new(start: f32, increment: f32, interval: usize) -> Self {
        assert!(start >= 1.0, "Temperature must start at 1 or above.");
        assert!(increment >= 0.0, "Temperature increment must not be negative.");
        assert!(interval > 0, "Temperature interval must be at least one episode.");
        Self {
            value: start,
            increment,
            interval,
        }
    }

    /// Current temperature
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advance the schedule at the start of `episode`
    pub fn advance(&mut self, episode: usize) -> f32 {
        if episode % self.interval == 0 {
            self.value += self.increment;
        }
        self.value
    }
}
