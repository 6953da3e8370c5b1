use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of the next metric value
///
/// The monitor loop only needs this seam; tests swap in scripted sources.
pub trait MetricSource: Send {
    fn next_value(&mut self, previous: f64) -> f64;
}

/// Shape of the random walk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    pub min: f64,
    pub max: f64,
    pub step_min: f64,
    pub step_max: f64,
    pub increase_weight: u32,
    pub decrease_weight: u32,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 0.95,
            step_min: 0.01,
            step_max: 0.04,
            increase_weight: 2,
            decrease_weight: 1,
        }
    }
}

impl WalkParams {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Bounded random walk
///
/// Each step picks a direction (`increase_weight : decrease_weight`), draws a
/// magnitude from `[step_min, step_max]` and clamps the result into `[min, max]`.
#[derive(Debug)]
pub struct MetricSynthesizer<R = StdRng> {
    params: WalkParams,
    rng: R,
}

impl MetricSynthesizer<StdRng> {
    /// Seeded synthesizer, or one seeded from OS entropy when `seed` is `None`
    pub fn new(params: WalkParams, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(params, rng)
    }
}

impl<R: Rng> MetricSynthesizer<R> {
    pub fn with_rng(params: WalkParams, rng: R) -> Self {
        Self { params, rng }
    }

    pub fn next(&mut self, previous: f64) -> f64 {
        let WalkParams {
            step_min,
            step_max,
            increase_weight,
            decrease_weight,
            ..
        } = self.params;

        let total = u64::from(increase_weight) + u64::from(decrease_weight);
        let direction = if total == 0 || self.rng.gen_bool(increase_weight as f64 / total as f64) {
            1.0
        } else {
            -1.0
        };

        let magnitude = if step_min < step_max {
            self.rng.gen_range(step_min..=step_max)
        } else {
            step_min
        };

        self.params.clamp(previous + direction * magnitude)
    }
}

impl<R: Rng + Send> MetricSource for MetricSynthesizer<R> {
    fn next_value(&mut self, previous: f64) -> f64 {
        self.next(previous)
    }
}
