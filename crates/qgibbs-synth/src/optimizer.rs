//! First-order minimization for the variational synthesizer.

use serde::{Deserialize, Serialize};

/// Where a minimization ended up.
#[derive(Debug, Clone)]
pub struct Minimum {
    /// Lowest-cost parameters seen, not necessarily the last iterate.
    pub params: Vec<f64>,
    /// Cost at `params`.
    pub value: f64,
    /// Update steps taken.
    pub steps: usize,
    /// Cost evaluations, the starting point included.
    pub evaluations: usize,
    /// Cost after every evaluation.
    pub trace: Vec<f64>,
    /// Whether a stopping tolerance was met before `max_steps` ran out.
    pub converged: bool,
}

/// Running first and second moment estimates.
struct Moments {
    mean: Vec<f64>,
    square: Vec<f64>,
}

impl Moments {
    fn zeros(len: usize) -> Self {
        Self {
            mean: vec![0.0; len],
            square: vec![0.0; len],
        }
    }
}

/// Adam with bias-corrected moments.
///
/// Stops early once the cost reaches `tol` or the gradient norm drops to
/// `gtol`.
///
/// ```rust
/// use qgibbs_synth::Adam;
///
/// let adam = Adam::new().max_steps(500).learning_rate(0.1);
/// let min = adam.minimize(|x| ((x[0] - 3.0).powi(2), vec![2.0 * (x[0] - 3.0)]), vec![0.0]);
/// assert!((min.params[0] - 3.0).abs() < 0.05);
/// assert_eq!(min.trace.len(), min.steps + 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adam {
    /// Update steps before giving up.
    pub max_steps: usize,
    /// Step size.
    pub learning_rate: f64,
    /// Decay rate of the gradient mean.
    pub beta1: f64,
    /// Decay rate of the squared gradient mean.
    pub beta2: f64,
    /// Added to the step denominator to keep it away from zero.
    pub epsilon: f64,
    /// Cost low enough to stop.
    pub tol: f64,
    /// Gradient norm small enough to stop.
    pub gtol: f64,
}

impl Default for Adam {
    fn default() -> Self {
        Self {
            max_steps: 200,
            learning_rate: 0.05,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            tol: 1e-8,
            gtol: 1e-10,
        }
    }
}

impl Adam {
    /// Default settings: 200 steps at rate 0.05.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the step cap.
    #[must_use]
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Replace the step size.
    #[must_use]
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Replace the stopping cost.
    #[must_use]
    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    fn done(&self, value: f64, gradient: &[f64]) -> bool {
        value <= self.tol || gradient.iter().map(|g| g * g).sum::<f64>().sqrt() <= self.gtol
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn update(&self, step: usize, moments: &mut Moments, params: &mut [f64], gradient: &[f64]) {
        let mean_scale = 1.0 / (1.0 - self.beta1.powi(step as i32));
        let square_scale = 1.0 / (1.0 - self.beta2.powi(step as i32));
        let rows = params
            .iter_mut()
            .zip(gradient)
            .zip(moments.mean.iter_mut().zip(moments.square.iter_mut()));
        for ((p, &g), (m, s)) in rows {
            *m = self.beta1 * *m + (1.0 - self.beta1) * g;
            *s = self.beta2 * *s + (1.0 - self.beta2) * g * g;
            *p -= self.learning_rate * (*m * mean_scale) / ((*s * square_scale).sqrt() + self.epsilon);
        }
    }

    /// Minimize `cost`, which returns its value and gradient at a point.
    pub fn minimize<F>(&self, mut cost: F, start: Vec<f64>) -> Minimum
    where
        F: FnMut(&[f64]) -> (f64, Vec<f64>),
    {
        let mut params = start;
        let mut moments = Moments::zeros(params.len());
        let (mut value, mut gradient) = cost(&params);
        let mut trace = vec![value];
        let mut best = (value, params.clone());
        let mut steps = 0;

        while steps < self.max_steps && !self.done(value, &gradient) {
            steps += 1;
            self.update(steps, &mut moments, &mut params, &gradient);
            (value, gradient) = cost(&params);
            trace.push(value);
            if value < best.0 {
                best = (value, params.clone());
            }
        }

        let converged = self.done(value, &gradient) || best.0 <= self.tol;
        Minimum {
            params: best.1,
            value: best.0,
            steps,
            evaluations: trace.len(),
            trace,
            converged,
        }
    }
}
