//! Damped, sign-reversing step search over one scalar.
//!
//! Starting from `start`, the value moves by `step` after every probe. The
//! probe reports where the current value lands relative to the target:
//! `Greater` (overshoot) while stepping up, or `Less` while stepping down,
//! reverses the direction and halves the step. The search stops once the
//! step shrinks below `tolerance`, or fails once the value has passed
//! `upper_limit` or `max_iterations` probes were spent.
//!
//! This is not bisection: no bracket is kept, and the step only shrinks when
//! the error changes sign, so the first few probes cover large launch angles
//! quickly.

use std::cmp::Ordering;

use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepSearch {
    pub start: f64,
    pub initial_step: f64,
    pub tolerance: f64,
    /// Give up once a probed value exceeds this.
    pub upper_limit: Option<f64>,
    pub max_iterations: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchOutcome {
    Converged { value: f64, iterations: usize },
    /// Stopped by `upper_limit` or `max_iterations`; `value` is the last one held.
    Exhausted { value: f64, iterations: usize },
}

impl SearchOutcome {
    pub fn value(&self) -> f64 {
        match *self {
            SearchOutcome::Converged { value, .. } | SearchOutcome::Exhausted { value, .. } => value,
        }
    }

    pub fn iterations(&self) -> usize {
        match *self {
            SearchOutcome::Converged { iterations, .. } | SearchOutcome::Exhausted { iterations, .. } => iterations,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, SearchOutcome::Converged { .. })
    }
}

impl StepSearch {
    pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

    pub fn new(start: f64, initial_step: f64, tolerance: f64) -> Self {
        Self {
            start,
            initial_step,
            tolerance,
            upper_limit: None,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }

    #[must_use]
    pub fn with_upper_limit(self, limit: f64) -> Self {
        Self { upper_limit: Some(limit), ..self }
    }

    #[must_use]
    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self { max_iterations, ..self }
    }

    /// Drive the search with `probe`. Errors from the probe end the search
    /// immediately and are handed back unchanged.
    ///
    /// The step applied after the final probe is kept, so the returned value
    /// is one (sub-tolerance) step past the last probed one.
    pub fn run<E, F>(&self, mut probe: F) -> Result<SearchOutcome, E>
    where
        F: FnMut(f64) -> Result<Ordering, E>,
    {
        let mut value = self.start;
        let mut step = self.initial_step;

        for iteration in 1..=self.max_iterations {
            match probe(value)? {
                Ordering::Greater if step > 0.0 => step = -step / 2.0,
                Ordering::Less if step < 0.0 => step = -step / 2.0,
                _ => {}
            }

            let converged = step.abs() < self.tolerance;
            let beyond = self.upper_limit.is_some_and(|limit| value > limit);
            value += step;
            trace!(iteration, value, step, "step search");

            if converged {
                return Ok(SearchOutcome::Converged { value, iterations: iteration });
            }
            if beyond {
                return Ok(SearchOutcome::Exhausted { value, iterations: iteration });
            }
        }

        Ok(SearchOutcome::Exhausted { value, iterations: self.max_iterations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::convert::Infallible;

    fn against(target: f64) -> impl FnMut(f64) -> Result<Ordering, Infallible> {
        move |v| Ok(v.partial_cmp(&target).unwrap_or(Ordering::Equal))
    }

    #[test]
    fn finds_a_root_of_a_monotonic_signal() {
        let search = StepSearch::new(0.0, 14.0, 1e-6);
        let out = search.run(against(3.217)).unwrap();
        assert!(out.is_converged());
        assert_abs_diff_eq!(out.value(), 3.217, epsilon = 1e-5);
    }

    #[test]
    fn first_probe_is_the_start_value() {
        let mut seen = Vec::new();
        let search = StepSearch::new(1.0, 1.0, 0.1).with_max_iterations(3);
        search
            .run(|v| {
                seen.push(v);
                Ok::<_, Infallible>(Ordering::Greater)
            })
            .unwrap();
        // overshoot at 1 flips the step to -0.5; later overshoots keep it
        assert_eq!(seen[0], 1.0);
        assert_eq!(seen[1], 0.5);
        assert_eq!(seen[2], 0.0);
    }

    #[test]
    fn only_sign_changes_shrink_the_step() {
        // a signal that is always "too low" walks up in constant steps
        let search = StepSearch::new(0.0, 2.0, 0.01).with_upper_limit(7.0);
        let mut probes = Vec::new();
        let out = search
            .run(|v| {
                probes.push(v);
                Ok::<_, Infallible>(Ordering::Less)
            })
            .unwrap();
        assert_eq!(probes, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
        assert_eq!(out, SearchOutcome::Exhausted { value: 10.0, iterations: 5 });
    }

    #[test]
    fn equal_leaves_the_step_alone() {
        let search = StepSearch::new(0.0, 1.0, 0.1).with_max_iterations(3);
        let out = search.run(|_| Ok::<_, Infallible>(Ordering::Equal)).unwrap();
        assert_eq!(out, SearchOutcome::Exhausted { value: 3.0, iterations: 3 });
    }

    #[test]
    fn probe_errors_stop_the_search() {
        let search = StepSearch::new(0.0, 1.0, 0.1);
        let mut calls = 0;
        let out = search.run(|v| {
            calls += 1;
            if v >= 2.0 { Err("boom") } else { Ok(Ordering::Less) }
        });
        assert_eq!(out, Err("boom"));
        assert_eq!(calls, 3);
    }

    #[test]
    fn convergence_wins_over_the_limit() {
        // overshoot on the very first probe beyond the limit still converges
        // when the halved step is already below tolerance
        let search = StepSearch::new(10.0, 0.15, 0.1).with_upper_limit(5.0);
        let out = search.run(against(0.0)).unwrap();
        assert_eq!(out, SearchOutcome::Converged { value: 9.925, iterations: 1 });
    }
}
