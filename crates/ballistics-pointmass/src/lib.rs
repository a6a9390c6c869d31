//! ballistics-pointmass
//!
//! Flat-fire point-mass solver in the classic table units (ft, ft/s, in, mph).
//! - Drag comes from a standard G-function via `ballistics-models`.
//! - Adaptive time step `dt = step / |v|`, so every step covers roughly the
//!   same distance whatever the projectile speed.
//! - Trapezoidal position update from the old and new velocity.
//! - Zero-angle and point-blank-range solvers share one step-halving search.
//!
//! Conventions:
//! - x downrange along the bore line, y up; the line of sight starts
//!   `sight_height` above the bore.
//! - Angles are degrees at the API boundary, radians inside.
//!
//! Entry points:
//!   - [`compute_trajectory`] for a per-yard table at a known zero angle
//!   - [`solve_zero_angle`] for the bore angle that zeros the sight
//!   - [`solve_point_blank_range`] for the maximum point-blank range

use ballistics_models::{DragError, DragFunction};
use ballistics_core::Atmosphere;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod flight;
pub mod pbr;
pub mod search;
pub mod trajectory;
pub mod zero;

pub use ballistics_core::Wind;
pub use pbr::{solve_point_blank_range, PbrResult, PbrStatus};
pub use search::{SearchOutcome, StepSearch};
pub use trajectory::{compute_trajectory, zeroed_trajectory, Sample, Trajectory};
pub use zero::solve_zero_angle;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum SolveError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error(transparent)]
    Drag(#[from] DragError),
    /// No elevation up to 45° puts the shot on the intercept at the zero
    /// range.
    #[error("no zero found below 45° of elevation (search stopped at {last_angle_deg:.4}°)")]
    NoZero { last_angle_deg: f64 },
}

/// A cartridge as fired from a particular rifle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Load {
    pub drag_function: DragFunction,
    /// Drag coefficient for `drag_function`.
    pub drag_coefficient: f64,
    pub muzzle_velocity_fps: f64,
    /// Height of the sight line above the bore centerline [in].
    pub sight_height_in: f64,
}

impl Load {
    pub fn new(
        drag_function: DragFunction,
        drag_coefficient: f64,
        muzzle_velocity_fps: f64,
        sight_height_in: f64,
    ) -> Self {
        Self { drag_function, drag_coefficient, muzzle_velocity_fps, sight_height_in }
    }

    /// The same load with its drag coefficient corrected for `atmos`.
    #[must_use]
    pub fn in_atmosphere(self, atmos: &Atmosphere) -> Self {
        Self { drag_coefficient: atmos.correct(self.drag_coefficient), ..self }
    }

    fn validate(&self) -> Result<(), SolveError> {
        if !self.drag_function.is_supported() {
            return Err(DragError::Unsupported(self.drag_function).into());
        }
        if !(self.drag_coefficient.is_finite() && self.drag_coefficient > 0.0) {
            return Err(SolveError::InvalidInput("drag coefficient must be positive"));
        }
        if !(self.muzzle_velocity_fps.is_finite() && self.muzzle_velocity_fps > 0.0) {
            return Err(SolveError::InvalidInput("muzzle velocity must be positive"));
        }
        if !self.sight_height_in.is_finite() {
            return Err(SolveError::InvalidInput("sight height must be finite"));
        }
        Ok(())
    }
}

/* ----------------------------------- tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_bad_loads() {
        let good = Load::new(DragFunction::G1, 0.5, 2800.0, 1.5);
        assert!(good.validate().is_ok());

        let slow = Load { muzzle_velocity_fps: 0.0, ..good };
        assert!(matches!(slow.validate(), Err(SolveError::InvalidInput(_))));

        let no_drag = Load { drag_coefficient: -0.1, ..good };
        assert!(matches!(no_drag.validate(), Err(SolveError::InvalidInput(_))));

        let nan_sight = Load { sight_height_in: f64::NAN, ..good };
        assert!(matches!(nan_sight.validate(), Err(SolveError::InvalidInput(_))));

        let g3 = Load { drag_function: DragFunction::G3, ..good };
        assert_eq!(g3.validate(), Err(SolveError::Drag(DragError::Unsupported(DragFunction::G3))));
    }

    #[test]
    fn atmosphere_only_touches_the_coefficient() {
        let load = Load::new(DragFunction::G7, 0.3, 2700.0, 1.8);
        let high = Atmosphere { altitude_ft: 6000.0, barometer_inhg: 29.53, temperature_f: 37.4, relative_humidity: 0.2 };
        let corrected = load.in_atmosphere(&high);
        assert!(corrected.drag_coefficient > load.drag_coefficient);
        assert_eq!(corrected.muzzle_velocity_fps, load.muzzle_velocity_fps);
        assert_eq!(corrected.drag_function, load.drag_function);
    }
}
