//! Forward integration of a single shot into a per-yard table.

use std::ops::Index;

use ballistics_core::{deg_to_rad, rad_to_moa, windage, Wind, MAX_YARDS};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::flight::{Flight, Forces};
use crate::{solve_zero_angle, Load, SolveError};

/// Path length per integration step [ft].
const STEP_FT: f64 = 0.5;

/// One row of the table, taken as the projectile crosses a whole yard.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    pub range_yards: usize,
    /// Height relative to the line of sight [in], negative is below.
    pub path_inches: f64,
    /// Sight correction that brings the point of aim onto the path [MOA].
    pub moa_correction: f64,
    pub seconds: f64,
    pub windage_inches: f64,
    pub windage_moa: f64,
    pub v_fps: f64,
    pub vx_fps: f64,
    pub vy_fps: f64,
}

/// Samples indexed by whole yards: `samples[i].range_yards == i`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trajectory {
    samples: Vec<Sample>,
}

impl Trajectory {
    /// Number of yards reached before the run ended.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, yards: usize) -> Option<&Sample> {
        self.samples.get(yards)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Rows at the requested yardages; ranges past the end are skipped.
    pub fn at_ranges(&self, ranges_yards: &[usize]) -> Vec<Sample> {
        ranges_yards.iter().filter_map(|&r| self.get(r).copied()).collect()
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

impl Index<usize> for Trajectory {
    type Output = Sample;

    fn index(&self, yards: usize) -> &Sample {
        &self.samples[yards]
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Integrate one shot and sample it at every whole yard.
///
/// The run ends when the flight turns steeper than 3:1 or after
/// 50 000 yards. A very short table therefore signals unusable inputs.
///
/// # Arguments
/// * `load` - projectile and sight
/// * `shooting_angle_deg` - slope of the line of sight, uphill positive
/// * `zero_angle_deg` - bore angle relative to the sight line, see [`solve_zero_angle`]
/// * `wind` - wind at the firing point
pub fn compute_trajectory(
    load: &Load,
    shooting_angle_deg: f64,
    zero_angle_deg: f64,
    wind: Wind,
) -> Result<Trajectory, SolveError> {
    load.validate()?;
    if !(shooting_angle_deg.is_finite() && zero_angle_deg.is_finite()) {
        return Err(SolveError::InvalidInput("angles must be finite"));
    }
    if !(wind.speed_mph.is_finite() && wind.angle_deg.is_finite()) {
        return Err(SolveError::InvalidInput("wind must be finite"));
    }

    let vi = load.muzzle_velocity_fps;
    let headwind = wind.headwind();
    let crosswind = wind.crosswind();

    let forces = Forces::new(
        load.drag_function,
        load.drag_coefficient,
        deg_to_rad(shooting_angle_deg + zero_angle_deg),
        headwind,
    );
    let mut flight = Flight::launch(vi, deg_to_rad(zero_angle_deg), load.sight_height_in);
    let mut samples = Vec::new();

    loop {
        // rows report the position at the start of the step
        let (x, y) = (flight.x(), flight.y());
        let step = flight.advance(&forces, STEP_FT)?;

        if x / 3.0 >= samples.len() as f64 {
            let windage_inches = windage(crosswind, vi, x, flight.t);
            samples.push(Sample {
                range_yards: samples.len(),
                path_inches: y * 12.0,
                moa_correction: -angle_moa(y, x),
                seconds: flight.t,
                windage_inches,
                windage_moa: angle_moa(windage_inches / 12.0, x),
                v_fps: step.speed,
                vx_fps: flight.vx(),
                vy_fps: flight.vy(),
            });
        }

        if flight.too_steep() || samples.len() >= MAX_YARDS {
            break;
        }
    }

    debug!(yards = samples.len(), zero_angle_deg, "trajectory complete");
    Ok(Trajectory { samples })
}

/// Zero the load at `zero_range_yards` (level ground), then integrate the
/// shot at `shooting_angle_deg` with that zero.
pub fn zeroed_trajectory(
    load: &Load,
    zero_range_yards: f64,
    shooting_angle_deg: f64,
    wind: Wind,
) -> Result<Trajectory, SolveError> {
    let zero_angle_deg = solve_zero_angle(load, zero_range_yards, 0.0)?;
    compute_trajectory(load, shooting_angle_deg, zero_angle_deg, wind)
}

/// Angle subtended by `offset` at `range` [MOA]; zero at the muzzle.
fn angle_moa(offset: f64, range: f64) -> f64 {
    if range > 0.0 {
        rad_to_moa((offset / range).atan())
    } else {
        0.0
    }
}
