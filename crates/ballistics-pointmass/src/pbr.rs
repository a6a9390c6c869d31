//! Maximum point-blank range.
//!
//! Holding dead on the center of a vital zone of height `vital`, a hit is
//! guaranteed while the path stays within `vital / 2` of the sight line. The
//! span is longest when the apex of the path sits exactly `vital / 2` above
//! the sight line, so the bore angle is searched for that apex height. Each
//! trial shot records, first occurrence only:
//!
//! - near zero: path rises through the sight line
//! - far zero: path falls back through it
//! - min PBR: path first comes within `vital / 2` from below
//! - max PBR: path leaves the band again on the way down
//! - sight-in height at 100 yards
//! - the apex

use std::cmp::Ordering;

use ballistics_core::{deg_to_rad, MAX_YARDS};
use nalgebra::Vector2;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::flight::{Flight, Forces};
use crate::search::{SearchOutcome, StepSearch};
use crate::{Load, SolveError};

/// Path length per integration step [ft].
const STEP_FT: f64 = 0.5;
/// Initial bore-angle step [deg].
const INITIAL_STEP_DEG: f64 = 10.0;
/// 0.01 MOA in degrees.
const TOLERANCE_DEG: f64 = 0.01 / 60.0;
/// 100 yards [ft].
const SIGHT_IN_RANGE_FT: f64 = 300.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PbrStatus {
    /// Not solved yet.
    #[default]
    Unassigned,
    Valid,
    /// The converged shot turned steeper than 3:1 before every event was seen.
    TooFastVy,
    /// The distance or iteration budget ran out.
    OutOfRange,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PbrResult {
    /// Nearest crossing of path and sight line.
    pub near_zero_yards: u32,
    /// Furthest crossing of path and sight line.
    pub far_zero_yards: u32,
    /// Nearest range that still hits the vitals when holding center.
    pub min_pbr_yards: u32,
    /// Furthest range that still hits the vitals when holding center.
    pub max_pbr_yards: u32,
    /// Where to sight in at 100 yards [1/100 in], positive is above center.
    pub sight_in_at_100yards: i32,
    pub status: PbrStatus,
}

impl PbrResult {
    fn failed(status: PbrStatus) -> Self {
        Self { status, ..Self::default() }
    }

    pub fn is_valid(&self) -> bool {
        self.status == PbrStatus::Valid
    }
}

/// Solve for the maximum point-blank range of `load` against a vital zone
/// `vital_size_in` tall.
///
/// Numerical dead ends come back as a non-valid [`PbrStatus`] with the
/// distances left at zero; only bad inputs are errors.
pub fn solve_point_blank_range(load: &Load, vital_size_in: f64) -> Result<PbrResult, SolveError> {
    load.validate()?;
    if !(vital_size_in.is_finite() && vital_size_in > 0.0) {
        return Err(SolveError::InvalidInput("vital zone size must be positive"));
    }
    let half_vital_in = vital_size_in / 2.0;

    let mut last = None;
    let search = StepSearch::new(0.0, INITIAL_STEP_DEG, TOLERANCE_DEG);
    let outcome = search.run(|zangle_deg| -> Result<Ordering, Halt> {
        let trial = Trial::fly(load, zangle_deg, half_vital_in)?;
        if trial.end == TrialEnd::OutOfRange {
            return Err(Halt::OutOfRange);
        }
        // a shot that never peaked was pointed too steeply
        let signal = match trial.events.apex {
            Some(apex) if apex.y * 12.0 > half_vital_in => Ordering::Greater,
            Some(_) => Ordering::Less,
            None => Ordering::Greater,
        };
        last = Some(trial);
        Ok(signal)
    });

    let result = match (outcome, last) {
        (Ok(SearchOutcome::Converged { value, iterations }), Some(trial)) => {
            debug!(zangle_deg = value, iterations, "point-blank search converged");
            trial.into_result()
        }
        (Ok(_), _) | (Err(Halt::OutOfRange), _) => PbrResult::failed(PbrStatus::OutOfRange),
        (Err(Halt::Failed(err)), _) => return Err(err),
    };

    if !result.is_valid() {
        warn!(status = ?result.status, vital_size_in, "point-blank range not found");
    }
    Ok(result)
}

/// Why the search stopped early.
enum Halt {
    OutOfRange,
    Failed(SolveError),
}

impl From<SolveError> for Halt {
    fn from(err: SolveError) -> Self {
        Halt::Failed(err)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TrialEnd {
    /// Every event was captured.
    Complete,
    TooFastVy,
    OutOfRange,
}

/// Distances [ft] and heights of one trial shot.
#[derive(Clone, Copy, Debug, Default)]
struct Events {
    near_zero: Option<f64>,
    far_zero: Option<f64>,
    min_pbr: Option<f64>,
    max_pbr: Option<f64>,
    sight_in_100: Option<i32>,
    apex: Option<Vector2<f64>>,
}

impl Events {
    fn complete(&self) -> bool {
        self.near_zero.is_some()
            && self.far_zero.is_some()
            && self.min_pbr.is_some()
            && self.max_pbr.is_some()
            && self.sight_in_100.is_some()
            && self.apex.is_some()
    }
}

#[derive(Clone, Copy, Debug)]
struct Trial {
    end: TrialEnd,
    events: Events,
}

impl Trial {
    fn fly(load: &Load, zangle_deg: f64, half_vital_in: f64) -> Result<Self, SolveError> {
        let elevation = deg_to_rad(zangle_deg);
        let forces = Forces::new(load.drag_function, load.drag_coefficient, elevation, 0.0);
        let mut flight = Flight::launch(load.muzzle_velocity_fps, elevation, load.sight_height_in);
        let mut ev = Events::default();

        let end = loop {
            flight.advance(&forces, STEP_FT)?;
            let (x, y, vy) = (flight.x(), flight.y(), flight.vy());
            let y_in = 12.0 * y;

            if y > 0.0 && vy >= 0.0 && ev.near_zero.is_none() {
                ev.near_zero = Some(x);
            }
            if y < 0.0 && vy <= 0.0 && ev.far_zero.is_none() {
                ev.far_zero = Some(x);
            }
            if y_in > -half_vital_in && ev.min_pbr.is_none() {
                ev.min_pbr = Some(x);
            }
            if y_in < -half_vital_in && ev.min_pbr.is_some() && ev.max_pbr.is_none() {
                ev.max_pbr = Some(x);
            }
            if x >= SIGHT_IN_RANGE_FT && ev.sight_in_100.is_none() {
                ev.sight_in_100 = Some(hundredths_of_inch(y));
            }

            if flight.too_steep() {
                break TrialEnd::TooFastVy;
            }
            if x / 3.0 > MAX_YARDS as f64 {
                break TrialEnd::OutOfRange;
            }

            if vy < 0.0 && ev.apex.is_none() {
                ev.apex = Some(flight.position);
            }
            if ev.complete() {
                break TrialEnd::Complete;
            }
        };

        Ok(Self { end, events: ev })
    }

    fn into_result(self) -> PbrResult {
        let ev = self.events;
        match (self.end, ev.near_zero, ev.far_zero, ev.min_pbr, ev.max_pbr, ev.sight_in_100) {
            (TrialEnd::Complete, Some(near), Some(far), Some(min), Some(max), Some(sight_in)) => PbrResult {
                near_zero_yards: feet_to_yards(near),
                far_zero_yards: feet_to_yards(far),
                min_pbr_yards: feet_to_yards(min),
                max_pbr_yards: feet_to_yards(max),
                sight_in_at_100yards: sight_in,
                status: PbrStatus::Valid,
            },
            (TrialEnd::OutOfRange, ..) => PbrResult::failed(PbrStatus::OutOfRange),
            _ => PbrResult::failed(PbrStatus::TooFastVy),
        }
    }
}

/// Whole yards, truncated.
fn feet_to_yards(feet: f64) -> u32 {
    (feet / 3.0) as u32
}

/// Height [ft] in hundredths of an inch, truncated; single precision to
/// match published sight-in tables.
fn hundredths_of_inch(y_ft: f64) -> i32 {
    (100.0_f32 * y_ft as f32 * 12.0_f32) as i32
}
