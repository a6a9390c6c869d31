// crates/ballistics-ffi-wasm/src/lib.rs
//
// WASM bindings: zero angle, trajectory table, point-blank range and the
// atmosphere correction.

use wasm_bindgen::prelude::*;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen as swb;

// --- our crates ---
use ballistics_core::Atmosphere;
use ballistics_models::DragFunction;
use ballistics_pointmass as pm;

// Better panic messages in browser console
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
}

/* --------------------------- Shared DTOs (JS) --------------------------- */

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JsAtmosphere {
    pub altitude_ft: f64,
    pub barometer_inhg: f64,
    pub temperature_f: f64,
    /// 0..1
    pub relative_humidity: f64,
}
impl From<JsAtmosphere> for Atmosphere {
    fn from(a: JsAtmosphere) -> Self {
        Atmosphere {
            altitude_ft: a.altitude_ft,
            barometer_inhg: a.barometer_inhg,
            temperature_f: a.temperature_f,
            relative_humidity: a.relative_humidity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsLoad {
    /// "G1" | "G2" | "G5" | "G6" | "G7" | "G8"
    pub drag_model: String,
    pub bc: f64,
    pub muzzle_velocity_fps: f64,
    pub sight_height_in: f64,
    /// Correct `bc` for these conditions first; standard atmosphere if absent.
    #[serde(default)]
    pub atmosphere: Option<JsAtmosphere>,
}

impl TryFrom<JsLoad> for pm::Load {
    type Error = String;

    fn try_from(l: JsLoad) -> Result<Self, String> {
        let drag: DragFunction = l.drag_model.parse().map_err(|e: ballistics_models::DragError| e.to_string())?;
        let load = pm::Load::new(drag, l.bc, l.muzzle_velocity_fps, l.sight_height_in);
        Ok(match l.atmosphere {
            Some(atmos) => load.in_atmosphere(&atmos.into()),
            None => load,
        })
    }
}

fn to_js_err(msg: impl ToString) -> JsValue {
    JsValue::from_str(&msg.to_string())
}

/* ------------------------------ Zero angle ------------------------------ */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsZeroInput {
    pub load: JsLoad,
    pub zero_range_yards: f64,
    #[serde(default)]
    pub y_intercept_in: f64,
}

/// Bore angle [deg] that zeros the load.
#[wasm_bindgen]
pub fn solve_zero_angle_js(input: JsValue) -> Result<f64, JsValue> {
    let inp: JsZeroInput = swb::from_value(input)?;
    let load = pm::Load::try_from(inp.load).map_err(to_js_err)?;
    pm::solve_zero_angle(&load, inp.zero_range_yards, inp.y_intercept_in).map_err(to_js_err)
}

/* ------------------------------ Trajectory ------------------------------ */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsTrajectoryInput {
    pub load: JsLoad,
    #[serde(default)]
    pub shooting_angle_deg: f64,
    /// Solved from `zero_range_yards` when absent.
    #[serde(default)]
    pub zero_angle_deg: Option<f64>,
    #[serde(default)]
    pub zero_range_yards: Option<f64>,
    #[serde(default)]
    pub wind_speed_mph: f64,
    #[serde(default)]
    pub wind_angle_deg: f64,
    /// Only these yardages are returned; the whole table if empty.
    #[serde(default)]
    pub ranges_yards: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsTrajectoryResult {
    pub zero_angle_deg: f64,
    /// Yards reached before the run ended.
    pub yards: usize,
    pub rows: Vec<pm::Sample>,
}

fn trajectory(inp: JsTrajectoryInput) -> Result<JsTrajectoryResult, String> {
    let load = pm::Load::try_from(inp.load)?;
    let zero_angle_deg = match (inp.zero_angle_deg, inp.zero_range_yards) {
        (Some(angle), _) => angle,
        (None, Some(range)) => pm::solve_zero_angle(&load, range, 0.0).map_err(|e| e.to_string())?,
        (None, None) => return Err("either zero_angle_deg or zero_range_yards is required".into()),
    };

    let wind = pm::Wind::new(inp.wind_speed_mph, inp.wind_angle_deg);
    let traj = pm::compute_trajectory(&load, inp.shooting_angle_deg, zero_angle_deg, wind)
        .map_err(|e| e.to_string())?;

    let yards = traj.len();
    let rows = if inp.ranges_yards.is_empty() {
        traj.into_samples()
    } else {
        traj.at_ranges(&inp.ranges_yards)
    };
    Ok(JsTrajectoryResult { zero_angle_deg, yards, rows })
}

#[wasm_bindgen]
pub fn compute_trajectory_js(input: JsValue) -> Result<JsValue, JsValue> {
    let inp: JsTrajectoryInput = swb::from_value(input)?;
    let out = trajectory(inp).map_err(to_js_err)?;
    swb::to_value(&out).map_err(|e| e.into())
}

/* ---------------------------- Point-blank range ---------------------------- */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsPbrInput {
    pub load: JsLoad,
    pub vital_size_in: f64,
}

#[wasm_bindgen]
pub fn solve_pbr_js(input: JsValue) -> Result<JsValue, JsValue> {
    let inp: JsPbrInput = swb::from_value(input)?;
    let load = pm::Load::try_from(inp.load).map_err(to_js_err)?;
    let result = pm::solve_point_blank_range(&load, inp.vital_size_in).map_err(to_js_err)?;
    swb::to_value(&result).map_err(|e| e.into())
}

/* ------------------------------ Atmosphere ------------------------------ */

/// Drag coefficient corrected for non-standard conditions.
#[wasm_bindgen]
pub fn correct_drag_js(bc: f64, atmosphere: JsValue) -> Result<f64, JsValue> {
    let atmos: Atmosphere = if atmosphere.is_undefined() || atmosphere.is_null() {
        Atmosphere::standard()
    } else {
        swb::from_value::<JsAtmosphere>(atmosphere)?.into()
    };
    Ok(atmos.correct(bc))
}
