//! Core ballistics math utilities
//!
//! Includes:
//! - Angle conversions (degrees, radians, minutes of angle)
//! - Wind resolution and windage deflection
//! - Atmospheric correction of a standard drag coefficient
//!
//! Units follow the classic flat-fire tables: feet, feet per second, inches,
//! miles per hour for wind, degrees at the API boundary.

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gravitational acceleration [ft/s²], negative is down.
pub const GRAVITY: f64 = -32.194;

/// Hard cap on the number of yards a single run may cover.
pub const MAX_YARDS: usize = 50_000;

/// -------------------------
/// Angles
/// -------------------------
///
/// Written as `deg * PI / 180` rather than `to_radians()` so results stay
/// bit-compatible with published reference tables.

pub fn deg_to_moa(deg: f64) -> f64 { deg * 60.0 }
pub fn moa_to_deg(moa: f64) -> f64 { moa / 60.0 }

pub fn deg_to_rad(deg: f64) -> f64 { deg * PI / 180.0 }
pub fn rad_to_deg(rad: f64) -> f64 { rad * 180.0 / PI }

pub fn moa_to_rad(moa: f64) -> f64 { moa / 60.0 * PI / 180.0 }
pub fn rad_to_moa(rad: f64) -> f64 { rad * 60.0 * 180.0 / PI }

/// -------------------------
/// Wind
/// -------------------------

/// mph -> inches per second
const MPH_TO_IPS: f64 = 17.60;

/// Wind at the firing point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wind {
    pub speed_mph: f64,
    /// Direction the wind comes FROM: 0° = ahead, 90° = right, 180° = behind, 270° = left.
    pub angle_deg: f64,
}

impl Wind {
    pub fn new(speed_mph: f64, angle_deg: f64) -> Self {
        Self { speed_mph, angle_deg }
    }

    /// No wind at all.
    pub fn calm() -> Self {
        Self::default()
    }

    /// Resolve into headwind component [mph], positive from straight ahead.
    pub fn headwind(&self) -> f64 {
        deg_to_rad(self.angle_deg).cos() * self.speed_mph
    }

    /// Resolve into crosswind component [mph], positive blowing right to left.
    pub fn crosswind(&self) -> f64 {
        deg_to_rad(self.angle_deg).sin() * self.speed_mph
    }
}

/// Windage deflection [in] after covering `x_ft` in `t` seconds.
///
/// The deflection is proportional to the lag between the real flight time and
/// the vacuum flight time `x / vi`.
///
/// # Arguments
/// * `crosswind_mph` - crosswind component
/// * `vi` - muzzle velocity [ft/s]
/// * `x_ft` - range travelled [ft]
/// * `t` - time of flight to `x_ft` [s]
pub fn windage(crosswind_mph: f64, vi: f64, x_ft: f64, t: f64) -> f64 {
    let vw = crosswind_mph * MPH_TO_IPS;
    vw * (t - x_ft / vi)
}

/// -------------------------
/// Atmosphere
/// -------------------------

/// Standard sea-level pressure [inHg].
const P_STD_INHG: f64 = 29.53;

/// Shooter atmosphere in the units the drag tables were published in.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Atmosphere {
    pub altitude_ft: f64,
    /// Station-corrected ("weather report") pressure, not absolute.
    pub barometer_inhg: f64,
    pub temperature_f: f64,
    /// 0.0 ..= 1.0
    pub relative_humidity: f64,
}

impl Atmosphere {
    /// Conditions the standard drag tables refer to.
    pub fn standard() -> Self {
        Self {
            altitude_ft: 0.0,
            barometer_inhg: P_STD_INHG,
            temperature_f: 59.0,
            relative_humidity: 0.78,
        }
    }

    /// Correct a standard drag coefficient for these conditions.
    pub fn correct(&self, drag_coefficient: f64) -> f64 {
        correct_drag_coefficient(
            drag_coefficient,
            self.altitude_ft,
            self.barometer_inhg,
            self.temperature_f,
            self.relative_humidity,
        )
    }
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self::standard()
    }
}

/// Scale a standard drag coefficient to non-standard altitude, pressure,
/// temperature and humidity.
///
/// Apply once, before any solve; the solvers never call this themselves.
pub fn correct_drag_coefficient(
    drag_coefficient: f64,
    altitude_ft: f64,
    barometer_inhg: f64,
    temperature_f: f64,
    relative_humidity: f64,
) -> f64 {
    let fa = altitude_factor(altitude_ft);
    let ft = temperature_factor(temperature_f, altitude_ft);
    let fr = humidity_factor(temperature_f, barometer_inhg, relative_humidity);
    let fp = pressure_factor(barometer_inhg);

    drag_coefficient * (fa * (1.0 + ft - fp) * fr)
}

fn altitude_factor(altitude_ft: f64) -> f64 {
    let fa = -4e-15 * altitude_ft.powi(3) + 4e-10 * altitude_ft.powi(2) - 3e-5 * altitude_ft + 1.0;
    1.0 / fa
}

fn temperature_factor(temperature_f: f64, altitude_ft: f64) -> f64 {
    // standard temperature lapses ~3.6 °F per 1000 ft
    let t_std = -0.0036 * altitude_ft + 59.0;
    (temperature_f - t_std) / (459.6 + t_std)
}

fn pressure_factor(barometer_inhg: f64) -> f64 {
    (barometer_inhg - P_STD_INHG) / P_STD_INHG
}

fn humidity_factor(temperature_f: f64, barometer_inhg: f64, relative_humidity: f64) -> f64 {
    // cubic fit to saturation vapor pressure [inHg]
    let vpw = 4e-6 * temperature_f.powi(3) - 0.0004 * temperature_f.powi(2) + 0.0234 * temperature_f - 0.2517;
    0.995 * (barometer_inhg / (barometer_inhg - 0.3783 * relative_humidity * vpw))
}

/* -------------------------------- tests -------------------------------- */
