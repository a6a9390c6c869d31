//! ballistics-models
//!
//! Standard G-function drag curves implemented as piecewise power-laws of
//! projectile speed in **fps**:
//!
//!   retard(v) = A * v^M / C
//!
//! where `C` is the projectile's drag coefficient for that family and `A`, `M`
//! are taken from the first band whose lower bound lies below `v`. The result
//! is the instantaneous deceleration in ft/s².
//!
//! Exports:
//!   - `DragFunction` (closed set of reference families)
//!   - `DragFunction::retard(coefficient, v_fps)`

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Tables are only fitted up to this speed [fps].
pub const MAX_TABLE_VELOCITY: f64 = 10_000.0;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum DragError {
    #[error("unknown drag function `{0}` (expected one of G1, G2, G3, G5, G6, G7, G8)")]
    UnknownFunction(String),
    #[error("drag function {0} has no retardation table")]
    Unsupported(DragFunction),
    #[error("velocity {0} fps is outside the drag table domain (0, 10000)")]
    VelocityOutOfRange(f64),
}

/// Reference projectile whose drag curve normalizes the coefficient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
pub enum DragFunction {
    G1,
    G2,
    G3,
    G5,
    G6,
    G7,
    G8,
}

impl DragFunction {
    pub const ALL: [DragFunction; 7] = [
        DragFunction::G1,
        DragFunction::G2,
        DragFunction::G3,
        DragFunction::G5,
        DragFunction::G6,
        DragFunction::G7,
        DragFunction::G8,
    ];

    fn table(self) -> Option<&'static [Segment]> {
        match self {
            DragFunction::G1 => Some(G1_TABLE),
            DragFunction::G2 => Some(G2_TABLE),
            DragFunction::G3 => None,
            DragFunction::G5 => Some(G5_TABLE),
            DragFunction::G6 => Some(G6_TABLE),
            DragFunction::G7 => Some(G7_TABLE),
            DragFunction::G8 => Some(G8_TABLE),
        }
    }

    /// Whether this family can be evaluated at all.
    pub fn is_supported(self) -> bool {
        self.table().is_some()
    }

    /// Deceleration [ft/s²] at `v_fps` for a projectile with the given drag
    /// coefficient in this family.
    pub fn retard(self, drag_coefficient: f64, v_fps: f64) -> Result<f64, DragError> {
        let table = self.table().ok_or(DragError::Unsupported(self))?;
        if !(v_fps > 0.0 && v_fps < MAX_TABLE_VELOCITY) {
            return Err(DragError::VelocityOutOfRange(v_fps));
        }
        let seg = table
            .iter()
            .find(|seg| v_fps > seg.v_lo)
            .ok_or(DragError::VelocityOutOfRange(v_fps))?;
        Ok(seg.a * v_fps.powf(seg.m) / drag_coefficient)
    }
}

impl fmt::Display for DragFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DragFunction::G1 => "G1",
            DragFunction::G2 => "G2",
            DragFunction::G3 => "G3",
            DragFunction::G5 => "G5",
            DragFunction::G6 => "G6",
            DragFunction::G7 => "G7",
            DragFunction::G8 => "G8",
        };
        f.write_str(name)
    }
}

impl FromStr for DragFunction {
    type Err = DragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "G1" => Ok(DragFunction::G1),
            "G2" => Ok(DragFunction::G2),
            "G3" => Ok(DragFunction::G3),
            "G5" => Ok(DragFunction::G5),
            "G6" => Ok(DragFunction::G6),
            "G7" => Ok(DragFunction::G7),
            "G8" => Ok(DragFunction::G8),
            _ => Err(DragError::UnknownFunction(s.to_string())),
        }
    }
}

/// One piece of a G-function: valid for v > v_lo, up to the previous band.
#[derive(Clone, Copy)]
struct Segment {
    v_lo: f64,
    a: f64,
    m: f64,
}

const fn seg(v_lo: f64, a: f64, m: f64) -> Segment {
    Segment { v_lo, a, m }
}

/* ------------------------------- G1 (Ingalls) ------------------------------- */
/* Flat-base reference projectile. Bands ordered high -> low.                  */

#[rustfmt::skip]
const G1_TABLE: &[Segment] = &[
    //    v_lo,   a,                      m
    seg(4230.0, 1.477404177730177e-04, 1.9565),
    seg(3680.0, 1.920339268755614e-04, 1.925),
    seg(3450.0, 2.894751026819746e-04, 1.875),
    seg(3295.0, 4.349905111115636e-04, 1.825),
    seg(3130.0, 6.520421871892662e-04, 1.775),
    seg(2960.0, 9.748073694078696e-04, 1.725),
    seg(2830.0, 1.453721560187286e-03, 1.675),
    seg(2680.0, 2.162887202930376e-03, 1.625),
    seg(2460.0, 3.209559783129881e-03, 1.575),
    seg(2225.0, 3.904368218691249e-03, 1.55),
    seg(2015.0, 3.222942271262336e-03, 1.575),
    seg(1890.0, 2.203329542297809e-03, 1.625),
    seg(1810.0, 1.511001028891904e-03, 1.675),
    seg(1730.0, 8.609957592468259e-04, 1.75),
    seg(1595.0, 4.086146797305117e-04, 1.85),
    seg(1520.0, 1.954473210037398e-04, 1.95),
    seg(1420.0, 5.431896266462351e-05, 2.125),
    seg(1360.0, 8.847742581674416e-06, 2.375),
    seg(1315.0, 1.456991316899596e-06, 2.625),
    seg(1280.0, 2.419742015003648e-07, 2.875),
    seg(1220.0, 1.657956321067612e-08, 3.25),
    seg(1185.0, 4.745469537157371e-10, 3.75),
    seg(1150.0, 1.379746590025088e-11, 4.25),
    seg(1100.0, 4.070157961147882e-13, 4.75),
    seg(1060.0, 2.938236954847331e-14, 5.125),
    seg(1025.0, 1.228597370774746e-14, 5.25),
    seg( 980.0, 2.916938264100495e-14, 5.125),
    seg( 945.0, 3.855099424807451e-13, 4.75),
    seg( 905.0, 1.185097045689854e-11, 4.25),
    seg( 860.0, 3.566129470974951e-10, 3.75),
    seg( 810.0, 1.045513263966272e-08, 3.25),
    seg( 780.0, 1.291159200846216e-07, 2.875),
    seg( 750.0, 6.824429329105383e-07, 2.625),
    seg( 700.0, 3.569169672385163e-06, 2.375),
    seg( 640.0, 1.839015095899579e-05, 2.125),
    seg( 600.0, 5.711174688734240e-05, 1.950),
    seg( 550.0, 9.226557091973427e-05, 1.875),
    seg( 250.0, 9.337991957131389e-05, 1.875),
    seg( 100.0, 7.225247327590413e-05, 1.925),
    seg(  65.0, 5.792684957074546e-05, 1.975),
    seg(   0.0, 5.206214107320588e-05, 2.000),
];

/* ------------------------------ G2 (Aberdeen J) ----------------------------- */

#[rustfmt::skip]
const G2_TABLE: &[Segment] = &[
    seg(1674.0, 7.947005213673300e-03, 1.36999902851493),
    seg(1172.0, 1.00419763721974e-03,  1.65392237010294),
    seg(1060.0, 7.15571228255369e-23,  7.91913562392361),
    seg( 949.0, 1.39589807205091e-10,  3.81439537623717),
    seg( 670.0, 2.34364342818625e-04,  1.71869536324748),
    seg( 335.0, 1.77962438921838e-04,  1.76877550388679),
    seg(   0.0, 5.18033561289704e-05,  1.98160270524632),
];

/* ------------------------------- G5 (short BT) ------------------------------ */

#[rustfmt::skip]
const G5_TABLE: &[Segment] = &[
    seg(1730.0, 7.24854775171929e-03, 1.41538574492812),
    seg(1228.0, 3.50563361516117e-05, 2.13077307854948),
    seg(1116.0, 1.84029481181151e-13, 4.81927320350395),
    seg(1004.0, 1.34713064017409e-22, 7.8100555281422),
    seg( 837.0, 1.03965974081168e-07, 2.84204791809926),
    seg( 335.0, 1.09301593869823e-04, 1.81096361579504),
    seg(   0.0, 3.51963178524273e-05, 2.00477856801111),
];

/* ------------------------------ G6 (flat-base) ------------------------------ */

#[rustfmt::skip]
const G6_TABLE: &[Segment] = &[
    seg(3236.0, 4.55384883480781e-02,  1.15997674041274),
    seg(2065.0, 7.167261849653769e-02, 1.10704436538885),
    seg(1311.0, 1.66676386084348e-03,  1.60085100195952),
    seg(1144.0, 1.01482730119215e-07,  2.9569674731838),
    seg(1004.0, 4.31542773103552e-18,  6.34106317069757),
    seg( 670.0, 2.04835650496866e-05,  2.11688446325998),
    seg(   0.0, 7.50912466084823e-05,  1.92031057847052),
];

/* ------------------------------ G7 (long BT) -------------------------------- */

#[rustfmt::skip]
const G7_TABLE: &[Segment] = &[
    seg(4200.0, 1.29081656775919e-09, 3.24121295355962),
    seg(3000.0, 1.71422231434847e-02, 1.27907168025204),
    seg(1470.0, 2.33355948302505e-03, 1.52693913274526),
    seg(1260.0, 7.97592111627665e-04, 1.67688974440324),
    seg(1110.0, 5.71086414289273e-12, 4.3212826264889),
    seg( 960.0, 3.02865108244904e-17, 5.99074203776707),
    seg( 670.0, 7.52285155782535e-06, 2.1738019851075),
    seg( 540.0, 1.31766281225189e-05, 2.08774690257991),
    seg(   0.0, 1.34504843776525e-05, 2.08702306738884),
];

/* ------------------------------ G8 (flat-base) ------------------------------ */

#[rustfmt::skip]
const G8_TABLE: &[Segment] = &[
    seg(3571.0, 1.12263766252305e-02, 1.33207346655961),
    seg(1841.0, 1.67252613732636e-02, 1.28662041261785),
    seg(1120.0, 2.20172456619625e-03, 1.55636358091189),
    seg(1088.0, 2.0538037167098e-16,  5.80410776994789),
    seg( 976.0, 5.92182174254121e-12, 4.29275576134191),
    seg(   0.0, 4.3917343795117e-05,  1.99978116283334),
];

/* -------------------------------- tests -------------------------------- */
