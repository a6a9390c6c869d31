//! Single-step flight mechanics shared by every solver.

use ballistics_core::GRAVITY;
use ballistics_models::{DragError, DragFunction};
use nalgebra::Vector2;

/// Projectile state in the bore frame (x downrange, y up) [ft, ft/s, s].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Flight {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub t: f64,
}

/// What the step actually used.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Step {
    pub dt: f64,
    /// Speed at the start of the step [ft/s].
    pub speed: f64,
}

/// Everything that stays constant over one run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Forces {
    drag_function: DragFunction,
    drag_coefficient: f64,
    /// Gravity resolved into the bore frame [ft/s²].
    gravity: Vector2<f64>,
    /// Headwind added to the airspeed the drag table sees [mph].
    headwind: f64,
}

impl Forces {
    pub fn new(drag_function: DragFunction, drag_coefficient: f64, elevation_rad: f64, headwind: f64) -> Self {
        Self {
            drag_function,
            drag_coefficient,
            gravity: Vector2::new(GRAVITY * elevation_rad.sin(), GRAVITY * elevation_rad.cos()),
            headwind,
        }
    }
}

impl Flight {
    /// State at the muzzle; the line of sight sits `sight_height_in` above the bore.
    pub fn launch(muzzle_velocity_fps: f64, bore_angle_rad: f64, sight_height_in: f64) -> Self {
        Self {
            position: Vector2::new(0.0, -sight_height_in / 12.0),
            velocity: Vector2::new(
                muzzle_velocity_fps * bore_angle_rad.cos(),
                muzzle_velocity_fps * bore_angle_rad.sin(),
            ),
            t: 0.0,
        }
    }

    pub fn x(&self) -> f64 { self.position.x }
    pub fn y(&self) -> f64 { self.position.y }
    pub fn vx(&self) -> f64 { self.velocity.x }
    pub fn vy(&self) -> f64 { self.velocity.y }

    /// Steep enough that the flat-fire drag model no longer holds.
    pub fn too_steep(&self) -> bool {
        self.vy().abs() > (3.0 * self.vx()).abs()
    }

    /// Advance by roughly `step_ft` of path.
    ///
    /// Velocity takes the drag term then the gravity term, each over `dt`;
    /// position moves by the mean of the old and new velocity.
    pub fn advance(&mut self, forces: &Forces, step_ft: f64) -> Result<Step, DragError> {
        let previous = self.velocity;
        let speed = self.velocity.norm();
        let dt = step_ft / speed;

        let dv = forces.drag_function.retard(forces.drag_coefficient, speed + forces.headwind)?;
        let drag = -(self.velocity / speed) * dv;

        // keep the association: (v + drag·dt) + g·dt
        self.velocity = self.velocity + drag * dt + forces.gravity * dt;
        self.position = self.position + (self.velocity + previous) * dt / 2.0;
        self.t += dt;

        Ok(Step { dt, speed })
    }
}
