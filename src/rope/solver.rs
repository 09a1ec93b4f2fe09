use super::{BendConstraint, Particles, RopeTuning, StretchConstraint};
use crate::math as m;

use itertools::izip;
use std::f64::consts::TAU;

/// Edges with a squared length below this are treated as collapsed
/// and the constraints touching them are skipped.
const DEGENERATE_LENGTH_SQ: f64 = f64::EPSILON * f64::EPSILON;

/// View into the rope's buffers for the duration of one step.
#[derive(Debug)]
pub(crate) struct StepView<'a> {
    pub dt: f64,
    pub inv_dt: f64,
    pub gravity: m::Vec2,
    pub tuning: &'a RopeTuning,
    pub particles: &'a mut Particles,
    pub stretch: &'a [StretchConstraint],
    pub bend: &'a mut [BendConstraint],
}

/// A formulation of bending resistance.
///
/// One implementation is picked per step based on
/// [`RopeTuning::bending_model`][super::RopeTuning::bending_model].
pub(crate) trait BendSolver {
    /// Modify velocities once per step, before positions are integrated.
    fn apply_forces(&self, _data: &mut StepView<'_>) {}
    /// Project positions, called once per solver iteration before the stretch constraints.
    fn project(&self, _data: &mut StepView<'_>) {}
}

pub(crate) struct NoBending;
impl BendSolver for NoBending {}

pub(crate) struct SpringAngle;
pub(crate) struct PbdAngle;
pub(crate) struct XpbdAngle;

/// Advance the rope by one timestep of `data.dt` seconds, which must be positive.
pub(crate) fn solve(
    bend_solver: &impl BendSolver,
    data: &mut StepView<'_>,
    iterations: usize,
    frame_position: m::Vec2,
) {
    integrate_velocities(data, frame_position);

    bend_solver.apply_forces(data);

    for (pos, vel) in izip!(&mut data.particles.positions, &data.particles.velocities) {
        *pos += data.dt * *vel;
    }

    for constraint in data.bend.iter_mut() {
        constraint.lambda = 0.0;
    }

    for _ in 0..iterations {
        bend_solver.project(data);
        solve_stretch(data);
    }

    // update velocities from position differences
    for (pos, prev_pos, vel) in izip!(
        &data.particles.positions,
        &mut data.particles.prev_positions,
        &mut data.particles.velocities
    ) {
        *vel = (*pos - *prev_pos) * data.inv_dt;
        *prev_pos = *pos;
    }
}

/// Apply gravity and damping to dynamic particles
/// and drive pinned particles toward their bind positions.
fn integrate_velocities(data: &mut StepView<'_>, frame_position: m::Vec2) {
    let damping_factor = (-data.dt * data.tuning.damping).exp();
    let ps = &mut *data.particles;

    for (vel, prev_pos, inv_mass, bind_offset) in izip!(
        &mut ps.velocities,
        &ps.prev_positions,
        &ps.inv_masses,
        &ps.bind_offsets
    ) {
        if *inv_mass > 0.0 {
            *vel += data.dt * data.gravity;
            *vel *= damping_factor;
        } else {
            *vel = (*bind_offset + frame_position - *prev_pos) * data.inv_dt;
        }
    }
}

//
// Stretch
//

pub(crate) fn solve_stretch(data: &mut StepView<'_>) {
    let _span = tracy_span!("solve stretch", "solve_stretch");

    let stiffness = data.tuning.stretch_stiffness;
    let ps = &mut *data.particles;

    for (curr, constraint) in data.stretch.iter().enumerate() {
        let next = curr + 1;
        let inv_masses = [ps.inv_masses[curr], ps.inv_masses[next]];
        let inv_mass_sum = inv_masses[0] + inv_masses[1];
        if inv_mass_sum == 0.0 {
            continue;
        }

        let dist = ps.positions[next] - ps.positions[curr];
        let dist_mag = dist.mag();
        if dist_mag < f64::EPSILON {
            continue;
        }
        let dir = dist / dist_mag;

        let correction = stiffness * (constraint.rest_length - dist_mag) * dir;
        ps.positions[curr] -= (inv_masses[0] / inv_mass_sum) * correction;
        ps.positions[next] += (inv_masses[1] / inv_mass_sum) * correction;
    }
}

//
// Bending
//

/// Linearization of the bending angle constraint over three consecutive particles.
#[derive(Clone, Copy, Debug)]
struct BendGeometry {
    first: usize,
    /// Difference between the current and rest angle, wrapped into `(-π, π]`.
    error: f64,
    /// Gradients of the angle with respect to each particle's position.
    jacobians: [m::Vec2; 3],
    inv_masses: [f64; 3],
    /// Inverse of the effective mass along the constraint gradient.
    w: f64,
}

impl BendGeometry {
    /// Returns `None` if an edge has collapsed or every particle is pinned.
    fn compute(ps: &Particles, first: usize, rest_angle: f64) -> Option<Self> {
        let [p1, p2, p3] = [first, first + 1, first + 2].map(|i| ps.positions[i]);
        let d1 = p2 - p1;
        let d2 = p3 - p2;
        let l1_sq = d1.mag_sq();
        let l2_sq = d2.mag_sq();
        if l1_sq < DEGENERATE_LENGTH_SQ || l2_sq < DEGENERATE_LENGTH_SQ {
            return None;
        }

        let j1 = m::left_normal(d1) / l1_sq;
        let j3 = m::left_normal(d2) / l2_sq;
        let jacobians = [j1, -j1 - j3, j3];

        let inv_masses = [first, first + 1, first + 2].map(|i| ps.inv_masses[i]);
        let w: f64 = izip!(&jacobians, &inv_masses)
            .map(|(j, im)| im * j.mag_sq())
            .sum();
        if w == 0.0 {
            return None;
        }

        Some(Self {
            first,
            error: m::wrap_angle(m::signed_angle(d1, d2) - rest_angle),
            jacobians,
            inv_masses,
            w,
        })
    }

    /// Time derivative of the angle.
    fn angular_velocity(&self, velocities: &[m::Vec2]) -> f64 {
        izip!(&self.jacobians, &velocities[self.first..self.first + 3])
            .map(|(j, v)| j.dot(*v))
            .sum()
    }

    /// Stiffness and damping coefficient of an angular spring with the given
    /// natural frequency and damping ratio, scaled by the effective mass.
    fn spring_damper(&self, hertz: f64, damping_ratio: f64) -> (f64, f64) {
        let eff_mass = 1.0 / self.w;
        let omega = TAU * hertz;
        let spring = eff_mass * omega * omega;
        let damper = 2.0 * eff_mass * damping_ratio * omega;
        (spring, damper)
    }

    /// Move each of `targets` (positions or velocities) along its gradient,
    /// weighted by inverse mass.
    fn apply(&self, targets: &mut [m::Vec2], impulse: f64) {
        for (target, j, im) in izip!(
            &mut targets[self.first..self.first + 3],
            &self.jacobians,
            &self.inv_masses
        ) {
            *target += (im * impulse) * *j;
        }
    }
}

impl BendSolver for SpringAngle {
    fn apply_forces(&self, data: &mut StepView<'_>) {
        let _span = tracy_span!("apply bend forces", "apply_forces");

        let ps = &mut *data.particles;
        for (first, constraint) in data.bend.iter().enumerate() {
            let Some(geom) = BendGeometry::compute(ps, first, constraint.rest_angle) else {
                continue;
            };
            let (spring, damper) =
                geom.spring_damper(data.tuning.bend_hertz, data.tuning.bend_damping);
            let c_dot = geom.angular_velocity(&ps.velocities);

            let impulse = -data.dt * (spring * geom.error + damper * c_dot);
            geom.apply(&mut ps.velocities, impulse);
        }
    }
}

impl BendSolver for PbdAngle {
    fn project(&self, data: &mut StepView<'_>) {
        let _span = tracy_span!("solve bend pbd", "project");

        let stiffness = data.tuning.bend_stiffness;
        let ps = &mut *data.particles;
        for (first, constraint) in data.bend.iter().enumerate() {
            let Some(geom) = BendGeometry::compute(ps, first, constraint.rest_angle) else {
                continue;
            };

            let impulse = -stiffness * geom.error / geom.w;
            geom.apply(&mut ps.positions, impulse);
        }
    }
}

impl BendSolver for XpbdAngle {
    fn project(&self, data: &mut StepView<'_>) {
        let _span = tracy_span!("solve bend xpbd", "project");
        debug_assert!(data.dt > 0.0, "XPBD bending requires a positive timestep");

        let dt = data.dt;
        let dt_sq = dt * dt;
        let ps = &mut *data.particles;
        for (first, constraint) in data.bend.iter_mut().enumerate() {
            let Some(geom) = BendGeometry::compute(ps, first, constraint.rest_angle) else {
                continue;
            };
            let (spring, damper) =
                geom.spring_damper(data.tuning.bend_hertz, data.tuning.bend_damping);
            // a zero spring is infinitely compliant
            if spring <= 0.0 {
                continue;
            }

            let alpha = 1.0 / (spring * dt_sq);
            let beta = dt_sq * damper;
            let c_dot = geom.angular_velocity(&ps.velocities);

            let bias = geom.error + alpha * constraint.lambda + alpha * beta * c_dot;
            let w_soft = (1.0 + alpha * beta / dt) * geom.w + alpha;
            let impulse = -bias / w_soft;

            geom.apply(&mut ps.positions, impulse);
            constraint.lambda += impulse;
        }
    }
}
