//! Ropes simulated as chains of particles with stretch and bending constraints.
//!
//! A [`Rope`][self::Rope] is created once from a [`RopeDef`][self::RopeDef]
//! and has a fixed number of particles for its whole lifetime.
//! The particle positions at creation time define the rest lengths and rest angles
//! that the solver pulls the rope back toward.
//!
//! Particles with zero mass are pinned: they are not affected by gravity or constraints
//! and instead follow a reference frame whose position is given on every
//! [`step`][self::Rope::step].

use crate::{
    debug::{self, DebugDraw},
    math as m, RopeError,
};

use itertools::Itertools;

mod constraint;
pub use constraint::{BendConstraint, StretchConstraint};
pub(crate) use constraint::{bend_table, stretch_table};

mod particles;
pub(crate) use particles::Particles;

mod set;
pub use set::{RopeKey, RopeSet};

mod solver;
use solver::StepView;

mod tuning;
pub use tuning::{BendingModel, RopeTuning};

//

/// Parameters for constructing a [`Rope`][self::Rope].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct RopeDef {
    /// Position of the reference frame at creation time.
    /// Vertices are relative to this.
    pub position: m::Vec2,
    pub vertices: Vec<m::Vec2>,
    /// One mass per vertex. Zero or negative masses create pinned particles.
    pub masses: Vec<f64>,
    pub gravity: m::Vec2,
    pub tuning: RopeTuning,
}

impl RopeDef {
    /// Define a straight rope from `start` to `end` with `segment_count + 1`
    /// evenly spaced particles of equal mass.
    pub fn line(start: m::Vec2, end: m::Vec2, segment_count: usize, particle_mass: f64) -> Self {
        let step = (end - start) / segment_count.max(1) as f64;
        let vertices: Vec<m::Vec2> = (0..=segment_count)
            .map(|i| start + i as f64 * step)
            .collect();
        Self {
            masses: vec![particle_mass; vertices.len()],
            vertices,
            ..Default::default()
        }
    }

    pub fn with_position(mut self, position: m::Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_gravity(mut self, gravity: m::Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_tuning(mut self, tuning: RopeTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Make the particle at `index` pinned by setting its mass to zero.
    /// Out of range indices are ignored.
    pub fn pinned(mut self, index: usize) -> Self {
        if let Some(mass) = self.masses.get_mut(index) {
            *mass = 0.0;
        }
        self
    }
}

/// A deformable chain of particles.
#[derive(Clone, Debug)]
pub struct Rope {
    particles: Particles,
    stretch: Vec<StretchConstraint>,
    bend: Vec<BendConstraint>,
    gravity: m::Vec2,
    tuning: RopeTuning,
}

impl Rope {
    /// Create a rope from a definition.
    ///
    /// Fails if there are fewer than three vertices,
    /// if the number of masses doesn't match the number of vertices,
    /// or if a vertex is not finite.
    pub fn new(def: &RopeDef) -> Result<Self, RopeError> {
        let count = def.vertices.len();
        if count < 3 {
            return Err(RopeError::TooFewParticles { count });
        }
        if def.masses.len() != count {
            return Err(RopeError::MassCountMismatch {
                vertices: count,
                masses: def.masses.len(),
            });
        }
        if let Some(index) = def
            .vertices
            .iter()
            .position(|v| !(v.x.is_finite() && v.y.is_finite()))
        {
            return Err(RopeError::NonFiniteVertex { index });
        }

        let particles = Particles::new(def.position, &def.vertices, &def.masses);
        let stretch = stretch_table(&particles.positions);
        let bend = bend_table(&particles.positions);

        def.tuning.warn_unusual();
        log::debug!(
            "created rope with {count} particles ({} pinned)",
            particles.inv_masses.iter().filter(|&&im| im == 0.0).count()
        );

        Ok(Self {
            particles,
            stretch,
            bend,
            gravity: def.gravity,
            tuning: def.tuning,
        })
    }

    /// Replace the solver parameters. Takes effect on the next step.
    pub fn set_tuning(&mut self, tuning: RopeTuning) {
        tuning.warn_unusual();
        log::debug!("rope tuning changed to {tuning:?}");
        self.tuning = tuning;
    }

    #[inline]
    pub fn tuning(&self) -> &RopeTuning {
        &self.tuning
    }

    #[inline]
    pub fn set_gravity(&mut self, gravity: m::Vec2) {
        self.gravity = gravity;
    }

    #[inline]
    pub fn gravity(&self) -> m::Vec2 {
        self.gravity
    }

    /// Set the rest angle of every bending constraint,
    /// e.g. zero for a rope that wants to be straight.
    /// The angle is wrapped into `(-π, π]`.
    pub fn set_angle(&mut self, angle: m::Angle) {
        let rad = m::wrap_angle(angle.rad());
        for constraint in &mut self.bend {
            constraint.rest_angle = rad;
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// `iterations` is the number of constraint solver passes;
    /// more passes make the rope stiffer and more accurate.
    /// `frame_position` is the current position of the reference frame
    /// that pinned particles follow.
    ///
    /// A zero `dt` does nothing. Negative or non-finite `dt` is an error.
    pub fn step(
        &mut self,
        dt: f64,
        iterations: usize,
        frame_position: m::Vec2,
    ) -> Result<(), RopeError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(RopeError::InvalidTimestep { dt });
        }
        if dt == 0.0 {
            return Ok(());
        }

        let _span = tracy_span!("step rope", "step");
        log::trace!("rope step dt={dt} iterations={iterations}");

        let bending_model = self.tuning.bending_model;
        let mut data = StepView {
            dt,
            inv_dt: 1.0 / dt,
            gravity: self.gravity,
            tuning: &self.tuning,
            particles: &mut self.particles,
            stretch: &self.stretch,
            bend: &mut self.bend,
        };

        match bending_model {
            BendingModel::None => {
                solver::solve(&solver::NoBending, &mut data, iterations, frame_position)
            }
            BendingModel::SpringAngle => {
                solver::solve(&solver::SpringAngle, &mut data, iterations, frame_position)
            }
            BendingModel::PbdAngle => {
                solver::solve(&solver::PbdAngle, &mut data, iterations, frame_position)
            }
            BendingModel::XpbdAngle => {
                solver::solve(&solver::XpbdAngle, &mut data, iterations, frame_position)
            }
        }

        Ok(())
    }

    /// Move every particle back to its initial position relative to the reference frame
    /// at `frame_position` and stop all motion.
    pub fn reset(&mut self, frame_position: m::Vec2) {
        self.particles.reset(frame_position);
        for constraint in &mut self.bend {
            constraint.lambda = 0.0;
        }
        log::debug!("rope reset to frame position {frame_position:?}");
    }

    /// Change the velocity of a particle by `impulse` divided by its mass.
    /// Pinned particles are not affected.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn apply_impulse(&mut self, index: usize, impulse: m::Vec2) {
        let inv_mass = self.particles.inv_masses[index];
        self.particles.velocities[index] += inv_mass * impulse;
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn positions(&self) -> &[m::Vec2] {
        &self.particles.positions
    }

    #[inline]
    pub fn velocities(&self) -> &[m::Vec2] {
        &self.particles.velocities
    }

    /// Inverse masses of the particles, zero for pinned ones.
    #[inline]
    pub fn inverse_masses(&self) -> &[f64] {
        &self.particles.inv_masses
    }

    /// Offsets of the particles from the reference frame at creation time.
    #[inline]
    pub fn bind_offsets(&self) -> &[m::Vec2] {
        &self.particles.bind_offsets
    }

    /// # Panics
    ///
    /// If `index` is out of range.
    #[inline]
    pub fn is_pinned(&self, index: usize) -> bool {
        self.particles.is_pinned(index)
    }

    #[inline]
    pub fn stretch_constraints(&self) -> &[StretchConstraint] {
        &self.stretch
    }

    #[inline]
    pub fn bend_constraints(&self) -> &[BendConstraint] {
        &self.bend
    }

    /// Total kinetic energy of the dynamic particles.
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.kinetic_energy()
    }

    /// Draw the rope's segments and particles.
    pub fn draw(&self, draw: &mut impl DebugDraw) {
        for (p1, p2) in self.positions().iter().tuple_windows() {
            draw.draw_segment(*p1, *p2, debug::SEGMENT_COLOR);
        }
        for (idx, pos) in self.positions().iter().enumerate() {
            let color = if self.is_pinned(idx) {
                debug::PINNED_COLOR
            } else {
                debug::DYNAMIC_COLOR
            };
            draw.draw_point(*pos, debug::POINT_SIZE, color);
        }
    }
}
