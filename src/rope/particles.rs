use crate::math as m;

/// Per-particle state of a rope, stored as parallel arrays
/// that are allocated once when the rope is created.
#[derive(Clone, Debug)]
pub(crate) struct Particles {
    pub positions: Vec<m::Vec2>,
    /// Positions at the start of the current step,
    /// velocity is reconstructed from the displacement from these.
    pub prev_positions: Vec<m::Vec2>,
    pub velocities: Vec<m::Vec2>,
    /// Zero for pinned particles.
    pub inv_masses: Vec<f64>,
    /// Position relative to the rope's reference frame at creation time.
    /// Pinned particles are driven toward `bind_offset + frame position`.
    pub bind_offsets: Vec<m::Vec2>,
}

impl Particles {
    /// Place particles at `origin + vertex`.
    /// Zero or negative masses produce pinned particles.
    pub fn new(origin: m::Vec2, vertices: &[m::Vec2], masses: &[f64]) -> Self {
        debug_assert_eq!(vertices.len(), masses.len());

        let positions: Vec<m::Vec2> = vertices.iter().map(|v| origin + *v).collect();
        let inv_masses = masses
            .iter()
            .map(|&mass| if mass > 0.0 { 1.0 / mass } else { 0.0 })
            .collect();

        Self {
            prev_positions: positions.clone(),
            positions,
            velocities: vec![m::Vec2::zero(); vertices.len()],
            inv_masses,
            bind_offsets: vertices.to_vec(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_pinned(&self, idx: usize) -> bool {
        self.inv_masses[idx] == 0.0
    }

    /// Move every particle to its bind position in the given frame and stop it.
    pub fn reset(&mut self, frame_position: m::Vec2) {
        for (pos, prev_pos, vel, bind) in itertools::izip!(
            &mut self.positions,
            &mut self.prev_positions,
            &mut self.velocities,
            &self.bind_offsets
        ) {
            *pos = *bind + frame_position;
            *prev_pos = *pos;
            *vel = m::Vec2::zero();
        }
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.velocities
            .iter()
            .zip(&self.inv_masses)
            .filter(|&(_, &im)| im > 0.0)
            .map(|(vel, &im)| 0.5 * vel.mag_sq() / im)
            .sum()
    }
}
