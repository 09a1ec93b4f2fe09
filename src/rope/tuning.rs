//! Solver parameters that can be swapped out between steps.

/// Which formulation is used to keep a rope from bending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub enum BendingModel {
    /// No resistance to bending at all, the rope behaves like a chain.
    None,
    /// Explicit spring-damper applied to velocities once per step,
    /// parameterized by `bend_hertz` and `bend_damping`.
    SpringAngle,
    /// Position projection toward the rest angle.
    /// `bend_stiffness` is the fraction of the error corrected per iteration,
    /// so the effective stiffness depends on the iteration count.
    #[default]
    PbdAngle,
    /// Compliant position projection with an accumulated multiplier,
    /// parameterized by `bend_hertz` and `bend_damping`.
    XpbdAngle,
}

/// Tuning parameters for the rope solver.
///
/// These can be replaced at any time between steps with
/// [`Rope::set_tuning`][crate::Rope::set_tuning].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct RopeTuning {
    /// Exponential decay rate of particle velocities, per second.
    pub damping: f64,
    /// Fraction of the stretch error corrected per iteration, typically in `[0, 1]`.
    pub stretch_stiffness: f64,
    pub bending_model: BendingModel,
    /// Used by [`BendingModel::PbdAngle`].
    pub bend_stiffness: f64,
    /// Natural frequency of the angular spring,
    /// used by [`BendingModel::SpringAngle`] and [`BendingModel::XpbdAngle`].
    pub bend_hertz: f64,
    /// Damping ratio of the angular spring,
    /// used by [`BendingModel::SpringAngle`] and [`BendingModel::XpbdAngle`].
    pub bend_damping: f64,
}

impl Default for RopeTuning {
    fn default() -> Self {
        Self {
            damping: 0.0,
            stretch_stiffness: 1.0,
            bending_model: BendingModel::default(),
            bend_stiffness: 0.5,
            bend_hertz: 1.0,
            bend_damping: 0.0,
        }
    }
}

impl RopeTuning {
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_stretch_stiffness(mut self, stiffness: f64) -> Self {
        self.stretch_stiffness = stiffness;
        self
    }

    pub fn with_bending_model(mut self, model: BendingModel) -> Self {
        self.bending_model = model;
        self
    }

    pub fn with_bend_stiffness(mut self, stiffness: f64) -> Self {
        self.bend_stiffness = stiffness;
        self
    }

    /// Set both parameters of the angular spring used by the spring and XPBD models.
    pub fn with_bend_spring(mut self, hertz: f64, damping_ratio: f64) -> Self {
        self.bend_hertz = hertz;
        self.bend_damping = damping_ratio;
        self
    }

    /// Log a warning for every parameter outside of its sensible range.
    /// Out-of-range values are still used as given.
    pub(crate) fn warn_unusual(&self) {
        if !(0.0..=1.0).contains(&self.stretch_stiffness) {
            log::warn!(
                "stretch_stiffness {} is outside [0, 1], the stretch solver may overshoot",
                self.stretch_stiffness
            );
        }
        if self.damping < 0.0 {
            log::warn!("negative damping {} adds energy every step", self.damping);
        }
        if self.bend_hertz < 0.0 || self.bend_damping < 0.0 {
            log::warn!(
                "negative bend spring parameters (hertz {}, damping {})",
                self.bend_hertz,
                self.bend_damping
            );
        }
    }
}
