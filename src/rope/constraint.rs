//! Constraint tables derived from the initial shape of a rope.

use crate::math as m;
use itertools::Itertools;

/// Distance constraint between particles `i` and `i + 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StretchConstraint {
    /// Distance between the particles when the rope was created.
    pub rest_length: f64,
}

/// Angle constraint over particles `i`, `i + 1` and `i + 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BendConstraint {
    /// Target signed angle from edge `(i, i+1)` to edge `(i+1, i+2)`, in `(-π, π]`.
    pub rest_angle: f64,
    /// Multiplier accumulated by the XPBD bending solver.
    ///
    /// Zeroed at the start of every step and only written by
    /// [`BendingModel::XpbdAngle`][crate::BendingModel::XpbdAngle];
    /// meaningless for the other bending models.
    pub lambda: f64,
}

pub(crate) fn stretch_table(positions: &[m::Vec2]) -> Vec<StretchConstraint> {
    positions
        .iter()
        .tuple_windows()
        .map(|(p1, p2)| StretchConstraint {
            rest_length: (*p2 - *p1).mag(),
        })
        .collect()
}

pub(crate) fn bend_table(positions: &[m::Vec2]) -> Vec<BendConstraint> {
    positions
        .iter()
        .tuple_windows()
        .map(|(p1, p2, p3)| BendConstraint {
            rest_angle: m::signed_angle(*p2 - *p1, *p3 - *p2),
            lambda: 0.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn tables_from_shape() {
        let positions = [
            m::Vec2::new(0.0, 0.0),
            m::Vec2::new(2.0, 0.0),
            m::Vec2::new(2.0, 1.0),
            m::Vec2::new(5.0, 1.0),
        ];
        let stretch = stretch_table(&positions);
        itertools::assert_equal(stretch.iter().map(|c| c.rest_length), [2.0, 1.0, 3.0]);

        let bend = bend_table(&positions);
        assert_eq!(bend.len(), 2);
        assert!((bend[0].rest_angle - PI / 2.0).abs() < 1e-12);
        assert!((bend[1].rest_angle + PI / 2.0).abs() < 1e-12);
        assert!(bend.iter().all(|c| c.lambda == 0.0));
    }

    #[test]
    fn folded_back_is_pi() {
        let positions = [m::Vec2::zero(), m::Vec2::unit_x(), m::Vec2::zero()];
        let bend = bend_table(&positions);
        assert!((bend[0].rest_angle - PI).abs() < 1e-12);
    }
}
