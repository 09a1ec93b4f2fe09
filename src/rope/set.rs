use super::Rope;
use crate::{math as m, RopeError};

use thunderdome as td;

/// Key type to look up a rope stored in a [`RopeSet`][self::RopeSet].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RopeKey(pub(super) td::Index);

impl RopeKey {
    /// Get the underlying [`thunderdome::Index`][thunderdome::Index] of this key.
    /// Useful for creating your own mappings from ropes to other things.
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }
}

/// Manager struct holding any number of independent ropes.
#[derive(Clone, Debug, Default)]
pub struct RopeSet {
    ropes: td::Arena<Rope>,
}

impl RopeSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn insert(&mut self, rope: Rope) -> RopeKey {
        RopeKey(self.ropes.insert(rope))
    }

    /// Access a Rope, if it still exists.
    #[inline]
    pub fn get(&self, key: RopeKey) -> Option<&Rope> {
        self.ropes.get(key.0)
    }

    /// Mutably access a Rope, if it still exists.
    #[inline]
    pub fn get_mut(&mut self, key: RopeKey) -> Option<&mut Rope> {
        self.ropes.get_mut(key.0)
    }

    /// Remove a Rope, returning it if it still existed.
    #[inline]
    pub fn remove(&mut self, key: RopeKey) -> Option<Rope> {
        self.ropes.remove(key.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ropes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ropes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RopeKey, &Rope)> {
        self.ropes.iter().map(|(idx, rope)| (RopeKey(idx), rope))
    }

    #[inline]
    pub fn clear(&mut self) {
        self.ropes.clear();
    }

    /// Step every rope with the same timestep and iteration count.
    /// `frame_position` gives the reference frame position for each rope.
    ///
    /// The timestep is validated before any rope is touched.
    /// With the `parallel` feature, ropes are stepped on the rayon thread pool.
    pub fn step_all<F>(
        &mut self,
        dt: f64,
        iterations: usize,
        frame_position: F,
    ) -> Result<(), RopeError>
    where
        F: Fn(RopeKey) -> m::Vec2 + Sync,
    {
        if !dt.is_finite() || dt < 0.0 {
            return Err(RopeError::InvalidTimestep { dt });
        }
        let _span = tracy_span!("step all ropes", "step_all");

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let ropes: Vec<(td::Index, &mut Rope)> = self.ropes.iter_mut().collect();
            ropes.into_par_iter().try_for_each(|(idx, rope)| {
                rope.step(dt, iterations, frame_position(RopeKey(idx)))
            })
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.ropes.iter_mut().try_for_each(|(idx, rope)| {
                rope.step(dt, iterations, frame_position(RopeKey(idx)))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rope::{BendingModel, RopeDef, RopeTuning};

    fn hanging_rope() -> Rope {
        let def = RopeDef::line(m::Vec2::zero(), m::Vec2::new(2.0, 0.0), 4, 1.0)
            .pinned(0)
            .with_gravity(m::Vec2::new(0.0, -10.0))
            .with_tuning(RopeTuning::default().with_bending_model(BendingModel::XpbdAngle));
        Rope::new(&def).expect("valid definition")
    }

    #[test]
    fn insert_get_remove() {
        let mut set = RopeSet::new();
        let k1 = set.insert(hanging_rope());
        let k2 = set.insert(hanging_rope());
        assert_eq!(set.len(), 2);
        assert!(set.get(k1).is_some());

        assert!(set.remove(k1).is_some());
        assert!(set.get(k1).is_none());
        assert!(set.remove(k1).is_none());
        itertools::assert_equal(set.iter().map(|(k, _)| k), [k2]);

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn step_all_uses_each_frame() {
        let mut set = RopeSet::new();
        let k1 = set.insert(hanging_rope());
        let k2 = set.insert(hanging_rope());
        let frame = |key: RopeKey| {
            if key == k1 {
                m::Vec2::new(1.0, 0.0)
            } else {
                m::Vec2::new(0.0, 3.0)
            }
        };

        for _ in 0..10 {
            set.step_all(1.0 / 60.0, 8, frame).expect("valid timestep");
        }

        for key in [k1, k2] {
            let pinned = set.get(key).expect("still exists").positions()[0];
            assert!((pinned - frame(key)).mag() < 1e-9, "{pinned:?}");
        }
    }

    #[test]
    fn step_all_rejects_bad_timestep_up_front() {
        let mut set = RopeSet::new();
        let key = set.insert(hanging_rope());
        let before = set.get(key).expect("exists").positions().to_vec();

        assert_eq!(
            set.step_all(-0.1, 4, |_| m::Vec2::zero()),
            Err(RopeError::InvalidTimestep { dt: -0.1 })
        );
        assert_eq!(set.get(key).expect("exists").positions(), &before[..]);
    }
}
