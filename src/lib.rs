//! Position-based simulation of ropes, chains and strands in 2D.
//!
//! Start from a [`RopeDef`][crate::RopeDef], create a [`Rope`][crate::Rope] from it
//! and call [`Rope::step`][crate::Rope::step] once per frame.
//! See the [`rope`][crate::rope] module for details.

#[macro_use]
mod profiling;

pub mod debug;
pub use debug::{Color, DebugDraw, DebugLines};

mod error;
pub use error::RopeError;

pub mod math;
pub use math::{uv, Angle, Vec2};

pub mod rope;
pub use rope::{
    BendConstraint, BendingModel, Rope, RopeDef, RopeKey, RopeSet, RopeTuning, StretchConstraint,
};
