/// An error returned when a rope definition or a step request is invalid.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RopeError {
    #[error("A rope needs at least 3 particles, got {count}")]
    TooFewParticles { count: usize },
    #[error("Rope definition has {vertices} vertices but {masses} masses")]
    MassCountMismatch { vertices: usize, masses: usize },
    #[error("Vertex {index} of the rope definition is not finite")]
    NonFiniteVertex { index: usize },
    #[error("Invalid timestep {dt}, expected a finite non-negative value")]
    InvalidTimestep { dt: f64 },
}
