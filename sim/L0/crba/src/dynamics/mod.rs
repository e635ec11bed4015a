//! Dynamics computations: spatial algebra, spatial inertia and CRBA.

pub mod crba;
pub mod inertia;
pub mod spatial;

pub use crba::{crba, crba_with_config};
pub use inertia::SpatialInertia;
pub use spatial::{SpatialTransform, SpatialVector, skew};
