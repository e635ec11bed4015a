//! Model, data, configuration and error types.

mod config;
mod data;
mod enums;
mod model;
mod model_factories;
mod model_init;
pub mod validation;

pub use config::{CrbaConfig, MassMatrixFill};
pub use data::Data;
pub use enums::{CrbaError, JointError, ModelError};
pub use model::Model;
pub use model_init::UNIVERSE_NAME;
