//! Data preprocessing module
//!
//! Feature scaling applied as the first stage of the win pipeline.

mod scaler;

pub use scaler::{Scaler, ScalerType};
