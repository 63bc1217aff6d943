//! Control layer: pressure→setpoint mapping and actuation blending.

pub mod blender;
pub mod setpoint;

pub use blender::{ActuationBlender, ActuatorCommand};
pub use setpoint::SetpointMapper;
