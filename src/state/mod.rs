//! Joint state values produced by the publish loop

use std::time::SystemTime;

use crate::common::types::{JointPositions, JOINT_COUNT};

/// Joint names in the order expected by the Omni URDF
///
/// Order is significant: downstream visualizers pair these positionally
/// with the position vector.
pub const JOINT_NAMES: [&str; JOINT_COUNT] =
    ["waist", "shoulder", "elbow", "yaw", "pitch", "roll"];

/// A timestamped joint state for the six-joint Omni chain
#[derive(Debug, Clone)]
pub struct JointState {
    pub names: [&'static str; JOINT_COUNT],
    pub positions: JointPositions,
    pub stamp: SystemTime,
}

impl JointState {
    /// Create a joint state with all positions at zero
    pub fn new() -> Self {
        JointState {
            names: JOINT_NAMES,
            positions: [0.0; JOINT_COUNT],
            stamp: SystemTime::now(),
        }
    }
}

impl Default for JointState {
    fn default() -> Self {
        JointState::new()
    }
}
