//! Common utilities and types for the Omni simulator

/// Common types and utilities used across the codebase
pub mod types {
    /// Number of joints in the Omni kinematic chain
    pub const JOINT_COUNT: usize = 6;

    /// Joint positions in radians, positionally paired with the joint names
    pub type JointPositions = [f64; JOINT_COUNT];
}
