//! Trajectory generation for the simulated arm

use crate::common::types::{JointPositions, JOINT_COUNT};

/// Amplitude of the joint oscillation in degrees
const AMPLITUDE_DEG: f64 = 20.0;

// Static offsets so the arm doesn't hit itself
const SHOULDER_OFFSET_DEG: f64 = 20.0;
const ELBOW_OFFSET_DEG: f64 = 20.0;
const PITCH_OFFSET_DEG: f64 = 50.0;

/// Maps an elapsed-time counter to the six joint positions
///
/// Stateless: the same counter always yields the same positions, so the
/// trajectory can be replayed exactly.
pub struct TrajectoryGenerator;

impl TrajectoryGenerator {
    /// Create a new trajectory generator
    pub fn new() -> Self {
        TrajectoryGenerator
    }

    /// Generate the joint positions (radians) for the given counter value
    pub fn generate(&self, counter: f64) -> JointPositions {
        let base = AMPLITUDE_DEG.to_radians() * counter.cos();
        let mut positions = [base; JOINT_COUNT];

        positions[1] += SHOULDER_OFFSET_DEG.to_radians();
        positions[2] += ELBOW_OFFSET_DEG.to_radians();
        positions[4] += PITCH_OFFSET_DEG.to_radians();

        positions
    }
}

impl Default for TrajectoryGenerator {
    fn default() -> Self {
        TrajectoryGenerator::new()
    }
}
