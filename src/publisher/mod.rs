//! Fixed-rate publishing of generated joint states

use std::any::Any;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use thiserror::Error;

use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use crate::state::JointState;
use crate::trajectory::TrajectoryGenerator;

/// Error returned when the sink cannot accept a joint state
///
/// Fatal for the current loop run; the caller decides whether to restart.
#[derive(Debug, Error)]
#[error("failed to publish joint state: {0}")]
pub struct PublishError(pub String);

/// Destination for generated joint states
///
/// The sink owns transport and serialization; the loop hands each value
/// over fire-and-forget and keeps no reference to it.
pub trait JointStateSink: Send + Sync {
    /// Forward one joint state
    fn publish(&mut self, state: &JointState) -> Result<(), PublishError>;
}

/// Run state of the publish loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopping,
    Stopped,
}

/// Publish loop configuration, fixed at construction
#[derive(Debug, Clone, Copy)]
pub struct PublishLoopConfig {
    /// Target publish rate in Hz
    pub rate_hz: f64,
    /// Counter increment applied on every tick
    pub counter_step: f64,
}

impl Default for PublishLoopConfig {
    fn default() -> Self {
        PublishLoopConfig {
            rate_hz: 1000.0,
            counter_step: 0.001,
        }
    }
}

/// Drives the trajectory generator at a steady rate and forwards
/// timestamped joint states to the injected sink
pub struct PublishLoop {
    base: LifecycleNodeBase,
    config: PublishLoopConfig,
    generator: TrajectoryGenerator,
    counter: f64,
    loop_state: LoopState,
    // Reused every tick; names are set once, positions and stamp are
    // overwritten before each publish
    state: JointState,
    sink: Box<dyn JointStateSink>,
}

impl PublishLoop {
    /// Create a publish loop that forwards to the given sink
    pub fn with_sink<T: JointStateSink + 'static>(config: PublishLoopConfig, sink: T) -> Self {
        PublishLoop {
            base: LifecycleNodeBase::new("publish_loop"),
            config,
            generator: TrajectoryGenerator::new(),
            counter: 0.0,
            loop_state: LoopState::Stopped,
            state: JointState::new(),
            sink: Box::new(sink),
        }
    }

    /// Current run state of the loop
    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    /// Current value of the trajectory counter
    pub fn counter(&self) -> f64 {
        self.counter
    }

    /// Run until the running flag is cleared or the sink fails
    ///
    /// Cancellation is a normal exit and returns `Ok(())`; a sink failure
    /// stops the loop immediately and is returned to the caller. The flag
    /// is checked once per tick, before anything is forwarded, so no tick
    /// after the signal is observed reaches the sink. Missed ticks are not
    /// made up: after an overrun the schedule restarts from now.
    pub fn run(&mut self, running: &Arc<Mutex<bool>>) -> Result<(), PublishError> {
        let period = Duration::from_secs_f64(1.0 / self.config.rate_hz);
        self.loop_state = LoopState::Running;
        let mut next_tick = Instant::now() + period;

        loop {
            if !*running.lock().unwrap() {
                self.loop_state = LoopState::Stopping;
                break;
            }

            if let Err(e) = self.tick() {
                self.loop_state = LoopState::Stopped;
                return Err(e);
            }

            let now = Instant::now();
            if next_tick > now {
                thread::sleep(next_tick - now);
                next_tick += period;
            } else {
                next_tick = Instant::now() + period;
            }
        }

        self.loop_state = LoopState::Stopped;
        Ok(())
    }

    /// One tick: stamp, advance the counter, generate and forward
    fn tick(&mut self) -> Result<(), PublishError> {
        self.state.stamp = SystemTime::now();
        self.counter += self.config.counter_step;
        self.state.positions = self.generator.generate(self.counter);
        self.sink.publish(&self.state)
    }
}

impl LifecycleNode for PublishLoop {
    fn on_configure(&mut self) -> Result<(), String> {
        println!("Configuring publish loop at {} Hz", self.config.rate_hz);
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<(), String> {
        println!("Activating publish loop");
        self.base.set_state(State::Active);
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<(), String> {
        println!("Deactivating publish loop");
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<(), String> {
        println!("Cleaning up publish loop");
        self.base.set_state(State::Unconfigured);
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::JOINT_NAMES;

    /// Records every published state and clears the running flag after a
    /// fixed number of publishes
    struct RecordingSink {
        published: Arc<Mutex<Vec<JointState>>>,
        running: Arc<Mutex<bool>>,
        stop_after: usize,
    }

    impl JointStateSink for RecordingSink {
        fn publish(&mut self, state: &JointState) -> Result<(), PublishError> {
            let mut published = self.published.lock().unwrap();
            published.push(state.clone());
            if published.len() >= self.stop_after {
                *self.running.lock().unwrap() = false;
            }
            Ok(())
        }
    }

    /// Fails on the nth publish call
    struct FailingSink {
        calls: Arc<Mutex<usize>>,
        fail_on: usize,
    }

    impl JointStateSink for FailingSink {
        fn publish(&mut self, _state: &JointState) -> Result<(), PublishError> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls >= self.fail_on {
                return Err(PublishError("sink rejected the value".to_string()));
            }
            Ok(())
        }
    }

    fn fast_config() -> PublishLoopConfig {
        PublishLoopConfig {
            rate_hz: 10_000.0,
            counter_step: 0.001,
        }
    }

    #[test]
    fn publishes_one_state_per_tick_in_order() {
        let published = Arc::new(Mutex::new(Vec::new()));
        let running = Arc::new(Mutex::new(true));
        let sink = RecordingSink {
            published: Arc::clone(&published),
            running: Arc::clone(&running),
            stop_after: 5,
        };

        let mut publish_loop = PublishLoop::with_sink(fast_config(), sink);
        publish_loop.run(&running).unwrap();

        let published = published.lock().unwrap();
        assert_eq!(published.len(), 5);
        for (i, state) in published.iter().enumerate() {
            let expected_counter = (i + 1) as f64 * 0.001;
            let expected = TrajectoryGenerator::new().generate(expected_counter);
            for (p, e) in state.positions.iter().zip(expected.iter()) {
                assert!((p - e).abs() < 1e-9);
            }
            assert_eq!(state.names, JOINT_NAMES);
        }
        for pair in published.windows(2) {
            assert!(pair[0].stamp <= pair[1].stamp);
            // cos is strictly decreasing on (0, pi), so tick order shows
            // strictly in the unoffset waist joint
            assert!(pair[1].positions[0] < pair[0].positions[0]);
        }
        assert_eq!(publish_loop.loop_state(), LoopState::Stopped);
        assert!((publish_loop.counter() - 0.005).abs() < 1e-9);
    }

    #[test]
    fn cancellation_before_first_tick_publishes_nothing() {
        let published = Arc::new(Mutex::new(Vec::new()));
        let running = Arc::new(Mutex::new(false));
        let sink = RecordingSink {
            published: Arc::clone(&published),
            running: Arc::clone(&running),
            stop_after: usize::MAX,
        };

        let mut publish_loop = PublishLoop::with_sink(fast_config(), sink);
        publish_loop.run(&running).unwrap();

        assert!(published.lock().unwrap().is_empty());
        assert_eq!(publish_loop.loop_state(), LoopState::Stopped);
        assert_eq!(publish_loop.counter(), 0.0);
    }

    #[test]
    fn cancellation_is_not_reported_as_an_error() {
        let published = Arc::new(Mutex::new(Vec::new()));
        let running = Arc::new(Mutex::new(true));
        let sink = RecordingSink {
            published: Arc::clone(&published),
            running: Arc::clone(&running),
            stop_after: 3,
        };

        let mut publish_loop = PublishLoop::with_sink(fast_config(), sink);
        let result = publish_loop.run(&running);

        assert!(result.is_ok());
        assert_eq!(published.lock().unwrap().len(), 3);
    }

    #[test]
    fn sink_failure_stops_the_loop_immediately() {
        let calls = Arc::new(Mutex::new(0));
        let sink = FailingSink {
            calls: Arc::clone(&calls),
            fail_on: 4,
        };
        let running = Arc::new(Mutex::new(true));

        let mut publish_loop = PublishLoop::with_sink(fast_config(), sink);
        let result = publish_loop.run(&running);

        assert!(result.is_err());
        assert_eq!(*calls.lock().unwrap(), 4);
        assert_eq!(publish_loop.loop_state(), LoopState::Stopped);
    }

    #[test]
    fn sink_failure_does_not_wait_for_cancellation() {
        let calls = Arc::new(Mutex::new(0));
        let sink = FailingSink {
            calls: Arc::clone(&calls),
            fail_on: 1,
        };
        let running = Arc::new(Mutex::new(true));

        let mut publish_loop = PublishLoop::with_sink(fast_config(), sink);
        let result = publish_loop.run(&running);

        // The failure surfaces on its own; no shutdown signal was sent
        assert!(result.is_err());
        assert!(*running.lock().unwrap());
        assert_eq!(*calls.lock().unwrap(), 1);
    }
}
