use omni_core::publisher::{JointStateSink, PublishError, PublishLoop, PublishLoopConfig};
use omni_core::state::JointState;
use omni_core::trajectory::TrajectoryGenerator;
use omni_core::OmniCore;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Prints every tenth joint state instead of publishing to a topic
struct StdoutSink {
    ticks: usize,
}

impl JointStateSink for StdoutSink {
    fn publish(&mut self, state: &JointState) -> Result<(), PublishError> {
        self.ticks += 1;
        if self.ticks % 10 == 0 {
            println!("tick {}: positions={:?}", self.ticks, state.positions);
        }
        Ok(())
    }
}

fn main() {
    println!("Initializing Omni Core...");

    // Spot-check the trajectory before starting the loop
    let generator = TrajectoryGenerator::new();
    println!("Trajectory at counter=0: {:?}", generator.generate(0.0));

    let mut core = OmniCore::new();
    let config = PublishLoopConfig {
        rate_hz: 100.0,
        counter_step: 0.001,
    };
    core.register(PublishLoop::with_sink(config, StdoutSink { ticks: 0 }));

    match core.init() {
        Ok(_) => println!("Core initialized successfully!"),
        Err(e) => {
            println!("Failed to initialize core: {}", e);
            return;
        }
    }

    // Let the loop run briefly, then request a clean shutdown
    let running = Arc::new(Mutex::new(true));
    let running_clone = Arc::clone(&running);
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(500));
        *running_clone.lock().unwrap() = false;
    });

    if let Some(publish_loop) = core.publish_loop_mut() {
        match publish_loop.run(&running) {
            Ok(_) => println!(
                "Publish loop stopped cleanly at counter={:.3}",
                publish_loop.counter()
            ),
            Err(e) => println!("Publish loop failed: {}", e),
        }
    }

    match core.shutdown() {
        Ok(_) => println!("Core shutdown successfully!"),
        Err(e) => println!("Failed to shutdown core: {}", e),
    }
}
