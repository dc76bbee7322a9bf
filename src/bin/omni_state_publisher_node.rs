// Emulates the joint state feed of a Sensable Omni / 3DS Touch when no
// physical device is attached. Following the CRTK naming convention the
// state is published on `measured_js`; a downstream `joint_state_publisher`
// is expected to rename the feed to `joint_states` (and pick its own rate)
// for the `robot_state_publisher`.

use anyhow::{Error, Result};
use omni_core::publisher::{JointStateSink, PublishError, PublishLoop, PublishLoopConfig};
use omni_core::state::JointState;
use omni_core::OmniCore;
use rclrs::{
    Context, CreateBasicExecutor, IntoPrimitiveOptions, RclrsErrorFilter, SpinOptions,
    QOS_PROFILE_DEFAULT,
};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::UNIX_EPOCH;

// Import the message types directly from the crates
use builtin_interfaces::msg::Time;
use sensor_msgs::msg::JointState as JointStateMsg;
use std_msgs::msg::Header;

/// Adapts the ROS 2 publisher to the core's sink capability
struct RosJointStateSink {
    publisher: rclrs::Publisher<JointStateMsg>,
}

impl JointStateSink for RosJointStateSink {
    fn publish(&mut self, state: &JointState) -> Result<(), PublishError> {
        let mut msg = JointStateMsg::default();

        let elapsed = state.stamp.duration_since(UNIX_EPOCH).unwrap_or_default();
        let mut header = Header::default();
        header.stamp = Time {
            sec: elapsed.as_secs() as i32,
            nanosec: elapsed.subsec_nanos(),
        };
        msg.header = header;
        msg.name = state.names.iter().map(|name| name.to_string()).collect();
        msg.position = state.positions.to_vec();

        self.publisher
            .publish(&msg)
            .map_err(|e| PublishError(e.to_string()))
    }
}

fn main() -> Result<(), Error> {
    println!("Initializing Omni state publisher node...");

    // Create the ROS 2 context and executor
    let mut executor = Context::default_from_env()?.create_basic_executor();
    let node = executor.create_node("state_publisher")?;

    // Default parameters
    let config = PublishLoopConfig::default();
    let joint_state_topic = "measured_js".to_string();

    println!(
        "Using parameters: rate_hz={}, counter_step={}",
        config.rate_hz, config.counter_step
    );
    println!("Topics: joint_state={}", joint_state_topic);

    let joint_state_publisher =
        node.create_publisher::<JointStateMsg>(joint_state_topic.qos(QOS_PROFILE_DEFAULT))?;

    let mut core = OmniCore::new();
    core.register(PublishLoop::with_sink(
        config,
        RosJointStateSink {
            publisher: joint_state_publisher,
        },
    ));

    if let Err(e) = core.init() {
        eprintln!("Failed to initialize core: {}", e);
    }

    println!("state_publisher started");

    // Spin the executor on a worker thread; once the context shuts down
    // (Ctrl-C) the running flag is cleared and the loop below exits
    let running = Arc::new(Mutex::new(true));
    let running_clone = Arc::clone(&running);
    let spin_handle = thread::spawn(move || {
        let spin_result = executor.spin(SpinOptions::default()).first_error();
        *running_clone.lock().unwrap() = false;
        spin_result
    });

    // Run the publish loop on the main thread so a sink failure ends the
    // process instead of idling behind the executor
    let loop_result = match core.publish_loop_mut() {
        Some(publish_loop) => publish_loop.run(&running),
        None => Ok(()),
    };

    if let Err(e) = core.shutdown() {
        eprintln!("Failed to shutdown core: {}", e);
    }

    match loop_result {
        Ok(()) => {
            println!("Publish loop stopped");
            match spin_handle.join() {
                Ok(spin_result) => spin_result.map_err(|err| err.into()),
                Err(_) => {
                    eprintln!("Executor thread panicked");
                    Ok(())
                }
            }
        }
        // The executor may still be spinning; returning tears it down
        Err(e) => {
            eprintln!("Publish loop failed: {}", e);
            Err(e.into())
        }
    }
}
