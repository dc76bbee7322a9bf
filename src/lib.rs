pub mod common;
pub mod lifecycle;
pub mod publisher;
pub mod state;
pub mod trajectory;

use crate::lifecycle::LifecycleNode;
use crate::publisher::PublishLoop;

/// Core functionality for the simulated Omni device
pub struct OmniCore {
    components: Vec<Box<dyn LifecycleNode>>,
}

impl OmniCore {
    /// Create a new instance of OmniCore
    pub fn new() -> Self {
        OmniCore {
            components: Vec::new(),
        }
    }

    /// Register a component with the core
    pub fn register<T: LifecycleNode + 'static>(&mut self, component: T) {
        self.components.push(Box::new(component));
    }

    /// Initialize all registered components
    pub fn init(&mut self) -> Result<(), String> {
        for component in &mut self.components {
            component.on_configure()?;
            component.on_activate()?;
        }
        Ok(())
    }

    /// Shutdown all registered components
    pub fn shutdown(&mut self) -> Result<(), String> {
        for component in &mut self.components {
            component.on_deactivate()?;
            component.on_cleanup()?;
        }
        Ok(())
    }

    /// Get a mutable reference to the registered publish loop, if any
    pub fn publish_loop_mut(&mut self) -> Option<&mut PublishLoop> {
        self.components
            .iter_mut()
            .find_map(|component| component.as_any_mut().downcast_mut::<PublishLoop>())
    }
}

impl Default for OmniCore {
    fn default() -> Self {
        OmniCore::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::{JointStateSink, PublishError, PublishLoopConfig};
    use crate::state::JointState;

    struct NullSink;

    impl JointStateSink for NullSink {
        fn publish(&mut self, _state: &JointState) -> Result<(), PublishError> {
            Ok(())
        }
    }

    #[test]
    fn registered_publish_loop_is_reachable_through_the_core() {
        let mut core = OmniCore::new();
        core.register(PublishLoop::with_sink(PublishLoopConfig::default(), NullSink));

        assert!(core.init().is_ok());
        assert!(core.publish_loop_mut().is_some());
        assert!(core.shutdown().is_ok());
    }
}
