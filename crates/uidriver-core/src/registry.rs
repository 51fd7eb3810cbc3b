//! Named, prioritized controller backends with lazy per-device install.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::debug;

use uidriver_protocols::controller::{ControllerProvider, Priority, UiController};

struct Entry {
    name: String,
    target_device: String,
    priority: Priority,
    controller: Arc<dyn UiController>,
}

#[derive(Default)]
struct Inner {
    entries: Vec<Entry>,
    provider: Option<ControllerProvider>,
    installed_devices: HashSet<String>,
}

/// Ordered set of device controllers guarded by a single mutex.
///
/// Entries are kept sorted by (priority descending, registration order
/// ascending); the stable sort fixes the tie-breaker. All public
/// operations hold the mutex for their duration, including the
/// `is_workable` probes of [`ControllerRegistry::active_controller`].
#[derive(Default)]
pub struct ControllerRegistry {
    inner: Mutex<Inner>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the lazy controller factory.
    pub fn register_provider(&self, provider: ControllerProvider) {
        self.inner.lock().provider = Some(provider);
    }

    /// Add a controller and restore the priority order.
    pub fn register(&self, controller: Arc<dyn UiController>, priority: Priority) {
        debug!(name = controller.name(), ?priority, "registering ui controller");
        let mut inner = self.inner.lock();
        inner.entries.push(Entry {
            name: controller.name().to_string(),
            target_device: controller.target_device().to_string(),
            priority,
            controller,
        });
        inner.entries.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// Remove all controllers with the given name.
    pub fn remove(&self, name: &str) {
        self.inner.lock().entries.retain(|entry| entry.name != name);
    }

    pub fn remove_all(&self) {
        self.inner.lock().entries.clear();
    }

    /// Invoke the provider for `device`, at most once per device.
    pub fn install_for_device(&self, device: &str) {
        let mut inner = self.inner.lock();
        if inner.installed_devices.contains(device) {
            return;
        }
        let provided = match inner.provider.as_ref() {
            Some(provider) => provider(device),
            None => return,
        };
        debug!(device, count = provided.len(), "installing provided ui controllers");
        inner.installed_devices.insert(device.to_string());
        for (controller, priority) in provided {
            inner.entries.push(Entry {
                name: controller.name().to_string(),
                target_device: controller.target_device().to_string(),
                priority,
                controller,
            });
        }
        inner.entries.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// First workable controller whose target device is empty or equals
    /// `device`, in priority order. The probe runs under the lock; the
    /// returned `Arc` stays usable after it is released.
    pub fn active_controller(&self, device: &str) -> Option<Arc<dyn UiController>> {
        let inner = self.inner.lock();
        inner
            .entries
            .iter()
            .find(|entry| {
                (entry.target_device.is_empty() || entry.target_device == device)
                    && entry.controller.is_workable()
            })
            .map(|entry| Arc::clone(&entry.controller))
    }

    /// Registered controller names, in selection order.
    pub fn controller_names(&self) -> Vec<String> {
        self.inner.lock().entries.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-wide registry shared by drivers and engines created without an
/// explicit one.
pub fn global() -> &'static Arc<ControllerRegistry> {
    static GLOBAL: OnceLock<Arc<ControllerRegistry>> = OnceLock::new();
    GLOBAL.get_or_init(|| Arc::new(ControllerRegistry::new()))
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
