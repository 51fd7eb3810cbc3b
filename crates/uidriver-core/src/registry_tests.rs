use super::*;
use parking_lot::Mutex;
use uidriver_protocols::error::ControllerError;

struct StubController {
    name: String,
    device: String,
    workable: Mutex<bool>,
}

impl StubController {
    fn new(name: &str) -> Arc<Self> {
        Self::for_device(name, "")
    }

    fn for_device(name: &str, device: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            device: device.to_string(),
            workable: Mutex::new(true),
        })
    }

    fn set_workable(&self, value: bool) {
        *self.workable.lock() = value;
    }
}

impl UiController for StubController {
    fn name(&self) -> &str {
        &self.name
    }

    fn target_device(&self) -> &str {
        &self.device
    }

    fn current_ui_dom(&self) -> Result<serde_json::Value, ControllerError> {
        Ok(serde_json::json!({"attributes": {}, "children": []}))
    }

    fn is_workable(&self) -> bool {
        *self.workable.lock()
    }
}

#[test]
fn test_empty_registry_has_no_active_controller() {
    let registry = ControllerRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.active_controller("").is_none());
}

#[test]
fn test_priority_ordering() {
    let registry = ControllerRegistry::new();
    registry.register(StubController::new("low"), Priority::Low);
    registry.register(StubController::new("high"), Priority::High);
    registry.register(StubController::new("medium"), Priority::Medium);
    assert_eq!(registry.controller_names(), vec!["high", "medium", "low"]);
    let active = registry.active_controller("").unwrap();
    assert_eq!(active.name(), "high");
}

#[test]
fn test_priority_ties_keep_registration_order() {
    let registry = ControllerRegistry::new();
    registry.register(StubController::new("first"), Priority::Medium);
    registry.register(StubController::new("second"), Priority::Medium);
    registry.register(StubController::new("third"), Priority::Medium);
    assert_eq!(registry.controller_names(), vec!["first", "second", "third"]);
}

#[test]
fn test_unworkable_controllers_are_skipped() {
    let registry = ControllerRegistry::new();
    let broken = StubController::new("broken");
    broken.set_workable(false);
    registry.register(broken, Priority::High);
    registry.register(StubController::new("spare"), Priority::Low);
    assert_eq!(registry.active_controller("").unwrap().name(), "spare");
}

#[test]
fn test_device_filter() {
    let registry = ControllerRegistry::new();
    registry.register(StubController::for_device("phone-ctl", "phone"), Priority::High);
    registry.register(StubController::new("generic"), Priority::Low);
    assert_eq!(registry.active_controller("phone").unwrap().name(), "phone-ctl");
    assert_eq!(registry.active_controller("watch").unwrap().name(), "generic");
}

#[test]
fn test_remove_by_name() {
    let registry = ControllerRegistry::new();
    registry.register(StubController::new("a"), Priority::Medium);
    registry.register(StubController::new("a"), Priority::Low);
    registry.register(StubController::new("b"), Priority::Medium);
    registry.remove("a");
    assert_eq!(registry.controller_names(), vec!["b"]);
    registry.remove_all();
    assert!(registry.is_empty());
}

#[test]
fn test_provider_installs_once_per_device() {
    let registry = ControllerRegistry::new();
    let calls = Arc::new(Mutex::new(Vec::<String>::new()));
    let recorded = Arc::clone(&calls);
    registry.register_provider(Box::new(move |device| {
        recorded.lock().push(device.to_string());
        vec![(
            StubController::for_device("provided", device) as Arc<dyn UiController>,
            Priority::Medium,
        )]
    }));

    registry.install_for_device("phone");
    registry.install_for_device("phone");
    registry.install_for_device("watch");
    assert_eq!(calls.lock().as_slice(), ["phone", "watch"]);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.active_controller("phone").unwrap().name(), "provided");
}

#[test]
fn test_install_without_provider_is_noop() {
    let registry = ControllerRegistry::new();
    registry.install_for_device("phone");
    assert!(registry.is_empty());

    // a provider registered later still serves the device
    registry.register_provider(Box::new(|device| {
        vec![(
            StubController::for_device("late", device) as Arc<dyn UiController>,
            Priority::Medium,
        )]
    }));
    registry.install_for_device("phone");
    assert_eq!(registry.len(), 1);
}
