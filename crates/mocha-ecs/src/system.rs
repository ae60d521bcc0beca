use tracing::trace;

use crate::registry::Registry;

/// A unit of per-frame logic. Systems own no component data; they query the
/// registry every time they run.
pub trait System: Send + Sync {
    fn update(&mut self, registry: &mut Registry);

    /// Name used in trace output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Blanket implementation so closures can be used as systems.
impl<F: FnMut(&mut Registry) + Send + Sync> System for F {
    fn update(&mut self, registry: &mut Registry) {
        (self)(registry);
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// An ordered list of systems to run each frame.
#[derive(Default)]
pub struct SystemSchedule {
    systems: Vec<Box<dyn System>>,
}

impl SystemSchedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Add a system to the end of the schedule. Duplicates are allowed and
    /// run once per registration.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Run all systems in registration order on the given registry.
    pub fn run_all(&mut self, registry: &mut Registry) {
        for system in &mut self.systems {
            trace!(system = system.name(), "running system");
            system.update(registry);
        }
    }

    /// Move every system of `other` to the end of this schedule.
    pub fn append(&mut self, other: &mut SystemSchedule) {
        self.systems.append(&mut other.systems);
    }

    /// Number of systems in the schedule.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Tick(u32);

    struct Ticker;

    impl System for Ticker {
        fn update(&mut self, registry: &mut Registry) {
            for entity in registry.view::<(Tick,)>() {
                registry.get_mut::<Tick>(entity).0 += 1;
            }
        }
    }

    #[test]
    fn closure_system() {
        let mut registry = Registry::new();
        registry.insert_resource(0u32);

        let mut system = |r: &mut Registry| {
            if let Some(count) = r.resource_mut::<u32>() {
                *count += 1;
            }
        };
        system.update(&mut registry);
        assert_eq!(registry.resource::<u32>(), Some(&1));
    }

    #[test]
    fn schedule_ordering() {
        let mut registry = Registry::new();
        let log = Arc::new(Mutex::new(Vec::<u32>::new()));

        let mut schedule = SystemSchedule::new();
        let log1 = log.clone();
        schedule.add_system(move |_: &mut Registry| log1.lock().unwrap().push(1));
        let log2 = log.clone();
        schedule.add_system(move |_: &mut Registry| log2.lock().unwrap().push(2));
        let log3 = log.clone();
        schedule.add_system(move |_: &mut Registry| log3.lock().unwrap().push(3));

        schedule.run_all(&mut registry);
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn struct_system_and_name() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.emplace(e, Tick(0));

        let mut schedule = SystemSchedule::new();
        schedule.add_system(Ticker);
        schedule.add_system(Ticker);
        schedule.run_all(&mut registry);

        assert_eq!(registry.get::<Tick>(e).0, 2);
        assert!(Ticker.name().ends_with("Ticker"));
    }

    #[test]
    fn append_moves_systems() {
        let mut first = SystemSchedule::new();
        let mut second = SystemSchedule::new();
        first.add_system(Ticker);
        second.add_system(Ticker);
        second.add_system(Ticker);
        first.append(&mut second);
        assert_eq!(first.len(), 3);
        assert!(second.is_empty());
    }
}
