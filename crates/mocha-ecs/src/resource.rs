use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use mocha_core::GameTime;
use tracing::debug;

/// A boxed singleton and the type name it was stored under.
struct Slot {
    name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

impl Slot {
    fn new<T: 'static + Send + Sync>(value: T) -> Self {
        Self {
            name: type_name::<T>(),
            value: Box::new(value),
        }
    }
}

/// Singletons owned by a registry, one per type.
///
/// The frame clock lives here as a [`GameTime`] resource. It is created with
/// default settings on the first [`Resources::advance_clock`] unless the
/// driver inserted a configured one beforehand.
#[derive(Default)]
pub struct Resources {
    slots: HashMap<TypeId, Slot>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, handing back the resource of the same type it displaces.
    pub fn insert<T: 'static + Send + Sync>(&mut self, value: T) -> Option<T> {
        let previous = self.slots.insert(TypeId::of::<T>(), Slot::new(value))?;
        debug!(resource = previous.name, "replaced resource");
        previous.value.downcast().ok().map(|boxed| *boxed)
    }

    pub fn get<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_ref())
    }

    pub fn get_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.slots
            .get_mut(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_mut())
    }

    /// Take a resource out, leaving nothing of that type behind.
    pub fn remove<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        let slot = self.slots.remove(&TypeId::of::<T>())?;
        slot.value.downcast().ok().map(|boxed| *boxed)
    }

    pub fn contains<T: 'static + Send + Sync>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<T>())
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Type names of the stored resources, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.values().map(|slot| slot.name)
    }

    /// Feed one raw frame delta to the clock, creating a default clock first
    /// if none is stored. Returns the delta systems will see this frame.
    pub fn advance_clock(&mut self, raw_delta: f32) -> f32 {
        let slot = self.slots.entry(TypeId::of::<GameTime>()).or_insert_with(|| {
            debug!("no clock resource, starting a default one");
            Slot::new(GameTime::default())
        });
        match slot.value.downcast_mut::<GameTime>() {
            Some(clock) => {
                clock.update(raw_delta);
                clock.delta_time
            }
            None => unreachable!("slot keyed by GameTime holds {}", slot.name),
        }
    }

    /// Delta of the current frame, or 0.0 while there is no clock.
    pub fn frame_delta(&self) -> f32 {
        self.get::<GameTime>().map_or(0.0, |clock| clock.delta_time)
    }
}
