use std::any::TypeId;

use tracing::{debug, trace};

use crate::component::{Component, Storage};
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;
use crate::resource::Resources;
use crate::storages::Storages;
use crate::system::{System, SystemSchedule};
use crate::view::{intersect_into, ComponentTuple};

/// The central ECS container. Owns the entity counter, every component
/// storage, the system schedule and the resources.
///
/// There is no global instance; drivers create a registry and pass it to
/// whatever needs it.
#[derive(Default)]
pub struct Registry {
    entities: EntityAllocator,
    storages: Storages,
    schedule: SystemSchedule,
    resources: Resources,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            storages: Storages::new(),
            schedule: SystemSchedule::new(),
            resources: Resources::new(),
        }
    }

    // ---- Entity management ----

    /// Create a new entity with no components.
    pub fn create(&mut self) -> Entity {
        self.entities.create()
    }

    /// Remove every component the entity has. The id is not reused.
    ///
    /// Returns the number of components dropped; removing an entity that has
    /// nothing left is a no-op.
    pub fn remove(&mut self, entity: Entity) -> usize {
        let removed = self.storages.remove_entity(entity);
        if removed > 0 {
            debug!(%entity, components = removed, "removed entity");
        }
        removed
    }

    /// Whether this registry issued `entity`.
    pub fn is_issued(&self, entity: Entity) -> bool {
        self.entities.is_issued(entity)
    }

    /// Number of entity ids issued so far.
    pub fn entity_count(&self) -> u32 {
        self.entities.issued()
    }

    // ---- Component management ----

    #[track_caller]
    fn assert_issued(&self, entity: Entity) {
        assert!(
            self.entities.is_issued(entity),
            "entity {entity:?} was not issued by this registry"
        );
    }

    /// Read-only access to the storage for `T`, or `None` if no `T` was ever
    /// stored. Writes go through `emplace`, `replace` and `remove_component`.
    pub fn storage<T: Component>(&self) -> Option<&Storage<T>> {
        self.storages.storage::<T>()
    }

    /// Attach a component. If the entity already has a `T` this is a no-op
    /// and `false` is returned; use [`Registry::replace`] to overwrite.
    ///
    /// # Panics
    /// Panics if `entity` was not issued by this registry.
    #[track_caller]
    pub fn emplace<T: Component>(&mut self, entity: Entity, component: T) -> bool {
        self.assert_issued(entity);
        self.storages.storage_for::<T>().insert(entity, component)
    }

    /// Attach or overwrite a component, returning the previous value.
    ///
    /// Overwriting never moves other entities' slots, so it is safe while
    /// iterating a view over the same type.
    ///
    /// # Panics
    /// Panics if `entity` was not issued by this registry.
    #[track_caller]
    pub fn replace<T: Component>(&mut self, entity: Entity, component: T) -> Option<T> {
        self.assert_issued(entity);
        self.storages.storage_for::<T>().replace(entity, component)
    }

    /// Detach and return a single component.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storages.storage_mut::<T>()?.take(entity)
    }

    /// Check whether an entity has a component of the given type.
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.storages
            .storage::<T>()
            .is_some_and(|s| s.has(entity))
    }

    /// Get a component, or an error describing why it is unavailable.
    pub fn try_get<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        if !self.entities.is_issued(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.storages
            .storage::<T>()
            .and_then(|s| s.get(entity))
            .ok_or_else(|| EcsError::MissingComponent {
                entity,
                component: std::any::type_name::<T>(),
            })
    }

    /// Mutable counterpart of [`Registry::try_get`].
    pub fn try_get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        if !self.entities.is_issued(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.storages
            .storage_mut::<T>()
            .and_then(|s| s.get_mut(entity))
            .ok_or_else(|| EcsError::MissingComponent {
                entity,
                component: std::any::type_name::<T>(),
            })
    }

    /// Get a component the entity is known to have.
    ///
    /// # Panics
    /// Panics if the entity has no `T`.
    #[track_caller]
    pub fn get<T: Component>(&self, entity: Entity) -> &T {
        match self.try_get(entity) {
            Ok(component) => component,
            Err(err) => panic!("{err}"),
        }
    }

    /// Mutable counterpart of [`Registry::get`].
    ///
    /// # Panics
    /// Panics if the entity has no `T`.
    #[track_caller]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        match self.try_get_mut(entity) {
            Ok(component) => component,
            Err(err) => panic!("{err}"),
        }
    }

    // ---- Views ----

    /// Entities that have every component in `Q`.
    ///
    /// The smallest of the involved storages drives iteration; the result
    /// follows its current dense order.
    ///
    /// # Example
    /// ```ignore
    /// for entity in registry.view::<(Transform, Velocity)>() {
    ///     let step = registry.get::<Velocity>(entity).step(dt);
    ///     registry.get_mut::<Transform>(entity).translate(step);
    /// }
    /// ```
    pub fn view<Q: ComponentTuple>(&self) -> Vec<Entity> {
        let mut out = Vec::new();
        Q::collect_matching(&self.storages, &mut out);
        out
    }

    /// Like [`Registry::view`], but refills a caller-owned buffer.
    pub fn view_into<Q: ComponentTuple>(&self, out: &mut Vec<Entity>) {
        Q::collect_matching(&self.storages, out);
    }

    /// View over a runtime list of component types. An empty list matches nothing.
    pub fn view_dynamic(&self, types: &[TypeId]) -> Vec<Entity> {
        let sets: Vec<_> = types.iter().map(|&t| self.storages.erased(t)).collect();
        let mut out = Vec::new();
        intersect_into(&sets, &mut out);
        out
    }

    /// Number of component types with a storage.
    pub fn storage_count(&self) -> usize {
        self.storages.len()
    }

    // ---- Systems ----

    /// Append a system to the schedule.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.schedule.add_system(system);
    }

    /// Number of registered systems.
    pub fn system_count(&self) -> usize {
        self.schedule.len()
    }

    /// Run every registered system once, in registration order.
    ///
    /// Systems added while the schedule runs take part from the next call on.
    pub fn update(&mut self) {
        let mut schedule = std::mem::take(&mut self.schedule);
        schedule.run_all(self);
        schedule.append(&mut self.schedule);
        self.schedule = schedule;
    }

    /// Advance the frame clock by `raw_delta` seconds, then run [`Registry::update`].
    ///
    /// Without a [`GameTime`](mocha_core::GameTime) resource a default clock is started.
    pub fn tick(&mut self, raw_delta: f32) {
        let delta = self.resources.advance_clock(raw_delta);
        trace!(delta, "tick");
        self.update();
    }

    /// Clamped, scaled delta of the current frame (0.0 before the first tick).
    pub fn delta_time(&self) -> f32 {
        self.resources.frame_delta()
    }

    // ---- Resources ----

    /// Insert a singleton resource, returning the one it replaces.
    pub fn insert_resource<T: 'static + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.resources.insert(value)
    }

    /// Get an immutable reference to a resource.
    pub fn resource<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.resources.get::<T>()
    }

    /// Get a mutable reference to a resource.
    pub fn resource_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.resources.get_mut::<T>()
    }

    /// Remove a resource.
    pub fn remove_resource<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.resources.remove::<T>()
    }

    /// Whether a resource of type `T` is stored.
    pub fn contains_resource<T: 'static + Send + Sync>(&self) -> bool {
        self.resources.contains::<T>()
    }
}
