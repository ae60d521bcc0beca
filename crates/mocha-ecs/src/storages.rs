use std::any::TypeId;
use std::collections::HashMap;

use tracing::debug;

use crate::component::{Component, ComponentStorage, Storage};
use crate::entity::Entity;

/// Owns one [`Storage`] per component type, keyed by the type's `TypeId`.
///
/// Storages are created lazily on first mutable access and live as long as
/// the table. Typed access performs a single checked downcast here so no
/// caller ever handles an untyped storage pointer.
#[derive(Default)]
pub struct Storages {
    map: HashMap<TypeId, Box<dyn ComponentStorage>>,
}

impl Storages {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// The storage for `T`, created empty on first access.
    pub fn storage_for<T: Component>(&mut self) -> &mut Storage<T> {
        self.map
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                debug!(component = std::any::type_name::<T>(), "creating component storage");
                Box::new(Storage::<T>::new())
            })
            .as_any_mut()
            .downcast_mut::<Storage<T>>()
            .expect("component type mismatch")
    }

    /// The storage for `T`, if any component of that type was ever stored.
    pub fn storage<T: Component>(&self) -> Option<&Storage<T>> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<Storage<T>>())
    }

    /// Mutable counterpart of [`Storages::storage`]; never creates.
    pub fn storage_mut<T: Component>(&mut self) -> Option<&mut Storage<T>> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|s| s.as_any_mut().downcast_mut::<Storage<T>>())
    }

    /// The type-erased storage registered under `type_id`.
    pub fn erased(&self, type_id: TypeId) -> Option<&dyn ComponentStorage> {
        self.map.get(&type_id).map(|s| s.as_ref())
    }

    /// Remove `entity` from every storage that holds it. Returns how many
    /// components were dropped.
    pub fn remove_entity(&mut self, entity: Entity) -> usize {
        self.map
            .values_mut()
            .filter(|storage| storage.has(entity))
            .map(|storage| storage.remove(entity))
            .filter(|removed| *removed)
            .count()
    }

    /// Number of component types with a storage.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
