use std::any::Any;

use crate::entity::Entity;

/// Marker trait for types that can be stored as ECS components.
pub trait Component: 'static + Send + Sync {}

/// Blanket implementation: any `'static + Send + Sync` type is a valid component.
impl<T: 'static + Send + Sync> Component for T {}

/// Type-erased component storage interface.
pub trait ComponentStorage: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Remove the entity's component, if any. Returns `true` if it was present.
    fn remove(&mut self, entity: Entity) -> bool;
    fn has(&self, entity: Entity) -> bool;
    /// Live entities in dense order.
    fn entities(&self) -> &[Entity];
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Name of the stored component type, for diagnostics.
    fn component_name(&self) -> &'static str;
}

/// Sparse-set storage for a single component type. Provides O(1) insert/remove/lookup
/// and dense iteration.
///
/// `sparse[entities[i]] == Some(i)` holds for every dense slot `i`.
///
/// `sparse` is indexed by raw entity id, so it grows to one past the largest
/// id ever inserted and never shrinks. Ids are not recycled, which means a
/// rarely used component attached to a late entity still costs one slot per
/// id issued before it.
pub struct Storage<T> {
    /// Maps entity id → dense index. `None` means the entity has no component.
    sparse: Vec<Option<usize>>,
    /// Packed component values.
    dense: Vec<T>,
    /// Owner of each dense slot.
    entities: Vec<Entity>,
}

impl<T: Component> Storage<T> {
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            entities: Vec::new(),
        }
    }

    fn slot(&self, entity: Entity) -> Option<usize> {
        self.sparse.get(entity.index()).copied().flatten()
    }

    /// Whether the entity has a component in this storage.
    pub fn has(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }

    /// Insert a component for the entity. The first value wins: if the entity
    /// already has one, `value` is dropped and `false` is returned.
    pub fn insert(&mut self, entity: Entity, value: T) -> bool {
        if self.has(entity) {
            return false;
        }
        let idx = entity.index();
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }
        self.sparse[idx] = Some(self.dense.len());
        self.dense.push(value);
        self.entities.push(entity);
        true
    }

    /// Insert or overwrite the entity's component, returning the old value.
    ///
    /// Overwriting writes in place, so no other entity's slot moves.
    pub fn replace(&mut self, entity: Entity, value: T) -> Option<T> {
        match self.slot(entity) {
            Some(dense_idx) => Some(std::mem::replace(&mut self.dense[dense_idx], value)),
            None => {
                self.insert(entity, value);
                None
            }
        }
    }

    /// Swap-remove the entity's component and return it.
    pub fn take(&mut self, entity: Entity) -> Option<T> {
        let dense_idx = self.slot(entity)?;
        self.sparse[entity.index()] = None;

        let last = self.dense.len() - 1;
        if dense_idx != last {
            // Swap-remove: move the last element into the removed slot.
            self.dense.swap(dense_idx, last);
            self.entities.swap(dense_idx, last);
            let moved = self.entities[dense_idx];
            self.sparse[moved.index()] = Some(dense_idx);
        }
        self.entities.pop();
        self.dense.pop()
    }

    /// Get an immutable reference to the component for an entity.
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slot(entity).map(|dense_idx| &self.dense[dense_idx])
    }

    /// Get a mutable reference to the component for an entity.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slot(entity).map(|dense_idx| &mut self.dense[dense_idx])
    }

    /// Iterate over all (entity, &component) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Iterate over all (entity, &mut component) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    /// The dense array of all entities that have this component.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of components stored.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }
}

impl<T: Component> Default for Storage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage for Storage<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove(&mut self, entity: Entity) -> bool {
        self.take(entity).is_some()
    }

    fn has(&self, entity: Entity) -> bool {
        Storage::has(self, entity)
    }

    fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn component_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn e(id: u32) -> Entity {
        Entity::from_raw(id)
    }

    fn assert_packed<T: Component>(set: &Storage<T>) {
        assert_eq!(set.dense.len(), set.entities.len());
        for (i, entity) in set.entities.iter().enumerate() {
            assert_eq!(set.sparse[entity.index()], Some(i), "slot of {entity:?}");
        }
        let live = set.sparse.iter().filter(|s| s.is_some()).count();
        assert_eq!(live, set.entities.len(), "duplicate or stale entity");
    }

    #[test]
    fn insert_and_get() {
        let mut set = Storage::new();
        assert!(set.insert(e(5), 42i32));
        assert_eq!(set.get(e(5)), Some(&42));
        assert_eq!(set.get(e(0)), None);
        assert_eq!(set.get(e(100)), None);
    }

    #[test]
    fn first_insert_wins() {
        let mut set = Storage::new();
        assert!(set.insert(e(0), 1i32));
        assert!(!set.insert(e(0), 2));
        assert_eq!(set.get(e(0)), Some(&1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn replace_overwrites_in_place() {
        let mut set = Storage::new();
        set.insert(e(0), 'a');
        set.insert(e(1), 'b');
        let before = set.entities().to_vec();
        assert_eq!(set.replace(e(0), 'z'), Some('a'));
        assert_eq!(set.entities(), before.as_slice());
        assert_eq!(set.get(e(0)), Some(&'z'));

        assert_eq!(set.replace(e(2), 'c'), None);
        assert_eq!(set.get(e(2)), Some(&'c'));
    }

    #[test]
    fn remove_and_swap() {
        let mut set = Storage::new();
        set.insert(e(1), 'a');
        set.insert(e(2), 'b');
        set.insert(e(3), 'c');
        assert_eq!(set.take(e(1)), Some('a'));
        assert_eq!(set.entities(), &[e(3), e(2)]);
        assert_eq!(set.get(e(1)), None);
        assert_eq!(set.get(e(2)), Some(&'b'));
        assert_eq!(set.get(e(3)), Some(&'c'));
        assert_eq!(set.len(), 2);
        assert_packed(&set);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut set = Storage::new();
        set.insert(e(4), 9u8);
        assert!(ComponentStorage::remove(&mut set, e(4)));
        assert!(!set.has(e(4)));
        assert!(!ComponentStorage::remove(&mut set, e(4)));
        assert!(!ComponentStorage::remove(&mut set, e(400)));
        assert!(set.is_empty());
        assert_packed(&set);
    }

    #[test]
    fn iteration() {
        let mut set = Storage::new();
        set.insert(e(10), 100i32);
        set.insert(e(20), 200);
        for (_, value) in set.iter_mut() {
            *value += 1;
        }
        let mut items: Vec<_> = set.iter().collect();
        items.sort_by_key(|(entity, _)| *entity);
        assert_eq!(items, vec![(e(10), &101), (e(20), &201)]);
    }

    #[test]
    fn random_operations_keep_set_packed() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut set = Storage::new();
        let mut model = std::collections::HashMap::new();

        for step in 0..5_000u32 {
            let entity = e(rng.gen_range(0..64));
            match rng.gen_range(0..3) {
                0 => {
                    let inserted = set.insert(entity, step);
                    assert_eq!(inserted, !model.contains_key(&entity));
                    model.entry(entity).or_insert(step);
                }
                1 => {
                    assert_eq!(set.take(entity), model.remove(&entity));
                }
                _ => {
                    set.replace(entity, step);
                    model.insert(entity, step);
                }
            }
            assert_packed(&set);
            assert_eq!(set.len(), model.len());
        }

        for (entity, value) in &model {
            assert_eq!(set.get(*entity), Some(value));
        }
    }

    #[test]
    fn sparse_grows_to_largest_id() {
        let mut set = Storage::new();
        set.insert(e(999), 'z');
        assert_eq!(set.sparse.len(), 1000);
        assert_eq!(set.len(), 1);

        set.insert(e(3), 'a');
        set.take(e(999));
        assert_eq!(set.sparse.len(), 1000);
        assert_eq!(set.entities(), &[e(3)]);
    }

    #[test]
    fn erased_interface() {
        let mut set = Storage::new();
        set.insert(e(2), 1.5f32);
        let erased: &dyn ComponentStorage = &set;
        assert!(erased.has(e(2)));
        assert_eq!(erased.entities(), &[e(2)]);
        assert_eq!(erased.len(), 1);
        assert_eq!(erased.component_name(), "f32");
        assert!(erased.as_any().downcast_ref::<Storage<f32>>().is_some());
        assert!(erased.as_any().downcast_ref::<Storage<i32>>().is_none());
    }
}
