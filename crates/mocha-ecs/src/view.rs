use std::any::TypeId;

use crate::component::{Component, ComponentStorage};
use crate::entity::Entity;
use crate::storages::Storages;

/// A tuple of component types that can be viewed together, e.g. `(Position, Velocity)`.
///
/// Implemented for tuples of one to eight component types.
pub trait ComponentTuple: 'static {
    /// `TypeId`s of every member, in declaration order.
    fn type_ids() -> Vec<TypeId>;

    /// Clear `out` and fill it with every entity that has all members.
    fn collect_matching(storages: &Storages, out: &mut Vec<Entity>);
}

macro_rules! impl_component_tuple {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentTuple for ($($name,)+) {
            fn type_ids() -> Vec<TypeId> {
                vec![$(TypeId::of::<$name>()),+]
            }

            fn collect_matching(storages: &Storages, out: &mut Vec<Entity>) {
                let sets = [$(storages.erased(TypeId::of::<$name>())),+];
                intersect_into(&sets, out);
            }
        }
    };
}

impl_component_tuple!(A);
impl_component_tuple!(A, B);
impl_component_tuple!(A, B, C);
impl_component_tuple!(A, B, C, D);
impl_component_tuple!(A, B, C, D, E);
impl_component_tuple!(A, B, C, D, E, F);
impl_component_tuple!(A, B, C, D, E, F, G);
impl_component_tuple!(A, B, C, D, E, F, G, H);

/// Intersect the entity sets of `sets` into `out`.
///
/// The smallest storage drives iteration and every candidate is checked
/// against the others. A `None` entry stands for a type that was never
/// stored, which makes the intersection empty. Output follows the driver's
/// dense order.
pub(crate) fn intersect_into(sets: &[Option<&dyn ComponentStorage>], out: &mut Vec<Entity>) {
    out.clear();

    let mut driver: Option<(usize, &dyn ComponentStorage)> = None;
    for (pos, set) in sets.iter().enumerate() {
        let Some(set) = *set else {
            return;
        };
        if driver.map_or(true, |(_, best)| set.len() < best.len()) {
            driver = Some((pos, set));
        }
    }
    let Some((driver_pos, driver)) = driver else {
        return;
    };

    for &entity in driver.entities() {
        let in_all = sets.iter().enumerate().all(|(pos, set)| {
            pos == driver_pos || matches!(set, Some(other) if other.has(entity))
        });
        if in_all {
            out.push(entity);
        }
    }
}
