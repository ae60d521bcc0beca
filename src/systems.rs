//! Demo scene and the systems the driver runs each frame
//!
//! The renderer is not part of the driver; [`DrawListSystem`] only gathers
//! what would be submitted to it.

use mocha_core::{Mat4, Quat, RenderHandle, Transform, Vec3, Velocity};
use mocha_ecs::{Command, CommandSystem, Entity, Registry, System};
use tracing::debug;

/// Seconds an entity has left before it is removed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime(pub f32);

/// Marks the entity a [`Command`] keeps pointed at the scene origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera;

/// Model matrices gathered for the renderer this frame
#[derive(Debug, Default)]
pub struct DrawList {
    pub items: Vec<(RenderHandle, Mat4)>,
}

/// Totals the driver reports when the loop ends
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub expired: u32,
    pub peak_draws: usize,
}

/// Integrates velocity into position
#[derive(Default)]
pub struct MovementSystem {
    moving: Vec<Entity>,
}

impl System for MovementSystem {
    fn update(&mut self, registry: &mut Registry) {
        let dt = registry.delta_time();
        registry.view_into::<(Transform, Velocity)>(&mut self.moving);
        for &entity in &self.moving {
            let step = registry.get::<Velocity>(entity).step(dt);
            registry.get_mut::<Transform>(entity).translate(step);
        }
    }

    fn name(&self) -> &str {
        "MovementSystem"
    }
}

/// Counts lifetimes down and removes entities whose time ran out
#[derive(Default)]
pub struct ExpirySystem {
    aging: Vec<Entity>,
}

impl System for ExpirySystem {
    fn update(&mut self, registry: &mut Registry) {
        let dt = registry.delta_time();
        registry.view_into::<(Lifetime,)>(&mut self.aging);

        let mut expired = 0;
        for &entity in &self.aging {
            let lifetime = registry.get_mut::<Lifetime>(entity);
            lifetime.0 -= dt;
            if lifetime.0 <= 0.0 {
                registry.remove(entity);
                expired += 1;
            }
        }

        if expired > 0 {
            debug!(expired, "entities expired");
            if let Some(stats) = registry.resource_mut::<FrameStats>() {
                stats.expired += expired;
            }
        }
    }

    fn name(&self) -> &str {
        "ExpirySystem"
    }
}

/// Gathers render handles with their model matrices
#[derive(Default)]
pub struct DrawListSystem {
    visible: Vec<Entity>,
}

impl System for DrawListSystem {
    fn update(&mut self, registry: &mut Registry) {
        registry.view_into::<(RenderHandle, Transform)>(&mut self.visible);
        let items: Vec<_> = self
            .visible
            .iter()
            .map(|&e| (*registry.get::<RenderHandle>(e), registry.get::<Transform>(e).matrix()))
            .filter(|(handle, _)| handle.is_valid())
            .collect();

        let draws = items.len();
        if let Some(list) = registry.resource_mut::<DrawList>() {
            list.items = items;
        }
        if let Some(stats) = registry.resource_mut::<FrameStats>() {
            stats.peak_draws = stats.peak_draws.max(draws);
        }
    }

    fn name(&self) -> &str {
        "DrawListSystem"
    }
}

/// Populate the registry with `count` moving entities and a camera.
///
/// Every third entity is given a finite lifetime; every other one is drawn.
pub fn spawn_scene(registry: &mut Registry, count: u32) {
    for i in 0..count {
        let e = registry.create();
        let angle = i as f32 * 0.618;
        registry.emplace(e, Transform::from_position(Vec3::new(i as f32, 0.0, 0.0)));
        registry.emplace(e, Velocity::new(Vec3::new(angle.cos(), 0.0, angle.sin())));
        if i % 2 == 0 {
            registry.emplace(e, RenderHandle::new(1, 1));
        }
        if i % 3 == 0 {
            registry.emplace(e, Lifetime(1.0 + (i % 7) as f32));
        }
    }

    let camera = registry.create();
    registry.emplace(camera, Camera);
    registry.emplace(camera, Transform::from_position(Vec3::new(0.0, 10.0, 10.0)));
    registry.emplace(
        camera,
        Command::new(|entity, registry| {
            let transform = registry.get_mut::<Transform>(entity);
            let to_origin = -transform.position;
            if to_origin.length_squared() > 0.0 {
                let turn = Quat::from_rotation_arc(transform.forward(), to_origin.normalize());
                transform.rotate(turn);
            }
        }),
    );
}

/// Register the frame systems in the order they must run.
pub fn register(registry: &mut Registry) {
    registry.add_system(CommandSystem::new());
    registry.add_system(MovementSystem::default());
    registry.add_system(ExpirySystem::default());
    registry.add_system(DrawListSystem::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(count: u32) -> Registry {
        let mut registry = Registry::new();
        registry.insert_resource(DrawList::default());
        registry.insert_resource(FrameStats::default());
        spawn_scene(&mut registry, count);
        register(&mut registry);
        registry
    }

    #[test]
    fn scene_layout() {
        let registry = scene(6);
        assert_eq!(registry.entity_count(), 7);
        assert_eq!(registry.view::<(Transform, Velocity)>().len(), 6);
        assert_eq!(registry.view::<(RenderHandle,)>().len(), 3);
        assert_eq!(registry.view::<(Lifetime,)>().len(), 2);
        assert_eq!(registry.view::<(Camera, Command)>().len(), 1);
        assert_eq!(registry.system_count(), 4);
    }

    #[test]
    fn movers_move_and_draw_list_fills() {
        let mut registry = scene(4);
        let first = Entity::from_raw(0);
        let start = registry.get::<Transform>(first).position;

        registry.tick(0.1);

        assert_ne!(registry.get::<Transform>(first).position, start);
        assert_eq!(registry.resource::<DrawList>().unwrap().items.len(), 2);
    }

    #[test]
    fn lifetimes_expire() {
        let mut registry = scene(3);
        let mortal = Entity::from_raw(0);
        assert_eq!(registry.get::<Lifetime>(mortal), &Lifetime(1.0));

        for _ in 0..5 {
            registry.tick(0.25);
        }

        assert!(!registry.has::<Transform>(mortal));
        assert!(!registry.has::<Lifetime>(mortal));
        assert_eq!(registry.resource::<FrameStats>().unwrap().expired, 1);
        assert_eq!(registry.resource::<DrawList>().unwrap().items.len(), 1);
    }

    #[test]
    fn camera_turns_towards_origin() {
        let mut registry = scene(0);
        let camera = registry.view::<(Camera,)>()[0];
        registry.update();

        let transform = registry.get::<Transform>(camera);
        let expected = (-transform.position).normalize();
        assert!(transform.forward().abs_diff_eq(expected, 1e-4));
    }
}
