use std::fmt;
use std::sync::Arc;

use crate::entity::Entity;
use crate::registry::Registry;
use crate::system::System;

type CommandFn = dyn Fn(Entity, &mut Registry) + Send + Sync;

/// A callback bound to an entity, run once per frame by [`CommandSystem`].
///
/// Cloning is cheap; clones share the same callback.
#[derive(Clone)]
pub struct Command {
    action: Arc<CommandFn>,
}

impl Command {
    pub fn new(action: impl Fn(Entity, &mut Registry) + Send + Sync + 'static) -> Self {
        Self {
            action: Arc::new(action),
        }
    }

    /// Invoke the callback for `entity`.
    pub fn run(&self, entity: Entity, registry: &mut Registry) {
        (self.action)(entity, registry);
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").finish_non_exhaustive()
    }
}

/// Runs every entity's [`Command`] in view order.
///
/// Commands may freely change the registry; a command removed by an earlier
/// one in the same frame is skipped.
#[derive(Debug, Default)]
pub struct CommandSystem {
    pending: Vec<Entity>,
}

impl CommandSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for CommandSystem {
    fn update(&mut self, registry: &mut Registry) {
        registry.view_into::<(Command,)>(&mut self.pending);
        for &entity in &self.pending {
            let Some(command) = registry
                .storage::<Command>()
                .and_then(|s| s.get(entity))
                .cloned()
            else {
                continue;
            };
            command.run(entity, registry);
        }
    }

    fn name(&self) -> &str {
        "CommandSystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    #[test]
    fn commands_run_every_frame() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.emplace(e, Counter(0));
        registry.emplace(
            e,
            Command::new(|entity, registry| registry.get_mut::<Counter>(entity).0 += 1),
        );
        registry.add_system(CommandSystem::new());

        for _ in 0..3 {
            registry.update();
        }
        assert_eq!(registry.get::<Counter>(e).0, 3);
    }

    #[test]
    fn removed_commands_are_skipped() {
        let mut registry = Registry::new();
        let killer = registry.create();
        let victim = registry.create();
        registry.emplace(victim, Counter(0));
        registry.emplace(
            killer,
            Command::new(move |_, registry| {
                registry.remove(victim);
            }),
        );
        registry.emplace(
            victim,
            Command::new(|entity, registry| registry.get_mut::<Counter>(entity).0 += 1),
        );

        let mut system = CommandSystem::new();
        system.update(&mut registry);
        assert!(!registry.has::<Counter>(victim));
        assert!(!registry.has::<Command>(victim));
    }
}
