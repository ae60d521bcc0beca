use crate::entity::Entity;

/// Errors returned by the fallible registry accessors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    #[error("entity {entity} has no `{component}` component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("entity {0} was not issued by this registry")]
    UnknownEntity(Entity),
}
