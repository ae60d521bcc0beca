//! Mocha ECS - Entity Component System
//!
//! A small ECS built around one sparse-set storage per component type.
//! Entities are plain monotonically increasing ids, views intersect the
//! storages of the requested types driven by the smallest one, and systems
//! run in registration order once per frame.

mod command;
mod component;
mod entity;
mod error;
mod registry;
mod resource;
mod shared;
mod storages;
mod system;
mod view;

pub use command::{Command, CommandSystem};
pub use component::{Component, ComponentStorage, Storage};
pub use entity::{Entity, EntityAllocator};
pub use error::EcsError;
pub use registry::Registry;
pub use resource::Resources;
pub use shared::SharedRegistry;
pub use storages::Storages;
pub use system::{System, SystemSchedule};
pub use view::ComponentTuple;
