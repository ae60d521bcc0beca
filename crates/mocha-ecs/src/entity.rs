use std::fmt;

/// An opaque entity identifier. Ids are handed out in increasing order and
/// are never recycled.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(pub(crate) u32);

impl Entity {
    /// Create an entity from a raw id (mainly for testing).
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// The raw id of this entity.
    pub fn id(&self) -> u32 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues monotonically increasing entity ids.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocate the next entity id.
    ///
    /// # Panics
    /// Panics once the `u32` id space is exhausted.
    pub fn create(&mut self) -> Entity {
        let id = self.next;
        self.next = id
            .checked_add(1)
            .expect("entity id space exhausted");
        Entity(id)
    }

    /// Whether `entity` was handed out by this allocator.
    pub fn is_issued(&self, entity: Entity) -> bool {
        entity.0 < self.next
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u32 {
        self.next
    }
}
