//! Entity trait: identity that survives state changes.

/// Entity marker + minimal interface.
///
/// Identity is assigned by the store, so a freshly built entity has none.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier, if one has been assigned.
    fn id(&self) -> Option<Self::Id>;

    /// True until the store has assigned an identifier.
    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}
