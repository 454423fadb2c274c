//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Identity may be assigned late (by the store on first save), so `id()` is
/// optional until the entity has been persisted.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier, if one has been assigned.
    fn id(&self) -> Option<&Self::Id>;

    /// True until the entity has been persisted for the first time.
    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}
