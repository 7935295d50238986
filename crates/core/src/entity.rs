//! Entity trait: identity + continuity across state changes.

use core::fmt::{Debug, Display};
use core::hash::Hash;

/// Entity marker + minimal interface.
///
/// The key is `None` until the store assigns one (sequence-keyed entities
/// arrive from the wire without an identity). Natural-key entities carry
/// their key from construction and `key()` is always `Some`.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Strongly-typed entity key.
    type Key: Clone + Ord + Eq + Hash + Debug + Display + Send + Sync + 'static;

    /// Wire-level entity name (used in alert headers and error bodies).
    const NAME: &'static str;

    /// Wire-level name of the key field (`"id"` for sequence-keyed entities).
    const KEY_FIELD: &'static str;

    /// Returns the entity key, if one has been assigned.
    fn key(&self) -> Option<&Self::Key>;

    /// Records the store-assigned key on a freshly persisted entity.
    fn set_key(&mut self, key: Self::Key);
}

/// A partial update for an entity of type `T`.
///
/// Each field is an explicit present/absent wrapper: absent means "leave the
/// stored value unchanged", never "clear". The patch carries the identity of
/// the row it targets.
pub trait Patch<T: Entity>: Send {
    /// The key of the row this patch targets, if supplied.
    fn key(&self) -> Option<&T::Key>;

    /// Overwrites exactly the fields present in the patch.
    fn apply_to(&self, target: &mut T);
}
