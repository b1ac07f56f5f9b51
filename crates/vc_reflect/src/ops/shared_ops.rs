use crate::Reflect;

/// A shared cell with identity.
///
/// Two handles to the same cell report the same [`identity`](SharedRef::identity).
pub trait SharedRef: Reflect {
    /// Returns the address of the shared allocation.
    fn identity(&self) -> usize;

    /// Calls `visitor` with the content of the cell, under its read lock.
    fn visit(&self, visitor: &mut dyn FnMut(&dyn Reflect));
}
