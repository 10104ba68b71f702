use core::fmt;
use core::num::NonZeroU32;

/// Dense handle for a node or container in an [`ElementIndex`](crate::ElementIndex).
///
/// Handles are only meaningful for the index that issued them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(NonZeroU32);

impl ElementId {
    /// Handle for the element at position `index`.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Position for indexing per-element vectors.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_keeps_its_position() {
        for i in [0_u32, 7, 513, u32::MAX - 1] {
            let id = ElementId::from_index(i);
            assert_eq!(id.index(), i);
            assert_eq!(id.slot(), i as usize);
        }
    }

    #[test]
    fn debug_shows_position() {
        assert_eq!(format!("{:?}", ElementId::from_index(3)), "#3");
        assert_eq!(ElementId::from_index(3).to_string(), "3");
    }

    #[test]
    fn missing_handle_costs_nothing() {
        assert_eq!(
            core::mem::size_of::<ElementId>(),
            core::mem::size_of::<Option<ElementId>>()
        );
    }
}
