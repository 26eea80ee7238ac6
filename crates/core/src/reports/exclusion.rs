//! Transaction-nature exclusion set.

use std::collections::HashSet;

/// Immutable set of transaction-nature codes left out of the entries/exits
/// primary totals. Loaded once at start-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(HashSet<i32>);

impl ExclusionSet {
    /// Builds the set from a list of codes; duplicates collapse.
    #[must_use]
    pub fn from_codes(codes: impl IntoIterator<Item = i32>) -> Self {
        Self(codes.into_iter().collect())
    }

    /// Whether `code` is excluded.
    #[must_use]
    pub fn contains(&self, code: i32) -> bool {
        self.0.contains(&code)
    }

    /// Number of distinct codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<i32> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        Self::from_codes(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let set = ExclusionSet::from_codes([5102, 5102, 1949]);

        assert_eq!(set.len(), 2);
        assert!(set.contains(5102));
        assert!(set.contains(1949));
        assert!(!set.contains(5101));
    }

    #[test]
    fn test_empty() {
        let set: ExclusionSet = std::iter::empty().collect();
        assert!(set.is_empty());
    }
}
