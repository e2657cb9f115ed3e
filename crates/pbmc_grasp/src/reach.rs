//! Objects currently within reach of a grasp volume

use pbmc_core::BodyId;

/// Duplicate-free stack of candidates, most recently entered on top
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReachSet {
    entries: Vec<BodyId>,
}

impl ReachSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a body on top. Returns false if it was already present, in which
    /// case its position is unchanged.
    pub fn insert(&mut self, body: BodyId) -> bool {
        if self.contains(body) {
            return false;
        }
        self.entries.push(body);
        true
    }

    pub fn remove(&mut self, body: BodyId) -> bool {
        match self.entries.iter().position(|b| *b == body) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Take the most recently entered body
    pub fn pop(&mut self) -> Option<BodyId> {
        self.entries.pop()
    }

    #[inline]
    pub fn contains(&self, body: BodyId) -> bool {
        self.entries.contains(&body)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bodies in retrieval order, most recent first
    pub fn iter(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.entries.iter().rev().copied()
    }
}

impl Extend<BodyId> for ReachSet {
    fn extend<I: IntoIterator<Item = BodyId>>(&mut self, iter: I) {
        for body in iter {
            self.insert(body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo() {
        let mut set = ReachSet::new();
        set.insert(BodyId(1));
        set.insert(BodyId(2));
        set.insert(BodyId(3));

        assert_eq!(set.iter().collect::<Vec<_>>(), vec![BodyId(3), BodyId(2), BodyId(1)]);
        assert_eq!(set.pop(), Some(BodyId(3)));
        assert_eq!(set.pop(), Some(BodyId(2)));
        assert_eq!(set.pop(), Some(BodyId(1)));
        assert_eq!(set.pop(), None);
    }

    #[test]
    fn test_duplicate_keeps_position() {
        let mut set = ReachSet::new();
        set.insert(BodyId(1));
        set.insert(BodyId(2));
        assert!(!set.insert(BodyId(1)));

        assert_eq!(set.len(), 2);
        assert_eq!(set.pop(), Some(BodyId(2)));
    }

    #[test]
    fn test_remove() {
        let mut set = ReachSet::new();
        set.extend([BodyId(1), BodyId(2), BodyId(3)]);

        assert!(set.remove(BodyId(2)));
        assert!(!set.remove(BodyId(2)));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![BodyId(3), BodyId(1)]);
    }
}
