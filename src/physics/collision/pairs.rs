use hecs::Entity;
use std::collections::HashSet;

/// Unordered entity pairs that have already been through the narrow phase this tick.
#[derive(Default, Debug)]
pub struct PairSet(HashSet<[Entity; 2]>);

/// Order a pair so that `[a, b]` and `[b, a]` map to the same key.
#[inline]
pub fn pair_key(a: Entity, b: Entity) -> [Entity; 2] {
    if a.to_bits() < b.to_bits() {
        [a, b]
    } else {
        [b, a]
    }
}

impl PairSet {
    /// Mark a pair as tested.
    ///
    /// Returns true only the first time a pair is marked since the last clear,
    /// and never for an entity paired with itself.
    pub fn try_mark(&mut self, a: Entity, b: Entity) -> bool {
        if a == b {
            return false;
        }
        self.0.insert(pair_key(a, b))
    }

    #[inline]
    pub fn contains(&self, a: Entity, b: Entity) -> bool {
        self.0.contains(&pair_key(a, b))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }
}
