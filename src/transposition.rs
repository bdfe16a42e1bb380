//! Transposition table data structure.

/// Default number of buckets. A 4x4 game reaches far fewer distinct
/// positions than this times a short chain.
pub const DEFAULT_BUCKETS: usize = 1 << 12;

/// How a stored value relates to the true minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// True value >= stored value (search failed high).
    LowerBound,
    /// True value <= stored value (search failed low).
    UpperBound,
}

/// ===================
///        Entry
/// ===================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub fingerprint: u64,
    pub bound: Bound,
    /// Remaining depth the value was searched to.
    pub depth: u16,
    pub value: i16,
}

impl TtEntry {
    pub fn new(fingerprint: u64, bound: Bound, depth: u16, value: i16) -> Self {
        TtEntry {
            fingerprint,
            bound,
            depth,
            value,
        }
    }
}

/// Counters reported after each decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    pub entries: usize,
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

/// ===========================
///     Transposition table
/// ===========================
/// Fixed bucket array; each bucket chains every fingerprint that maps to it,
/// so colliding positions never evict each other.
#[derive(Debug, Clone)]
pub struct TranspositionTable {
    buckets: Box<[Vec<TtEntry>]>,
    len: usize,
    probes: u64,
    hits: u64,
    stores: u64,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS)
    }
}

impl TranspositionTable {
    pub fn new(buckets: usize) -> Self {
        let buckets = vec![Vec::new(); buckets.max(1)].into_boxed_slice();
        Self {
            buckets,
            len: 0,
            probes: 0,
            hits: 0,
            stores: 0,
        }
    }

    #[inline]
    fn bucket_index(&self, fingerprint: u64) -> usize {
        (fingerprint % self.buckets.len() as u64) as usize
    }

    pub fn lookup(&mut self, fingerprint: u64) -> Option<TtEntry> {
        self.probes += 1;
        let index = self.bucket_index(fingerprint);
        let found = self.buckets[index]
            .iter()
            .find(|entry| entry.fingerprint == fingerprint)
            .copied();
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    /// Insert `entry`, overwriting any entry with the same fingerprint.
    pub fn store(&mut self, entry: TtEntry) {
        self.stores += 1;
        let index = self.bucket_index(entry.fingerprint);
        let bucket = &mut self.buckets[index];
        match bucket
            .iter_mut()
            .find(|slot| slot.fingerprint == entry.fingerprint)
        {
            Some(slot) => *slot = entry,
            None => {
                bucket.push(entry);
                self.len += 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
        self.len = 0;
        self.probes = 0;
        self.hits = 0;
        self.stores = 0;
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            entries: self.len,
            probes: self.probes,
            hits: self.hits,
            stores: self.stores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_then_lookup() {
        let mut tt = TranspositionTable::default();
        let entry = TtEntry::new(0xDEAD_BEEF, Bound::Exact, 5, 103);
        tt.store(entry);
        assert_eq!(tt.lookup(0xDEAD_BEEF), Some(entry));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_missing_fingerprint() {
        let mut tt = TranspositionTable::default();
        tt.store(TtEntry::new(1, Bound::Exact, 1, 0));
        assert_eq!(tt.lookup(2), None);
    }

    #[test]
    fn test_colliding_fingerprints_coexist() {
        // 4 buckets: 3, 7 and 11 all land in bucket 3.
        let mut tt = TranspositionTable::new(4);
        let a = TtEntry::new(3, Bound::Exact, 2, 10);
        let b = TtEntry::new(7, Bound::LowerBound, 4, -20);
        let c = TtEntry::new(11, Bound::UpperBound, 6, 30);
        tt.store(a);
        tt.store(b);
        tt.store(c);

        assert_eq!(tt.lookup(3), Some(a));
        assert_eq!(tt.lookup(7), Some(b));
        assert_eq!(tt.lookup(11), Some(c));
        assert_eq!(tt.lookup(15), None);
        assert_eq!(tt.len(), 3);
    }

    #[test]
    fn test_store_overwrites_in_place() {
        let mut tt = TranspositionTable::new(4);
        tt.store(TtEntry::new(9, Bound::UpperBound, 1, -5));
        let deeper = TtEntry::new(9, Bound::Exact, 3, 101);
        tt.store(deeper);
        assert_eq!(tt.lookup(9), Some(deeper));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_single_bucket_still_works() {
        let mut tt = TranspositionTable::new(0);
        for fp in 0..50u64 {
            tt.store(TtEntry::new(fp, Bound::Exact, 1, fp as i16));
        }
        for fp in 0..50u64 {
            assert_eq!(tt.lookup(fp).map(|e| e.value), Some(fp as i16));
        }
    }

    #[test]
    fn test_stats_and_clear() {
        let mut tt = TranspositionTable::new(8);
        tt.store(TtEntry::new(1, Bound::Exact, 1, 0));
        tt.store(TtEntry::new(1, Bound::Exact, 2, 0));
        let _ = tt.lookup(1);
        let _ = tt.lookup(2);

        assert_eq!(
            tt.stats(),
            TableStats {
                entries: 1,
                probes: 2,
                hits: 1,
                stores: 2,
            }
        );

        tt.clear();
        assert!(tt.is_empty());
        assert_eq!(tt.lookup(1), None);
        assert_eq!(tt.stats().entries, 0);
    }
}
