use std::fmt;

/// Snapshot of the caches of one [`HashLife`](super::HashLife) session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStatistics {
    /// Nodes in the canonical store, including the two leaves.
    pub nodes: usize,
    /// Nodes whose advanced center is memoized.
    pub memo_entries: usize,
    /// `advance_center` calls answered from the memo.
    pub memo_hits: u64,
    /// `advance_center` calls that had to compute the result.
    pub memo_misses: u64,
    /// Depths for which the canonical empty node has been built.
    pub blank_depths: usize,
}

impl CacheStatistics {
    /// Share of `advance_center` calls answered from the memo, in `[0, 1]`.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.memo_hits + self.memo_misses;
        if total == 0 {
            0.0
        } else {
            self.memo_hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size of canonical store: {}", self.nodes)?;
        writeln!(f, "Size of advance memo: {}", self.memo_entries)?;
        writeln!(
            f,
            "Memo hits: {}, misses: {} ({:.1}% hit ratio)",
            self.memo_hits,
            self.memo_misses,
            self.hit_ratio() * 100.0
        )?;
        write!(f, "Empty nodes cached: {}", self.blank_depths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_ratio() {
        let mut stats = CacheStatistics::default();
        assert_eq!(stats.hit_ratio(), 0.0);
        stats.memo_hits = 3;
        stats.memo_misses = 1;
        assert_eq!(stats.hit_ratio(), 0.75);
    }
}
