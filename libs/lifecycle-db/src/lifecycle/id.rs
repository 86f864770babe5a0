use uuid::Uuid;

/// Source of primary keys for new rows.
///
/// Called once per insert, before any interceptor runs, and only when the caller
/// did not supply an id.
pub trait PrimaryKeyGenerator: Send + Sync {
    fn generate(&self) -> Uuid;
}

/// UUIDv7: 48-bit millisecond Unix timestamp followed by random bits.
///
/// Keys sort by creation time, which keeps b-tree inserts append-mostly.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeOrderedKeyGenerator;

impl PrimaryKeyGenerator for TimeOrderedKeyGenerator {
    fn generate(&self) -> Uuid {
        Uuid::now_v7()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    fn unix_millis(id: Uuid) -> u64 {
        let (secs, nanos) = id.get_timestamp().unwrap().to_unix();
        secs * 1_000 + u64::from(nanos / 1_000_000)
    }

    #[test]
    fn generates_version_7_ids() {
        let id = TimeOrderedKeyGenerator.generate();
        assert_eq!(id.get_version_num(), 7);
        assert_ne!(id, Uuid::nil());
    }

    #[test]
    fn ids_are_unique_and_time_ordered() {
        let keys = TimeOrderedKeyGenerator;
        let ids: Vec<Uuid> = (0..1_000).map(|_| keys.generate()).collect();

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());

        for pair in ids.windows(2) {
            assert!(unix_millis(pair[0]) <= unix_millis(pair[1]));
        }
    }

    #[test]
    fn later_ids_sort_after_earlier_ones() {
        let keys = TimeOrderedKeyGenerator;
        let first = keys.generate();
        std::thread::sleep(Duration::from_millis(2));
        let second = keys.generate();

        assert!(first < second);
    }

    #[test]
    fn safe_to_call_from_many_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..250)
                        .map(|_| TimeOrderedKeyGenerator.generate())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 2_000);
    }
}
