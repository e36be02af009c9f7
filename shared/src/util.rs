use std::sync::OnceLock;
use std::sync::atomic::{AtomicI64, Ordering};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Custom epoch: 2024-01-01 00:00:00 UTC
const EPOCH_MS: i64 = 1_704_067_200_000;

/// Per-process sequence, started at a random point so that two processes
/// booting in the same millisecond do not walk the same ids.
fn sequence() -> &'static AtomicI64 {
    static SEQUENCE: OnceLock<AtomicI64> = OnceLock::new();
    SEQUENCE.get_or_init(|| {
        use rand::Rng;
        AtomicI64::new(rand::thread_rng().gen_range(0..0x1000))
    })
}

/// Snowflake-style id for rules and leads.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: rolling sequence (4096 ids per ms per process)
pub fn snowflake_id() -> i64 {
    let ts = (now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF;
    let seq = sequence().fetch_add(1, Ordering::Relaxed) & 0xFFF;
    (ts << 12) | seq
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_snowflake_id_fits_js_number() {
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id < (1_i64 << 53));
    }

    #[test]
    fn test_burst_of_ids_is_unique() {
        let ids: HashSet<i64> = (0..1000).map(|_| snowflake_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
