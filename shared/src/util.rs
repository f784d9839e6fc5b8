use std::sync::atomic::{AtomicI64, Ordering};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

static LAST_ORDER_SEED: AtomicI64 = AtomicI64::new(0);

/// Generate a short, uppercase order identifier (e.g. `"2F8KQ0ZP1A"`).
///
/// Base36 rendering of a [`snowflake_id`] forced to be strictly increasing
/// within the process, so two orders created in the same millisecond never
/// share an id.
pub fn order_id() -> String {
    let candidate = snowflake_id();
    let prev = match LAST_ORDER_SEED.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        Some(candidate.max(last + 1))
    }) {
        Ok(prev) | Err(prev) => prev,
    };
    to_base36(candidate.max(prev + 1).unsigned_abs())
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(13);
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}
