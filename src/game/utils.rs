/// Below this a running clock is flagged as low on time.
pub const LOW_TIME_MS: u64 = 30_000;

/// Format remaining time as `m:ss`, rounding seconds up.
pub fn format_time(ms: u64) -> String {
    if ms == 0 {
        return "0:00".to_string();
    }
    let total_seconds = ms.div_ceil(1000);
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

pub fn is_low_time(ms: u64) -> bool {
    ms > 0 && ms < LOW_TIME_MS
}
