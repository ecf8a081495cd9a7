/// Parse `[[hours:]minutes:]seconds[.fraction]` into seconds.
///
/// Returns `None` (and logs) for placeholder or malformed marks: more than
/// three segments, any `-`, or a segment without a leading number. Missing
/// hour/minute segments count as zero. No rounding is applied.
pub fn parse_duration(time: &str) -> Option<f64> {
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() > 3 || time.contains('-') {
        log::warn!("don't know how to parse this time: {time:?}");
        return None;
    }

    let mut total = 0.0;
    for (segment, scale) in parts.iter().rev().zip([1.0, 60.0, 3600.0]) {
        let Some(value) = leading_number(segment) else {
            log::warn!("don't know how to parse this time: {time:?}");
            return None;
        };
        total += value * scale;
    }

    if total.is_nan() {
        log::warn!("don't know how to parse this time: {time:?}");
        return None;
    }
    Some(total)
}

/// Longest numeric prefix of `s`, after leading whitespace. `"35.2h"` → 35.2.
/// The prefix must start like a decimal literal, so `inf` and `nan` spellings
/// are not numbers.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let unsigned = s.strip_prefix('+').unwrap_or(s);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    s.char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .rev()
        .find_map(|end| s[..end].parse::<f64>().ok())
}
