//! Display formatting for distances and times.

/// `"5k"` / `"12.5k"` for whole kilometers or anything over 10 km, otherwise
/// `"1600m"`. Absent or non-finite distances print as `"NaN"`.
pub fn format_meters(meters: Option<f64>) -> String {
    match meters {
        Some(m) if m.is_finite() => {
            if m >= 1000.0 && (m % 1000.0 == 0.0 || m > 10_000.0) {
                format!("{}k", m / 1000.0)
            } else {
                format!("{m}m")
            }
        }
        _ => "NaN".to_string(),
    }
}

/// `[H:]MM:SS.ss`, rounded to hundredths.
pub fn format_seconds(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "NaN".to_string();
    }
    let hundredths = (seconds * 100.0).round() as u64;
    let hours = hundredths / 360_000;
    let minutes = (hundredths / 6_000) % 60;
    let secs = (hundredths / 100) % 60;
    let frac = hundredths % 100;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}.{frac:02}")
    } else {
        format!("{minutes:02}:{secs:02}.{frac:02}")
    }
}
