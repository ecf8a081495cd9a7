use std::sync::OnceLock;

use regex::Regex;

fn whole_seconds() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":\d\d$").expect("mark pattern"))
}

fn tenths() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":\d\d\.\d$").expect("mark pattern"))
}

/// Athletic.net marks carry a trailing `a` for altitude and drop trailing
/// zeros ("4:35", "4:35.2"). Restore two-decimal form.
pub fn clean_athletic_net_mark(mark: &str) -> String {
    let mark = mark.trim();
    let mark = mark.strip_suffix('a').unwrap_or(mark);
    if whole_seconds().is_match(mark) {
        format!("{mark}.00")
    } else if tenths().is_match(mark) {
        format!("{mark}0")
    } else {
        mark.to_string()
    }
}
