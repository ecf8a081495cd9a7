//! Human-readable athlete report.

use paceline_recon::format::{format_meters, format_seconds};
use paceline_recon::{CanonicalAthlete, CanonicalPerformance};

const HEADERS: [&str; 6] = ["DATE", "EVENT", "DIST", "TIME", "MEET", "SOURCES"];

fn row(perf: &CanonicalPerformance) -> [String; 6] {
    let time = match (perf.time_seconds, perf.time.as_deref()) {
        (Some(seconds), _) => format_seconds(seconds),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => "-".to_string(),
    };
    [
        perf.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
        perf.event.clone().unwrap_or_else(|| "-".into()),
        format_meters(perf.meters),
        time,
        perf.meet.clone().unwrap_or_else(|| "-".into()),
        perf.providers().join(", "),
    ]
}

pub fn render_athlete(athlete: &CanonicalAthlete) -> String {
    let mut out = String::new();

    let name = athlete.full_name.as_deref().unwrap_or("(unnamed athlete)");
    match athlete.gender.as_deref() {
        Some(gender) => out.push_str(&format!("{name} ({gender})\n")),
        None => out.push_str(&format!("{name}\n")),
    }
    for url in &athlete.urls {
        out.push_str(&format!("  {url}\n"));
    }
    if let Some(pfp) = &athlete.pfp_url {
        out.push_str(&format!("  photo: {pfp}\n"));
    }
    out.push('\n');

    if athlete.times.is_empty() {
        out.push_str("no results\n");
        return out;
    }

    let rows: Vec<[String; 6]> = athlete.times.iter().map(row).collect();
    let mut widths = HEADERS.map(str::len);
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    push_line(&mut out, &header, &widths);
    for r in &rows {
        push_line(&mut out, r, &widths);
    }
    out.push_str(&format!("\n{} result(s)\n", rows.len()));
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize; 6]) {
    let last = cells.len() - 1;
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i == last {
            out.push_str(cell);
        } else {
            let pad = width - cell.chars().count();
            out.push_str(cell);
            out.push_str(&" ".repeat(pad + 2));
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use paceline_recon::RawPerformanceRecord;

    fn athlete(times: Vec<CanonicalPerformance>) -> CanonicalAthlete {
        CanonicalAthlete {
            first_name: Some("Ana".into()),
            last_name: Some("Ruiz".into()),
            full_name: Some("Ana Ruiz".into()),
            gender: Some("F".into()),
            urls: vec!["https://milesplit.com/athletes/8841".into()],
            pfp_url: None,
            times,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn empty_timeline() {
        let text = render_athlete(&athlete(Vec::new()));
        assert!(text.starts_with("Ana Ruiz (F)\n  https://milesplit.com/athletes/8841\n"));
        assert!(text.ends_with("no results\n"));
    }

    #[test]
    fn table_columns_align() {
        let perf = CanonicalPerformance {
            meet: Some("Arcadia Invitational".into()),
            date: None,
            event: Some("1600 meter".into()),
            meters: Some(1600.0),
            time: Some("5:01.33".into()),
            time_seconds: Some(301.33),
            sources: vec![RawPerformanceRecord::new("milesplit")],
        };
        let text = render_athlete(&athlete(vec![perf]));
        let lines: Vec<&str> = text.lines().collect();
        let header = lines.iter().position(|l| l.starts_with("DATE")).unwrap();
        assert_eq!(
            lines[header + 1],
            "-     1600 meter  1600m  05:01.33  Arcadia Invitational  milesplit"
        );
        assert_eq!(lines[header].find("EVENT"), lines[header + 1].find("1600 meter"));
        assert!(text.ends_with("1 result(s)\n"));
    }
}
