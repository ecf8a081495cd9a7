//! `paceline search`: per-provider search listings.

use std::path::PathBuf;

use paceline_recon::{ProviderSearch, Reconciler};
use serde::Serialize;

use crate::settings::{load_config, open_sources};
use crate::CliError;

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    providers: &'a [ProviderSearch],
}

pub fn cmd_search(
    query: String,
    fixtures: Vec<PathBuf>,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let registry = open_sources(&fixtures, &config)?;
    let engine = Reconciler::new(registry).with_config(config);

    let listings = smol::block_on(engine.search_all(&query));

    if json {
        let out = SearchOutput { query: &query, providers: &listings };
        let json_str = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        print!("{}", render_listings(&listings));
    }

    let failed = listings.iter().filter(|l| l.error.is_some()).count();
    if failed > 0 {
        eprintln!("{failed} of {} provider(s) failed to search", listings.len());
    }
    Ok(())
}

fn render_listings(listings: &[ProviderSearch]) -> String {
    let mut out = String::new();
    for listing in listings {
        out.push_str(&format!(
            "{} ({}): {} result(s)\n",
            listing.display_name,
            listing.provider,
            listing.results.len()
        ));
        if let Some(err) = &listing.error {
            out.push_str(&format!("  error: {err}\n"));
        }
        for hit in &listing.results {
            let place = [hit.city.as_deref(), hit.state.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "  {}@{}  {}  {}  {}\n",
                hit.external_id,
                hit.provider,
                hit.name,
                hit.school.as_deref().unwrap_or("-"),
                if place.is_empty() { "-" } else { place.as_str() },
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use paceline_recon::SearchResult;

    #[test]
    fn listing_shows_selection_handles() {
        let listings = vec![ProviderSearch {
            provider: "milesplit".into(),
            display_name: "MileSplit".into(),
            results: vec![SearchResult {
                provider: "milesplit".into(),
                external_id: "8841".into(),
                name: "Ana Ruiz".into(),
                school: None,
                city: None,
                state: Some("CA".into()),
                url: None,
            }],
            error: None,
        }];
        let text = render_listings(&listings);
        assert!(text.starts_with("MileSplit (milesplit): 1 result(s)\n"));
        assert!(text.contains("  8841@milesplit  Ana Ruiz  -  CA\n"));
    }
}
