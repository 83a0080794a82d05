//! Org chart retrieval: document store over HTTP, or a local file.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use orgchart_core::{chart, OrgChart};

/// Document id of the chart inside the document-store database.
const CHART_DOCUMENT: &str = "chart";

/// Load and organise the chart at `location`.
///
/// `http://` and `https://` locations name a document-store database; the
/// chart is the `chart` document in it. Anything else is a JSON or YAML file.
pub fn load_chart(location: &str) -> Result<OrgChart> {
    if is_remote(location) {
        let url = document_url(location);
        tracing::info!("fetching org chart from {url}");
        let body = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()
            .get(&url)
            .set("Accept", "application/json")
            .call()
            .with_context(|| format!("GET {url}"))?
            .into_string()
            .with_context(|| format!("reading response from {url}"))?;
        let chart = chart::from_json_str(&body)
            .with_context(|| format!("invalid org chart document at {url}"))?;
        Ok(chart)
    } else {
        tracing::info!("reading org chart from {location}");
        Ok(chart::load_path(Path::new(location))?)
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

fn document_url(location: &str) -> String {
    format!("{}/{CHART_DOCUMENT}", location.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_url_appends_chart_id() {
        assert_eq!(
            document_url("https://couch.internal:5984/orgchart/"),
            "https://couch.internal:5984/orgchart/chart"
        );
        assert!(is_remote("http://localhost:5984/db"));
        assert!(!is_remote("./chart.yaml"));
    }

    #[test]
    fn local_file_is_loaded() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("chart.yaml");
        std::fs::write(
            &path,
            "teams:\n  - id: core\n    name: Core\nemployees:\n  - id: e1\n    name: Ada\n    memberOf: core\n",
        )
        .expect("write");

        let chart = load_chart(path.to_str().expect("utf-8 path")).expect("load");
        assert_eq!(chart.teams.len(), 1);
        assert_eq!(chart.employees[0].handle(), None);
    }
}
