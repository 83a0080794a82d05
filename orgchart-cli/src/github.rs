//! Blocking GitHub REST client implementing [`Platform`].
//!
//! List endpoints are paginated with `per_page=100` and followed through the
//! `Link: <…>; rel="next"` response header until exhausted.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;

use orgchart_sync::{NewTeam, Platform, PlatformError, PlatformTeam, PlatformUser, TeamRole};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const PER_PAGE: u32 = 100;

pub struct GitHubClient {
    agent: ureq::Agent,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        Self {
            agent,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Accept", "application/vnd.github+json")
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("X-GitHub-Api-Version", API_VERSION)
            .set("User-Agent", concat!("orgchart/", env!("CARGO_PKG_VERSION")))
    }

    /// GET every page starting at `url`.
    fn list_all<T: DeserializeOwned>(&self, url: String) -> Result<Vec<T>, PlatformError> {
        let mut items = Vec::new();
        let mut next = Some(url);
        while let Some(current) = next.take() {
            tracing::debug!("GET {current}");
            let response = self
                .request("GET", &current)
                .call()
                .map_err(|e| from_ureq(&current, e))?;
            next = response.header("Link").and_then(next_page_url);
            let page: Vec<T> = response.into_json().map_err(|e| PlatformError::Decode {
                url: current.clone(),
                message: e.to_string(),
            })?;
            items.extend(page);
        }
        Ok(items)
    }

    fn decode<T: DeserializeOwned>(url: &str, response: ureq::Response) -> Result<T, PlatformError> {
        response.into_json().map_err(|e| PlatformError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl Platform for GitHubClient {
    fn list_members(&mut self, org: &str) -> Result<Vec<PlatformUser>, PlatformError> {
        self.list_all(self.url(&format!("/orgs/{org}/members?per_page={PER_PAGE}")))
    }

    fn list_teams(&mut self, org: &str) -> Result<Vec<PlatformTeam>, PlatformError> {
        self.list_all(self.url(&format!("/orgs/{org}/teams?per_page={PER_PAGE}")))
    }

    fn create_team(&mut self, org: &str, team: &NewTeam) -> Result<PlatformTeam, PlatformError> {
        let url = self.url(&format!("/orgs/{org}/teams"));
        let response = self
            .request("POST", &url)
            .send_json(team)
            .map_err(|e| from_ureq(&url, e))?;
        Self::decode(&url, response)
    }

    fn edit_team(&mut self, team_id: u64, team: &NewTeam) -> Result<PlatformTeam, PlatformError> {
        let url = self.url(&format!("/teams/{team_id}"));
        let response = self
            .request("PATCH", &url)
            .send_json(team)
            .map_err(|e| from_ureq(&url, e))?;
        Self::decode(&url, response)
    }

    fn delete_team(&mut self, team_id: u64) -> Result<(), PlatformError> {
        let url = self.url(&format!("/teams/{team_id}"));
        self.request("DELETE", &url)
            .call()
            .map_err(|e| from_ureq(&url, e))?;
        Ok(())
    }

    fn add_team_membership(
        &mut self,
        team_id: u64,
        handle: &str,
        role: TeamRole,
    ) -> Result<(), PlatformError> {
        let url = self.url(&format!("/teams/{team_id}/memberships/{handle}"));
        self.request("PUT", &url)
            .send_json(json!({ "role": role }))
            .map_err(|e| from_ureq(&url, e))?;
        Ok(())
    }
}

fn from_ureq(url: &str, err: ureq::Error) -> PlatformError {
    match err {
        ureq::Error::Status(status, response) => PlatformError::Http {
            status,
            url: url.to_string(),
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => PlatformError::Transport(transport.to_string()),
    }
}

/// Extract the `rel="next"` target from a `Link` header.
pub fn next_page_url(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let target = segments.next()?.trim();
        let is_next = segments.any(|s| s.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
