use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::provider::github::{get_json, http_client};
use crate::provider::{ContributionResponse, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileStats {
    pub total_contributions: u64,
    pub public_repos: Option<u32>,
    pub stars: Option<u32>,
}

impl ProfileStats {
    pub fn from_response(response: &ContributionResponse) -> Self {
        ProfileStats {
            total_contributions: response.total_contributions(),
            ..ProfileStats::default()
        }
    }

    pub fn with_profile(mut self, profile: &GithubProfile) -> Self {
        match profile.public_repos() {
            Ok(repos) => self.public_repos = Some(repos),
            Err(e) => log::warn!("Failed to fetch GitHub user: {}", e),
        }
        match profile.stars() {
            Ok(stars) => self.stars = Some(stars),
            Err(e) => log::warn!("Failed to fetch GitHub repositories: {}", e),
        }
        self
    }
}

#[derive(Debug, Deserialize)]
struct User {
    public_repos: u32,
}

#[derive(Debug, Deserialize)]
struct Repository {
    #[serde(default)]
    stargazers_count: u32,
}

/// Public profile numbers of a GitHub user.
pub struct GithubProfile {
    client: Client,
    api_base: String,
    user: String,
}

impl GithubProfile {
    pub const REPOS_PER_PAGE: u32 = 100;

    pub fn from_config(config: &Config, user: &str) -> Result<Self> {
        Ok(GithubProfile {
            client: http_client(config.timeout())?,
            api_base: config.github_api.trim_end_matches('/').to_owned(),
            user: user.to_owned(),
        })
    }

    fn user_url(&self) -> String {
        format!("{}/users/{}", self.api_base, self.user)
    }

    fn repos_url(&self) -> String {
        format!(
            "{}/repos?per_page={}",
            self.user_url(),
            Self::REPOS_PER_PAGE
        )
    }

    pub fn public_repos(&self) -> Result<u32> {
        let user: User = get_json(&self.client, &self.user_url())?;
        Ok(user.public_repos)
    }

    /// Stars summed over the first page of repositories.
    pub fn stars(&self) -> Result<u32> {
        let repos: Vec<Repository> = get_json(&self.client, &self.repos_url())?;
        Ok(sum_stars(&repos))
    }
}

fn sum_stars(repos: &[Repository]) -> u32 {
    repos.iter().map(|repo| repo.stargazers_count).sum()
}
