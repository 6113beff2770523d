//! JSON shapes returned by the GitHub REST API.
//!
//! Only the fields the response adapters read are declared; serde ignores
//! the rest.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponseJson {
    #[serde(default)]
    pub total_count: u64,
    pub items: Vec<RepositoryJson>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryJson {
    pub id: u64,
    pub full_name: String,
    pub owner: UserJson,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub watchers_count: u64,
    pub default_branch: String,
    pub created_at: String,
    pub updated_at: String,
    pub collaborators_url: String,
    pub contributors_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserJson {
    pub login: String,
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub contributions: Option<u64>,
}
