//! Domain types for the GitHub endpoints, and the request parameters each
//! endpoint's request adapter consumes.
//!
//! # Design
//! Domain types hold only what callers display or store. The JSON shapes the
//! API actually returns live in `wire` and are remapped by the response
//! adapters, so API schema churn stops there.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Owner of a repository, flattened out of the API's nested user object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepositoryOwner {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepository {
    pub id: u64,
    pub owner: GitRepositoryOwner,
    /// `owner/name`.
    pub repo_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues: u64,
    pub watchers_count: u64,
    pub default_branch: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub collaborators_url: String,
    pub contributors_url: String,
    pub html_url: String,
}

/// One page of repository search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepositoriesList {
    pub total_count: u64,
    pub items: Vec<GitRepository>,
}

/// The parts of a repository's detail record the app follows up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDetails {
    pub full_name: String,
    pub contributors_url: String,
    pub collaborators_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitCollaborator {
    pub login: String,
    pub avatar_url: String,
    /// Present for contributor listings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributions: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GitCollaboratorList {
    pub collaborators: Vec<GitCollaborator>,
}

/// Parameters of `GET /search/repositories`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRepositoriesRequest {
    pub query: String,
    pub order: String,
    pub sort: String,
    pub per_page: u32,
    pub page: u32,
}

/// Parameters of `GET /repos/{owner}/{name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDetailsRequest {
    pub owner: String,
    pub name: String,
}

/// Parameters of a contributors/collaborators listing, addressed by the
/// URL the repository record advertises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorsRequest {
    pub url: String,
}
