//! Request and response adapters for the GitHub endpoints.

use chrono::{DateTime, Utc};

use crate::adapter::{RequestAdapter, ResponseAdapter, WireParams};
use crate::error::ParseError;
use crate::github::types::{
    CollaboratorsRequest, GitCollaborator, GitCollaboratorList, GitRepositoriesList, GitRepository,
    GitRepositoryOwner, RepositoryDetails, RepositoryDetailsRequest, SearchRepositoriesRequest,
};
use crate::github::wire::{RepositoryJson, SearchResponseJson, UserJson};

pub const QUERY: &str = "q";
pub const ORDER: &str = "order";
pub const SORT: &str = "sort";
pub const PER_PAGE: &str = "per_page";
pub const PAGE: &str = "page";

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchRepositoriesRequestAdapter;

impl RequestAdapter for SearchRepositoriesRequestAdapter {
    type Params = SearchRepositoriesRequest;

    fn convert(&self, params: &SearchRepositoriesRequest) -> WireParams {
        WireParams::new()
            .query(QUERY, &params.query)
            .query(ORDER, &params.order)
            .query(SORT, &params.sort)
            .query(PER_PAGE, params.per_page)
            .query(PAGE, params.page)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchRepositoriesResponseAdapter;

impl ResponseAdapter for SearchRepositoriesResponseAdapter {
    type Output = GitRepositoriesList;

    fn convert(&self, raw: &str) -> Result<GitRepositoriesList, ParseError> {
        let response: SearchResponseJson = serde_json::from_str(raw)?;
        let items = response
            .items
            .into_iter()
            .map(to_repository)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GitRepositoriesList {
            total_count: response.total_count,
            items,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryDetailsRequestAdapter;

impl RequestAdapter for RepositoryDetailsRequestAdapter {
    type Params = RepositoryDetailsRequest;

    fn convert(&self, params: &RepositoryDetailsRequest) -> WireParams {
        WireParams::new().segment(&*params.owner).segment(&*params.name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryDetailsResponseAdapter;

impl ResponseAdapter for RepositoryDetailsResponseAdapter {
    type Output = RepositoryDetails;

    fn convert(&self, raw: &str) -> Result<RepositoryDetails, ParseError> {
        let repo: RepositoryJson = serde_json::from_str(raw)?;
        Ok(RepositoryDetails {
            full_name: repo.full_name,
            contributors_url: repo.contributors_url,
            collaborators_url: strip_uri_template(&repo.collaborators_url),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CollaboratorsRequestAdapter;

impl RequestAdapter for CollaboratorsRequestAdapter {
    type Params = CollaboratorsRequest;

    fn convert(&self, params: &CollaboratorsRequest) -> WireParams {
        WireParams::new().url(&*params.url)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CollaboratorsResponseAdapter;

impl ResponseAdapter for CollaboratorsResponseAdapter {
    type Output = GitCollaboratorList;

    fn convert(&self, raw: &str) -> Result<GitCollaboratorList, ParseError> {
        let users: Vec<UserJson> = serde_json::from_str(raw)?;
        let collaborators = users
            .into_iter()
            .map(|user| GitCollaborator {
                login: user.login,
                avatar_url: user.avatar_url,
                contributions: user.contributions,
            })
            .collect();
        Ok(GitCollaboratorList { collaborators })
    }
}

fn to_repository(repo: RepositoryJson) -> Result<GitRepository, ParseError> {
    Ok(GitRepository {
        id: repo.id,
        owner: GitRepositoryOwner {
            login: repo.owner.login,
            avatar_url: repo.owner.avatar_url,
            html_url: repo.owner.html_url,
        },
        repo_name: repo.full_name,
        description: repo.description,
        language: repo.language,
        stargazers_count: repo.stargazers_count,
        forks_count: repo.forks_count,
        open_issues: repo.open_issues_count,
        watchers_count: repo.watchers_count,
        default_branch: repo.default_branch,
        created_at: parse_timestamp(&repo.created_at)?,
        updated_at: parse_timestamp(&repo.updated_at)?,
        collaborators_url: strip_uri_template(&repo.collaborators_url),
        contributors_url: repo.contributors_url,
        html_url: repo.html_url,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ParseError::Timestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Drop an RFC 6570 suffix such as `{/collaborator}`.
fn strip_uri_template(url: &str) -> String {
    match url.find('{') {
        Some(idx) => url[..idx].to_string(),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO: &str = r#"{
        "id": 3432266,
        "name": "kotlin",
        "full_name": "JetBrains/kotlin",
        "private": false,
        "owner": {
            "login": "JetBrains",
            "id": 878437,
            "avatar_url": "https://avatars.githubusercontent.com/u/878437?v=4",
            "html_url": "https://github.com/JetBrains",
            "type": "Organization"
        },
        "html_url": "https://github.com/JetBrains/kotlin",
        "description": "The Kotlin Programming Language.",
        "language": "Kotlin",
        "stargazers_count": 49000,
        "forks_count": 5700,
        "open_issues_count": 180,
        "watchers_count": 49000,
        "default_branch": "master",
        "created_at": "2012-02-13T17:29:58Z",
        "updated_at": "2024-11-02T10:00:00Z",
        "collaborators_url": "https://api.github.com/repos/JetBrains/kotlin/collaborators{/collaborator}",
        "contributors_url": "https://api.github.com/repos/JetBrains/kotlin/contributors",
        "topics": ["compiler"]
    }"#;

    #[test]
    fn search_params_are_stringified() {
        let wire = SearchRepositoriesRequestAdapter.convert(&SearchRepositoriesRequest {
            query: "language:kotlin".to_string(),
            order: "desc".to_string(),
            sort: "stars".to_string(),
            per_page: 20,
            page: 1,
        });
        let keys: Vec<&str> = wire.query.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["order", "page", "per_page", "q", "sort"]);
        assert_eq!(wire.query["per_page"], "20");
        assert_eq!(wire.query["page"], "1");
        assert_eq!(wire.query["q"], "language:kotlin");
        assert!(wire.headers.is_empty());
        assert!(wire.fields.is_empty());
    }

    #[test]
    fn request_adapters_are_deterministic() {
        let params = SearchRepositoriesRequest {
            query: "language:rust".to_string(),
            order: "asc".to_string(),
            sort: "forks".to_string(),
            per_page: 50,
            page: 3,
        };
        assert_eq!(
            SearchRepositoriesRequestAdapter.convert(&params),
            SearchRepositoriesRequestAdapter.convert(&params.clone())
        );
    }

    #[test]
    fn details_params_become_ordered_segments() {
        let wire = RepositoryDetailsRequestAdapter.convert(&RepositoryDetailsRequest {
            owner: "square".to_string(),
            name: "okhttp".to_string(),
        });
        assert_eq!(wire.path, vec!["square", "okhttp"]);
        assert!(wire.query.is_empty());
    }

    #[test]
    fn collaborators_params_become_literal_url() {
        let wire = CollaboratorsRequestAdapter.convert(&CollaboratorsRequest {
            url: "https://api.github.com/repos/a/b/contributors".to_string(),
        });
        assert_eq!(wire.url.as_deref(), Some("https://api.github.com/repos/a/b/contributors"));
    }

    #[test]
    fn search_response_flattens_owner() {
        let raw = format!(r#"{{"total_count": 1, "incomplete_results": false, "items": [{REPO}]}}"#);
        let list = SearchRepositoriesResponseAdapter.convert(&raw).unwrap();
        assert_eq!(list.total_count, 1);
        let repo = &list.items[0];
        assert_eq!(repo.repo_name, "JetBrains/kotlin");
        assert_eq!(repo.owner.login, "JetBrains");
        assert_eq!(repo.owner.html_url, "https://github.com/JetBrains");
        assert_eq!(repo.open_issues, 180);
        assert_eq!(repo.created_at.to_rfc3339(), "2012-02-13T17:29:58+00:00");
        assert_eq!(repo.collaborators_url, "https://api.github.com/repos/JetBrains/kotlin/collaborators");
    }

    #[test]
    fn search_response_accepts_null_description_and_language() {
        let raw = REPO
            .replace(r#""The Kotlin Programming Language.""#, "null")
            .replace(r#""Kotlin""#, "null");
        let raw = format!(r#"{{"items": [{raw}]}}"#);
        let list = SearchRepositoriesResponseAdapter.convert(&raw).unwrap();
        assert!(list.items[0].description.is_none());
        assert!(list.items[0].language.is_none());
        assert_eq!(list.total_count, 0);
    }

    #[test]
    fn bad_timestamp_is_a_parse_error() {
        let raw = REPO.replace("2012-02-13T17:29:58Z", "yesterday");
        let raw = format!(r#"{{"items": [{raw}]}}"#);
        let err = SearchRepositoriesResponseAdapter.convert(&raw).unwrap_err();
        assert!(matches!(err, ParseError::Timestamp { ref value, .. } if value == "yesterday"));
    }

    #[test]
    fn schema_mismatch_is_a_parse_error() {
        let err = SearchRepositoriesResponseAdapter.convert(r#"{"message": "Not Found"}"#).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn details_response_keeps_follow_up_urls() {
        let details = RepositoryDetailsResponseAdapter.convert(REPO).unwrap();
        assert_eq!(details.full_name, "JetBrains/kotlin");
        assert_eq!(details.contributors_url, "https://api.github.com/repos/JetBrains/kotlin/contributors");
        assert_eq!(details.collaborators_url, "https://api.github.com/repos/JetBrains/kotlin/collaborators");
    }

    #[test]
    fn collaborators_response_maps_users() {
        let raw = r#"[
            {"login": "udalov", "id": 1, "avatar_url": "https://a/1", "html_url": "https://github.com/udalov", "contributions": 7000},
            {"login": "abreslav", "id": 2, "avatar_url": "https://a/2", "html_url": "https://github.com/abreslav"}
        ]"#;
        let list = CollaboratorsResponseAdapter.convert(raw).unwrap();
        assert_eq!(list.collaborators.len(), 2);
        assert_eq!(list.collaborators[0].login, "udalov");
        assert_eq!(list.collaborators[0].contributions, Some(7000));
        assert_eq!(list.collaborators[1].contributions, None);
    }
}
