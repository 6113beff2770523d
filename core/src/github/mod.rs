//! GitHub endpoints: call descriptors, adapters and the use cases built on
//! them.

pub mod adapters;
pub mod types;
pub mod use_cases;
mod wire;

use crate::call::{ApiCall, Endpoint, PathArity};
use crate::http::HttpMethod;

use adapters::{
    CollaboratorsRequestAdapter, CollaboratorsResponseAdapter, RepositoryDetailsRequestAdapter,
    RepositoryDetailsResponseAdapter, SearchRepositoriesRequestAdapter, SearchRepositoriesResponseAdapter,
};

pub type SearchRepositoriesCall = ApiCall<SearchRepositoriesRequestAdapter, SearchRepositoriesResponseAdapter>;
pub type RepositoryDetailsCall = ApiCall<RepositoryDetailsRequestAdapter, RepositoryDetailsResponseAdapter>;
pub type CollaboratorsCall = ApiCall<CollaboratorsRequestAdapter, CollaboratorsResponseAdapter>;

/// `GET /search/repositories?q=..&order=..&sort=..&per_page=..&page=..`
pub fn search_repositories_call() -> SearchRepositoriesCall {
    ApiCall::new(
        Endpoint::queried(HttpMethod::Get, "/search/repositories"),
        SearchRepositoriesRequestAdapter,
        SearchRepositoriesResponseAdapter,
    )
}

/// `GET /repos/{owner}/{name}`
pub fn repository_details_call() -> RepositoryDetailsCall {
    ApiCall::new(
        Endpoint::path(HttpMethod::Get, "/repos/{}/{}", PathArity::Two),
        RepositoryDetailsRequestAdapter,
        RepositoryDetailsResponseAdapter,
    )
}

/// `GET <contributors_url | collaborators_url>`
pub fn collaborators_call() -> CollaboratorsCall {
    ApiCall::new(
        Endpoint::literal_url(HttpMethod::Get),
        CollaboratorsRequestAdapter,
        CollaboratorsResponseAdapter,
    )
}
