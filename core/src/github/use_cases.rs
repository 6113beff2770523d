//! Use cases for browsing repositories and their contributors.

use std::sync::Arc;

use tracing::debug;

use crate::error::ApiException;
use crate::github::adapters::{
    CollaboratorsRequestAdapter, CollaboratorsResponseAdapter, RepositoryDetailsRequestAdapter,
    RepositoryDetailsResponseAdapter, SearchRepositoriesRequestAdapter, SearchRepositoriesResponseAdapter,
};
use crate::github::types::{
    CollaboratorsRequest, GitCollaboratorList, GitRepositoriesList, RepositoryDetails,
    RepositoryDetailsRequest, SearchRepositoriesRequest,
};
use crate::github::{
    collaborators_call, repository_details_call, search_repositories_call, CollaboratorsCall,
    RepositoryDetailsCall, SearchRepositoriesCall,
};
use crate::networking::{self, NetworkContext, NetworkingUseCase};
use crate::outcome::Outcome;
use crate::store::{spawn_upsert, RepositoryStore};
use crate::use_case::UseCase;

pub const DEFAULT_PER_PAGE: u32 = 20;

/// Search terms applied to every page fetched by `GetRepositoriesUseCase`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub query: String,
    pub order: String,
    pub sort: String,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            query: "language:kotlin".to_string(),
            order: "desc".to_string(),
            sort: "stars".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetRepositoriesParams {
    pub page: u32,
    pub per_page: u32,
}

impl GetRepositoriesParams {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Fetches one page of search results and stores it locally.
pub struct GetRepositoriesUseCase {
    context: NetworkContext,
    call: SearchRepositoriesCall,
    filter: SearchFilter,
    store: Option<Arc<dyn RepositoryStore>>,
}

impl GetRepositoriesUseCase {
    pub fn new(context: NetworkContext) -> Self {
        Self {
            context,
            call: search_repositories_call(),
            filter: SearchFilter::default(),
            store: None,
        }
    }

    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Fetched items are upserted into `store` in the background.
    pub fn with_store(mut self, store: Arc<dyn RepositoryStore>) -> Self {
        self.store = Some(store);
        self
    }
}

impl NetworkingUseCase for GetRepositoriesUseCase {
    type Params = GetRepositoriesParams;
    type Request = SearchRepositoriesRequestAdapter;
    type Response = SearchRepositoriesResponseAdapter;

    fn context(&self) -> &NetworkContext {
        &self.context
    }

    fn api_call(&self) -> &SearchRepositoriesCall {
        &self.call
    }

    fn provide_params(&self, params: &GetRepositoriesParams) -> SearchRepositoriesRequest {
        SearchRepositoriesRequest {
            query: self.filter.query.clone(),
            order: self.filter.order.clone(),
            sort: self.filter.sort.clone(),
            per_page: params.per_page,
            page: params.page,
        }
    }

    fn on_success(
        &self,
        params: GetRepositoriesParams,
        result: GitRepositoriesList,
        _raw_json: &str,
    ) -> Outcome<GitRepositoriesList, ApiException> {
        debug!(page = params.page, items = result.items.len(), "fetched repositories");
        if let Some(store) = &self.store {
            // Not joined: the store catches up on its own.
            let _ = spawn_upsert(Arc::clone(store), result.items.clone());
        }
        Outcome::success(result)
    }
}

impl UseCase for GetRepositoriesUseCase {
    type Params = GetRepositoriesParams;
    type Output = Outcome<GitRepositoriesList, ApiException>;

    fn execute(&self, params: GetRepositoriesParams) -> Self::Output {
        networking::execute(self, params)
    }
}

/// `owner/name` pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

pub struct GetRepositoryDetailsUseCase {
    context: NetworkContext,
    call: RepositoryDetailsCall,
}

impl GetRepositoryDetailsUseCase {
    pub fn new(context: NetworkContext) -> Self {
        Self {
            context,
            call: repository_details_call(),
        }
    }
}

impl NetworkingUseCase for GetRepositoryDetailsUseCase {
    type Params = RepositoryRef;
    type Request = RepositoryDetailsRequestAdapter;
    type Response = RepositoryDetailsResponseAdapter;

    fn context(&self) -> &NetworkContext {
        &self.context
    }

    fn api_call(&self) -> &RepositoryDetailsCall {
        &self.call
    }

    fn provide_params(&self, params: &RepositoryRef) -> RepositoryDetailsRequest {
        RepositoryDetailsRequest {
            owner: params.owner.clone(),
            name: params.name.clone(),
        }
    }
}

impl UseCase for GetRepositoryDetailsUseCase {
    type Params = RepositoryRef;
    type Output = Outcome<RepositoryDetails, ApiException>;

    fn execute(&self, params: RepositoryRef) -> Self::Output {
        networking::execute(self, params)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCollaboratorsParams {
    pub collaborators_url: String,
}

pub struct GetCollaboratorsUseCase {
    context: NetworkContext,
    call: CollaboratorsCall,
}

impl GetCollaboratorsUseCase {
    pub fn new(context: NetworkContext) -> Self {
        Self {
            context,
            call: collaborators_call(),
        }
    }
}

impl NetworkingUseCase for GetCollaboratorsUseCase {
    type Params = GetCollaboratorsParams;
    type Request = CollaboratorsRequestAdapter;
    type Response = CollaboratorsResponseAdapter;

    fn context(&self) -> &NetworkContext {
        &self.context
    }

    fn api_call(&self) -> &CollaboratorsCall {
        &self.call
    }

    fn provide_params(&self, params: &GetCollaboratorsParams) -> CollaboratorsRequest {
        CollaboratorsRequest {
            url: params.collaborators_url.clone(),
        }
    }
}

impl UseCase for GetCollaboratorsUseCase {
    type Params = GetCollaboratorsParams;
    type Output = Outcome<GitCollaboratorList, ApiException>;

    fn execute(&self, params: GetCollaboratorsParams) -> Self::Output {
        networking::execute(self, params)
    }
}

/// Which people listing of a repository to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollaboratorType {
    /// Anyone with commits; public.
    #[default]
    Contributors,
    /// Users with push access; needs an authenticated token.
    Collaborators,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorsFromRepositoryParams {
    pub repository: RepositoryRef,
    pub collaborator_type: CollaboratorType,
}

/// Looks up a repository, then lists its contributors or collaborators.
/// The first failure is returned as is.
pub struct GetCollaboratorsFromRepositoryDetailsUseCase {
    details: GetRepositoryDetailsUseCase,
    collaborators: GetCollaboratorsUseCase,
}

impl GetCollaboratorsFromRepositoryDetailsUseCase {
    pub fn new(details: GetRepositoryDetailsUseCase, collaborators: GetCollaboratorsUseCase) -> Self {
        Self { details, collaborators }
    }

    pub fn from_context(context: NetworkContext) -> Self {
        Self::new(
            GetRepositoryDetailsUseCase::new(context.clone()),
            GetCollaboratorsUseCase::new(context),
        )
    }
}

impl UseCase for GetCollaboratorsFromRepositoryDetailsUseCase {
    type Params = CollaboratorsFromRepositoryParams;
    type Output = Outcome<GitCollaboratorList, ApiException>;

    fn execute(&self, params: CollaboratorsFromRepositoryParams) -> Self::Output {
        let details = match self.details.execute(params.repository) {
            Outcome::Success(details) => details,
            Outcome::Failure(e) => return Outcome::failure(e),
        };
        let collaborators_url = match params.collaborator_type {
            CollaboratorType::Contributors => details.contributors_url,
            CollaboratorType::Collaborators => details.collaborators_url,
        };
        self.collaborators
            .execute(GetCollaboratorsParams { collaborators_url })
    }
}
