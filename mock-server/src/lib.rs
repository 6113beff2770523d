//! In-process fake of the slice of the GitHub REST API that hubview uses.
//!
//! Follow-up URLs (`contributors_url`, `collaborators_url`) are rendered
//! against the `Host` the request came in on, so a client can follow them
//! back to this server.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

const DEFAULT_PER_PAGE: u32 = 30;
const MAX_PER_PAGE: u32 = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub id: u64,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributions: Option<u64>,
}

/// A seeded repository, before URLs are rendered for a host.
#[derive(Clone, Debug)]
pub struct SeedRepository {
    pub id: u64,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub created_at: String,
    pub updated_at: String,
    pub contributors: Vec<(String, u64)>,
    pub collaborators: Vec<String>,
}

impl SeedRepository {
    fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// GitHub's repository JSON, trimmed to what the fake serves.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: User,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub watchers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub default_branch: String,
    pub created_at: String,
    pub updated_at: String,
    pub collaborators_url: String,
    pub contributors_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<Repository>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub order: Option<String>,
    pub sort: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Clone, Default)]
pub struct Db(Arc<RwLock<HashMap<String, SeedRepository>>>);

impl Db {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let repos = seed()
            .into_iter()
            .map(|repo| (repo.full_name().to_lowercase(), repo))
            .collect();
        Self(Arc::new(RwLock::new(repos)))
    }

    pub async fn insert(&self, repo: SeedRepository) {
        self.0.write().await.insert(repo.full_name().to_lowercase(), repo);
    }
}

fn seed() -> Vec<SeedRepository> {
    vec![
        SeedRepository {
            id: 3432266,
            owner: "JetBrains".to_string(),
            name: "kotlin".to_string(),
            description: Some("The Kotlin Programming Language.".to_string()),
            language: Some("Kotlin".to_string()),
            stars: 49000,
            forks: 5700,
            open_issues: 180,
            created_at: "2012-02-13T17:29:58Z".to_string(),
            updated_at: "2024-11-02T10:00:00Z".to_string(),
            contributors: vec![("udalov".to_string(), 7000), ("abreslav".to_string(), 2500)],
            collaborators: vec!["udalov".to_string()],
        },
        SeedRepository {
            id: 5152285,
            owner: "square".to_string(),
            name: "okhttp".to_string(),
            description: Some("Square's meticulous HTTP client for the JVM, Android, and GraalVM.".to_string()),
            language: Some("Kotlin".to_string()),
            stars: 45800,
            forks: 9200,
            open_issues: 150,
            created_at: "2012-07-23T13:42:55Z".to_string(),
            updated_at: "2024-10-30T08:12:00Z".to_string(),
            contributors: vec![("swankjesse".to_string(), 3100), ("yschimke".to_string(), 1900)],
            collaborators: vec!["swankjesse".to_string(), "yschimke".to_string()],
        },
        SeedRepository {
            id: 892275,
            owner: "square".to_string(),
            name: "retrofit".to_string(),
            description: None,
            language: Some("Kotlin".to_string()),
            stars: 43000,
            forks: 7300,
            open_issues: 90,
            created_at: "2010-09-06T21:39:43Z".to_string(),
            updated_at: "2024-10-29T17:40:00Z".to_string(),
            contributors: vec![("JakeWharton".to_string(), 1800)],
            collaborators: vec!["JakeWharton".to_string()],
        },
        SeedRepository {
            id: 724712,
            owner: "rust-lang".to_string(),
            name: "rust".to_string(),
            description: Some("Empowering everyone to build reliable and efficient software.".to_string()),
            language: Some("Rust".to_string()),
            stars: 98000,
            forks: 12700,
            open_issues: 9800,
            created_at: "2010-06-16T20:39:03Z".to_string(),
            updated_at: "2024-11-01T12:00:00Z".to_string(),
            contributors: vec![("bors".to_string(), 40000)],
            collaborators: Vec::new(),
        },
    ]
}

pub fn app() -> Router {
    app_with(Db::seeded())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/search/repositories", get(search_repositories))
        .route("/repos/{owner}/{name}", get(get_repository))
        .route("/repos/{owner}/{name}/contributors", get(list_contributors))
        .route("/repos/{owner}/{name}/collaborators", get(list_collaborators))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorMessage {
            message: message.to_string(),
        }),
    )
        .into_response()
}

fn base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}

fn user(login: &str, contributions: Option<u64>) -> User {
    User {
        login: login.to_string(),
        id: login.bytes().map(u64::from).sum(),
        avatar_url: format!("https://avatars.example.com/{login}"),
        html_url: format!("https://github.com/{login}"),
        contributions,
    }
}

fn render(repo: &SeedRepository, base: &str) -> Repository {
    let full_name = repo.full_name();
    let api = format!("{base}/repos/{full_name}");
    Repository {
        id: repo.id,
        name: repo.name.clone(),
        full_name: full_name.clone(),
        owner: user(&repo.owner, None),
        html_url: format!("https://github.com/{full_name}"),
        description: repo.description.clone(),
        language: repo.language.clone(),
        stargazers_count: repo.stars,
        watchers_count: repo.stars,
        forks_count: repo.forks,
        open_issues_count: repo.open_issues,
        default_branch: "main".to_string(),
        created_at: repo.created_at.clone(),
        updated_at: repo.updated_at.clone(),
        collaborators_url: format!("{api}/collaborators{{/collaborator}}"),
        contributors_url: format!("{api}/contributors"),
    }
}

/// `language:<x>` qualifiers match the language; any other term must appear
/// in the full name. Both are case-insensitive.
fn matches_query(repo: &SeedRepository, q: &str) -> bool {
    let full_name = repo.full_name().to_lowercase();
    q.split_whitespace().all(|term| match term.split_once(':') {
        Some(("language", lang)) => repo
            .language
            .as_deref()
            .is_some_and(|l| l.eq_ignore_ascii_case(lang)),
        Some(_) => true,
        None => full_name.contains(&term.to_lowercase()),
    })
}

async fn search_repositories(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE).min(MAX_PER_PAGE);
    if per_page == 0 {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "Validation Failed");
    }
    let page = params.page.unwrap_or(1).max(1);

    let repos = db.0.read().await;
    let mut hits: Vec<&SeedRepository> = repos.values().filter(|r| matches_query(r, &params.q)).collect();
    let key = |r: &&SeedRepository| match params.sort.as_deref() {
        Some("forks") => r.forks,
        _ => r.stars,
    };
    hits.sort_by_key(|r| (key(r), r.id));
    if params.order.as_deref() != Some("asc") {
        hits.reverse();
    }

    let base = base_url(&headers);
    let total_count = hits.len() as u64;
    let items = hits
        .into_iter()
        .skip((page - 1).saturating_mul(per_page) as usize)
        .take(per_page as usize)
        .map(|r| render(r, &base))
        .collect::<Vec<_>>();
    debug!(q = %params.q, page, per_page, returned = items.len(), "search");

    Json(SearchResults {
        total_count,
        incomplete_results: false,
        items,
    })
    .into_response()
}

async fn get_repository(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((owner, name)): Path<(String, String)>,
) -> Response {
    let repos = db.0.read().await;
    match repos.get(&format!("{owner}/{name}").to_lowercase()) {
        Some(repo) => Json(render(repo, &base_url(&headers))).into_response(),
        None => error(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn list_contributors(State(db): State<Db>, Path((owner, name)): Path<(String, String)>) -> Response {
    let repos = db.0.read().await;
    match repos.get(&format!("{owner}/{name}").to_lowercase()) {
        Some(repo) => {
            let users: Vec<User> = repo
                .contributors
                .iter()
                .map(|(login, n)| user(login, Some(*n)))
                .collect();
            Json(users).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn list_collaborators(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((owner, name)): Path<(String, String)>,
) -> Response {
    if !headers.contains_key(header::AUTHORIZATION) {
        return error(StatusCode::UNAUTHORIZED, "Requires authentication");
    }
    let repos = db.0.read().await;
    match repos.get(&format!("{owner}/{name}").to_lowercase()) {
        Some(repo) => {
            let users: Vec<User> = repo.collaborators.iter().map(|login| user(login, None)).collect();
            Json(users).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Not Found"),
    }
}
