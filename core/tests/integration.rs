//! End-to-end use case runs against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every GitHub use case
//! through `UreqTransport` over real HTTP. Checks that request building,
//! status classification and parsing agree with what the server sends.

use std::sync::Arc;
use std::time::Duration;

use hubview_core::github::use_cases::{
    CollaboratorType, CollaboratorsFromRepositoryParams, GetCollaboratorsFromRepositoryDetailsUseCase,
    GetCollaboratorsParams, GetCollaboratorsUseCase, GetRepositoriesParams, GetRepositoriesUseCase,
    GetRepositoryDetailsUseCase, RepositoryRef, SearchFilter,
};
use hubview_core::{
    ApiClient, ApiException, ClientConfig, ErrorState, InMemoryStore, NetworkContext, RepositoryStore,
    ToggleConnectivity, UseCase,
};

/// Start the mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn context_for(config: &ClientConfig, online: bool) -> NetworkContext {
    NetworkContext::new(
        Arc::new(ApiClient::from_config(config)),
        Arc::new(ToggleConnectivity::new(online)),
    )
}

#[test]
fn browse_repositories_and_contributors() {
    let base_url = start_server();
    let context = context_for(&ClientConfig::new(&base_url), true);

    // Step 1: first page, default page size.
    let store = Arc::new(InMemoryStore::new());
    let search = GetRepositoriesUseCase::new(context.clone()).with_store(store.clone());
    let page = search.execute(GetRepositoriesParams::page(1)).get_result();
    assert_eq!(page.total_count, 3);
    let names: Vec<&str> = page.items.iter().map(|r| r.repo_name.as_str()).collect();
    assert_eq!(names, vec!["JetBrains/kotlin", "square/okhttp", "square/retrofit"]);
    assert!(page.items[2].description.is_none());

    // Step 2: smaller pages walk the same ordering.
    let second = search
        .execute(GetRepositoriesParams { page: 2, per_page: 2 })
        .get_result();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].repo_name, "square/retrofit");

    // Step 3: the store sees the fetched items eventually.
    let mut stored = Vec::new();
    for _ in 0..200 {
        stored = store.all_repositories();
        if stored.len() == 3 {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(stored.len(), 3);
    assert_eq!(store.repositories_filtered("square").len(), 2);

    // Step 4: details through path segments.
    let details = GetRepositoryDetailsUseCase::new(context.clone())
        .execute(RepositoryRef::new("square", "okhttp"))
        .get_result();
    assert_eq!(details.full_name, "square/okhttp");
    assert_eq!(details.contributors_url, format!("{base_url}/repos/square/okhttp/contributors"));
    assert_eq!(details.collaborators_url, format!("{base_url}/repos/square/okhttp/collaborators"));

    // Step 5: follow the literal contributors URL.
    let contributors = GetCollaboratorsUseCase::new(context.clone())
        .execute(GetCollaboratorsParams {
            collaborators_url: details.contributors_url,
        })
        .get_result();
    let logins: Vec<&str> = contributors.collaborators.iter().map(|c| c.login.as_str()).collect();
    assert_eq!(logins, vec!["swankjesse", "yschimke"]);
    assert_eq!(contributors.collaborators[0].contributions, Some(3100));

    // Step 6: the composite does steps 4 and 5 in one go.
    let composite = GetCollaboratorsFromRepositoryDetailsUseCase::from_context(context)
        .execute(CollaboratorsFromRepositoryParams {
            repository: RepositoryRef::new("JetBrains", "kotlin"),
            collaborator_type: CollaboratorType::Contributors,
        })
        .get_result();
    assert_eq!(composite.collaborators.len(), 2);
}

#[test]
fn custom_filter_narrows_the_search() {
    let base_url = start_server();
    let search = GetRepositoriesUseCase::new(context_for(&ClientConfig::new(&base_url), true)).with_filter(
        SearchFilter {
            query: "language:rust".to_string(),
            ..SearchFilter::default()
        },
    );

    let page = search.execute(GetRepositoriesParams::page(1)).get_result();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].repo_name, "rust-lang/rust");
}

#[test]
fn collaborators_need_a_token() {
    let base_url = start_server();
    let params = || CollaboratorsFromRepositoryParams {
        repository: RepositoryRef::new("square", "okhttp"),
        collaborator_type: CollaboratorType::Collaborators,
    };

    let anonymous = GetCollaboratorsFromRepositoryDetailsUseCase::from_context(context_for(
        &ClientConfig::new(&base_url),
        true,
    ));
    let err = anonymous.execute(params()).get_error();
    assert!(
        matches!(&err, ApiException::Unauthorized(body) if body.contains("Requires authentication")),
        "got {err:?}"
    );
    assert_eq!(ErrorState::from(&err), ErrorState::Unknown);

    let authorized = GetCollaboratorsFromRepositoryDetailsUseCase::from_context(context_for(
        &ClientConfig::new(&base_url).with_token("t0ken"),
        true,
    ));
    let list = authorized.execute(params()).get_result();
    assert_eq!(list.collaborators.len(), 2);
}

#[test]
fn missing_repository_is_unexpected() {
    let base_url = start_server();
    let err = GetRepositoryDetailsUseCase::new(context_for(&ClientConfig::new(&base_url), true))
        .execute(RepositoryRef::new("nobody", "nothing"))
        .get_error();

    assert_eq!(
        err,
        ApiException::Unexpected(r#"responseCode: 404, errorBody: {"message":"Not Found"}"#.to_string())
    );
}

#[test]
fn invalid_page_size_is_unexpected() {
    let base_url = start_server();
    let err = GetRepositoriesUseCase::new(context_for(&ClientConfig::new(&base_url), true))
        .execute(GetRepositoriesParams { page: 1, per_page: 0 })
        .get_error();

    assert!(
        matches!(&err, ApiException::Unexpected(msg) if msg.starts_with("responseCode: 422")),
        "got {err:?}"
    );
}

#[test]
fn offline_short_circuits() {
    let base_url = start_server();
    let err = GetRepositoriesUseCase::new(context_for(&ClientConfig::new(&base_url), false))
        .execute(GetRepositoriesParams::page(1))
        .get_error();

    assert_eq!(err, ApiException::NoInternet);
    assert_eq!(ErrorState::from(&err), ErrorState::NoInternet);
}

#[test]
fn refused_connection_is_a_network_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let config = ClientConfig::new(&format!("http://{addr}")).with_timeout(Duration::from_secs(2));

    let err = GetRepositoryDetailsUseCase::new(context_for(&config, true))
        .execute(RepositoryRef::new("square", "okhttp"))
        .get_error();

    assert!(matches!(err, ApiException::Network(_)), "got {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn async_execution_matches_blocking() {
    let base_url = start_server();
    let details = GetRepositoryDetailsUseCase::new(context_for(&ClientConfig::new(&base_url), true));

    let outcome = details.execute_async(RepositoryRef::new("square", "retrofit")).await;
    assert_eq!(outcome.get_result().full_name, "square/retrofit");
}
