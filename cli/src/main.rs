//! hubview CLI - browse GitHub repositories and their contributors.

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hubview_core::fuzzy::matches_fuzzy_search;
use hubview_core::github::use_cases::{
    CollaboratorType, CollaboratorsFromRepositoryParams, GetCollaboratorsFromRepositoryDetailsUseCase,
    GetRepositoriesParams, GetRepositoriesUseCase, GetRepositoryDetailsUseCase, RepositoryRef, SearchFilter,
    DEFAULT_PER_PAGE,
};
use hubview_core::{
    ApiClient, ApiException, ClientConfig, ErrorState, NetworkContext, Outcome, ToggleConnectivity, UseCase,
};

#[derive(Parser)]
#[command(name = "hubview")]
#[command(version)]
#[command(about = "Browse GitHub repositories and the people behind them")]
#[command(after_long_help = r#"ENVIRONMENT VARIABLES
    HUBVIEW_BASE_URL        API root (default: https://api.github.com)
    HUBVIEW_TIMEOUT_SECS    Per-request timeout in seconds (default: 30)
    HUBVIEW_USER_AGENT      User-Agent header
    HUBVIEW_GITHUB_TOKEN    Personal access token, sent as a bearer token
    RUST_LOG                Log filter (default: warn)
"#)]
struct Cli {
    /// API root, overriding HUBVIEW_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Access token, overriding HUBVIEW_GITHUB_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,

    /// Behave as if the network were down
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the most-starred repositories matching a search query
    Search {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: u32,
        /// GitHub search query
        #[arg(long, short, default_value = "language:kotlin")]
        query: String,
        /// Keep only results whose name fuzzily matches this term
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show a repository and where its people listings live
    Details { owner: String, name: String },
    /// List a repository's contributors
    Contributors {
        owner: String,
        name: String,
        /// List collaborators instead (needs a token)
        #[arg(long)]
        collaborators: bool,
    },
}

fn context(cli: &Cli) -> anyhow::Result<NetworkContext> {
    let mut config = ClientConfig::from_env().context("invalid environment configuration")?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(token) = &cli.token {
        config = config.with_token(token.clone());
    }
    tracing::debug!(base_url = %config.base_url, authenticated = config.token.is_some(), "client configured");
    Ok(NetworkContext::new(
        Arc::new(ApiClient::from_config(&config)),
        Arc::new(ToggleConnectivity::new(!cli.offline)),
    ))
}

fn finish<T>(outcome: Outcome<T, ApiException>) -> anyhow::Result<T> {
    match outcome {
        Outcome::Success(value) => Ok(value),
        Outcome::Failure(err) => {
            let headline = match ErrorState::from(&err) {
                ErrorState::NoInternet => "no internet connection",
                ErrorState::Unknown => "something went wrong",
            };
            bail!("{headline}: {err}")
        }
    }
}

fn main() -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let context = context(&cli)?;

    match cli.command {
        Commands::Search {
            page,
            per_page,
            query,
            filter,
        } => {
            let use_case = GetRepositoriesUseCase::new(context).with_filter(SearchFilter {
                query,
                ..SearchFilter::default()
            });
            let list = finish(use_case.execute(GetRepositoriesParams { page, per_page }))?;
            let term = filter.unwrap_or_default();
            println!("{} repositories in total, page {page}", list.total_count);
            for repo in list.items.iter().filter(|r| matches_fuzzy_search(&r.repo_name, &term)) {
                println!(
                    "{:>8}  {:<40} {}",
                    repo.stargazers_count,
                    repo.repo_name,
                    repo.description.as_deref().unwrap_or("")
                );
            }
        }
        Commands::Details { owner, name } => {
            let details = finish(GetRepositoryDetailsUseCase::new(context).execute(RepositoryRef::new(owner, name)))?;
            println!("{}", details.full_name);
            println!("  contributors:  {}", details.contributors_url);
            println!("  collaborators: {}", details.collaborators_url);
        }
        Commands::Contributors {
            owner,
            name,
            collaborators,
        } => {
            let collaborator_type = if collaborators {
                CollaboratorType::Collaborators
            } else {
                CollaboratorType::Contributors
            };
            let use_case = GetCollaboratorsFromRepositoryDetailsUseCase::from_context(context);
            let list = finish(use_case.execute(CollaboratorsFromRepositoryParams {
                repository: RepositoryRef::new(owner, name),
                collaborator_type,
            }))?;
            for person in list.collaborators {
                match person.contributions {
                    Some(n) => println!("{:>8}  {}", n, person.login),
                    None => println!("{:>8}  {}", "-", person.login),
                }
            }
        }
    }
    Ok(())
}
