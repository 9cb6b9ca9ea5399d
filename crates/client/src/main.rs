//! `quizdesk` command-line entry point.
//!
//! Usage:
//!   quizdesk login <username> <password>
//!   quizdesk whoami
//!   quizdesk open <path>
//!   quizdesk logout
//!   quizdesk health

use std::sync::Arc;

use anyhow::{Context, bail};
use quizdesk_auth::{RouteName, Router};
use quizdesk_client::{
    ApiClient, ClientConfig, IdentityStore, Navigator, ReqwestBackend, SessionState, SqliteIdentityStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env()?;
    quizdesk_observability::init(config.log_format);

    tracing::info!(api_url = %config.api_url, store = %config.store_path.display(), "starting client");

    let store: Arc<dyn IdentityStore> = Arc::new(
        SqliteIdentityStore::open(&config.store_path)
            .await
            .with_context(|| format!("failed to open identity store at {:?}", config.store_path))?,
    );
    let session = Arc::new(SessionState::restore(store).await);
    let backend = Arc::new(ReqwestBackend::new(config.api_url.clone())?);
    let api = ApiClient::new(backend, session.clone());
    let navigator = Navigator::new(Router::new(config.site_title.clone()));

    {
        let navigator = navigator.clone();
        let session = session.clone();
        api.on_unauthorized(move || {
            navigator.push(RouteName::Login, &session.identity());
        });
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["login", username, password] => {
            let identity = session.login(&api, username, password).await?;
            let nav = navigator.push(RouteName::Index, &identity);
            println!("logged in as {} ({}); landing on {}", identity.username(), identity.role(), nav.entered);
        }
        ["whoami"] => {
            match session.load_identity(&api).await {
                Ok(identity) => println!("{} ({})", identity.username(), identity.role()),
                Err(err) => {
                    tracing::warn!(error = %err, "could not load identity");
                    let cached = session.identity();
                    println!("{} ({}, cached)", cached.username(), cached.role());
                }
            }
        }
        ["open", path] => {
            let nav = navigator.open(path, &session.identity());
            println!("{} -> {} [{}]", nav.requested, nav.entered, nav.title);
        }
        ["logout"] => {
            session.logout(&api).await?;
            println!("logged out");
        }
        ["health"] => {
            let healthy = api.check_health().await;
            println!("{}", if healthy { "ok" } else { "unreachable" });
        }
        _ => bail!("usage: quizdesk <login USER PASS | whoami | open PATH | logout | health>"),
    }

    if let Some(route) = navigator.current() {
        tracing::debug!(route = %route, "final location");
    }

    Ok(())
}
