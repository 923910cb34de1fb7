use std::sync::Arc;

use anyhow::Result;
use folio_console::{Route, ToastLog, Visit};
use folio_core::FolioConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = FolioConfig::new();
    config.load_env();
    let config = config.snapshot();

    let mut console = folio_console::build(&config, Arc::new(ToastLog::new())).await?;
    console.ready().await;

    if let (Some(email), Some(password)) = (config.get("auth.email"), config.get("auth.password")) {
        console.sign_in(email, password).await;
    }

    match console.visit(Route::Dashboard).await {
        Visit::Dashboard(dashboard) => {
            for card in dashboard.cards {
                let count = card
                    .count
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "unavailable".to_string());
                println!("[folio] {:<12} {count}", card.title);
            }
        }
        _ => {
            let login = match console.visit(Route::Login).await {
                Visit::Login(view) => view,
                _ => return Ok(()),
            };
            if login.access_denied {
                println!("[folio] access denied for {}", login.signed_in_as.unwrap_or_default());
            } else if login.allow_list_unavailable {
                println!("[folio] admin allow-list unavailable, try again later");
            } else if let Some(error) = login.error {
                println!("[folio] {error}");
            } else {
                println!("[folio] not signed in (set FOLIO__AUTH__EMAIL and FOLIO__AUTH__PASSWORD)");
            }
        }
    }

    console.auth().teardown();
    Ok(())
}
