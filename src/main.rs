use std::sync::Arc;

use teloxide::prelude::*;
use tokio::net::TcpListener;

mod commands;
mod config;
mod gateway;
mod handlers;
mod health;
mod models;
mod store;
mod utils;

use config::Config;
use gateway::{Gateway, HoyolabGateway};
use store::CredentialStore;

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Could not load .env: {}", e);
        }
    }

    init_logging();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let store = CredentialStore::load(&config.users_file);
    if store.is_empty() {
        log::info!("no stored credentials in {}", store.path().display());
    } else {
        log::info!("loaded {} users from {}", store.len(), store.path().display());
    }

    let gateway: Gateway = match HoyolabGateway::new(config.api_url.as_str()) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            log::error!("cannot build HoYoLAB client: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(port) = config.port {
        match TcpListener::bind(("0.0.0.0", port)).await {
            Ok(listener) => {
                tokio::spawn(async move {
                    if let Err(e) = health::serve(listener).await {
                        log::error!("health endpoint stopped: {}", e);
                    }
                });
            }
            Err(e) => log::error!("cannot bind health endpoint on port {}: {}", port, e),
        }
    }

    let bot = Bot::new(config.bot_token);

    let mut dependencies = store::dependencies(store);
    dependencies.insert_container(gateway::dependencies(gateway));

    log::info!("Starting bot...");

    Dispatcher::builder(bot, commands::schema())
        .dependencies(dependencies)
        .default_handler(|update| async move {
            log::trace!("ignored update {}", update.id);
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

/// `info` unless `RUST_LOG` says otherwise.
fn init_logging() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}
