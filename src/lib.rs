// src/lib.rs
pub mod application;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use anyhow::{anyhow, Context, Result};
use application::{
    normalize_language_code, CategoryAccessor, DeckAccessor, FetchClient, ProgressStore,
    StudySession,
};
use cli::args::{Args, Command, ProgressAction};
use config::Config;
use domain::FetchError;
use infrastructure::{FileStore, ReqwestTransport, TokioScheduler};
use ports::TextPresenter;
use std::path::PathBuf;
use tracing::{debug, info, warn};

type HttpClient = FetchClient<ReqwestTransport, TokioScheduler>;

pub async fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting flashdeck with arguments");

    let config = resolve_config(&args)?;
    let presenter = TextPresenter::new();

    match args.command {
        Command::Languages => {
            let client = build_client(&config)?;
            let index = CategoryAccessor::new(&client)
                .list_categories()
                .await
                .map_err(|e| fetch_failure(&presenter, e))?;
            let progress = open_progress_store(&config).list_all();
            print!("{}", presenter.render_languages(&index, &progress));
        }
        Command::Deck { code, json } => {
            let client = build_client(&config)?;
            let deck = DeckAccessor::new(&client)
                .fetch_deck(&code)
                .await
                .map_err(|e| fetch_failure(&presenter, e))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&deck)?);
            } else {
                print!("{}", presenter.render_deck(&deck));
            }
        }
        Command::Study {
            code,
            advance,
            reset,
        } => {
            let code = normalize_language_code(&code).map_err(|e| fetch_failure(&presenter, e))?;
            let client = build_client(&config)?;
            let deck = DeckAccessor::new(&client)
                .fetch_deck(&code)
                .await
                .map_err(|e| fetch_failure(&presenter, e))?;

            let mut store = open_progress_store(&config);
            let mut session = StudySession::restore(&deck, store.load(&code).as_ref());

            if reset {
                info!(%code, "Resetting progress");
                session.reset();
                store.reset(&code);
            }
            for _ in 0..advance {
                let (index, order) = session.advance();
                store.save(&code, index, &order);
            }

            print!("{}", presenter.render_session(&deck.name, &session));
        }
        Command::Progress { action } => {
            let mut store = open_progress_store(&config);
            match action {
                ProgressAction::List => {
                    print!("{}", presenter.render_progress_table(&store.list_all()));
                }
                ProgressAction::Reset { code } => {
                    let code =
                        normalize_language_code(&code).map_err(|e| fetch_failure(&presenter, e))?;
                    store.reset(&code);
                    println!("Progress for {} reset", code);
                }
                ProgressAction::Clear => {
                    store.clear_all();
                    println!("All progress cleared");
                }
            }
        }
    }

    Ok(())
}

/// Config file (or defaults) with command-line overrides applied
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = Config::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(base_url) = &args.base_url {
        debug!(%base_url, "Overriding base URL");
        config.api.base_url = base_url.clone();
    }
    if let Some(dir) = &args.data_dir {
        debug!(?dir, "Overriding data directory");
        config.storage.dir = Some(dir.clone());
    }

    Ok(config)
}

fn build_client(config: &Config) -> Result<HttpClient> {
    let transport = ReqwestTransport::new()?;
    Ok(FetchClient::new(transport, TokioScheduler, config.api.clone()))
}

/// Progress store for the configured directory. Never fails: without a usable
/// data directory the current directory is used.
pub fn open_progress_store(config: &Config) -> ProgressStore<FileStore> {
    let backend = match &config.storage.dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::in_data_dir().unwrap_or_else(|e| {
            warn!("{}; keeping progress in the current directory", e);
            FileStore::new(PathBuf::from("."))
        }),
    };
    debug!(dir = %backend.dir().display(), "Using progress store");
    ProgressStore::new(backend)
}

fn fetch_failure(presenter: &TextPresenter, err: FetchError) -> anyhow::Error {
    anyhow!(presenter.render_fetch_error(&err))
}
