mod admin;
mod chat;
mod cli;
mod config;
mod prompt;
mod wizard;

use anyhow::Result;
use clap::Parser;
use enrollment_flow::{
    AdminPanel, ChatAssistant, ChatModel, JsonFileSubmissionStore, OpenRouterChatModel,
    UnconfiguredChatModel, Wizard, WizardSession,
};
use std::sync::Arc;
use tracing::{Instrument, info, info_span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::cli::{Cli, Cmd};
use crate::config::Config;
use crate::prompt::Prompt;

/// Initialize tracing based on environment variables; logs go to stderr so
/// they stay apart from the prompts
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "enrollment_cli=info,enrollment_flow=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env()?.apply(&cli);
    let mut prompt = Prompt::new(std::io::stdin().lock(), std::io::stdout());

    match cli.cmd {
        Cmd::Wizard => {
            let store = JsonFileSubmissionStore::with_quota(&config.store_path, config.quota_bytes);
            let mut session = WizardSession::new(Arc::new(Wizard::standard()));
            let span = info_span!("enrollment", session_id = %Uuid::new_v4());
            let today = chrono::Local::now().date_naive();
            async {
                info!(store = %config.store_path.display(), "starting enrollment");
                wizard::run(&mut prompt, &mut session, &store, today).await
            }
            .instrument(span)
            .await?;
        }
        Cmd::Admin { action } => {
            let store = Arc::new(JsonFileSubmissionStore::with_quota(
                &config.store_path,
                config.quota_bytes,
            ));
            admin::run(&mut prompt, &AdminPanel::new(store), action).await?;
        }
        Cmd::Chat { model } => {
            let model_name = model.unwrap_or_else(|| config.chat_model.clone());
            let model: Box<dyn ChatModel> = match &config.openrouter_api_key {
                Some(api_key) => {
                    info!(model = %model_name, "chat assistant using OpenRouter");
                    Box::new(OpenRouterChatModel::new(api_key, &model_name))
                }
                None => Box::new(UnconfiguredChatModel),
            };
            chat::run(&mut prompt, &mut ChatAssistant::new(model)).await?;
        }
    }

    Ok(())
}
