//! CLI entrypoint for x-studio
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser};
use std::sync::Arc;
use studio_application::{GetSuggestionInput, SuggestionEngine, SuggestionStore};
use studio_domain::{OutputType, SelectionMode};
use studio_infrastructure::config::FileStorageConfig;
use studio_infrastructure::{
    ConfigLoader, FileConfig, InMemoryStore, JsonFileStore, JsonlEventLogger,
    OpenAiCompatibleGateway, Severity, StorageBackend,
};
use studio_presentation::{
    Cli, Command, DomainAction, ModelAction, OutputConfig, PromptAction, SuggestArgs,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let Some(command) = cli.command.clone() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    info!("Starting x-studio");

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    for issue in file_config.validate() {
        if issue.severity == Severity::Warning {
            warn!("{}", issue.message);
        }
    }
    let engine_config = file_config
        .to_engine_config()
        .map_err(|e| anyhow!("{}", e))?;
    let default_mode = file_config.parse_default_mode()?;

    // === Dependency Injection ===
    let store = open_store(&file_config.storage).await?;
    let gateway = Arc::new(OpenAiCompatibleGateway::from_config(&file_config.providers));
    if !gateway.has_text_key() {
        info!(
            "{} is not set; text generation will fail",
            file_config.providers.api_key_env
        );
    }

    let mut engine = SuggestionEngine::new(store, gateway, &engine_config)?;
    if let Some(logger) = open_event_log(&file_config) {
        engine = engine.with_logger(logger);
    }

    let output = OutputConfig::from_cli(&cli);
    let rendered = run_command(&engine, command, default_mode, &output).await?;
    println!("{}", rendered);

    Ok(())
}

/// Console diagnostics go to stderr; `--log-file` adds a plain-text copy
fn init_tracing(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace", // -vvv or more
        }
    };

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &cli.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("--log-file has no file name: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(console)
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn open_store(config: &FileStorageConfig) -> Result<Arc<dyn SuggestionStore>> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory store; data is discarded on exit");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StorageBackend::File => {
            let path = match &config.path {
                Some(path) => path.clone(),
                None => JsonFileStore::default_path()
                    .context("Could not determine a data directory; set storage.path")?,
            };
            let store = JsonFileStore::open(&path)
                .await
                .with_context(|| format!("Failed to open store {}", path.display()))?;
            info!("Using store {}", store.path().display());
            Ok(Arc::new(store))
        }
    }
}

fn open_event_log(config: &FileConfig) -> Option<Arc<JsonlEventLogger>> {
    let path = config.logging.events_file.as_ref()?;
    let logger = JsonlEventLogger::open(path)?;
    info!("Writing engine events to {}", logger.path().display());
    Some(Arc::new(logger))
}

/// Token cancelled on Ctrl-C so in-flight retries stop promptly
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            child.cancel();
        }
    });
    token
}

fn suggestion_input(args: SuggestArgs, default_mode: SelectionMode) -> GetSuggestionInput {
    let mut input = GetSuggestionInput::new(args.output_type())
        .with_mode(args.mode.unwrap_or(default_mode));
    if let Some(context) = args.context {
        input = input.with_context(context);
    }
    if let Some(domain_id) = args.domain {
        input = input.with_domain(domain_id);
    }
    input
}

async fn run_command(
    engine: &SuggestionEngine,
    command: Command,
    default_mode: SelectionMode,
    output: &OutputConfig,
) -> Result<String> {
    let formatter = output.formatter();
    let progress = output.progress();
    let catalog = engine.catalog();

    let rendered = match command {
        Command::Suggest(args) => {
            let spinner = progress.start(format!("Generating {} suggestion...", args.output_type()));
            let input = suggestion_input(args, default_mode);
            let cancel = cancel_on_ctrl_c();
            match engine.get_suggestion_with_cancel(input, &cancel).await {
                Ok(suggestion) => {
                    spinner.clear();
                    formatter.suggestion(&suggestion)
                }
                Err(e) => {
                    spinner.fail(format!("Generation failed ({})", e.kind()));
                    return Err(e.into());
                }
            }
        }

        Command::Feedback {
            output_id,
            score,
            comment,
        } => {
            let feedback_id = engine.submit_feedback(output_id, score, comment).await?;
            formatter.feedback(feedback_id, output_id, score)
        }

        Command::Rewrite { prompt_id } => {
            let spinner = progress.start(format!("Rewriting prompt {}...", prompt_id));
            let cancel = cancel_on_ctrl_c();
            match engine.rewrite_prompt_with_cancel(prompt_id, &cancel).await {
                Ok(outcome) => {
                    spinner.clear();
                    formatter.rewrite(&outcome)
                }
                Err(e) => {
                    spinner.fail(format!("Rewrite failed ({})", e.kind()));
                    return Err(e.into());
                }
            }
        }

        Command::Models { action } => match action {
            ModelAction::List => formatter.models(&catalog.list_models().await?),
            ModelAction::Add { name, text, image } => {
                let model = catalog.add_model(&name, text, image).await?;
                formatter.done(&format!(
                    "Added model {} ({}, {})",
                    model.id,
                    model.name,
                    model.capability_label()
                ))
            }
            ModelAction::Remove { model_id } => {
                catalog.remove_model(model_id).await?;
                formatter.done(&format!("Removed model {}", model_id))
            }
        },

        Command::Domains { action } => match action {
            DomainAction::List => formatter.domains(&catalog.list_domains().await?),
            DomainAction::Add { name } => {
                let domain = catalog.add_domain(&name).await?;
                formatter.done(&format!("Added domain {} ({})", domain.id, domain.name))
            }
            DomainAction::Remove { domain_id } => {
                catalog.remove_domain(domain_id).await?;
                formatter.done(&format!("Removed domain {}", domain_id))
            }
        },

        Command::Prompts { action } => match action {
            PromptAction::List { domain } => formatter.prompts(&catalog.list_prompts(domain).await?),
            PromptAction::Add {
                template,
                domain,
                image,
            } => {
                let output_type = if image {
                    OutputType::Image
                } else {
                    OutputType::Text
                };
                let prompt = catalog.add_prompt(domain, &template, output_type).await?;
                formatter.done(&format!(
                    "Added {} prompt {} to domain {}",
                    prompt.output_type, prompt.id, prompt.domain_id
                ))
            }
            PromptAction::Remove { prompt_id } => {
                catalog.remove_prompt(prompt_id).await?;
                formatter.done(&format!("Removed prompt {}", prompt_id))
            }
        },

        Command::History {
            model_id,
            prompt_id,
        } => formatter.history(&catalog.history(model_id, prompt_id).await?),
    };

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_application::EngineConfig;
    use studio_domain::DomainId;

    fn engine() -> SuggestionEngine {
        let gateway = Arc::new(OpenAiCompatibleGateway::new(
            "http://127.0.0.1:9",
            None,
            "http://127.0.0.1:9",
            None,
        ));
        SuggestionEngine::new(Arc::new(InMemoryStore::new()), gateway, &EngineConfig::default())
            .unwrap()
    }

    fn json_output() -> OutputConfig {
        OutputConfig::from_cli(&Cli::parse_from(["x-studio", "--json"]))
    }

    #[test]
    fn test_suggestion_input_uses_default_mode() {
        let args = SuggestArgs {
            context: Some("autumn".to_string()),
            mode: None,
            domain: Some(DomainId(2)),
            image: true,
        };
        let input = suggestion_input(args, SelectionMode::Highest);
        assert_eq!(input.mode, SelectionMode::Highest);
        assert_eq!(input.output_type, OutputType::Image);
        assert_eq!(input.domain_id, Some(DomainId(2)));
        assert_eq!(input.context.as_deref(), Some("autumn"));
    }

    #[tokio::test]
    async fn test_catalog_commands() {
        let engine = engine();
        let output = json_output();

        let rendered = run_command(
            &engine,
            Command::Domains {
                action: DomainAction::Add {
                    name: "Travel".to_string(),
                },
            },
            SelectionMode::Random,
            &output,
        )
        .await
        .unwrap();
        assert!(rendered.contains("Added domain"));

        let rendered = run_command(
            &engine,
            Command::Domains {
                action: DomainAction::List,
            },
            SelectionMode::Random,
            &output,
        )
        .await
        .unwrap();
        let domains: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(domains.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_protected_domain_surfaces_error() {
        let result = run_command(
            &engine(),
            Command::Domains {
                action: DomainAction::Remove {
                    domain_id: DomainId::DEFAULT,
                },
            },
            SelectionMode::Random,
            &json_output(),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_suggest_without_credentials_fails_cleanly() {
        let args = SuggestArgs {
            context: None,
            mode: Some(SelectionMode::Random),
            domain: None,
            image: false,
        };
        let result = run_command(
            &engine(),
            Command::Suggest(args),
            SelectionMode::Random,
            &json_output(),
        )
        .await;
        let message = result.unwrap_err().to_string();
        assert!(message.contains("credentials") || message.contains("Invalid"), "{}", message);
    }
}
