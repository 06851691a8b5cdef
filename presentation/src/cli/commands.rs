//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use studio_domain::{DomainId, FeedbackScore, ModelId, OutputId, OutputType, PromptId, SelectionMode};

/// CLI arguments for x-studio
#[derive(Parser, Debug)]
#[command(name = "x-studio")]
#[command(author, version, about = "Feedback-driven post and image suggestions")]
#[command(long_about = r#"
x-studio pairs AI models with prompt templates and learns from your votes.

Each suggestion picks one (model, prompt) pair:
  random    uniform draw, ignores votes
  weighted  softmax over vote totals; good pairs win more often
  highest   the best-voted pair, deterministic

Configuration files are loaded from (in priority order):
1. XSTUDIO_* environment variables (e.g. XSTUDIO_SELECTION__TEMPERATURE=0.5)
2. --config <path>        Explicit config file
3. ./x-studio.toml        Project-level config
4. ~/.config/x-studio/config.toml   Global config

Example:
  x-studio suggest --context "autumn in Kyoto" --mode weighted
  x-studio feedback 12 up --comment "great hook"
  x-studio rewrite 3
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators and diagnostics
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostics to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Generate one suggestion and store it
    Suggest(SuggestArgs),

    /// Vote on a stored output
    Feedback {
        /// Output to vote on
        output_id: OutputId,

        /// up, down, 1 or -1
        #[arg(allow_negative_numbers = true)]
        score: FeedbackScore,

        /// Optional free-text comment
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Rewrite a prompt template using its feedback history
    Rewrite {
        prompt_id: PromptId,
    },

    /// Manage AI models
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Manage domains
    Domains {
        #[command(subcommand)]
        action: DomainAction,
    },

    /// Manage prompt templates
    Prompts {
        #[command(subcommand)]
        action: PromptAction,
    },

    /// Show the feedback history of one (model, prompt) pair
    History {
        model_id: ModelId,
        prompt_id: PromptId,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SuggestArgs {
    /// Text substituted for {context} in the prompt
    #[arg(short, long)]
    pub context: Option<String>,

    /// Selection mode: random, weighted or highest (defaults to config)
    #[arg(short, long)]
    pub mode: Option<SelectionMode>,

    /// Restrict candidates to one domain
    #[arg(short, long, value_name = "DOMAIN_ID")]
    pub domain: Option<DomainId>,

    /// Generate an image instead of text
    #[arg(long)]
    pub image: bool,
}

impl SuggestArgs {
    pub fn output_type(&self) -> OutputType {
        if self.image {
            OutputType::Image
        } else {
            OutputType::Text
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ModelAction {
    /// List all models
    List,
    /// Register a model
    Add {
        /// Provider routing name, e.g. openrouter/openai/o3-mini
        name: String,
        /// Model produces text
        #[arg(long)]
        text: bool,
        /// Model produces images
        #[arg(long)]
        image: bool,
    },
    /// Remove a model and its outputs
    Remove { model_id: ModelId },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum DomainAction {
    /// List all domains
    List,
    /// Create a domain
    Add { name: String },
    /// Remove a domain with its prompts and outputs
    Remove { domain_id: DomainId },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum PromptAction {
    /// List prompts, optionally for one domain
    List {
        #[arg(short, long, value_name = "DOMAIN_ID")]
        domain: Option<DomainId>,
    },
    /// Add a prompt template (must contain {context})
    Add {
        template: String,
        #[arg(short, long, value_name = "DOMAIN_ID", default_value = "1")]
        domain: DomainId,
        /// Template produces images
        #[arg(long)]
        image: bool,
    },
    /// Remove a prompt and its outputs
    Remove { prompt_id: PromptId },
}
