mod check;
mod translate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use langsync_cli::config::{Overrides, Settings};
use tracing_subscriber::EnvFilter;

use crate::check::run_check_changes_command;
use crate::translate::{run_translate_all_command, run_translate_module_command};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Android project root directory
    #[arg(long, global = true, env = "ANDROID_PROJECT_ROOT")]
    project_root: Option<PathBuf>,

    /// Config file (defaults to <project root>/langsync.toml when present)
    #[arg(long, global = true, env = "LANGSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Translation provider: openai or deepseek
    #[arg(long, global = true, env = "TRANSLATION_PROVIDER")]
    provider: Option<String>,

    /// API key for the translation provider
    #[arg(long, global = true, env = "TRANSLATION_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Override the provider's base URL
    #[arg(long, global = true, env = "TRANSLATION_API_BASE_URL")]
    base_url: Option<String>,

    /// Override the provider's model
    #[arg(long, global = true, env = "TRANSLATION_MODEL")]
    model: Option<String>,

    /// Comma-separated target locales (e.g. "es,zh-TW"); all supported when omitted
    #[arg(long, global = true, env = "TRANSLATION_LANGUAGES", value_delimiter = ',')]
    locales: Vec<String>,

    /// Language of the default strings file
    #[arg(long, global = true, env = "SOURCE_LANGUAGE")]
    source_locale: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate changes of every default strings.xml in the project.
    TranslateAll,

    /// Translate changes of one module's default strings.xml.
    TranslateModule {
        /// Module directory, absolute or relative to the project root
        #[arg(long)]
        module_path: PathBuf,
    },

    /// Report uncommitted changes of default strings.xml files without translating.
    CheckChanges,
}

impl From<GlobalArgs> for Overrides {
    fn from(args: GlobalArgs) -> Self {
        Overrides {
            project_root: args.project_root,
            config: args.config,
            provider: args.provider,
            api_key: args.api_key,
            base_url: args.base_url,
            model: args.model,
            locales: args
                .locales
                .into_iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
            source_locale: args.source_locale,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("langsync=debug,langsync_cli=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("langsync=info,langsync_cli=info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> Result<(), String> {
    let settings = Settings::resolve(cli.global.into())?;
    match cli.commands {
        Commands::TranslateAll => run_translate_all_command(&settings).await,
        Commands::TranslateModule { module_path } => {
            run_translate_module_command(&settings, &module_path).await
        }
        Commands::CheckChanges => run_check_changes_command(&settings).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
