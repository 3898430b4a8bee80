use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use prdigest_core::{OutputFormat, PrDigestConfig, PromptLanguage};
use prdigest_review::github::{parse_repo_reference, GitHubClient};
use prdigest_review::llm::LlmClient;
use prdigest_review::pipeline::PrProcessor;

#[derive(Parser)]
#[command(
    name = "prdigest",
    version,
    about = "Summarize a repository's open pull requests with an LLM",
    long_about = "prdigest collects every open pull request of a GitHub repository together\n\
                   with its discussion and review comments, and asks an LLM for one digest:\n\
                   title, description summary, and who said what in review.\n\n\
                   Examples:\n  \
                     prdigest summarize octocat/hello-world\n  \
                     prdigest summarize octocat/hello-world --language ko\n  \
                     prdigest summarize octocat/hello-world --dry-run --format json\n  \
                     prdigest init"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .prdigest.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      The summary exactly as the model wrote it (default)\n  \
                         json      Summary and run statistics with camelCase keys\n  \
                         markdown  Summary under a heading with run statistics"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize the open pull requests of a repository
    #[command(long_about = "Summarize the open pull requests of a repository.\n\n\
        Lists open pull requests, fetches their discussion and review comments,\n\
        drops comments from automation accounts, and sends everything to the LLM\n\
        in a single request.\n\n\
        Examples:\n  prdigest summarize owner/repo\n  prdigest summarize owner/repo --model gpt-4o --dry-run")]
    Summarize {
        /// Repository to summarize (format: owner/repo)
        repo: String,
        /// GitHub token (default: [github].token, GITHUB_TOKEN, or GH_TOKEN)
        #[arg(long)]
        github_token: Option<String>,
        /// GitHub API base URL
        #[arg(long)]
        api_url: Option<String>,
        /// Model identifier for the summary
        #[arg(long)]
        model: Option<String>,
        /// Language of the summary instructions (en, ko)
        #[arg(long)]
        language: Option<PromptLanguage>,
        /// Skip comments whose author contains this marker
        #[arg(long)]
        bot_marker: Option<String>,
        /// Print the assembled messages without calling the LLM
        #[arg(long)]
        dry_run: bool,
    },
    /// Create a default .prdigest.toml configuration file
    #[command(long_about = "Create a default .prdigest.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .prdigest.toml already exists.")]
    Init,
}

const DEFAULT_CONFIG: &str = r#"# prdigest configuration
# See: https://github.com/Meru143/prdigest

[github]
# api_url = "https://api.github.com"
# token = ""  # or set GITHUB_TOKEN / GH_TOKEN

[llm]
# model = "gpt-4o-mini"
# base_url = "https://models.inference.ai.azure.com"
# api_key = ""  # or set OPENAI_API_KEY; defaults to the GitHub token
# temperature = 0.3
# top_p = 0.2
# max_tokens = 4096

[summary]
# language = "en"  # en | ko
# bot_marker = "[bot]"
"#;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "prdigest=debug,prdigest_review=debug,prdigest_core=debug"
    } else {
        "prdigest=info,prdigest_review=info,prdigest_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PRDIGEST_LOG").unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PrDigestConfig> {
    let config = match path {
        Some(path) => PrDigestConfig::from_file(path)?,
        None => {
            let default_path = Path::new(".prdigest.toml");
            if default_path.exists() {
                PrDigestConfig::from_file(default_path)?
            } else {
                PrDigestConfig::default()
            }
        }
    };
    Ok(config)
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("prdigest v{version}: open pull requests, summarized\n");

    println!("Quick start:");
    println!("  prdigest init                      Create a .prdigest.toml config file");
    println!("  prdigest summarize owner/repo      Summarize open pull requests\n");

    println!("Run 'prdigest <command> --help' for details.");
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        None => print_welcome(),
        Some(Command::Summarize {
            ref repo,
            ref github_token,
            ref api_url,
            ref model,
            language,
            ref bot_marker,
            dry_run,
        }) => {
            let (owner, name) = parse_repo_reference(repo)?;

            if let Some(token) = github_token {
                config.github.token = Some(token.clone());
            }
            if let Some(url) = api_url {
                config.github.api_url = url.clone();
            }
            if let Some(model) = model {
                config.llm.model = model.clone();
            }
            if let Some(language) = language {
                config.summary.language = language;
            }
            if let Some(marker) = bot_marker {
                config.summary.bot_marker = marker.clone();
            }

            let token = config.github.resolve_token().map_err(|e| {
                miette::miette!(
                    help = "Set GITHUB_TOKEN or pass --github-token",
                    "{e}"
                )
            })?;
            config.llm.api_key = config.llm.resolve_api_key(Some(token.as_str()));

            if cli.verbose {
                eprintln!("format: {}", cli.format);
                eprintln!(
                    "model: {} | language: {} | bot marker: {:?}",
                    config.llm.model, config.summary.language, config.summary.bot_marker
                );
            }

            let github = GitHubClient::new(&config.github.api_url, &token)?;
            let llm = LlmClient::new(&config.llm)?;
            let processor = PrProcessor::new(github, llm, owner, name, &config.summary);

            if dry_run {
                let input = processor
                    .collect_messages()
                    .await
                    .inspect_err(|e| tracing::error!(error = %e, "failed to collect pull requests"))?;
                match cli.format {
                    OutputFormat::Json => {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&input.messages).into_diagnostic()?
                        );
                    }
                    OutputFormat::Text | OutputFormat::Markdown => {
                        for message in &input.messages {
                            println!("{}\n", message.content);
                        }
                    }
                }
                return Ok(());
            }

            let is_tty = std::io::stderr().is_terminal();
            let spinner = if is_tty {
                let pb = indicatif::ProgressBar::new_spinner();
                pb.set_style(
                    indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                        .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
                );
                pb.set_message(format!("Summarizing open pull requests of {repo}..."));
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                Some(pb)
            } else {
                None
            };

            let outcome = processor.process().await.inspect_err(|e| {
                if let Some(pb) = &spinner {
                    pb.finish_and_clear();
                }
                tracing::error!(error = %e, "digest failed");
            })?;

            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&outcome).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => print!("{}", outcome.to_markdown()),
                OutputFormat::Text => println!("{outcome}"),
            }
        }
        Some(Command::Init) => {
            let path = Path::new(".prdigest.toml");
            if path.exists() {
                miette::bail!(".prdigest.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .prdigest.toml with default configuration");
        }
    }

    Ok(())
}
