use std::error::Error;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use dotenv::dotenv;
use log::{error, info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use time::OffsetDateTime;

use chat_api::{ChatApiClient, ChatApiConfig, DEFAULT_CHAT_BASE_URL};
use code_search::{SearchClient, SearchConfig};
use repo_chat::backends::{blocking_runtime, HttpCompletionBackend, HttpContextSource};
use repo_chat::config::{self, Settings};
use repo_chat::orchestrator::{Orchestrator, TurnOutcome};
use repo_chat::pricing::report_session_expense;
use repo_chat::prompt::MARKDOWN_SYSTEM_INSTRUCTION;
use session_store::SessionStore;

/// Timeout for completion calls; a timed-out call is a retryable failure.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);
/// Timeout for search-service calls; the service is local and fast.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a context file injected as a system message (repeatable).
    #[arg(short = 'c', long = "context", value_name = "FILE")]
    context: Vec<PathBuf>,

    /// API key for the completion service.
    #[arg(short = 'k', long = "key", env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model used for chat completion.
    #[arg(short = 'm', long, env = "CHAT_MODEL", default_value = "gpt-3.5-turbo-16k")]
    model: String,

    /// Sampling temperature for chat completion.
    #[arg(long, env = "CHAT_TEMPERATURE", default_value_t = 1.0)]
    temperature: f64,

    /// Optional cap on completion tokens per response.
    #[arg(long, env = "CHAT_MAX_TOKENS")]
    max_tokens: Option<u32>,

    /// Base URL of the completion service.
    #[arg(long, env = "CHAT_API_URL", default_value = DEFAULT_CHAT_BASE_URL)]
    api_url: String,

    /// Base URL of the repository search service.
    #[arg(long, env = "SEARCH_API_URL", default_value = "http://127.0.0.1:8086")]
    search_url: String,

    /// Restore a previous chat session (YYYYMMDD-HHMMSS or 'last').
    #[arg(short = 'r', long)]
    restore: Option<String>,

    /// Non-interactive mode for piping: read one utterance from stdin,
    /// answer, exit.
    #[arg(short = 'n', long)]
    non_interactive: bool,

    /// Request JSON-object responses from the model.
    #[arg(short = 'j', long = "json")]
    json_mode: bool,

    /// Skip the markdown formatting system instruction.
    #[arg(long)]
    no_markdown: bool,

    /// Repository queried for code context.
    #[arg(value_name = "REPO", default_value = ".")]
    repo: PathBuf,
}

fn main() {
    dotenv().ok();
    let args = Args::parse();

    let default_filter = if args.non_interactive { "error" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(run_error) = run(args) {
        error!("{run_error}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let repo_root = std::fs::canonicalize(&args.repo)
        .map_err(|source| format!("repository path {} not found: {source}", args.repo.display()))?;

    let api_key = args
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or("API key is required (use --key or OPENAI_API_KEY)")?;

    let runtime = blocking_runtime()?;
    let chat_client = ChatApiClient::new(
        ChatApiConfig::new(api_key)
            .with_base_url(args.api_url.clone())
            .with_timeout(COMPLETION_TIMEOUT),
    )?;
    let search_client = SearchClient::new(
        SearchConfig::new(args.search_url.clone(), repo_root).with_timeout(SEARCH_TIMEOUT),
    )?;

    let store = SessionStore::create(config::session_history_root(), OffsetDateTime::now_utc())?;

    let settings = Settings {
        model: args.model.clone(),
        temperature: args.temperature,
        max_tokens: args.max_tokens,
        json_mode: args.json_mode,
        non_interactive: args.non_interactive,
    };
    let markdown = !args.no_markdown && !args.non_interactive;

    let mut orchestrator = Orchestrator::new(
        HttpCompletionBackend::new(runtime.clone(), chat_client),
        HttpContextSource::new(runtime, search_client),
        store,
        settings,
    );

    info!("Model in use: {}", args.model);

    if markdown {
        orchestrator.push_system_message(MARKDOWN_SYSTEM_INSTRUCTION);
    }

    // Restore and --context are mutually exclusive: restoring replaces the
    // conversation wholesale, clearing any supplied context.
    if let Some(target) = &args.restore {
        match SessionStore::load(&config::session_history_root(), target) {
            Ok(record) => {
                orchestrator.restore_conversation(record);
                info!("Restored session: {target}");
            }
            Err(load_error) => error!("{load_error}"),
        }
    } else {
        for path in &args.context {
            let content = std::fs::read_to_string(path)
                .map_err(|source| format!("context file {} unreadable: {source}", path.display()))?;
            orchestrator.push_system_message(content.trim());
            info!("Context file: {}", path.display());
        }
    }

    if args.json_mode {
        info!("JSON response mode is active. Your message should contain the 'json' word.");
    }

    let session_result = if args.non_interactive {
        run_single_turn(&mut orchestrator)
    } else {
        run_interactive_loop(&mut orchestrator)
    };

    // Runs exactly once on every termination path: normal end, fatal
    // failure, user quit, or a driver error below.
    report_session_expense(
        &args.model,
        orchestrator.conversation().prompt_tokens(),
        orchestrator.conversation().completion_tokens(),
    );

    session_result
}

/// Reads all of stdin as a single utterance and processes exactly one turn.
/// Every terminal outcome ends the session; there is no second read to
/// retry from.
fn run_single_turn(
    orchestrator: &mut Orchestrator<HttpCompletionBackend, HttpContextSource>,
) -> Result<(), Box<dyn Error>> {
    let mut utterance = String::new();
    std::io::stdin()
        .read_to_string(&mut utterance)
        .map_err(|source| format!("failed to read stdin: {source}"))?;

    orchestrator.run_turn(&utterance, &mut |reply| println!("{reply}"));
    Ok(())
}

fn run_interactive_loop(
    orchestrator: &mut Orchestrator<HttpCompletionBackend, HttpContextSource>,
) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(config::config_root())
        .map_err(|source| format!("failed to create config directory: {source}"))?;
    let history_file = config::history_file();

    let mut editor = DefaultEditor::new()?;
    let _ = editor.load_history(&history_file);

    loop {
        let prompt = format!("[{}] >>> ", orchestrator.conversation().total_tokens());
        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(readline_error) => return Err(readline_error.into()),
        };

        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        let outcome = orchestrator.run_turn(&line, &mut |reply| {
            println!();
            println!("{reply}");
            println!();
        });

        match outcome {
            TurnOutcome::Continue | TurnOutcome::RetryTurn => {}
            TurnOutcome::EndSession => break,
        }
    }

    if let Err(history_error) = editor.save_history(&history_file) {
        error!("failed to save prompt history: {history_error}");
    }

    Ok(())
}
