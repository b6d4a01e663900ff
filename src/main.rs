use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aioverse::error::describe;
use aioverse::llm::LlmClient;
use aioverse::llm::types::{ChatTransport, SessionConfig};
use aioverse::persona::GREETING;
use aioverse::services::feedback::{FeedbackDraft, FeedbackError, FeedbackStore, SubmissionStatus};
use aioverse::services::projects::{Catalog, DEFAULT_LIMIT, FEATURED_LANGUAGE, ProjectQuery, SortOrder};
use aioverse::services::responder::Responder;
use aioverse::services::session::{ChatError, ChatSession, run_turn};
use aioverse::state::Conversation;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

const PROMPT: &str = "user@local:~$ ";

#[derive(Debug, thiserror::Error)]
enum ShellError {
    #[error("terminal io failed: {0}")]
    Io(#[from] io::Error),
    #[error("{}", describe(.0))]
    Chat(#[from] ChatError),
    #[error("{}", describe(.0))]
    Feedback(#[from] FeedbackError),
    #[error("feedback submission failed")]
    SubmissionFailed,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "aioverse-shell", about = "AIOVerse portfolio chat shell")]
struct Cli {
    /// Project catalog (JSON array).
    #[arg(long, env = "PROJECTS_PATH", default_value = "projects.json", global = true)]
    projects: PathBuf,

    /// Feedback log (JSON array, created on first write).
    #[arg(long, env = "FEEDBACK_PATH", default_value = "feedback.json", global = true)]
    feedback: PathBuf,

    /// Log at debug level instead of warn.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat (default).
    Chat,
    /// Run a single chat turn.
    Ask { text: Vec<String> },
    /// Show what the offline responder would answer.
    Classify { text: Vec<String> },
    /// List portfolio projects.
    Projects {
        #[arg(long)]
        language: Option<String>,
        #[arg(long, default_value = "updated")]
        sort: SortOrder,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    Feedback(FeedbackCommand),
}

#[derive(Args, Debug)]
struct FeedbackCommand {
    #[command(subcommand)]
    command: FeedbackSubcommand,
}

#[derive(Subcommand, Debug)]
enum FeedbackSubcommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        affiliation: String,
        #[arg(long)]
        quote: String,
        #[arg(long)]
        image: Option<String>,
    },
    List,
}

#[tokio::main]
async fn main() -> Result<(), ShellError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat().await,
        Command::Ask { text } => run_ask(&text.join(" ")).await,
        Command::Classify { text } => {
            run_classify(&text.join(" "));
            Ok(())
        }
        Command::Projects { language, sort, limit } => run_projects(&cli.projects, language, sort, limit).await,
        Command::Feedback(feedback) => run_feedback(&cli.feedback, feedback).await,
    }
}

// =============================================================================
// CHAT
// =============================================================================

fn open_session() -> ChatSession {
    let transport: Option<Arc<dyn ChatTransport>> = match LlmClient::from_env() {
        Ok(client) => {
            info!(provider = client.provider().as_str(), model = client.model(), "llm client configured");
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!(error = %describe(&e), "llm client unavailable; replies come from the offline responder");
            None
        }
    };
    ChatSession::new(transport, SessionConfig::from_env())
}

/// Writes streamed fragments as they arrive, keeping the first io failure.
struct FragmentSink<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> FragmentSink<W> {
    fn new(out: W) -> Self {
        Self { out, error: None }
    }

    fn write(&mut self, fragment: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self
            .out
            .write_all(fragment.as_bytes())
            .and_then(|()| self.out.flush())
        {
            self.error = Some(e);
        }
    }

    /// End the reply line, surfacing any failure seen while streaming.
    fn finish(mut self) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

async fn stream_turn(session: &ChatSession, conversation: &mut Conversation, text: &str) -> Result<(), ShellError> {
    let mut sink = FragmentSink::new(io::stdout());
    run_turn(session, conversation, text, |fragment| sink.write(fragment)).await?;
    sink.finish()?;
    Ok(())
}

async fn run_chat() -> Result<(), ShellError> {
    let session = open_session();
    let mut conversation = Conversation::with_greeting(GREETING);
    println!("{GREETING}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if matches!(text, "exit" | "quit") {
            break;
        }

        stream_turn(&session, &mut conversation, text).await?;
    }
    info!(session_id = %session.id(), messages = conversation.messages().len(), "chat closed");
    Ok(())
}

async fn run_ask(text: &str) -> Result<(), ShellError> {
    let session = open_session();
    let mut conversation = Conversation::new();
    stream_turn(&session, &mut conversation, text).await
}

fn run_classify(text: &str) {
    let responder = Responder::default();
    match responder.classify(text) {
        Some(rule) => println!("intent: {:?}\n{}", rule.intent, rule.response),
        None => println!("intent: none\n{}", responder.respond_or_default(text)),
    }
}

// =============================================================================
// PROJECTS / FEEDBACK
// =============================================================================

async fn run_projects(
    path: &Path,
    language: Option<String>,
    sort: SortOrder,
    limit: usize,
) -> Result<(), ShellError> {
    let catalog = Catalog::load(path).await;
    let query = ProjectQuery { language, sort, limit };
    let shown = catalog.query(&query);
    println!("{}", serde_json::to_string_pretty(&shown)?);
    eprintln!(
        "showing {} of {} projects (sort: {}); {FEATURED_LANGUAGE} projects: {}; languages: {}",
        shown.len(),
        catalog.len(),
        sort.as_str(),
        catalog.count_with_language(FEATURED_LANGUAGE),
        catalog.languages().join(", ")
    );
    Ok(())
}

async fn run_feedback(path: &Path, feedback: FeedbackCommand) -> Result<(), ShellError> {
    let store = FeedbackStore::new(path);
    match feedback.command {
        FeedbackSubcommand::Add { name, affiliation, quote, image } => {
            let draft = FeedbackDraft { name, affiliation, quote, thumbnail_src: image.clone(), image_src: image };
            let mut last = SubmissionStatus::Idle;
            let record = store.submit(draft, |status| last = status).await;
            match record {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => return Err(ShellError::SubmissionFailed),
            }
            eprintln!("status: {last:?}");
        }
        FeedbackSubcommand::List => {
            let records = store.load().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
