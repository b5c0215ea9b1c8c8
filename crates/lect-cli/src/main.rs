//! lect - terminal learning-session companion

mod config;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use clap::Parser;

use lect_chat::{AnswerService, ChatController, ChatSession, HttpAnswerService, UuidIdSource};
use lect_player::{PlayerController, SimulatedMedia};

/// Duration of the simulated media resource, until a real origin is attached.
const MEDIA_DURATION_SECS: f64 = 600.0;

/// lect - chat with a course while its lecture plays
#[derive(Parser, Debug)]
#[command(name = "lect")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Course to open a session for
    course_id: Option<String>,

    /// Base URL of the answering service
    #[arg(short, long)]
    api_url: Option<String>,

    /// Media source URL (defaults to the service's default video endpoint)
    #[arg(long)]
    media_url: Option<String>,

    /// Ask a single question and print the answer (non-interactive)
    #[arg(short = 'c', long)]
    question: Option<String>,

    /// Print the course's processing status and exit
    #[arg(long)]
    status: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("lect=debug")
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let Some(course_id) = args.course_id else {
        bail!("a course id is required (see `lect --help`)");
    };

    // Merge config with CLI args (CLI takes precedence)
    let cfg = config::Config::load();
    let api_url = cfg.resolve_api_url(args.api_url.as_deref());
    let media_url = cfg.resolve_media_url(args.media_url.as_deref(), &api_url);

    let service = HttpAnswerService::new(&api_url);

    // Print processing status and exit
    if args.status {
        let status = service.course_status(&course_id).await?;
        println!(
            "course {}: {} ({}%)",
            status.course_id, status.status, status.progress
        );
        if let Some(message) = status.message {
            println!("{}", message);
        }
        return Ok(());
    }

    // One-shot question mode
    if let Some(question) = args.question {
        return ask_once(&service, &course_id, &question).await;
    }

    // The service being down is surfaced per-question inside the session;
    // warn up front so an empty chat isn't a mystery.
    if let Err(e) = service.health().await {
        eprintln!("Warning: answering service at {} is unreachable: {}", api_url, e);
    }

    let session = ChatSession::new(&UuidIdSource, &course_id);
    let (chat, chat_events) = ChatController::new(session, Arc::new(service));

    let media = Arc::new(SimulatedMedia::new(MEDIA_DURATION_SECS));
    let source_events = media.spawn(Duration::from_millis(500));
    let transport: Arc<dyn lect_player::MediaTransport> = Arc::clone(&media) as Arc<dyn lect_player::MediaTransport>;
    let player = PlayerController::new(transport);
    media.play();

    ui::run_tui(chat, chat_events, player, media, source_events, media_url).await
}

/// Ask one question outside the TUI and print the result
async fn ask_once(service: &HttpAnswerService, course_id: &str, question: &str) -> anyhow::Result<()> {
    let mut session = ChatSession::new(&UuidIdSource, course_id);
    let Some(request) = session.begin_turn(question) else {
        bail!("question must not be empty");
    };

    match service.ask(&request).await {
        Ok(response) => {
            let sources = response.sources.clone();
            session.resolve_answer(response);
            if let Some(message) = session.transcript().last() {
                println!("{}", message.content);
            }
            if !sources.is_empty() {
                println!("\nSources:");
                for source in sources {
                    println!("  - {}", source);
                }
            }
            Ok(())
        }
        Err(e) => bail!("request failed: {}", e),
    }
}
