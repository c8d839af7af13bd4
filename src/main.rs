use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use defakex::{
    content, DefakexApp, DefakexConfig, DefakexEvent, EventBus, EventFilter, EventReceiver,
    FilterKind, MediaAsset, MediaKind, Severity,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "defakex")]
#[command(about = "Application core for the DeFakeX deepfake detection front-end")]
#[command(version)]
#[command(long_about = "Drives the DeFakeX analysis pipeline from the command line: upload \
media files to the configured detection endpoint, exercise the live-camera capture flow, or \
talk to the scripted assistant.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "defakex.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a media file to the detection endpoint and print the verdict
    Analyze {
        /// Media file to analyze
        file: PathBuf,

        /// Media kind; inferred from the file extension when omitted
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Run the live-camera flow: start, capture, analyze, stop
    Camera {
        /// Number of frames to capture and analyze
        #[arg(long, default_value_t = 1)]
        captures: u32,

        /// Cosmetic filter baked into the captures
        #[arg(long, value_enum)]
        filter: Option<FilterArg>,
    },
    /// Chat with the scripted assistant (EOF or "quit" to leave)
    Chat,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Image,
    Video,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Image => MediaKind::Image,
            KindArg::Video => MediaKind::Video,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FilterArg {
    None,
    Grayscale,
    Sepia,
    Blur,
}

impl From<FilterArg> for FilterKind {
    fn from(filter: FilterArg) -> Self {
        match filter {
            FilterArg::None => FilterKind::None,
            FilterArg::Grayscale => FilterKind::Grayscale,
            FilterArg::Sepia => FilterKind::Sepia,
            FilterArg::Blur => FilterKind::Blur,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    init_logging(&args)?;

    info!("Starting DeFakeX core v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let config = match DefakexConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if args.validate_config {
        match config.validate() {
            Ok(()) => {
                println!("✓ Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    let app = DefakexApp::new(config)?;
    spawn_notification_printer(app.events());

    match args.command {
        Some(Command::Analyze { file, kind }) => run_analyze(&app, file, kind).await,
        Some(Command::Camera { captures, filter }) => run_camera(&app, captures, filter).await,
        Some(Command::Chat) => run_chat(&app).await,
        None => {
            println!("{}", content::HERO_TITLE);
            println!("{}", content::HERO_TAGLINE);
            println!();
            println!("{}", content::ABOUT);
            println!();
            for faq in content::FAQ {
                println!("Q: {}", faq.question);
                println!("A: {}", faq.answer);
                println!();
            }
            println!("Run `defakex analyze <file>`, `defakex camera`, or `defakex chat`.");
            Ok(())
        }
    }
}

/// Print user-facing notifications the way the page renders its toasts
fn spawn_notification_printer(events: &EventBus) {
    let mut receiver = EventReceiver::new(
        events.subscribe(),
        EventFilter::EventTypes(vec!["notification"]),
    );
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            if let DefakexEvent::Notification {
                severity,
                title,
                description,
            } = event
            {
                match severity {
                    Severity::Destructive => eprintln!("✗ {}: {}", title, description),
                    Severity::Info => println!("• {}: {}", title, description),
                }
            }
        }
    });
}

async fn run_analyze(app: &DefakexApp, file: PathBuf, kind: Option<KindArg>) -> Result<()> {
    let kind = match kind {
        Some(kind) => kind.into(),
        None => infer_kind(&file),
    };

    let asset = MediaAsset::from_path(&file, kind).await?;
    app.upload.select_file(asset)?;

    if let Some(result) = app.upload.analyze().await? {
        print_result(&result);
    }
    Ok(())
}

async fn run_camera(app: &DefakexApp, captures: u32, filter: Option<FilterArg>) -> Result<()> {
    app.camera.start().await?;

    if let Some(filter) = filter {
        app.camera.apply_filter(filter.into());
    }

    for _ in 0..captures {
        if let Some(result) = app.camera.capture_and_analyze().await? {
            print_result(&result);
        }
    }

    app.camera.stop();
    Ok(())
}

async fn run_chat(app: &DefakexApp) -> Result<()> {
    use tokio::io::{AsyncBufReadExt, BufReader};

    for message in app.chatbot.transcript() {
        println!("assistant> {}", message.text);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "quit" {
            break;
        }
        if let Some(reply) = app.chatbot.send(&line).await {
            println!("assistant> {}", reply);
        }
    }
    Ok(())
}

fn infer_kind(file: &std::path::Path) -> MediaKind {
    let mime = mime_guess::from_path(file).first_or_octet_stream();
    if mime.type_() == mime_guess::mime::VIDEO {
        MediaKind::Video
    } else {
        MediaKind::Image
    }
}

fn print_result(result: &defakex::AnalysisResult) {
    println!();
    println!("This media is {}", result.verdict());
    println!("Confidence: {}%", result.confidence_percent());
    if let Some(details) = &result.details {
        println!("Details: {}", details);
    }
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("defakex={}", log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer().with_target(true).boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}

/// Print the default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# DeFakeX configuration file");
    println!("# Default values for all available options");
    println!();
    println!("{}", toml::to_string_pretty(&DefakexConfig::default())?);
    Ok(())
}
