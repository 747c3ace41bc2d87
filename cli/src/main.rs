use std::time::Duration;

use breathe_cli::CliContext;
use breathe_cli::commands;
use breathe_cli::logging;
use breathe_cli::readline;
use breathe_cli::render;
use breathe_cli::speech::SpeechMode;
use breathe_core::config::VoicePreference;
use clap::{Parser, Subcommand};

/// Process arguments, parsed once at launch.
#[derive(Parser)]
#[command(version, about = "BreatheEasy: 4-7-8 guided breathing")]
struct Args {
    /// Do not narrate phases
    #[arg(long)]
    silent: bool,

    /// Length of one countdown second in milliseconds
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Begin a session immediately
    #[arg(long)]
    start: bool,

    /// Narrator voice for this run, without touching the saved config
    #[arg(long)]
    voice: Option<VoicePreference>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();
    let args = Args::parse();

    let speech = if args.silent {
        SpeechMode::Silent
    } else {
        SpeechMode::System
    };
    let (ctx, channels) = CliContext::new(Duration::from_millis(args.tick_ms.max(1)), speech);
    ctx.tasks.lock().await.renderer = Some(render::init_renderer(channels));
    if let Some(voice) = args.voice {
        ctx.audio.write().await.voice = voice;
    }

    println!("BreatheEasy - type `start`, `stop`, `status`, `voice <female|male>` or `exit`");
    if args.start {
        commands::start(&ctx).await;
    }

    loop {
        let line = tokio::task::spawn_blocking(readline)
            .await
            .map_err(|e| e.to_string())??;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    ctx.shutdown().await;
    Ok(())
}

#[derive(Parser)]
#[command(about = "session commands")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Begin a breathing session
    Start,
    /// Stop the running session
    Stop,
    /// Start when idle, stop when running
    Toggle,
    Status,
    /// Choose the narrator voice
    Voice { preference: VoicePreference },
    Config,
    /// Precache the offline shell from a live origin
    Precache {
        #[arg(short, long)]
        origin: Option<String>,
    },
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "breathe".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Start) => commands::start(ctx).await,
        Some(Commands::Stop) => commands::stop(ctx).await,
        Some(Commands::Toggle) => commands::toggle(ctx).await,
        Some(Commands::Status) => commands::show_status(ctx).await,
        Some(Commands::Voice { preference }) => commands::set_voice(ctx, preference).await?,
        Some(Commands::Config) => commands::show_settings(ctx).await,
        Some(Commands::Precache { origin }) => {
            commands::precache(ctx, origin.as_deref()).await?
        }
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
