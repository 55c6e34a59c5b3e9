use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use mirage_client::{
    ClientConfig, ClientError, Negotiator, PromptScheduler, SessionEvent, StaticVideoSource,
    VideoSink,
};
use mirage_core::{ConnectionState, ModelChoice, PromptTable};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use webrtc::track::track_remote::TrackRemote;

const PUMP_INTERVAL_MS: u64 = 50;
const RTP_LOG_EVERY: u64 = 300;

#[derive(Parser)]
#[command(name = "mirage")]
#[command(about = "Realtime video transformation client for Mirage and Lucy")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Negotiate a session and steer it with prompts read from stdin.
    Connect {
        /// TOML client configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// `mirage` or `lucy`. Asked interactively when omitted.
        #[arg(short, long)]
        model: Option<ModelChoice>,

        /// STUN server URL. Pass an empty string for no ICE servers.
        #[arg(long)]
        stun: Option<String>,

        /// Offer an outgoing VP8 track. Nothing writes frames to it, so the
        /// service sees a silent sender. Without this flag the session only
        /// receives.
        #[arg(long)]
        send_video: bool,
    },
    /// List the prompt table of a model.
    Prompts {
        #[arg(short, long, default_value = "mirage")]
        model: ModelChoice,
    },
}

/// One line of stdin.
#[derive(Debug, PartialEq)]
enum Command {
    Next,
    Prev,
    Quit,
    Custom(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" => None,
            ":next" | ":n" => Some(Self::Next),
            ":prev" | ":p" => Some(Self::Prev),
            ":quit" | ":q" => Some(Self::Quit),
            text => Some(Self::Custom(text.to_owned())),
        }
    }
}

/// Counts incoming RTP packets of the transformed stream.
struct RtpLogSink;

impl VideoSink for RtpLogSink {
    fn on_remote_track(&self, track: Arc<TrackRemote>) {
        tokio::spawn(async move {
            let mut packets: u64 = 0;
            while let Ok((packet, _)) = track.read_rtp().await {
                packets += 1;
                if packets % RTP_LOG_EVERY == 0 {
                    debug!(
                        "Remote video: {} packets, last {} bytes",
                        packets,
                        packet.payload.len()
                    );
                }
            }
            info!("Remote video track ended after {} packets", packets);
        });
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mirage_cli=info,mirage_client=info,webrtc=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Connect {
            config,
            model,
            stun,
            send_video,
        } => run_connect(config, model, stun, send_video).await,
        Commands::Prompts { model } => {
            list_prompts(model);
            Ok(())
        }
    }
}

fn list_prompts(model: ModelChoice) {
    println!("{}", format!("{} prompts", model.display_name()).green().bold());
    for (i, entry) in PromptTable::for_model(model).iter().enumerate() {
        println!(
            "{:>3}  {:<24} {}",
            i,
            entry.key.cyan(),
            entry.instruction.dimmed()
        );
    }
}

fn select_model() -> Result<ModelChoice> {
    let choices = [ModelChoice::Mirage, ModelChoice::Lucy];
    let names: Vec<&str> = choices.iter().map(|m| m.display_name()).collect();
    let picked = dialoguer::Select::new()
        .with_prompt("Model")
        .items(&names)
        .default(0)
        .interact()
        .context("Model selection aborted")?;
    Ok(choices[picked])
}

async fn run_connect(
    config_path: Option<PathBuf>,
    model: Option<ModelChoice>,
    stun: Option<String>,
    send_video: bool,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    apply_flags(&mut config, stun, send_video);
    config.model = match model {
        Some(model) => model,
        None if config_path.is_none() && std::io::stdin().is_terminal() => select_model()?,
        None => config.model,
    };

    let mut negotiator =
        Negotiator::from_config(config.clone()).with_video_sink(Arc::new(RtpLogSink));
    if config.send_video {
        warn!("Sending a video track without frames");
        negotiator =
            negotiator.with_video_source(Arc::new(StaticVideoSource::vp8("camera", "mirage")));
    }
    let mut events = negotiator.subscribe();
    let prompts = negotiator.prompt_sender();
    let mut scheduler =
        PromptScheduler::new(config.schedule.clone(), config.schedule_tolerance_secs);

    println!(
        "{}",
        format!("🚀 Connecting to {}...", negotiator.selected_model_name())
            .green()
            .bold()
    );
    println!(
        "{}",
        "Type a prompt and press enter. :next / :prev cycle presets, :quit exits.".dimmed()
    );

    let mut commands = spawn_stdin_reader();
    negotiator.connect().await?;

    let mut connected_at: Option<Instant> = None;
    let mut stdin_open = true;
    let mut tick = tokio::time::interval(Duration::from_millis(PUMP_INTERVAL_MS));

    loop {
        tokio::select! {
            _ = tick.tick() => {
                negotiator.pump().await;
                for event in drain(&mut events) {
                    if event == SessionEvent::PeerConnected {
                        connected_at = Some(Instant::now());
                        scheduler.reset();
                    }
                    print_event(&event);
                }
                if let Some(start) = connected_at {
                    scheduler.tick(start.elapsed().as_secs_f64(), &prompts);
                }
                match negotiator.state() {
                    ConnectionState::Failed => {
                        println!("{}", "❌ Session failed".red().bold());
                        break;
                    }
                    ConnectionState::Closed => break,
                    _ => {}
                }
            }
            command = commands.recv(), if stdin_open => match command {
                // Stdin closed: keep the session running until ctrl-c
                None => stdin_open = false,
                Some(Command::Quit) => break,
                Some(Command::Next) => report(negotiator.send_next_prompt(true)),
                Some(Command::Prev) => report(negotiator.send_next_prompt(false)),
                Some(Command::Custom(text)) => {
                    prompts.queue_custom_prompt(text);
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    negotiator.disconnect().await;
    println!("{}", "👋 Disconnected".cyan());
    Ok(())
}

/// Command-line overrides on top of the loaded configuration. The config file
/// can turn sending off but only `--send-video` turns it on.
fn apply_flags(config: &mut ClientConfig, stun: Option<String>, send_video: bool) {
    if let Some(stun) = stun {
        config.stun_server = stun;
    }
    config.send_video &= send_video;
}

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<Command> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let Some(command) = Command::parse(&line) else {
                        continue;
                    };
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

fn drain(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut drained = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => drained.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Skipped {} session events", skipped)
            }
            Err(_) => break,
        }
    }
    drained
}

fn report(result: Result<String, ClientError>) {
    if let Err(e) = result {
        println!("{}", format!("⚠️  {}", e).yellow());
    }
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::StateChanged(state) => println!("   {} {}", "state".dimmed(), state),
        SessionEvent::SocketStateChanged(state) => {
            debug!("Signaling socket {:?}", state)
        }
        SessionEvent::ServerReady { session_id, .. } => println!(
            "{}",
            format!("📡 Service ready ({})", session_id.as_deref().unwrap_or("-")).cyan()
        ),
        SessionEvent::PeerConnected => println!("{}", "✨ Connected".green().bold()),
        SessionEvent::VideoStreamEstablished => {
            println!("{}", "📺 Receiving transformed video".green())
        }
        SessionEvent::PromptSent(prompt) => println!("   {} {}", "prompt".dimmed(), prompt.cyan()),
        SessionEvent::IceDisconnected => println!("{}", "⚠️  ICE disconnected".yellow()),
        SessionEvent::NegotiationFailed(reason) => println!("{}", format!("❌ {}", reason).red()),
        SessionEvent::Reconnecting { attempt } => {
            println!("{}", format!("🔄 Reconnecting (attempt {})", attempt).yellow())
        }
    }
}
