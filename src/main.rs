#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use ir_battleship::{
    init_logging, run_pair, AutoPilot, FaultModel, GameSession, KeyboardPlayer, Link,
    LoopbackLink, Player, PlayerNode, SessionConfig, TcpLink, TextDisplay,
};

#[cfg(feature = "std")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "std")]
use rand::Rng;
#[cfg(feature = "std")]
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    /// JSON file overriding timing parameters.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum PlayerType {
    /// Keyboard lines: w/a/s/d move, f push, b button.
    Human,
    Auto,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Two autopilots over an in-memory link, as fast as possible.
    Sim {
        #[arg(long, default_value_t = 0.0, help = "Chance each byte is lost")]
        loss: f64,
        #[arg(long, default_value_t = 500_000)]
        max_ticks: u64,
    },
    /// Wait for a peer to connect over TCP.
    TcpHost {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Autopilot presses the claim button")]
        claim: bool,
    },
    /// Connect to a hosting peer over TCP.
    TcpJoin {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Autopilot presses the claim button")]
        claim: bool,
    },
    /// Play over an IR transceiver on a serial port.
    #[cfg(feature = "serial")]
    Serial {
        #[arg(long)]
        port: String,
        #[arg(long, default_value_t = ir_battleship::link::serial::DEFAULT_BAUD)]
        baud: u32,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Autopilot presses the claim button")]
        claim: bool,
    },
}

#[cfg(feature = "std")]
fn make_player(kind: PlayerType, seed: u64, claim: bool) -> Box<dyn Player> {
    match kind {
        PlayerType::Human => {
            println!("Keys: w/a/s/d move, f push (start/rotate/fire), b button (claim/place), then Enter");
            Box::new(KeyboardPlayer::spawn())
        }
        PlayerType::Auto => {
            println!("Autopilot selected.");
            Box::new(AutoPilot::new(seed, claim))
        }
    }
}

#[cfg(feature = "std")]
async fn play(
    config: SessionConfig,
    seed: u64,
    kind: PlayerType,
    claim: bool,
    link: Box<dyn Link + Send>,
) -> anyhow::Result<()> {
    let session =
        GameSession::with_default_fleet(config, seed).map_err(|e| anyhow::anyhow!(e))?;
    let mut node = PlayerNode::new(make_player(kind, seed, claim), session, link)
        .with_screen(Box::new(TextDisplay::echoing()));
    node.run(None).await
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };
    let seed = match cli.seed {
        Some(s) => {
            println!("Using fixed seed: {} (game will be reproducible)", s);
            s
        }
        None => rand::rng().random(),
    };

    match cli.command {
        Commands::Sim { loss, max_ticks } => {
            println!("Starting autopilot vs autopilot over a link losing {:.0}% of bytes...", loss * 100.0);
            let (l1, l2) = LoopbackLink::pair_with(FaultModel::lossy(loss), seed);
            let s1 = GameSession::with_default_fleet(config, seed).map_err(|e| anyhow::anyhow!(e))?;
            let s2 = GameSession::with_default_fleet(config, seed.wrapping_add(1))
                .map_err(|e| anyhow::anyhow!(e))?;
            let mut n1 = PlayerNode::new(Box::new(AutoPilot::new(seed, true)), s1, Box::new(l1));
            let mut n2 = PlayerNode::new(
                Box::new(AutoPilot::new(seed.wrapping_add(1), false)),
                s2,
                Box::new(l2),
            );
            let outcome = run_pair(&mut n1, &mut n2, max_ticks);
            for (name, node) in [("Player 1", &n1), ("Player 2", &n2)] {
                let session = node.session();
                println!(
                    "{}: role {:?}, result {:?}, link {:?}",
                    name,
                    session.role(),
                    session.result(),
                    node.link_stats()
                );
            }
            if outcome.finished {
                println!("Round finished after {} ticks", outcome.ticks);
            } else {
                println!("No result after {} ticks", outcome.ticks);
            }
        }
        Commands::TcpHost { bind, player, claim } => {
            println!("Hosting at {}...", bind);
            let link = TcpLink::accept(&bind).await?;
            play(config, seed, player, claim, Box::new(link)).await?;
        }
        Commands::TcpJoin { connect, player, claim } => {
            println!("Connecting to {}...", connect);
            let link = TcpLink::connect(&connect).await?;
            println!("Connected successfully!");
            play(config, seed, player, claim, Box::new(link)).await?;
        }
        #[cfg(feature = "serial")]
        Commands::Serial { port, baud, player, claim } => {
            let link = ir_battleship::SerialLink::open(&port, baud)?;
            play(config, seed, player, claim, Box::new(link)).await?;
        }
    }
    Ok(())
}
