use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use naval_duel::{
    init_logging, AiPlayer, ClientNode, CliPlayer, InMemoryTransport, Lobby, MatchConfig,
    MatchController, Pacing, Player, RemotePlayer, Side, TcpTransport, Verdict,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PlayerType {
    Human,
    Ai,
}

#[derive(Subcommand)]
enum Commands {
    /// Host a duel server that pairs incoming clients into matches.
    Server {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, help = "Fix RNG seed for reproducible matches (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Resolve multi-target shots without delays")]
        no_pacing: bool,
    },
    /// Connect to a duel server.
    Client {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        #[arg(long, default_value = "Player")]
        name: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for the AI player (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Run a match in this process over the in-memory transport.
    Local {
        #[arg(long, value_enum, default_value_t = PlayerType::Ai)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible matches (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}

fn make_player(kind: PlayerType, rng: SmallRng) -> Box<dyn Player> {
    match kind {
        PlayerType::Human => Box::new(CliPlayer::new()),
        PlayerType::Ai => Box::new(AiPlayer::new(rng)),
    }
}

fn report(verdict: Verdict) {
    match verdict {
        Verdict::Won => println!("Match over: you won."),
        Verdict::Lost => println!("Match over: you lost."),
        Verdict::Aborted => println!("Match over: aborted."),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Server {
            bind,
            seed,
            no_pacing,
        } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (matches will be reproducible)", s);
            }
            let config = MatchConfig {
                pacing: if no_pacing { Pacing::none() } else { Pacing::default() },
                seed,
            };
            let lobby = Lobby::bind(&bind, config).await?;
            println!("Duel server listening on {}", lobby.local_addr()?);
            lobby.serve().await?;
        }
        Commands::Client {
            connect,
            name,
            player,
            seed,
        } => {
            println!("Connecting to duel server at {}...", connect);
            let transport = TcpTransport::connect(&connect).await?;
            println!("Connected successfully!");
            let mut node = ClientNode::new(make_player(player, make_rng(seed)), transport, name);
            report(node.run().await?);
        }
        Commands::Local { player, seed } => {
            println!("Starting local match...");
            if let Some(s) = seed {
                println!("Using fixed seed: {} (match will be reproducible)", s);
            }
            let mut rng = make_rng(seed);
            let player_a = make_player(player, SmallRng::seed_from_u64(rng.random()));
            let player_b = Box::new(AiPlayer::new(SmallRng::seed_from_u64(rng.random())));

            let (server_a, client_a) = InMemoryTransport::pair();
            let (server_b, client_b) = InMemoryTransport::pair();
            let mut node_a = ClientNode::new(player_a, client_a, "You");
            let mut node_b = ClientNode::new(player_b, client_b, "Computer");

            let host = async move {
                let remote_a = RemotePlayer::accept(server_a, Side::A).await?;
                let remote_b = RemotePlayer::accept(server_b, Side::B).await?;
                let config = MatchConfig {
                    pacing: Pacing::default(),
                    seed,
                };
                MatchController::new(config, Box::new(remote_a), Box::new(remote_b))
                    .with_names("You", "Computer")
                    .run()
                    .await
            };

            let (match_report, verdict, _) = tokio::try_join!(host, node_a.run(), node_b.run())?;
            log::info!("local match result: {:?}", match_report.result);
            report(verdict);
        }
    }
    Ok(())
}
