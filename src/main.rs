use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;

use tictactoe_arena::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play N-in-a-row against a negamax agent", long_about = None)]
struct Args {
    /// Let the agent (O) move first
    #[arg(short, long)]
    agent_first: bool,

    /// Agent only blocks immediate threats, otherwise plays randomly
    #[arg(short, long)]
    loss_averse: bool,

    /// Agent plays uniformly random moves
    #[arg(short, long)]
    random: bool,

    /// Board side length
    #[arg(short = 'n', long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(3..=4))]
    size: u8,

    /// Seed for the agent's hash keys and random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Clear the transposition table before every agent move
    #[arg(long)]
    per_decision_table: bool,

    /// Print the final result as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .write_style(env_logger::WriteStyle::Never)
    .target(env_logger::Target::Stderr)
    .init();

    if let Err(e) = run(args) {
        log::error!("Fatal error: {e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let size = BoardSize::try_from(args.size).context("invalid --size")?;
    let policy = Policy::from_flags(args.loss_averse, args.random).context("invalid policy flags")?;

    let engine = Engine::new(EngineConfig {
        size,
        seed: args.seed,
        table_lifetime: if args.per_decision_table {
            TableLifetime::PerDecision
        } else {
            TableLifetime::PerGame
        },
        ..EngineConfig::default()
    });
    log::info!("agent seed {}", engine.seed());

    let agent = EngineBot::new(format!("agent ({policy})"), engine, policy);
    let human = HumanBot::stdio("human".to_string());

    let config = MatchConfig {
        size,
        first_player: if args.agent_first { Mark::O } else { Mark::X },
        verbose: true,
    };

    println!("You are X. Cells are numbered row by row from 0:");
    let side = size.side();
    for row in 0..side {
        let cells: Vec<String> = (0..side).map(|col| format!("{:>2}", row * side + col)).collect();
        println!("  {}", cells.join(" "));
    }
    println!();

    let mut game = Match::new(Box::new(human), Box::new(agent), config);
    let result = game.play();

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("serializing match result")?
        );
    } else {
        match &result {
            MatchResult::XWins { moves, .. } => println!("You win in {moves} moves!"),
            MatchResult::OWins { moves, .. } => println!("The agent wins in {moves} moves."),
            MatchResult::Draw { moves } => println!("Draw after {moves} moves."),
            MatchResult::Forfeit { violator, winner } => {
                println!("{violator} gave up; {winner} wins.")
            }
            MatchResult::IllegalMove { violator, winner } => {
                println!("{violator} made an illegal move; {winner} wins.")
            }
        }
    }
    Ok(())
}
