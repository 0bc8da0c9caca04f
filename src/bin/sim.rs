use ir_battleship::{
    init_logging_with_default, run_pair, AutoPilot, FaultModel, GameResult, GameSession,
    LoopbackLink, PlayerNode, SessionConfig,
};
use log::LevelFilter;
use serde_json::json;

const MAX_TICKS: u64 = 500_000;

fn winner_of(result: Option<GameResult>, name: &'static str) -> Option<&'static str> {
    (result == Some(GameResult::Won)).then_some(name)
}

fn main() -> anyhow::Result<()> {
    init_logging_with_default(LevelFilter::Warn);

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 && args.len() != 4 {
        eprintln!("Usage: {} <seed1> <seed2> [loss]", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;
    let loss: f64 = match args.get(3) {
        Some(l) => l.parse()?,
        None => 0.0,
    };
    if !(0.0..1.0).contains(&loss) {
        return Err(anyhow::anyhow!("Loss rate must be in [0, 1), got {}", loss));
    }

    let config = SessionConfig::default();
    let (l1, l2) = LoopbackLink::pair_with(FaultModel::lossy(loss), seed1 ^ seed2.rotate_left(32));

    let s1 = GameSession::with_default_fleet(config, seed1).map_err(|e| anyhow::anyhow!("{}", e))?;
    let s2 = GameSession::with_default_fleet(config, seed2).map_err(|e| anyhow::anyhow!("{}", e))?;
    let mut n1 = PlayerNode::new(Box::new(AutoPilot::new(seed1, true)), s1, Box::new(l1));
    let mut n2 = PlayerNode::new(Box::new(AutoPilot::new(seed2, false)), s2, Box::new(l2));

    let outcome = run_pair(&mut n1, &mut n2, MAX_TICKS);

    let report = |node: &PlayerNode| {
        let session = node.session();
        let board = session.board();
        json!({
            "role": session.role(),
            "result": session.result(),
            "shots": (board.shot_hits() | board.shot_misses()).count_ones(),
            "link": node.link_stats(),
        })
    };
    let winner = winner_of(n1.session().result(), "player1")
        .or_else(|| winner_of(n2.session().result(), "player2"));

    let result = json!({
        "player1": report(&n1),
        "player2": report(&n2),
        "winner": winner,
        "ticks": outcome.ticks,
        "finished": outcome.finished,
        "both_attacking_ticks": outcome.both_attacking_ticks,
        "loss": loss,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
