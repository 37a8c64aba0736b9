use clap::Parser;
use monster_battle::{
    next_enemy, run_battle, AutoPilot, BattleConfig, BattleResult, BattleSession, ContentCatalog,
    Monster, Player, SeededRng,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play one seeded auto-battle and print its log.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Seed for every roll in the battle. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding AttackData.json, ItemData.json and Fakeydex.json.
    #[arg(long)]
    data: Option<PathBuf>,

    /// RON file overriding balance constants.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Kills already banked; scales the enemy.
    #[arg(long, default_value_t = 0)]
    kills: u32,

    /// Fight the final boss.
    #[arg(long)]
    boss: bool,

    #[arg(long, default_value = "Pip")]
    starter_name: String,
}

fn main() -> BattleResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    let catalog = match &args.data {
        Some(dir) => ContentCatalog::load_dir(dir)?,
        None => ContentCatalog::bundled()?,
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "seeded battle");
    let mut rng = SeededRng::from_seed(seed);

    // Even split, leftovers go to speed
    let share = config.start_xp / 4;
    let starter = Monster::starter(args.starter_name.as_str(), [share; 3], &config)?;
    let mut player = Player::new("Player", starter, &config);
    player.kills = if args.boss {
        args.kills.max(config.boss_kills)
    } else {
        args.kills
    };

    let (enemy, encounter) = next_enemy(&catalog, &player, &config, &mut rng)?;
    let session = BattleSession::start(&catalog, &config, &mut player, enemy, encounter, &mut rng)?;
    let mut pilot = AutoPilot::new(seed.wrapping_add(1));
    let run = run_battle(session, &mut pilot)?;

    for line in run.events.iter().filter_map(|event| event.format()) {
        println!("{}", line);
    }
    println!();
    println!("Outcome: {:?} after {} rounds", run.report.outcome, run.report.rounds);
    for monster in &player.team {
        println!(
            "  {} HP {}/{} stats {:?} attacks {:?}",
            monster.name,
            monster.current_hp(),
            monster.max_hp(),
            monster.base_stats,
            monster.attacks
        );
    }
    println!("Money: {}  Score: {}  Kills: {}", player.money, player.score, player.kills);
    Ok(())
}
