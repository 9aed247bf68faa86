//! Command-line front end: sets up a game from flags and plays it out with
//! seeded bot controllers.

use anyhow::Result;
use clap::Parser;
use dragon_engine::catalog::Language;
use dragon_engine::config::{GameMode, GameSettings};
use dragon_engine::game::{
    GameLoop, GameState, PlayerController, RandomController, VerbosityLevel,
};

#[derive(Parser, Debug)]
#[command(name = "dragon", about = "Tarot-deck card game engine", version)]
struct Args {
    /// Name of the human seat
    #[arg(long, default_value = "Player_1")]
    player_name: String,

    /// Number of bot opponents
    #[arg(long, default_value_t = 2)]
    nbots: usize,

    /// Display language for card names
    #[arg(long, value_enum, default_value_t = Language::English)]
    language: Language,

    #[arg(long, value_enum, default_value_t = GameMode::Solo)]
    gamemode: GameMode,

    /// Game seed; the same seed with the same decisions replays identically
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output detail: 0 silent, 1 outcome only, 2 turns and actions, 3 everything
    #[arg(short, long, default_value_t = 2)]
    verbosity: u8,

    /// Turn cap before the game is called
    #[arg(long, default_value_t = 500)]
    max_turns: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = GameSettings {
        player_names: vec![args.player_name],
        n_bots: args.nbots,
        language: args.language,
        mode: args.gamemode,
        seed: args.seed,
    };
    let n_seats = settings.n_seats();

    let mut game = GameState::new(settings)?;
    game.logger.set_verbosity(match args.verbosity {
        0 => VerbosityLevel::Silent,
        1 => VerbosityLevel::Minimal,
        2 => VerbosityLevel::Normal,
        _ => VerbosityLevel::Verbose,
    });

    let controllers: Vec<Box<dyn PlayerController>> = (0..n_seats)
        .map(|seat| {
            Box::new(RandomController::with_seed(seat, args.seed.wrapping_add(seat as u64)))
                as Box<dyn PlayerController>
        })
        .collect();

    let mut game_loop = GameLoop::new(game, controllers)?.with_max_turns(args.max_turns);
    let result = game_loop.run()?;

    println!();
    println!("Final scores after {} turns:", result.turns_played);
    for (seat, score) in &result.scores {
        let marker = if result.winner == Some(*seat) { " (winner)" } else { "" };
        println!(
            "  {}: {}{}",
            game_loop.game().players[*seat].name,
            score,
            marker
        );
    }
    Ok(())
}
