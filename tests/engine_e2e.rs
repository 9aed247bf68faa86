//! End-to-end games driven through the public API

use dragon_engine::catalog::{self, Language};
use dragon_engine::config::GameSettings;
use dragon_engine::core::card::CardId;
use dragon_engine::game::{
    GameEndReason, GameLoop, GameState, PlayerController, RandomController, Stage,
};
use dragon_engine::piles::{DrawPile, PileKind};
use similar_asserts::assert_eq;

fn bot_loop(seed: u64, n_players: usize) -> GameLoop {
    let settings = GameSettings {
        n_bots: n_players - 1,
        seed,
        ..GameSettings::default()
    };
    let game = GameState::new(settings).unwrap();
    let controllers: Vec<Box<dyn PlayerController>> = (0..n_players)
        .map(|seat| {
            Box::new(RandomController::with_seed(seat, seed ^ seat as u64))
                as Box<dyn PlayerController>
        })
        .collect();
    GameLoop::new(game, controllers).unwrap()
}

#[test]
fn four_player_deal_leaves_scenario_counts() {
    let settings = GameSettings {
        n_bots: 3,
        seed: 4,
        ..GameSettings::default()
    };
    let game = GameState::new(settings).unwrap();

    // 57 minors minus 5 per seat, 21 majors minus 1 per seat
    assert_eq!(game.minor_draw.remaining(), 37);
    assert_eq!(game.major_draw.remaining(), 17);
}

#[test]
fn dealing_from_a_bare_56_card_pile() {
    // Without Death in the pile, four opening hands leave 36 cards
    let minors: Vec<CardId> = CardId::all_minors().collect();
    assert_eq!(minors.len(), 56);

    let mut pile = DrawPile::from_cards(PileKind::MinorDraw, minors);
    let mut hands: Vec<Vec<CardId>> = vec![Vec::new(); 4];
    let mut rng = rand::thread_rng();
    pile.distribute(5, 0, &mut hands, &mut rng).unwrap();

    assert_eq!(pile.remaining(), 36);
    for hand in &hands {
        assert_eq!(hand.len(), 5);
    }
}

#[test]
fn full_games_end_cleanly_across_seeds() {
    for seed in [1, 17, 202, 4242] {
        let mut game_loop = bot_loop(seed, 4).with_max_turns(300);
        let result = game_loop.run().unwrap();

        assert_eq!(game_loop.game().stage, Stage::GameOver);
        assert_eq!(result.scores.len(), 4);
        assert!(matches!(
            result.end_reason,
            GameEndReason::PilesExhausted
                | GameEndReason::LastPlayerStanding
                | GameEndReason::MaxTurnsReached
        ));
        game_loop.game().audit_conservation().unwrap();
    }
}

#[test]
fn identical_seeds_replay_identically() {
    let result_a = bot_loop(31, 3).with_max_turns(250).run().unwrap();
    let result_b = bot_loop(31, 3).with_max_turns(250).run().unwrap();

    assert_eq!(result_a.winner, result_b.winner);
    assert_eq!(result_a.scores, result_b.scores);
    assert_eq!(result_a.turns_played, result_b.turns_played);
    assert_eq!(result_a.end_reason, result_b.end_reason);
}

#[test]
fn two_player_game_runs() {
    let mut game_loop = bot_loop(88, 2).with_max_turns(300);
    let result = game_loop.run().unwrap();
    assert_eq!(result.scores.len(), 2);
}

#[test]
fn card_names_round_trip_in_both_languages() {
    for card in CardId::all_majors().chain(CardId::all_minors()) {
        for lang in [Language::English, Language::French] {
            let token = catalog::display(lang, card);
            assert_eq!(catalog::resolve(&token).unwrap(), card);
        }
    }
}

#[test]
fn winner_matches_top_score() {
    let result = bot_loop(512, 5).with_max_turns(300).run().unwrap();
    let top = result.scores.iter().map(|(_, s)| *s).max().unwrap();
    if let Some(winner) = result.winner {
        assert_eq!(result.scores[winner].1, top);
    }
}
