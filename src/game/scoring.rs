//! Score counting
//!
//! A combination's score starts from the raw values of its minor cards and
//! is then shaped by its attachments, applied in a fixed order: Outlier
//! rewrites the card values, DoubleScore multiplies, ValueLoss halves.
//! Death held in hand at the count voids every unprotected combination of
//! its holder; accumulated permanent bonuses survive it.

use crate::core::card::{Arcana, CardId};
use crate::core::combination::Combination;
use crate::core::effects::{EffectId, Restriction};
use crate::core::player::Player;
use crate::game::state::GameState;

/// Score of one combination, attachments applied
pub fn combination_score(combo: &Combination) -> u32 {
    let mut value = if combo.has_attached(EffectId::Outlier) {
        // Anti-royalist: only numbered cards can share a combination with
        // the Empress, so every card counts 10
        10 * combo.cards.len() as u32
    } else {
        combo.raw_value()
    };

    for attachment in &combo.attachments {
        if attachment.effects().contains(&EffectId::DoubleScore) {
            value *= 2;
        }
    }

    let halved = combo.attachments.iter().any(|card| {
        card.effects()
            .iter()
            .any(|e| e.restrictions().contains(&Restriction::ValueLoss))
    });
    if halved {
        value /= 2;
    }

    value
}

/// Total score of one player: combinations plus accumulated bonuses
///
/// Holding Death at the count voids the unprotected combinations; the
/// Wheel of Fortune total is a permanent bonus and always counts.
pub fn count_score(player: &Player) -> u32 {
    let holds_death = player.has_card(CardId::Major(Arcana::Death));
    let combos: u32 = player
        .combinations
        .iter()
        .filter(|combo| !holds_death || combo.is_protected())
        .map(combination_score)
        .sum();
    combos + player.wheel_total
}

/// Final standings, one entry per seat in table order
pub fn final_scores(state: &GameState) -> Vec<(usize, u32)> {
    state
        .players
        .iter()
        .enumerate()
        .map(|(seat, player)| (seat, count_score(player)))
        .collect()
}

/// Seat with the highest score; the earliest seat wins ties
pub fn winner(state: &GameState) -> Option<usize> {
    final_scores(state)
        .into_iter()
        .max_by(|(seat_a, score_a), (seat_b, score_b)| {
            score_a.cmp(score_b).then(seat_b.cmp(seat_a))
        })
        .map(|(seat, _)| seat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Language;
    use crate::core::card::{MinorRank, Suit};

    fn minor(suit: Suit, rank: MinorRank) -> CardId {
        CardId::Minor(suit, rank)
    }

    fn pair_of_sevens() -> Combination {
        Combination::new(vec![
            minor(Suit::Cups, MinorRank::Seven),
            minor(Suit::Wands, MinorRank::Seven),
        ])
        .unwrap()
    }

    #[test]
    fn test_raw_score_is_the_card_sum() {
        assert_eq!(combination_score(&pair_of_sevens()), 14);
    }

    #[test]
    fn test_outlier_makes_every_card_worth_ten() {
        let mut combo = Combination::new(vec![
            minor(Suit::Cups, MinorRank::Two),
            minor(Suit::Wands, MinorRank::Two),
        ])
        .unwrap();
        combo.attach(CardId::Major(Arcana::Empress)).unwrap();
        assert_eq!(combination_score(&combo), 20);
    }

    #[test]
    fn test_double_score_doubles_once() {
        let mut combo = pair_of_sevens();
        combo.attach(CardId::Major(Arcana::Devil)).unwrap();
        assert_eq!(combination_score(&combo), 28);
        // The World cannot pile onto an already doubled combination
        assert!(combo.attach(CardId::Major(Arcana::World)).is_err());
    }

    #[test]
    fn test_value_loss_halves_with_floor() {
        let mut combo = Combination::new(vec![
            minor(Suit::Cups, MinorRank::Three),
            minor(Suit::Wands, MinorRank::Three),
        ])
        .unwrap();
        // The Fool lifts the shape rules at the cost of half the value
        combo.attach(CardId::Major(Arcana::Fool)).unwrap();
        assert_eq!(combination_score(&combo), 3);
    }

    #[test]
    fn test_modifier_order_doubles_before_halving() {
        let mut combo = Combination::new(vec![
            minor(Suit::Cups, MinorRank::Five),
            minor(Suit::Wands, MinorRank::Five),
        ])
        .unwrap();
        combo.attach(CardId::Major(Arcana::Fool)).unwrap();
        combo.attach(CardId::Major(Arcana::Devil)).unwrap();
        // (5 + 5) * 2 / 2, not (5 + 5) / 2 * 2 applied to a floored odd half
        assert_eq!(combination_score(&combo), 10);
    }

    #[test]
    fn test_death_voids_unprotected_combinations() {
        let mut player = Player::new("Alice", Language::English);
        player.combinations.push(pair_of_sevens());
        let mut guarded = Combination::new(vec![
            minor(Suit::Swords, MinorRank::Ten),
            minor(Suit::Pentacles, MinorRank::Ten),
        ])
        .unwrap();
        guarded.attach(CardId::Major(Arcana::Hierophant)).unwrap();
        player.combinations.push(guarded);
        player.wheel_total = 7;

        assert_eq!(count_score(&player), 14 + 20 + 7);

        player.adds_to_hand([CardId::Major(Arcana::Death)]);
        // Only the guarded pair and the permanent bonus survive
        assert_eq!(count_score(&player), 20 + 7);
    }

    #[test]
    fn test_death_alone_scores_nothing() {
        let mut player = Player::new("Bob", Language::English);
        player.adds_to_hand([CardId::Major(Arcana::Death)]);
        assert_eq!(count_score(&player), 0);
    }
}
