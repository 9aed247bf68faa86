//! Turn controller
//!
//! Drives whole games: the fixed 5-step turn for each player, the decision
//! traffic between the engine and the seat controllers, Block reactions to
//! attacks, the phase-one to phase-two transition when the minor pile runs
//! dry, eliminations, and the end-of-game count. Controller answers are
//! validated before any state changes; an illegal answer skips the optional
//! step instead of corrupting the game.

use crate::core::card::{Arcana, CardId};
use crate::core::combination::{self, Combination};
use crate::core::effects::{kind_of, EffectId, EffectKind};
use crate::game::controller::{GameStateView, PlayerController};
use crate::game::phase::{Stage, TurnStep};
use crate::game::resolver::{self, Choice, EffectOutcome, EffectTarget};
use crate::game::scoring;
use crate::game::state::GameState;
use crate::{DragonError, Result};
use smallvec::SmallVec;

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEndReason {
    /// Both piles empty and nobody holds a legal combination
    PilesExhausted,
    /// All seats but one were eliminated
    LastPlayerStanding,
    /// The configured turn cap was hit
    MaxTurnsReached,
}

/// Outcome of a finished game
#[derive(Debug, Clone)]
pub struct GameResult {
    pub winner: Option<usize>,
    /// Final score per seat, in table order
    pub scores: Vec<(usize, u32)>,
    pub turns_played: u32,
    pub end_reason: GameEndReason,
}

const DEFAULT_MAX_TURNS: u32 = 500;

pub struct GameLoop {
    game: GameState,
    controllers: Vec<Box<dyn PlayerController>>,
    max_turns: u32,
}

impl GameLoop {
    pub fn new(game: GameState, controllers: Vec<Box<dyn PlayerController>>) -> Result<Self> {
        if controllers.len() != game.n_players() {
            return Err(DragonError::InvalidSettings(format!(
                "{} controllers for {} seats",
                controllers.len(),
                game.n_players()
            )));
        }
        Ok(GameLoop {
            game,
            controllers,
            max_turns: DEFAULT_MAX_TURNS,
        })
    }

    /// Cap the number of turns (builder style)
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Play until the game ends and return the final standings
    pub fn run(&mut self) -> Result<GameResult> {
        loop {
            if self.game.turn.turn_number > self.max_turns {
                return Ok(self.finish(GameEndReason::MaxTurnsReached));
            }
            self.run_turn()?;

            if let Some(reason) = self.end_reason() {
                return Ok(self.finish(reason));
            }
            if !self.advance_turn() {
                return Ok(self.finish(GameEndReason::LastPlayerStanding));
            }
        }
    }

    /// Hand the turn to the next active seat; false when nobody is left to act
    pub fn advance_turn(&mut self) -> bool {
        let seat = self.game.turn.active_player_idx;
        match self.game.next_active_seat(seat) {
            Some(next) => {
                self.game.turn.next_turn(next);
                true
            }
            None => false,
        }
    }

    /// Play out one full turn for the active seat
    pub fn run_turn(&mut self) -> Result<()> {
        let seat = self.game.turn.active_player_idx;
        let header = format!(
            "--- turn {}: {} ---",
            self.game.turn.turn_number, self.game.players[seat].name
        );
        self.game.logger.normal(&header);

        let mut plays_done = 0;
        loop {
            match self.game.turn.current_step {
                TurnStep::ActivatePermanent => self.step_activate_permanent(seat)?,
                TurnStep::DrawCard => self.step_draw_card(seat)?,
                TurnStep::RevealMajor => self.step_reveal_major(seat)?,
                TurnStep::PlayCombination => plays_done = self.step_play_combination(seat)?,
                TurnStep::DrawMajor => self.step_draw_major(seat, plays_done)?,
            }
            if !self.game.turn.advance_step() {
                break;
            }
        }

        self.end_of_turn(seat)?;
        Ok(())
    }

    // ===== Step 1: permanent activation =====

    fn step_activate_permanent(&mut self, seat: usize) -> Result<()> {
        let wheel = CardId::Major(Arcana::WheelOfFortune);
        if self.game.players[seat].active_permanents.contains(&wheel)
            && self.confirm(seat, "activate the Wheel of Fortune?")
        {
            let target = if self.game.minor_draw.is_empty() {
                let options = self.seats_with_cards(seat);
                match self.choose_seat(seat, "draw the accumulated card from whom?", &options) {
                    Some(victim) => Some(EffectTarget::Player(victim)),
                    None => None,
                }
            } else {
                None
            };
            if target.is_some() || !self.game.minor_draw.is_empty() {
                self.try_resolve(wheel, EffectId::Accumulator, seat, target, None);
            }
        }

        let chariot = CardId::Major(Arcana::Chariot);
        if self.game.players[seat].active_permanents.contains(&chariot)
            && combination::find_any(&self.game.players[seat].hand).is_some()
            && self.confirm(seat, "activate the Chariot for a second combination?")
        {
            self.try_resolve(chariot, EffectId::DoublePlay, seat, None, None);
        }
        Ok(())
    }

    // ===== Step 2: the mandatory draw =====

    fn step_draw_card(&mut self, seat: usize) -> Result<()> {
        // The Star lets its owner shop the minor discard instead of drawing
        let star = CardId::Major(Arcana::Star);
        if self.game.players[seat].active_permanents.contains(&star)
            && !self.game.minor_discard.is_empty()
        {
            let options = self.game.minor_discard.cards().to_vec();
            if let Some(card) =
                self.choose_card(seat, "recall a card from the minor discard?", &options)
            {
                self.try_resolve(
                    star,
                    EffectId::MemoryRecall,
                    seat,
                    None,
                    Some(Choice::Card(card)),
                );
                return Ok(());
            }
        }

        if !self.game.minor_draw.is_empty() {
            let mut rng = self.game.rng.clone();
            self.game.players[seat].draws_from(&mut self.game.minor_draw, 1, &mut rng)?;
            self.game.rng = rng;
        } else {
            // Exhausted pile: take a random card from a chosen opponent
            let options = self.seats_with_cards(seat);
            if options.is_empty() {
                self.game.logger.verbose("no hand left to draw from");
                return Ok(());
            }
            let source = self
                .choose_seat(seat, "draw a card from whom?", &options)
                .unwrap_or(options[0]);
            self.game.draw_from_hand(seat, source, 1)?;
        }
        Ok(())
    }

    // ===== Step 3: revealing a major card =====

    fn step_reveal_major(&mut self, seat: usize) -> Result<()> {
        let player = &self.game.players[seat];
        if !player.has_unused_majors() || player.has_revealed_major_this_turn() {
            return Ok(());
        }
        let options = player.major_reserve.clone();
        let Some(card) = self.choose_card(seat, "reveal a major card?", &options) else {
            return Ok(());
        };
        self.reveal_major(seat, card)
    }

    fn reveal_major(&mut self, seat: usize, card: CardId) -> Result<()> {
        let CardId::Major(arcana) = card else {
            return Ok(());
        };
        match kind_of(arcana) {
            Some(EffectKind::Permanent) => {
                let card = self.game.players[seat].remove_from_reserve(card)?;
                self.game.players[seat].active_permanents.push(card);
                if card == CardId::Major(Arcana::HangedMan) {
                    self.game.players[seat].active_effects.insert(EffectId::Mirror);
                }
                self.game.players[seat].note_revealed_major();
                let message = format!("{} lays {card} face up", self.game.players[seat].name);
                self.game.logger.normal(&message);
            }
            Some(EffectKind::Equipment) => {
                let effect = match card.effects().first() {
                    Some(effect) => *effect,
                    None => return Ok(()),
                };
                let own: Vec<(usize, usize)> = (0..self.game.players[seat].combinations.len())
                    .map(|i| (seat, i))
                    .collect();
                if own.is_empty() {
                    return Ok(());
                }
                let Some((_, index)) =
                    self.choose_combination(seat, "equip which combination?", &own)
                else {
                    return Ok(());
                };
                let card = self.game.players[seat].remove_from_reserve(card)?;
                let target = Some(EffectTarget::Combination { seat, index });
                match resolver::resolve(&mut self.game, card, effect, seat, target, None) {
                    Ok(_) => {
                        self.game.players[seat].note_revealed_major();
                        let message =
                            format!("{} equips {card}", self.game.players[seat].name);
                        self.game.logger.normal(&message);
                    }
                    Err(err) => {
                        self.game.players[seat].adds_to_reserve([card]);
                        let message = format!("{card} stays in the reserve: {err}");
                        self.game.logger.verbose(&message);
                    }
                }
            }
            Some(EffectKind::Action) => {
                let effect = match card.effects().first() {
                    Some(effect) => *effect,
                    None => return Ok(()),
                };
                let Some((target, choice)) = self.gather_action(seat, effect) else {
                    return Ok(());
                };

                if self.blocked_by_justice(seat, effect, target, choice.as_ref()) {
                    let card = self.game.players[seat].remove_from_reserve(card)?;
                    self.game.action_discard.push(card);
                    self.game.players[seat].note_revealed_major();
                    return Ok(());
                }

                let card = self.game.players[seat].remove_from_reserve(card)?;
                match resolver::resolve(&mut self.game, card, effect, seat, target, choice) {
                    Ok(EffectOutcome::Blocked(reason)) => {
                        // A stopped attack is not spent
                        self.game.players[seat].adds_to_reserve([card]);
                        let message = format!("{card} is stopped and kept: {reason}");
                        self.game.logger.normal(&message);
                    }
                    Ok(outcome) => {
                        self.game.players[seat].note_revealed_major();
                        self.log_outcome(seat, card, &outcome);
                    }
                    Err(err) => {
                        self.game.players[seat].adds_to_reserve([card]);
                        let message = format!("{card} stays in the reserve: {err}");
                        self.game.logger.verbose(&message);
                    }
                }
            }
            None => {
                // Death carries no playable effect
                let message = format!("{card} cannot be played");
                self.game.logger.verbose(&message);
            }
        }
        Ok(())
    }

    /// Collect the target and choice an action effect needs, by asking the
    /// acting seat's controller. `None` means the player backed out.
    fn gather_action(
        &mut self,
        seat: usize,
        effect: EffectId,
    ) -> Option<(Option<EffectTarget>, Option<Choice>)> {
        match effect {
            EffectId::Foresight => {
                if self.game.minor_draw.is_empty() {
                    let options = self.seats_with_cards(seat);
                    let victim = self.choose_seat(seat, "peek whose hand?", &options)?;
                    Some((Some(EffectTarget::Player(victim)), None))
                } else {
                    Some((None, None))
                }
            }
            EffectId::Exchange => {
                let options = self.game.opponents_of(seat);
                let victim = self.choose_seat(seat, "exchange hands with whom?", &options)?;
                Some((Some(EffectTarget::Player(victim)), None))
            }
            EffectId::Equalizer => {
                let mut pool: Vec<usize> = (0..self.game.n_players())
                    .filter(|&s| !self.game.players[s].eliminated)
                    .collect();
                let first = self.choose_seat(seat, "pool whose hand first?", &pool)?;
                pool.retain(|&s| s != first);
                let second = self.choose_seat(seat, "pool whose hand second?", &pool)?;
                Some((None, Some(Choice::Seats(first, second))))
            }
            EffectId::Steal => {
                let options = self.opponent_combinations(seat);
                let target = self.choose_combination(seat, "steal which combination?", &options)?;
                Some((
                    Some(EffectTarget::Combination {
                        seat: target.0,
                        index: target.1,
                    }),
                    None,
                ))
            }
            EffectId::Annihilator => {
                let entries = self.annihilator_targets(seat);
                let cards: Vec<CardId> = entries.iter().map(|(card, _, _)| *card).collect();
                let chosen = self.choose_card(seat, "cancel which card in play?", &cards)?;
                entries
                    .into_iter()
                    .find(|(card, _, _)| *card == chosen)
                    .map(|(_, target, choice)| (Some(target), choice))
            }
            EffectId::Reactivation => {
                let options: Vec<CardId> = self
                    .game
                    .action_discard
                    .cards()
                    .iter()
                    .copied()
                    .filter(|c| {
                        *c != CardId::Major(Arcana::Temperance)
                            && matches!(c, CardId::Major(a) if kind_of(*a) == Some(EffectKind::Action))
                    })
                    .collect();
                let card = self.choose_card(seat, "replay which discarded card?", &options)?;
                let inner_effect = *card.effects().first()?;
                let (target, inner) = self.gather_action(seat, inner_effect)?;
                Some((
                    target,
                    Some(Choice::Reactivate {
                        card,
                        inner: inner.map(Box::new),
                    }),
                ))
            }
            EffectId::Resurrection => {
                let mut options: Vec<CardId> =
                    self.game.players[seat].inactive_permanents.clone();
                options.extend(self.game.action_discard.cards().iter().copied().filter(
                    |c| matches!(c, CardId::Major(a) if kind_of(*a) == Some(EffectKind::Equipment)),
                ));
                let revived = self.choose_card(seat, "bring back which card?", &options)?;
                let own: Vec<(usize, usize)> = (0..self.game.players[seat].combinations.len())
                    .map(|i| (seat, i))
                    .collect();
                let (_, index) =
                    self.choose_combination(seat, "sacrifice which combination?", &own)?;
                Some((
                    Some(EffectTarget::Card(revived)),
                    Some(Choice::CombinationIndex(index)),
                ))
            }
            // No decisions needed
            EffectId::Accelerate | EffectId::Redistribution | EffectId::Turnover => {
                Some((None, None))
            }
            _ => None,
        }
    }

    /// Every cancellable card in play: opponents' permanents and attachments
    fn annihilator_targets(
        &self,
        actor: usize,
    ) -> Vec<(CardId, EffectTarget, Option<Choice>)> {
        let mut entries = Vec::new();
        for (seat, player) in self.game.players.iter().enumerate() {
            if seat == actor || player.eliminated {
                continue;
            }
            for &card in &player.active_permanents {
                entries.push((card, EffectTarget::Card(card), None));
            }
            for (index, combo) in player.combinations.iter().enumerate() {
                for &attachment in &combo.attachments {
                    entries.push((
                        attachment,
                        EffectTarget::Combination { seat, index },
                        Some(Choice::Card(attachment)),
                    ));
                }
            }
        }
        entries
    }

    /// Offer the targeted player a Justice reaction against an attack
    fn blocked_by_justice(
        &mut self,
        actor: usize,
        effect: EffectId,
        target: Option<EffectTarget>,
        choice: Option<&Choice>,
    ) -> bool {
        if !effect.is_negative() {
            return false;
        }
        let justice = CardId::Major(Arcana::Justice);
        for defender in self.defenders_of(actor, target, choice) {
            if self.game.players[defender].eliminated
                || !self.game.players[defender].major_reserve.contains(&justice)
            {
                continue;
            }
            if self.confirm(defender, "block the attack with Justice?") {
                // The resolver never runs; both cards are spent
                if let Ok(card) = self.game.players[defender].remove_from_reserve(justice) {
                    self.game.action_discard.push(card);
                    let message = format!(
                        "{} blocks the attack",
                        self.game.players[defender].name
                    );
                    self.game.logger.normal(&message);
                    return true;
                }
            }
        }
        false
    }

    /// Seats on the receiving end of a negative effect
    fn defenders_of(
        &self,
        actor: usize,
        target: Option<EffectTarget>,
        choice: Option<&Choice>,
    ) -> SmallVec<[usize; 2]> {
        let mut defenders: SmallVec<[usize; 2]> = SmallVec::new();
        match target {
            Some(EffectTarget::Player(seat)) if seat != actor => defenders.push(seat),
            Some(EffectTarget::Combination { seat, .. }) if seat != actor => defenders.push(seat),
            Some(EffectTarget::Card(card)) => {
                if let Some(owner) = self
                    .game
                    .players
                    .iter()
                    .position(|p| p.active_permanents.contains(&card))
                {
                    if owner != actor {
                        defenders.push(owner);
                    }
                }
            }
            _ => {}
        }
        if let Some(Choice::Seats(a, b)) = choice {
            for seat in [*a, *b] {
                if seat != actor && !defenders.contains(&seat) {
                    defenders.push(seat);
                }
            }
        }
        defenders
    }

    // ===== Step 4: laying combinations =====

    fn step_play_combination(&mut self, seat: usize) -> Result<usize> {
        self.offer_joker_swap(seat);

        let plays_allowed = if self.game.players[seat]
            .active_effects
            .contains(&EffectId::DoublePlay)
        {
            2
        } else {
            1
        };

        let mut plays_done = 0;
        while plays_done < plays_allowed {
            let view = GameStateView::new(&self.game, seat);
            let cards = self.controllers[seat].choose_hand_cards(&view, "lay a combination?");
            if cards.is_empty() {
                break;
            }
            if !self.take_and_lay(seat, &cards) {
                break;
            }
            plays_done += 1;
        }

        if plays_done == 0 {
            self.offer_extension(seat);
        }
        Ok(plays_done)
    }

    /// Validate the selection against the hand and the shape rules, then
    /// move the cards into a new tableau combination. Any failure leaves
    /// the hand untouched.
    fn take_and_lay(&mut self, seat: usize, cards: &[CardId]) -> bool {
        let mut rest = self.game.players[seat].hand.clone();
        for card in cards {
            match rest.iter().position(|c| c == card) {
                Some(pos) => {
                    rest.remove(pos);
                }
                None => {
                    let message = format!("rejected: {card} is not in hand");
                    self.game.logger.verbose(&message);
                    return false;
                }
            }
        }
        match Combination::new(cards.to_vec()) {
            Ok(combo) => {
                self.game.players[seat].hand = rest;
                let message = format!(
                    "{} lays a combination worth {}",
                    self.game.players[seat].name,
                    combo.raw_value()
                );
                self.game.players[seat].combinations.push(combo);
                self.game.players[seat].note_played_combination();
                self.game.logger.normal(&message);
                true
            }
            Err(err) => {
                let message = format!("rejected combination: {err}");
                self.game.logger.verbose(&message);
                false
            }
        }
    }

    /// Offer to swap an attached Magician for the minor card it stands in
    /// for; the Magician returns to the owner's reserve
    fn offer_joker_swap(&mut self, seat: usize) {
        let magician = CardId::Major(Arcana::Magician);
        for index in 0..self.game.players[seat].combinations.len() {
            let combo = &self.game.players[seat].combinations[index];
            if !combo.attachments.contains(&magician) {
                continue;
            }
            let mut reduced = combo.allowances();
            reduced.jokers -= 1;
            let candidates: Vec<CardId> = self.game.players[seat]
                .hand
                .iter()
                .copied()
                .filter(|&card| {
                    let mut cards = combo.cards.clone();
                    cards.push(card);
                    combination::classify(&cards, reduced).is_ok()
                })
                .collect();
            let Some(card) =
                self.choose_card(seat, "swap the Magician for its card?", &candidates)
            else {
                continue;
            };

            let player = &mut self.game.players[seat];
            if let Some(pos) = player.hand.iter().position(|c| *c == card) {
                player.hand.remove(pos);
            }
            let combo = &mut player.combinations[index];
            combo.cards.push(card);
            if let Some(pos) = combo.attachments.iter().position(|c| *c == magician) {
                combo.attachments.remove(pos);
            }
            if let Ok(shape) = combination::classify(&combo.cards, combo.allowances()) {
                combo.shape = shape;
            }
            player.adds_to_reserve([magician]);
            let message = format!("{} swaps the Magician back out", player.name);
            self.game.logger.normal(&message);
            return;
        }
    }

    /// Offer to grow an existing combination with hand cards instead
    fn offer_extension(&mut self, seat: usize) {
        let extendable: Vec<(usize, usize)> = self.game.players[seat]
            .combinations
            .iter()
            .enumerate()
            .filter(|(_, c)| c.can_extend())
            .map(|(i, _)| (seat, i))
            .collect();
        if extendable.is_empty() || self.game.players[seat].hand.is_empty() {
            return;
        }
        let Some((_, index)) =
            self.choose_combination(seat, "extend a combination?", &extendable)
        else {
            return;
        };
        let view = GameStateView::new(&self.game, seat);
        let cards = self.controllers[seat].choose_hand_cards(&view, "extend with which cards?");
        if cards.is_empty() {
            return;
        }
        let mut rest = self.game.players[seat].hand.clone();
        for card in &cards {
            match rest.iter().position(|c| c == card) {
                Some(pos) => {
                    rest.remove(pos);
                }
                None => return,
            }
        }
        if self.game.players[seat].combinations[index]
            .extend(&cards)
            .is_ok()
        {
            self.game.players[seat].hand = rest;
        }
    }

    // ===== Step 5: the reward draw =====

    fn step_draw_major(&mut self, seat: usize, plays_done: usize) -> Result<()> {
        if plays_done == 0 || self.game.major_draw.is_empty() {
            return Ok(());
        }
        let mut rng = self.game.rng.clone();
        self.game.players[seat].draws_from(&mut self.game.major_draw, plays_done, &mut rng)?;
        self.game.rng = rng;
        Ok(())
    }

    // ===== End of turn =====

    fn end_of_turn(&mut self, seat: usize) -> Result<()> {
        self.game.players[seat]
            .active_effects
            .remove(&EffectId::DoublePlay);
        self.game.players[seat].end_turn();

        if self.game.stage == Stage::PhaseOne && self.game.minor_draw.is_empty() {
            self.game.stage = Stage::PhaseTwo;
            self.game
                .logger
                .minimal("the minor pile is exhausted: phase two begins");
        }

        if self.game.stage == Stage::PhaseTwo {
            for idx in 0..self.game.n_players() {
                let player = &mut self.game.players[idx];
                if !player.eliminated && player.has_empty_hand() {
                    player.eliminated = true;
                    let message = format!("{} is out of cards and leaves the game", player.name);
                    self.game.logger.minimal(&message);
                }
            }
        }

        self.game.audit_conservation()
    }

    fn end_reason(&self) -> Option<GameEndReason> {
        let active = self
            .game
            .players
            .iter()
            .filter(|p| !p.eliminated)
            .count();
        if active <= 1 {
            return Some(GameEndReason::LastPlayerStanding);
        }
        let piles_empty = self.game.minor_draw.is_empty() && self.game.major_draw.is_empty();
        if piles_empty
            && self
                .game
                .players
                .iter()
                .filter(|p| !p.eliminated)
                .all(|p| combination::find_any(&p.hand).is_none())
        {
            return Some(GameEndReason::PilesExhausted);
        }
        None
    }

    fn finish(&mut self, end_reason: GameEndReason) -> GameResult {
        self.game.stage = Stage::GameOver;
        let scores = scoring::final_scores(&self.game);
        let winner = scoring::winner(&self.game);

        let summary = match winner {
            Some(seat) => format!(
                "game over after {} turns: {} wins with {} points",
                self.game.turn.turn_number,
                self.game.players[seat].name,
                scores[seat].1
            ),
            None => "game over with no winner".to_string(),
        };
        self.game.logger.minimal(&summary);

        for controller in self.controllers.iter_mut() {
            let view = GameStateView::new(&self.game, controller.seat());
            controller.on_game_end(&view, &scores);
        }

        GameResult {
            winner,
            scores,
            turns_played: self.game.turn.turn_number,
            end_reason,
        }
    }

    // ===== Controller plumbing =====

    fn confirm(&mut self, seat: usize, prompt: &str) -> bool {
        let view = GameStateView::new(&self.game, seat);
        self.controllers[seat].confirm(&view, prompt)
    }

    fn choose_card(&mut self, seat: usize, prompt: &str, options: &[CardId]) -> Option<CardId> {
        if options.is_empty() {
            return None;
        }
        let view = GameStateView::new(&self.game, seat);
        self.controllers[seat]
            .choose_card(&view, prompt, options)
            .filter(|c| options.contains(c))
    }

    fn choose_seat(&mut self, seat: usize, prompt: &str, options: &[usize]) -> Option<usize> {
        if options.is_empty() {
            return None;
        }
        let view = GameStateView::new(&self.game, seat);
        self.controllers[seat]
            .choose_seat(&view, prompt, options)
            .filter(|s| options.contains(s))
    }

    fn choose_combination(
        &mut self,
        seat: usize,
        prompt: &str,
        options: &[(usize, usize)],
    ) -> Option<(usize, usize)> {
        if options.is_empty() {
            return None;
        }
        let view = GameStateView::new(&self.game, seat);
        self.controllers[seat]
            .choose_combination(&view, prompt, options)
            .filter(|c| options.contains(c))
    }

    /// Resolve an effect, logging instead of failing the game when the
    /// gathered decisions turn out invalid
    fn try_resolve(
        &mut self,
        card: CardId,
        effect: EffectId,
        seat: usize,
        target: Option<EffectTarget>,
        choice: Option<Choice>,
    ) {
        match resolver::resolve(&mut self.game, card, effect, seat, target, choice) {
            Ok(outcome) => self.log_outcome(seat, card, &outcome),
            Err(err) => {
                let message = format!("{card} did not resolve: {err}");
                self.game.logger.verbose(&message);
            }
        }
    }

    fn log_outcome(&mut self, seat: usize, card: CardId, outcome: &EffectOutcome) {
        let name = &self.game.players[seat].name;
        let message = match outcome {
            EffectOutcome::Applied => format!("{name} resolves {card}"),
            EffectOutcome::Revealed(cards) => {
                format!("{name} resolves {card} and peeks {} card(s)", cards.len())
            }
            EffectOutcome::Blocked(reason) => format!("{card} is stopped: {reason}"),
            EffectOutcome::Redirected { to } => {
                format!(
                    "{card} bounces back onto {}",
                    self.game.players[*to].name
                )
            }
        };
        self.game.logger.normal(&message);
    }

    /// Non-eliminated opponents still holding hand cards
    fn seats_with_cards(&self, seat: usize) -> Vec<usize> {
        self.game
            .opponents_of(seat)
            .into_iter()
            .filter(|&s| !self.game.players[s].hand.is_empty())
            .collect()
    }

    /// Opponents' combinations as (seat, index) pairs
    fn opponent_combinations(&self, seat: usize) -> Vec<(usize, usize)> {
        let mut options = Vec::new();
        for opponent in self.game.opponents_of(seat) {
            for index in 0..self.game.players[opponent].combinations.len() {
                options.push((opponent, index));
            }
        }
        options
    }
}
