//! Effect resolution procedures
//!
//! One entry point, `resolve`, dispatches to a per-effect procedure. The
//! resolver validates targets and choices, applies protection and mirror
//! gating for negative effects, mutates the game state, and finally routes
//! the played card by its persistence kind: Action cards to the action
//! discard, Permanent cards to the owner's permanent area, Equipment cards
//! onto the targeted combination. Validation failures and blocked
//! resolutions leave the state untouched; a blocked card stays with the
//! actor.

use crate::core::card::{Arcana, CardId};
use crate::core::combination::{self, Combination};
use crate::core::effects::{kind_of, EffectId, EffectKind, Restriction};
use crate::core::player::Player;
use crate::game::state::GameState;
use crate::{DragonError, Result};
use rand::seq::SliceRandom;

/// What an effect is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTarget {
    /// A seat (hand swaps, hand peeks, hand draws)
    Player(usize),
    /// A combination in a seat's tableau
    Combination { seat: usize, index: usize },
    /// A specific card in play (permanent cancellation, resurrection)
    Card(CardId),
}

/// A decision accompanying an effect, gathered by the turn controller
/// before resolution
#[derive(Debug, Clone)]
pub enum Choice {
    /// A card picked from an open pile or an attachment list
    Card(CardId),
    /// Two seats (hand pooling)
    Seats(usize, usize),
    /// Index into the actor's own tableau (sacrifice)
    CombinationIndex(usize),
    /// Replay a discarded action, optionally with the inner effect's choice
    Reactivate {
        card: CardId,
        inner: Option<Box<Choice>>,
    },
}

/// Result of a resolution that did not error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    Applied,
    /// Peeking effects report what was seen
    Revealed(Vec<CardId>),
    /// A protection or shield stopped the effect; the card is not spent
    Blocked(String),
    /// A mirror sent the effect back; `to` is the seat that suffered it
    Redirected { to: usize },
}

/// Resolve one effect of `card` played by `actor`
///
/// The card must carry the effect. After an applied resolution an Action
/// card ends in the action discard pile; a Permanent card is placed face
/// up in the actor's permanent area unless it is already in play (repeat
/// activations); Equipment cards move onto the targeted combination inside
/// the attach procedure. A blocked card is not spent and stays wherever
/// the caller took it from.
pub fn resolve(
    state: &mut GameState,
    card: CardId,
    effect: EffectId,
    actor: usize,
    target: Option<EffectTarget>,
    choice: Option<Choice>,
) -> Result<EffectOutcome> {
    if actor >= state.n_players() {
        return Err(DragonError::IllegalEffect(format!(
            "seat {actor} does not exist"
        )));
    }
    if !card.effects().contains(&effect) {
        return Err(DragonError::IllegalEffect(format!(
            "{card} does not carry the effect {effect:?}"
        )));
    }

    let outcome = dispatch(state, card, effect, actor, target, choice)?;
    if !matches!(outcome, EffectOutcome::Blocked(_)) {
        dispose(state, card, actor);
    }
    Ok(outcome)
}

fn dispatch(
    state: &mut GameState,
    card: CardId,
    effect: EffectId,
    actor: usize,
    target: Option<EffectTarget>,
    choice: Option<Choice>,
) -> Result<EffectOutcome> {
    match effect {
        EffectId::AllInclusive
        | EffectId::Joker
        | EffectId::Hybrid
        | EffectId::Outlier
        | EffectId::Protector
        | EffectId::DoubleScore => attach_equipment(state, card, effect, actor, target),
        EffectId::Foresight => foresight(state, actor, target),
        EffectId::Annihilator => annihilator(state, actor, target, choice),
        EffectId::DoublePlay => double_play(state, actor),
        EffectId::Equalizer => equalizer(state, actor, choice),
        EffectId::Accelerate => accelerate(state, actor),
        EffectId::Accumulator => accumulator(state, actor, target),
        EffectId::Steal => steal(state, actor, target),
        EffectId::Mirror => {
            state.players[actor].active_effects.insert(EffectId::Mirror);
            Ok(EffectOutcome::Applied)
        }
        EffectId::Reactivation => reactivation(state, actor, target, choice),
        EffectId::Redistribution => redistribution(state, actor),
        EffectId::MemoryRecall => memory_recall(state, actor, choice),
        EffectId::Exchange => exchange(state, actor, target),
        EffectId::Turnover => turnover(state),
        EffectId::Resurrection => resurrection(state, actor, target, choice),
        EffectId::Block => Err(DragonError::IllegalEffect(
            "Block resolves in reaction to an attack, not on its own".to_string(),
        )),
        EffectId::GodSaveTheQueen => Err(DragonError::IllegalEffect(
            "God Save the Queen shields passively and is never resolved directly".to_string(),
        )),
        EffectId::OldMaid => Err(DragonError::IllegalEffect(
            "Death is never played; it only counts against a hand at round end".to_string(),
        )),
    }
}

/// Route the played card by its persistence kind after a non-error resolution
fn dispose(state: &mut GameState, card: CardId, actor: usize) {
    let arcana = match card {
        CardId::Major(a) => a,
        CardId::Minor(_, _) => return,
    };
    match kind_of(arcana) {
        Some(EffectKind::Action) => state.action_discard.push(card),
        Some(EffectKind::Permanent) => {
            let player = &mut state.players[actor];
            let placed = player.active_permanents.contains(&card)
                || player.inactive_permanents.contains(&card);
            if !placed {
                player.active_permanents.push(card);
            }
        }
        // Equipment moved into the attachments inside attach_equipment
        Some(EffectKind::Equipment) | None => {}
    }
}

// ===== Negative-effect gating =====

enum Gate {
    Proceed,
    /// Mirror consumed; the effect now turns against the original actor
    Redirect,
}

fn has_mirror(player: &Player) -> bool {
    player.active_effects.contains(&EffectId::Mirror)
}

/// Spend an armed mirror: the flag clears and the Hanged Man turns face down
fn consume_mirror(player: &mut Player) {
    player.active_effects.remove(&EffectId::Mirror);
    let hanged_man = CardId::Major(Arcana::HangedMan);
    if let Some(pos) = player
        .active_permanents
        .iter()
        .position(|c| *c == hanged_man)
    {
        let card = player.active_permanents.remove(pos);
        player.inactive_permanents.push(card);
    }
}

/// Check the defender's standing protections against a negative effect
fn gate_against(state: &mut GameState, effect: EffectId, actor: usize, defender: usize) -> Gate {
    if defender == actor {
        return Gate::Proceed;
    }
    if effect.is_negative() && has_mirror(&state.players[defender]) {
        consume_mirror(&mut state.players[defender]);
        let message = format!(
            "{} reflects the attack back at {}",
            state.players[defender].name, state.players[actor].name
        );
        state.logger.normal(&message);
        return Gate::Redirect;
    }
    Gate::Proceed
}

// ===== Procedures =====

fn require_combination_target(
    state: &GameState,
    target: Option<EffectTarget>,
) -> Result<(usize, usize)> {
    match target {
        Some(EffectTarget::Combination { seat, index })
            if seat < state.n_players() && index < state.players[seat].combinations.len() =>
        {
            Ok((seat, index))
        }
        Some(EffectTarget::Combination { seat, index }) => Err(DragonError::IllegalEffect(
            format!("no combination at seat {seat} index {index}"),
        )),
        _ => Err(DragonError::UnresolvedChoice(
            "this effect needs a combination target".to_string(),
        )),
    }
}

/// Attach an Equipment card to one of the actor's own combinations
fn attach_equipment(
    state: &mut GameState,
    card: CardId,
    effect: EffectId,
    actor: usize,
    target: Option<EffectTarget>,
) -> Result<EffectOutcome> {
    let (seat, index) = require_combination_target(state, target)?;
    if seat != actor {
        return Err(DragonError::IllegalEffect(
            "equipment attaches to the owner's own combinations".to_string(),
        ));
    }

    let player = &state.players[actor];
    if effect.restrictions().contains(&Restriction::NotAlone)
        && !(player.has_played_combination_this_turn()
            && index == player.combinations.len() - 1)
    {
        return Err(DragonError::IllegalEffect(format!(
            "{card} must accompany a combination the moment it is laid"
        )));
    }

    state.players[actor].combinations[index].attach(card)?;
    Ok(EffectOutcome::Applied)
}

/// Peek the top of the minor draw pile, or an opponent's hand once the
/// pile is exhausted
fn foresight(
    state: &mut GameState,
    actor: usize,
    target: Option<EffectTarget>,
) -> Result<EffectOutcome> {
    let mut rng = state.rng.clone();

    let peeked: Vec<CardId> = if !state.minor_draw.is_empty() {
        state
            .minor_draw
            .remaining_cards()
            .choose_multiple(&mut rng, 2)
            .copied()
            .collect()
    } else {
        let seat = match target {
            Some(EffectTarget::Player(seat)) if seat < state.n_players() && seat != actor => seat,
            _ => {
                return Err(DragonError::UnresolvedChoice(
                    "the minor pile is empty; pick an opponent's hand to peek".to_string(),
                ))
            }
        };
        state.players[seat]
            .hand
            .choose_multiple(&mut rng, 2)
            .copied()
            .collect()
    };

    state.rng = rng;
    state
        .logger
        .verbose(&format!("foresight reveals {} card(s)", peeked.len()));
    Ok(EffectOutcome::Revealed(peeked))
}

/// Cancel an Equipment or Permanent card in play
fn annihilator(
    state: &mut GameState,
    actor: usize,
    target: Option<EffectTarget>,
    choice: Option<Choice>,
) -> Result<EffectOutcome> {
    match target {
        Some(EffectTarget::Card(permanent)) => annihilate_permanent(state, actor, permanent),
        Some(EffectTarget::Combination { .. }) => {
            let (seat, index) = require_combination_target(state, target)?;
            let equipment = match choice {
                Some(Choice::Card(card)) => card,
                _ => {
                    return Err(DragonError::UnresolvedChoice(
                        "pick the attached card to cancel".to_string(),
                    ))
                }
            };
            annihilate_equipment(state, actor, seat, index, equipment)
        }
        _ => Err(DragonError::UnresolvedChoice(
            "the Annihilator needs a permanent or an equipped combination as target".to_string(),
        )),
    }
}

fn annihilate_permanent(
    state: &mut GameState,
    actor: usize,
    permanent: CardId,
) -> Result<EffectOutcome> {
    let owner = state
        .players
        .iter()
        .position(|p| p.active_permanents.contains(&permanent))
        .ok_or_else(|| {
            DragonError::IllegalEffect(format!("{permanent} is not an active permanent in play"))
        })?;

    if owner != actor
        && state.players[owner]
            .active_permanents
            .contains(&CardId::Major(Arcana::Star))
    {
        return Ok(EffectOutcome::Blocked(format!(
            "{}'s permanents are shielded by God Save the Queen",
            state.players[owner].name
        )));
    }

    match gate_against(state, EffectId::Annihilator, actor, owner) {
        Gate::Redirect => {
            // The attacker loses a permanent of their own instead
            let Some(&victim_card) = state.players[actor].active_permanents.first() else {
                return Ok(EffectOutcome::Blocked(
                    "the mirrored cancellation found no permanent to hit".to_string(),
                ));
            };
            remove_permanent(state, actor, victim_card);
            return Ok(EffectOutcome::Redirected { to: actor });
        }
        Gate::Proceed => {}
    }

    remove_permanent(state, owner, permanent);
    Ok(EffectOutcome::Applied)
}

fn remove_permanent(state: &mut GameState, owner: usize, permanent: CardId) {
    let player = &mut state.players[owner];
    if let Some(pos) = player.active_permanents.iter().position(|c| *c == permanent) {
        player.active_permanents.remove(pos);
    }
    for effect in permanent.effects() {
        player.active_effects.remove(effect);
    }
    state.action_discard.push(permanent);
}

fn annihilate_equipment(
    state: &mut GameState,
    actor: usize,
    seat: usize,
    index: usize,
    equipment: CardId,
) -> Result<EffectOutcome> {
    if state.players[seat].combinations[index].is_protected() {
        return Ok(EffectOutcome::Blocked(
            "the combination is guarded by a Protector".to_string(),
        ));
    }

    match gate_against(state, EffectId::Annihilator, actor, seat) {
        Gate::Redirect => {
            // Hit the attacker's own matching equipment if they have one
            let Some((idx, _)) = state.players[actor]
                .combinations
                .iter()
                .enumerate()
                .find(|(_, combo)| !combo.is_protected() && combo.attachments.contains(&equipment))
            else {
                return Ok(EffectOutcome::Blocked(
                    "the mirrored cancellation found no matching equipment".to_string(),
                ));
            };
            strip_equipment(state, actor, idx, equipment)?;
            return Ok(EffectOutcome::Redirected { to: actor });
        }
        Gate::Proceed => {}
    }

    strip_equipment(state, seat, index, equipment)?;
    Ok(EffectOutcome::Applied)
}

/// Remove one attachment and revalidate the combination's shape
///
/// A combination whose shape no longer holds without the cancelled card is
/// dismantled: its minor cards return to the owner's hand for recombination
/// and its remaining attachments go to the action discard.
fn strip_equipment(
    state: &mut GameState,
    seat: usize,
    index: usize,
    equipment: CardId,
) -> Result<()> {
    let combo = &mut state.players[seat].combinations[index];
    let pos = combo
        .attachments
        .iter()
        .position(|c| *c == equipment)
        .ok_or_else(|| {
            DragonError::IllegalEffect(format!("{equipment} is not attached to that combination"))
        })?;
    combo.attachments.remove(pos);

    match combination::classify(&combo.cards, combo.allowances()) {
        Ok(shape) => {
            combo.shape = shape;
        }
        Err(_) => {
            let combo = state.players[seat].combinations.remove(index);
            for attachment in combo.attachments {
                state.action_discard.push(attachment);
            }
            state.players[seat].adds_to_hand(combo.cards);
        }
    }
    state.action_discard.push(equipment);
    Ok(())
}

/// Arm a second combination play for this turn
fn double_play(state: &mut GameState, actor: usize) -> Result<EffectOutcome> {
    if combination::find_any(&state.players[actor].hand).is_none() {
        return Err(DragonError::IllegalEffect(
            "the Chariot needs another combination ready to lay".to_string(),
        ));
    }
    state.players[actor]
        .active_effects
        .insert(EffectId::DoublePlay);
    // The Chariot is spent for the rest of the game unless resurrected
    let chariot = CardId::Major(Arcana::Chariot);
    let player = &mut state.players[actor];
    if let Some(pos) = player.active_permanents.iter().position(|c| *c == chariot) {
        let card = player.active_permanents.remove(pos);
        player.inactive_permanents.push(card);
    } else {
        player.inactive_permanents.push(chariot);
    }
    Ok(EffectOutcome::Applied)
}

/// Pool two hands, shuffle, and deal them back evenly
fn equalizer(
    state: &mut GameState,
    actor: usize,
    choice: Option<Choice>,
) -> Result<EffectOutcome> {
    let (mut a, mut b) = match choice {
        Some(Choice::Seats(a, b)) => (a, b),
        _ => {
            return Err(DragonError::UnresolvedChoice(
                "pick the two seats whose hands get pooled".to_string(),
            ))
        }
    };
    if a == b || a >= state.n_players() || b >= state.n_players() {
        return Err(DragonError::IllegalEffect(format!(
            "cannot pool the hands of seats {a} and {b}"
        )));
    }
    if state.players[a].eliminated || state.players[b].eliminated {
        return Err(DragonError::IllegalEffect(
            "an eliminated player's hand cannot be pooled".to_string(),
        ));
    }

    let mut redirected = false;
    for seat in [&mut a, &mut b] {
        if *seat != actor && has_mirror(&state.players[*seat]) {
            consume_mirror(&mut state.players[*seat]);
            *seat = actor;
            redirected = true;
            break;
        }
    }
    if a == b {
        return Ok(EffectOutcome::Blocked(
            "the mirrored pooling collapsed onto one seat".to_string(),
        ));
    }

    let n_a = state.players[a].hand.len();
    let n_b = state.players[b].hand.len();
    let mut pool: Vec<CardId> = Vec::with_capacity(n_a + n_b);
    pool.append(&mut state.players[a].hand);
    pool.append(&mut state.players[b].hand);

    let mut rng = state.rng.clone();
    pool.shuffle(&mut rng);
    state.rng = rng;

    // The odd leftover goes to whoever held fewer cards before
    let mut share_a = pool.len() / 2;
    if pool.len() % 2 == 1 && n_a <= n_b {
        share_a += 1;
    }
    let for_b = pool.split_off(share_a);
    state.players[a].hand = pool;
    state.players[b].hand = for_b;

    if redirected {
        Ok(EffectOutcome::Redirected { to: actor })
    } else {
        Ok(EffectOutcome::Applied)
    }
}

/// Every active player draws one minor card, the actor first
fn accelerate(state: &mut GameState, actor: usize) -> Result<EffectOutcome> {
    let n = state.n_players();
    let mut rng = state.rng.clone();
    for offset in 0..n {
        let seat = (actor + offset) % n;
        if state.players[seat].eliminated {
            continue;
        }
        if !state.minor_draw.is_empty() {
            state.players[seat].draws_from(&mut state.minor_draw, 1, &mut rng)?;
        } else {
            // Exhausted pile: draw from the nearest right-hand neighbor
            // still holding cards
            let mut donor = None;
            let mut candidate = state.right_neighbor(seat);
            for _ in 0..n - 1 {
                if !state.players[candidate].eliminated
                    && !state.players[candidate].hand.is_empty()
                {
                    donor = Some(candidate);
                    break;
                }
                candidate = state.right_neighbor(candidate);
            }
            if let Some(donor) = donor {
                let (taker, source) = state.two_players_mut(seat, donor);
                let cards = source.take_random_from_hand(1, &mut rng)?;
                taker.adds_to_hand(cards);
            }
        }
    }
    state.rng = rng;
    Ok(EffectOutcome::Applied)
}

/// One Wheel of Fortune activation: draw, accumulate, discard
fn accumulator(
    state: &mut GameState,
    actor: usize,
    target: Option<EffectTarget>,
) -> Result<EffectOutcome> {
    let wheel = CardId::Major(Arcana::WheelOfFortune);
    if !state.players[actor].active_permanents.contains(&wheel) {
        return Err(DragonError::IllegalEffect(
            "the Wheel of Fortune must be an active permanent to accumulate".to_string(),
        ));
    }

    let mut rng = state.rng.clone();
    let drawn = if !state.minor_draw.is_empty() {
        state.minor_draw.draw(1, &mut rng)?
    } else {
        let seat = match target {
            Some(EffectTarget::Player(seat))
                if seat < state.n_players() && seat != actor && !state.players[seat].eliminated =>
            {
                seat
            }
            _ => {
                return Err(DragonError::UnresolvedChoice(
                    "the minor pile is empty; pick the opponent to draw from".to_string(),
                ))
            }
        };
        if state.players[seat].hand.is_empty() {
            return Err(DragonError::IllegalEffect(format!(
                "{} has no cards to draw from",
                state.players[seat].name
            )));
        }
        state.players[seat].take_random_from_hand(1, &mut rng)?
    };
    state.rng = rng;

    for card in drawn {
        state.players[actor].wheel_total += card.score_value();
        state.minor_discard.push(card);
    }
    Ok(EffectOutcome::Applied)
}

/// Steal a combination laid before another player, attachments included
fn steal(
    state: &mut GameState,
    actor: usize,
    target: Option<EffectTarget>,
) -> Result<EffectOutcome> {
    let (seat, index) = require_combination_target(state, target)?;
    if seat == actor {
        return Err(DragonError::IllegalEffect(
            "a player cannot steal their own combination".to_string(),
        ));
    }
    if state.players[seat].combinations[index].is_protected() {
        return Ok(EffectOutcome::Blocked(
            "the combination is guarded by a Protector".to_string(),
        ));
    }

    match gate_against(state, EffectId::Steal, actor, seat) {
        Gate::Redirect => {
            // The defender robs the attacker's best unprotected combination
            let Some(idx) = best_unprotected(&state.players[actor].combinations) else {
                return Ok(EffectOutcome::Blocked(
                    "the mirrored theft found nothing to take".to_string(),
                ));
            };
            let combo = state.players[actor].combinations.remove(idx);
            state.players[seat].combinations.push(combo);
            Ok(EffectOutcome::Redirected { to: actor })
        }
        Gate::Proceed => {
            let combo = state.players[seat].combinations.remove(index);
            state.players[actor].combinations.push(combo);
            Ok(EffectOutcome::Applied)
        }
    }
}

fn best_unprotected(combinations: &[Combination]) -> Option<usize> {
    combinations
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_protected())
        .max_by_key(|(_, c)| c.raw_value())
        .map(|(idx, _)| idx)
}

/// Replay a card from the action discard pile
fn reactivation(
    state: &mut GameState,
    actor: usize,
    target: Option<EffectTarget>,
    choice: Option<Choice>,
) -> Result<EffectOutcome> {
    if state.action_discard.is_empty() {
        return Err(DragonError::IllegalEffect(
            "the action discard pile is empty; nothing to reactivate".to_string(),
        ));
    }

    let (card, inner) = match choice {
        Some(Choice::Reactivate { card, inner }) => (card, inner.map(|b| *b)),
        Some(Choice::Card(card)) => (card, None),
        _ => {
            return Err(DragonError::UnresolvedChoice(
                "pick the discarded card to replay".to_string(),
            ))
        }
    };
    if card == CardId::Major(Arcana::Temperance) {
        return Err(DragonError::IllegalEffect(
            "Temperance cannot reactivate itself".to_string(),
        ));
    }
    // Cancelled permanents and dismantled equipment also land in this
    // discard; only true Action cards may be replayed
    if !matches!(card, CardId::Major(a) if kind_of(a) == Some(EffectKind::Action)) {
        return Err(DragonError::IllegalEffect(format!(
            "{card} is not an action card and cannot be replayed"
        )));
    }
    let effect = *card.effects().first().ok_or_else(|| {
        DragonError::IllegalEffect(format!("{card} carries no replayable effect"))
    })?;

    // Take the card out, replay it; an applied resolution routes it back to
    // the discard, anything else restores it by hand
    let card = state.action_discard.take(card)?;
    match resolve(state, card, effect, actor, target, inner) {
        Ok(outcome) => {
            if matches!(outcome, EffectOutcome::Blocked(_)) {
                state.action_discard.push(card);
            }
            Ok(outcome)
        }
        Err(err) => {
            state.action_discard.push(card);
            Err(err)
        }
    }
}

/// All hands shuffle into the minor pile and get drawn back out
fn redistribution(state: &mut GameState, actor: usize) -> Result<EffectOutcome> {
    let n = state.n_players();
    let mut owed: Vec<usize> = vec![0; n];
    for (seat, player) in state.players.iter_mut().enumerate() {
        if player.eliminated {
            continue;
        }
        owed[seat] = player.hand.len();
        state.minor_draw.return_cards(player.hand.drain(..));
    }

    let mut rng = state.rng.clone();
    for offset in 0..n {
        let seat = (actor + offset) % n;
        if owed[seat] > 0 {
            state.players[seat].draws_from(&mut state.minor_draw, owed[seat], &mut rng)?;
        }
    }
    state.rng = rng;
    Ok(EffectOutcome::Applied)
}

/// Pick the minor draw from the minor discard pile instead
fn memory_recall(
    state: &mut GameState,
    actor: usize,
    choice: Option<Choice>,
) -> Result<EffectOutcome> {
    let star = CardId::Major(Arcana::Star);
    if !state.players[actor].active_permanents.contains(&star) {
        return Err(DragonError::IllegalEffect(
            "the Star must be an active permanent to recall from the discard".to_string(),
        ));
    }
    let card = match choice {
        Some(Choice::Card(card)) => card,
        _ => {
            return Err(DragonError::UnresolvedChoice(
                "pick the card to recall from the minor discard".to_string(),
            ))
        }
    };
    let card = state.minor_discard.take(card)?;
    state.players[actor].adds_to_hand([card]);
    Ok(EffectOutcome::Applied)
}

/// Swap the whole hand with a chosen opponent
fn exchange(
    state: &mut GameState,
    actor: usize,
    target: Option<EffectTarget>,
) -> Result<EffectOutcome> {
    let seat = match target {
        Some(EffectTarget::Player(seat))
            if seat < state.n_players() && seat != actor && !state.players[seat].eliminated =>
        {
            seat
        }
        _ => {
            return Err(DragonError::UnresolvedChoice(
                "pick the opponent to exchange hands with".to_string(),
            ))
        }
    };

    match gate_against(state, EffectId::Exchange, actor, seat) {
        // An exchange bounced back onto its own player fizzles
        Gate::Redirect => {
            return Ok(EffectOutcome::Blocked(
                "the exchange bounced off a mirror".to_string(),
            ))
        }
        Gate::Proceed => {}
    }

    let (a, b) = state.two_players_mut(actor, seat);
    std::mem::swap(&mut a.hand, &mut b.hand);
    Ok(EffectOutcome::Applied)
}

/// Every player passes their hand to their right-hand neighbor
fn turnover(state: &mut GameState) -> Result<EffectOutcome> {
    let seats: Vec<usize> = (0..state.n_players())
        .filter(|&s| !state.players[s].eliminated)
        .collect();
    if seats.len() < 2 {
        return Err(DragonError::IllegalEffect(
            "a hand turnover needs at least two players in the game".to_string(),
        ));
    }

    let hands: Vec<Vec<CardId>> = seats
        .iter()
        .map(|&s| std::mem::take(&mut state.players[s].hand))
        .collect();
    let len = seats.len();
    for (pos, hand) in hands.into_iter().enumerate() {
        let receiver = seats[(pos + len - 1) % len];
        state.players[receiver].hand = hand;
    }
    Ok(EffectOutcome::Applied)
}

/// Reactivate a spent Permanent or recover a discarded Equipment, at the
/// cost of sacrificing an already-laid combination
fn resurrection(
    state: &mut GameState,
    actor: usize,
    target: Option<EffectTarget>,
    choice: Option<Choice>,
) -> Result<EffectOutcome> {
    let revived = match target {
        Some(EffectTarget::Card(card)) => card,
        _ => {
            return Err(DragonError::UnresolvedChoice(
                "pick the permanent or equipment card to bring back".to_string(),
            ))
        }
    };
    let sacrifice = match choice {
        Some(Choice::CombinationIndex(idx))
            if idx < state.players[actor].combinations.len() =>
        {
            idx
        }
        Some(Choice::CombinationIndex(idx)) => {
            return Err(DragonError::IllegalEffect(format!(
                "no combination at index {idx} to sacrifice"
            )))
        }
        _ => {
            return Err(DragonError::UnresolvedChoice(
                "a resurrection demands a laid combination as sacrifice".to_string(),
            ))
        }
    };

    // Validate the revival before paying the cost, so a bad target leaves
    // the tableau intact
    let in_inactive = state.players[actor].inactive_permanents.contains(&revived);
    let in_discard = state.action_discard.contains(revived)
        && matches!(
            revived,
            CardId::Major(a) if kind_of(a) == Some(EffectKind::Equipment)
        );
    if !in_inactive && !in_discard {
        return Err(DragonError::IllegalEffect(format!(
            "{revived} is neither a spent permanent nor a discarded equipment"
        )));
    }

    let combo = state.players[actor].combinations.remove(sacrifice);
    for card in combo.cards {
        state.minor_discard.push(card);
    }
    for attachment in combo.attachments {
        state.action_discard.push(attachment);
    }

    if in_inactive {
        let player = &mut state.players[actor];
        let pos = player
            .inactive_permanents
            .iter()
            .position(|c| *c == revived)
            .ok_or_else(|| {
                DragonError::ConservationViolation(format!(
                    "{revived} vanished from the inactive permanents mid-resolution"
                ))
            })?;
        let card = player.inactive_permanents.remove(pos);
        player.active_permanents.push(card);
        if revived == CardId::Major(Arcana::HangedMan) {
            player.active_effects.insert(EffectId::Mirror);
        }
    } else {
        let card = state.action_discard.take(revived)?;
        state.players[actor].adds_to_reserve([card]);
    }
    Ok(EffectOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::core::card::{MinorRank, Suit};

    fn four_player_state() -> GameState {
        let mut settings = GameSettings::default();
        settings.n_bots = 3;
        settings.seed = 77;
        GameState::new(settings).unwrap()
    }

    fn minor(suit: Suit, rank: MinorRank) -> CardId {
        CardId::Minor(suit, rank)
    }

    fn give_combination(state: &mut GameState, seat: usize, cards: Vec<CardId>) {
        // Pull the cards out of wherever they are so conservation holds
        for card in &cards {
            extract_card(state, *card);
        }
        state.players[seat]
            .combinations
            .push(Combination::new(cards).unwrap());
    }

    /// Pull a card out of whichever container currently holds it
    fn extract_card(state: &mut GameState, card: CardId) {
        for player in state.players.iter_mut() {
            if player.remove_from_hand(card).is_ok() || player.remove_from_reserve(card).is_ok() {
                return;
            }
        }
        for pile in [&mut state.minor_draw, &mut state.major_draw] {
            if pile.remaining_cards().contains(&card) {
                let kind = pile.kind();
                let rest: Vec<CardId> = pile
                    .remaining_cards()
                    .iter()
                    .copied()
                    .filter(|c| *c != card)
                    .collect();
                *pile = crate::piles::DrawPile::from_cards(kind, rest);
                return;
            }
        }
    }

    #[test]
    fn test_exchange_swaps_hands() {
        let mut state = four_player_state();
        let hand_0 = state.players[0].hand.clone();
        let hand_1 = state.players[1].hand.clone();

        let outcome = resolve(
            &mut state,
            CardId::Major(Arcana::Moon),
            EffectId::Exchange,
            0,
            Some(EffectTarget::Player(1)),
            None,
        )
        .unwrap();

        assert_eq!(outcome, EffectOutcome::Applied);
        assert_eq!(state.players[0].hand, hand_1);
        assert_eq!(state.players[1].hand, hand_0);
        assert!(state.action_discard.contains(CardId::Major(Arcana::Moon)));
    }

    #[test]
    fn test_mirror_reflects_exchange() {
        let mut state = four_player_state();
        state.players[1]
            .active_permanents
            .push(CardId::Major(Arcana::HangedMan));
        state.players[1].active_effects.insert(EffectId::Mirror);
        let hand_0 = state.players[0].hand.clone();

        let outcome = resolve(
            &mut state,
            CardId::Major(Arcana::Moon),
            EffectId::Exchange,
            0,
            Some(EffectTarget::Player(1)),
            None,
        )
        .unwrap();

        assert!(matches!(outcome, EffectOutcome::Blocked(_)));
        // Hands untouched, mirror spent, the Moon not
        assert_eq!(state.players[0].hand, hand_0);
        assert!(!state.players[1].active_effects.contains(&EffectId::Mirror));
        assert!(state.players[1]
            .inactive_permanents
            .contains(&CardId::Major(Arcana::HangedMan)));
        assert!(!state.action_discard.contains(CardId::Major(Arcana::Moon)));
    }

    #[test]
    fn test_protector_blocks_theft_without_mutation() {
        let mut state = four_player_state();
        give_combination(
            &mut state,
            1,
            vec![
                minor(Suit::Cups, MinorRank::Four),
                minor(Suit::Wands, MinorRank::Four),
            ],
        );
        state.players[1].combinations[0]
            .attachments
            .push(CardId::Major(Arcana::Hierophant));

        let outcome = resolve(
            &mut state,
            CardId::Major(Arcana::Strength),
            EffectId::Steal,
            0,
            Some(EffectTarget::Combination { seat: 1, index: 0 }),
            None,
        )
        .unwrap();

        assert!(matches!(outcome, EffectOutcome::Blocked(_)));
        assert_eq!(state.players[1].combinations.len(), 1);
        assert!(state.players[0].combinations.is_empty());
        // A stopped attack costs nothing
        assert!(state.action_discard.is_empty());
    }

    #[test]
    fn test_steal_moves_combination_with_attachments() {
        let mut state = four_player_state();
        give_combination(
            &mut state,
            1,
            vec![
                minor(Suit::Cups, MinorRank::Nine),
                minor(Suit::Wands, MinorRank::Nine),
            ],
        );
        state.players[1].combinations[0]
            .attachments
            .push(CardId::Major(Arcana::Devil));

        let outcome = resolve(
            &mut state,
            CardId::Major(Arcana::Strength),
            EffectId::Steal,
            0,
            Some(EffectTarget::Combination { seat: 1, index: 0 }),
            None,
        )
        .unwrap();

        assert_eq!(outcome, EffectOutcome::Applied);
        assert!(state.players[1].combinations.is_empty());
        assert_eq!(state.players[0].combinations.len(), 1);
        assert!(state.players[0].combinations[0]
            .attachments
            .contains(&CardId::Major(Arcana::Devil)));
    }

    #[test]
    fn test_reactivation_from_empty_discard_is_an_error() {
        let mut state = four_player_state();
        let result = resolve(
            &mut state,
            CardId::Major(Arcana::Temperance),
            EffectId::Reactivation,
            0,
            None,
            None,
        );
        assert!(matches!(result, Err(DragonError::IllegalEffect(_))));
        // The failed play never reached the discard
        assert!(state.action_discard.is_empty());
    }

    #[test]
    fn test_reactivation_only_replays_action_cards() {
        let mut state = four_player_state();
        // A cancelled permanent sitting in the action discard
        state.action_discard.push(CardId::Major(Arcana::HangedMan));

        let result = resolve(
            &mut state,
            CardId::Major(Arcana::Temperance),
            EffectId::Reactivation,
            0,
            None,
            Some(Choice::Reactivate {
                card: CardId::Major(Arcana::HangedMan),
                inner: None,
            }),
        );

        assert!(matches!(result, Err(DragonError::IllegalEffect(_))));
        assert!(state.players[0].active_permanents.is_empty());
        assert!(!state.players[0].active_effects.contains(&EffectId::Mirror));
        assert!(state
            .action_discard
            .contains(CardId::Major(Arcana::HangedMan)));
    }

    #[test]
    fn test_reactivation_replays_a_discarded_action() {
        let mut state = four_player_state();
        state.action_discard.push(CardId::Major(Arcana::Moon));
        let hand_0 = state.players[0].hand.clone();
        let hand_1 = state.players[1].hand.clone();

        let outcome = resolve(
            &mut state,
            CardId::Major(Arcana::Temperance),
            EffectId::Reactivation,
            0,
            Some(EffectTarget::Player(1)),
            Some(Choice::Reactivate {
                card: CardId::Major(Arcana::Moon),
                inner: None,
            }),
        )
        .unwrap();

        assert_eq!(outcome, EffectOutcome::Applied);
        assert_eq!(state.players[0].hand, hand_1);
        assert_eq!(state.players[1].hand, hand_0);
        // Both the replayed card and Temperance end in the discard
        assert!(state.action_discard.contains(CardId::Major(Arcana::Moon)));
        assert!(state
            .action_discard
            .contains(CardId::Major(Arcana::Temperance)));
    }

    #[test]
    fn test_turnover_rotates_hands_rightward() {
        let mut state = four_player_state();
        let hands: Vec<Vec<CardId>> = state.players.iter().map(|p| p.hand.clone()).collect();

        resolve(
            &mut state,
            CardId::Major(Arcana::Sun),
            EffectId::Turnover,
            0,
            None,
            None,
        )
        .unwrap();

        for seat in 0..4 {
            let receiver = state.right_neighbor(seat);
            assert_eq!(state.players[receiver].hand, hands[seat]);
        }
    }

    #[test]
    fn test_equalizer_pools_and_redeals() {
        let mut state = four_player_state();
        extract_card(&mut state, CardId::Major(Arcana::Justice));
        let total = state.players[1].hand.len() + state.players[2].hand.len();

        resolve(
            &mut state,
            CardId::Major(Arcana::Justice),
            EffectId::Equalizer,
            0,
            None,
            Some(Choice::Seats(1, 2)),
        )
        .unwrap();

        let after = state.players[1].hand.len() + state.players[2].hand.len();
        assert_eq!(total, after);
        assert!(
            (state.players[1].hand.len() as i64 - state.players[2].hand.len() as i64).abs() <= 1
        );
        state.audit_conservation().unwrap();
    }

    #[test]
    fn test_accumulator_accrues_and_discards() {
        let mut state = four_player_state();
        state.players[0]
            .active_permanents
            .push(CardId::Major(Arcana::WheelOfFortune));

        let before = state.minor_draw.remaining();
        resolve(
            &mut state,
            CardId::Major(Arcana::WheelOfFortune),
            EffectId::Accumulator,
            0,
            None,
            None,
        )
        .unwrap();

        assert_eq!(state.minor_draw.remaining(), before - 1);
        assert_eq!(state.minor_discard.len(), 1);
        let discarded = state.minor_discard.cards()[0];
        assert_eq!(state.players[0].wheel_total, discarded.score_value());
    }

    #[test]
    fn test_annihilator_cancels_a_permanent() {
        let mut state = four_player_state();
        state.players[1]
            .active_permanents
            .push(CardId::Major(Arcana::WheelOfFortune));

        let outcome = resolve(
            &mut state,
            CardId::Major(Arcana::Emperor),
            EffectId::Annihilator,
            0,
            Some(EffectTarget::Card(CardId::Major(Arcana::WheelOfFortune))),
            None,
        )
        .unwrap();

        assert_eq!(outcome, EffectOutcome::Applied);
        assert!(state.players[1].active_permanents.is_empty());
        assert!(state
            .action_discard
            .contains(CardId::Major(Arcana::WheelOfFortune)));
    }

    #[test]
    fn test_god_save_the_queen_shields_permanents() {
        let mut state = four_player_state();
        state.players[1]
            .active_permanents
            .push(CardId::Major(Arcana::Star));
        state.players[1]
            .active_permanents
            .push(CardId::Major(Arcana::WheelOfFortune));

        let outcome = resolve(
            &mut state,
            CardId::Major(Arcana::Emperor),
            EffectId::Annihilator,
            0,
            Some(EffectTarget::Card(CardId::Major(Arcana::WheelOfFortune))),
            None,
        )
        .unwrap();

        assert!(matches!(outcome, EffectOutcome::Blocked(_)));
        assert_eq!(state.players[1].active_permanents.len(), 2);
        assert!(!state.action_discard.contains(CardId::Major(Arcana::Emperor)));
    }

    #[test]
    fn test_resurrection_demands_a_sacrifice() {
        let mut state = four_player_state();
        state.players[0]
            .inactive_permanents
            .push(CardId::Major(Arcana::Chariot));

        // No combination to sacrifice
        let result = resolve(
            &mut state,
            CardId::Major(Arcana::Judgement),
            EffectId::Resurrection,
            0,
            Some(EffectTarget::Card(CardId::Major(Arcana::Chariot))),
            Some(Choice::CombinationIndex(0)),
        );
        assert!(result.is_err());
        assert!(state.players[0]
            .inactive_permanents
            .contains(&CardId::Major(Arcana::Chariot)));

        give_combination(
            &mut state,
            0,
            vec![
                minor(Suit::Swords, MinorRank::Two),
                minor(Suit::Pentacles, MinorRank::Two),
            ],
        );
        resolve(
            &mut state,
            CardId::Major(Arcana::Judgement),
            EffectId::Resurrection,
            0,
            Some(EffectTarget::Card(CardId::Major(Arcana::Chariot))),
            Some(Choice::CombinationIndex(0)),
        )
        .unwrap();

        assert!(state.players[0].combinations.is_empty());
        assert!(state.players[0]
            .active_permanents
            .contains(&CardId::Major(Arcana::Chariot)));
        assert_eq!(state.minor_discard.len(), 2);
    }

    #[test]
    fn test_death_is_never_resolvable() {
        let mut state = four_player_state();
        let result = resolve(
            &mut state,
            CardId::Major(Arcana::Death),
            EffectId::OldMaid,
            0,
            None,
            None,
        );
        assert!(matches!(result, Err(DragonError::IllegalEffect(_))));
    }

    #[test]
    fn test_effect_card_mismatch_is_rejected() {
        let mut state = four_player_state();
        let result = resolve(
            &mut state,
            CardId::Major(Arcana::Moon),
            EffectId::Steal,
            0,
            Some(EffectTarget::Combination { seat: 1, index: 0 }),
            None,
        );
        assert!(matches!(result, Err(DragonError::IllegalEffect(_))));
    }

    #[test]
    fn test_foresight_peeks_without_consuming() {
        let mut state = four_player_state();
        let before = state.minor_draw.remaining();

        let outcome = resolve(
            &mut state,
            CardId::Major(Arcana::HighPriestess),
            EffectId::Foresight,
            0,
            None,
            None,
        )
        .unwrap();

        match outcome {
            EffectOutcome::Revealed(cards) => assert_eq!(cards.len(), 2),
            other => panic!("expected a reveal, got {other:?}"),
        }
        assert_eq!(state.minor_draw.remaining(), before);
    }
}
