//! Special-effect registry
//!
//! Closed set of effect identifiers attached to the major cards, with a
//! free-text description, a persistence kind, and restriction tags. The
//! resolution procedures themselves live in `game::resolver`; this module is
//! pure data so new effects can be added here and in the resolver registry
//! without touching the turn controller.

use crate::core::card::{Arcana, CardId};
use serde::{Deserialize, Serialize};

/// Persistence class of a major card's effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// One-shot; the card goes to the action discard pile after resolution
    Action,
    /// Ongoing; the card stays face up in the owner's permanent area
    Permanent,
    /// Attachable; the card is placed on one of the owner's combinations
    Equipment,
}

/// Identifier of a resolvable special effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectId {
    /// Any minor cards may be used in the combination it is attached to
    AllInclusive,
    /// Stands in for one missing minor card when laying or completing a combination
    Joker,
    /// Peek the next two minor draws and put them back in either order
    Foresight,
    /// Every numbered card of the combination it is attached to is worth 10 points
    Outlier,
    /// Cancels the effect of an Equipment or Permanent card in play
    Annihilator,
    /// Protects a combination against all negative effects
    Protector,
    /// Allows a run to mix two different suits
    Hybrid,
    /// The player may lay two combinations this turn instead of one
    DoublePlay,
    /// Pool two chosen players' hands, shuffle, and redistribute evenly
    Equalizer,
    /// Played in reaction to an attack to cancel it
    Block,
    /// Every player in turn order draws one minor card
    Accelerate,
    /// Draw and discard a minor card, its value accumulating across activations
    Accumulator,
    /// Steal a combination laid before another player, attachments included
    Steal,
    /// The next negative effect against the owner is sent back to the attacker
    Mirror,
    /// Held at round end, voids all of the holder's unprotected combinations
    OldMaid,
    /// Replay a card from the action discard pile, then return it there
    Reactivation,
    /// Doubles the points of the combination it is placed on
    DoubleScore,
    /// All hands are shuffled into the minor pile and dealt back out
    Redistribution,
    /// Pick the minor draw from the minor discard pile instead of the pile
    MemoryRecall,
    /// Shields the owner's active permanents; may be sacrificed to cancel an attack
    GodSaveTheQueen,
    /// Swap the whole hand with a chosen opponent's hand
    Exchange,
    /// Every player passes their hand to their right-hand neighbor
    Turnover,
    /// Reactivate a spent Permanent or return an Equipment to the reserve
    Resurrection,
}

/// Restriction tags constraining when and how an effect may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Restriction {
    /// Cannot be attached to a combination already laid down
    NotAlone,
    /// The equipped combination cannot be completed once laid
    Immovable,
    /// The equipped combination's total value is halved (floor)
    ValueLoss,
    /// May be swapped with the minor card it stands in for
    Replaceable,
    /// Cannot be attached to a combination containing court cards
    AntiRoyalist,
    /// Cannot share a combination with the Fool or the Lovers
    NotCompatibleEmpress,
    /// Cannot target or affect a combination guarded by a Protector
    PopeCountered,
    /// Cannot share a combination with the Fool or the Empress
    NotCompatibleLovers,
    /// Requires at least two combinations ready to lay
    DoublePlayLock,
    /// Cannot be played while the action discard pile is empty
    NoUsedAction,
    /// An already-laid combination must be discarded to play it
    Sacrifice,
    /// A guarded combination cannot be doubled, nor a doubled one guarded
    NotCompatibleDevil,
}

impl EffectId {
    /// Human-readable description of the effect's behavior
    pub fn description(&self) -> &'static str {
        match self {
            EffectId::AllInclusive => {
                "Any minor cards may be used in the combination this card is attached to."
            }
            EffectId::Joker => {
                "Takes the place of one missing minor card to lay or complete a combination."
            }
            EffectId::Foresight => {
                "Look at the next two cards of the minor draw pile and put them back in \
                 either order. Once the pile is exhausted, peek up to two cards spread \
                 across one or two opponents' hands instead."
            }
            EffectId::Outlier => {
                "Transforms the value of the numbered cards 1 to 10: every card of the \
                 combination is worth 10 points."
            }
            EffectId::Annihilator => {
                "Cancels the effect of a major card in play, Equipment or Permanent. A \
                 cancelled Equipment frees its minor cards for immediate recombination \
                 without the usual major-card draw; an invalid remainder returns to the \
                 owner's hand."
            }
            EffectId::Protector => {
                "Protects a combination against all negative effects: cancellation, \
                 dismantling and theft."
            }
            EffectId::Hybrid => "Allows mixing two different suits inside one run.",
            EffectId::DoublePlay => {
                "The player may lay two combinations during the turn instead of one; \
                 each grants the usual major-card draw."
            }
            EffectId::Equalizer => {
                "Choose two players (possibly yourself), pool and shuffle their hands, \
                 then deal them back evenly. An odd leftover goes to whoever had fewer \
                 cards before."
            }
            EffectId::Block => "Played in reaction to an attack to cancel it.",
            EffectId::Accelerate => {
                "The player and then every player in turn order takes one card from the \
                 minor draw pile; once it is exhausted, each draws from their right-hand \
                 neighbor's hand."
            }
            EffectId::Accumulator => {
                "Draw one minor card whose value adds up with previous activations; the \
                 drawn card goes to the minor discard. Once the pile is exhausted, draw \
                 from a chosen opponent's hand."
            }
            EffectId::Steal => {
                "Steal a combination laid before another player; attached major cards \
                 stay attached and their effects persist."
            }
            EffectId::Mirror => {
                "Acts as a mirror to an opponent's attack: the negative effect suffered \
                 by the player is sent back to the attacker."
            }
            EffectId::OldMaid => {
                "Shuffled into the minor draw pile. A player ending the round with it in \
                 hand voids the value of all their unprotected combinations; bonuses \
                 from Permanent cards are unaffected."
            }
            EffectId::Reactivation => {
                "Choose a card from the action discard pile and replay its effect \
                 immediately; the reactivated card then returns to that discard."
            }
            EffectId::DoubleScore => "Doubles the points of the combination it is placed on.",
            EffectId::Redistribution => {
                "All players shuffle their hands into the minor draw pile, then each \
                 draws back as many cards as they put in, the player of this card first."
            }
            EffectId::MemoryRecall => {
                "Choose a card from the minor discard pile instead of drawing from the \
                 minor draw pile."
            }
            EffectId::GodSaveTheQueen => {
                "Shields the player's active Permanent cards from the moment it is laid; \
                 an attacked Permanent may be sacrificed to cancel the attack."
            }
            EffectId::Exchange => {
                "The player exchanges the cards of their hand with those of a chosen \
                 opponent."
            }
            EffectId::Turnover => {
                "Every player passes the cards of their hand to their right-hand \
                 neighbor."
            }
            EffectId::Resurrection => {
                "Reactivates a Permanent or Equipment card: a Permanent is turned face \
                 up as if freshly laid, an Equipment goes back to the owner's reserve."
            }
        }
    }

    /// Restriction tags binding this effect
    pub fn restrictions(&self) -> &'static [Restriction] {
        match self {
            EffectId::AllInclusive => &[Restriction::ValueLoss, Restriction::NotCompatibleEmpress],
            EffectId::Joker => &[Restriction::Replaceable],
            EffectId::Outlier => &[
                Restriction::AntiRoyalist,
                Restriction::NotAlone,
                Restriction::NotCompatibleEmpress,
            ],
            EffectId::Annihilator => &[Restriction::PopeCountered],
            EffectId::Protector => &[Restriction::NotCompatibleDevil],
            EffectId::Hybrid => &[Restriction::NotCompatibleLovers],
            EffectId::DoublePlay => &[Restriction::DoublePlayLock],
            EffectId::Steal => &[Restriction::PopeCountered],
            EffectId::Reactivation => &[Restriction::NoUsedAction],
            EffectId::DoubleScore => &[Restriction::Immovable, Restriction::NotCompatibleDevil],
            EffectId::Resurrection => &[Restriction::Sacrifice],
            _ => &[],
        }
    }

    /// Whether this effect counts as an attack for Protector, Mirror and
    /// GodSaveTheQueen purposes
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            EffectId::Annihilator | EffectId::Steal | EffectId::Exchange | EffectId::Equalizer
        )
    }

    /// Whether the effect may target or affect a Protector-guarded combination
    pub fn exempt_from_protection(&self) -> bool {
        !self
            .restrictions()
            .contains(&Restriction::PopeCountered)
            && !self.is_negative()
    }
}

/// Persistence kind of a major card, `None` for Death which is never played
pub fn kind_of(arcana: Arcana) -> Option<EffectKind> {
    match arcana {
        Arcana::Fool
        | Arcana::Magician
        | Arcana::Empress
        | Arcana::Hierophant
        | Arcana::Lovers
        | Arcana::Devil
        | Arcana::World => Some(EffectKind::Equipment),
        Arcana::Chariot | Arcana::WheelOfFortune | Arcana::HangedMan | Arcana::Star => {
            Some(EffectKind::Permanent)
        }
        Arcana::HighPriestess
        | Arcana::Emperor
        | Arcana::Justice
        | Arcana::Hermit
        | Arcana::Strength
        | Arcana::Temperance
        | Arcana::Tower
        | Arcana::Moon
        | Arcana::Sun
        | Arcana::Judgement => Some(EffectKind::Action),
        Arcana::Death => None,
    }
}

/// Ordered effects carried by a card (empty for plain minor cards)
pub fn effects_of(card: CardId) -> &'static [EffectId] {
    let arcana = match card {
        CardId::Minor(_, _) => return &[],
        CardId::Major(a) => a,
    };

    match arcana {
        Arcana::Fool => &[EffectId::AllInclusive],
        Arcana::Magician => &[EffectId::Joker],
        Arcana::HighPriestess => &[EffectId::Foresight],
        Arcana::Empress => &[EffectId::Outlier],
        Arcana::Emperor => &[EffectId::Annihilator],
        Arcana::Hierophant => &[EffectId::Protector],
        Arcana::Lovers => &[EffectId::Hybrid],
        Arcana::Chariot => &[EffectId::DoublePlay],
        Arcana::Justice => &[EffectId::Equalizer, EffectId::Block],
        Arcana::Hermit => &[EffectId::Accelerate],
        Arcana::WheelOfFortune => &[EffectId::Accumulator],
        Arcana::Strength => &[EffectId::Steal],
        Arcana::HangedMan => &[EffectId::Mirror],
        Arcana::Death => &[EffectId::OldMaid],
        Arcana::Temperance => &[EffectId::Reactivation],
        Arcana::Devil => &[EffectId::DoubleScore],
        Arcana::Tower => &[EffectId::Redistribution],
        Arcana::Star => &[EffectId::MemoryRecall, EffectId::GodSaveTheQueen],
        Arcana::Moon => &[EffectId::Exchange],
        Arcana::Sun => &[EffectId::Turnover],
        Arcana::Judgement => &[EffectId::Resurrection],
        Arcana::World => &[EffectId::DoubleScore],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::{MinorRank, Suit};

    #[test]
    fn test_minors_have_no_effects() {
        for card in CardId::all_minors() {
            assert!(card.effects().is_empty(), "{card:?} should carry no effect");
        }
    }

    #[test]
    fn test_every_major_is_classified() {
        for arcana in Arcana::ALL {
            let card = CardId::Major(arcana);
            assert!(!card.effects().is_empty(), "{arcana:?} has no effect");
            if arcana == Arcana::Death {
                assert_eq!(kind_of(arcana), None);
            } else {
                assert!(kind_of(arcana).is_some(), "{arcana:?} has no kind");
            }
        }
    }

    #[test]
    fn test_double_score_on_devil_and_world() {
        assert_eq!(effects_of(CardId::Major(Arcana::Devil)), &[EffectId::DoubleScore]);
        assert_eq!(effects_of(CardId::Major(Arcana::World)), &[EffectId::DoubleScore]);
    }

    #[test]
    fn test_protection_exemptions() {
        // Theft and cancellation are countered by the Protector
        assert!(!EffectId::Steal.exempt_from_protection());
        assert!(!EffectId::Annihilator.exempt_from_protection());
        // Attaching a score modifier to your own combination is not an attack
        assert!(EffectId::DoubleScore.exempt_from_protection());
    }

    #[test]
    fn test_effects_lookup_is_by_identity() {
        let a = CardId::Minor(Suit::Cups, MinorRank::Five);
        let b = CardId::Minor(Suit::Cups, MinorRank::Five);
        assert_eq!(a, b);
        assert_eq!(effects_of(a), effects_of(b));
    }
}
