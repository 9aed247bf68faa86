//! Combinations laid in a player's tableau
//!
//! A combination is an ordered set of 2+ minor cards forming either a same-rank
//! set (pair, three or four of a kind) or a same-suit run of 3+ consecutive
//! ranks. Major Equipment cards may be attached to it and bend the legality
//! rules (Joker fills a gap, Hybrid allows two suits in a run, AllInclusive
//! lifts shape matching entirely).

use crate::core::card::{CardId, MinorRank, Suit};
use crate::core::effects::{EffectId, Restriction};
use crate::{DragonError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Legality relaxations granted by attached Equipment cards
#[derive(Debug, Clone, Copy, Default)]
pub struct Allowances {
    /// Number of Joker cards standing in for missing minors
    pub jokers: u8,
    /// A run may mix exactly two suits (Lovers attached)
    pub hybrid: bool,
    /// Any minor cards form a legal combination (Fool attached)
    pub any_cards: bool,
}

/// Shape of a validated combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombinationShape {
    /// 2-4 cards of the same rank
    Set { rank: MinorRank, count: usize },
    /// 3+ consecutive ranks in one suit (two with Hybrid)
    Run { low: MinorRank, len: usize },
    /// Shape matching lifted by AllInclusive
    Free,
}

/// Classify a candidate combination, applying the given allowances
///
/// Cards must all be minors. Returns the recognized shape, or
/// `IllegalAction` when the cards form neither a set nor a run.
pub fn classify(cards: &[CardId], allow: Allowances) -> Result<CombinationShape> {
    let effective = cards.len() + allow.jokers as usize;
    if effective < 2 {
        return Err(DragonError::IllegalAction(
            "a combination needs at least two cards".to_string(),
        ));
    }

    let mut minors: Vec<(Suit, MinorRank)> = Vec::with_capacity(cards.len());
    for card in cards {
        match card {
            CardId::Minor(suit, rank) => minors.push((*suit, *rank)),
            CardId::Major(_) => {
                return Err(DragonError::IllegalAction(
                    "major cards cannot be part of a combination body".to_string(),
                ))
            }
        }
    }

    if minors.is_empty() {
        return Err(DragonError::IllegalAction(
            "a combination needs at least one real card".to_string(),
        ));
    }

    if allow.any_cards {
        return Ok(CombinationShape::Free);
    }

    // Same-rank set, up to four of a kind; jokers extend the count
    let first_rank = minors[0].1;
    if minors.iter().all(|(_, r)| *r == first_rank) && (2..=4).contains(&effective) {
        return Ok(CombinationShape::Set {
            rank: first_rank,
            count: effective,
        });
    }

    // Same-suit run (two suits with Hybrid), 3+ consecutive ranks
    if effective >= 3 {
        let mut suits: SmallVec<[Suit; 2]> = SmallVec::new();
        for (suit, _) in &minors {
            if !suits.contains(suit) {
                suits.push(*suit);
            }
        }
        let suit_limit = if allow.hybrid { 2 } else { 1 };

        if suits.len() <= suit_limit {
            let mut ranks: Vec<MinorRank> = minors.iter().map(|(_, r)| *r).collect();
            ranks.sort();
            ranks.dedup();

            if ranks.len() == minors.len() {
                let low = ranks[0];
                let span = ranks.last().map(|hi| hi.index() - low.index() + 1).unwrap_or(0);
                let gaps = span as usize - ranks.len();
                if gaps <= allow.jokers as usize {
                    return Ok(CombinationShape::Run {
                        low,
                        len: effective,
                    });
                }
            }
        }
    }

    Err(DragonError::IllegalAction(
        "cards form neither a same-rank set nor a consecutive run".to_string(),
    ))
}

/// Find any legal combination among the given hand cards
///
/// Scans same-rank groups first, then same-suit runs. Used by bot
/// controllers and by the end-of-game check for remaining legal plays;
/// returns `None` when the hand holds no legal combination.
pub fn find_any(hand: &[CardId]) -> Option<Vec<CardId>> {
    // Same-rank sets
    for rank in MinorRank::ALL {
        let group: Vec<CardId> = hand
            .iter()
            .copied()
            .filter(|c| matches!(c, CardId::Minor(_, r) if *r == rank))
            .collect();
        if group.len() >= 2 {
            return Some(group.into_iter().take(4).collect());
        }
    }

    // Same-suit runs of 3+
    for suit in Suit::ALL {
        let mut ranks: Vec<MinorRank> = hand
            .iter()
            .filter_map(|c| match c {
                CardId::Minor(s, r) if *s == suit => Some(*r),
                _ => None,
            })
            .collect();
        ranks.sort();
        ranks.dedup();

        let mut streak: Vec<MinorRank> = Vec::new();
        for &rank in &ranks {
            match streak.last() {
                Some(prev) if prev.successor() == Some(rank) => streak.push(rank),
                _ => {
                    if streak.len() >= 3 {
                        break;
                    }
                    streak = vec![rank];
                }
            }
        }
        if streak.len() >= 3 {
            return Some(
                streak
                    .into_iter()
                    .map(|r| CardId::Minor(suit, r))
                    .collect(),
            );
        }
    }

    None
}

/// A combination laid in a tableau, with its attached major cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combination {
    pub cards: Vec<CardId>,
    pub shape: CombinationShape,
    pub attachments: SmallVec<[CardId; 2]>,
}

impl Combination {
    /// Validate and build a new combination from hand cards
    pub fn new(cards: Vec<CardId>) -> Result<Self> {
        let shape = classify(&cards, Allowances::default())?;
        Ok(Combination {
            cards,
            shape,
            attachments: SmallVec::new(),
        })
    }

    /// Build with explicit allowances (jokers or hybrid granted at play time)
    pub fn with_allowances(cards: Vec<CardId>, allow: Allowances) -> Result<Self> {
        let shape = classify(&cards, allow)?;
        Ok(Combination {
            cards,
            shape,
            attachments: SmallVec::new(),
        })
    }

    /// Sum of the raw score values of the minor cards
    pub fn raw_value(&self) -> u32 {
        self.cards.iter().map(|c| c.score_value()).sum()
    }

    /// Whether the given effect is granted by an attached major card
    pub fn has_attached(&self, effect: EffectId) -> bool {
        self.attachments
            .iter()
            .any(|card| card.effects().contains(&effect))
    }

    /// Guarded by a Protector attachment
    pub fn is_protected(&self) -> bool {
        self.has_attached(EffectId::Protector)
    }

    /// Whether the combination can still be extended (Immovable forbids it)
    pub fn can_extend(&self) -> bool {
        !self.attachments.iter().any(|card| {
            card.effects()
                .iter()
                .any(|e| e.restrictions().contains(&Restriction::Immovable))
        })
    }

    /// Current allowances granted by the attachments
    pub fn allowances(&self) -> Allowances {
        Allowances {
            jokers: self
                .attachments
                .iter()
                .filter(|c| c.effects().contains(&EffectId::Joker))
                .count() as u8,
            hybrid: self.has_attached(EffectId::Hybrid),
            any_cards: self.has_attached(EffectId::AllInclusive),
        }
    }

    /// Attach a major Equipment card, checking compatibility restrictions
    pub fn attach(&mut self, card: CardId) -> Result<()> {
        if !card.is_major() {
            return Err(DragonError::IllegalAction(format!(
                "{card} is not a major card and cannot be attached"
            )));
        }

        for effect in card.effects() {
            for restriction in effect.restrictions() {
                let conflict = match restriction {
                    Restriction::AntiRoyalist => self.cards.iter().any(|c| match c {
                        CardId::Minor(_, rank) => rank.is_court(),
                        CardId::Major(_) => false,
                    }),
                    Restriction::NotCompatibleEmpress => {
                        self.has_attached(EffectId::AllInclusive)
                            || self.has_attached(EffectId::Hybrid)
                    }
                    Restriction::NotCompatibleLovers => {
                        self.has_attached(EffectId::AllInclusive)
                            || self.has_attached(EffectId::Outlier)
                    }
                    Restriction::NotCompatibleDevil => {
                        self.has_attached(EffectId::Protector)
                            || self.has_attached(EffectId::DoubleScore)
                    }
                    Restriction::NotAlone => false, // checked at play time by the controller
                    _ => false,
                };
                if conflict {
                    return Err(DragonError::IllegalAction(format!(
                        "{card} cannot be attached to this combination ({restriction:?})"
                    )));
                }
            }
        }

        self.attachments.push(card);
        Ok(())
    }

    /// Extend the combination with further hand cards, revalidating the shape
    pub fn extend(&mut self, extra: &[CardId]) -> Result<()> {
        if !self.can_extend() {
            return Err(DragonError::IllegalAction(
                "this combination is equipped with an Immovable card".to_string(),
            ));
        }
        let mut candidate = self.cards.clone();
        candidate.extend_from_slice(extra);
        let shape = classify(&candidate, self.allowances())?;
        self.cards = candidate;
        self.shape = shape;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Arcana;

    fn minor(suit: Suit, rank: MinorRank) -> CardId {
        CardId::Minor(suit, rank)
    }

    #[test]
    fn test_pair_and_n_of_a_kind() {
        let pair = vec![
            minor(Suit::Cups, MinorRank::Seven),
            minor(Suit::Wands, MinorRank::Seven),
        ];
        assert!(matches!(
            classify(&pair, Allowances::default()),
            Ok(CombinationShape::Set { count: 2, .. })
        ));

        let four = vec![
            minor(Suit::Cups, MinorRank::Queen),
            minor(Suit::Wands, MinorRank::Queen),
            minor(Suit::Swords, MinorRank::Queen),
            minor(Suit::Pentacles, MinorRank::Queen),
        ];
        assert!(matches!(
            classify(&four, Allowances::default()),
            Ok(CombinationShape::Set { count: 4, .. })
        ));
    }

    #[test]
    fn test_run_needs_three_consecutive_same_suit() {
        let run = vec![
            minor(Suit::Swords, MinorRank::Four),
            minor(Suit::Swords, MinorRank::Five),
            minor(Suit::Swords, MinorRank::Six),
        ];
        assert!(matches!(
            classify(&run, Allowances::default()),
            Ok(CombinationShape::Run { len: 3, .. })
        ));

        // Two cards is not a run
        let short = vec![
            minor(Suit::Swords, MinorRank::Four),
            minor(Suit::Swords, MinorRank::Five),
        ];
        assert!(classify(&short, Allowances::default()).is_err());

        // Mixed suits rejected without Hybrid
        let mixed = vec![
            minor(Suit::Swords, MinorRank::Four),
            minor(Suit::Cups, MinorRank::Five),
            minor(Suit::Swords, MinorRank::Six),
        ];
        assert!(classify(&mixed, Allowances::default()).is_err());
        assert!(classify(
            &mixed,
            Allowances {
                hybrid: true,
                ..Default::default()
            }
        )
        .is_ok());
    }

    #[test]
    fn test_joker_fills_a_gap() {
        let gapped = vec![
            minor(Suit::Cups, MinorRank::Two),
            minor(Suit::Cups, MinorRank::Four),
        ];
        assert!(classify(&gapped, Allowances::default()).is_err());
        let shape = classify(
            &gapped,
            Allowances {
                jokers: 1,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            shape,
            CombinationShape::Run {
                low: MinorRank::Two,
                len: 3
            }
        );
    }

    #[test]
    fn test_majors_rejected_in_body() {
        let cards = vec![
            minor(Suit::Cups, MinorRank::Two),
            CardId::Major(Arcana::Fool),
        ];
        assert!(classify(&cards, Allowances::default()).is_err());
    }

    #[test]
    fn test_attach_compatibility() {
        let mut combo = Combination::new(vec![
            minor(Suit::Cups, MinorRank::Three),
            minor(Suit::Wands, MinorRank::Three),
        ])
        .unwrap();

        combo.attach(CardId::Major(Arcana::Lovers)).unwrap();
        // Empress conflicts with an attached Lovers
        assert!(combo.attach(CardId::Major(Arcana::Empress)).is_err());
    }

    #[test]
    fn test_anti_royalist() {
        let mut combo = Combination::new(vec![
            minor(Suit::Cups, MinorRank::King),
            minor(Suit::Wands, MinorRank::King),
        ])
        .unwrap();
        assert!(combo.attach(CardId::Major(Arcana::Empress)).is_err());
    }

    #[test]
    fn test_immovable_blocks_extension() {
        let mut combo = Combination::new(vec![
            minor(Suit::Cups, MinorRank::Nine),
            minor(Suit::Wands, MinorRank::Nine),
        ])
        .unwrap();
        combo.attach(CardId::Major(Arcana::Devil)).unwrap();
        assert!(!combo.can_extend());
        assert!(combo
            .extend(&[minor(Suit::Swords, MinorRank::Nine)])
            .is_err());
    }

    #[test]
    fn test_protection_flag() {
        let mut combo = Combination::new(vec![
            minor(Suit::Cups, MinorRank::Six),
            minor(Suit::Wands, MinorRank::Six),
        ])
        .unwrap();
        assert!(!combo.is_protected());
        combo.attach(CardId::Major(Arcana::Hierophant)).unwrap();
        assert!(combo.is_protected());
    }
}
