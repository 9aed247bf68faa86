//! Card identity and derived values
//!
//! A card is identified by its `CardId` alone. Family, face value, score
//! value and attached effects are all derived from the id by pure functions;
//! nothing is stored per instance. Equality is equality of ids, and each id
//! denotes a unique physical card in the pack.

use crate::core::effects::{self, EffectId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four minor suits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Wands,
    Cups,
    Pentacles,
    Swords,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Wands, Suit::Cups, Suit::Pentacles, Suit::Swords];
}

/// Rank of a minor card, ace low
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MinorRank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Page,
    Knight,
    Queen,
    King,
}

impl MinorRank {
    pub const ALL: [MinorRank; 14] = [
        MinorRank::Ace,
        MinorRank::Two,
        MinorRank::Three,
        MinorRank::Four,
        MinorRank::Five,
        MinorRank::Six,
        MinorRank::Seven,
        MinorRank::Eight,
        MinorRank::Nine,
        MinorRank::Ten,
        MinorRank::Page,
        MinorRank::Knight,
        MinorRank::Queen,
        MinorRank::King,
    ];

    /// Zero-based position within the suit (ace = 0, king = 13)
    pub fn index(&self) -> u32 {
        *self as u32
    }

    /// The rank directly above this one, if any (used for run checks)
    pub fn successor(&self) -> Option<MinorRank> {
        let idx = *self as usize + 1;
        MinorRank::ALL.get(idx).copied()
    }

    /// Court cards (page, knight, queen, king)
    pub fn is_court(&self) -> bool {
        matches!(
            self,
            MinorRank::Page | MinorRank::Knight | MinorRank::Queen | MinorRank::King
        )
    }

    /// Face token as read on the card ("ace", "three", "king", ...)
    pub fn face_token(&self) -> &'static str {
        match self {
            MinorRank::Ace => "ace",
            MinorRank::Two => "two",
            MinorRank::Three => "three",
            MinorRank::Four => "four",
            MinorRank::Five => "five",
            MinorRank::Six => "six",
            MinorRank::Seven => "seven",
            MinorRank::Eight => "eight",
            MinorRank::Nine => "nine",
            MinorRank::Ten => "ten",
            MinorRank::Page => "page",
            MinorRank::Knight => "knight",
            MinorRank::Queen => "queen",
            MinorRank::King => "king",
        }
    }
}

/// The 22 major cards, in pack order (Fool = 0, World = 21)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Arcana {
    Fool,
    Magician,
    HighPriestess,
    Empress,
    Emperor,
    Hierophant,
    Lovers,
    Chariot,
    Justice,
    Hermit,
    WheelOfFortune,
    Strength,
    HangedMan,
    Death,
    Temperance,
    Devil,
    Tower,
    Star,
    Moon,
    Sun,
    Judgement,
    World,
}

impl Arcana {
    pub const ALL: [Arcana; 22] = [
        Arcana::Fool,
        Arcana::Magician,
        Arcana::HighPriestess,
        Arcana::Empress,
        Arcana::Emperor,
        Arcana::Hierophant,
        Arcana::Lovers,
        Arcana::Chariot,
        Arcana::Justice,
        Arcana::Hermit,
        Arcana::WheelOfFortune,
        Arcana::Strength,
        Arcana::HangedMan,
        Arcana::Death,
        Arcana::Temperance,
        Arcana::Devil,
        Arcana::Tower,
        Arcana::Star,
        Arcana::Moon,
        Arcana::Sun,
        Arcana::Judgement,
        Arcana::World,
    ];

    /// Position within the major family (Fool = 0, World = 21)
    pub fn index(&self) -> u32 {
        *self as u32
    }
}

/// Family tag derived from a card id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    Major,
    Minor(Suit),
}

/// Canonical card identifier
///
/// Each `CardId` denotes a unique physical card: 22 majors plus 4 x 14
/// minors, 78 in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardId {
    Major(Arcana),
    Minor(Suit, MinorRank),
}

impl CardId {
    pub fn family(&self) -> Family {
        match self {
            CardId::Major(_) => Family::Major,
            CardId::Minor(suit, _) => Family::Minor(*suit),
        }
    }

    pub fn is_major(&self) -> bool {
        matches!(self, CardId::Major(_))
    }

    pub fn is_minor(&self) -> bool {
        matches!(self, CardId::Minor(_, _))
    }

    /// The value one can read on the card: "ace".."king" for minors,
    /// a Roman numeral "0".."XXI" for majors. Language-neutral.
    pub fn face_value(&self) -> String {
        match self {
            CardId::Minor(_, rank) => rank.face_token().to_string(),
            CardId::Major(arcana) => to_roman(arcana.index()),
        }
    }

    /// Raw score value, before any effect modifies it
    ///
    /// Rank index within the family, +1 for minor cards (aces score 1).
    /// Death scores 0 unconditionally.
    pub fn score_value(&self) -> u32 {
        match self {
            CardId::Major(Arcana::Death) => 0,
            CardId::Major(arcana) => arcana.index(),
            CardId::Minor(_, rank) => rank.index() + 1,
        }
    }

    /// Special effects carried by this card (empty for plain minors)
    pub fn effects(&self) -> &'static [EffectId] {
        effects::effects_of(*self)
    }

    /// All 56 minor cards, suit by suit, ace to king
    pub fn all_minors() -> impl Iterator<Item = CardId> {
        Suit::ALL.iter().flat_map(|&suit| {
            MinorRank::ALL
                .iter()
                .map(move |&rank| CardId::Minor(suit, rank))
        })
    }

    /// All 22 major cards in pack order
    pub fn all_majors() -> impl Iterator<Item = CardId> {
        Arcana::ALL.iter().map(|&a| CardId::Major(a))
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::catalog::canonical_token(*self))
    }
}

/// Convert a non-negative integer to Roman numerals ("0" for zero)
pub fn to_roman(value: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }

    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut left = value;
    let mut out = String::new();
    for (base, digits) in TABLE {
        while left >= base {
            out.push_str(digits);
            left -= base;
        }
    }
    out
}
