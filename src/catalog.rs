//! Card catalog: display tokens per language and token resolution
//!
//! The core deals in `CardId` only; this module is the lookup service
//! between canonical ids and the display tokens of the supported languages.
//! The resolution table is built once at first use and read-only afterwards.
//! Within one language the mapping is bijective; `resolve` accepts the tokens
//! of every supported language.

use crate::core::card::{Arcana, CardId, MinorRank, Suit};
use crate::{DragonError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Supported display languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Language {
    English,
    French,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::French];
}

fn english_major(arcana: Arcana) -> &'static str {
    match arcana {
        Arcana::Fool => "fool",
        Arcana::Magician => "magician",
        Arcana::HighPriestess => "high_priestess",
        Arcana::Empress => "empress",
        Arcana::Emperor => "emperor",
        Arcana::Hierophant => "hierophant",
        Arcana::Lovers => "lovers",
        Arcana::Chariot => "chariot",
        Arcana::Justice => "justice",
        Arcana::Hermit => "hermit",
        Arcana::WheelOfFortune => "wheel_of_fortune",
        Arcana::Strength => "strength",
        Arcana::HangedMan => "hanged_man",
        Arcana::Death => "death",
        Arcana::Temperance => "temperance",
        Arcana::Devil => "devil",
        Arcana::Tower => "tower",
        Arcana::Star => "star",
        Arcana::Moon => "moon",
        Arcana::Sun => "sun",
        Arcana::Judgement => "judgement",
        Arcana::World => "world",
    }
}

fn french_major(arcana: Arcana) -> &'static str {
    match arcana {
        Arcana::Fool => "mat",
        Arcana::Magician => "bateleur",
        Arcana::HighPriestess => "papesse",
        Arcana::Empress => "imperatrice",
        Arcana::Emperor => "empereur",
        Arcana::Hierophant => "pape",
        Arcana::Lovers => "amoureux",
        Arcana::Chariot => "chariot",
        Arcana::Justice => "justice",
        Arcana::Hermit => "ermite",
        Arcana::WheelOfFortune => "roue_de_fortune",
        Arcana::Strength => "force",
        Arcana::HangedMan => "pendu",
        Arcana::Death => "mort",
        Arcana::Temperance => "temperance",
        Arcana::Devil => "diable",
        Arcana::Tower => "maison_dieu",
        Arcana::Star => "etoile",
        Arcana::Moon => "lune",
        Arcana::Sun => "soleil",
        Arcana::Judgement => "jugement",
        Arcana::World => "monde",
    }
}

fn english_suit(suit: Suit) -> &'static str {
    match suit {
        Suit::Wands => "wands",
        Suit::Cups => "cups",
        Suit::Pentacles => "pentacles",
        Suit::Swords => "swords",
    }
}

/// French suit token with its joining particle ("de"/"d'")
fn french_suit(suit: Suit) -> &'static str {
    match suit {
        Suit::Wands => "de_batons",
        Suit::Cups => "de_coupes",
        Suit::Pentacles => "de_deniers",
        Suit::Swords => "d_epees",
    }
}

fn french_rank(rank: MinorRank) -> &'static str {
    match rank {
        MinorRank::Ace => "as",
        MinorRank::Two => "deux",
        MinorRank::Three => "trois",
        MinorRank::Four => "quatre",
        MinorRank::Five => "cinq",
        MinorRank::Six => "six",
        MinorRank::Seven => "sept",
        MinorRank::Eight => "huit",
        MinorRank::Nine => "neuf",
        MinorRank::Ten => "dix",
        MinorRank::Page => "valet",
        MinorRank::Knight => "cavalier",
        MinorRank::Queen => "reine",
        MinorRank::King => "roi",
    }
}

/// Display token of a card in the given language
pub fn display(lang: Language, card: CardId) -> String {
    match (lang, card) {
        (Language::English, CardId::Major(a)) => english_major(a).to_string(),
        (Language::French, CardId::Major(a)) => french_major(a).to_string(),
        (Language::English, CardId::Minor(suit, rank)) => {
            format!("{}_of_{}", rank.face_token(), english_suit(suit))
        }
        (Language::French, CardId::Minor(suit, rank)) => {
            format!("{}_{}", french_rank(rank), french_suit(suit))
        }
    }
}

/// Canonical token of a card (the English display token)
pub fn canonical_token(card: CardId) -> String {
    display(Language::English, card)
}

fn resolution_table() -> &'static FxHashMap<String, CardId> {
    static TABLE: OnceLock<FxHashMap<String, CardId>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = FxHashMap::default();
        for card in CardId::all_majors().chain(CardId::all_minors()) {
            for lang in Language::ALL {
                table.insert(display(lang, card), card);
            }
        }
        table
    })
}

/// Resolve a display token of any supported language into a `CardId`
pub fn resolve(token: &str) -> Result<CardId> {
    let normalized = token.trim().to_lowercase().replace(' ', "_");
    resolution_table()
        .get(&normalized)
        .copied()
        .ok_or_else(|| DragonError::UnknownCard(token.to_string()))
}
