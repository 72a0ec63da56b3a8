//! HeroLab Online extractor/mapper.
//!
//! Locates the character record inside a raw export and derives the canonical
//! sheet document from it. Pure: the same export always maps to the same
//! document, and nothing here touches the host.

use std::sync::OnceLock;

use thiserror::Error;

use sheetbridge_domain::{
    AbilityScores, CharacterSheet, FeatCategory, HeroPoints, HitPoints, Rarity, RecordData,
    SavingThrows, SheetAttributes, SheetDetails, SubRecord,
};

use super::herolab_types::{HeroLabExport, HeroLabItem, Stat};

// Static regex patterns for source-text parsing (compiled once)
static TECH_DELVER_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
static TRAILING_PAREN_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();

/// Marker substrings checked against a feat's trait text.
///
/// Evaluated top-to-bottom, first match wins, regardless of which other
/// markers are also present.
const FEAT_CATEGORY_MARKERS: [(&str, FeatCategory); 4] = [
    ("ankitsune", FeatCategory::Ancestry),
    ("cl", FeatCategory::Class),
    ("trtskill", FeatCategory::Skill),
    ("trtgeneral", FeatCategory::General),
];

/// Errors raised while extracting the character from an export.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The export parsed but holds no actor record.
    #[error("no actor record found in export")]
    NoActor,
}

/// Map a parsed export to the canonical sheet document.
///
/// Only the first actor in the export is used; multi-actor files are not
/// supported. Unmapped source items are dropped.
pub fn map_character(export: &HeroLabExport) -> Result<CharacterSheet, ValidationError> {
    let actor = export.actors.first().ok_or(ValidationError::NoActor)?;
    let items = &actor.items;
    let gv = &actor.game_values;

    let level = stat_or(gv.act_level_net.as_ref(), 1.0) as i32;
    let hp_max = stat_or(
        first_by_key_prefix(items, "rvHitPoints").and_then(|item| item.rv_max.as_ref()),
        10.0,
    ) as i32;
    let speed = stat_or(
        first_by_key_prefix(items, "mvSpeed").and_then(|item| item.st_net.as_ref()),
        25.0,
    ) as i32;

    let languages: Vec<String> = items
        .iter()
        .filter(|item| item.key_starts_with("ln"))
        .filter_map(|item| item.name.as_deref())
        .map(str::to_lowercase)
        .filter(|name| !name.is_empty())
        .collect();

    let race = gv.act_race.clone().unwrap_or_default();
    let ancestry_name = if race.is_empty() {
        "Kitsune".to_string()
    } else {
        capitalize(&race)
    };

    let mut records = Vec::new();

    records.push(SubRecord::new(
        ancestry_name.clone(),
        RecordData::Ancestry {
            rarity: Rarity::Uncommon,
            traits: vec!["humanoid".to_string(), race.to_lowercase()],
            hp: 8,
            speed,
            size: "medium".to_string(),
        },
    ));

    if let Some(heritage) = items.iter().find(|item| item.is_compset("Heritage")) {
        records.push(SubRecord::new(
            heritage.name.clone().unwrap_or_default(),
            RecordData::Heritage {
                rarity: Rarity::Common,
                traits: vec![race.to_lowercase()],
                ancestry: ancestry_name.clone(),
            },
        ));
    }

    if let Some(background) = gv
        .act_background_text
        .as_deref()
        .filter(|text| !text.is_empty())
    {
        records.push(SubRecord::new(
            background,
            RecordData::Background {
                rarity: Rarity::Common,
                traits: Vec::new(),
            },
        ));
        if tech_delver_regex().is_match(background) {
            for lore_name in ["Drift Lore", "Computers Lore"] {
                records.push(SubRecord::new(
                    lore_name,
                    RecordData::Lore {
                        proficient: 1,
                        modifier: 0,
                    },
                ));
            }
        }
    }

    // Class level comes from the actor's level field; the digits trailing the
    // class text are ignored.
    let class_text = gv
        .act_class_text
        .as_deref()
        .filter(|text| !text.is_empty())
        .unwrap_or("Envoy 1");
    let class_name = capitalize(class_text.split_whitespace().next().unwrap_or(""));
    records.push(SubRecord::new(
        class_name,
        RecordData::Class {
            level,
            key_ability: "cha".to_string(),
            hp_per_level: 8,
            perception: 1,
            saving_throws: SavingThrows {
                fortitude: 1,
                reflex: 2,
                will: 2,
            },
        },
    ));

    for item in items.iter().filter(|item| item.is_compset("Feat")) {
        records.push(SubRecord::new(
            strip_trailing_parenthetical(item.name.as_deref().unwrap_or("")),
            RecordData::Feat {
                level: stat_or(item.req_level_net.as_ref(), 1.0) as i32,
                category: feat_category(item.trait_text.as_deref()),
                rarity: Rarity::Common,
                description: feat_description(item),
            },
        ));
    }

    for item in items.iter().filter(|item| item.is_compset("Action")) {
        records.push(SubRecord::new(
            item.name.clone().unwrap_or_default(),
            RecordData::Action {
                rarity: Rarity::Common,
                description: item.use_in_play.clone().unwrap_or_default(),
            },
        ));
    }

    Ok(CharacterSheet {
        name: actor
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Converted Character".to_string()),
        details: SheetDetails {
            level,
            key_ability: "cha".to_string(),
            languages,
            backstory: "Imported from HLO.".to_string(),
            alliance: "party".to_string(),
        },
        abilities: AbilityScores {
            strength: ability_score(items, "asStr"),
            dexterity: ability_score(items, "asDex"),
            constitution: ability_score(items, "asCon"),
            intelligence: ability_score(items, "asInt"),
            wisdom: ability_score(items, "asWis"),
            charisma: ability_score(items, "asCha"),
        },
        attributes: SheetAttributes {
            hp: HitPoints::full(hp_max),
            speed,
            initiative_statistic: "perception".to_string(),
            hero_points: HeroPoints { value: 1, max: 3 },
        },
        records,
    })
}

/// First item whose key starts with the given prefix, in document order.
///
/// Multiple items may share a prefix; the first one wins. This is the source
/// format's own tie-break and must not be replaced with a keyed lookup.
fn first_by_key_prefix<'a>(items: &'a [HeroLabItem], prefix: &str) -> Option<&'a HeroLabItem> {
    items.iter().find(|item| item.key_starts_with(prefix))
}

/// An ability score read from the first item matching the given code.
fn ability_score(items: &[HeroLabItem], code: &str) -> i32 {
    stat_or(
        first_by_key_prefix(items, code).and_then(|item| item.st_net.as_ref()),
        10.0,
    ) as i32
}

/// Read a stat, falling back when it is absent or not a finite number.
fn stat_or(stat: Option<&Stat>, default: f64) -> f64 {
    stat.and_then(Stat::as_finite).unwrap_or(default)
}

/// Derive a feat's category from its trait text.
fn feat_category(trait_text: Option<&str>) -> FeatCategory {
    let text = trait_text.unwrap_or("").to_lowercase();
    FEAT_CATEGORY_MARKERS
        .iter()
        .find(|(marker, _)| text.contains(marker))
        .map(|&(_, category)| category)
        .unwrap_or(FeatCategory::General)
}

/// First non-empty of the candidate description fields.
fn feat_description(item: &HeroLabItem) -> String {
    [&item.use_in_play, &item.re_special, &item.re_prerequisites]
        .into_iter()
        .find_map(|field| field.as_deref().filter(|text| !text.is_empty()))
        .unwrap_or("")
        .to_string()
}

/// Capitalize the first character, leaving the rest unchanged.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Strip one trailing parenthesized suffix, e.g. `"Iron Will (Heritage)"`.
fn strip_trailing_parenthetical(name: &str) -> String {
    let re = TRAILING_PAREN_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"\s*\(.+\)\s*$").expect("TRAILING_PAREN_REGEX pattern is invalid")
    });
    re.replace(name, "").into_owned()
}

fn tech_delver_regex() -> &'static regex_lite::Regex {
    TECH_DELVER_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"(?i)tech\s+delver").expect("TECH_DELVER_REGEX pattern is invalid")
    })
}
