//! Tracks (one weapon type × element outcome table) and the result rows recorded against them.
//! Positions are per-track, 1-based and dense; the store keeps them that way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome-table family. Each mode keeps its own tracks and its own outcome shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtianMode {
    NormalRestore,
    GogmaSkill,
    GogmaRestore,
}

impl ArtianMode {
    pub const ALL: [ArtianMode; 3] = [Self::NormalRestore, Self::GogmaSkill, Self::GogmaRestore];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NormalRestore => "normal_restore",
            Self::GogmaSkill => "gogma_skill",
            Self::GogmaRestore => "gogma_restore",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NormalRestore => "Normal Restore",
            Self::GogmaSkill => "Gogma Skill Reroll",
            Self::GogmaRestore => "Gogma Restore",
        }
    }

    /// Outcome shape recorded in this mode.
    pub fn outcome_kind(&self) -> OutcomeKind {
        match self {
            Self::GogmaSkill => OutcomeKind::SkillPair,
            Self::NormalRestore | Self::GogmaRestore => OutcomeKind::Bonus,
        }
    }
}

impl fmt::Display for ArtianMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtianMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| format!("unknown mode '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    GreatSword,
    LongSword,
    SwordAndShield,
    DualBlades,
    Hammer,
    HuntingHorn,
    Lance,
    Gunlance,
    SwitchAxe,
    ChargeBlade,
    InsectGlaive,
    LightBowgun,
    HeavyBowgun,
    Bow,
}

impl WeaponType {
    pub const ALL: [WeaponType; 14] = [
        Self::GreatSword,
        Self::LongSword,
        Self::SwordAndShield,
        Self::DualBlades,
        Self::Hammer,
        Self::HuntingHorn,
        Self::Lance,
        Self::Gunlance,
        Self::SwitchAxe,
        Self::ChargeBlade,
        Self::InsectGlaive,
        Self::LightBowgun,
        Self::HeavyBowgun,
        Self::Bow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GreatSword => "great_sword",
            Self::LongSword => "long_sword",
            Self::SwordAndShield => "sword_and_shield",
            Self::DualBlades => "dual_blades",
            Self::Hammer => "hammer",
            Self::HuntingHorn => "hunting_horn",
            Self::Lance => "lance",
            Self::Gunlance => "gunlance",
            Self::SwitchAxe => "switch_axe",
            Self::ChargeBlade => "charge_blade",
            Self::InsectGlaive => "insect_glaive",
            Self::LightBowgun => "light_bowgun",
            Self::HeavyBowgun => "heavy_bowgun",
            Self::Bow => "bow",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::GreatSword => "Great Sword",
            Self::LongSword => "Long Sword",
            Self::SwordAndShield => "Sword and Shield",
            Self::DualBlades => "Dual Blades",
            Self::Hammer => "Hammer",
            Self::HuntingHorn => "Hunting Horn",
            Self::Lance => "Lance",
            Self::Gunlance => "Gunlance",
            Self::SwitchAxe => "Switch Axe",
            Self::ChargeBlade => "Charge Blade",
            Self::InsectGlaive => "Insect Glaive",
            Self::LightBowgun => "Light Bowgun",
            Self::HeavyBowgun => "Heavy Bowgun",
            Self::Bow => "Bow",
        }
    }
}

impl FromStr for WeaponType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|weapon| weapon.as_str() == s.trim())
            .ok_or_else(|| format!("unknown weapon type '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Water,
    Thunder,
    Ice,
    Dragon,
    Paralysis,
    Raw,
}

impl Element {
    pub const ALL: [Element; 7] = [
        Self::Fire,
        Self::Water,
        Self::Thunder,
        Self::Ice,
        Self::Dragon,
        Self::Paralysis,
        Self::Raw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Thunder => "thunder",
            Self::Ice => "ice",
            Self::Dragon => "dragon",
            Self::Paralysis => "paralysis",
            Self::Raw => "raw",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Water => "Water",
            Self::Thunder => "Thunder",
            Self::Ice => "Ice",
            Self::Dragon => "Dragon",
            Self::Paralysis => "Paralysis",
            Self::Raw => "Raw",
        }
    }
}

impl FromStr for Element {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|element| element.as_str() == s.trim())
            .ok_or_else(|| format!("unknown element '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub mode: ArtianMode,
    pub weapon: WeaponType,
    pub element: Element,
    pub created_at: String,
}

impl Track {
    /// Display label, e.g. "Fire Dual Blades".
    pub fn label(&self) -> String {
        format!("{} {}", self.element.label(), self.weapon.label())
    }
}

/// Sentinel for "no group skill" / "no bonus value" in recorded outcomes.
pub const EMPTY_SLOT: &str = "-";
/// Bonus type recorded by a miss in the restore modes.
pub const MISS_BONUS_TYPE: &str = "Miss";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    SkillPair,
    Bonus,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SkillPair => "skill_pair",
            Self::Bonus => "bonus",
        }
    }
}

/// What one action produced. Display payload only; the planner never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    SkillPair {
        series_skill: String,
        group_skill: String,
    },
    Bonus {
        bonus_type: String,
        bonus_value: String,
    },
}

impl Outcome {
    /// Builds the outcome shape `mode` records from two free-form fields.
    pub fn for_mode(mode: ArtianMode, first: impl Into<String>, second: impl Into<String>) -> Self {
        match mode.outcome_kind() {
            OutcomeKind::SkillPair => Self::SkillPair {
                series_skill: first.into(),
                group_skill: second.into(),
            },
            OutcomeKind::Bonus => Self::Bonus {
                bonus_type: first.into(),
                bonus_value: second.into(),
            },
        }
    }

    pub fn miss(mode: ArtianMode) -> Self {
        match mode.outcome_kind() {
            OutcomeKind::SkillPair => Self::for_mode(mode, EMPTY_SLOT, EMPTY_SLOT),
            OutcomeKind::Bonus => Self::for_mode(mode, MISS_BONUS_TYPE, EMPTY_SLOT),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::SkillPair { .. } => OutcomeKind::SkillPair,
            Self::Bonus { .. } => OutcomeKind::Bonus,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::SkillPair {
                series_skill,
                group_skill,
            } => {
                if group_skill == EMPTY_SLOT {
                    series_skill.clone()
                } else {
                    format!("{series_skill} / {group_skill}")
                }
            }
            Self::Bonus {
                bonus_type,
                bonus_value,
            } => format!("{bonus_type} {bonus_value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub id: String,
    pub track_id: String,
    pub position: u32,
    pub outcome: Outcome,
    #[serde(default)]
    pub is_target: bool,
    pub created_at: String,
}
