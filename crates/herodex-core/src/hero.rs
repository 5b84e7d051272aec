//! Hero records and the payloads that create or modify them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Unique identifier for a hero.
pub type HeroId = u64;

/// A hero as stored in the snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    /// Unique id, assigned on creation.
    pub id: HeroId,
    /// Internal name (e.g. `npc_dota_hero_axe`).
    pub name: String,
    /// Display name (e.g. `Axe`).
    pub localized_name: String,
    /// Primary attribute (`str`, `agi`, `int`, `all`).
    pub primary_attr: String,
    /// `Melee` or `Ranged`.
    pub attack_type: String,
    /// Roles the hero is suited for.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Base health.
    pub base_health: f64,
    /// Base mana.
    pub base_mana: f64,
    /// Base armor.
    pub base_armor: f64,
    /// Attack range.
    #[serde(alias = "hero_attack_range")]
    pub attack_range: f64,
}

impl Hero {
    /// Returns `true` if the display name contains `folded_query`, which
    /// must already be lowercased.
    #[must_use]
    pub fn localized_name_contains(&self, folded_query: &str) -> bool {
        self.localized_name.to_lowercase().contains(folded_query)
    }
}

/// Payload for creating a hero. Everything except the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHero {
    /// Internal name.
    pub name: String,
    /// Display name.
    pub localized_name: String,
    /// Primary attribute.
    pub primary_attr: String,
    /// Attack type.
    pub attack_type: String,
    /// Roles.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Base health.
    pub base_health: f64,
    /// Base mana.
    pub base_mana: f64,
    /// Base armor.
    pub base_armor: f64,
    /// Attack range. Older clients send `hero_attack_range`.
    #[serde(alias = "hero_attack_range")]
    pub attack_range: f64,
}

impl NewHero {
    /// Checks the fields that must carry text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] naming the first blank field.
    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("localized_name", &self.localized_name)?;
        require_text("primary_attr", &self.primary_attr)?;
        require_text("attack_type", &self.attack_type)
    }

    /// Builds the stored record under the given id.
    #[must_use]
    pub fn into_hero(self, id: HeroId) -> Hero {
        Hero {
            id,
            name: self.name,
            localized_name: self.localized_name,
            primary_attr: self.primary_attr,
            attack_type: self.attack_type,
            roles: self.roles,
            base_health: self.base_health,
            base_mana: self.base_mana,
            base_armor: self.base_armor,
            attack_range: self.attack_range,
        }
    }
}

/// Partial update for a hero. Present fields replace stored ones.
///
/// The id cannot be changed and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroPatch {
    /// Replacement internal name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
    /// Replacement primary attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_attr: Option<String>,
    /// Replacement attack type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_type: Option<String>,
    /// Replacement role list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    /// Replacement base health.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_health: Option<f64>,
    /// Replacement base mana.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_mana: Option<f64>,
    /// Replacement base armor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_armor: Option<f64>,
    /// Replacement attack range.
    #[serde(
        default,
        alias = "hero_attack_range",
        skip_serializing_if = "Option::is_none"
    )]
    pub attack_range: Option<f64>,
}

impl HeroPatch {
    /// Rejects patches that would blank out a text field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let text_fields = [
            ("name", &self.name),
            ("localized_name", &self.localized_name),
            ("primary_attr", &self.primary_attr),
            ("attack_type", &self.attack_type),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }
        Ok(())
    }

    /// Shallow-merges the patch into `hero`.
    pub fn apply_to(self, hero: &mut Hero) {
        if let Some(name) = self.name {
            hero.name = name;
        }
        if let Some(localized_name) = self.localized_name {
            hero.localized_name = localized_name;
        }
        if let Some(primary_attr) = self.primary_attr {
            hero.primary_attr = primary_attr;
        }
        if let Some(attack_type) = self.attack_type {
            hero.attack_type = attack_type;
        }
        if let Some(roles) = self.roles {
            hero.roles = roles;
        }
        if let Some(base_health) = self.base_health {
            hero.base_health = base_health;
        }
        if let Some(base_mana) = self.base_mana {
            hero.base_mana = base_mana;
        }
        if let Some(base_armor) = self.base_armor {
            hero.base_armor = base_armor;
        }
        if let Some(attack_range) = self.attack_range {
            hero.attack_range = attack_range;
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_request(format!("{field} must not be empty")));
    }
    Ok(())
}
