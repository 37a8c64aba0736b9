use crate::error::SchemaError;
use crate::stats::NUM_STATS;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

/// Attack record exactly as it appears in `AttackData.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackRecord {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(rename = "type")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sfx: Option<Vec<String>>,
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acc: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<Option<i32>>>,
    #[serde(rename = "sfx-val", default, skip_serializing_if = "Option::is_none")]
    pub sfx_val: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AttackCategory {
    Physical,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialEffect {
    /// Replaces the default critical chance with this percentage.
    CritRate(u8),
    /// The user must rest through its next action.
    Recharge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackData {
    pub id: u32,
    pub name: String,
    pub desc: String,
    pub categories: Vec<AttackCategory>,
    pub effects: Vec<SpecialEffect>,
    pub power: u32,
    /// `None` never misses.
    pub accuracy: Option<u8>,
    /// Signed percent per stat, only read for status attacks.
    pub stat_deltas: [Option<i32>; NUM_STATS],
}

impl AttackData {
    pub fn is_physical(&self) -> bool {
        self.categories.contains(&AttackCategory::Physical)
    }

    pub fn is_status(&self) -> bool {
        self.categories.contains(&AttackCategory::Status)
    }

    pub fn crit_rate_override(&self) -> Option<u8> {
        self.effects.iter().find_map(|effect| match effect {
            SpecialEffect::CritRate(rate) => Some(*rate),
            _ => None,
        })
    }

    pub fn causes_recharge(&self) -> bool {
        self.effects.contains(&SpecialEffect::Recharge)
    }

    /// One-line summary used by menus and the CLI.
    pub fn summary(&self) -> String {
        if self.is_physical() {
            let acc = self
                .accuracy
                .map_or_else(|| "X".to_string(), |acc| acc.to_string());
            format!("{} ({} PWR/{} ACC) : {}", self.name, self.power, acc, self.desc)
        } else {
            format!("{} : {}", self.name, self.desc)
        }
    }
}

impl TryFrom<AttackRecord> for AttackData {
    type Error = SchemaError;

    fn try_from(record: AttackRecord) -> Result<Self, Self::Error> {
        let categories = record
            .categories
            .iter()
            .map(|tag| {
                AttackCategory::from_str(tag.trim()).map_err(|_| SchemaError::UnknownCategory {
                    attack: record.name.clone(),
                    tag: tag.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sfx = record.sfx.unwrap_or_default();
        let sfx_val = record.sfx_val.unwrap_or_default();
        let mut effects = Vec::with_capacity(sfx.len());
        for (position, tag) in sfx.iter().enumerate() {
            let effect = match tag.as_str() {
                "hi-crit" => {
                    let rate = sfx_val.get(position).copied().ok_or_else(|| {
                        SchemaError::MissingEffectValue {
                            attack: record.name.clone(),
                            tag: tag.clone(),
                        }
                    })?;
                    SpecialEffect::CritRate(rate.clamp(0, 100) as u8)
                }
                "resting" => SpecialEffect::Recharge,
                _ => {
                    return Err(SchemaError::UnknownEffect {
                        attack: record.name.clone(),
                        tag: tag.clone(),
                    })
                }
            };
            effects.push(effect);
        }

        let power = match record.power {
            Some(power) => power,
            None if categories.contains(&AttackCategory::Physical) => {
                return Err(SchemaError::MissingField {
                    record: record.name.clone(),
                    field: "power",
                })
            }
            None => 0,
        };

        let mut stat_deltas = [None; NUM_STATS];
        if let Some(stats) = record.stats {
            if stats.len() != NUM_STATS {
                return Err(SchemaError::WrongStatCount {
                    record: record.name.clone(),
                    found: stats.len(),
                });
            }
            stat_deltas.copy_from_slice(&stats);
        }

        Ok(AttackData {
            id: record.id,
            name: record.name,
            desc: record.desc,
            categories,
            effects,
            power,
            accuracy: record.acc,
            stat_deltas,
        })
    }
}
