use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `value1`/`value2` may be written as JSON numbers or strings (`"50%"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Item record exactly as it appears in `ItemData.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub value1: Option<ParamValue>,
    #[serde(default)]
    pub value2: Option<ParamValue>,
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "use")]
    pub usage: u8,
    #[serde(rename = "sellsFor", default)]
    pub sells_for: u32,
    #[serde(default)]
    pub costs: u32,
    #[serde(rename = "dropRate", default)]
    pub drop_rate: u32,
    #[serde(rename = "holdItem", default)]
    pub hold_item: bool,
}

/// Where and on whom an item may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemUse {
    Unusable,
    AnyTimeOnSelf,
    AnyTimeOnOther,
    BattleOnlyOnSelf,
    BattleOnlyOnOther,
    OutOfBattleOnSelf,
    OutOfBattleOnOther,
}

impl ItemUse {
    pub fn code(self) -> u8 {
        match self {
            ItemUse::Unusable => 0,
            ItemUse::AnyTimeOnSelf => 1,
            ItemUse::AnyTimeOnOther => 2,
            ItemUse::BattleOnlyOnSelf => 3,
            ItemUse::BattleOnlyOnOther => 4,
            ItemUse::OutOfBattleOnSelf => 5,
            ItemUse::OutOfBattleOnOther => 6,
        }
    }

    pub fn usable_in_battle(self) -> bool {
        (1..=4).contains(&self.code())
    }

    /// Odd codes target one of the player's own monsters.
    pub fn targets_own_monster(self) -> bool {
        self.code() % 2 == 1
    }
}

impl TryFrom<u8> for ItemUse {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => ItemUse::Unusable,
            1 => ItemUse::AnyTimeOnSelf,
            2 => ItemUse::AnyTimeOnOther,
            3 => ItemUse::BattleOnlyOnSelf,
            4 => ItemUse::BattleOnlyOnOther,
            5 => ItemUse::OutOfBattleOnSelf,
            6 => ItemUse::OutOfBattleOnOther,
            other => return Err(other),
        })
    }
}

/// A literal HP amount (`"20"`) or a share of max HP (`"50%"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestoreAmount {
    Flat(i64),
    Percent(i64),
}

impl FromStr for RestoreAmount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_suffix('%') {
            Some(percent) => Ok(RestoreAmount::Percent(percent.trim().parse()?)),
            None => Ok(RestoreAmount::Flat(s.parse()?)),
        }
    }
}

impl fmt::Display for RestoreAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreAmount::Flat(amount) => write!(f, "{}", amount),
            RestoreAmount::Percent(percent) => write!(f, "{}%", percent),
        }
    }
}

/// Heal applied every round by a passive held item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldHeal {
    Fixed(RestoreAmount),
    /// Percent drawn from `[-min, max)` each round.
    Range { min: i64, max: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    Heal(RestoreAmount),
    /// Sets HP to a percentage of max, which may exceed max.
    FullHealPercent(i64),
    CapacityIncrease(usize),
    DirectDamage { amount: u32, crit_chance: Option<u8> },
    Escape,
    HoldHeal(HoldHeal),
    SharedXp,
    Inert,
}

impl ItemEffect {
    pub fn is_recurring_heal(&self) -> bool {
        matches!(self, ItemEffect::HoldHeal(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: u32,
    pub name: String,
    pub desc: String,
    pub usage: ItemUse,
    pub effect: ItemEffect,
    pub sell_price: u32,
    pub buy_price: u32,
    pub drop_rate: u32,
    /// Whether the item does anything while held.
    pub hold_item: bool,
}

impl ItemData {
    pub fn summary(&self) -> String {
        format!("{} : {}", self.name, self.desc)
    }
}

fn required<'a>(
    item: &str,
    value: &'a Option<ParamValue>,
    field: &'static str,
) -> Result<&'a ParamValue, SchemaError> {
    value.as_ref().ok_or_else(|| SchemaError::MissingField {
        record: item.to_string(),
        field,
    })
}

fn parse_amount(item: &str, value: &ParamValue) -> Result<RestoreAmount, SchemaError> {
    match value {
        ParamValue::Number(n) => Ok(RestoreAmount::Flat(*n)),
        ParamValue::Text(text) => text.parse().map_err(|_| SchemaError::InvalidAmount {
            item: item.to_string(),
            value: text.clone(),
        }),
    }
}

fn parse_percent(item: &str, value: &ParamValue) -> Result<i64, SchemaError> {
    match parse_amount(item, value)? {
        RestoreAmount::Percent(percent) => Ok(percent),
        RestoreAmount::Flat(_) => Err(SchemaError::InvalidAmount {
            item: item.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_flat(item: &str, value: &ParamValue) -> Result<i64, SchemaError> {
    match parse_amount(item, value)? {
        RestoreAmount::Flat(amount) if amount >= 0 => Ok(amount),
        _ => Err(SchemaError::InvalidAmount {
            item: item.to_string(),
            value: value.to_string(),
        }),
    }
}

impl TryFrom<ItemRecord> for ItemData {
    type Error = SchemaError;

    fn try_from(record: ItemRecord) -> Result<Self, Self::Error> {
        let name = record.name.as_str();
        let usage = ItemUse::try_from(record.usage).map_err(|code| SchemaError::InvalidUsage {
            item: record.name.clone(),
            code,
        })?;

        let effect = match record.kind.to_ascii_lowercase().as_str() {
            "heal" => ItemEffect::Heal(parse_amount(
                name,
                required(name, &record.value1, "value1")?,
            )?),
            "xheal" => ItemEffect::FullHealPercent(parse_percent(
                name,
                required(name, &record.value1, "value1")?,
            )?),
            "bag" => ItemEffect::CapacityIncrease(
                parse_flat(name, required(name, &record.value1, "value1")?)? as usize,
            ),
            "dam" => {
                let amount = parse_flat(name, required(name, &record.value1, "value1")?)?;
                let crit_chance = match &record.value2 {
                    Some(value) => Some(parse_flat(name, value)?.min(100) as u8),
                    None => None,
                };
                ItemEffect::DirectDamage {
                    amount: amount as u32,
                    crit_chance,
                }
            }
            "esc" => ItemEffect::Escape,
            "hold-heal" => {
                let first = required(name, &record.value1, "value1")?;
                match &record.value2 {
                    Some(second) => ItemEffect::HoldHeal(HoldHeal::Range {
                        min: parse_percent(name, first)?,
                        max: parse_percent(name, second)?,
                    }),
                    None => ItemEffect::HoldHeal(HoldHeal::Fixed(parse_amount(name, first)?)),
                }
            }
            "xp-share" => ItemEffect::SharedXp,
            "none" => ItemEffect::Inert,
            _ => {
                return Err(SchemaError::UnknownItemType {
                    item: record.name.clone(),
                    kind: record.kind.clone(),
                })
            }
        };

        Ok(ItemData {
            id: record.id,
            name: record.name,
            desc: record.desc,
            usage,
            effect,
            sell_price: record.sells_for,
            buy_price: record.costs,
            drop_rate: record.drop_rate,
            hold_item: record.hold_item,
        })
    }
}
