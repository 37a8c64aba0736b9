use crate::error::SchemaError;
use crate::stats::{StatBlock, NUM_STATS};
use serde::{Deserialize, Serialize};

/// Species record as it appears in `Fakeydex.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub name: String,
    #[serde(default)]
    pub ascii: String,
    #[serde(rename = "ID")]
    pub id: u32,
    pub stats: Vec<u32>,
    #[serde(default)]
    pub attacks: Vec<String>,
}

/// Template a wild or boss monster is generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: u32,
    pub name: String,
    pub ascii: String,
    pub base_stats: StatBlock,
    pub attacks: Vec<String>,
}

impl SpeciesData {
    pub fn stat_total(&self) -> u32 {
        self.base_stats.iter().sum()
    }
}

impl TryFrom<SpeciesRecord> for SpeciesData {
    type Error = SchemaError;

    fn try_from(record: SpeciesRecord) -> Result<Self, Self::Error> {
        let base_stats: StatBlock =
            record
                .stats
                .as_slice()
                .try_into()
                .map_err(|_| SchemaError::WrongStatCount {
                    record: record.name.clone(),
                    found: record.stats.len(),
                })?;

        if record.attacks.is_empty() {
            return Err(SchemaError::MissingField {
                record: record.name,
                field: "attacks",
            });
        }

        Ok(SpeciesData {
            id: record.id,
            name: record.name,
            ascii: record.ascii,
            base_stats,
            attacks: record.attacks,
        })
    }
}
