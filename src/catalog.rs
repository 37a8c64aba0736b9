use crate::battle::rng::RandomSource;
use crate::errors::{ContentError, ContentResult};
use schema::{AttackData, AttackRecord, ItemData, ItemRecord, SpeciesData, SpeciesRecord};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Species needed for a playable catalog: two boss phases plus at least one wild monster.
pub const MIN_SPECIES: usize = 3;

pub const ATTACK_FILE: &str = "AttackData.json";
pub const ITEM_FILE: &str = "ItemData.json";
pub const SPECIES_FILE: &str = "Fakeydex.json";

const BUNDLED_ATTACKS: &str = include_str!("../data/AttackData.json");
const BUNDLED_ITEMS: &str = include_str!("../data/ItemData.json");
const BUNDLED_SPECIES: &str = include_str!("../data/Fakeydex.json");

#[derive(Deserialize)]
struct AttackDocument {
    attacks: Vec<AttackRecord>,
}

#[derive(Deserialize)]
struct ItemDocument {
    items: Vec<ItemRecord>,
}

#[derive(Deserialize)]
struct SpeciesDocument {
    #[serde(rename = "Fakeydex")]
    species: Vec<SpeciesRecord>,
}

/// Immutable lookup tables for every attack, item and species in the game.
///
/// Built once and then shared by reference with every resolver. Items are
/// kept in name order because the hold-item roll walks them in that order.
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    attacks: BTreeMap<String, AttackData>,
    items: BTreeMap<String, ItemData>,
    species: Vec<SpeciesData>,
}

impl ContentCatalog {
    /// Build a catalog from already validated definitions.
    pub fn from_parts(
        attacks: Vec<AttackData>,
        items: Vec<ItemData>,
        mut species: Vec<SpeciesData>,
    ) -> ContentResult<Self> {
        let mut attack_map = BTreeMap::new();
        for attack in attacks {
            if attack_map.contains_key(&attack.name) {
                return Err(ContentError::Duplicate {
                    kind: "attack",
                    name: attack.name,
                });
            }
            attack_map.insert(attack.name.clone(), attack);
        }

        let mut item_map = BTreeMap::new();
        for item in items {
            if item_map.contains_key(&item.name) {
                return Err(ContentError::Duplicate {
                    kind: "item",
                    name: item.name,
                });
            }
            item_map.insert(item.name.clone(), item);
        }

        if species.len() < MIN_SPECIES {
            return Err(ContentError::TooFewSpecies {
                needed: MIN_SPECIES,
                found: species.len(),
            });
        }
        for template in &species {
            if let Some(missing) = template
                .attacks
                .iter()
                .find(|attack| !attack_map.contains_key(attack.as_str()))
            {
                return Err(ContentError::UnknownSpeciesAttack {
                    species: template.name.clone(),
                    attack: missing.clone(),
                });
            }
        }
        species.sort_by_key(|template| template.id);

        info!(
            attacks = attack_map.len(),
            items = item_map.len(),
            species = species.len(),
            "content catalog ready"
        );
        Ok(Self {
            attacks: attack_map,
            items: item_map,
            species,
        })
    }

    /// Validate raw records and build a catalog from them.
    pub fn from_records(
        attacks: Vec<AttackRecord>,
        items: Vec<ItemRecord>,
        species: Vec<SpeciesRecord>,
    ) -> ContentResult<Self> {
        let attacks = attacks
            .into_iter()
            .map(AttackData::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let items = items
            .into_iter()
            .map(ItemData::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let species = species
            .into_iter()
            .map(SpeciesData::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_parts(attacks, items, species)
    }

    /// Parse the three content documents (`{"attacks": [...]}`, `{"items": [...]}`, `{"Fakeydex": [...]}`).
    pub fn from_json_documents(attacks: &str, items: &str, species: &str) -> ContentResult<Self> {
        let attacks: AttackDocument =
            serde_json::from_str(attacks).map_err(|source| ContentError::Malformed {
                document: ATTACK_FILE,
                source,
            })?;
        let items: ItemDocument =
            serde_json::from_str(items).map_err(|source| ContentError::Malformed {
                document: ITEM_FILE,
                source,
            })?;
        let species: SpeciesDocument =
            serde_json::from_str(species).map_err(|source| ContentError::Malformed {
                document: SPECIES_FILE,
                source,
            })?;
        Self::from_records(attacks.attacks, items.items, species.species)
    }

    /// Load the three content documents from a data directory.
    pub fn load_dir(data_path: &Path) -> ContentResult<Self> {
        let read = |file: &str| {
            let path = data_path.join(file);
            debug!(path = %path.display(), "reading content document");
            fs::read_to_string(&path).map_err(|source| ContentError::Io { path, source })
        };
        let attacks = read(ATTACK_FILE)?;
        let items = read(ITEM_FILE)?;
        let species = read(SPECIES_FILE)?;
        Self::from_json_documents(&attacks, &items, &species)
    }

    /// The content shipped with the crate.
    pub fn bundled() -> ContentResult<Self> {
        Self::from_json_documents(BUNDLED_ATTACKS, BUNDLED_ITEMS, BUNDLED_SPECIES)
    }

    pub fn attack(&self, name: &str) -> Option<&AttackData> {
        self.attacks.get(name)
    }

    pub fn item(&self, name: &str) -> Option<&ItemData> {
        self.items.get(name)
    }

    pub fn species(&self, index: usize) -> Option<&SpeciesData> {
        self.species.get(index)
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    /// All species in identifier order.
    pub fn all_species(&self) -> &[SpeciesData] {
        &self.species
    }

    /// Items in name order.
    pub fn items(&self) -> impl Iterator<Item = &ItemData> {
        self.items.values()
    }

    /// Every attack sorted by identifier.
    pub fn attacks_by_id(&self) -> Vec<&AttackData> {
        let mut attacks: Vec<&AttackData> = self.attacks.values().collect();
        attacks.sort_by_key(|attack| attack.id);
        attacks
    }

    pub fn require_attack(&self, name: &str) -> ContentResult<&AttackData> {
        self.attack(name)
            .ok_or_else(|| ContentError::AttackNotFound(name.to_string()))
    }

    pub fn require_item(&self, name: &str) -> ContentResult<&ItemData> {
        self.item(name)
            .ok_or_else(|| ContentError::ItemNotFound(name.to_string()))
    }

    pub fn require_species(&self, index: usize) -> ContentResult<&SpeciesData> {
        self.species(index)
            .ok_or(ContentError::SpeciesNotFound(index))
    }

    /// Weighted pick of an item for a wild monster to hold.
    ///
    /// Draws from `[0, 100)` and walks the items in name order, subtracting
    /// each drop weight. The first item that takes the draw below zero wins.
    pub fn roll_hold_item(&self, rng: &mut dyn RandomSource) -> Option<&ItemData> {
        let mut location = i64::from(rng.percent("hold item pick"));
        for item in self.items.values() {
            location -= i64::from(item.drop_rate);
            if location < 0 {
                return Some(item);
            }
        }
        None
    }
}
