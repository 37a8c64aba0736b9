use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Number of stats every monster carries.
pub const NUM_STATS: usize = 4;

/// HP, ATK, DEF, SPE in that order.
pub type StatBlock = [u32; NUM_STATS];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum StatType {
    #[strum(serialize = "HP")]
    Hp,
    #[strum(serialize = "attack")]
    Attack,
    #[strum(serialize = "defense")]
    Defense,
    #[strum(serialize = "speed")]
    Speed,
}

impl StatType {
    pub const ALL: [StatType; NUM_STATS] = [
        StatType::Hp,
        StatType::Attack,
        StatType::Defense,
        StatType::Speed,
    ];

    /// Position of this stat inside a [`StatBlock`].
    pub fn index(self) -> usize {
        match self {
            StatType::Hp => 0,
            StatType::Attack => 1,
            StatType::Defense => 2,
            StatType::Speed => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<StatType> {
        Self::ALL.get(index).copied()
    }
}
