use thiserror::Error;

/// A catalog record that could not be turned into its validated form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{record}: missing required field `{field}`")]
    MissingField { record: String, field: &'static str },

    #[error("attack {attack}: unknown category `{tag}`")]
    UnknownCategory { attack: String, tag: String },

    #[error("attack {attack}: unknown special effect `{tag}`")]
    UnknownEffect { attack: String, tag: String },

    #[error("attack {attack}: special effect `{tag}` has no value")]
    MissingEffectValue { attack: String, tag: String },

    #[error("{record}: expected 4 stat entries, found {found}")]
    WrongStatCount { record: String, found: usize },

    #[error("item {item}: usage code {code} is outside 0-6")]
    InvalidUsage { item: String, code: u8 },

    #[error("item {item}: unknown effect type `{kind}`")]
    UnknownItemType { item: String, kind: String },

    #[error("item {item}: `{value}` is not a valid amount")]
    InvalidAmount { item: String, value: String },
}
