use serde::{Deserialize, Serialize};

/// One parsed data literal.
///
/// Serializes as `{"%k": <kind>, "%v": <value>}`; map entries are `[key, value]`
/// arrays so non-atom keys survive the trip through JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "%k", content = "%v", rename_all = "snake_case")]
pub enum DataItem {
    List(Vec<DataItem>),
    Tuple(Vec<DataItem>),
    Map(Vec<(DataItem, DataItem)>),
    Int(u64),
    Atom(String),
    Bool(bool),
}

impl DataItem {
    /// Builds the atom `:name` that a `name:` map key stands for.
    pub fn atom_from_key(name: &str) -> Self {
        Self::Atom(format!(":{name}"))
    }
}
