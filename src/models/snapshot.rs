//! Persisted form of the whole application state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::{
    item::{Item, ItemDetails},
    loan::Loan,
    settings::SystemConfig,
    user::UserAccount,
};

/// Everything written under the snapshot key.
///
/// Missing sections fall back to the built-in seed data on restore, so
/// `items`, `users` and `config` are optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Written with each item's derived status, which is ignored on read
    #[serde(default, serialize_with = "items_with_status")]
    pub items: Option<Vec<Item>>,
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub users: Option<Vec<UserAccount>>,
    #[serde(default)]
    pub config: Option<SystemConfig>,
    pub updated_at: DateTime<Utc>,
}

fn items_with_status<S>(items: &Option<Vec<Item>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    items
        .as_ref()
        .map(|items| items.iter().cloned().map(ItemDetails::from).collect::<Vec<_>>())
        .serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::seed_items;

    #[test]
    fn test_items_carry_status() {
        let snapshot = Snapshot {
            items: Some(seed_items()),
            loans: Vec::new(),
            users: None,
            config: None,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["items"][0]["status"], "Ready");
        // Ruang Meeting A has no unit left
        assert_eq!(json["items"][3]["status"], "Out of Stock");

        let read: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(read, snapshot);
    }
}
