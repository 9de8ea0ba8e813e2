use serde::{Deserialize, Deserializer, Serialize};

/// Row from the `player` table.
///
/// Every column except `id` is nullable: create binds whatever the request
/// supplied, absent fields included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i32,
    pub level: Option<i32>,
    // Unquoted identifiers fold to lower case in Postgres.
    #[sqlx(rename = "brainrotid")]
    pub brainrot_id: Option<i32>,
    pub inventory: Option<Vec<i32>>,
    pub gold: Option<i32>,
}

/// Body of `POST /`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub brainrot_id: Option<i32>,
    #[serde(default)]
    pub inventory: Option<Vec<i32>>,
    #[serde(default)]
    pub gold: Option<i32>,
}

/// Body of `PUT /:id`.
///
/// The outer `Option` records whether the key was present at all, the inner
/// one whether it was `null`. Only present keys become assignments.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    #[serde(default, deserialize_with = "present")]
    pub level: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub brainrot_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub inventory: Option<Option<Vec<i32>>>,
    #[serde(default, deserialize_with = "present")]
    pub gold: Option<Option<i32>>,
}

impl PlayerUpdate {
    pub fn is_empty(&self) -> bool {
        self.level.is_none()
            && self.brainrot_id.is_none()
            && self.inventory.is_none()
            && self.gold.is_none()
    }
}

/// Body of `PATCH /:id/gold`
#[derive(Debug, Default, Deserialize)]
pub struct GoldUpdate {
    #[serde(default)]
    pub gold: Option<i32>,
}

/// Body of `PATCH /:id/inventory`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPush {
    pub item_id: i32,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Appends `item_id` to a stored inventory, treating NULL as empty.
pub fn append_item(inventory: Option<Vec<i32>>, item_id: i32) -> Vec<i32> {
    let mut items = inventory.unwrap_or_default();
    items.push(item_id);
    items
}
