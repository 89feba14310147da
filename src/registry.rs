//! Typed view over the shared store records.
//!
//! Three logical records hold the whole coordination state: the active
//! member list, the per-member position map and the advisory pause token.
//! [`SharedRegistry`] owns their wire formats and nothing else; policy
//! lives with the callers.
//!
//! Wire formats:
//!
//! - active members: JSON array of integers, e.g. `[1, 2, 3]`
//! - pause token: string-encoded integer, e.g. `"2"`
//! - positions: JSON object keyed by string-encoded identity, e.g.
//!   `{"1": {"top": 0, "left": 0, "width": 800, "height": 600}}`
//!
//! A malformed record always reads as its empty/absent default; the next
//! write replaces it wholesale.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::geometry::Rect;
use crate::store::{StoreBackend, StoreError};

pub const ACTIVE_MEMBERS_KEY: &str = "active_members";
pub const PAUSE_TOKEN_KEY: &str = "pause_token";
pub const POSITIONS_KEY: &str = "window_positions";

/// Integer handle uniquely naming a member of the group.
///
/// Assigned at join time as `count(active members) + 1`; see
/// [`MembershipCoordinator::join`](crate::membership::MembershipCoordinator::join)
/// for the caveats of that scheme.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MemberId(pub u32);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed wrapper over the shared store's three coordination records.
pub struct SharedRegistry {
    store: Arc<dyn StoreBackend>,
}

impl SharedRegistry {
    pub fn new(store: Arc<dyn StoreBackend>) -> Self {
        Self { store }
    }

    /// Read the persisted active member list.
    ///
    /// An absent or malformed record reads as the empty list.
    pub async fn read_active_members(&self) -> Result<Vec<MemberId>, StoreError> {
        let value = match self.store.get(ACTIVE_MEMBERS_KEY).await? {
            Some(value) => value,
            None => return Ok(Vec::new()),
        };
        Ok(serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(error = %e, "malformed active member record, treating as empty");
            Vec::new()
        }))
    }

    /// Replace the persisted active member list.
    pub async fn write_active_members(&self, members: &[MemberId]) -> Result<(), StoreError> {
        let value = serde_json::to_value(members)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.put(ACTIVE_MEMBERS_KEY, value).await
    }

    /// Read the advisory pause token, if one is held.
    pub async fn read_pause_token(&self) -> Result<Option<MemberId>, StoreError> {
        let value = match self.store.get(PAUSE_TOKEN_KEY).await? {
            Some(value) => value,
            None => return Ok(None),
        };
        let token = value
            .as_str()
            .and_then(|s| s.parse::<u32>().ok())
            .map(MemberId);
        if token.is_none() {
            warn!(%value, "malformed pause token record, treating as absent");
        }
        Ok(token)
    }

    /// Set the pause token, naming the member performing a mutation.
    pub async fn write_pause_token(&self, id: MemberId) -> Result<(), StoreError> {
        self.store
            .put(PAUSE_TOKEN_KEY, Value::String(id.to_string()))
            .await
    }

    /// Clear the pause token. Idempotent.
    pub async fn clear_pause_token(&self) -> Result<(), StoreError> {
        self.store.remove(PAUSE_TOKEN_KEY).await
    }

    /// Read the position map, pruned to the current active member list.
    ///
    /// Entries for departed members are silently dropped from the result;
    /// they are not written back unless a caller subsequently writes the
    /// pruned map.
    pub async fn read_positions(&self) -> Result<BTreeMap<MemberId, Rect>, StoreError> {
        let active = self.read_active_members().await?;
        let value = match self.store.get(POSITIONS_KEY).await? {
            Some(value) => value,
            None => return Ok(BTreeMap::new()),
        };
        let raw: BTreeMap<String, Rect> = serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(error = %e, "malformed position record, treating as empty");
            BTreeMap::new()
        });

        let mut positions = BTreeMap::new();
        for (key, rect) in raw {
            let Some(id) = key.parse::<u32>().ok().map(MemberId) else {
                continue;
            };
            if active.contains(&id) {
                positions.insert(id, rect);
            }
        }
        Ok(positions)
    }

    /// Replace the persisted position map.
    pub async fn write_positions(
        &self,
        positions: &BTreeMap<MemberId, Rect>,
    ) -> Result<(), StoreError> {
        let mut object = serde_json::Map::new();
        for (id, rect) in positions {
            let value = serde_json::to_value(rect)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            object.insert(id.to_string(), value);
        }
        self.store.put(POSITIONS_KEY, Value::Object(object)).await
    }
}
