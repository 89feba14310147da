//! Group membership coordination.
//!
//! Join and leave are the only operations that mutate the active member
//! list, and both bracket the mutation with the advisory pause token so
//! that the other members' periodic loops back off while the list is in
//! flux. The token is purely cooperative: there is no compare-and-swap,
//! no lease and no ownership check, so it reduces races, it does not
//! prevent them.

use std::sync::Arc;
use tracing::{debug, info};

use crate::publisher::publish_position;
use crate::registry::{MemberId, SharedRegistry};
use crate::sensor::GeometrySensor;
use crate::store::StoreError;

/// Assigns identities and maintains the active member list.
pub struct MembershipCoordinator {
    registry: Arc<SharedRegistry>,
}

impl MembershipCoordinator {
    pub fn new(registry: Arc<SharedRegistry>) -> Self {
        Self { registry }
    }

    /// Register the local window as a member of the group.
    ///
    /// The identity is `count(active members) + 1` from the snapshot read
    /// at the top of the call. Two members joining concurrently against
    /// the same stale snapshot can therefore be assigned the same
    /// identity; the read is not covered by the pause token and the
    /// collision is neither detected nor reported. This reproduces the
    /// coordination scheme as deployed; callers needing stronger
    /// guarantees must serialize their joins.
    ///
    /// The token goes up before the list is touched so that other members
    /// stop reading while the list is half updated. The member's current
    /// position is published once before the token clears, so a completed
    /// join is immediately visible in both records.
    pub async fn join(&self, sensor: &dyn GeometrySensor) -> Result<MemberId, StoreError> {
        let mut members = self.registry.read_active_members().await?;
        let id = MemberId(members.len() as u32 + 1);

        self.registry.write_pause_token(id).await?;
        members.push(id);
        self.registry.write_active_members(&members).await?;
        publish_position(&self.registry, id, sensor.rect()).await?;
        self.registry.clear_pause_token().await?;

        info!(member = %id, "joined window group");
        Ok(id)
    }

    /// Remove `id` from the active member list. Idempotent.
    ///
    /// The member's position entry is not touched here; it becomes stale
    /// and gets pruned lazily by subsequent position reads.
    pub async fn leave(&self, id: MemberId) -> Result<(), StoreError> {
        self.registry.write_pause_token(id).await?;
        let members: Vec<MemberId> = self
            .registry
            .read_active_members()
            .await?
            .into_iter()
            .filter(|member| *member != id)
            .collect();
        self.registry.write_active_members(&members).await?;
        self.registry.clear_pause_token().await?;

        info!(member = %id, "left window group");
        Ok(())
    }

    /// Whether `id` should skip its periodic work this tick.
    ///
    /// True exactly when some other member holds the pause token. Purely
    /// advisory; a crashed holder leaves every other member deferring
    /// until the token is cleared out of band.
    pub async fn should_defer(&self, id: MemberId) -> Result<bool, StoreError> {
        let deferred = matches!(
            self.registry.read_pause_token().await?,
            Some(holder) if holder != id
        );
        if deferred {
            debug!(member = %id, "deferring to pause token holder");
        }
        Ok(deferred)
    }
}
