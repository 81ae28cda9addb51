use tracing::debug;

use crate::host::{ActorId, AutoFishHost, ObjectId, ObjectKind, ObjectState, TransferResult};

/// What a single container sweep did, for counters and logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LootSweep {
    pub stored: u32,
    pub skipped: u32,
    pub failed: u32,
    pub currency: u32,
}

impl LootSweep {
    fn record(&mut self, result: TransferResult) {
        match result {
            TransferResult::Stored => self.stored = self.stored.saturating_add(1),
            TransferResult::AlreadyCollected => self.skipped = self.skipped.saturating_add(1),
            TransferResult::InvalidSlot | TransferResult::InventoryFull => {
                self.failed = self.failed.saturating_add(1)
            }
        }
    }
}

/// Empty a world-object-backed container into the actor's storage. Transfer
/// failures are per-slot: the remaining slots are still attempted and nothing
/// is retried. The session is released regardless of how many slots made it,
/// and a fishing node is deactivated so it cannot be reused.
pub(crate) fn collect_container<H: AutoFishHost>(
    host: &mut H,
    actor: ActorId,
    object: ObjectId,
) -> LootSweep {
    let mut sweep = LootSweep::default();

    let primary_slots = host.primary_slot_count(object);
    for slot in 0..primary_slots {
        if host.is_primary_slot_collected(object, slot) {
            sweep.skipped = sweep.skipped.saturating_add(1);
            continue;
        }
        sweep.record(host.store_loot_slot(actor, object, slot));
    }

    // Quest slots continue numbering after the primary slots.
    let quest_items = host.quest_item_count(object, actor);
    for index in 0..quest_items {
        sweep.record(host.store_loot_slot(actor, object, primary_slots.saturating_add(index)));
    }

    // The free-for-all pool restarts at slot zero; its indices may alias the
    // primary pool's and the host is expected to key by pool.
    let ffa_items = host.ffa_item_count(object, actor);
    for slot in 0..ffa_items {
        sweep.record(host.store_loot_slot(actor, object, slot));
    }

    let currency = host.currency(object);
    if currency > 0 {
        host.credit_currency(actor, currency);
        host.zero_currency(object);
        sweep.currency = currency;
    }

    host.release_loot(actor, object);

    if host.object_kind(object) == Some(ObjectKind::FishingNode) {
        host.set_object_state(object, ObjectState::Deactivated);
    }

    debug!(
        actor = actor.0,
        object = object.0,
        stored = sweep.stored,
        skipped = sweep.skipped,
        failed = sweep.failed,
        currency = sweep.currency,
        "container_swept"
    );
    sweep
}
