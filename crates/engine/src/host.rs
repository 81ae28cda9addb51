//! Capability interfaces the engine needs from its host simulation. The
//! engine never sees a concrete actor or world-object type; hosts (and test
//! doubles) implement these narrow traits and hand themselves to
//! [`crate::AutoFishEngine::tick`] each update.

/// Opaque identity of a live actor. Keys both timer tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

/// Opaque identity of an interactable world object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorFlags {
    pub in_world: bool,
    pub alive: bool,
    pub in_combat: bool,
    /// Privileged actors (e.g. game masters) are exempt from automation.
    pub privileged: bool,
}

/// Interaction lifecycle of a world object, as exposed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    Ready,
    Activated,
    Deactivated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    FishingNode,
    Chest,
}

/// What an actor's open loot session points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LootTarget {
    WorldObject(ObjectId),
    /// Corpse-backed or otherwise non-object-backed session; the engine does
    /// not collect these.
    Other,
}

/// Outcome of a single slot transfer. Hosts report, never panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferResult {
    Stored,
    AlreadyCollected,
    InvalidSlot,
    InventoryFull,
}

pub trait ActorRegistry {
    /// Every connected actor, in host iteration order. The order is not
    /// required to be stable across calls.
    fn actor_ids(&self) -> Vec<ActorId>;

    /// `None` when the id no longer resolves to a live actor.
    fn actor_flags(&self, actor: ActorId) -> Option<ActorFlags>;
}

pub trait InventoryQuery {
    fn held_count(&self, actor: ActorId, item_id: u32) -> u32;

    fn has_item_equipped(&self, actor: ActorId, item_id: u32) -> bool;
}

pub trait WorldObjectQuery {
    /// World objects with any of the given type ids within `range` of the
    /// actor, in host query order.
    fn objects_near_actor(&self, actor: ActorId, entries: &[u32], range: f32) -> Vec<ObjectId>;

    fn object_owner(&self, object: ObjectId) -> Option<ActorId>;

    fn object_kind(&self, object: ObjectId) -> Option<ObjectKind>;

    fn object_state(&self, object: ObjectId) -> Option<ObjectState>;

    fn set_object_state(&mut self, object: ObjectId, state: ObjectState);
}

pub trait Interactions {
    /// Trigger the primary interaction of `object` on behalf of `actor`.
    fn use_object(&mut self, actor: ActorId, object: ObjectId);

    /// Cast `spell_id` by `actor` on itself.
    fn cast_self_spell(&mut self, actor: ActorId, spell_id: u32);
}

/// Loot-session and container operations. All slot indices share one
/// namespace per container: primary slots start at zero, quest slots continue
/// after them, and the free-for-all pool restarts at zero.
pub trait LootSessions {
    fn loot_target(&self, actor: ActorId) -> Option<LootTarget>;

    fn primary_slot_count(&self, object: ObjectId) -> u8;

    fn is_primary_slot_collected(&self, object: ObjectId, slot: u8) -> bool;

    fn quest_item_count(&self, object: ObjectId, actor: ActorId) -> u8;

    fn ffa_item_count(&self, object: ObjectId, actor: ActorId) -> u8;

    /// Transfer one slot into the actor's storage.
    fn store_loot_slot(&mut self, actor: ActorId, object: ObjectId, slot: u8) -> TransferResult;

    fn currency(&self, object: ObjectId) -> u32;

    fn credit_currency(&mut self, actor: ActorId, amount: u32);

    fn zero_currency(&mut self, object: ObjectId);

    /// Close the actor's loot session on the container.
    fn release_loot(&mut self, actor: ActorId, object: ObjectId);
}

/// Everything the engine consumes, as one bound. Blanket-implemented for any
/// type providing the individual capabilities.
pub trait AutoFishHost:
    ActorRegistry + InventoryQuery + WorldObjectQuery + Interactions + LootSessions
{
}

impl<H> AutoFishHost for H where
    H: ActorRegistry + InventoryQuery + WorldObjectQuery + Interactions + LootSessions
{
}
