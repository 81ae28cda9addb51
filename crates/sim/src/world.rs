use std::collections::{BTreeMap, BTreeSet};

use autofish_engine::{
    ActorFlags, ActorId, ActorRegistry, Interactions, InventoryQuery, LootSessions, LootTarget,
    ObjectId, ObjectKind, ObjectState, TransferResult, WorldObjectQuery,
};
use tracing::debug;

pub const BOBBER_ENTRY: u32 = 35_591;
pub const FISHING_POLE_ITEM: u32 = 6_256;
pub const RAW_FISH_ITEM: u32 = 6_291;
pub const CATCH_CURRENCY: u32 = 25;

#[derive(Debug)]
pub struct Angler {
    pub name: String,
    pub flags: ActorFlags,
    pub position: (f32, f32),
    pub currency: u64,
    held: BTreeMap<u32, u32>,
    equipped: BTreeSet<u32>,
    loot_target: Option<LootTarget>,
}

impl Angler {
    pub fn held_count(&self, item_id: u32) -> u32 {
        self.held.get(&item_id).copied().unwrap_or(0)
    }

    pub fn unequip(&mut self, item_id: u32) {
        self.equipped.remove(&item_id);
    }
}

#[derive(Debug)]
struct LootSlot {
    item_id: u32,
    collected: bool,
}

#[derive(Debug)]
struct Bobber {
    entry: u32,
    state: ObjectState,
    owner: ActorId,
    position: (f32, f32),
    slots: Vec<LootSlot>,
    currency: u32,
}

/// Deterministic in-memory fishing world: bobbers spawn on cast, bite
/// immediately, and hand out one fish plus a fixed currency drop when used.
/// Storage is `BTreeMap`-keyed so iteration order is stable run to run.
#[derive(Debug)]
pub struct SimWorld {
    anglers: BTreeMap<ActorId, Angler>,
    bobbers: BTreeMap<ObjectId, Bobber>,
    next_actor_id: u64,
    next_object_id: u64,
    recast_spell: u32,
}

impl SimWorld {
    pub fn new(recast_spell: u32) -> Self {
        Self {
            anglers: BTreeMap::new(),
            bobbers: BTreeMap::new(),
            next_actor_id: 1,
            next_object_id: 1,
            recast_spell,
        }
    }

    pub fn spawn_angler(&mut self, name: &str, position: (f32, f32)) -> ActorId {
        let actor = ActorId(self.next_actor_id);
        self.next_actor_id += 1;
        let mut equipped = BTreeSet::new();
        equipped.insert(FISHING_POLE_ITEM);
        self.anglers.insert(
            actor,
            Angler {
                name: name.to_string(),
                flags: ActorFlags {
                    in_world: true,
                    alive: true,
                    in_combat: false,
                    privileged: false,
                },
                position,
                currency: 0,
                held: BTreeMap::new(),
                equipped,
                loot_target: None,
            },
        );
        debug!(actor = actor.0, name, "angler_spawned");
        actor
    }

    pub fn angler(&self, actor: ActorId) -> Option<&Angler> {
        self.anglers.get(&actor)
    }

    pub fn angler_mut(&mut self, actor: ActorId) -> Option<&mut Angler> {
        self.anglers.get_mut(&actor)
    }

    pub fn anglers(&self) -> impl Iterator<Item = (ActorId, &Angler)> {
        self.anglers.iter().map(|(actor, angler)| (*actor, angler))
    }

    /// The manual first cast: a ready bobber at the angler's position. The
    /// engine sustains the loop from here via the recast action.
    pub fn spawn_bobber_for(&mut self, actor: ActorId) -> Option<ObjectId> {
        let position = self.anglers.get(&actor)?.position;
        let object = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        self.bobbers.insert(
            object,
            Bobber {
                entry: BOBBER_ENTRY,
                state: ObjectState::Ready,
                owner: actor,
                position,
                slots: Vec::new(),
                currency: 0,
            },
        );
        debug!(actor = actor.0, object = object.0, "bobber_spawned");
        Some(object)
    }

    pub fn bobber_count(&self) -> usize {
        self.bobbers.len()
    }

    /// Host-side cleanup: deactivated bobbers disappear from the world.
    pub fn despawn_deactivated(&mut self) -> usize {
        let before = self.bobbers.len();
        self.bobbers
            .retain(|_, bobber| bobber.state != ObjectState::Deactivated);
        before - self.bobbers.len()
    }

    pub fn fish_count(&self, actor: ActorId) -> u32 {
        self.anglers
            .get(&actor)
            .map_or(0, |angler| angler.held_count(RAW_FISH_ITEM))
    }
}

impl ActorRegistry for SimWorld {
    fn actor_ids(&self) -> Vec<ActorId> {
        self.anglers.keys().copied().collect()
    }

    fn actor_flags(&self, actor: ActorId) -> Option<ActorFlags> {
        self.anglers.get(&actor).map(|angler| angler.flags)
    }
}

impl InventoryQuery for SimWorld {
    fn held_count(&self, actor: ActorId, item_id: u32) -> u32 {
        self.anglers
            .get(&actor)
            .map_or(0, |angler| angler.held_count(item_id))
    }

    fn has_item_equipped(&self, actor: ActorId, item_id: u32) -> bool {
        self.anglers
            .get(&actor)
            .map_or(false, |angler| angler.equipped.contains(&item_id))
    }
}

impl WorldObjectQuery for SimWorld {
    fn objects_near_actor(&self, actor: ActorId, entries: &[u32], range: f32) -> Vec<ObjectId> {
        let Some(origin) = self.anglers.get(&actor).map(|angler| angler.position) else {
            return Vec::new();
        };
        self.bobbers
            .iter()
            .filter(|(_, bobber)| entries.contains(&bobber.entry))
            .filter(|(_, bobber)| {
                let dx = bobber.position.0 - origin.0;
                let dy = bobber.position.1 - origin.1;
                dx * dx + dy * dy <= range * range
            })
            .map(|(object, _)| *object)
            .collect()
    }

    fn object_owner(&self, object: ObjectId) -> Option<ActorId> {
        self.bobbers.get(&object).map(|bobber| bobber.owner)
    }

    fn object_kind(&self, object: ObjectId) -> Option<ObjectKind> {
        self.bobbers.get(&object).map(|_| ObjectKind::FishingNode)
    }

    fn object_state(&self, object: ObjectId) -> Option<ObjectState> {
        self.bobbers.get(&object).map(|bobber| bobber.state)
    }

    fn set_object_state(&mut self, object: ObjectId, state: ObjectState) {
        if let Some(bobber) = self.bobbers.get_mut(&object) {
            bobber.state = state;
        }
    }
}

impl Interactions for SimWorld {
    fn use_object(&mut self, actor: ActorId, object: ObjectId) {
        let Some(bobber) = self.bobbers.get_mut(&object) else {
            return;
        };
        bobber.state = ObjectState::Activated;
        bobber.slots.push(LootSlot {
            item_id: RAW_FISH_ITEM,
            collected: false,
        });
        bobber.currency = CATCH_CURRENCY;
        if let Some(angler) = self.anglers.get_mut(&actor) {
            angler.loot_target = Some(LootTarget::WorldObject(object));
        }
        debug!(actor = actor.0, object = object.0, "bobber_used");
    }

    fn cast_self_spell(&mut self, actor: ActorId, spell_id: u32) {
        if spell_id != self.recast_spell {
            return;
        }
        self.spawn_bobber_for(actor);
    }
}

impl LootSessions for SimWorld {
    fn loot_target(&self, actor: ActorId) -> Option<LootTarget> {
        self.anglers.get(&actor).and_then(|angler| angler.loot_target)
    }

    fn primary_slot_count(&self, object: ObjectId) -> u8 {
        self.bobbers
            .get(&object)
            .map_or(0, |bobber| bobber.slots.len() as u8)
    }

    fn is_primary_slot_collected(&self, object: ObjectId, slot: u8) -> bool {
        self.bobbers.get(&object).map_or(false, |bobber| {
            bobber
                .slots
                .get(slot as usize)
                .map_or(false, |entry| entry.collected)
        })
    }

    fn quest_item_count(&self, _object: ObjectId, _actor: ActorId) -> u8 {
        0
    }

    fn ffa_item_count(&self, _object: ObjectId, _actor: ActorId) -> u8 {
        0
    }

    fn store_loot_slot(&mut self, actor: ActorId, object: ObjectId, slot: u8) -> TransferResult {
        let Some(bobber) = self.bobbers.get_mut(&object) else {
            return TransferResult::InvalidSlot;
        };
        let Some(entry) = bobber.slots.get_mut(slot as usize) else {
            return TransferResult::InvalidSlot;
        };
        if entry.collected {
            return TransferResult::AlreadyCollected;
        }
        let Some(angler) = self.anglers.get_mut(&actor) else {
            return TransferResult::InventoryFull;
        };
        entry.collected = true;
        let count = angler.held.entry(entry.item_id).or_insert(0);
        *count = count.saturating_add(1);
        TransferResult::Stored
    }

    fn currency(&self, object: ObjectId) -> u32 {
        self.bobbers.get(&object).map_or(0, |bobber| bobber.currency)
    }

    fn credit_currency(&mut self, actor: ActorId, amount: u32) {
        if let Some(angler) = self.anglers.get_mut(&actor) {
            angler.currency = angler.currency.saturating_add(u64::from(amount));
        }
    }

    fn zero_currency(&mut self, object: ObjectId) {
        if let Some(bobber) = self.bobbers.get_mut(&object) {
            bobber.currency = 0;
        }
    }

    fn release_loot(&mut self, actor: ActorId, object: ObjectId) {
        if let Some(angler) = self.anglers.get_mut(&actor) {
            if angler.loot_target == Some(LootTarget::WorldObject(object)) {
                angler.loot_target = None;
            }
        }
        debug!(actor = actor.0, object = object.0, "loot_released");
    }
}
