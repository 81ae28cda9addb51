//! In-memory host double for engine tests. Storage is `BTreeMap`-backed so
//! "host iteration order" is stable within a test.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::host::{
    ActorFlags, ActorId, ActorRegistry, Interactions, InventoryQuery, LootSessions, LootTarget,
    ObjectId, ObjectKind, ObjectState, TransferResult, WorldObjectQuery,
};

#[derive(Debug)]
pub(crate) struct FakeActor {
    pub flags: ActorFlags,
    pub held: HashMap<u32, u32>,
    pub equipped: HashSet<u32>,
    pub currency: u64,
    pub loot_target: Option<LootTarget>,
    pub position: (f32, f32),
    pub inventory_full: bool,
}

impl Default for FakeActor {
    fn default() -> Self {
        Self {
            flags: ActorFlags {
                in_world: true,
                alive: true,
                in_combat: false,
                privileged: false,
            },
            held: HashMap::new(),
            equipped: HashSet::new(),
            currency: 0,
            loot_target: None,
            position: (0.0, 0.0),
            inventory_full: false,
        }
    }
}

#[derive(Debug)]
pub(crate) struct FakeObject {
    pub entry: u32,
    pub kind: ObjectKind,
    pub state: ObjectState,
    pub owner: Option<ActorId>,
    pub position: (f32, f32),
    pub primary_collected: Vec<bool>,
    pub quest_items: u8,
    pub ffa_items: u8,
    pub currency: u32,
}

#[derive(Debug, Default)]
pub(crate) struct FakeWorld {
    actors: BTreeMap<ActorId, FakeActor>,
    objects: BTreeMap<ObjectId, FakeObject>,
    pub used: Vec<(ActorId, ObjectId)>,
    pub casts: Vec<(ActorId, u32)>,
    pub store_calls: Vec<(ActorId, ObjectId, u8)>,
    pub released: Vec<(ActorId, ObjectId)>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_actor(&mut self, id: u64) -> ActorId {
        let actor = ActorId(id);
        self.actors.insert(actor, FakeActor::default());
        actor
    }

    pub fn remove_actor(&mut self, actor: ActorId) {
        self.actors.remove(&actor);
    }

    pub fn add_bobber(&mut self, id: u64, owner: ActorId, entry: u32) -> ObjectId {
        let object = ObjectId(id);
        self.objects.insert(
            object,
            FakeObject {
                entry,
                kind: ObjectKind::FishingNode,
                state: ObjectState::Ready,
                owner: Some(owner),
                position: (0.0, 0.0),
                primary_collected: Vec::new(),
                quest_items: 0,
                ffa_items: 0,
                currency: 0,
            },
        );
        object
    }

    pub fn add_chest(&mut self, id: u64, primary_slots: usize) -> ObjectId {
        let object = ObjectId(id);
        self.objects.insert(
            object,
            FakeObject {
                entry: 0,
                kind: ObjectKind::Chest,
                state: ObjectState::Ready,
                owner: None,
                position: (0.0, 0.0),
                primary_collected: vec![false; primary_slots],
                quest_items: 0,
                ffa_items: 0,
                currency: 0,
            },
        );
        object
    }

    pub fn actor_mut(&mut self, actor: ActorId) -> &mut FakeActor {
        self.actors.get_mut(&actor).expect("actor exists")
    }

    pub fn object_mut(&mut self, object: ObjectId) -> &mut FakeObject {
        self.objects.get_mut(&object).expect("object exists")
    }
}

impl ActorRegistry for FakeWorld {
    fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    fn actor_flags(&self, actor: ActorId) -> Option<ActorFlags> {
        self.actors.get(&actor).map(|entry| entry.flags)
    }
}

impl InventoryQuery for FakeWorld {
    fn held_count(&self, actor: ActorId, item_id: u32) -> u32 {
        self.actors
            .get(&actor)
            .and_then(|entry| entry.held.get(&item_id).copied())
            .unwrap_or(0)
    }

    fn has_item_equipped(&self, actor: ActorId, item_id: u32) -> bool {
        self.actors
            .get(&actor)
            .map_or(false, |entry| entry.equipped.contains(&item_id))
    }
}

impl WorldObjectQuery for FakeWorld {
    fn objects_near_actor(&self, actor: ActorId, entries: &[u32], range: f32) -> Vec<ObjectId> {
        let Some(origin) = self.actors.get(&actor).map(|entry| entry.position) else {
            return Vec::new();
        };
        self.objects
            .iter()
            .filter(|(_, object)| entries.contains(&object.entry))
            .filter(|(_, object)| {
                let dx = object.position.0 - origin.0;
                let dy = object.position.1 - origin.1;
                dx * dx + dy * dy <= range * range
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn object_owner(&self, object: ObjectId) -> Option<ActorId> {
        self.objects.get(&object).and_then(|entry| entry.owner)
    }

    fn object_kind(&self, object: ObjectId) -> Option<ObjectKind> {
        self.objects.get(&object).map(|entry| entry.kind)
    }

    fn object_state(&self, object: ObjectId) -> Option<ObjectState> {
        self.objects.get(&object).map(|entry| entry.state)
    }

    fn set_object_state(&mut self, object: ObjectId, state: ObjectState) {
        if let Some(entry) = self.objects.get_mut(&object) {
            entry.state = state;
        }
    }
}

impl Interactions for FakeWorld {
    fn use_object(&mut self, actor: ActorId, object: ObjectId) {
        self.used.push((actor, object));
        if let Some(entry) = self.objects.get_mut(&object) {
            entry.state = ObjectState::Activated;
        }
    }

    fn cast_self_spell(&mut self, actor: ActorId, spell_id: u32) {
        self.casts.push((actor, spell_id));
    }
}

impl LootSessions for FakeWorld {
    fn loot_target(&self, actor: ActorId) -> Option<LootTarget> {
        self.actors.get(&actor).and_then(|entry| entry.loot_target)
    }

    fn primary_slot_count(&self, object: ObjectId) -> u8 {
        self.objects
            .get(&object)
            .map_or(0, |entry| entry.primary_collected.len() as u8)
    }

    fn is_primary_slot_collected(&self, object: ObjectId, slot: u8) -> bool {
        self.objects.get(&object).map_or(false, |entry| {
            entry
                .primary_collected
                .get(slot as usize)
                .copied()
                .unwrap_or(false)
        })
    }

    fn quest_item_count(&self, object: ObjectId, _actor: ActorId) -> u8 {
        self.objects.get(&object).map_or(0, |entry| entry.quest_items)
    }

    fn ffa_item_count(&self, object: ObjectId, _actor: ActorId) -> u8 {
        self.objects.get(&object).map_or(0, |entry| entry.ffa_items)
    }

    fn store_loot_slot(&mut self, actor: ActorId, object: ObjectId, slot: u8) -> TransferResult {
        self.store_calls.push((actor, object, slot));
        if self
            .actors
            .get(&actor)
            .map_or(false, |entry| entry.inventory_full)
        {
            return TransferResult::InventoryFull;
        }
        let Some(entry) = self.objects.get_mut(&object) else {
            return TransferResult::InvalidSlot;
        };
        match entry.primary_collected.get_mut(slot as usize) {
            Some(collected) if *collected => TransferResult::AlreadyCollected,
            Some(collected) => {
                *collected = true;
                TransferResult::Stored
            }
            // Quest/free-for-all indices beyond the primary pool.
            None => TransferResult::Stored,
        }
    }

    fn currency(&self, object: ObjectId) -> u32 {
        self.objects.get(&object).map_or(0, |entry| entry.currency)
    }

    fn credit_currency(&mut self, actor: ActorId, amount: u32) {
        if let Some(entry) = self.actors.get_mut(&actor) {
            entry.currency = entry.currency.saturating_add(u64::from(amount));
        }
    }

    fn zero_currency(&mut self, object: ObjectId) {
        if let Some(entry) = self.objects.get_mut(&object) {
            entry.currency = 0;
        }
    }

    fn release_loot(&mut self, actor: ActorId, object: ObjectId) {
        self.released.push((actor, object));
        if let Some(entry) = self.actors.get_mut(&actor) {
            if entry.loot_target == Some(LootTarget::WorldObject(object)) {
                entry.loot_target = None;
            }
        }
    }
}
