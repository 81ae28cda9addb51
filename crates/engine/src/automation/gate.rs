use crate::config::AutoFishConfig;
use crate::host::{ActorId, ActorRegistry, InventoryQuery};

/// Eligibility gate: pure predicate, safe to call from both the scan path and
/// the timer-expiry path. An absent actor fails; a required-item or
/// required-equip id of zero disables that check; when both are configured,
/// both must pass.
pub fn requirement_met<H>(host: &H, config: &AutoFishConfig, actor: ActorId) -> bool
where
    H: ActorRegistry + InventoryQuery + ?Sized,
{
    if host.actor_flags(actor).is_none() {
        return false;
    }
    if config.required_item_id != 0 && host.held_count(actor, config.required_item_id) < 1 {
        return false;
    }
    if config.required_equip_id != 0 && !host.has_item_equipped(actor, config.required_equip_id) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::super::testhost::FakeWorld;
    use super::*;
    use crate::host::ActorId;

    const LURE_ITEM: u32 = 6_529;
    const POLE_ITEM: u32 = 6_256;

    #[test]
    fn no_requirements_means_everyone_passes() {
        let mut world = FakeWorld::new();
        let angler = world.add_actor(1);
        let config = AutoFishConfig::default();

        assert!(requirement_met(&world, &config, angler));
    }

    #[test]
    fn absent_actor_always_fails() {
        let world = FakeWorld::new();
        let config = AutoFishConfig::default();

        assert!(!requirement_met(&world, &config, ActorId(99)));
    }

    #[test]
    fn required_item_needs_quantity_of_at_least_one() {
        let mut world = FakeWorld::new();
        let angler = world.add_actor(1);
        let config = AutoFishConfig {
            required_item_id: LURE_ITEM,
            ..AutoFishConfig::default()
        };

        assert!(!requirement_met(&world, &config, angler));

        world.actor_mut(angler).held.insert(LURE_ITEM, 1);
        assert!(requirement_met(&world, &config, angler));
    }

    #[test]
    fn required_equip_checks_equipment_slots_not_bags() {
        let mut world = FakeWorld::new();
        let angler = world.add_actor(1);
        let config = AutoFishConfig {
            required_equip_id: POLE_ITEM,
            ..AutoFishConfig::default()
        };

        // Holding the item in a bag is not enough.
        world.actor_mut(angler).held.insert(POLE_ITEM, 1);
        assert!(!requirement_met(&world, &config, angler));

        world.actor_mut(angler).equipped.insert(POLE_ITEM);
        assert!(requirement_met(&world, &config, angler));
    }

    #[test]
    fn both_requirements_must_pass_when_both_configured() {
        let mut world = FakeWorld::new();
        let angler = world.add_actor(1);
        let config = AutoFishConfig {
            required_item_id: LURE_ITEM,
            required_equip_id: POLE_ITEM,
            ..AutoFishConfig::default()
        };

        world.actor_mut(angler).held.insert(LURE_ITEM, 3);
        assert!(!requirement_met(&world, &config, angler));

        world.actor_mut(angler).equipped.insert(POLE_ITEM);
        assert!(requirement_met(&world, &config, angler));

        world.actor_mut(angler).held.remove(&LURE_ITEM);
        assert!(!requirement_met(&world, &config, angler));
    }
}
