use tracing::{debug, info};

use crate::config::AutoFishConfig;
use crate::host::{ActorId, AutoFishHost, LootTarget, ObjectKind, ObjectState};

mod gate;
mod loot;
#[cfg(test)]
mod testhost;
mod timers;

pub use gate::requirement_met;
pub use timers::TimerTable;

/// Lifetime totals of what the engine has done, in the order things happen:
/// scan passes run, trigger objects used, then deferred actions fired or
/// skipped when their timers expired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutomationCounts {
    pub scan_passes: u32,
    pub triggers_fired: u32,
    pub recasts_fired: u32,
    pub recasts_skipped: u32,
    pub loots_collected: u32,
    pub loots_skipped: u32,
    pub loot_transfers_failed: u32,
}

/// The tick-driven automation engine. One instance owns both timer tables and
/// the scan accumulator; hosts call [`AutoFishEngine::tick`] from their update
/// callback and [`AutoFishEngine::apply_config`] on configuration reloads.
/// Everything runs on the caller's stack: no threads, no blocking, no
/// globals, so multiple engines can drive independent worlds in one process.
#[derive(Debug)]
pub struct AutoFishEngine {
    config: AutoFishConfig,
    scan_accumulator_ms: u32,
    recast_timers: TimerTable,
    loot_timers: TimerTable,
    counts: AutomationCounts,
}

impl AutoFishEngine {
    pub fn new(config: AutoFishConfig) -> Self {
        let mut engine = Self {
            config: AutoFishConfig::default(),
            scan_accumulator_ms: 0,
            recast_timers: TimerTable::new(),
            loot_timers: TimerTable::new(),
            counts: AutomationCounts::default(),
        };
        engine.apply_config(config);
        engine
    }

    pub fn config(&self) -> &AutoFishConfig {
        &self.config
    }

    /// Swap in a freshly parsed snapshot wholesale. Pending timer entries are
    /// kept; they fire against the new snapshot.
    pub fn apply_config(&mut self, config: AutoFishConfig) {
        info!(
            enabled = config.enabled,
            server_auto_loot = config.server_auto_loot,
            auto_recast = config.auto_recast,
            tick_ms = config.tick_ms,
            scan_range = config.scan_range,
            recast_delay_ms = config.recast_delay_ms,
            recast_spell = config.recast_spell,
            auto_loot_delay_ms = config.auto_loot_delay_ms,
            required_item_id = config.required_item_id,
            required_equip_id = config.required_equip_id,
            trigger_entries = ?config.trigger_entries,
            "config_applied"
        );
        self.config = config;
    }

    /// Process one host tick of `diff_ms` elapsed time. A disabled engine is
    /// fully suspended: neither the scan accumulator nor the timer tables
    /// advance until it is re-enabled.
    pub fn tick<H: AutoFishHost>(&mut self, host: &mut H, diff_ms: u32) {
        if !self.config.enabled {
            return;
        }

        self.scan_accumulator_ms = self.scan_accumulator_ms.saturating_add(diff_ms);
        if self.scan_accumulator_ms >= self.config.tick_ms {
            self.scan_accumulator_ms = 0;
            self.run_scan_pass(host);
        }

        self.advance_loot_timers(host, diff_ms);
        self.advance_recast_timers(host, diff_ms);
    }

    pub fn pending_recasts(&self) -> usize {
        self.recast_timers.len()
    }

    pub fn pending_loots(&self) -> usize {
        self.loot_timers.len()
    }

    pub fn recast_remaining_ms(&self, actor: ActorId) -> Option<u32> {
        self.recast_timers.remaining_ms(actor)
    }

    pub fn loot_remaining_ms(&self, actor: ActorId) -> Option<u32> {
        self.loot_timers.remaining_ms(actor)
    }

    pub fn scan_accumulator_ms(&self) -> u32 {
        self.scan_accumulator_ms
    }

    pub fn reset_scan_accumulator(&mut self) {
        self.scan_accumulator_ms = 0;
    }

    /// Drop every pending entry, the shutdown path. Nothing fires.
    pub fn clear_timers(&mut self) {
        self.recast_timers.clear();
        self.loot_timers.clear();
    }

    pub fn counts(&self) -> AutomationCounts {
        self.counts
    }

    fn run_scan_pass<H: AutoFishHost>(&mut self, host: &mut H) {
        self.counts.scan_passes = self.counts.scan_passes.saturating_add(1);
        for actor in host.actor_ids() {
            let Some(flags) = host.actor_flags(actor) else {
                continue;
            };
            if !flags.in_world || flags.privileged {
                continue;
            }
            self.try_trigger(host, actor);
        }
    }

    /// Use at most one ready, owned trigger object near the actor, then seed
    /// the deferred collection and recast.
    fn try_trigger<H: AutoFishHost>(&mut self, host: &mut H, actor: ActorId) {
        if !requirement_met(host, &self.config, actor) {
            return;
        }

        let candidates =
            host.objects_near_actor(actor, &self.config.trigger_entries, self.config.scan_range);
        for object in candidates {
            if host.object_owner(object) != Some(actor) {
                continue;
            }
            if host.object_state(object) != Some(ObjectState::Ready) {
                continue;
            }
            if host.object_kind(object) != Some(ObjectKind::FishingNode) {
                continue;
            }

            host.use_object(actor, object);
            self.counts.triggers_fired = self.counts.triggers_fired.saturating_add(1);
            debug!(actor = actor.0, object = object.0, "trigger_object_used");

            self.schedule_auto_loot(actor);
            self.schedule_recast(host, actor);
            return;
        }
    }

    fn schedule_recast<H: AutoFishHost>(&mut self, host: &H, actor: ActorId) {
        if !self.config.auto_recast {
            return;
        }
        let in_world = host
            .actor_flags(actor)
            .map_or(false, |flags| flags.in_world);
        if !in_world {
            return;
        }
        self.recast_timers.schedule(actor, self.config.recast_delay_ms);
    }

    fn schedule_auto_loot(&mut self, actor: ActorId) {
        if !self.config.server_auto_loot {
            return;
        }
        self.loot_timers.schedule(actor, self.config.auto_loot_delay_ms);
    }

    fn advance_recast_timers<H: AutoFishHost>(&mut self, host: &mut H, diff_ms: u32) {
        for actor in self.recast_timers.advance(diff_ms) {
            // Eligibility is re-checked now; the actor's state may have
            // changed during the delay window.
            let ready = host.actor_flags(actor).map_or(false, |flags| {
                flags.in_world && flags.alive && !flags.in_combat
            }) && requirement_met(host, &self.config, actor);

            if ready {
                host.cast_self_spell(actor, self.config.recast_spell);
                self.counts.recasts_fired = self.counts.recasts_fired.saturating_add(1);
                debug!(
                    actor = actor.0,
                    spell = self.config.recast_spell,
                    "recast_fired"
                );
            } else {
                self.counts.recasts_skipped = self.counts.recasts_skipped.saturating_add(1);
                debug!(actor = actor.0, "recast_skipped");
            }
        }
    }

    fn advance_loot_timers<H: AutoFishHost>(&mut self, host: &mut H, diff_ms: u32) {
        for actor in self.loot_timers.advance(diff_ms) {
            let eligible = host
                .actor_flags(actor)
                .map_or(false, |flags| flags.in_world)
                && requirement_met(host, &self.config, actor);

            let target = if eligible { host.loot_target(actor) } else { None };
            match target {
                Some(LootTarget::WorldObject(object)) => {
                    let sweep = loot::collect_container(host, actor, object);
                    self.counts.loots_collected = self.counts.loots_collected.saturating_add(1);
                    self.counts.loot_transfers_failed = self
                        .counts
                        .loot_transfers_failed
                        .saturating_add(sweep.failed);
                }
                Some(LootTarget::Other) | None => {
                    self.counts.loots_skipped = self.counts.loots_skipped.saturating_add(1);
                    debug!(actor = actor.0, "auto_loot_skipped");
                }
            }
        }
    }
}
