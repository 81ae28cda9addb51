mod world;

use std::env;
use std::fs;

use autofish_engine::{AutoFishConfig, AutoFishEngine};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use world::{SimWorld, FISHING_POLE_ITEM};

const CONFIG_PATH_ENV_VAR: &str = "AUTOFISH_SIM_CONFIG";
const SIM_TICK_MS: u32 = 100;
const SIM_TICK_COUNT: u32 = 600;

fn main() {
    init_tracing();
    info!("=== AutoFish Sim Startup ===");

    let config = match load_config() {
        Ok(config) => config,
        Err(message) => {
            error!(error = %message, "config_load_failed");
            std::process::exit(1);
        }
    };

    let recast_spell = config.recast_spell;
    let mut world = SimWorld::new(recast_spell);
    let marlin = world.spawn_angler("marlin", (0.0, 0.0));
    let perch = world.spawn_angler("perch", (12.0, -4.0));
    let warden = world.spawn_angler("warden", (1.0, 1.0));
    let driftwood = world.spawn_angler("driftwood", (-8.0, 2.0));
    if let Some(angler) = world.angler_mut(warden) {
        angler.flags.privileged = true;
    }
    if let Some(angler) = world.angler_mut(driftwood) {
        angler.unequip(FISHING_POLE_ITEM);
    }
    for actor in [marlin, perch, warden, driftwood] {
        world.spawn_bobber_for(actor);
    }

    let mut engine = AutoFishEngine::new(config);
    for _ in 0..SIM_TICK_COUNT {
        engine.tick(&mut world, SIM_TICK_MS);
        world.despawn_deactivated();
    }

    let counts = engine.counts();
    info!(
        ticks = SIM_TICK_COUNT,
        tick_ms = SIM_TICK_MS,
        scan_passes = counts.scan_passes,
        triggers_fired = counts.triggers_fired,
        recasts_fired = counts.recasts_fired,
        recasts_skipped = counts.recasts_skipped,
        loots_collected = counts.loots_collected,
        loots_skipped = counts.loots_skipped,
        loot_transfers_failed = counts.loot_transfers_failed,
        bobbers_left = world.bobber_count(),
        "sim_complete"
    );
    for (actor, angler) in world.anglers() {
        info!(
            actor = actor.0,
            name = %angler.name,
            fish = world.fish_count(actor),
            currency = angler.currency,
            "angler_summary"
        );
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn load_config() -> Result<AutoFishConfig, String> {
    match env::var(CONFIG_PATH_ENV_VAR) {
        Ok(path) => {
            let raw = fs::read_to_string(&path)
                .map_err(|error| format!("read config '{path}': {error}"))?;
            parse_config_json(&raw)
        }
        Err(env::VarError::NotPresent) => Ok(showcase_config()),
        Err(error) => Err(format!("read {CONFIG_PATH_ENV_VAR}: {error}")),
    }
}

/// Without a config file the demo requires an equipped pole, so the angler
/// spawned without one sits out the whole run.
fn showcase_config() -> AutoFishConfig {
    AutoFishConfig {
        required_equip_id: FISHING_POLE_ITEM,
        ..AutoFishConfig::default()
    }
}

fn parse_config_json(raw: &str) -> Result<AutoFishConfig, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, AutoFishConfig>(&mut deserializer) {
        Ok(config) => Ok(config),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse config json: {source}"))
            } else {
                Err(format!("parse config json at {path}: {source}"))
            }
        }
    }
}
