pub mod automation;
pub mod config;
pub mod host;

pub use automation::{requirement_met, AutoFishEngine, AutomationCounts, TimerTable};
pub use config::{parse_entry_list, AutoFishConfig, ConfigError, ConfigSource};
pub use host::{
    ActorFlags, ActorId, ActorRegistry, AutoFishHost, Interactions, InventoryQuery, LootSessions,
    LootTarget, ObjectId, ObjectKind, ObjectState, TransferResult, WorldObjectQuery,
};
