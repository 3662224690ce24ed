//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic for a
//! given seed and input sequence:
//! - One `tick` per host frame, single-threaded
//! - Seeded RNG only
//! - Stable iteration order (slot map order)
//! - No rendering or platform dependencies; the scene is reached through
//!   `SpatialQuery`

pub mod ai;
pub mod arena;
pub mod collision;
pub mod combat;
pub mod effects;
pub mod query;
pub mod state;
pub mod steering;
pub mod tick;
pub mod timers;
pub mod waves;

pub use arena::{Obstacle, ObstacleKind, generate_arena};
pub use collision::Aabb;
pub use combat::{CombatTarget, ShotOutcome};
pub use query::{ArenaQuery, HitTarget, Ignore, Ray, RayHit, SpatialQuery};
pub use state::{
    Deferred, Effect, EffectKey, EffectKind, Enemy, EnemyKey, EnemyKind, GameEvent, GamePhase,
    GameState, Loot, LootKey, LootKind, Marker, MarkerKey, MarkerKind, Player, Projectile,
    ProjectileKey,
};
pub use tick::{Services, TickInput, tick};
pub use timers::TimerQueue;
