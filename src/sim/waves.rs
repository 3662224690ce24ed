//! Wave and spawn management
//!
//! A new wave starts whenever no enemies are alive during play. Each wave
//! spawns `base + per_wave * wave` enemies at validated positions away from
//! the player.

use glam::Vec3;
use rand::Rng;

use super::state::{Deferred, Enemy, GameEvent, GamePhase, GameState};
use crate::distance_xz;
use crate::tuning::{Tuning, WaveTuning};

/// A chosen spawn point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    /// No attempt satisfied the distance rule; `position` is the last attempt
    pub fallback: bool,
}

/// Pick a spawn point on the integer grid, at least `min_spawn_distance`
/// (exclusive) from the player
pub fn spawn_position<R: Rng>(rng: &mut R, player: Vec3, tuning: &WaveTuning) -> Placement {
    let extent = tuning.spawn_half_extent;
    let mut position = Vec3::ZERO;
    for _ in 0..tuning.spawn_attempts.max(1) {
        let x = rng.random_range(-extent..=extent) as f32;
        let z = rng.random_range(-extent..=extent) as f32;
        position = Vec3::new(x, 0.0, z);
        if distance_xz(position, player) > tuning.min_spawn_distance {
            return Placement {
                position,
                fallback: false,
            };
        }
    }
    Placement {
        position,
        fallback: true,
    }
}

/// Roll the enemy type for a spawn in `wave`
pub fn choose_enemy<R: Rng>(rng: &mut R, wave: u32, position: Vec3, tuning: &Tuning) -> Enemy {
    let waves = &tuning.waves;
    if wave >= waves.sniper_from_wave && rng.random_bool(waves.sniper_chance) {
        Enemy::sniper(position, &tuning.sniper)
    } else {
        Enemy::grunt(position, wave, &tuning.grunt, waves.health_per_wave)
    }
}

/// Advance the wave counter and spawn its enemies
pub fn start_next_wave(state: &mut GameState) {
    state.wave += 1;
    let wave = state.wave;
    let count = state.tuning.waves.enemy_count(wave);
    let player = state.player.position;

    let mut snipers = 0;
    for _ in 0..count {
        let placement = spawn_position(&mut state.rng, player, &state.tuning.waves);
        if placement.fallback {
            log::warn!(
                "No spawn point clear of the player after {} attempts, using {:?}",
                state.tuning.waves.spawn_attempts,
                placement.position
            );
        }
        let enemy = choose_enemy(&mut state.rng, wave, placement.position, &state.tuning);
        if enemy.is_sniper() {
            snipers += 1;
        }
        log::debug!("Spawning {:?} at {:?}", enemy.marker_kind(), enemy.position);
        state.spawn_enemy(enemy);
    }

    log::info!("Wave {wave}: {count} enemies ({snipers} snipers)");
    state.emit(GameEvent::WaveStarted(wave));
}

/// Start the next wave once the field is clear. Only runs while playing.
pub fn update_waves(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Playing || state.live_enemies() > 0 {
        return false;
    }
    start_next_wave(state);
    true
}

/// Back to wave 0 with nothing in flight
pub fn reset_waves(state: &mut GameState) {
    state.wave = 0;
    for id in state.enemies.keys().collect::<Vec<_>>() {
        state.despawn_enemy(id);
    }
    // Anything left untracked
    state.enemies.clear();
    state.markers.clear();
    state.marker_links.clear();

    state.projectiles.clear();
    state.loot.clear();
    state.effects.clear();
    state
        .timers
        .cancel_where(|d| matches!(d, Deferred::DespawnLoot(_) | Deferred::DespawnEffect(_)));
}
