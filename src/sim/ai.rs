//! Per-frame enemy behaviour
//!
//! Grunts pursue with whisker avoidance and land stochastic contact damage.
//! Snipers lock onto the player, hold a stand-off band and fire projectiles on
//! a cooldown when they have line of sight.

use rand::Rng;

use super::combat;
use super::query::{HitTarget, Ignore, Ray, SpatialQuery};
use super::state::{EnemyKey, EnemyKind, GameEvent, GameState};
use super::steering::{StandOff, Whiskers, minimap_offset, stand_off, steer};
use crate::{distance_xz, yaw_forward, yaw_towards};

/// Update one enemy. Stale handles are ignored.
pub fn update_enemy(state: &mut GameState, id: EnemyKey, dt: f32, query: &dyn SpatialQuery) {
    let Some(enemy) = state.enemies.get(id) else {
        return;
    };
    match enemy.kind {
        EnemyKind::Grunt => update_grunt(state, id, dt, query),
        EnemyKind::Sniper(_) => update_sniper(state, id, dt, query),
    }
}

fn update_grunt(state: &mut GameState, id: EnemyKey, dt: f32, query: &dyn SpatialQuery) {
    let tuning = state.tuning.grunt.clone();
    let player = state.player.position;
    let Some(enemy) = state.enemies.get(id) else {
        return;
    };

    let dist = distance_xz(enemy.position, player);
    if dist > tuning.cull_distance {
        return;
    }

    let whiskers = Whiskers::cast(query, state, id, enemy, tuning.whisker_length);
    let steering = steer(whiskers, enemy.yaw, enemy.position, player, dt, &tuning);

    // Last look along the new heading before committing to a step
    let forward = yaw_forward(steering.yaw);
    let step = Ray::new(enemy.chest(), forward, tuning.step_check_length);
    let step_clear = !query.blocked(state, &step, &Ignore::enemy_and_player(id));
    let speed = enemy.speed * steering.speed_scale;

    let Some(enemy) = state.enemies.get_mut(id) else {
        return;
    };
    enemy.yaw = steering.yaw;
    if step_clear && dist > tuning.stop_distance {
        enemy.position += forward * dt * speed;
    }

    if dist < tuning.melee_range && state.rng.random_bool(tuning.contact_chance) {
        combat::damage_player(state, tuning.contact_damage);
    }

    update_marker(state, id);
}

fn update_sniper(state: &mut GameState, id: EnemyKey, dt: f32, query: &dyn SpatialQuery) {
    let tuning = state.tuning.sniper.clone();
    let player = state.player.position;
    let clock = state.clock;
    let Some(enemy) = state.enemies.get(id) else {
        return;
    };
    let EnemyKind::Sniper(sniper) = &enemy.kind else {
        return;
    };

    let dist = distance_xz(enemy.position, player);
    let yaw = yaw_towards(enemy.position, player);
    let forward = yaw_forward(yaw);
    let ignore = Ignore::enemy_and_player(id);
    let clear = |dir| {
        let ray = Ray::new(enemy.chest(), dir, tuning.clearance_length);
        !query.blocked(state, &ray, &ignore)
    };

    let step = match stand_off(dist, sniper.min_distance, tuning.band_width) {
        StandOff::Retreat if clear(-forward) => -1.0,
        StandOff::Advance if clear(forward) => 1.0,
        _ => 0.0,
    };
    let ready = sniper
        .last_attack
        .is_none_or(|last| clock > last + tuning.attack_cooldown);

    let Some(enemy) = state.enemies.get_mut(id) else {
        return;
    };
    enemy.yaw = yaw;
    enemy.position += forward * dt * enemy.speed * step;

    update_marker(state, id);

    if ready && has_line_of_sight(state, id, query) {
        combat::sniper_fire(state, id);
    }
}

/// Whether a ray from the enemy's chest toward the player reaches the player first
fn has_line_of_sight(state: &GameState, id: EnemyKey, query: &dyn SpatialQuery) -> bool {
    let Some(enemy) = state.enemies.get(id) else {
        return false;
    };
    let player = state.player.position;
    let dist = distance_xz(enemy.position, player);
    let ray = Ray::new(enemy.chest(), yaw_forward(yaw_towards(enemy.position, player)), dist);
    matches!(
        query.raycast(state, &ray, &Ignore::enemy(id)),
        Some(hit) if hit.target == HitTarget::Player
    )
}

/// Project an enemy onto its minimap marker
fn update_marker(state: &mut GameState, id: EnemyKey) {
    let Some(enemy) = state.enemies.get(id) else {
        return;
    };
    let offset = minimap_offset(enemy.position, state.player.position);
    let Some(marker) = state.marker_of(id) else {
        return;
    };
    if let Some(m) = state.markers.get_mut(marker) {
        m.offset = offset;
        state.emit(GameEvent::MarkerMoved { marker, offset });
    }
}
