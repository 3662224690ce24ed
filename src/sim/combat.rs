//! Combat resolution
//!
//! Player hitscan shots, reloads, enemy damage and death, player damage,
//! sniper projectiles and loot pickups.

use glam::Vec3;
use rand::Rng;

use super::query::{HitTarget, Ignore, Ray, SpatialQuery};
use super::state::{
    Deferred, EffectKind, Enemy, EnemyKey, EnemyKind, GameEvent, GameState, LootKey, LootKind,
    Player, Projectile,
};
use crate::consts::{ENEMY_CHEST_HEIGHT, HIT_FLASH_DURATION, PROJECTILE_RADIUS};
use crate::{distance_xz, normalize_angle, yaw_right};

/// Something that can be shot at
pub trait CombatTarget {
    fn health(&self) -> i32;

    /// Subtract `amount` from health and trigger hit feedback
    fn apply_damage(&mut self, amount: i32);

    /// Enemies can be targeted by the player's weapon
    fn is_enemy(&self) -> bool;

    fn is_dead(&self) -> bool {
        self.health() <= 0
    }
}

impl CombatTarget for Enemy {
    fn health(&self) -> i32 {
        self.health
    }

    fn apply_damage(&mut self, amount: i32) {
        // Not clamped: the killing blow may leave health negative
        self.health -= amount;
        self.flash = HIT_FLASH_DURATION;
    }

    fn is_enemy(&self) -> bool {
        true
    }
}

impl CombatTarget for Player {
    fn health(&self) -> i32 {
        self.health
    }

    fn apply_damage(&mut self, amount: i32) {
        self.heal(-amount);
    }

    fn is_enemy(&self) -> bool {
        false
    }
}

/// Result of pulling the trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    /// A round was fired; `hit` is what the ray struck
    Fired { hit: Option<HitTarget> },
    /// Magazine empty: reload prompt shown
    Empty,
    /// Reload in progress
    Reloading,
}

/// Lifetimes of transient effects (seconds)
pub mod effect_lifetime {
    pub const BULLET_TRAIL: f32 = 0.1;
    pub const HIT_SPARK: f32 = 0.5;
    pub const DEATH_BURST: f32 = 1.0;
    pub const MUZZLE_FLASH: f32 = 0.05;
    pub const SHELL_CASING: f32 = 1.5;
}

/// Fire the player's weapon along the camera axis
pub fn fire_weapon(state: &mut GameState, query: &dyn SpatialQuery) -> ShotOutcome {
    if state.player.reloading {
        return ShotOutcome::Reloading;
    }
    if state.player.ammo == 0 {
        state.emit(GameEvent::ReloadPrompt(true));
        return ShotOutcome::Empty;
    }

    state.player.ammo -= 1;
    state.notify_ammo();

    let p = &state.player;
    let (eye, aim, muzzle) = (p.eye(), p.aim(), p.muzzle());
    let shell_dir = yaw_right(p.yaw) - aim * 0.5;
    spawn_gun_effects(state, muzzle, shell_dir);

    let tuning = &state.tuning.player;
    let ray = Ray::new(eye, aim, tuning.shot_range);
    let miss_end = eye + aim * tuning.miss_trail_length;
    let damage = tuning.shot_damage;
    let hit = query.raycast(state, &ray, &Ignore::player());

    let end = hit.map_or(miss_end, |h| h.point);
    state.spawn_effect(
        EffectKind::BulletTrail { end },
        muzzle,
        effect_lifetime::BULLET_TRAIL,
    );

    let mut hit_enemy = false;
    if let Some(hit) = hit {
        if let HitTarget::Enemy(id) = hit.target {
            hit_enemy = true;
            damage_enemy(state, id, damage);
            state.spawn_effect(EffectKind::HitSpark, hit.point, effect_lifetime::HIT_SPARK);
        }
    }
    state.emit(GameEvent::ShotFired { hit_enemy });

    ShotOutcome::Fired {
        hit: hit.map(|h| h.target),
    }
}

fn spawn_gun_effects(state: &mut GameState, muzzle: Vec3, shell_dir: Vec3) {
    state.spawn_effect(EffectKind::MuzzleFlash, muzzle, effect_lifetime::MUZZLE_FLASH);

    let rng = &mut state.rng;
    let velocity = shell_dir * rng.random_range(3.0f32..5.0)
        + Vec3::Y * 4.0
        + Vec3::new(rng.random_range(-1.0..1.0), 0.0, rng.random_range(-1.0..1.0));
    state.spawn_effect(
        EffectKind::ShellCasing { velocity },
        muzzle,
        effect_lifetime::SHELL_CASING,
    );
}

/// Begin reloading. No-op if already reloading or the magazine is full.
pub fn start_reload(state: &mut GameState) -> bool {
    let p = &state.player;
    if p.reloading || p.ammo == p.max_ammo {
        return false;
    }
    state.player.reloading = true;
    state.emit(GameEvent::ReloadPrompt(false));
    let delay = state.tuning.player.reload_time;
    state.timers.schedule(state.clock, delay, Deferred::FinishReload);
    true
}

/// Refill the magazine at the end of a reload
pub fn finish_reload(state: &mut GameState) {
    if !state.player.reloading {
        return;
    }
    state.player.ammo = state.player.max_ammo;
    state.player.reloading = false;
    state.notify_ammo();
}

/// Damage an enemy, resolving its death. Returns true if this hit killed it.
/// Stale handles are ignored.
pub fn damage_enemy(state: &mut GameState, id: EnemyKey, amount: i32) -> bool {
    let Some(enemy) = state.enemies.get_mut(id) else {
        return false;
    };
    enemy.apply_damage(amount);
    if enemy.is_dead() {
        kill_enemy(state, id);
        return true;
    }
    false
}

/// Score, loot roll, removal with marker, death burst
fn kill_enemy(state: &mut GameState, id: EnemyKey) {
    let Some(enemy) = state.despawn_enemy(id) else {
        return;
    };
    let kind = enemy.marker_kind();
    log::debug!("Enemy {id:?} ({kind:?}) killed, +{}", enemy.score_value);

    state.add_score(enemy.score_value);

    let loot = &state.tuning.loot;
    let (drop_chance, health_share) = (loot.drop_chance, loot.health_share);
    if state.rng.random_bool(drop_chance) {
        let loot_kind = if state.rng.random_bool(health_share) {
            LootKind::Health
        } else {
            LootKind::Ammo
        };
        state.spawn_loot(loot_kind, enemy.position);
        state.emit(GameEvent::LootDropped(loot_kind));
    }

    state.spawn_effect(
        EffectKind::DeathBurst { kind },
        enemy.body().center(),
        effect_lifetime::DEATH_BURST,
    );
    state.emit(GameEvent::EnemyKilled {
        kind,
        position: enemy.position,
        score_value: enemy.score_value,
    });
}

/// Damage the player with HUD feedback. Death is resolved by the caller.
pub fn damage_player(state: &mut GameState, amount: i32) {
    state.player.apply_damage(amount);
    state.screen_flash = 1.0;
    state.emit(GameEvent::PlayerDamaged(amount));
    state.notify_health();
}

/// Launch a projectile from a sniper at the player
pub fn sniper_fire(state: &mut GameState, id: EnemyKey) {
    let clock = state.clock;
    let tuning = state.tuning.sniper.clone();
    let target = state.player.position + Vec3::Y * ENEMY_CHEST_HEIGHT;
    let Some(enemy) = state.enemies.get_mut(id) else {
        return;
    };
    let EnemyKind::Sniper(sniper) = &mut enemy.kind else {
        return;
    };
    sniper.last_attack = Some(clock);
    enemy.flash = HIT_FLASH_DURATION;

    let origin = enemy.chest();
    let direction = (target - origin).normalize_or(enemy.forward());
    state.projectiles.insert(Projectile {
        position: origin,
        direction,
        speed: tuning.projectile_speed,
        damage: tuning.projectile_damage,
        ttl: tuning.projectile_ttl,
    });
    state.emit(GameEvent::SniperFired);
}

/// Advance projectiles and resolve their collisions.
/// Stops early once the player is dead.
pub fn update_projectiles(state: &mut GameState, dt: f32, query: &dyn SpatialQuery) {
    for id in state.projectiles.keys().collect::<Vec<_>>() {
        let Some(p) = state.projectiles.get_mut(id) else {
            continue;
        };
        p.position += p.direction * p.speed * dt;
        p.ttl -= dt;
        if p.ttl <= 0.0 {
            state.projectiles.remove(id);
            continue;
        }
        let (position, damage) = (p.position, p.damage);

        let hits = query.overlap_sphere(state, position, PROJECTILE_RADIUS);
        if hits.contains(&HitTarget::Player) {
            state.projectiles.remove(id);
            damage_player(state, damage);
            if state.player.is_dead() {
                return;
            }
        } else if hits.iter().any(|h| !h.is_enemy()) {
            state.projectiles.remove(id);
        }
    }
}

/// Collect a loot pickup. Returns false if it was already consumed or gone,
/// so overlapping triggers apply the bonus once.
pub fn pickup_loot(state: &mut GameState, id: LootKey) -> bool {
    let Some(loot) = state.loot.get_mut(id) else {
        return false;
    };
    if loot.consumed {
        return false;
    }
    loot.consumed = true;
    let kind = loot.kind;

    let tuning = &state.tuning.loot;
    let (health, ammo, delay) = (tuning.health_amount, tuning.ammo_amount, tuning.despawn_delay);
    match kind {
        LootKind::Health => {
            state.player.heal(health);
            state.notify_health();
        }
        LootKind::Ammo => {
            state.player.add_ammo(ammo);
            state.notify_ammo();
        }
    }
    log::debug!("Picked up {kind:?}");
    state.emit(GameEvent::LootPicked(kind));
    state.timers.schedule(state.clock, delay, Deferred::DespawnLoot(id));
    true
}

/// Spin loot and collect anything the player is standing on
pub fn update_loot(state: &mut GameState, dt: f32) {
    let player = state.player.position;
    let radius = state.tuning.loot.pickup_radius;
    let mut touched = Vec::new();
    for (id, loot) in state.loot.iter_mut() {
        if loot.consumed {
            continue;
        }
        loot.spin = normalize_angle(loot.spin + std::f32::consts::PI * dt);
        if distance_xz(loot.position, player) < radius {
            touched.push(id);
        }
    }
    for id in touched {
        pickup_loot(state, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use crate::sim::query::ArenaQuery;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        let mut s = GameState::new(11, Tuning::default(), Default::default());
        s.phase = GamePhase::Playing;
        s
    }

    fn grunt_at(s: &mut GameState, pos: Vec3) -> EnemyKey {
        let t = s.tuning.clone();
        s.spawn_enemy(Enemy::grunt(pos, 1, &t.grunt, t.waves.health_per_wave))
    }

    #[test]
    fn test_shot_hits_enemy_in_front() {
        let mut s = state();
        let id = grunt_at(&mut s, Vec3::new(0.0, 0.0, 10.0));
        let outcome = fire_weapon(&mut s, &ArenaQuery);
        assert_eq!(outcome, ShotOutcome::Fired { hit: Some(HitTarget::Enemy(id)) });
        assert_eq!(s.enemies.get(id).unwrap().health, 75);
        assert_eq!(s.player.ammo, 29);
        assert!(s.enemies.get(id).unwrap().flash > 0.0);
        let sparks = s.effects.iter().filter(|(_, e)| e.kind == EffectKind::HitSpark).count();
        assert_eq!(sparks, 1);
    }

    #[test]
    fn test_miss_trail_ends_fifty_units_out() {
        let mut s = state();
        // Looking up into open sky
        s.player.pitch = 0.5;
        let outcome = fire_weapon(&mut s, &ArenaQuery);
        assert_eq!(outcome, ShotOutcome::Fired { hit: None });
        let end = s
            .effects
            .iter()
            .find_map(|(_, e)| match e.kind {
                EffectKind::BulletTrail { end } => Some(end),
                _ => None,
            })
            .unwrap();
        assert!((end.distance(s.player.eye()) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_thirty_first_shot_rejected() {
        let mut s = state();
        for _ in 0..30 {
            assert!(matches!(fire_weapon(&mut s, &ArenaQuery), ShotOutcome::Fired { .. }));
        }
        assert_eq!(s.player.ammo, 0);
        s.drain_events();
        assert_eq!(fire_weapon(&mut s, &ArenaQuery), ShotOutcome::Empty);
        assert_eq!(s.player.ammo, 0);
        assert_eq!(s.events(), &[GameEvent::ReloadPrompt(true)]);
    }

    #[test]
    fn test_cannot_fire_while_reloading() {
        let mut s = state();
        s.player.ammo = 3;
        assert!(start_reload(&mut s));
        assert_eq!(fire_weapon(&mut s, &ArenaQuery), ShotOutcome::Reloading);
        assert_eq!(s.player.ammo, 3);
    }

    #[test]
    fn test_reload_cycle() {
        let mut s = state();
        // Full magazine: nothing to do
        assert!(!start_reload(&mut s));

        s.player.ammo = 4;
        assert!(start_reload(&mut s));
        assert!(!start_reload(&mut s));
        assert!(s.events().contains(&GameEvent::ReloadPrompt(false)));

        let due = s.timers.drain_due(s.clock + 1.0);
        assert_eq!(due, vec![Deferred::FinishReload]);
        finish_reload(&mut s);
        assert_eq!(s.player.ammo, 30);
        assert!(!s.player.reloading);
    }

    #[test]
    fn test_kill_awards_score_once() {
        let mut s = state();
        let id = grunt_at(&mut s, Vec3::new(0.0, 0.0, 10.0));
        let marker = s.marker_of(id).unwrap();

        assert!(!damage_enemy(&mut s, id, 25));
        assert!(!damage_enemy(&mut s, id, 25));
        assert!(!damage_enemy(&mut s, id, 25));
        assert_eq!(s.enemies.get(id).unwrap().health, 25);
        assert!(damage_enemy(&mut s, id, 30));

        assert_eq!(s.score, 100);
        assert!(!s.enemies.contains_key(id));
        assert!(!s.markers.contains_key(marker));
        assert!(s.marker_links.is_empty());

        // Further hits on the dead handle change nothing
        assert!(!damage_enemy(&mut s, id, 30));
        assert_eq!(s.score, 100);
        let kills = s
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 1);
        let bursts = s
            .effects
            .iter()
            .filter(|(_, e)| matches!(e.kind, EffectKind::DeathBurst { .. }))
            .count();
        assert_eq!(bursts, 1);
    }

    #[test]
    fn test_guaranteed_loot_drop() {
        let mut s = state();
        s.tuning.loot.drop_chance = 1.0;
        s.tuning.loot.health_share = 1.0;
        let id = grunt_at(&mut s, Vec3::new(4.0, 0.0, 4.0));
        damage_enemy(&mut s, id, 1000);
        assert_eq!(s.loot.len(), 1);
        let (_, loot) = s.loot.iter().next().unwrap();
        assert_eq!(loot.kind, LootKind::Health);
        assert!(!loot.consumed);
    }

    #[test]
    fn test_player_damage_clamps_and_flashes() {
        let mut s = state();
        damage_player(&mut s, 30);
        assert_eq!(s.player.health, 70);
        assert_eq!(s.screen_flash, 1.0);
        damage_player(&mut s, 500);
        assert_eq!(s.player.health, 0);
        assert!(s.player.is_dead());
    }

    #[test]
    fn test_double_pickup_applies_once() {
        let mut s = state();
        s.player.health = 50;
        let id = s.spawn_loot(LootKind::Health, Vec3::new(0.5, 0.0, 0.0));

        update_loot(&mut s, 0.016);
        update_loot(&mut s, 0.016);
        assert!(!pickup_loot(&mut s, id));
        assert_eq!(s.player.health, 75);

        // Removal is deferred, not immediate
        assert!(s.loot.contains_key(id));
        assert_eq!(s.timers.drain_due(s.clock + 0.1), vec![Deferred::DespawnLoot(id)]);
    }

    #[test]
    fn test_ammo_pickup_clamps() {
        let mut s = state();
        s.player.ammo = 25;
        let id = s.spawn_loot(LootKind::Ammo, Vec3::ZERO);
        assert!(pickup_loot(&mut s, id));
        assert_eq!(s.player.ammo, 30);
    }

    #[test]
    fn test_far_loot_stays() {
        let mut s = state();
        let id = s.spawn_loot(LootKind::Ammo, Vec3::new(5.0, 0.0, 0.0));
        update_loot(&mut s, 0.016);
        assert!(!s.loot.get(id).unwrap().consumed);
    }

    #[test]
    fn test_projectile_hits_player() {
        let mut s = state();
        s.projectiles.insert(Projectile {
            position: Vec3::new(0.0, 1.5, 1.0),
            direction: -Vec3::Z,
            speed: 15.0,
            damage: 20,
            ttl: 5.0,
        });
        update_projectiles(&mut s, 0.05, &ArenaQuery);
        assert!(s.projectiles.is_empty());
        assert_eq!(s.player.health, 80);
    }

    #[test]
    fn test_projectile_passes_through_enemies() {
        let mut s = state();
        grunt_at(&mut s, Vec3::new(0.0, 0.0, 5.0));
        s.projectiles.insert(Projectile {
            position: Vec3::new(0.0, 1.5, 6.0),
            direction: -Vec3::Z,
            speed: 15.0,
            damage: 20,
            ttl: 5.0,
        });
        update_projectiles(&mut s, 0.05, &ArenaQuery);
        assert_eq!(s.projectiles.len(), 1);
        assert_eq!(s.player.health, 100);
    }

    #[test]
    fn test_projectile_stopped_by_geometry_and_expires() {
        let mut s = state();
        s.obstacles = crate::sim::arena::boundary_walls();
        s.projectiles.insert(Projectile {
            position: Vec3::new(49.0, 1.5, 0.0),
            direction: Vec3::X,
            speed: 15.0,
            damage: 20,
            ttl: 5.0,
        });
        s.projectiles.insert(Projectile {
            position: Vec3::new(0.0, 3.0, 20.0),
            direction: Vec3::Z,
            speed: 1.0,
            damage: 20,
            ttl: 0.01,
        });
        update_projectiles(&mut s, 0.05, &ArenaQuery);
        assert!(s.projectiles.is_empty());
        assert_eq!(s.player.health, 100);
    }

    #[test]
    fn test_sniper_fire_aims_at_player() {
        let mut s = state();
        let t = s.tuning.clone();
        let id = s.spawn_enemy(Enemy::sniper(Vec3::new(0.0, 0.0, 16.0), &t.sniper));
        s.clock = 3.0;
        sniper_fire(&mut s, id);
        let (_, p) = s.projectiles.iter().next().unwrap();
        assert!((p.direction - (-Vec3::Z)).length() < 1e-5);
        match &s.enemies.get(id).unwrap().kind {
            EnemyKind::Sniper(sn) => assert_eq!(sn.last_attack, Some(3.0)),
            _ => unreachable!(),
        }
    }
}
