//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything the simulation mutates. It is
//! passed explicitly to every update step; nothing lives in statics.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use slotmap::{SecondaryMap, SlotMap, new_key_type};

use super::arena::Obstacle;
use super::collision::Aabb;
use super::timers::TimerQueue;
use crate::consts::*;
use crate::highscores::HighScore;
use crate::tuning::{GruntTuning, SniperTuning, Tuning};
use crate::{yaw_forward, yaw_right};

new_key_type! {
    pub struct EnemyKey;
    pub struct MarkerKey;
    pub struct ProjectileKey;
    pub struct LootKey;
    pub struct EffectKey;
}

/// Top-level game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title menu (initial). Simulation suspended.
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for restart
    GameOver,
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Player {
    /// Feet position
    pub position: Vec3,
    /// Heading (radians, 0 faces +Z)
    pub yaw: f32,
    /// Camera pitch (radians, positive looks up)
    pub pitch: f32,
    pub health: i32,
    pub max_health: i32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub reloading: bool,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            health: tuning.player.max_health,
            max_health: tuning.player.max_health,
            ammo: tuning.player.max_ammo,
            max_ammo: tuning.player.max_ammo,
            reloading: false,
        }
    }

    /// Camera position
    pub fn eye(&self) -> Vec3 {
        self.position + Vec3::Y * PLAYER_EYE_HEIGHT
    }

    /// Camera forward axis (includes pitch)
    pub fn aim(&self) -> Vec3 {
        let flat = yaw_forward(self.yaw);
        (flat * self.pitch.cos() + Vec3::Y * self.pitch.sin()).normalize_or_zero()
    }

    /// Gun muzzle, offset to the lower right of the camera
    pub fn muzzle(&self) -> Vec3 {
        self.eye() + yaw_right(self.yaw) * 0.5 - Vec3::Y * 0.25 + self.aim() * 0.5
    }

    pub fn body(&self) -> Aabb {
        Aabb::from_center_half(
            self.position + Vec3::Y * PLAYER_HALF_EXTENTS.y,
            PLAYER_HALF_EXTENTS,
        )
    }

    /// Add health, clamped to [0, max]
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).clamp(0, self.max_health);
    }

    /// Add ammo, clamped to [0, max]
    pub fn add_ammo(&mut self, amount: u32) {
        self.ammo = self.ammo.saturating_add(amount).min(self.max_ammo);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

/// Sniper-specific state
#[derive(Debug, Clone, PartialEq)]
pub struct SniperState {
    /// Lower edge of the stand-off band
    pub min_distance: f32,
    /// Clock time of the last shot
    pub last_attack: Option<f32>,
}

/// Enemy variants
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyKind {
    /// Melee pursuer using whisker avoidance
    Grunt,
    /// Ranged attacker holding a stand-off band
    Sniper(SniperState),
}

/// An enemy entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Feet position
    pub position: Vec3,
    pub yaw: f32,
    pub health: i32,
    pub speed: f32,
    pub score_value: u64,
    /// Remaining hit-flash time
    pub flash: f32,
}

impl Enemy {
    /// Base enemy with wave health scaling
    pub fn grunt(position: Vec3, wave: u32, grunt: &GruntTuning, health_per_wave: i32) -> Self {
        let bonus = health_per_wave * wave.saturating_sub(1) as i32;
        Self {
            kind: EnemyKind::Grunt,
            position,
            yaw: 0.0,
            health: grunt.health + bonus,
            speed: grunt.speed,
            score_value: grunt.score_value,
            flash: 0.0,
        }
    }

    pub fn sniper(position: Vec3, sniper: &SniperTuning) -> Self {
        Self {
            kind: EnemyKind::Sniper(SniperState {
                min_distance: sniper.min_distance,
                last_attack: None,
            }),
            position,
            yaw: 0.0,
            health: sniper.health,
            speed: sniper.speed,
            score_value: sniper.score_value,
            flash: 0.0,
        }
    }

    pub fn is_sniper(&self) -> bool {
        matches!(self.kind, EnemyKind::Sniper(_))
    }

    pub fn forward(&self) -> Vec3 {
        yaw_forward(self.yaw)
    }

    pub fn right(&self) -> Vec3 {
        yaw_right(self.yaw)
    }

    /// Origin of whiskers and line-of-sight rays
    pub fn chest(&self) -> Vec3 {
        self.position + Vec3::Y * ENEMY_CHEST_HEIGHT
    }

    pub fn body(&self) -> Aabb {
        Aabb::from_center_half(
            self.position + Vec3::Y * ENEMY_HALF_EXTENTS.y,
            ENEMY_HALF_EXTENTS,
        )
    }

    pub fn marker_kind(&self) -> MarkerKind {
        match self.kind {
            EnemyKind::Grunt => MarkerKind::Grunt,
            EnemyKind::Sniper(_) => MarkerKind::Sniper,
        }
    }
}

/// Sniper projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub position: Vec3,
    /// Unit direction of travel
    pub direction: Vec3,
    pub speed: f32,
    pub damage: i32,
    /// Seconds left before it expires
    pub ttl: f32,
}

/// Loot types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LootKind {
    Health,
    Ammo,
}

/// A loot pickup
#[derive(Debug, Clone)]
pub struct Loot {
    pub position: Vec3,
    pub kind: LootKind,
    /// Set once on pickup, never cleared
    pub consumed: bool,
    /// Cosmetic spin (radians)
    pub spin: f32,
}

/// Transient visual effect types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    /// Tracer from the muzzle to `end`
    BulletTrail { end: Vec3 },
    /// Impact sphere where a shot struck an enemy
    HitSpark,
    /// Rising, shrinking cube left by a dead enemy
    DeathBurst { kind: MarkerKind },
    MuzzleFlash,
    /// Ejected shell under gravity
    ShellCasing { velocity: Vec3 },
}

/// A transient visual effect. Gameplay never reads these.
#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    pub position: Vec3,
    pub scale: f32,
    /// Opacity in [0, 1]
    pub alpha: f32,
    pub age: f32,
    pub lifetime: f32,
}

/// Minimap marker color class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Grunt,
    Sniper,
}

/// A minimap marker. Owned by `GameState::markers`, linked to its enemy only
/// through `GameState::marker_links`.
#[derive(Debug, Clone)]
pub struct Marker {
    pub kind: MarkerKind,
    /// Offset from the player marker in minimap units
    pub offset: Vec2,
}

/// Actions scheduled on the timer queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    DespawnLoot(LootKey),
    DespawnEffect(EffectKey),
    FinishReload,
}

/// Notifications for the host (HUD, audio, input capture)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged(GamePhase),
    HealthChanged { health: i32, max: i32 },
    AmmoChanged { ammo: u32, max: u32 },
    ReloadPrompt(bool),
    ScoreChanged(u64),
    WaveStarted(u32),
    MarkerAdded { marker: MarkerKey, kind: MarkerKind },
    MarkerMoved { marker: MarkerKey, offset: Vec2 },
    MarkerRemoved(MarkerKey),
    PlayerDamaged(i32),
    EnemyKilled { kind: MarkerKind, position: Vec3, score_value: u64 },
    LootDropped(LootKind),
    LootPicked(LootKind),
    ShotFired { hit_enemy: bool },
    SniperFired,
    GameOver { score: u64, high_score: u64, new_record: bool },
    ExitRequested,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// A `Playing` session was interrupted by escape and can be resumed
    pub suspended: bool,
    /// Exit was chosen from the menu
    pub exit_requested: bool,
    /// Simulation clock (seconds of `Playing` time)
    pub clock: f32,
    pub score: u64,
    pub high_score: HighScore,
    /// Current wave (0 before the first wave starts)
    pub wave: u32,
    pub player: Player,
    pub enemies: SlotMap<EnemyKey, Enemy>,
    pub markers: SlotMap<MarkerKey, Marker>,
    /// Enemy → minimap marker association
    pub marker_links: SecondaryMap<EnemyKey, MarkerKey>,
    pub projectiles: SlotMap<ProjectileKey, Projectile>,
    pub loot: SlotMap<LootKey, Loot>,
    pub effects: SlotMap<EffectKey, Effect>,
    pub obstacles: Vec<Obstacle>,
    pub timers: TimerQueue<Deferred>,
    /// Full-screen damage flash intensity in [0, 1]
    pub screen_flash: f32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state sitting in the menu
    pub fn new(seed: u64, tuning: Tuning, high_score: HighScore) -> Self {
        let player = Player::new(&tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Menu,
            suspended: false,
            exit_requested: false,
            clock: 0.0,
            score: 0,
            high_score,
            wave: 0,
            player,
            enemies: SlotMap::with_key(),
            markers: SlotMap::with_key(),
            marker_links: SecondaryMap::new(),
            projectiles: SlotMap::with_key(),
            loot: SlotMap::with_key(),
            effects: SlotMap::with_key(),
            obstacles: Vec::new(),
            timers: TimerQueue::new(),
            screen_flash: 0.0,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn live_enemies(&self) -> usize {
        self.enemies.len()
    }

    /// Add an enemy together with its minimap marker
    pub fn spawn_enemy(&mut self, enemy: Enemy) -> EnemyKey {
        let kind = enemy.marker_kind();
        let id = self.enemies.insert(enemy);
        let marker = self.markers.insert(Marker {
            kind,
            offset: Vec2::ZERO,
        });
        self.marker_links.insert(id, marker);
        self.emit(GameEvent::MarkerAdded { marker, kind });
        id
    }

    /// Remove an enemy together with its minimap marker.
    /// Returns `None` (and touches nothing) if the enemy is already gone.
    pub fn despawn_enemy(&mut self, id: EnemyKey) -> Option<Enemy> {
        let enemy = self.enemies.remove(id)?;
        if let Some(marker) = self.marker_links.remove(id) {
            self.markers.remove(marker);
            self.emit(GameEvent::MarkerRemoved(marker));
        }
        Some(enemy)
    }

    pub fn marker_of(&self, id: EnemyKey) -> Option<MarkerKey> {
        self.marker_links.get(id).copied()
    }

    /// Spawn a transient effect and schedule its removal
    pub fn spawn_effect(&mut self, kind: EffectKind, position: Vec3, lifetime: f32) -> EffectKey {
        let id = self.effects.insert(Effect {
            kind,
            position,
            scale: 1.0,
            alpha: 1.0,
            age: 0.0,
            lifetime,
        });
        self.timers.schedule(self.clock, lifetime, Deferred::DespawnEffect(id));
        id
    }

    pub fn spawn_loot(&mut self, kind: LootKind, position: Vec3) -> LootKey {
        self.loot.insert(Loot {
            position: position.with_y(0.5),
            kind,
            consumed: false,
            spin: 0.0,
        })
    }

    /// Remove a loot pickup and anything still scheduled against it
    pub fn despawn_loot(&mut self, id: LootKey) -> Option<Loot> {
        let loot = self.loot.remove(id)?;
        self.timers.cancel_where(|d| *d == Deferred::DespawnLoot(id));
        Some(loot)
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        self.emit(GameEvent::ScoreChanged(self.score));
    }

    pub fn notify_health(&mut self) {
        let (health, max) = (self.player.health, self.player.max_health);
        self.emit(GameEvent::HealthChanged { health, max });
    }

    pub fn notify_ammo(&mut self) {
        let (ammo, max) = (self.player.ammo, self.player.max_ammo);
        self.emit(GameEvent::AmmoChanged { ammo, max });
    }
}
