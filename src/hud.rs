//! HUD display model
//!
//! Folds `GameEvent`s into the strings and values a host draws. Holds no
//! reference to the simulation; feed it events in order.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::sim::{GameEvent, GamePhase, MarkerKey, MarkerKind};

/// Ammo at or below this is shown as low
pub const LOW_AMMO: u32 = 5;

/// What the HUD currently shows
#[derive(Debug, Clone)]
pub struct HudModel {
    pub phase: GamePhase,
    /// `"H / MAX"`
    pub health_text: String,
    /// Health bar fill in [0, 1]
    pub health_fraction: f32,
    /// `"A / MAX"`
    pub ammo_text: String,
    pub ammo_low: bool,
    pub score_text: String,
    /// `"WAVE N"` after a wave starts
    pub wave_banner: Option<String>,
    pub reload_prompt: bool,
    /// Minimap markers by id with their offset from the player marker
    pub markers: BTreeMap<MarkerKey, (Vec2, MarkerKind)>,
    /// Damage vignette intensity, set to 1 on damage and decayed by the host
    pub damage_flash: f32,
    /// `("Final Score: N", "High Score: N")` while on the game-over screen
    pub game_over: Option<(String, String)>,
}

impl Default for HudModel {
    fn default() -> Self {
        Self {
            phase: GamePhase::Menu,
            health_text: String::new(),
            health_fraction: 1.0,
            ammo_text: String::new(),
            ammo_low: false,
            score_text: score_text(0),
            wave_banner: None,
            reload_prompt: false,
            markers: BTreeMap::new(),
            damage_flash: 0.0,
            game_over: None,
        }
    }
}

fn score_text(score: u64) -> String {
    format!("SCORE: {score}")
}

impl HudModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one notification
    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PhaseChanged(phase) => {
                self.phase = *phase;
                if *phase != GamePhase::GameOver {
                    self.game_over = None;
                }
            }
            GameEvent::HealthChanged { health, max } => {
                self.health_text = format!("{health} / {max}");
                self.health_fraction = if *max > 0 {
                    (*health as f32 / *max as f32).clamp(0.0, 1.0)
                } else {
                    0.0
                };
            }
            GameEvent::AmmoChanged { ammo, max } => {
                self.ammo_text = format!("{ammo} / {max}");
                self.ammo_low = *ammo <= LOW_AMMO;
            }
            GameEvent::ReloadPrompt(show) => self.reload_prompt = *show,
            GameEvent::ScoreChanged(score) => self.score_text = score_text(*score),
            GameEvent::WaveStarted(wave) => self.wave_banner = Some(format!("WAVE {wave}")),
            GameEvent::MarkerAdded { marker, kind } => {
                self.markers.insert(*marker, (Vec2::ZERO, *kind));
            }
            GameEvent::MarkerMoved { marker, offset } => {
                if let Some(entry) = self.markers.get_mut(marker) {
                    entry.0 = *offset;
                }
            }
            GameEvent::MarkerRemoved(marker) => {
                self.markers.remove(marker);
            }
            GameEvent::PlayerDamaged(_) => self.damage_flash = 1.0,
            GameEvent::GameOver {
                score, high_score, ..
            } => {
                self.game_over = Some((
                    format!("Final Score: {score}"),
                    format!("High Score: {high_score}"),
                ));
            }
            GameEvent::EnemyKilled { .. }
            | GameEvent::LootDropped(_)
            | GameEvent::LootPicked(_)
            | GameEvent::ShotFired { .. }
            | GameEvent::SniperFired
            | GameEvent::ExitRequested => {}
        }
    }

    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.apply(event);
        }
    }
}
