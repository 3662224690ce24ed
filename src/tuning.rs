//! Data-driven game balance
//!
//! Every gameplay number the simulation uses lives here so a JSON file can
//! rebalance a run without recompiling. Missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors raised while loading a tuning file
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Player stats and weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: i32,
    pub max_ammo: u32,
    /// Walk speed (units/s)
    pub move_speed: f32,
    /// Seconds from reload start to full magazine
    pub reload_time: f32,
    pub shot_damage: i32,
    /// Hitscan range of a shot
    pub shot_range: f32,
    /// Trail end distance when a shot hits nothing
    pub miss_trail_length: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_ammo: 30,
            move_speed: 5.0,
            reload_time: 1.0,
            shot_damage: 25,
            shot_range: 100.0,
            miss_trail_length: 50.0,
        }
    }
}

/// Base melee enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GruntTuning {
    pub health: i32,
    pub speed: f32,
    pub score_value: u64,
    /// Whisker ray length
    pub whisker_length: f32,
    /// Short forward ray checked before translating
    pub step_check_length: f32,
    /// Fixed avoidance turn rate (degrees/s)
    pub turn_rate_degrees: f32,
    /// Heading interpolation factor per second while pursuing
    pub heading_lerp: f32,
    /// Translation stops within this horizontal distance of the player
    pub stop_distance: f32,
    /// Contact damage can land within this horizontal distance
    pub melee_range: f32,
    /// Per-frame chance of landing contact damage
    pub contact_chance: f64,
    pub contact_damage: i32,
    /// Enemies farther than this skip their update entirely
    pub cull_distance: f32,
}

impl Default for GruntTuning {
    fn default() -> Self {
        Self {
            health: 100,
            speed: 3.5,
            score_value: 100,
            whisker_length: 2.5,
            step_check_length: 1.0,
            turn_rate_degrees: 400.0,
            heading_lerp: 5.0,
            stop_distance: 2.0,
            melee_range: 2.5,
            contact_chance: 0.02,
            contact_damage: 10,
            cull_distance: 45.0,
        }
    }
}

impl GruntTuning {
    /// Avoidance turn rate in radians/s
    pub fn turn_rate(&self) -> f32 {
        self.turn_rate_degrees.to_radians()
    }
}

/// Ranged stand-off enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SniperTuning {
    pub health: i32,
    pub speed: f32,
    pub score_value: u64,
    /// Lower edge of the stand-off band
    pub min_distance: f32,
    /// Width of the stand-off band above `min_distance`
    pub band_width: f32,
    /// Clearance ray length checked before backing off or advancing
    pub clearance_length: f32,
    /// Seconds between shots
    pub attack_cooldown: f32,
    pub projectile_speed: f32,
    pub projectile_damage: i32,
    /// Projectile lifetime (seconds)
    pub projectile_ttl: f32,
}

impl Default for SniperTuning {
    fn default() -> Self {
        Self {
            health: 50,
            speed: 3.5,
            score_value: 200,
            min_distance: 15.0,
            band_width: 5.0,
            clearance_length: 1.5,
            attack_cooldown: 2.0,
            projectile_speed: 15.0,
            projectile_damage: 20,
            projectile_ttl: 5.0,
        }
    }
}

/// Wave composition and spawn placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub base_count: u32,
    pub count_per_wave: u32,
    /// First wave where snipers may appear
    pub sniper_from_wave: u32,
    pub sniper_chance: f64,
    /// Extra grunt health per wave after the first
    pub health_per_wave: i32,
    /// Spawn positions are drawn from ±this on X and Z
    pub spawn_half_extent: i32,
    /// Required horizontal distance from the player
    pub min_spawn_distance: f32,
    pub spawn_attempts: u32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_count: 3,
            count_per_wave: 2,
            sniper_from_wave: 2,
            sniper_chance: 0.3,
            health_per_wave: 10,
            spawn_half_extent: 40,
            min_spawn_distance: 10.0,
            spawn_attempts: 20,
        }
    }
}

impl WaveTuning {
    /// Number of enemies spawned for a wave
    pub fn enemy_count(&self, wave: u32) -> u32 {
        self.base_count + self.count_per_wave * wave
    }
}

/// Loot drops and pickups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LootTuning {
    pub drop_chance: f64,
    /// Share of drops that are health (rest are ammo)
    pub health_share: f64,
    pub pickup_radius: f32,
    pub health_amount: i32,
    pub ammo_amount: u32,
    /// Grace period between pickup and removal
    pub despawn_delay: f32,
}

impl Default for LootTuning {
    fn default() -> Self {
        Self {
            drop_chance: 0.3,
            health_share: 0.5,
            pickup_radius: 1.5,
            health_amount: 25,
            ammo_amount: 10,
            despawn_delay: 0.1,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub grunt: GruntTuning,
    pub sniper: SniperTuning,
    pub waves: WaveTuning,
    pub loot: LootTuning,
}

impl Tuning {
    /// Parse tuning from JSON text
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let chances = [
            ("loot.drop_chance", self.loot.drop_chance),
            ("loot.health_share", self.loot.health_share),
            ("grunt.contact_chance", self.grunt.contact_chance),
            ("waves.sniper_chance", self.waves.sniper_chance),
        ];
        for (name, p) in chances {
            if !(0.0..=1.0).contains(&p) {
                return Err(TuningError::Invalid(format!("{name} must be in [0, 1], got {p}")));
            }
        }
        if self.player.max_health <= 0 {
            return Err(TuningError::Invalid(format!(
                "player.max_health must be positive, got {}",
                self.player.max_health
            )));
        }
        if self.waves.spawn_half_extent < 0 {
            return Err(TuningError::Invalid(format!(
                "waves.spawn_half_extent must not be negative, got {}",
                self.waves.spawn_half_extent
            )));
        }
        Ok(())
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load tuning, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({e})");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = Tuning::default();
        assert_eq!(t.player.max_ammo, 30);
        assert_eq!(t.player.shot_damage, 25);
        assert_eq!(t.grunt.contact_damage, 10);
        assert_eq!(t.sniper.min_distance, 15.0);
        assert_eq!(t.waves.enemy_count(1), 5);
        assert_eq!(t.waves.enemy_count(4), 11);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "player": { "max_ammo": 12 }, "waves": { "base_count": 1 } }"#;
        let t = Tuning::from_json(json).unwrap();
        assert_eq!(t.player.max_ammo, 12);
        assert_eq!(t.player.max_health, 100);
        assert_eq!(t.waves.base_count, 1);
        assert_eq!(t.waves.count_per_wave, 2);
        assert_eq!(t.sniper.health, 50);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    fn assert_invalid(json: &str) {
        assert!(
            matches!(Tuning::from_json(json), Err(TuningError::Invalid(_))),
            "accepted {json}"
        );
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_chances() {
        assert_invalid(r#"{ "loot": { "drop_chance": 1.5 } }"#);
        assert_invalid(r#"{ "loot": { "drop_chance": -0.1 } }"#);
        assert_invalid(r#"{ "loot": { "health_share": 2.0 } }"#);
        assert_invalid(r#"{ "grunt": { "contact_chance": -1.0 } }"#);
        assert_invalid(r#"{ "waves": { "sniper_chance": 1.01 } }"#);
    }

    #[test]
    fn test_accepts_boundary_chances() {
        let json = r#"{ "loot": { "drop_chance": 1.0, "health_share": 0.0 } }"#;
        assert!(Tuning::from_json(json).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_max_health() {
        assert_invalid(r#"{ "player": { "max_health": -1 } }"#);
        assert_invalid(r#"{ "player": { "max_health": 0 } }"#);
    }

    #[test]
    fn test_rejects_negative_spawn_extent() {
        assert_invalid(r#"{ "waves": { "spawn_half_extent": -1 } }"#);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.json");
        std::fs::write(&path, r#"{ "loot": { "drop_chance": 1.5 } }"#).unwrap();
        assert!(matches!(Tuning::load(&path), Err(TuningError::Invalid(_))));

        let t = Tuning::load_or_default(&path);
        assert_eq!(t.loot.drop_chance, 0.3);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let t = Tuning::load_or_default(Path::new("/definitely/not/here.json"));
        assert_eq!(t.grunt.health, 100);
    }

    #[test]
    fn test_turn_rate_radians() {
        let t = GruntTuning::default();
        assert!((t.turn_rate() - 400.0_f32.to_radians()).abs() < 1e-6);
    }
}
