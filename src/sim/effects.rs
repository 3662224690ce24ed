//! Transient visual effects
//!
//! Animation only. Removal is driven by the `DespawnEffect` timers scheduled
//! when each effect is spawned.

use glam::Vec3;

use super::state::{EffectKind, GameState};

/// Gravity applied to ejected shell casings
pub const SHELL_GRAVITY: f32 = 15.0;
/// Height a death burst rises over its lifetime
pub const DEATH_BURST_RISE: f32 = 5.0;

/// Advance every live effect by `dt`
pub fn animate_effects(state: &mut GameState, dt: f32) {
    for (_, effect) in state.effects.iter_mut() {
        effect.age += dt;
        let t = (effect.age / effect.lifetime.max(f32::EPSILON)).min(1.0);

        match &mut effect.kind {
            EffectKind::BulletTrail { .. } | EffectKind::MuzzleFlash => {
                effect.alpha = 1.0 - t;
            }
            EffectKind::HitSpark => {
                effect.scale = 1.0 + t;
                effect.alpha = 1.0 - t;
            }
            EffectKind::DeathBurst { .. } => {
                effect.position.y += DEATH_BURST_RISE / effect.lifetime * dt;
                effect.scale = 1.0 - t;
                effect.alpha = 1.0 - t;
            }
            EffectKind::ShellCasing { velocity } => {
                if effect.position.y > 0.0 {
                    velocity.y -= SHELL_GRAVITY * dt;
                    effect.position += *velocity * dt;
                }
                if effect.position.y <= 0.0 {
                    // Resting on the floor
                    effect.position.y = 0.0;
                    *velocity = Vec3::ZERO;
                }
            }
        }
    }
}
