//! Per-frame simulation tick
//!
//! Runs the game-state machine, then (only while playing) fires due timers,
//! applies player actions and dispatches enemies, projectiles, loot, effects
//! and the wave manager in that order.

use glam::{Vec2, Vec3};

use super::arena::generate_arena;
use super::query::SpatialQuery;
use super::state::{Deferred, GameEvent, GamePhase, GameState, Player};
use super::{ai, combat, effects, waves};
use crate::consts::*;
use crate::normalize_angle;
use crate::persistence::ScoreStore;
use crate::{yaw_forward, yaw_right};

/// Player commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Strafe (x, positive right) and walk (y, positive forward), each in [-1, 1]
    pub move_axis: Vec2,
    /// Mouse-look this frame: yaw (x) and pitch (y) in radians
    pub look_delta: Vec2,
    pub fire: bool,
    pub reload: bool,
    /// Menu start button or game-over restart
    pub start: bool,
    pub escape: bool,
    /// Menu exit button
    pub exit: bool,
}

/// Collaborators the tick calls out to
pub struct Services<'a> {
    pub query: &'a dyn SpatialQuery,
    pub scores: &'a mut dyn ScoreStore,
}

/// Pitch stops just short of straight up/down
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, services: &mut Services) {
    handle_phase_input(state, input);

    if state.phase != GamePhase::Playing {
        return;
    }

    state.clock += dt;
    run_deferred(state);

    update_player(state, input, dt, services.query);

    for id in state.enemies.keys().collect::<Vec<_>>() {
        ai::update_enemy(state, id, dt, services.query);
        if state.player.is_dead() {
            break;
        }
    }
    if !state.player.is_dead() {
        combat::update_projectiles(state, dt, services.query);
    }
    if state.player.is_dead() {
        game_over(state, services.scores);
        return;
    }

    combat::update_loot(state, dt);
    effects::animate_effects(state, dt);
    decay_flashes(state, dt);
    waves::update_waves(state);
}

fn handle_phase_input(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Menu => {
            if input.exit {
                request_exit(state);
            } else if input.start {
                start_game(state);
            } else if input.escape {
                if state.suspended {
                    resume(state);
                } else {
                    start_game(state);
                }
            }
        }
        GamePhase::Playing => {
            if input.escape {
                suspend(state);
            }
        }
        GamePhase::GameOver => {
            if input.start {
                start_game(state);
            }
        }
    }
}

fn set_phase(state: &mut GameState, phase: GamePhase) {
    state.phase = phase;
    state.emit(GameEvent::PhaseChanged(phase));
}

/// Begin a fresh run: new arena, fresh player, wave 1
pub fn start_game(state: &mut GameState) {
    log::info!("Starting new game");
    state.score = 0;
    state.suspended = false;
    state.obstacles = generate_arena(&mut state.rng);
    state.player = Player::new(&state.tuning);
    state.screen_flash = 0.0;
    state.timers.clear();
    waves::reset_waves(state);

    state.emit(GameEvent::ScoreChanged(0));
    state.notify_health();
    state.notify_ammo();
    state.emit(GameEvent::ReloadPrompt(false));
    set_phase(state, GamePhase::Playing);

    waves::start_next_wave(state);
}

/// Pause the current run and return to the menu
pub fn suspend(state: &mut GameState) {
    log::debug!("Suspending at wave {}", state.wave);
    state.suspended = true;
    set_phase(state, GamePhase::Menu);
}

/// Continue a suspended run where it left off
pub fn resume(state: &mut GameState) {
    log::debug!("Resuming wave {}", state.wave);
    state.suspended = false;
    set_phase(state, GamePhase::Playing);
}

pub fn request_exit(state: &mut GameState) {
    state.exit_requested = true;
    state.emit(GameEvent::ExitRequested);
}

fn run_deferred(state: &mut GameState) {
    for action in state.timers.drain_due(state.clock) {
        match action {
            Deferred::DespawnLoot(id) => {
                state.despawn_loot(id);
            }
            Deferred::DespawnEffect(id) => {
                state.effects.remove(id);
            }
            Deferred::FinishReload => combat::finish_reload(state),
        }
    }
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32, query: &dyn SpatialQuery) {
    let player = &mut state.player;
    // Non-finite host input is ignored
    let look = if input.look_delta.is_finite() {
        input.look_delta
    } else {
        Vec2::ZERO
    };
    player.yaw = normalize_angle(player.yaw + look.x);
    player.pitch = (player.pitch + look.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);

    let axis = if input.move_axis.is_finite() {
        input.move_axis.clamp_length_max(1.0)
    } else {
        Vec2::ZERO
    };
    let step = (yaw_right(player.yaw) * axis.x + yaw_forward(player.yaw) * axis.y)
        * state.tuning.player.move_speed
        * dt;
    let limit = Vec3::new(1.0, 0.0, 1.0) * (ARENA_HALF_EXTENT - PLAYER_WALL_MARGIN);
    player.position = (player.position + step).clamp(-limit, limit);

    if input.reload {
        combat::start_reload(state);
    }
    if input.fire {
        combat::fire_weapon(state, query);
    }
}

fn decay_flashes(state: &mut GameState, dt: f32) {
    state.screen_flash = (state.screen_flash - dt / SCREEN_FLASH_DURATION).max(0.0);
    for (_, enemy) in state.enemies.iter_mut() {
        enemy.flash = (enemy.flash - dt).max(0.0);
    }
}

/// End the run and record the score
fn game_over(state: &mut GameState, scores: &mut dyn ScoreStore) {
    let score = state.score;
    let new_record = state.high_score.submit(score, scores);
    let high_score = state.high_score.best;
    log::info!("Game over at wave {}: score {score}, best {high_score}", state.wave);

    state.suspended = false;
    state.emit(GameEvent::GameOver {
        score,
        high_score,
        new_record,
    });
    set_phase(state, GamePhase::GameOver);
}
