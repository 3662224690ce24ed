//! Arena Shooter headless runner
//!
//! Drives the simulation with a scripted bot at a fixed frame rate, logging
//! waves, kills and game overs. Useful for balance checks and soak runs.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use env_logger::{Builder, Env};
    use glam::Vec2;
    use log::LevelFilter;

    use arena_shooter::consts::{ENEMY_CHEST_HEIGHT, PLAYER_EYE_HEIGHT, SIM_DT};
    use arena_shooter::hud::HudModel;
    use arena_shooter::persistence::FileStore;
    use arena_shooter::sim::{
        ArenaQuery, GameEvent, GamePhase, GameState, Services, TickInput, tick,
    };
    use arena_shooter::{HighScore, Tuning, distance_xz, normalize_angle, yaw_towards};

    #[derive(Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct Args {
        /// RNG seed for the run
        #[arg(short, long, default_value_t = 1)]
        seed: u64,

        /// Number of frames to simulate
        #[arg(short, long, default_value_t = 60 * 60 * 5)]
        frames: u32,

        /// Games to play before stopping
        #[arg(short, long, default_value_t = 3)]
        games: u32,

        /// JSON balance file (defaults are used when absent)
        #[arg(short, long)]
        tuning: Option<PathBuf>,

        /// Where the high score is kept
        #[arg(long, default_value = "highscore.txt")]
        high_score_file: PathBuf,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    }

    /// Max turn per frame for the bot (radians)
    const BOT_TURN: f32 = 0.08;
    /// Bot fires when its aim is within this of the target
    const BOT_AIM_TOLERANCE: f32 = 0.03;

    fn init_logging(verbose: bool) {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let env = Env::default().default_filter_or(level.to_string());
        let _ = Builder::from_env(env).try_init();
    }

    /// Turn toward the nearest enemy, shoot when lined up, reload when dry
    fn bot_input(state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        match state.phase {
            GamePhase::Menu | GamePhase::GameOver => {
                input.start = true;
                return input;
            }
            GamePhase::Playing => {}
        }

        let player = &state.player;
        let nearest = state
            .enemies
            .iter()
            .map(|(_, e)| (distance_xz(e.position, player.position), e.position))
            .min_by(|a, b| a.0.total_cmp(&b.0));
        let Some((dist, target)) = nearest else {
            return input;
        };

        let yaw_error = normalize_angle(yaw_towards(player.position, target) - player.yaw);
        let pitch = (ENEMY_CHEST_HEIGHT - PLAYER_EYE_HEIGHT).atan2(dist.max(0.1));
        input.look_delta = Vec2::new(
            yaw_error.clamp(-BOT_TURN, BOT_TURN),
            (pitch - player.pitch).clamp(-BOT_TURN, BOT_TURN),
        );

        // Keep some distance from grunts
        input.move_axis = if dist < 6.0 {
            Vec2::new(0.0, -1.0)
        } else {
            Vec2::new(1.0, 0.0)
        };

        if player.ammo == 0 {
            input.reload = !player.reloading;
        } else {
            input.fire = yaw_error.abs() < BOT_AIM_TOLERANCE;
        }
        input
    }

    pub fn run() {
        let args = Args::parse();
        init_logging(args.verbose);
        log::info!("Arena Shooter (headless) starting, seed {}", args.seed);

        let tuning = match &args.tuning {
            Some(path) => Tuning::load_or_default(path),
            None => Tuning::default(),
        };
        let mut store = FileStore::new(&args.high_score_file);
        let high_score = HighScore::load(&store);
        let mut state = GameState::new(args.seed, tuning, high_score);
        let mut hud = HudModel::new();

        let mut games = 0;
        let mut kills = 0u32;
        for frame in 0..args.frames {
            if state.phase == GamePhase::GameOver && games >= args.games {
                break;
            }
            let input = bot_input(&state);
            let mut services = Services {
                query: &ArenaQuery,
                scores: &mut store,
            };
            tick(&mut state, &input, SIM_DT, &mut services);

            for event in state.drain_events() {
                match &event {
                    GameEvent::WaveStarted(wave) => log::info!("Frame {frame}: wave {wave}"),
                    GameEvent::EnemyKilled { kind, .. } => {
                        kills += 1;
                        log::debug!("Frame {frame}: {kind:?} down");
                    }
                    GameEvent::GameOver {
                        score,
                        high_score,
                        new_record,
                    } => {
                        games += 1;
                        log::info!(
                            "Frame {frame}: game {games} over, score {score} (best {high_score}{})",
                            if *new_record { ", new record" } else { "" }
                        );
                    }
                    _ => {}
                }
                hud.apply(&event);
            }
            if state.exit_requested {
                break;
            }
        }

        log::info!(
            "Finished: {games} games, {kills} kills, {} / {} / {} / {}",
            hud.score_text,
            hud.wave_banner.as_deref().unwrap_or("no wave"),
            hud.health_text,
            hud.ammo_text,
        );
        log::info!("High score {} kept in {}", state.high_score.best, store.path().display());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host engine on this target
}
