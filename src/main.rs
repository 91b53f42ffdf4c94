/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use tracing::{error, info};

use config::GameConfig;
use error::AppError;
use sim::event::GameEvent;
use sim::world::{Arcade, Phase};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{play_events, AudioSink, SoundEngine};
use ui::view::{ViewState, MESSAGE_TIME};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    if let Err(e) = logging::init(config.log_file.as_deref()) {
        eprintln!("{e}; continuing without a log file");
    }
    config.report();
    info!(difficulty = config.difficulty.label(), sound = config.sound.enabled, "starting");

    let mut arcade = Arcade::new(config.difficulty);

    let sound = if config.sound.enabled {
        SoundEngine::new(config.sound.volume)
    } else {
        None
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sink = sound.as_ref().map(|s| s as &dyn AudioSink);
    let result = game_loop(&mut arcade, &mut renderer, sink, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }
    info!("exiting");

    println!();
    println!("Thanks for playing Mole Whack!");
    if let Some(s) = arcade.session() {
        println!("Final Score: {}", s.score());
    }
}

fn game_loop(
    arcade: &mut Arcade,
    renderer: &mut Renderer,
    sound: Option<&dyn AudioSink>,
    config: &GameConfig,
) -> Result<(), AppError> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        info!("gamepad detected");
    }
    let mut view = ViewState::new();
    let mut last_frame = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let mut events = Vec::new();
        let was_playing = arcade.phase == Phase::Playing;
        if handle_meta(arcade, &mut view, &kb, &gp, &mut events) {
            break;
        }
        // The key that starts a session must not also whack in it.
        if was_playing && arcade.phase == Phase::Playing && !arcade.is_paused() {
            route_whacks(arcade, renderer, &mut view, &kb, &gp, &mut events);
        }

        // Real elapsed time drives both session clocks.
        let now = Instant::now();
        events.extend(arcade.advance(now - last_frame));
        last_frame = now;

        play_events(sound, &events);
        view.apply_events(&events, now);
        view.expire(now);

        renderer.render(arcade, &view)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P'), KeyCode::F(1)];
const KEYS_DIFFICULTY: &[KeyCode] = &[KeyCode::Tab];

/// Session-level controls: start, pause, end, quit, difficulty.
/// Returns true when the player wants to quit.
fn handle_meta(
    arcade: &mut Arcade,
    view: &mut ViewState,
    kb: &InputState,
    gp: &GamepadState,
    events: &mut Vec<GameEvent>,
) -> bool {
    let esc = kb.any_pressed(&[KeyCode::Esc]) || gp.cancel_pressed();

    match arcade.phase {
        Phase::Title | Phase::GameOver => {
            if esc {
                return true;
            }
            if kb.any_pressed(KEYS_CONFIRM) || gp.whack_pressed() {
                events.extend(arcade.start_new_session());
            } else if kb.any_pressed(KEYS_DIFFICULTY) && arcade.cycle_difficulty() {
                let msg = format!("Difficulty: {}", arcade.difficulty.label());
                view.set_message(&msg, MESSAGE_TIME, Instant::now());
            }
        }
        Phase::Playing => {
            if kb.any_pressed(KEYS_PAUSE) || gp.pause_pressed() {
                events.extend(arcade.toggle_pause());
            } else if esc {
                events.extend(arcade.end_session());
            }
        }
    }
    false
}

/// Every way of hitting a cell: mouse, direct cell keys, cursor + confirm.
fn route_whacks(
    arcade: &mut Arcade,
    renderer: &Renderer,
    view: &mut ViewState,
    kb: &InputState,
    gp: &GamepadState,
    events: &mut Vec<GameEvent>,
) {
    for &(col, row) in kb.clicks() {
        if let Some(cell) = renderer.cell_at(col, row) {
            events.extend(arcade.click(cell));
        }
    }

    for cell in kb.pressed_cells() {
        events.extend(arcade.click(cell));
    }

    // Cursor
    let arrows = [
        (KeyCode::Up, (-1, 0)),
        (KeyCode::Down, (1, 0)),
        (KeyCode::Left, (0, -1)),
        (KeyCode::Right, (0, 1)),
    ];
    for (code, (d_row, d_col)) in arrows {
        if kb.was_pressed(code) {
            view.move_cursor(d_row, d_col);
        }
    }
    if let Some((d_row, d_col)) = gp.cursor_step() {
        view.move_cursor(d_row, d_col);
    }

    if kb.any_pressed(KEYS_CONFIRM) || gp.whack_pressed() {
        view.cursor_visible = true;
        events.extend(arcade.click(view.cursor));
    }
}
