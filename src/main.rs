/// Entry point and host loop.

mod app;
mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use app::App;
use config::GameConfig;
use sim::leaderboard::{self, LeaderboardStore};
use sim::session::Session;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let data_dir = leaderboard::data_dir();
    // Held for the whole run; dropping it flushes the log file.
    let _log_guard = logging::init(&data_dir);
    info!(version = env!("CARGO_PKG_VERSION"), data_dir = %data_dir.display(), "starting");

    let config = GameConfig::load();
    let store = LeaderboardStore::open(config.leaderboard_path(&data_dir));
    let session = Session::new(config.round.difficulty, store, config.player.default_name.clone());
    let mut app = App::new(session, config.round.tick);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        error!(error = %e, "terminal init failed");
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    if sound.is_none() {
        warn!("no audio output, running silent");
    }

    let result = host_loop(&mut app, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!(error = %e, "host loop failed");
        eprintln!("Game error: {e}");
    }

    match serde_json::to_string(app.session().state()) {
        Ok(state) => debug!(%state, "final session state"),
        Err(e) => warn!(error = %e, "could not encode session state"),
    }
    let p = app.session().progression();
    info!(score = p.score(), level = p.level(), "exiting");
    println!();
    println!("Thanks for playing Hide & Seek: Labubu Edition!");
    println!("Score: {}  Level: {}", p.score(), p.level());
}

fn host_loop(
    app: &mut App,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    loop {
        kb.drain_events();
        let pad_intents = gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let now = Instant::now();
        let today = chrono::Local::now().date_naive();
        for intent in kb.intents().into_iter().chain(pad_intents) {
            app.handle(intent, now, today);
        }
        if app.should_quit() {
            break;
        }

        app.update(now);

        let cues = app.take_sounds();
        if let Some(sfx) = sound {
            for cue in cues {
                sfx.play(cue);
            }
        }

        renderer.render(app, now)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}
