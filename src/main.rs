mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{
        self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::AppConfig;
use view::AppView;
use controller::AppController;
use model::{AppModel, FileStorage, OmdbClient, WatchedStore};

const APP_TITLE: &str = "popcorn";

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply
    let _ = dotenvy::dotenv();

    let cfg = AppConfig::from_env()?;

    if let Err(e) = logging::init_logging(&cfg.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== popcorn starting ===");

    let api = OmdbClient::new(cfg.api_base.clone(), cfg.api_key.clone());
    let storage = FileStorage::new(cfg.data_dir.clone());
    let watched = WatchedStore::open(Arc::new(storage), cfg.watched_slot.clone());
    tracing::info!(
        data_dir = %cfg.data_dir.display(),
        watched = watched.len(),
        "Watched list loaded"
    );

    let model = Arc::new(Mutex::new(AppModel::new(Arc::new(api), watched)));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(APP_TITLE))?;

    // Shortcuts fire on key-up where the terminal reports it, key-down otherwise
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    let trigger = if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
        KeyEventKind::Release
    } else {
        KeyEventKind::Press
    };
    tracing::debug!(?trigger, "Keyboard shortcut trigger selected");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let controller = AppController::new(model.clone(), trigger);

    let res = run_app(&mut terminal, model.clone(), &controller).await;

    controller.deactivate().await;

    // Restore terminal
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, SetTitle(""))?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("popcorn shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: &AppController,
) -> io::Result<()> {
    let mut shown_title = String::from(APP_TITLE);

    loop {
        let (search, ui_state, watched, summary, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_search_snapshot().await,
                model_guard.get_ui_state().await,
                model_guard.get_watched_items().await,
                model_guard.get_watched_summary().await,
                model_guard.should_quit().await,
            )
        };

        let title = match ui_state.details.as_ref().and_then(|d| d.title()) {
            Some(movie) => format!("Movie | {}", movie),
            None => APP_TITLE.to_string(),
        };
        if title != shown_title {
            execute!(terminal.backend_mut(), SetTitle(&title))?;
            shown_title = title;
        }

        terminal.draw(|f| {
            AppView::render(f, &search, &ui_state, &watched, &summary);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
