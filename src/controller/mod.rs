//! Controller module - Application logic and event handling
//!
//! - `keys`: named shortcut dispatcher with scoped bindings
//! - `input`: key event routing (focused panel first, then shortcuts)
//! - `details`: detail panel actions (open, rate, add to watched list)

mod keys;
mod input;
mod details;

use std::collections::HashSet;
use std::sync::Arc;
use crossterm::event::KeyEventKind;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::Mutex;

use crate::model::{ActiveSection, AppModel};

use keys::{KeyBinding, KeyDispatcher};

/// Work requested by a shortcut, executed by the controller after dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    ClearQuery,
    FocusSearch,
}

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    dispatcher: KeyDispatcher,
    bindings: Arc<Mutex<Vec<KeyBinding>>>,
    commands: Arc<Mutex<UnboundedReceiver<Command>>>,
    /// Names of keys whose press was consumed by a panel; their release is
    /// ignored. Keyed by name so a shifted press matches its unshifted release.
    swallowed: Arc<Mutex<HashSet<String>>>,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, trigger: KeyEventKind) -> Self {
        let dispatcher = KeyDispatcher::new(trigger);
        let (tx, rx) = mpsc::unbounded_channel();

        let escape_tx = tx.clone();
        let bindings = vec![
            dispatcher.register("Escape", move || {
                let _ = escape_tx.send(Command::ClearQuery);
            }),
            dispatcher.register("Enter", move || {
                let _ = tx.send(Command::FocusSearch);
            }),
        ];

        Self {
            model,
            dispatcher,
            bindings: Arc::new(Mutex::new(bindings)),
            commands: Arc::new(Mutex::new(rx)),
            swallowed: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Drop every shortcut and cancel outstanding requests.
    pub async fn deactivate(&self) {
        self.bindings.lock().await.clear();
        self.model.lock().await.shutdown().await;
        tracing::debug!("Controller deactivated");
    }

    pub(crate) async fn run_pending_commands(&self) {
        loop {
            let command = self.commands.lock().await.try_recv();
            let Ok(command) = command else {
                break;
            };
            tracing::debug!(?command, "Running shortcut command");
            let model = self.model.lock().await;
            match command {
                Command::ClearQuery => {
                    model.clear_search().await;
                    model.close_details().await;
                }
                Command::FocusSearch => {
                    if model.active_section().await != ActiveSection::Search {
                        model.set_active_section(ActiveSection::Search).await;
                    }
                }
            }
        }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        format!("Error: {:#}", error)
    }
}
