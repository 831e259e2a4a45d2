//! Named keyboard shortcuts with scoped registration
//!
//! A binding lives as long as the [`KeyBinding`] guard returned by
//! [`KeyDispatcher::register`]; dropping the guard removes it. Actions run
//! while the registry lock is held, so they must not register or drop
//! bindings themselves.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

type Action = Box<dyn FnMut() + Send>;

struct Entry {
    id: u64,
    key: String,
    action: Action,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Clone)]
pub struct KeyDispatcher {
    registry: Arc<Mutex<Registry>>,
    trigger: KeyEventKind,
}

/// Keeps a shortcut registered until dropped
#[must_use = "the shortcut is removed as soon as the binding is dropped"]
pub struct KeyBinding {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for KeyBinding {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).entries.retain(|e| e.id != self.id);
        }
    }
}

impl KeyDispatcher {
    /// `trigger` is the event kind that fires actions: `Release` when the
    /// terminal reports key-up events, `Press` otherwise.
    pub fn new(trigger: KeyEventKind) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            trigger,
        }
    }

    pub fn trigger(&self) -> KeyEventKind {
        self.trigger
    }

    pub fn register<F>(&self, key: &str, action: F) -> KeyBinding
    where
        F: FnMut() + Send + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            key: canonical_name(key),
            action: Box::new(action),
        });
        tracing::trace!(key, id, "Shortcut registered");
        KeyBinding {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Run every action bound to this key. Returns how many ran.
    pub fn dispatch(&self, event: &KeyEvent) -> usize {
        if event.kind != self.trigger {
            return 0;
        }
        let Some(name) = key_name(event.code) else {
            return 0;
        };

        let mut registry = lock(&self.registry);
        let mut fired = 0;
        for entry in registry.entries.iter_mut().filter(|e| e.key == name) {
            (entry.action)();
            fired += 1;
        }
        if fired > 0 {
            tracing::debug!(key = %name, fired, "Shortcut dispatched");
        }
        fired
    }

    #[cfg(test)]
    pub fn binding_count(&self) -> usize {
        lock(&self.registry).entries.len()
    }
}

fn canonical_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    match lower.as_str() {
        "esc" => "escape".to_string(),
        "return" => "enter".to_string(),
        "" | " " => "space".to_string(),
        "up" => "arrowup".to_string(),
        "down" => "arrowdown".to_string(),
        "left" => "arrowleft".to_string(),
        "right" => "arrowright".to_string(),
        _ => lower,
    }
}

/// Lowercase name of a key, in the same vocabulary `canonical_name` produces.
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Esc => "escape".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "backtab".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Up => "arrowup".to_string(),
        KeyCode::Down => "arrowdown".to_string(),
        KeyCode::Left => "arrowleft".to_string(),
        KeyCode::Right => "arrowright".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::F(n) => format!("f{}", n),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().collect(),
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn fires_once_per_matching_release() {
        let dispatcher = KeyDispatcher::new(KeyEventKind::Release);
        let (count, action) = counter();
        let _binding = dispatcher.register("Escape", action);

        assert_eq!(dispatcher.dispatch(&event(KeyCode::Esc, KeyEventKind::Press)), 0);
        assert_eq!(dispatcher.dispatch(&event(KeyCode::Esc, KeyEventKind::Release)), 1);
        assert_eq!(dispatcher.dispatch(&event(KeyCode::Enter, KeyEventKind::Release)), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn names_match_case_insensitively() {
        let dispatcher = KeyDispatcher::new(KeyEventKind::Press);
        let (count, action) = counter();
        let _a = dispatcher.register("escape", action);
        let (count_b, action_b) = counter();
        let _b = dispatcher.register("ESC", action_b);
        let (count_k, action_k) = counter();
        let _k = dispatcher.register("K", action_k);

        dispatcher.dispatch(&event(KeyCode::Esc, KeyEventKind::Press));
        dispatcher.dispatch(&event(KeyCode::Char('k'), KeyEventKind::Press));
        dispatcher.dispatch(&event(KeyCode::Char('K'), KeyEventKind::Press));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
        assert_eq!(count_k.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropping_the_binding_deregisters() {
        let dispatcher = KeyDispatcher::new(KeyEventKind::Press);
        let (count, action) = counter();
        let binding = dispatcher.register("Enter", action);
        assert_eq!(dispatcher.binding_count(), 1);

        dispatcher.dispatch(&event(KeyCode::Enter, KeyEventKind::Press));
        drop(binding);
        assert_eq!(dispatcher.binding_count(), 0);
        assert_eq!(dispatcher.dispatch(&event(KeyCode::Enter, KeyEventKind::Press)), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn binding_outliving_dispatcher_is_harmless() {
        let dispatcher = KeyDispatcher::new(KeyEventKind::Press);
        let (_count, action) = counter();
        let binding = dispatcher.register("a", action);
        drop(dispatcher);
        drop(binding);
    }

    #[test]
    fn key_names() {
        assert_eq!(key_name(KeyCode::Esc).as_deref(), Some("escape"));
        assert_eq!(key_name(KeyCode::Char(' ')).as_deref(), Some("space"));
        assert_eq!(key_name(KeyCode::F(5)).as_deref(), Some("f5"));
        assert_eq!(key_name(KeyCode::Null), None);
        assert_eq!(canonical_name(" Return "), "enter");
    }
}
