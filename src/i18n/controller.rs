//! Locale state controller.
//!
//! Holds the active language for one visitor session and reconciles it with
//! the URL. The routing decision itself is the pure [`route_guard`]; the
//! controller adds persistence and change notification around it.

use crate::i18n::path::{detect_locale_in_path, localized_path, strip_locale_prefix};
use crate::i18n::preference::resolve_preferred_language;
use crate::i18n::Language;
use crate::storage::{PreferenceStore, LANGUAGE_KEY};
use tokio::sync::watch;
use tracing::debug;

/// How a navigation should affect history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Replace the current entry (locale redirects)
    Replace,
    /// Add a new entry (user-initiated language changes)
    Push,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: String,
    pub mode: NavigationMode,
}

/// Outcome of the pre-render guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// The path carries a locale; render the page in it.
    Render(Language),
    /// The path has no locale; go to the localized form first.
    Redirect(Navigation),
}

/// Decide what to do with an incoming path, given the preferred language.
///
/// A redirect target always carries a locale prefix, so feeding it back in
/// yields `Render`.
pub fn route_guard(path: &str, preferred: Language) -> RouteDecision {
    if let Some(language) = detect_locale_in_path(path) {
        return RouteDecision::Render(language);
    }

    let target = localized_path(preferred, path);
    if target == path {
        return RouteDecision::Render(preferred);
    }

    RouteDecision::Redirect(Navigation {
        to: target,
        mode: NavigationMode::Replace,
    })
}

/// Result of following guard redirects until a page can render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    pub path: String,
    pub language: Language,
    pub redirects: Vec<Navigation>,
}

/// Per-session locale state.
pub struct LocaleController {
    storage: PreferenceStore,
    browser_tags: Vec<String>,
    state: watch::Sender<Language>,
}

impl LocaleController {
    /// Start with the preferred language (stored, browser, default).
    pub fn new(storage: PreferenceStore, browser_tags: Vec<String>) -> Self {
        let initial = resolve_preferred_language(&storage, &browser_tags);
        let (state, _) = watch::channel(initial);
        Self {
            storage,
            browser_tags,
            state,
        }
    }

    /// Start from the locale in `path` when it has one, persisting it.
    pub fn for_location(path: &str, storage: PreferenceStore, browser_tags: Vec<String>) -> Self {
        match detect_locale_in_path(path) {
            Some(language) => {
                storage.set(LANGUAGE_KEY, language.code());
                let (state, _) = watch::channel(language);
                Self {
                    storage,
                    browser_tags,
                    state,
                }
            }
            None => Self::new(storage, browser_tags),
        }
    }

    /// The active language.
    pub fn language(&self) -> Language {
        *self.state.borrow()
    }

    /// Receive every change of the active language.
    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.state.subscribe()
    }

    /// Reconcile state with a navigation to `path`.
    pub fn on_navigate(&mut self, path: &str) -> RouteDecision {
        if let Some(found) = detect_locale_in_path(path) {
            if found != self.language() {
                debug!("Locale changed by navigation to {}: {}", path, found);
                self.apply(found);
            }
            return RouteDecision::Render(found);
        }

        let preferred = self.preferred();
        let decision = route_guard(path, preferred);
        if let RouteDecision::Redirect(ref navigation) = decision {
            debug!("No locale in {}, redirecting to {}", path, navigation.to);
        }
        decision
    }

    /// Navigate to `path` and follow guard redirects until a page renders.
    pub fn settle(&mut self, path: &str) -> Settled {
        let mut current = path.to_string();
        let mut redirects = Vec::new();

        loop {
            match self.on_navigate(&current) {
                RouteDecision::Render(language) => {
                    if language != self.language() {
                        self.apply(language);
                    }
                    return Settled {
                        path: current,
                        language,
                        redirects,
                    };
                }
                RouteDecision::Redirect(navigation) => {
                    current = navigation.to.clone();
                    redirects.push(navigation);
                }
            }
        }
    }

    /// Explicit user choice of `language` while on `current_path`.
    ///
    /// Returns the navigation to perform, if the URL has to change.
    pub fn select_language(&mut self, language: Language, current_path: &str) -> Option<Navigation> {
        self.apply(language);

        let target = localized_path(language, &strip_locale_prefix(current_path));
        if target == current_path {
            return None;
        }

        Some(Navigation {
            to: target,
            mode: NavigationMode::Push,
        })
    }

    fn preferred(&self) -> Language {
        resolve_preferred_language(&self.storage, &self.browser_tags)
    }

    fn apply(&mut self, language: Language) {
        self.storage.set(LANGUAGE_KEY, language.code());
        self.state.send_replace(language);
    }
}
