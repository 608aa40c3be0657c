//! Fallback view for the top-level error boundary.
//!
//! The boundary catches errors rendered anywhere under the router, including
//! a missing or invalid API configuration at startup. Retry reloads the page
//! so startup runs again; the reset button also wipes local storage first.

#[cfg(test)]
#[path = "error_fallback_test.rs"]
mod error_fallback_test;

use leptos::error::Errors;
use leptos::prelude::*;

use crate::util::auth::LOGIN_ROUTE;
use crate::util::storage::{BrowserStorage, KeyValueStorage};

#[component]
pub fn ErrorFallback(errors: ArcRwSignal<Errors>) -> impl IntoView {
    let messages = {
        let errors = errors.clone();
        move || fallback_messages(errors.with(|errs| errs.iter().map(|(_, e)| e.to_string()).collect()))
    };

    let on_retry = move |_| {
        errors.set(Errors::default());
        reload_at(None);
    };

    let on_reset = move |_| {
        if let Err(e) = BrowserStorage.clear() {
            log::error!("failed to clear local data: {e}");
        }
        reload_at(Some(LOGIN_ROUTE));
    };

    view! {
        <div class="error-fallback">
            <div class="alert alert--error">
                <h2 class="alert__title">"Something went wrong"</h2>
                <ul class="error-fallback__list">
                    {move || messages().into_iter().map(|m| view! { <li>{m}</li> }).collect_view()}
                </ul>
                <div class="error-fallback__actions">
                    <button class="btn btn--primary" on:click=on_retry>
                        "Retry"
                    </button>
                    <button class="btn" on:click=on_reset>
                        "Clear local data and return to login"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Lines to list in the fallback; never empty.
fn fallback_messages(messages: Vec<String>) -> Vec<String> {
    if messages.is_empty() { vec!["An unexpected error occurred.".to_owned()] } else { messages }
}

/// Reload the current page, or load `path` when given.
fn reload_at(path: Option<&str>) {
    #[cfg(feature = "hydrate")]
    {
        let Some(w) = web_sys::window() else {
            log::error!("no window to reload");
            return;
        };
        let location = w.location();
        let result = match path {
            Some(path) => location.set_href(path),
            None => location.reload(),
        };
        if let Err(e) = result {
            log::error!("failed to reload after error: {e:?}");
        }
    }
    #[cfg(not(feature = "hydrate"))]
    log::debug!("reload requested outside the browser: {path:?}");
}
