//! Login page at the site root.
//!
//! SYSTEM CONTEXT
//! ==============
//! The entry route for anonymous users. An already authenticated session is
//! forwarded to the dashboard once hydration completes, so the form never
//! flashes for signed-in users.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::net::api::Api;
use crate::state::auth::{SessionSignal, login};
use crate::util::auth::{GuardOutcome, evaluate_login_route, install_guard_redirect};

/// Trimmed username and raw password, or the first missing field.
pub fn validate_login_input(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Username is required");
    }
    if password.is_empty() {
        return Err("Password is required");
    }
    Ok((username.to_owned(), password.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let store = expect_context::<SessionSignal>();
    let api = StoredValue::new(expect_context::<Api>());

    // A successful login flips the outcome to a landing redirect.
    let outcome = Memo::new(move |_| store.with(|s| evaluate_login_route(s.session())));
    install_guard_redirect(outcome, use_navigate());

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (user, pass) = match validate_login_input(&username.get_untracked(), &password.get_untracked()) {
            Ok(fields) => fields,
            Err(msg) => {
                error.set(Some(msg.to_owned()));
                return;
            }
        };
        error.set(None);
        busy.set(true);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            if let Err(e) = login(store, &api.auth, &user, &pass).await {
                log::warn!("login failed: {e}");
                error.set(Some(e.to_string()));
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <Show when=move || outcome.get() == GuardOutcome::Render>
                <form class="card login-card" on:submit=on_submit>
                    <header class="card__header">
                        <h1 class="card__title">"Welcome Back"</h1>
                        <p class="card__description">"Sign in to your Task Logger account"</p>
                    </header>
                    {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                    <label class="field">
                        <span class="field__label">"Username"</span>
                        <input
                            class="input"
                            type="text"
                            autocomplete="username"
                            placeholder="Enter your username"
                            disabled=move || busy.get()
                            prop:value=move || username.get()
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="field">
                        <span class="field__label">"Password"</span>
                        <input
                            class="input"
                            type="password"
                            autocomplete="current-password"
                            placeholder="Enter your password"
                            disabled=move || busy.get()
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </label>
                    <button class="btn btn--primary btn--block" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
            </Show>
        </div>
    }
}
