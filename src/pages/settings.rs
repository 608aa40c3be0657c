//! Account settings: profile summary and password change.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use leptos::prelude::*;

use crate::components::auth_guard::AuthGuard;
use crate::components::nav_bar::NavBar;
use crate::net::api::Api;
use crate::net::types::Role;
use crate::state::auth::{SessionSignal, change_password};

/// Shortest accepted new password, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Check a password-change form before it is sent.
pub fn validate_password_change(current: &str, new: &str, confirm: &str) -> Result<(), &'static str> {
    if current.is_empty() {
        return Err("Current password is required");
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err("New password must be at least 8 characters");
    }
    if confirm.is_empty() {
        return Err("Please confirm your new password");
    }
    if new != confirm {
        return Err("Passwords don't match");
    }
    Ok(())
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    view! {
        <AuthGuard>
            <NavBar/>
            <SettingsContent/>
        </AuthGuard>
    }
}

#[component]
fn SettingsContent() -> impl IntoView {
    let store = expect_context::<SessionSignal>();
    let api = StoredValue::new(expect_context::<Api>());

    let current = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let success = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let username = move || store.with(|s| s.session().username().unwrap_or_default().to_owned());
    let role = move || store.with(|s| s.session().user.as_ref().map_or(Role::User, |u| u.role));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (old, new, again) = (current.get_untracked(), new_password.get_untracked(), confirm.get_untracked());
        error.set(None);
        success.set(None);
        if let Err(msg) = validate_password_change(&old, &new, &again) {
            error.set(Some(msg.to_owned()));
            return;
        }
        busy.set(true);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            match change_password(store, &api.auth, &old, &new).await {
                Ok(()) => {
                    log::info!("password changed");
                    success.set(Some("Password changed successfully!".to_owned()));
                    current.set(String::new());
                    new_password.set(String::new());
                    confirm.set(String::new());
                }
                Err(e) => {
                    log::warn!("password change failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    let password_field = move |label: &'static str, placeholder: &'static str, value: RwSignal<String>| {
        view! {
            <label class="field">
                <span class="field__label">{label}</span>
                <input
                    class="input"
                    type="password"
                    placeholder=placeholder
                    disabled=move || busy.get()
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <main class="page page--narrow">
            <h1 class="page__title">"Settings"</h1>
            <p class="page__description">"Manage your account settings and preferences"</p>

            <section class="card">
                <header class="card__header">
                    <h3 class="card__title">"Profile Information"</h3>
                    <p class="card__description">"Your account details and role"</p>
                </header>
                <dl class="profile">
                    <dt>"Username"</dt>
                    <dd>{username}</dd>
                    <dt>"Role"</dt>
                    <dd>
                        <span class="badge" class:badge--admin=move || role() == Role::Admin>
                            {move || role().label()}
                        </span>
                    </dd>
                </dl>
            </section>

            <section class="card">
                <header class="card__header">
                    <h3 class="card__title">"Change Password"</h3>
                    <p class="card__description">"Update your password to keep your account secure"</p>
                </header>
                <form class="form" on:submit=on_submit>
                    {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                    {move || success.get().map(|m| view! { <div class="alert alert--success">{m}</div> })}
                    {password_field("Current Password", "Enter your current password", current)}
                    {password_field("New Password", "At least 8 characters", new_password)}
                    {password_field("Confirm New Password", "Re-enter your new password", confirm)}
                    <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Changing password..." } else { "Change Password" }}
                    </button>
                </form>
            </section>
        </main>
    }
}
