//! Route guards for authenticated and admin-only pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected page wraps its content in `AuthGuard` or `AdminGuard`.
//! The decision itself lives in `util::auth`; this module wires it to the
//! context-held session, the auth client, and the router.
//!
//! DESIGN
//! ======
//! Each mounted guard verifies the held token once. A token replaced by a new
//! login re-enters `StartCheck` only when the guard is mounted again.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::net::api::Api;
use crate::state::auth::{SessionSignal, check_auth};
use crate::state::session::Session;
use crate::util::auth::{
    CheckStatus, GuardOutcome, evaluate_admin_guard, evaluate_auth_guard, install_guard_redirect,
};

type Evaluate = fn(&Session, CheckStatus) -> GuardOutcome;

/// Render `children` only for a hydrated session whose token the server accepts.
#[component]
pub fn AuthGuard(children: ChildrenFn) -> impl IntoView {
    guarded(children, evaluate_auth_guard)
}

/// `AuthGuard` that additionally requires the admin role.
#[component]
pub fn AdminGuard(children: ChildrenFn) -> impl IntoView {
    guarded(children, evaluate_admin_guard)
}

fn guarded(children: ChildrenFn, evaluate: Evaluate) -> impl IntoView {
    let store = expect_context::<SessionSignal>();
    let api = expect_context::<Api>();
    let check = RwSignal::new(CheckStatus::NotStarted);
    let outcome = Memo::new(move |_| store.with(|s| evaluate(s.session(), check.get())));

    Effect::new(move || {
        if outcome.get() != GuardOutcome::StartCheck {
            return;
        }
        check.set(CheckStatus::Pending);
        let api = api.clone();
        leptos::task::spawn_local(async move {
            let valid = check_auth(store, &api.auth).await;
            log::debug!("guard token check: valid={valid}");
            check.set(if valid { CheckStatus::Passed } else { CheckStatus::Failed });
        });
    });

    install_guard_redirect(outcome, use_navigate());

    move || match outcome.get() {
        GuardOutcome::Render => children().into_any(),
        other => view! {
            <div class="auth-guard">
                {other.loading_message().map(|message| {
                    view! {
                        <div class="auth-guard__spinner"></div>
                        <p class="auth-guard__message">{message}</p>
                    }
                })}
            </div>
        }
        .into_any(),
    }
}
