//! Top navigation bar with route links and the signed-in user menu.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::auth::{SessionSignal, logout};
use crate::util::auth::{ADMIN_ROUTE, LANDING_ROUTE, LOGIN_ROUTE, SETTINGS_ROUTE};

#[component]
pub fn NavBar() -> impl IntoView {
    let store = expect_context::<SessionSignal>();
    let navigate = use_navigate();

    let username = move || store.with(|s| s.session().username().unwrap_or_default().to_owned());
    let role_label = move || {
        store.with(|s| {
            s.session()
                .user
                .as_ref()
                .map_or("", |u| u.role.label())
        })
    };
    let is_admin = move || store.with(|s| s.session().is_admin);

    let on_logout = move |_| {
        logout(store);
        navigate(LOGIN_ROUTE, NavigateOptions { replace: true, ..NavigateOptions::default() });
    };

    view! {
        <nav class="nav-bar">
            <a class="nav-bar__brand" href=LANDING_ROUTE>
                "Task Logger"
            </a>
            <div class="nav-bar__links">
                <a class="nav-bar__link" href=LANDING_ROUTE>
                    "Dashboard"
                </a>
                <a class="nav-bar__link" href=SETTINGS_ROUTE>
                    "Settings"
                </a>
                <Show when=is_admin>
                    <a class="nav-bar__link" href=ADMIN_ROUTE>
                        "Admin"
                    </a>
                </Show>
            </div>
            <div class="nav-bar__user">
                <span class="nav-bar__name">{username}</span>
                <span class="nav-bar__role">{role_label}</span>
                <button class="btn nav-bar__logout" on:click=on_logout>
                    "Log out"
                </button>
            </div>
        </nav>
    }
}
