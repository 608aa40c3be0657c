//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` owns the single session store and the API client bundle and hands
//! both to the page tree through context. The store is hydrated from storage
//! once, in the browser, before any guard decides anything.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::components::error_fallback::ErrorFallback;
use crate::net::api::Api;
use crate::pages::{admin::AdminPage, dashboard::DashboardPage, login::LoginPage, settings::SettingsPage};
use crate::state::auth::SessionSignal;
use crate::state::session::SessionStore;
use crate::util::auth::LOGIN_ROUTE;
use crate::util::storage::BrowserStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let store: SessionSignal = RwSignal::new(SessionStore::new(BrowserStorage));
    provide_context(store);

    // Effects only run in the browser, so SSR always renders the unhydrated
    // placeholder and the client takes over from there.
    Effect::new(move || {
        if !store.with_untracked(SessionStore::has_hydrated) {
            store.update(SessionStore::hydrate);
        }
    });

    // A configuration failure is rendered as an `Err` view so the error
    // boundary shows it with its recovery controls.
    let api = Api::from_build_env();
    match &api {
        Ok(api) => provide_context(api.clone()),
        Err(e) => log::error!("{e}"),
    }
    let routes = api.map(|_| {
        view! {
            <Routes fallback=|| view! { <Redirect path=LOGIN_ROUTE/> }>
                <Route path=StaticSegment("") view=LoginPage/>
                <Route path=StaticSegment("dashboard") view=DashboardPage/>
                <Route path=StaticSegment("settings") view=SettingsPage/>
                <Route path=StaticSegment("admin") view=AdminPage/>
            </Routes>
        }
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/tasklog-web.css"/>
        <Title text="Task Logger"/>
        <Router>
            <ErrorBoundary fallback=|errors| view! { <ErrorFallback errors/> }>
                {routes}
            </ErrorBoundary>
        </Router>
    }
}
