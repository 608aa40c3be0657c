//! Dashboard page: AI quick-log entry, headline metrics, and recent tasks.
//!
//! SYSTEM CONTEXT
//! ==============
//! The authenticated landing route. Tasks reload whenever the session token,
//! the user, or the mine/all filter changes, and after the AI logger reports
//! that it logged something. A load failure shows the message with a Retry
//! control; there is no automatic retry.

use leptos::prelude::*;

use crate::components::ai_task_logger::AiTaskLogger;
use crate::components::auth_guard::AuthGuard;
use crate::components::nav_bar::NavBar;
use crate::components::task_table::TaskTable;
use crate::net::api::Api;
use crate::state::auth::SessionSignal;
use crate::state::tasks::{TasksState, build_filters, today_utc};

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <AuthGuard>
            <NavBar/>
            <DashboardContent/>
        </AuthGuard>
    }
}

#[component]
fn DashboardContent() -> impl IntoView {
    let store = expect_context::<SessionSignal>();
    let api = StoredValue::new(expect_context::<Api>());
    let tasks = RwSignal::new(TasksState::default());
    let ai_open = RwSignal::new(false);

    let token = Memo::new(move |_| store.with(|s| s.session().token.clone()));
    let username = Memo::new(move |_| store.with(|s| s.session().username().map(str::to_owned)));
    let show_all = Memo::new(move |_| tasks.with(|t| t.show_all));

    let fetch_tasks = move || {
        let Some(token) = token.get_untracked() else {
            tasks.update(TasksState::clear);
            return;
        };
        let filters = build_filters(show_all.get_untracked(), username.get_untracked().as_deref());
        let Some(seq) = tasks.try_update(TasksState::begin_load) else {
            return;
        };
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = api.mcp.get_tasks(&token, &filters).await;
            tasks.update(|t| {
                t.finish_load(seq, result, today_utc());
            });
        });
    };

    // Reload on token, user, or filter changes.
    Effect::new(move || {
        token.track();
        username.track();
        show_all.track();
        fetch_tasks();
    });

    let on_refresh = Callback::new(move |()| fetch_tasks());
    let on_toggle_filter = Callback::new(move |show_all: bool| tasks.update(|t| t.show_all = show_all));
    let on_task_logged = Callback::new(move |()| fetch_tasks());

    let metric = move |title: &'static str, caption: &'static str, value: Signal<String>| {
        view! {
            <div class="card metric">
                <span class="metric__title">{title}</span>
                <span class="metric__value">{move || value.get()}</span>
                <span class="metric__caption">{caption}</span>
            </div>
        }
    };
    let total = Signal::derive(move || tasks.with(|t| t.metrics.total_tasks.to_string()));
    let completed = Signal::derive(move || tasks.with(|t| t.metrics.completed_today.to_string()));
    let hours = Signal::derive(move || tasks.with(|t| t.metrics.hours_this_week.to_string()));

    view! {
        <main class="page dashboard">
            <section class="dashboard__hero">
                <h2 class="page__title">"Dashboard"</h2>
                <p class="page__description">"Track your work effortlessly with AI-powered task logging"</p>
                <button class="dashboard__quick-add" on:click=move |_| ai_open.set(true)>
                    <span>"Tell me what you worked on... (e.g., 'Spent 3 hours on Acme Corp website')"</span>
                    <span class="dashboard__quick-add-tag">"AI"</span>
                </button>
            </section>

            {move || {
                tasks
                    .with(|t| t.error.clone())
                    .map(|e| {
                        view! {
                            <div class="alert alert--error dashboard__error">
                                <span>{e}</span>
                                <button class="btn btn--small" on:click=move |_| on_refresh.run(())>
                                    "Retry"
                                </button>
                            </div>
                        }
                    })
            }}

            <section class="dashboard__metrics">
                {metric("Total Tasks", "All time", total)}
                {metric("Completed Today", "Tasks finished", completed)}
                {metric("Hours Logged", "This week", hours)}
            </section>

            <TaskTable tasks=tasks username=username on_refresh=on_refresh on_toggle_filter=on_toggle_filter/>
            <AiTaskLogger open=ai_open on_task_logged=on_task_logged/>
        </main>
    }
}
