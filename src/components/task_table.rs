//! Recent-task table with the mine/all filter and a refresh action.

use leptos::prelude::*;

use crate::net::types::{Task, TaskStatus};
use crate::state::tasks::TasksState;

#[component]
pub fn TaskTable(
    tasks: RwSignal<TasksState>,
    #[prop(into)] username: Signal<Option<String>>,
    on_refresh: Callback<()>,
    on_toggle_filter: Callback<bool>,
) -> impl IntoView {
    let show_all = move || tasks.with(|t| t.show_all);
    let description = move || {
        tasks.with(|t| {
            if t.loading {
                "Loading your logged tasks...".to_owned()
            } else if t.tasks.is_empty() {
                match username.get() {
                    Some(name) if !t.show_all => format!("{name}'s tasks will appear here"),
                    _ => "All users tasks will appear here".to_owned(),
                }
            } else {
                t.summary(username.get().as_deref())
            }
        })
    };

    let on_filter = move |ev: leptos::ev::Event| on_toggle_filter.run(event_target_value(&ev) == "all");

    view! {
        <section class="card task-table">
            <header class="card__header task-table__header">
                <div>
                    <h3 class="card__title">"Recent Tasks"</h3>
                    <p class="card__description">{description}</p>
                </div>
                <div class="task-table__actions">
                    <select class="select" on:change=on_filter prop:value=move || if show_all() { "all" } else { "mine" }>
                        <option value="mine">"My Tasks"</option>
                        <option value="all">"All Tasks"</option>
                    </select>
                    <button class="btn" on:click=move |_| on_refresh.run(())>
                        "Refresh"
                    </button>
                </div>
            </header>
            {move || {
                let state = tasks.get();
                if state.loading {
                    view! {
                        <div class="task-table__skeleton">
                            <div class="skeleton"></div>
                            <div class="skeleton"></div>
                            <div class="skeleton"></div>
                        </div>
                    }
                        .into_any()
                } else if state.tasks.is_empty() {
                    view! {
                        <div class="task-table__empty">
                            <p>"No tasks logged yet"</p>
                            <p class="muted">"Use the AI input above to log your first task"</p>
                        </div>
                    }
                        .into_any()
                } else {
                    view! {
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Date"</th>
                                    <th>"User"</th>
                                    <th>"Client"</th>
                                    <th>"Project"</th>
                                    <th>"Description"</th>
                                    <th>"Status"</th>
                                    <th>"Hours"</th>
                                </tr>
                            </thead>
                            <tbody>{state.tasks.into_iter().map(task_row).collect::<Vec<_>>()}</tbody>
                        </table>
                    }
                        .into_any()
                }
            }}
        </section>
    }
}

fn task_row(task: Task) -> impl IntoView {
    let status_class = match task.status {
        TaskStatus::Completed => "badge badge--success",
        TaskStatus::InProgress => "badge badge--info",
        TaskStatus::Pending => "badge",
    };
    let hours = task.actual_hours.map_or_else(|| "-".to_owned(), |h| format!("{h:.1}"));
    view! {
        <tr>
            <td>{task.task_date}</td>
            <td>{task.user_name}</td>
            <td>{task.client_name}</td>
            <td>{task.project_name}</td>
            <td class="task-table__description">{task.task_description}</td>
            <td>
                <span class=status_class>{task.status.label()}</span>
            </td>
            <td>{hours}</td>
        </tr>
    }
}
