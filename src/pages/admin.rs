//! Admin panel: user management and stored-conversation review.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reachable only through `AdminGuard`. Every mutation reloads the user list
//! and reports its outcome as a success or error notice; nothing retries on
//! its own.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use leptos::prelude::*;

use crate::components::auth_guard::AdminGuard;
use crate::components::nav_bar::NavBar;
use crate::net::admin_client::AdminClient;
use crate::net::api::Api;
use crate::net::error::ApiError;
use crate::net::transport::HttpTransport;
use crate::net::types::{AccountStatus, ChatRole, ManagedUser, NewUserRequest, Role};
use crate::state::admin::AdminState;
use crate::state::auth::{SessionSignal, require_token};
use crate::util::markdown::render_markdown_html;

/// Check the create-user form before it is sent.
pub fn validate_new_user(username: &str, password: &str, role: Role) -> Result<NewUserRequest, &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Username and password are required");
    }
    Ok(NewUserRequest { username: username.to_owned(), password: password.to_owned(), role })
}

/// A user-list mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAction {
    Create(NewUserRequest),
    UpdateRole { username: String, role: Role },
    Delete { username: String },
}

/// Run `action` and describe its success for the notice banner.
///
/// # Errors
///
/// Returns the admin API failure unchanged.
pub async fn perform_user_action<T: HttpTransport>(
    admin: &AdminClient<T>,
    token: &str,
    action: UserAction,
) -> Result<String, ApiError> {
    match action {
        UserAction::Create(user) => {
            admin.create_user(token, &user).await?;
            Ok(format!("User \"{}\" created successfully", user.username))
        }
        UserAction::UpdateRole { username, role } => {
            admin.update_role(token, &username, role).await?;
            Ok(format!("Role updated for \"{username}\""))
        }
        UserAction::Delete { username } => {
            admin.delete_user(token, &username).await?;
            Ok(format!("User \"{username}\" deleted successfully"))
        }
    }
}

fn confirm(message: &str) -> bool {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window().is_some_and(|w| w.confirm_with_message(message).unwrap_or(false))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        log::debug!("confirmation unavailable outside the browser: {message}");
        false
    }
}

fn parse_role(raw: &str) -> Role {
    if raw == Role::Admin.as_str() { Role::Admin } else { Role::User }
}

#[component]
pub fn AdminPage() -> impl IntoView {
    view! {
        <AdminGuard>
            <NavBar/>
            <AdminContent/>
        </AdminGuard>
    }
}

#[component]
fn AdminContent() -> impl IntoView {
    let store = expect_context::<SessionSignal>();
    let api = StoredValue::new(expect_context::<Api>());
    let admin = RwSignal::new(AdminState::default());

    let show_create = RwSignal::new(false);
    let new_username = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let new_role = RwSignal::new(Role::User);
    let editing = RwSignal::new(None::<ManagedUser>);
    let edit_role = RwSignal::new(Role::User);

    let load_users = move || {
        let token = match require_token(store) {
            Ok(token) => token,
            Err(e) => {
                admin.update(|a| a.finish_load(Err(e)));
                return;
            }
        };
        admin.update(AdminState::begin_load);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = api.admin.list_users(&token).await;
            admin.update(|a| a.finish_load(result));
        });
    };

    let run_action = move |action: UserAction| {
        admin.update(AdminState::dismiss_notices);
        let token = match require_token(store) {
            Ok(token) => token,
            Err(e) => {
                admin.update(|a| a.record_action(Err(e)));
                return;
            }
        };
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = perform_user_action(&api.admin, &token, action).await;
            if let Err(e) = &result {
                log::warn!("admin action failed: {e}");
            }
            admin.update(|a| a.record_action(result));
            load_users();
        });
    };

    Effect::new(load_users);

    let on_create = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match validate_new_user(&new_username.get_untracked(), &new_password.get_untracked(), new_role.get_untracked()) {
            Ok(request) => {
                show_create.set(false);
                new_username.set(String::new());
                new_password.set(String::new());
                new_role.set(Role::User);
                run_action(UserAction::Create(request));
            }
            Err(msg) => admin.update(|a| a.record_action(Err(ApiError::Validation(msg.to_owned())))),
        }
    };

    let on_update_role = move |_| {
        if let Some(user) = editing.get_untracked() {
            editing.set(None);
            run_action(UserAction::UpdateRole { username: user.username, role: edit_role.get_untracked() });
        }
    };

    let on_delete = move |username: String| {
        let prompt = format!("Are you sure you want to delete user \"{username}\"? This action cannot be undone.");
        if confirm(&prompt) {
            run_action(UserAction::Delete { username });
        }
    };

    let open_conversations = move |username: String| {
        admin.update(|a| a.viewer.open(&username));
        let token = match require_token(store) {
            Ok(token) => token,
            Err(e) => {
                admin.update(|a| a.viewer.finish_sessions(Err(e)));
                return;
            }
        };
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = api.admin.list_conversations(&token, &username).await;
            admin.update(|a| a.viewer.finish_sessions(result));
        });
    };

    let open_session = move |session_id: String| {
        let Some(username) = admin.with_untracked(|a| a.viewer.username.clone()) else {
            return;
        };
        admin.update(|a| a.viewer.select(&session_id));
        let token = match require_token(store) {
            Ok(token) => token,
            Err(e) => {
                admin.update(|a| a.viewer.finish_messages(Err(e)));
                return;
            }
        };
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = api.admin.conversation_messages(&token, &username, &session_id).await;
            admin.update(|a| a.viewer.finish_messages(result));
        });
    };

    let delete_session = move |session_id: String| {
        let Some(username) = admin.with_untracked(|a| a.viewer.username.clone()) else {
            return;
        };
        if !confirm("Delete this conversation? This action cannot be undone.") {
            return;
        }
        let token = match require_token(store) {
            Ok(token) => token,
            Err(e) => {
                admin.update(|a| a.viewer.error = Some(e.to_string()));
                return;
            }
        };
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            match api.admin.delete_conversation(&token, &username, &session_id).await {
                Ok(()) => admin.update(|a| a.viewer.remove_session(&session_id)),
                Err(e) => admin.update(|a| a.viewer.error = Some(e.to_string())),
            }
        });
    };

    let user_rows = move || {
        admin.with(|a| {
            a.users
                .iter()
                .cloned()
                .map(|user| {
                    let edit_user = user.clone();
                    let delete_name = user.username.clone();
                    let view_name = user.username.clone();
                    let is_admin = user.role == Role::Admin;
                    let is_active = user.status == AccountStatus::Active;
                    let status = if is_active { "active" } else { "disabled" };
                    let last_login = user
                        .last_login
                        .as_deref()
                        .and_then(|t| t.get(..10))
                        .unwrap_or("Never")
                        .to_owned();
                    view! {
                        <tr>
                            <td class="admin__username">{user.username}</td>
                            <td>
                                <span class="badge" class:badge--admin=is_admin>
                                    {if is_admin { "Admin" } else { "User" }}
                                </span>
                            </td>
                            <td>
                                <span class="badge" class:badge--success=is_active class:badge--danger=!is_active>
                                    {status}
                                </span>
                            </td>
                            <td class="muted">{last_login}</td>
                            <td class="admin__actions">
                                <button class="btn btn--small" on:click=move |_| open_conversations(view_name.clone())>
                                    "Conversations"
                                </button>
                                <button
                                    class="btn btn--small"
                                    on:click=move |_| {
                                        edit_role.set(edit_user.role);
                                        editing.set(Some(edit_user.clone()));
                                    }
                                >
                                    "Edit"
                                </button>
                                <button class="btn btn--small btn--danger" on:click=move |_| on_delete(delete_name.clone())>
                                    "Delete"
                                </button>
                            </td>
                        </tr>
                    }
                })
                .collect::<Vec<_>>()
        })
    };

    let viewer_panel = move || {
        let viewer = admin.with(|a| a.viewer.clone());
        let username = viewer.username.clone()?;
        let sessions = viewer
            .sessions
            .iter()
            .cloned()
            .map(|session| {
                let selected = viewer.selected_session.as_deref() == Some(session.session_id.as_str());
                let open_id = session.session_id.clone();
                let delete_id = session.session_id.clone();
                view! {
                    <li class="conversation" class:conversation--selected=selected>
                        <button class="conversation__open" on:click=move |_| open_session(open_id.clone())>
                            <span class="conversation__time">{session.last_message_at}</span>
                            <span class="conversation__count">{format!("{} messages", session.message_count)}</span>
                        </button>
                        <button class="btn btn--small btn--danger" on:click=move |_| delete_session(delete_id.clone())>
                            "Delete"
                        </button>
                    </li>
                }
            })
            .collect::<Vec<_>>();
        let messages = viewer
            .messages
            .into_iter()
            .map(|message| {
                let is_assistant = message.role == ChatRole::Assistant;
                let body = if is_assistant {
                    let rendered = render_markdown_html(&message.content);
                    view! { <div class="bubble__markdown" inner_html=rendered></div> }.into_any()
                } else {
                    view! { <p>{message.content}</p> }.into_any()
                };
                view! {
                    <div class="bubble" class:bubble--assistant=is_assistant class:bubble--user=!is_assistant>
                        {body}
                        <span class="bubble__time">{message.message_timestamp}</span>
                    </div>
                }
            })
            .collect::<Vec<_>>();
        Some(view! {
            <section class="card conversations">
                <header class="card__header">
                    <h3 class="card__title">{format!("Conversations of {username}")}</h3>
                    <button class="btn btn--small" on:click=move |_| admin.update(|a| a.viewer.close())>
                        "Close"
                    </button>
                </header>
                {viewer.error.map(|e| view! { <div class="alert alert--error">{e}</div> })}
                {viewer.loading.then(|| view! { <div class="muted">"Loading..."</div> })}
                {(sessions.is_empty() && !viewer.loading).then(|| view! { <div class="muted">"No conversations found"</div> })}
                <div class="conversations__body">
                    <ul class="conversations__list">{sessions}</ul>
                    <div class="conversations__messages">{messages}</div>
                </div>
            </section>
        })
    };

    view! {
        <main class="page admin">
            <header class="page__header">
                <div>
                    <h1 class="page__title">"Admin Panel"</h1>
                    <p class="page__description">"Manage users and system settings"</p>
                </div>
                <button class="btn btn--primary" on:click=move |_| show_create.set(true)>
                    "Create User"
                </button>
            </header>

            {move || admin.with(|a| a.error.clone()).map(|e| view! { <div class="alert alert--error">{e}</div> })}
            {move || admin.with(|a| a.success.clone()).map(|m| view! { <div class="alert alert--success">{m}</div> })}

            <section class="card">
                <header class="card__header">
                    <h3 class="card__title">"User Management"</h3>
                    <p class="card__description">"View and manage all system users"</p>
                </header>
                {move || {
                    let (loading, empty) = admin.with(|a| (a.loading, a.users.is_empty()));
                    if loading {
                        view! { <div class="muted">"Loading users..."</div> }.into_any()
                    } else if empty {
                        view! { <div class="muted">"No users found"</div> }.into_any()
                    } else {
                        view! {
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Username"</th>
                                        <th>"Role"</th>
                                        <th>"Status"</th>
                                        <th>"Last Login"</th>
                                        <th>"Actions"</th>
                                    </tr>
                                </thead>
                                <tbody>{user_rows()}</tbody>
                            </table>
                        }
                            .into_any()
                    }
                }}
            </section>

            {viewer_panel}

            <Show when=move || show_create.get()>
                <div class="dialog-backdrop">
                    <form class="dialog" on:submit=on_create>
                        <h2>"Create New User"</h2>
                        <label class="field">
                            <span class="field__label">"Username"</span>
                            <input
                                class="input"
                                type="text"
                                prop:value=move || new_username.get()
                                on:input=move |ev| new_username.set(event_target_value(&ev))
                            />
                        </label>
                        <label class="field">
                            <span class="field__label">"Password"</span>
                            <input
                                class="input"
                                type="password"
                                prop:value=move || new_password.get()
                                on:input=move |ev| new_password.set(event_target_value(&ev))
                            />
                        </label>
                        <label class="field">
                            <span class="field__label">"Role"</span>
                            <select
                                class="select"
                                prop:value=move || new_role.get().as_str()
                                on:change=move |ev| new_role.set(parse_role(&event_target_value(&ev)))
                            >
                                <option value="user">"User"</option>
                                <option value="admin">"Admin"</option>
                            </select>
                        </label>
                        <div class="dialog__actions">
                            <button class="btn" type="button" on:click=move |_| show_create.set(false)>
                                "Cancel"
                            </button>
                            <button class="btn btn--primary" type="submit">
                                "Create User"
                            </button>
                        </div>
                    </form>
                </div>
            </Show>

            <Show when=move || editing.with(Option::is_some)>
                <div class="dialog-backdrop">
                    <div class="dialog">
                        <h2>{move || editing.with(|u| u.as_ref().map(|u| format!("Edit {}", u.username)).unwrap_or_default())}</h2>
                        <label class="field">
                            <span class="field__label">"Role"</span>
                            <select
                                class="select"
                                prop:value=move || edit_role.get().as_str()
                                on:change=move |ev| edit_role.set(parse_role(&event_target_value(&ev)))
                            >
                                <option value="user">"User"</option>
                                <option value="admin">"Admin"</option>
                            </select>
                        </label>
                        <div class="dialog__actions">
                            <button class="btn" on:click=move |_| editing.set(None)>
                                "Cancel"
                            </button>
                            <button class="btn btn--primary" on:click=on_update_role>
                                "Save"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </main>
    }
}
