//! Conversational task-logging dialog backed by the AI proxy.
//!
//! SYSTEM CONTEXT
//! ==============
//! Prompts go to `/ai/log-task` together with the remembered conversation id.
//! When a reply reports tool results the dashboard is told to reload its
//! task list.

use leptos::prelude::*;

use crate::net::api::Api;
use crate::net::types::ChatRole;
use crate::state::auth::{SessionSignal, require_token};
use crate::state::chat::ChatState;
use crate::util::markdown::render_markdown_html;
use crate::util::storage::BrowserStorage;

const SUGGESTIONS: [&str; 4] = [
    "Worked 3 hours on Acme Corp website today",
    "Spent 2 hours debugging Microsoft Teams integration, still blocked by API limits",
    "Logged 4 hours on IBM database optimization yesterday",
    "Show me my tasks from this week",
];

#[component]
pub fn AiTaskLogger(open: RwSignal<bool>, on_task_logged: Callback<()>) -> impl IntoView {
    let store = expect_context::<SessionSignal>();
    let api = StoredValue::new(expect_context::<Api>());
    let chat = RwSignal::new(ChatState::restore(&BrowserStorage));
    let input = RwSignal::new(String::new());
    let messages_ref = NodeRef::<leptos::html::Div>::new();

    #[cfg(feature = "hydrate")]
    Effect::new(move || {
        let _ = chat.with(|c| c.turns.len());
        if let Some(el) = messages_ref.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    let do_send = move || {
        let text = input.get_untracked();
        let Some(prompt) = chat.try_update(|c| c.begin_prompt(&text)).flatten() else {
            return;
        };
        input.set(String::new());
        let session_id = chat.with_untracked(|c| c.session_id.clone());
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = match require_token(store) {
                Ok(token) => api.ai.send_message(&token, &prompt.text, session_id.as_deref()).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(reply) => {
                    let logged = chat.try_update(|c| c.record_reply(&prompt, reply, &BrowserStorage)).unwrap_or(false);
                    if logged {
                        on_task_logged.run(());
                    }
                }
                Err(e) => {
                    log::warn!("ai task logger request failed: {e}");
                    chat.update(|c| c.record_failure(&prompt, &e));
                }
            }
        });
    };

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            do_send();
        }
    };
    let on_clear = move |_| {
        chat.update(|c| c.clear(&BrowserStorage));
        input.set(String::new());
    };
    let can_send = move || !input.get().trim().is_empty() && !chat.with(|c| c.loading);

    view! {
        <Show when=move || open.get()>
            <div class="dialog-backdrop" on:click=move |_| open.set(false)>
                <div class="dialog dialog--ai" on:click=move |ev| ev.stop_propagation()>
                    <header class="dialog__header">
                        <h2>"Log Task with AI"</h2>
                        <p class="muted">"Describe your work in natural language, and the assistant will log it for you"</p>
                    </header>

                    <div class="ai-logger__messages" node_ref=messages_ref>
                        {move || {
                            let turns = chat.with(|c| c.turns.clone());
                            if turns.is_empty() {
                                return view! {
                                    <div class="ai-logger__suggestions">
                                        <p>"Try saying:"</p>
                                        <ul>
                                            {SUGGESTIONS.iter().map(|s| view! { <li>{*s}</li> }).collect::<Vec<_>>()}
                                        </ul>
                                    </div>
                                }
                                    .into_any();
                            }
                            turns
                                .into_iter()
                                .map(|turn| {
                                    let is_assistant = turn.role == ChatRole::Assistant;
                                    view! {
                                        <div
                                            class="ai-logger__turn"
                                            class:ai-logger__turn--assistant=is_assistant
                                            class:ai-logger__turn--user=!is_assistant
                                        >
                                            {if is_assistant {
                                                let rendered = render_markdown_html(&turn.content);
                                                view! { <div class="ai-logger__markdown" inner_html=rendered></div> }.into_any()
                                            } else {
                                                view! { <span>{turn.content}</span> }.into_any()
                                            }}
                                        </div>
                                    }
                                })
                                .collect::<Vec<_>>()
                                .into_any()
                        }}
                        {move || chat.with(|c| c.loading).then(|| view! { <div class="ai-logger__loading">"Thinking..."</div> })}
                    </div>

                    {move || chat.with(|c| c.error.clone()).map(|e| view! { <div class="alert alert--error">{e}</div> })}

                    <div class="ai-logger__input-row">
                        <input
                            class="input"
                            type="text"
                            placeholder="Tell me what you worked on..."
                            disabled=move || chat.with(|c| c.loading)
                            prop:value=move || input.get()
                            on:input=move |ev| input.set(event_target_value(&ev))
                            on:keydown=on_keydown
                        />
                        <button class="btn btn--primary" on:click=move |_| do_send() disabled=move || !can_send()>
                            "Send"
                        </button>
                    </div>
                    <footer class="dialog__footer">
                        <button class="btn" on:click=on_clear>
                            "Clear"
                        </button>
                        <button class="btn" on:click=move |_| open.set(false)>
                            "Close"
                        </button>
                    </footer>
                </div>
            </div>
        </Show>
    }
}
