//! Chat Page

use leptos::prelude::*;
use crate::api::{self, Notice};
use crate::components::MessageBubble;

const GREETING: &str = "Hi, I am a Math Chatbot who can answer all your math questions!";

#[component]
pub fn ChatPage() -> impl IntoView {
    let (messages, set_messages) = signal(vec![api::ChatMessage {
        role: "assistant".into(),
        content: GREETING.into(),
    }]);
    let (input, set_input) = signal(String::new());
    let (loading, set_loading) = signal(false);
    let (api_key, set_api_key) = signal(String::new());
    let (notice, set_notice) = signal(Option::<Notice>::None);
    let (conversation_id, set_conversation_id) = signal(Option::<String>::None);

    let send = move |_| {
        let msg = input.get();
        if loading.get() {
            return;
        }

        // Empty input: warn, leave the transcript untouched
        if msg.trim().is_empty() {
            set_notice.set(Some(Notice {
                severity: "warning".into(),
                message: "Please enter a question.".into(),
            }));
            return;
        }

        set_notice.set(None);

        // Add user message
        set_messages.update(|msgs| {
            msgs.push(api::ChatMessage {
                role: "user".into(),
                content: msg.clone(),
            });
        });

        set_input.set(String::new());
        set_loading.set(true);

        let key = api_key.get();
        let conversation = conversation_id.get();
        leptos::task::spawn_local(async move {
            let key = if key.trim().is_empty() { None } else { Some(key.as_str()) };
            match api::send_chat(&msg, key, conversation.as_deref()).await {
                Ok(reply) => {
                    set_conversation_id.set(Some(reply.conversation_id));
                    set_messages.update(|msgs| {
                        msgs.push(api::ChatMessage {
                            role: "assistant".into(),
                            content: reply.message,
                        });
                    });
                }
                Err(notice) => {
                    if notice.severity == "error" {
                        set_messages.update(|msgs| {
                            msgs.push(api::ChatMessage {
                                role: "error".into(),
                                content: notice.message.clone(),
                            });
                        });
                    } else {
                        set_notice.set(Some(notice));
                    }
                }
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="chat">
            <aside class="sidebar">
                <h2>"Settings"</h2>
                <div class="field">
                    <label>"Groq API Key"</label>
                    <input
                        type="password"
                        placeholder="gsk_..."
                        prop:value=move || api_key.get()
                        on:input=move |ev| set_api_key.set(event_target_value(&ev))
                    />
                </div>
            </aside>

            <main class="chat-main">
                {move || notice.get().map(|n| view! {
                    <div class=format!("notice notice-{}", n.severity)>
                        {n.message.clone()}
                    </div>
                })}

                <div class="messages">
                    <For
                        each=move || messages.get()
                        key=|msg| format!("{}-{}", msg.role, msg.content.len())
                        children=move |msg| view! { <MessageBubble message=msg /> }
                    />
                    <Show when=move || loading.get()>
                        <div class="message loading">"..."</div>
                    </Show>
                </div>

                <div class="input-area">
                    <textarea
                        placeholder="Enter your question..."
                        prop:value=move || input.get()
                        on:input=move |ev| set_input.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                send(());
                            }
                        }
                    />
                    <button on:click=move |_| send(()) disabled=move || loading.get()>
                        {move || if loading.get() { "..." } else { "Find my answer" }}
                    </button>
                </div>
            </main>
        </div>
    }
}
