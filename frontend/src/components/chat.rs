//! 聊天弹窗
//!
//! 会话状态（当前线程 + 消息列表）通过 Context 共享，任何页面都
//! 可以打开聊天。发送成功后重新拉取历史；`demo` 特性开启时，
//! 固定延迟后以对端身份回发一条模拟消息（纯演示用途）。

use crate::api::AppApi;
use crate::components::alert;
use crate::flows::chat::{self as chat_flow, ChatSession};
use careloop_shared::Message;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy)]
pub struct ChatContext {
    pub session: RwSignal<Option<ChatSession>>,
    pub messages: RwSignal<Vec<Message>>,
}

impl ChatContext {
    pub fn new() -> Self {
        Self {
            session: RwSignal::new(None),
            messages: RwSignal::new(Vec::new()),
        }
    }

    /// 打开会话并加载历史
    pub async fn open(&self, api: &AppApi, session: ChatSession) {
        self.session.set(Some(session.clone()));
        self.reload(api, &session).await;
    }

    async fn reload(&self, api: &AppApi, session: &ChatSession) {
        match chat_flow::history(api, session).await {
            Ok(messages) => self.messages.set(messages),
            Err(err) => {
                // 历史加载失败不阻塞会话，仅留日志
                web_sys::console::error_1(
                    &format!("[Chat] failed to load history: {}", err).into(),
                );
                self.messages.set(Vec::new());
            }
        }
    }

    pub fn close(&self) {
        self.session.set(None);
        self.messages.set(Vec::new());
    }
}

impl Default for ChatContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_chat() -> ChatContext {
    use_context::<ChatContext>().expect("ChatContext should be provided")
}

#[component]
pub fn ChatModal() -> impl IntoView {
    let chat = use_chat();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    let (draft, set_draft) = signal(String::new());
    let (is_sending, set_is_sending) = signal(false);

    let do_send = {
        let api = api.clone();
        move || {
            let Some(session) = chat.session.get_untracked() else {
                return;
            };
            let text = draft.get_untracked();
            if text.trim().is_empty() {
                return;
            }

            set_is_sending.set(true);
            let api = api.clone();
            spawn_local(async move {
                match chat_flow::send(&api, &session, &text).await {
                    Ok(()) => {
                        set_draft.set(String::new());
                        chat.reload(&api, &session).await;
                        schedule_demo_reply(&api, chat, &session);
                    }
                    Err(err) => alert(&format!("Failed to send message. {}", err.user_message())),
                }
                set_is_sending.set(false);
            });
        }
    };

    let on_send_click = {
        let do_send = do_send.clone();
        move |_| do_send()
    };

    let on_keydown = {
        let do_send = do_send.clone();
        move |ev: leptos::web_sys::KeyboardEvent| {
            if ev.key() == "Enter" {
                do_send();
            }
        }
    };

    view! {
        <Show when=move || chat.session.get().is_some()>
            {
                let on_keydown = on_keydown.clone();
                let on_send_click = on_send_click.clone();
                move || {
                let on_keydown = on_keydown.clone();
                let on_send_click = on_send_click.clone();
                view! {
            <div class="modal modal-open">
                <div class="modal-box flex flex-col h-96">
                    <div class="flex items-center justify-between mb-2">
                        <h3 class="font-bold">
                            {move || chat.session.get().map(|s| s.peer_name).unwrap_or_default()}
                        </h3>
                        <button class="btn btn-sm btn-ghost" on:click=move |_| chat.close()>"✕"</button>
                    </div>

                    <div class="flex-1 overflow-y-auto space-y-2">
                        <Show when=move || chat.messages.with(|m| m.is_empty())>
                            <p class="text-center text-base-content/50 py-8">"Start a conversation"</p>
                        </Show>
                        <For
                            each=move || chat.messages.get()
                            key=|msg| (msg.sent_at, msg.message_text.clone())
                            children=move |msg| {
                                let mine = chat
                                    .session
                                    .get_untracked()
                                    .map(|s| s.role == msg.sender_type)
                                    .unwrap_or(false);
                                view! {
                                    <div class=if mine { "chat chat-end" } else { "chat chat-start" }>
                                        <div class="chat-bubble">
                                            <p>{msg.message_text.clone()}</p>
                                            <p class="text-xs opacity-60">
                                                {msg.sent_at.format("%H:%M").to_string()}
                                            </p>
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>

                    <div class="flex gap-2 mt-2">
                        <input
                            type="text"
                            class="input input-bordered flex-1"
                            placeholder="Type a message..."
                            on:input=move |ev| set_draft.set(event_target_value(&ev))
                            on:keydown=on_keydown
                            prop:value=draft
                        />
                        <button
                            class="btn btn-primary"
                            disabled=move || is_sending.get()
                            on:click=on_send_click
                        >
                            "Send"
                        </button>
                    </div>
                </div>
            </div>
                }
                }
            }
        </Show>
    }
}

/// demo 特性开启时调度一条模拟对端回复；关闭时为空实现
#[cfg(feature = "demo")]
fn schedule_demo_reply(api: &AppApi, chat: ChatContext, session: &ChatSession) {
    let api = api.clone();
    let session = session.clone();
    let seed = chat.messages.with_untracked(|m| m.len());

    gloo_timers::callback::Timeout::new(chat_flow::demo::REPLY_DELAY_MILLIS, move || {
        spawn_local(async move {
            // 弹窗已关闭或切换线程时丢弃这条迟到的回复
            let still_open = chat
                .session
                .get_untracked()
                .map(|s| s.thread_id == session.thread_id)
                .unwrap_or(false);
            if !still_open {
                return;
            }

            if chat_flow::demo::send_counter_reply(&api, &session, seed)
                .await
                .is_ok()
            {
                chat.reload(&api, &session).await;
            }
        });
    })
    .forget();
}

#[cfg(not(feature = "demo"))]
fn schedule_demo_reply(_api: &AppApi, _chat: ChatContext, _session: &ChatSession) {}
