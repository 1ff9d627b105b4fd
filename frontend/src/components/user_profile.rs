//! 用户个人中心
//!
//! 进入页面时从服务端刷新档案并拉取预约历史。历史条目按状态给出
//! 对应动作：待确认 -> 确认完工；已完成未评价 -> 打星评价；进行中
//! 则在 demo 特性下提供"快进"按钮。历史加载失败只替换列表区域。

use crate::api::AppApi;
use crate::components::chat::use_chat;
use crate::components::rating::use_rating;
use crate::components::{alert, use_history_rev};
use crate::flows::booking as booking_flow;
use crate::flows::chat as chat_flow;
use crate::flows::profile::{UserEditForm, refresh_user, update_user};
use crate::session::{Identity, use_session};
use careloop_shared::{BookingRecord, BookingStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn UserProfilePage() -> impl IntoView {
    let session = use_session();
    let rating_ctx = use_rating();
    let chat = use_chat();
    let history_rev = use_history_rev();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    let (history, set_history) = signal(Vec::<BookingRecord>::new());
    let (history_error, set_history_error) = signal(Option::<String>::None);
    let (edit_mode, set_edit_mode) = signal(false);

    // 编辑表单信号
    let edit_name = RwSignal::new(String::new());
    let edit_gender = RwSignal::new(String::new());
    let edit_email = RwSignal::new(String::new());
    let edit_phone = RwSignal::new(String::new());
    let edit_location = RwSignal::new(String::new());

    let reload_history = {
        let api = api.clone();
        move || {
            let Some(user) = session.state.get_untracked().user().cloned() else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                match booking_flow::load_history(&api, user.user_id).await {
                    Ok(list) => {
                        set_history_error.set(None);
                        set_history.set(list);
                    }
                    Err(err) => {
                        web_sys::console::error_1(
                            &format!("[Profile] failed to load booking history: {}", err).into(),
                        );
                        set_history_error.set(Some("Failed to load booking history".to_string()));
                    }
                }
            });
        }
    };

    // 进入页面：刷新档案（失败时沿用本地缓存），并拉取历史
    Effect::new({
        let api = api.clone();
        let reload_history = reload_history.clone();
        move |_| {
            history_rev.0.track();
            let Some(user) = session.state.get_untracked().user().cloned() else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                if let Ok(fresh) = refresh_user(&api, user.user_id).await {
                    session.refresh_identity(Identity::User(fresh));
                }
            });
            reload_history();
        }
    });

    let enter_edit = move |_| {
        if let Some(user) = session.state.get_untracked().user() {
            edit_name.set(user.name.clone());
            edit_gender.set(user.gender.clone());
            edit_email.set(user.email.clone());
            edit_phone.set(user.phone.clone());
            edit_location.set(user.location.clone());
            set_edit_mode.set(true);
        }
    };

    let save_profile = {
        let api = api.clone();
        move |_| {
            let Some(user) = session.state.get_untracked().user().cloned() else {
                return;
            };
            let form = UserEditForm {
                name: edit_name.get_untracked(),
                gender: edit_gender.get_untracked(),
                email: edit_email.get_untracked(),
                phone: edit_phone.get_untracked(),
                location: edit_location.get_untracked(),
            };
            let api = api.clone();
            spawn_local(async move {
                match update_user(&api, &user, &form).await {
                    Ok(updated) => {
                        session.refresh_identity(Identity::User(updated));
                        set_edit_mode.set(false);
                        alert("Profile updated successfully!");
                    }
                    Err(crate::flows::FlowError::Validation(msg)) => alert(&msg),
                    Err(_) => alert("Failed to update profile. Please try again."),
                }
            });
        }
    };

    let confirm_completion = {
        let api = api.clone();
        move |booking_id: u64| {
            let api = api.clone();
            spawn_local(async move {
                match booking_flow::confirm_completion(&api, booking_id).await {
                    Ok(()) => history_rev.bump(),
                    Err(_) => alert("Failed to confirm job completion. Please try again."),
                }
            });
        }
    };

    let open_chat = {
        let api = api.clone();
        move |booking: BookingRecord| {
            let Some(user) = session.state.get_untracked().user().cloned() else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                match chat_flow::open_for_user(
                    &api,
                    &user,
                    booking.caregiver_id,
                    &booking.caregiver_name,
                )
                .await
                {
                    Ok(chat_session) => chat.open(&api, chat_session).await,
                    Err(err) => alert(&err.user_message()),
                }
            });
        }
    };

    view! {
        <div class="max-w-3xl mx-auto p-8">
            <Show when=move || session.state.get().is_user()>
                {
                    let save_profile = save_profile.clone();
                    move || {
                    let save_profile = save_profile.clone();
                    let user = session.state.get().user().cloned().unwrap();
                    view! {
                        <div class="card bg-base-100 shadow-xl card-body mb-6">
                            <Show
                                when=move || !edit_mode.get()
                                fallback={
                                    let save_profile = save_profile.clone();
                                    move || {
                                        let save_profile = save_profile.clone();
                                        view! {
                                            <div class="grid gap-3">
                                                <input class="input input-bordered" prop:value=edit_name
                                                    on:input=move |ev| edit_name.set(event_target_value(&ev)) />
                                                <select class="select select-bordered" prop:value=edit_gender
                                                    on:change=move |ev| edit_gender.set(event_target_value(&ev))>
                                                    <option value="Female">"Female"</option>
                                                    <option value="Male">"Male"</option>
                                                    <option value="Other">"Other"</option>
                                                </select>
                                                <input class="input input-bordered" prop:value=edit_email
                                                    on:input=move |ev| edit_email.set(event_target_value(&ev)) />
                                                <input class="input input-bordered" prop:value=edit_phone
                                                    on:input=move |ev| edit_phone.set(event_target_value(&ev)) />
                                                <input class="input input-bordered" prop:value=edit_location
                                                    on:input=move |ev| edit_location.set(event_target_value(&ev)) />
                                                <div class="flex gap-2">
                                                    <button class="btn btn-primary" on:click=save_profile>"Save"</button>
                                                    <button class="btn btn-ghost" on:click=move |_| set_edit_mode.set(false)>
                                                        "Cancel"
                                                    </button>
                                                </div>
                                            </div>
                                        }
                                    }
                                }
                            >
                                <div class="flex items-center gap-4">
                                    <div class="avatar placeholder">
                                        <div class="bg-primary text-primary-content rounded-full w-16">
                                            <span class="text-2xl">{user.avatar.clone()}</span>
                                        </div>
                                    </div>
                                    <div>
                                        <h1 class="text-2xl font-bold">{user.name.clone()}</h1>
                                        <p class="text-base-content/70">{user.gender.clone()}</p>
                                        <p class="text-sm">{user.email.clone()} " · " {user.phone.clone()}</p>
                                        <p class="text-sm text-base-content/70">{user.location.clone()}</p>
                                    </div>
                                    <button class="btn btn-outline ml-auto" on:click=enter_edit>"Edit"</button>
                                </div>
                            </Show>
                        </div>
                    }
                }}
            </Show>

            <h2 class="text-xl font-bold mb-3">"Booking history"</h2>

            <Show when=move || history_error.get().is_some()>
                <p class="text-error text-center py-8">{move || history_error.get().unwrap_or_default()}</p>
            </Show>

            <Show when=move || history_error.get().is_none() && history.with(|h| h.is_empty())>
                <p class="text-base-content/50 text-center py-8">"No bookings yet"</p>
            </Show>

            <div class="space-y-4">
                <For
                    each=move || history.get()
                    key=|booking| (booking.booking_id, booking.status, booking.rated)
                    children={
                        let confirm_completion = confirm_completion.clone();
                        let open_chat = open_chat.clone();
                        move |booking| {
                            let confirm_completion = confirm_completion.clone();
                            let open_chat = open_chat.clone();
                            let chat_booking = booking.clone();
                            let rate_booking = booking.clone();
                            view! {
                                <div class="card bg-base-100 shadow card-body">
                                    <div class="flex justify-between">
                                        <strong>{booking.caregiver_name.clone()}</strong>
                                        <span class="text-primary font-semibold">
                                            {format!("RM {}", booking.total)}
                                        </span>
                                    </div>
                                    <p class="text-sm text-base-content/70">
                                        {booking.date.clone()} {format!(" · {} hours", booking.hours)}
                                    </p>

                                    {booking_actions(
                                        &booking,
                                        move || rating_ctx.target.set(Some(rate_booking.clone())),
                                        move || confirm_completion(booking.booking_id),
                                    )}

                                    <div>
                                        <button
                                            class="btn btn-outline btn-sm"
                                            on:click=move |_| open_chat(chat_booking.clone())
                                        >
                                            "💬 Chat"
                                        </button>
                                    </div>
                                </div>
                            }
                        }
                    }
                />
            </div>
        </div>
    }
}

/// 按预约状态渲染对应的动作区域
fn booking_actions(
    booking: &BookingRecord,
    on_rate: impl Fn() + Clone + 'static,
    on_confirm: impl Fn() + Clone + 'static,
) -> AnyView {
    match (booking.status, booking.rated) {
        (BookingStatus::Completed, false) => view! {
            <button class="btn btn-primary btn-sm w-fit" on:click=move |_| on_rate()>
                "⭐ Rate & Review"
            </button>
        }
        .into_any(),
        (BookingStatus::Completed, true) => {
            let rating = booking.user_rating.unwrap_or_default();
            let review = booking.user_review.clone().unwrap_or_default();
            view! {
                <div>
                    <span class="badge badge-success">"✓ Completed & Rated"</span>
                    <span class="ml-2 text-warning">{format!("⭐ {}/5", rating)}</span>
                    <Show when={
                        let review = review.clone();
                        move || !review.is_empty()
                    }>
                        <p class="text-sm italic text-base-content/70 mt-1">
                            {format!("\"{}\"", review)}
                        </p>
                    </Show>
                </div>
            }
            .into_any()
        }
        (BookingStatus::PendingCompletion, _) => view! {
            <button class="btn btn-primary btn-sm w-fit" on:click=move |_| on_confirm()>
                "✓ Confirm Job Completed"
            </button>
        }
        .into_any(),
        (BookingStatus::InProgress, _) => in_progress_actions(booking.booking_id).into_any(),
    }
}

/// 进行中的预约：demo 特性提供状态快进按钮
#[cfg(feature = "demo")]
fn in_progress_actions(booking_id: u64) -> impl IntoView {
    let api = use_context::<AppApi>().expect("AppApi should be provided");
    let history_rev = crate::components::use_history_rev();
    let on_fast_forward = move |_| {
        let api = api.clone();
        spawn_local(async move {
            if booking_flow::fast_forward(&api, booking_id).await.is_ok() {
                history_rev.bump();
            }
        });
    };

    view! {
        <div>
            <span class="badge badge-warning">"⏳ In Progress"</span>
            <button class="btn btn-outline btn-xs ml-2" on:click=on_fast_forward>
                "🚀 Fast Forward (Demo)"
            </button>
        </div>
    }
}

#[cfg(not(feature = "demo"))]
fn in_progress_actions(_booking_id: u64) -> impl IntoView {
    view! {
        <div>
            <span class="badge badge-warning">"⏳ In Progress"</span>
        </div>
    }
}
