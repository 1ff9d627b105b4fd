//! 选中护工的公开档案页
//!
//! 展示档案、发起预约、打开聊天。选中档案由浏览页写入 Context，
//! 直接进入本页而没有选中档案时回退到浏览页。

use crate::api::AppApi;
use crate::components::chat::use_chat;
use crate::components::{alert, use_browse};
use crate::flows::chat as chat_flow;
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn CaregiverProfilePage() -> impl IntoView {
    let router = use_router();
    let browse = use_browse();
    let session = use_session();
    let chat = use_chat();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    // 守卫：无选中档案则回浏览页
    Effect::new(move |_| {
        if browse.selected.get().is_none() {
            router.redirect(AppRoute::BrowseCaregivers);
        }
    });

    let on_book = move |_| {
        if session.state.get_untracked().is_user() {
            router.navigate(AppRoute::BookingPayment);
        } else {
            alert("Please login first");
            router.navigate(AppRoute::UserLogin);
        }
    };

    let on_chat = move |_| {
        let Some(user) = session.state.get_untracked().user().cloned() else {
            alert("Please login first");
            return;
        };
        let Some(caregiver) = browse.selected.get_untracked() else {
            return;
        };
        let api = api.clone();
        spawn_local(async move {
            match chat_flow::open_for_user(&api, &user, caregiver.caregiver_id, &caregiver.name)
                .await
            {
                Ok(chat_session) => chat.open(&api, chat_session).await,
                Err(err) => alert(&err.user_message()),
            }
        });
    };

    view! {
        <Show when=move || browse.selected.get().is_some()>
            {
                let on_chat = on_chat.clone();
                move || {
                let on_chat = on_chat.clone();
                let caregiver = browse.selected.get().unwrap();
                view! {
                    <div class="max-w-3xl mx-auto p-8">
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body">
                                <div class="flex items-center gap-4">
                                    <div class="avatar placeholder">
                                        <div class="bg-primary text-primary-content rounded-full w-16">
                                            <span class="text-2xl">{caregiver.avatar.clone()}</span>
                                        </div>
                                    </div>
                                    <div>
                                        <h1 class="text-2xl font-bold">{caregiver.name.clone()}</h1>
                                        <p>
                                            "⭐ " {format!("{:.1}", caregiver.average_rating)}
                                            <span class="text-base-content/60">
                                                {format!(" ({} reviews)", caregiver.total_reviews)}
                                            </span>
                                        </p>
                                        <p class="text-base-content/70">{caregiver.experience.clone()} " experience"</p>
                                    </div>
                                    <div class="ml-auto text-right">
                                        <p class="text-2xl font-bold text-primary">
                                            {format!("RM {}/hour", caregiver.hourly_rate)}
                                        </p>
                                        <span class="badge badge-success badge-outline">
                                            {caregiver.availability_status.clone()}
                                        </span>
                                    </div>
                                </div>

                                <div class="mt-4">
                                    <h3 class="font-semibold mb-1">"Specialties"</h3>
                                    <div class="flex gap-1 flex-wrap">
                                        {caregiver
                                            .specialties
                                            .iter()
                                            .map(|s| view! { <span class="badge badge-outline">{s.clone()}</span> })
                                            .collect_view()}
                                    </div>
                                </div>

                                <div class="mt-2">
                                    <h3 class="font-semibold mb-1">"Certifications"</h3>
                                    <ul class="list-disc list-inside text-sm text-base-content/80">
                                        {caregiver
                                            .certifications
                                            .iter()
                                            .map(|c| view! { <li>{c.clone()}</li> })
                                            .collect_view()}
                                    </ul>
                                </div>

                                <div class="mt-2">
                                    <h3 class="font-semibold mb-1">"Languages"</h3>
                                    <div class="flex gap-1 flex-wrap">
                                        {caregiver
                                            .languages
                                            .iter()
                                            .map(|l| view! { <span class="badge">{l.clone()}</span> })
                                            .collect_view()}
                                    </div>
                                </div>

                                <div class="card-actions mt-6">
                                    <button class="btn btn-primary flex-1" on:click=on_book>"Book now"</button>
                                    <button class="btn btn-outline" on:click=on_chat>"💬 Chat"</button>
                                </div>
                            </div>
                        </div>
                    </div>
                }
            }}
        </Show>
    }
}
