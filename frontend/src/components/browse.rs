//! 护工浏览页
//!
//! 进入页面即按当前护理类型拉取列表；列表加载失败时用内联错误
//! 替换列表区域，不打断页面其它部分。点选卡片拉取完整档案并进入
//! 公开档案页。

use crate::api::AppApi;
use crate::components::{CARE_TYPES, alert, use_browse};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use careloop_shared::CaregiverSummary;
use careloop_shared::protocol::{GetCaregiver, ListCaregivers};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn BrowsePage() -> impl IntoView {
    let router = use_router();
    let browse = use_browse();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    let (caregivers, set_caregivers) = signal(Vec::<CaregiverSummary>::new());
    let (loading, set_loading) = signal(true);
    let (load_error, set_load_error) = signal(Option::<String>::None);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            let care_type = browse.care_type.get_untracked();
            set_loading.set(true);
            set_load_error.set(None);
            spawn_local(async move {
                match api.call(&ListCaregivers { care_type }).await {
                    Ok(list) => set_caregivers.set(list),
                    Err(err) => {
                        web_sys::console::error_1(
                            &format!("[Browse] failed to load caregivers: {}", err).into(),
                        );
                        set_load_error
                            .set(Some("Failed to load caregivers. Please try again.".to_string()));
                    }
                }
                set_loading.set(false);
            });
        }
    };

    // 进入页面与切换护理类型时刷新列表
    Effect::new({
        let load = load.clone();
        move |_| {
            browse.care_type.track();
            load();
        }
    });

    let select_caregiver = {
        let api = api.clone();
        move |caregiver_id: u64| {
            let api = api.clone();
            spawn_local(async move {
                match api.call(&GetCaregiver { caregiver_id }).await {
                    Ok(profile) => {
                        browse.selected.set(Some(profile));
                        router.navigate(AppRoute::CaregiverProfile);
                    }
                    Err(_) => alert("Failed to load caregiver profile. Please try again."),
                }
            });
        }
    };

    let count_line = move || {
        let count = caregivers.with(|c| c.len());
        match browse.care_type.get() {
            Some(care_type) => format!("Found {} verified caregivers for {}", count, care_type),
            None => format!("Found {} verified caregivers", count),
        }
    };

    view! {
        <div class="max-w-5xl mx-auto p-8">
            <div class="flex items-center justify-between mb-6">
                <div>
                    <h1 class="text-3xl font-bold">"Browse caregivers"</h1>
                    <p class="text-base-content/70">{count_line}</p>
                </div>
                <select
                    class="select select-bordered"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        browse.care_type.set(if value.is_empty() { None } else { Some(value) });
                    }
                >
                    <option value="">"All care types"</option>
                    {CARE_TYPES
                        .iter()
                        .map(|&care_type| {
                            let selected = browse.care_type.get_untracked().as_deref() == Some(care_type);
                            view! { <option value=care_type selected=selected>{care_type}</option> }
                        })
                        .collect_view()}
                </select>
            </div>

            <Show when=move || load_error.get().is_some()>
                <p class="text-error text-center py-8">{move || load_error.get().unwrap_or_default()}</p>
            </Show>

            <Show when=move || loading.get() && caregivers.with(|c| c.is_empty())>
                <div class="text-center py-8">
                    <span class="loading loading-spinner loading-md"></span>
                    " Loading..."
                </div>
            </Show>

            <Show when=move || !loading.get() && load_error.get().is_none() && caregivers.with(|c| c.is_empty())>
                <p class="text-base-content/50 text-center py-8">
                    "No caregivers found for this category. Try a different care type."
                </p>
            </Show>

            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                <For
                    each=move || caregivers.get()
                    key=|caregiver| caregiver.id
                    children={
                        let select_caregiver = select_caregiver.clone();
                        move |caregiver| {
                            let select_caregiver = select_caregiver.clone();
                            let id = caregiver.id;
                            view! {
                                <div
                                    class="card bg-base-100 shadow hover:shadow-lg cursor-pointer"
                                    on:click=move |_| select_caregiver(id)
                                >
                                    <div class="card-body">
                                        <div class="flex items-center gap-3">
                                            <div class="avatar placeholder">
                                                <div class="bg-primary text-primary-content rounded-full w-12">
                                                    <span>{caregiver.avatar.clone()}</span>
                                                </div>
                                            </div>
                                            <div>
                                                <h3 class="font-bold">{caregiver.name.clone()}</h3>
                                                <p class="text-sm text-base-content/70">{caregiver.distance.clone()}</p>
                                            </div>
                                        </div>
                                        <p class="text-sm">
                                            "⭐ " {format!("{:.1}", caregiver.rating)}
                                            <span class="text-base-content/60">
                                                {format!(" ({} reviews)", caregiver.reviews)}
                                            </span>
                                        </p>
                                        <p class="text-sm text-base-content/70">
                                            {caregiver.experience.clone()} " experience"
                                        </p>
                                        <div class="flex gap-1 flex-wrap">
                                            {caregiver
                                                .specialties
                                                .iter()
                                                .map(|s| view! { <span class="badge badge-outline">{s.clone()}</span> })
                                                .collect_view()}
                                        </div>
                                        <div class="flex justify-between items-center pt-2 border-t">
                                            <span class="text-lg font-bold text-primary">{caregiver.rate_display.clone()}</span>
                                            <span class="badge badge-success badge-outline">{caregiver.availability.clone()}</span>
                                        </div>
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
