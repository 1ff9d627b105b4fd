//! 首页
//!
//! 两类入口：需要护理的用户与提供服务的护工，外加护理类型直达卡片。

use crate::components::{CARE_TYPES, use_browse};
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    let router = use_router();
    let session = use_session();
    let browse = use_browse();

    // 选卡即设定护理类型并进入浏览页（未登录也允许逛列表）
    let select_care_type = move |care_type: &'static str| {
        browse.care_type.set(Some(care_type.to_string()));
        router.navigate(AppRoute::BrowseCaregivers);
    };

    view! {
        <div class="hero bg-base-200 py-16">
            <div class="hero-content text-center flex-col">
                <h1 class="text-5xl font-bold">"Care you can count on"</h1>
                <p class="py-4 text-base-content/70 max-w-xl">
                    "Verified caregivers for your family, with escrow-protected payments: "
                    "the caregiver is paid only after both sides confirm the job is done."
                </p>
                <div class="flex gap-4">
                    <Show
                        when=move || session.state.get().identity.is_some()
                        fallback=move || view! {
                            <button class="btn btn-primary" on:click=move |_| router.navigate(AppRoute::UserLogin)>
                                "I need care"
                            </button>
                            <button class="btn btn-outline" on:click=move |_| router.navigate(AppRoute::CaregiverLogin)>
                                "I provide care"
                            </button>
                        }
                    >
                        <button class="btn btn-primary" on:click=move |_| router.navigate(AppRoute::BrowseCaregivers)>
                            "Browse caregivers"
                        </button>
                    </Show>
                </div>
            </div>
        </div>

        <div class="max-w-4xl mx-auto p-8">
            <h2 class="text-2xl font-bold mb-4">"What kind of care do you need?"</h2>
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                {CARE_TYPES
                    .iter()
                    .map(|care_type| {
                        let care_type = *care_type;
                        view! {
                            <button
                                class="card bg-base-100 shadow hover:shadow-lg p-6 text-left"
                                on:click=move |_| select_care_type(care_type)
                            >
                                <span class="font-semibold">{care_type}</span>
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
