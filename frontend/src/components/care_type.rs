//! 护理类型选择与需求详情页

use crate::components::{CARE_TYPES, use_browse};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

#[component]
pub fn CareTypeSelectionPage() -> impl IntoView {
    let router = use_router();
    let browse = use_browse();

    let choose = move |care_type: &'static str| {
        browse.care_type.set(Some(care_type.to_string()));
        router.navigate(AppRoute::BrowseCaregivers);
    };

    view! {
        <div class="max-w-2xl mx-auto p-8">
            <h1 class="text-3xl font-bold mb-2">"Who needs care?"</h1>
            <p class="text-base-content/70 mb-6">"We'll match caregivers specializing in this type of care."</p>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                {CARE_TYPES
                    .iter()
                    .map(|care_type| {
                        let care_type = *care_type;
                        view! {
                            <button
                                class="card bg-base-100 shadow hover:shadow-lg p-8 text-left"
                                on:click=move |_| choose(care_type)
                            >
                                <span class="text-lg font-semibold">{care_type}</span>
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <button
                class="btn btn-ghost mt-6"
                on:click=move |_| router.navigate(AppRoute::BrowseCaregivers)
            >
                "Skip, show everyone"
            </button>
        </div>
    }
}

#[component]
pub fn CareDetailsPage() -> impl IntoView {
    let router = use_router();
    let (notes, set_notes) = signal(String::new());

    view! {
        <div class="max-w-2xl mx-auto p-8">
            <h1 class="text-3xl font-bold mb-2">"Anything we should know?"</h1>
            <p class="text-base-content/70 mb-6">
                "Optional notes about routines, mobility or medication. You can refine these per booking."
            </p>
            <textarea
                class="textarea textarea-bordered w-full h-32"
                placeholder="e.g. Mum needs help with morning walks and insulin reminders"
                on:input=move |ev| set_notes.set(event_target_value(&ev))
                prop:value=notes
            ></textarea>
            <div class="mt-6">
                <button
                    class="btn btn-primary"
                    on:click=move |_| router.navigate(AppRoute::CareTypeSelection)
                >
                    "Continue"
                </button>
            </div>
        </div>
    }
}
