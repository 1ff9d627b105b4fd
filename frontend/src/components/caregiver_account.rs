//! 护工账户视图
//!
//! 进入页面时回读服务端档案（权威累计值）、报名中的培训与收到的
//! 评价；评价在客户端聚合出均分与星级分布。

use crate::api::AppApi;
use crate::flows::profile::{self as profile_flow, ReviewStats, aggregate};
use crate::flows::training as training_flow;
use crate::session::{Identity, use_session};
use careloop_shared::{Review, TrainingEnrollment};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn CaregiverAccountPage() -> impl IntoView {
    let session = use_session();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    let (trainings, set_trainings) = signal(Vec::<TrainingEnrollment>::new());
    let (reviews, set_reviews) = signal(Vec::<Review>::new());
    let (reviews_error, set_reviews_error) = signal(Option::<String>::None);

    // 只在挂载时刷新一次（档案写回会更新会话状态，不能反过来触发本效应）
    Effect::new({
        let api = api.clone();
        move |_| {
            let Some(caregiver) = session.state.get_untracked().caregiver().cloned() else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                // 档案回读失败时沿用本地缓存展示
                if let Ok(fresh) = profile_flow::refresh_caregiver(&api, caregiver.caregiver_id).await
                {
                    session.refresh_identity(Identity::Caregiver(fresh));
                }
                if let Ok(list) = training_flow::enrollments(&api, caregiver.caregiver_id).await {
                    set_trainings.set(list);
                }
                match profile_flow::caregiver_reviews(&api, caregiver.caregiver_id).await {
                    Ok(list) => {
                        set_reviews_error.set(None);
                        set_reviews.set(list);
                    }
                    Err(err) => {
                        web_sys::console::error_1(
                            &format!("[Account] failed to load reviews: {}", err).into(),
                        );
                        set_reviews_error.set(Some("Failed to load reviews".to_string()));
                    }
                }
            });
        }
    });

    let stats = Signal::derive(move || reviews.with(|r| aggregate(r)));

    view! {
        <div class="max-w-3xl mx-auto p-8 space-y-6">
            <Show when=move || session.state.get().is_caregiver()>
                {move || {
                    let caregiver = session.state.get().caregiver().cloned().unwrap();
                    view! {
                        <div class="card bg-base-100 shadow-xl card-body">
                            <div class="flex items-center gap-4">
                                <div class="avatar placeholder">
                                    <div class="bg-primary text-primary-content rounded-full w-16">
                                        <span class="text-2xl">{caregiver.avatar.clone()}</span>
                                    </div>
                                </div>
                                <div>
                                    <h1 class="text-2xl font-bold">{caregiver.name.clone()}</h1>
                                    <p class="text-base-content/70">
                                        {caregiver.experience.clone()} " experience · "
                                        {format!("RM {}/hour", caregiver.hourly_rate)}
                                    </p>
                                    <p class="text-sm">{caregiver.email.clone()} " · " {caregiver.phone.clone()}</p>
                                    <p class="text-sm text-base-content/70">{caregiver.location.clone()}</p>
                                </div>
                            </div>

                            <div class="stats stats-vertical md:stats-horizontal mt-4">
                                <div class="stat">
                                    <div class="stat-title">"Completed jobs"</div>
                                    <div class="stat-value">{caregiver.total_jobs}</div>
                                </div>
                                <div class="stat">
                                    <div class="stat-title">"Total earnings"</div>
                                    <div class="stat-value text-primary">
                                        {format!("RM {:.2}", caregiver.total_earnings)}
                                    </div>
                                </div>
                            </div>

                            <div class="mt-2">
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
                                <h3 class="font-semibold mb-1">"Certifications & training"</h3>
                                <Show when=move || {
                                    trainings.with(|t| t.is_empty())
                                        && session
                                            .state
                                            .get()
                                            .caregiver()
                                            .map(|c| c.certifications.is_empty())
                                            .unwrap_or(true)
                                }>
                                    <p class="text-base-content/60 text-sm">"No certifications uploaded yet"</p>
                                </Show>
                                <ul class="text-sm space-y-1">
                                    {caregiver
                                        .certifications
                                        .iter()
                                        .map(|c| view! { <li>"✓ " {c.clone()}</li> })
                                        .collect_view()}
                                    <For
                                        each=move || trainings.get()
                                        key=|t| t.training_program_id
                                        children=move |t| {
                                            let status = if t.status == "completed" {
                                                "Completed"
                                            } else {
                                                "Enrolled"
                                            };
                                            view! {
                                                <li class="text-primary">
                                                    "🎓 " {t.title.clone()} {format!(" ({})", status)}
                                                </li>
                                            }
                                        }
                                    />
                                </ul>
                            </div>
                        </div>
                    }
                }}
            </Show>

            <div class="card bg-base-100 shadow-xl card-body">
                <h2 class="card-title">"Reviews"</h2>

                <Show when=move || reviews_error.get().is_some()>
                    <p class="text-error text-center py-4">{move || reviews_error.get().unwrap_or_default()}</p>
                </Show>

                <Show when=move || reviews_error.get().is_none() && reviews.with(|r| r.is_empty())>
                    <p class="text-base-content/50 text-center py-4">"No reviews yet"</p>
                </Show>

                <Show when=move || !reviews.with(|r| r.is_empty())>
                    <div class="text-center bg-base-200 rounded-box p-4 mb-3">
                        <div class="text-4xl font-bold text-warning">
                            {move || format!("⭐ {:.1}", stats.get().average)}
                        </div>
                        <p class="text-base-content/70">
                            {move || {
                                let total = stats.get().total;
                                format!("{} {}", total, if total == 1 { "Review" } else { "Reviews" })
                            }}
                        </p>
                        <div class="flex justify-center gap-3 mt-2 text-xs">
                            {(1..=5usize)
                                .rev()
                                .map(|star| {
                                    view! {
                                        <div class="text-center">
                                            <p>{format!("{}⭐", star)}</p>
                                            <p>{move || stats.get().histogram[star - 1]}</p>
                                        </div>
                                    }
                                })
                                .collect_view()}
                        </div>
                    </div>

                    <For
                        each=move || reviews.get()
                        key=|review| (review.created_at.clone(), review.user_name.clone())
                        children=move |review| {
                            view! {
                                <div class="border rounded-box p-3 mb-2">
                                    <div class="flex justify-between items-start">
                                        <div>
                                            <p class="font-semibold">{review.user_name.clone()}</p>
                                            <p class="text-xs text-base-content/60">{review.created_at.clone()}</p>
                                        </div>
                                        <span class="text-warning">{"⭐".repeat(review.rating as usize)}</span>
                                    </div>
                                    {match &review.review_text {
                                        Some(text) if !text.is_empty() => view! {
                                            <p class="text-sm mt-1">{text.clone()}</p>
                                        }
                                        .into_any(),
                                        _ => view! {
                                            <p class="text-sm italic text-base-content/50 mt-1">"No written review"</p>
                                        }
                                        .into_any(),
                                    }}
                                    <p class="text-xs text-base-content/60 mt-1 border-t pt-1">
                                        {format!(
                                            "📅 Booking: {} · {} hours · RM {}",
                                            review.booking_date, review.hours, review.total_amount
                                        )}
                                    </p>
                                </div>
                            }
                        }
                    />
                </Show>
            </div>
        </div>
    }
}
