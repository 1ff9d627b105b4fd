//! 护工仪表盘
//!
//! 进入页面即武装轮询：立即刷新一次工单列表，之后每 10 秒一次。
//! 单次刷新失败只把对应列表区域替换为内联错误，不中断后续调度。
//! 轮询回调在响应落地前检查调度是否仍然存活，避免离开页面后的
//! 迟到响应重绘。

use crate::api::AppApi;
use crate::components::alert;
use crate::components::chat::use_chat;
use crate::components::job_details::use_job_details;
use crate::components::success::use_success;
use crate::components::training_modal::use_training_modal;
use crate::flows::chat as chat_flow;
use crate::flows::jobs as jobs_flow;
use crate::poller;
use crate::session::{Identity, use_session};
use crate::web::route::AppRoute;
use careloop_shared::{AcceptedJob, JobRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 平台提供的培训项目（目录是静态的，详情与报名走 API）
pub const TRAINING_PROGRAMS: [(u64, &str, &str); 3] = [
    (1, "Certified Caregiver Fundamentals", "4 weeks"),
    (2, "Dementia Care Specialist", "6 weeks"),
    (3, "First Aid & CPR", "2 days"),
];

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();
    let success = use_success();
    let chat = use_chat();
    let job_details = use_job_details();
    let training_modal = use_training_modal();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    let (job_requests, set_job_requests) = signal(Vec::<JobRequest>::new());
    let (requests_error, set_requests_error) = signal(Option::<String>::None);
    let (accepted_jobs, set_accepted_jobs) = signal(Vec::<AcceptedJob>::new());
    let (accepted_error, set_accepted_error) = signal(Option::<String>::None);

    // 单次刷新：两张列表各自成败，失败渲染内联错误
    let refresh_lists = {
        let api = api.clone();
        move || {
            let Some(caregiver) = session.state.get_untracked().caregiver().cloned() else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                let requests = jobs_flow::load_requests(&api, caregiver.caregiver_id).await;
                let accepted = jobs_flow::load_accepted(&api, caregiver.caregiver_id).await;

                // 调度已撤销则丢弃这次迟到的结果
                if !poller::is_polling() {
                    return;
                }

                match requests {
                    Ok(list) => {
                        set_requests_error.set(None);
                        set_job_requests.set(list);
                    }
                    Err(err) => {
                        web_sys::console::error_1(
                            &format!("[Poller] job request refresh failed: {}", err).into(),
                        );
                        set_requests_error.set(Some(
                            "Failed to load job requests. Please refresh the page.".to_string(),
                        ));
                    }
                }
                match accepted {
                    Ok(list) => {
                        set_accepted_error.set(None);
                        set_accepted_jobs.set(list);
                    }
                    Err(err) => {
                        web_sys::console::error_1(
                            &format!("[Poller] accepted job refresh failed: {}", err).into(),
                        );
                        set_accepted_error.set(Some("Failed to load accepted jobs".to_string()));
                    }
                }
            });
        }
    };

    // 挂载即武装轮询（重复进入由 rearm 保证只剩一个定时器）
    Effect::new({
        let refresh_lists = refresh_lists.clone();
        move |_| {
            if session.state.get().is_caregiver() {
                let refresh_lists = refresh_lists.clone();
                poller::rearm(Box::new(move || refresh_lists()));
            }
        }
    });

    let accept_job = {
        let api = api.clone();
        move |job_request_id: u64| {
            let Some(caregiver) = session.state.get_untracked().caregiver().cloned() else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                match jobs_flow::accept_job(&api, job_request_id, caregiver.caregiver_id).await {
                    Ok(job) => {
                        success.show(
                            "Job Accepted!",
                            vec![format!(
                                "You have successfully accepted the job request from {}. \
                                 You can now chat with them to discuss details.",
                                job.user_name
                            )],
                            Some(AppRoute::CaregiverDashboard),
                        );
                    }
                    Err(_) => alert("Failed to accept job. Please try again."),
                }
            });
        }
    };

    let complete_job = {
        let api = api.clone();
        move |accepted_job_id: u64| {
            let confirmed = web_sys::window()
                .and_then(|w| {
                    w.confirm_with_message("Are you sure you want to mark this job as completed?")
                        .ok()
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let Some(caregiver) = session.state.get_untracked().caregiver().cloned() else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                match jobs_flow::complete_job(&api, accepted_job_id, caregiver.caregiver_id).await {
                    Ok((settlement, profile)) => {
                        // 以服务端档案为准更新累计值
                        session.refresh_identity(Identity::Caregiver(profile));
                        success.show(
                            "Job Completed!",
                            vec![
                                "Job marked as completed successfully!".to_string(),
                                format!("Your earnings: RM {:.2}", settlement.earnings),
                                format!("After 15% commission (RM {:.2})", settlement.commission),
                                "💰 Payment released from escrow and added to your total \
                                 earnings!"
                                    .to_string(),
                            ],
                            Some(AppRoute::CaregiverDashboard),
                        );
                    }
                    Err(_) => alert("Failed to complete job. Please try again."),
                }
            });
        }
    };

    let open_chat = {
        let api = api.clone();
        move |user_name: String| {
            let Some(caregiver) = session.state.get_untracked().caregiver().cloned() else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                match chat_flow::open_for_caregiver(&api, &caregiver, &user_name).await {
                    Ok(chat_session) => chat.open(&api, chat_session).await,
                    Err(err) => alert(&err.user_message()),
                }
            });
        }
    };

    let stats = move || session.state.get().caregiver().cloned();

    view! {
        <div class="max-w-5xl mx-auto p-8 space-y-6">
            <Show when=move || stats().is_some()>
                {move || {
                    let caregiver = stats().unwrap();
                    view! {
                        <div>
                            <h1 class="text-3xl font-bold mb-4">
                                "Welcome back, " {caregiver.name.clone()}
                            </h1>
                            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                                <div class="stat">
                                    <div class="stat-title">"Total earnings"</div>
                                    <div class="stat-value text-primary">
                                        {format!("RM {:.2}", caregiver.total_earnings)}
                                    </div>
                                </div>
                                <div class="stat">
                                    <div class="stat-title">"Completed jobs"</div>
                                    <div class="stat-value">{caregiver.total_jobs}</div>
                                </div>
                                <div class="stat">
                                    <div class="stat-title">"Rating"</div>
                                    <div class="stat-value text-warning">
                                        {format!("⭐ {:.1}", caregiver.average_rating)}
                                    </div>
                                    <div class="stat-desc">{format!("{} reviews", caregiver.total_reviews)}</div>
                                </div>
                            </div>
                        </div>
                    }
                }}
            </Show>

            <div class="card bg-base-100 shadow-xl card-body">
                <h2 class="card-title">"New job requests"</h2>
                <Show when=move || requests_error.get().is_some()>
                    <p class="text-error text-center py-4">
                        {move || requests_error.get().unwrap_or_default()}
                    </p>
                </Show>
                <Show when=move || requests_error.get().is_none() && job_requests.with(|j| j.is_empty())>
                    <p class="text-base-content/50 text-center py-4">
                        "No job requests available at the moment"
                    </p>
                </Show>
                <For
                    each=move || job_requests.get()
                    key=|job| job.job_request_id
                    children={
                        let accept_job = accept_job.clone();
                        let open_chat = open_chat.clone();
                        move |job| {
                            let accept_job = accept_job.clone();
                            let open_chat = open_chat.clone();
                            let job_id = job.job_request_id;
                            let chat_name = job.user_name.clone();
                            let detail_job = job.clone();
                            view! {
                                <div class="border rounded-box p-4 mb-2">
                                    <div class="flex justify-between">
                                        <strong>{job.user_name.clone()}</strong>
                                        <strong class="text-primary">
                                            {format!("RM {:.2}/hour", job.hourly_rate)}
                                        </strong>
                                    </div>
                                    <p class="text-sm text-base-content/70">
                                        {job.care_type.clone()} " · " {job.start_date.clone()}
                                    </p>
                                    <p class="text-sm text-base-content/70 mb-2">
                                        "📍 " {job.distance.clone().unwrap_or_else(|| "Near you".to_string())}
                                    </p>
                                    <div class="flex gap-2">
                                        <button class="btn btn-primary btn-sm flex-1"
                                            on:click=move |_| accept_job(job_id)>
                                            "Accept Job"
                                        </button>
                                        <button class="btn btn-outline btn-sm flex-1"
                                            on:click=move |_| job_details.target.set(Some(detail_job.clone()))>
                                            "View Details"
                                        </button>
                                        <button class="btn btn-outline btn-sm"
                                            on:click=move |_| open_chat(chat_name.clone())>
                                            "💬"
                                        </button>
                                    </div>
                                </div>
                            }
                        }
                    }
                />
            </div>

            <div class="card bg-base-100 shadow-xl card-body">
                <h2 class="card-title">"Accepted jobs"</h2>
                <Show when=move || accepted_error.get().is_some()>
                    <p class="text-error text-center py-4">
                        {move || accepted_error.get().unwrap_or_default()}
                    </p>
                </Show>
                <Show when=move || accepted_error.get().is_none() && accepted_jobs.with(|j| j.is_empty())>
                    <p class="text-base-content/50 text-center py-4">
                        "No accepted jobs yet. Accept a job from the requests above!"
                    </p>
                </Show>
                <For
                    each=move || accepted_jobs.get()
                    key=|job| job.accepted_job_id
                    children={
                        let complete_job = complete_job.clone();
                        let open_chat = open_chat.clone();
                        move |job| {
                            let complete_job = complete_job.clone();
                            let open_chat = open_chat.clone();
                            let job_id = job.accepted_job_id;
                            let chat_name = job.user_name.clone();
                            view! {
                                <div class="border rounded-box p-4 mb-2 bg-success/5">
                                    <div class="flex justify-between">
                                        <strong>{job.user_name.clone()}</strong>
                                        <strong class="text-success">"✓ Accepted"</strong>
                                    </div>
                                    <p class="text-sm text-base-content/70 mb-2">
                                        {job.care_type.clone()} " · " {job.start_date.clone()}
                                    </p>
                                    <div class="flex gap-2">
                                        <button class="btn btn-outline btn-sm flex-1"
                                            on:click=move |_| complete_job(job_id)>
                                            "Mark as Complete"
                                        </button>
                                        <button class="btn btn-outline btn-sm"
                                            on:click=move |_| open_chat(chat_name.clone())>
                                            "💬 Chat"
                                        </button>
                                    </div>
                                </div>
                            }
                        }
                    }
                />
            </div>

            <div class="card bg-base-100 shadow-xl card-body">
                <h2 class="card-title">"Training programs"</h2>
                <p class="text-sm text-base-content/70">
                    "Boost your profile with platform certifications."
                </p>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-3">
                    {TRAINING_PROGRAMS
                        .iter()
                        .map(|(id, title, duration)| {
                            let id = *id;
                            view! {
                                <div class="border rounded-box p-4">
                                    <h3 class="font-semibold">{*title}</h3>
                                    <p class="text-sm text-base-content/70 mb-2">{*duration}</p>
                                    <button class="btn btn-outline btn-sm"
                                        on:click=move |_| training_modal.program_id.set(Some(id))>
                                        "View details"
                                    </button>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        </div>
    }
}
