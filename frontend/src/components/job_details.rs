//! 工单详情弹窗
//!
//! 展示完整的请求信息与接单前的收入预估（总额 - 15% 抽佣 = 净收入）。

use crate::api::AppApi;
use crate::components::alert;
use crate::components::success::use_success;
use crate::flows::jobs::{self as jobs_flow, earnings_preview};
use crate::session::use_session;
use crate::web::route::AppRoute;
use careloop_shared::JobRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy)]
pub struct JobDetailsContext {
    /// 查看中的工单；Some 即弹窗可见
    pub target: RwSignal<Option<JobRequest>>,
}

impl JobDetailsContext {
    pub fn new() -> Self {
        Self {
            target: RwSignal::new(None),
        }
    }
}

impl Default for JobDetailsContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_job_details() -> JobDetailsContext {
    use_context::<JobDetailsContext>().expect("JobDetailsContext should be provided")
}

#[component]
pub fn JobDetailsModal() -> impl IntoView {
    let ctx = use_job_details();
    let session = use_session();
    let success = use_success();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    let on_accept = move |job_request_id: u64| {
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
    };

    view! {
        <Show when=move || ctx.target.get().is_some()>
            {
                let on_accept = on_accept.clone();
                move || {
                let job = ctx.target.get().unwrap();
                let preview = earnings_preview(&job);
                let job_id = job.job_request_id;
                let on_accept = on_accept.clone();
                view! {
                    <div class="modal modal-open">
                        <div class="modal-box">
                            <div class="flex justify-between items-center mb-4">
                                <h2 class="text-xl font-bold">"Job Request Details"</h2>
                                <button class="btn btn-sm btn-ghost" on:click=move |_| ctx.target.set(None)>
                                    "✕"
                                </button>
                            </div>

                            <h3 class="font-semibold">{job.user_name.clone()}</h3>
                            <p class="text-primary font-semibold mb-3">{job.care_type.clone()}</p>

                            <div class="grid grid-cols-2 gap-3 text-sm mb-3">
                                <div>
                                    <p class="text-base-content/60">"Contact number"</p>
                                    <p class="font-semibold">{job.phone.clone()}</p>
                                </div>
                                <div>
                                    <p class="text-base-content/60">"Estimated payment"</p>
                                    <p class="font-semibold text-primary">
                                        {format!("RM {} ({} hours)", preview.gross, job.hours)}
                                    </p>
                                </div>
                                <div>
                                    <p class="text-base-content/60">"Start date"</p>
                                    <p class="font-semibold">{job.start_date.clone()}</p>
                                </div>
                                <div>
                                    <p class="text-base-content/60">"Distance"</p>
                                    <p class="font-semibold">
                                        {job.distance.clone().unwrap_or_else(|| "Near you".to_string())}
                                    </p>
                                </div>
                            </div>

                            <div class="mb-3 text-sm">
                                <p class="text-base-content/60">"Address"</p>
                                <p class="font-semibold">{job.address.clone()}</p>
                            </div>

                            <div class="mb-3 text-sm">
                                <p class="text-base-content/60">"Special requests"</p>
                                <div class="bg-info/10 rounded-box p-3">{job.special_requests.clone()}</div>
                            </div>

                            <div class="bg-warning/10 rounded-box p-3 text-sm mb-4">
                                <strong>"Commission notice: "</strong>
                                {format!(
                                    "15% commission fee will be deducted from the total payment. \
                                     Your actual earning will be RM {} (RM {} - 15% commission).",
                                    preview.net, preview.gross
                                )}
                            </div>

                            <div class="flex gap-2">
                                <button
                                    class="btn btn-primary flex-1"
                                    on:click=move |_| {
                                        ctx.target.set(None);
                                        on_accept(job_id);
                                    }
                                >
                                    "Accept Job"
                                </button>
                                <button class="btn btn-outline flex-1" on:click=move |_| ctx.target.set(None)>
                                    "Close"
                                </button>
                            </div>
                        </div>
                    </div>
                }
            }}
        </Show>
    }
}
