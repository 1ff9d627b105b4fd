//! 培训详情弹窗
//!
//! 打开时拉取项目详情与当前报名状态；报名走"先重查再提交"的
//! 幂等流程，成功后按钮固化为已报名。

use crate::api::AppApi;
use crate::components::alert;
use crate::components::success::use_success;
use crate::flows::FlowError;
use crate::flows::training as training_flow;
use crate::session::use_session;
use crate::web::route::AppRoute;
use careloop_shared::TrainingProgram;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy)]
pub struct TrainingModalContext {
    /// 查看中的培训项目 id；Some 即弹窗可见
    pub program_id: RwSignal<Option<u64>>,
}

impl TrainingModalContext {
    pub fn new() -> Self {
        Self {
            program_id: RwSignal::new(None),
        }
    }
}

impl Default for TrainingModalContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_training_modal() -> TrainingModalContext {
    use_context::<TrainingModalContext>().expect("TrainingModalContext should be provided")
}

#[component]
pub fn TrainingModal() -> impl IntoView {
    let ctx = use_training_modal();
    let session = use_session();
    let success = use_success();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    let (program, set_program) = signal(Option::<TrainingProgram>::None);
    let (enrolled, set_enrolled) = signal(false);
    let (is_enrolling, set_is_enrolling) = signal(false);

    // 打开弹窗时加载详情与报名状态
    Effect::new({
        let api = api.clone();
        move |_| {
            let Some(program_id) = ctx.program_id.get() else {
                set_program.set(None);
                return;
            };
            let caregiver_id = session
                .state
                .get_untracked()
                .caregiver()
                .map(|c| c.caregiver_id);
            let api = api.clone();
            spawn_local(async move {
                match training_flow::program(&api, program_id).await {
                    Ok(details) => set_program.set(Some(details)),
                    Err(_) => {
                        alert("Failed to load training details. Please try again.");
                        ctx.program_id.set(None);
                        return;
                    }
                }
                if let Some(caregiver_id) = caregiver_id {
                    if let Ok(list) = training_flow::enrollments(&api, caregiver_id).await {
                        set_enrolled.set(training_flow::is_enrolled(&list, program_id));
                    }
                }
            });
        }
    });

    let on_enroll = {
        let api = api.clone();
        move |_| {
            let Some(caregiver) = session.state.get_untracked().caregiver().cloned() else {
                return;
            };
            let Some(program_id) = ctx.program_id.get_untracked() else {
                return;
            };
            let title = program
                .get_untracked()
                .map(|p| p.title)
                .unwrap_or_default();

            set_is_enrolling.set(true);
            let api = api.clone();
            spawn_local(async move {
                match training_flow::enroll(&api, caregiver.caregiver_id, program_id).await {
                    Ok(()) => {
                        set_enrolled.set(true);
                        ctx.program_id.set(None);
                        success.show(
                            "Enrollment Successful!",
                            vec![format!(
                                "You are now enrolled in \"{}\". Check your email for course \
                                 access details and schedule.",
                                title
                            )],
                            Some(AppRoute::CaregiverDashboard),
                        );
                    }
                    Err(FlowError::Validation(msg)) => {
                        set_enrolled.set(true);
                        alert(&msg);
                    }
                    Err(_) => alert("Enrollment failed. Please try again."),
                }
                set_is_enrolling.set(false);
            });
        }
    };

    view! {
        <Show when=move || ctx.program_id.get().is_some() && program.get().is_some()>
            {
                let on_enroll = on_enroll.clone();
                move || {
                let on_enroll = on_enroll.clone();
                let details = program.get().unwrap();
                view! {
                    <div class="modal modal-open">
                        <div class="modal-box">
                            <div class="flex justify-between items-center mb-2">
                                <h2 class="text-xl font-bold">{details.title.clone()}</h2>
                                <button class="btn btn-sm btn-ghost" on:click=move |_| ctx.program_id.set(None)>
                                    "✕"
                                </button>
                            </div>
                            <p class="text-sm text-base-content/70 mb-1">
                                {details.duration.clone()} " · " {details.certificate.clone()}
                            </p>
                            <p class="mb-3">{details.description.clone()}</p>

                            <h3 class="font-semibold mb-1">"What you'll learn"</h3>
                            <ul class="list-disc list-inside text-sm text-base-content/80 mb-4">
                                {details
                                    .topics
                                    .iter()
                                    .map(|topic| view! { <li>{topic.clone()}</li> })
                                    .collect_view()}
                            </ul>

                            <button
                                class=move || {
                                    if enrolled.get() { "btn btn-success w-full" } else { "btn btn-primary w-full" }
                                }
                                disabled=move || enrolled.get() || is_enrolling.get()
                                on:click=on_enroll.clone()
                            >
                                {move || if enrolled.get() { "Enrolled ✓" } else { "Enroll Now" }}
                            </button>
                        </div>
                    </div>
                }
            }}
        </Show>
    }
}
