//! 护工注册页
//!
//! 除基本信息外要求：至少勾选一个专长、必须上传身份证件。
//! 文件上传只在客户端记录文件名（内容不上传，占位跟踪），
//! 证书可多选累积，身份证件单个必选。

use crate::api::AppApi;
use crate::components::success::use_success;
use crate::components::{CARE_TYPES, alert};
use crate::flows::FlowError;
use crate::flows::auth::{CaregiverSignupForm, register_caregiver};
use crate::session::{Identity, use_session};
use crate::web::route::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::HtmlInputElement;

/// 从 file input 事件里取出选中的文件名列表
fn selected_file_names(ev: &leptos::web_sys::Event) -> Vec<String> {
    let input: HtmlInputElement = event_target(ev);
    let mut names = Vec::new();
    if let Some(files) = input.files() {
        for i in 0..files.length() {
            if let Some(file) = files.get(i) {
                names.push(file.name());
            }
        }
    }
    names
}

#[component]
pub fn CaregiverSignupPage() -> impl IntoView {
    let session = use_session();
    let success = use_success();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let location = RwSignal::new(String::new());
    let experience = RwSignal::new(String::new());
    let rate = RwSignal::new(String::new());
    let id_number = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let specialties = RwSignal::new(Vec::<String>::new());
    let certificates = RwSignal::new(Vec::<String>::new());
    let id_document = RwSignal::new(Option::<String>::None);
    let (is_submitting, set_is_submitting) = signal(false);

    let toggle_specialty = move |specialty: &'static str, checked: bool| {
        specialties.update(|list| {
            if checked {
                if !list.iter().any(|s| s == specialty) {
                    list.push(specialty.to_string());
                }
            } else {
                list.retain(|s| s != specialty);
            }
        });
    };

    let on_cert_upload = move |ev: leptos::web_sys::Event| {
        certificates.update(|list| list.extend(selected_file_names(&ev)));
    };

    let on_id_upload = move |ev: leptos::web_sys::Event| {
        id_document.set(selected_file_names(&ev).into_iter().next());
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();

        let form = CaregiverSignupForm {
            name: name.get_untracked(),
            email: email.get_untracked(),
            phone: phone.get_untracked(),
            location: location.get_untracked(),
            experience: experience.get_untracked(),
            rate: rate.get_untracked(),
            id_number: id_number.get_untracked(),
            password: password.get_untracked(),
            specialties: specialties.get_untracked(),
            certifications: certificates.get_untracked(),
            id_document: id_document.get_untracked(),
        };

        set_is_submitting.set(true);
        let api = api.clone();
        spawn_local(async move {
            match register_caregiver(&api, &form).await {
                Ok(profile) => {
                    session.sign_in(Identity::Caregiver(profile));
                    success.show(
                        "Verification Successful!",
                        vec![
                            "Your account has been verified! You can now start accepting jobs."
                                .to_string(),
                        ],
                        Some(AppRoute::CaregiverDashboard),
                    );
                }
                Err(FlowError::Validation(msg)) => alert(&msg),
                Err(err) => alert(&format!("Registration failed. {}", err.user_message())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-xl mx-auto p-8">
            <h1 class="text-3xl font-bold mb-2">"Become a caregiver"</h1>
            <p class="text-base-content/70 mb-6">
                "Verified caregivers keep 85% of every completed job (15% platform commission)."
            </p>

            <form class="card bg-base-100 shadow-xl card-body gap-3" on:submit=on_submit>
                <input type="text" placeholder="Full name" class="input input-bordered"
                    on:input=move |ev| name.set(event_target_value(&ev)) prop:value=name />
                <input type="email" placeholder="Email" class="input input-bordered"
                    on:input=move |ev| email.set(event_target_value(&ev)) prop:value=email />
                <input type="tel" placeholder="Phone number" class="input input-bordered"
                    on:input=move |ev| phone.set(event_target_value(&ev)) prop:value=phone />
                <input type="text" placeholder="Location" class="input input-bordered"
                    on:input=move |ev| location.set(event_target_value(&ev)) prop:value=location />
                <input type="text" placeholder="Experience (e.g. 5 years)" class="input input-bordered"
                    on:input=move |ev| experience.set(event_target_value(&ev)) prop:value=experience />
                <input type="number" placeholder="Hourly rate (RM)" class="input input-bordered"
                    on:input=move |ev| rate.set(event_target_value(&ev)) prop:value=rate />
                <input type="text" placeholder="IC number" class="input input-bordered"
                    on:input=move |ev| id_number.set(event_target_value(&ev)) prop:value=id_number />
                <input type="password" placeholder="Password" class="input input-bordered"
                    on:input=move |ev| password.set(event_target_value(&ev)) prop:value=password />

                <div>
                    <p class="font-semibold mb-1">"Specialties (pick at least one)"</p>
                    <div class="grid grid-cols-2 gap-1">
                        {CARE_TYPES
                            .iter()
                            .map(|specialty| {
                                let specialty = *specialty;
                                view! {
                                    <label class="label cursor-pointer justify-start gap-2">
                                        <input
                                            type="checkbox"
                                            class="checkbox checkbox-sm"
                                            on:change=move |ev| {
                                                toggle_specialty(specialty, event_target_checked(&ev))
                                            }
                                        />
                                        <span class="label-text">{specialty}</span>
                                    </label>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>

                <div>
                    <p class="font-semibold mb-1">"Certificates (optional)"</p>
                    <input type="file" class="file-input file-input-bordered w-full" multiple
                        on:change=on_cert_upload />
                    <ul class="text-sm mt-1">
                        <For
                            each={move || certificates.get().into_iter().enumerate().collect::<Vec<_>>()}
                            key=|(i, name)| (*i, name.clone())
                            children=move |(index, cert)| {
                                view! {
                                    <li class="flex justify-between items-center bg-base-200 rounded px-2 py-1 mb-1">
                                        <span>"📄 " {cert}</span>
                                        <button
                                            type="button"
                                            class="btn btn-ghost btn-xs text-error"
                                            on:click=move |_| {
                                                certificates.update(|list| {
                                                    list.remove(index);
                                                })
                                            }
                                        >
                                            "✕"
                                        </button>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </div>

                <div>
                    <p class="font-semibold mb-1">"ID document (required)"</p>
                    <input type="file" class="file-input file-input-bordered w-full"
                        on:change=on_id_upload />
                    <Show when=move || id_document.get().is_some()>
                        <div class="flex justify-between items-center bg-success/10 rounded px-2 py-1 mt-1 text-sm">
                            <span class="text-success">
                                "✓ " {move || id_document.get().unwrap_or_default()} " uploaded"
                            </span>
                            <button
                                type="button"
                                class="btn btn-ghost btn-xs text-error"
                                on:click=move |_| id_document.set(None)
                            >
                                "✕"
                            </button>
                        </div>
                    </Show>
                </div>

                <button class="btn btn-primary mt-2" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() { "Submitting..." } else { "Submit for verification" }}
                </button>
            </form>
        </div>
    }
}
