//! 护工登录页

use crate::api::AppApi;
use crate::components::success::use_success;
use crate::flows::auth::{LOGIN_FAILURE_MESSAGE, login_caregiver};
use crate::session::{Identity, use_session};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn CaregiverLoginPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let success = use_success();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().trim().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please enter both email and password".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match login_caregiver(&api, &email.get_untracked(), &password.get_untracked()).await {
                Ok(caregiver) => {
                    let name = caregiver.name.clone();
                    session.sign_in(Identity::Caregiver(caregiver));
                    success.show(
                        "Welcome Back!",
                        vec![format!("Hi {}! You have successfully logged in.", name)],
                        Some(AppRoute::CaregiverDashboard),
                    );
                }
                Err(_) => {
                    set_error_msg.set(Some(LOGIN_FAILURE_MESSAGE.to_string()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Caregiver portal"</h1>
                <p class="text-base-content/70">"Log in to manage your jobs"</p>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="caregiver-email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="caregiver-email"
                                type="email"
                                class="input input-bordered"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="caregiver-password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="caregiver-password"
                                type="password"
                                class="input input-bordered"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() { "Logging in..." } else { "Log in" }}
                            </button>
                        </div>
                        <button
                            type="button"
                            class="btn btn-link btn-sm"
                            on:click=move |_| router.navigate(AppRoute::CaregiverSignup)
                        >
                            "Want to work with us? Sign up"
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}
