//! 用户注册页
//!
//! 表单状态整合为 `RwSignal` 结构体（Copy，方便在闭包间传递），
//! 提交即走注册流程，成功后直接登入并进入需求详情页。

use crate::api::AppApi;
use crate::components::alert;
use crate::flows::FlowError;
use crate::flows::auth::{UserSignupForm, register_user};
use crate::session::{Identity, use_session};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 注册表单的信号集合
#[derive(Clone, Copy)]
struct SignupFields {
    name: RwSignal<String>,
    gender: RwSignal<String>,
    email: RwSignal<String>,
    phone: RwSignal<String>,
    location: RwSignal<String>,
    password: RwSignal<String>,
}

impl SignupFields {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            gender: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            location: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
        }
    }

    fn to_form(&self) -> UserSignupForm {
        UserSignupForm {
            name: self.name.get_untracked(),
            gender: self.gender.get_untracked(),
            email: self.email.get_untracked(),
            phone: self.phone.get_untracked(),
            location: self.location.get_untracked(),
            password: self.password.get_untracked(),
        }
    }
}

#[component]
pub fn UserSignupPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    let fields = SignupFields::new();
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);

        let api = api.clone();
        spawn_local(async move {
            match register_user(&api, &fields.to_form()).await {
                Ok(user) => {
                    session.sign_in(Identity::User(user));
                    router.navigate(AppRoute::CareDetails);
                }
                Err(FlowError::Validation(msg)) => alert(&msg),
                Err(err) => alert(&format!("Registration failed. {}", err.user_message())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-md mx-auto p-8">
            <h1 class="text-3xl font-bold mb-2">"Create your account"</h1>
            <p class="text-base-content/70 mb-6">"Tell us a bit about yourself"</p>

            <form class="card bg-base-100 shadow-xl card-body gap-3" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Full name"
                    class="input input-bordered"
                    on:input=move |ev| fields.name.set(event_target_value(&ev))
                    prop:value=fields.name
                />
                <select
                    class="select select-bordered"
                    on:change=move |ev| fields.gender.set(event_target_value(&ev))
                    prop:value=fields.gender
                >
                    <option value="" disabled selected>"Gender"</option>
                    <option value="Female">"Female"</option>
                    <option value="Male">"Male"</option>
                    <option value="Other">"Other"</option>
                </select>
                <input
                    type="email"
                    placeholder="Email"
                    class="input input-bordered"
                    on:input=move |ev| fields.email.set(event_target_value(&ev))
                    prop:value=fields.email
                />
                <input
                    type="tel"
                    placeholder="Phone number"
                    class="input input-bordered"
                    on:input=move |ev| fields.phone.set(event_target_value(&ev))
                    prop:value=fields.phone
                />
                <input
                    type="text"
                    placeholder="Home address"
                    class="input input-bordered"
                    on:input=move |ev| fields.location.set(event_target_value(&ev))
                    prop:value=fields.location
                />
                <input
                    type="password"
                    placeholder="Password"
                    class="input input-bordered"
                    on:input=move |ev| fields.password.set(event_target_value(&ev))
                    prop:value=fields.password
                />
                <button class="btn btn-primary mt-4" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() { "Creating account..." } else { "Sign up" }}
                </button>
            </form>
        </div>
    }
}
