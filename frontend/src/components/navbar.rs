//! 顶部导航栏
//!
//! 按当前身份显示入口：用户 -> 个人中心，护工 -> 仪表盘/账户，
//! 任一身份 -> 登出。

use crate::session::{logout_with_confirm, use_session};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

#[component]
pub fn NavBar() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let state = session.state;

    let on_logout = move |_| {
        if logout_with_confirm(&session) {
            router.navigate(AppRoute::Home);
        }
    };

    view! {
        <div class="navbar bg-base-100 shadow">
            <div class="flex-1">
                <a class="btn btn-ghost text-xl text-primary" on:click=move |_| router.navigate(AppRoute::Home)>
                    "CareLoop"
                </a>
            </div>
            <div class="flex-none gap-2">
                <Show when=move || state.get().is_user()>
                    <button class="btn btn-ghost" on:click=move |_| router.navigate(AppRoute::BrowseCaregivers)>
                        "Browse"
                    </button>
                    <button class="btn btn-ghost" on:click=move |_| router.navigate(AppRoute::UserProfile)>
                        "My Profile"
                    </button>
                </Show>
                <Show when=move || state.get().is_caregiver()>
                    <button class="btn btn-ghost" on:click=move |_| router.navigate(AppRoute::CaregiverDashboard)>
                        "Dashboard"
                    </button>
                    <button class="btn btn-ghost" on:click=move |_| router.navigate(AppRoute::CaregiverAccount)>
                        "My Account"
                    </button>
                </Show>
                <Show when=move || state.get().identity.is_some()>
                    <button class="btn btn-outline btn-error" on:click=on_logout>"Logout"</button>
                </Show>
            </div>
        </div>
    }
}
