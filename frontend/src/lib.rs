//! CareLoop 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route` / `web::router`: 路由定义与导航服务（守卫、刷新映射、滚动）
//! - `session`: 会话身份（用户/护工二选一）与 SessionStorage 持久化
//! - `api`: 类型化 API 客户端（Transport 抽象，测试可注入 Mock）
//! - `flows`: 业务流程 saga（校验 -> 调用 -> 状态更新）
//! - `poller`: 仪表盘的可取消周期刷新
//! - `components`: UI 组件层（页面 + 弹窗）

mod api;
mod components;
mod error;
mod flows;
mod poller;
mod session;
pub(crate) mod web;

use crate::api::CareLoopApi;
use crate::components::booking::BookingPage;
use crate::components::browse::BrowsePage;
use crate::components::caregiver_account::CaregiverAccountPage;
use crate::components::caregiver_login::CaregiverLoginPage;
use crate::components::caregiver_profile::CaregiverProfilePage;
use crate::components::caregiver_signup::CaregiverSignupPage;
use crate::components::care_type::{CareDetailsPage, CareTypeSelectionPage};
use crate::components::chat::{ChatContext, ChatModal};
use crate::components::dashboard::DashboardPage;
use crate::components::home::HomePage;
use crate::components::job_details::{JobDetailsContext, JobDetailsModal};
use crate::components::navbar::NavBar;
use crate::components::rating::{RatingContext, RatingModal};
use crate::components::success::{SuccessContext, SuccessModal};
use crate::components::training_modal::{TrainingModal, TrainingModalContext};
use crate::components::user_login::UserLoginPage;
use crate::components::user_profile::UserProfilePage;
use crate::components::user_signup::UserSignupPage;
use crate::components::{BrowseContext, HistoryRev};
use crate::session::{Identity, SessionContext, use_session};
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet, use_router};

use leptos::prelude::*;

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::UserLogin => view! { <UserLoginPage /> }.into_any(),
        AppRoute::UserSignup => view! { <UserSignupPage /> }.into_any(),
        AppRoute::CareTypeSelection => view! { <CareTypeSelectionPage /> }.into_any(),
        AppRoute::CareDetails => view! { <CareDetailsPage /> }.into_any(),
        AppRoute::BrowseCaregivers => view! { <BrowsePage /> }.into_any(),
        AppRoute::CaregiverProfile => view! { <CaregiverProfilePage /> }.into_any(),
        AppRoute::BookingPayment => view! { <BookingPage /> }.into_any(),
        AppRoute::UserProfile => view! { <UserProfilePage /> }.into_any(),
        AppRoute::CaregiverLogin => view! { <CaregiverLoginPage /> }.into_any(),
        AppRoute::CaregiverSignup => view! { <CaregiverSignupPage /> }.into_any(),
        AppRoute::CaregiverDashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::CaregiverAccount => view! { <CaregiverAccountPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 启动重定向：恢复的会话直接落到对应身份的首页
#[component]
fn StartupRedirect() -> impl IntoView {
    let router = use_router();
    let session = use_session();

    Effect::new(move |ran: Option<()>| {
        if ran.is_some() {
            return;
        }
        if router.current_route().get_untracked() == AppRoute::Home {
            let state = session.state.get_untracked();
            let landing = Identity::landing_route(state.identity.as_ref());
            if landing != AppRoute::Home {
                router.redirect(landing);
            }
        }
    });
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 会话上下文：先于路由恢复，守卫才看得到身份
    let session_ctx = SessionContext::new();
    provide_context(session_ctx);
    session_ctx.restore();

    // 2. 共享服务与弹窗状态
    provide_context(CareLoopApi::production());
    provide_context(BrowseContext::new());
    provide_context(SuccessContext(RwSignal::new(None)));
    provide_context(ChatContext::new());
    provide_context(RatingContext::new());
    provide_context(JobDetailsContext::new());
    provide_context(TrainingModalContext::new());
    provide_context(HistoryRev(RwSignal::new(0u32)));

    // 3. 身份信号注入路由守卫（解耦）
    let is_user = session_ctx.is_user_signal();
    let is_caregiver = session_ctx.is_caregiver_signal();

    view! {
        <Router is_user=is_user is_caregiver=is_caregiver>
            <StartupRedirect />
            <NavBar />
            <RouterOutlet matcher=route_matcher />
            <SuccessModal />
            <ChatModal />
            <RatingModal />
            <JobDetailsModal />
            <TrainingModal />
        </Router>
    }
}
