//! 路由服务模块 - 核心引擎
//!
//! 封装 web_sys 的 History API，实现高内聚：所有对 window.history
//! 的操作都集中在此模块。导航流程："请求 -> 验证(Guard) -> 处理 ->
//! 加载"。单活动页模型：导航即切换当前路由信号，每次导航都把视口
//! 滚回原点；离开护工仪表盘时同步撤销轮询调度。

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, RefreshHook};
use crate::poller;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 导航总是把视口滚回原点
fn scroll_to_origin() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 认证检查信号由外部注入，与会话系统解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 用户身份检查（注入）
    is_user: Signal<bool>,
    /// 护工身份检查（注入）
    is_caregiver: Signal<bool>,
}

impl RouterService {
    fn new(is_user: Signal<bool>, is_caregiver: Signal<bool>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            is_user,
            is_caregiver,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 守卫校验：返回放行的路由（可能被重定向）
    fn guard(&self, target: AppRoute) -> AppRoute {
        if target.requires_user() && !self.is_user.get_untracked() {
            web_sys::console::log_1(&"[Router] Access denied, redirecting to user login.".into());
            return target.auth_failure_redirect();
        }
        if target.requires_caregiver() && !self.is_caregiver.get_untracked() {
            web_sys::console::log_1(
                &"[Router] Access denied, redirecting to caregiver login.".into(),
            );
            return target.auth_failure_redirect();
        }
        target
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, target: AppRoute) {
        self.apply(self.guard(target), true);
    }

    /// 重定向式导航（不产生新的历史条目）
    pub fn redirect(&self, target: AppRoute) {
        self.apply(self.guard(target), false);
    }

    fn apply(&self, route: AppRoute, use_push: bool) {
        // 按刷新映射表同步轮询：目标页的刷新动作不是 Dashboard
        // （含登出路径）即同步撤销调度，任何时刻至多一个活动定时器；
        // 仪表盘自身的武装由页面挂载时完成
        if route.refresh_hook() != Some(RefreshHook::Dashboard) {
            poller::cancel();
        }

        if use_push {
            push_history_state(route.to_path());
        } else {
            replace_history_state(route.to_path());
        }
        self.set_route.set(route);
        scroll_to_origin();
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let service = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            let guarded = service.guard(target);
            if guarded != target {
                replace_history_state(guarded.to_path());
            }
            if guarded.refresh_hook() != Some(RefreshHook::Dashboard) {
                poller::cancel();
            }
            service.set_route.set(guarded);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化时的自动重定向：登出即被踢出受保护页面
    fn setup_auth_redirect(&self) {
        let service = *self;

        Effect::new(move |_| {
            let is_user = service.is_user.get();
            let is_caregiver = service.is_caregiver.get();
            let route = service.current_route.get_untracked();

            let kicked = (route.requires_user() && !is_user)
                || (route.requires_caregiver() && !is_caregiver);
            if kicked {
                web_sys::console::log_1(
                    &"[Router] Auth state changed, leaving protected page.".into(),
                );
                service.apply(AppRoute::Home, true);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_user: Signal<bool>, is_caregiver: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_user, is_caregiver);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 用户身份信号
    is_user: Signal<bool>,
    /// 护工身份信号
    is_caregiver: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_user, is_caregiver);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
