//! 会话状态
//!
//! 同一标签页内至多激活一种身份：终端用户或护工。两种身份各占一个
//! 独立的 SessionStorage 键，写入任一方时清除另一方，避免陈旧的
//! 异类会话泄漏进来。存储介质抽象为 `SessionStore` trait，
//! 清理/恢复逻辑因此可以在原生环境直接测试。

use crate::web::route::AppRoute;
use careloop_shared::{CaregiverProfile, UserProfile};
use leptos::prelude::*;

/// 用户会话的存储键
pub const USER_SESSION_KEY: &str = "careloop_user";
/// 护工会话的存储键
pub const CAREGIVER_SESSION_KEY: &str = "careloop_caregiver";

// =========================================================
// 存储抽象 (Storage Abstraction)
// =========================================================

/// 标签页级键值存储
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// 浏览器 SessionStorage 实现
pub struct BrowserSession;

impl SessionStore for BrowserSession {
    fn get(&self, key: &str) -> Option<String> {
        use gloo_storage::Storage;
        gloo_storage::SessionStorage::raw().get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        use gloo_storage::Storage;
        let _ = gloo_storage::SessionStorage::raw().set_item(key, value);
    }

    fn remove(&self, key: &str) {
        use gloo_storage::Storage;
        let _ = gloo_storage::SessionStorage::raw().remove_item(key);
    }
}

// =========================================================
// 会话模型
// =========================================================

/// 当前已认证的身份
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    User(UserProfile),
    Caregiver(CaregiverProfile),
}

impl Identity {
    /// 该身份登录后的落地页
    pub fn landing_route(identity: Option<&Identity>) -> AppRoute {
        match identity {
            Some(Identity::User(_)) => AppRoute::BrowseCaregivers,
            Some(Identity::Caregiver(_)) => AppRoute::CaregiverDashboard,
            None => AppRoute::Home,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub identity: Option<Identity>,
}

impl SessionState {
    pub fn user(&self) -> Option<&UserProfile> {
        match &self.identity {
            Some(Identity::User(user)) => Some(user),
            _ => None,
        }
    }

    pub fn caregiver(&self) -> Option<&CaregiverProfile> {
        match &self.identity {
            Some(Identity::Caregiver(caregiver)) => Some(caregiver),
            _ => None,
        }
    }

    pub fn is_user(&self) -> bool {
        self.user().is_some()
    }

    pub fn is_caregiver(&self) -> bool {
        self.caregiver().is_some()
    }
}

// =========================================================
// 持久化逻辑（与浏览器解耦，可测）
// =========================================================

/// 写入用户会话，并清除可能残留的护工会话
pub fn persist_user<S: SessionStore>(store: &S, user: &UserProfile) {
    if let Ok(json) = serde_json::to_string(user) {
        store.set(USER_SESSION_KEY, &json);
    }
    store.remove(CAREGIVER_SESSION_KEY);
}

/// 写入护工会话，并清除可能残留的用户会话
pub fn persist_caregiver<S: SessionStore>(store: &S, caregiver: &CaregiverProfile) {
    if let Ok(json) = serde_json::to_string(caregiver) {
        store.set(CAREGIVER_SESSION_KEY, &json);
    }
    store.remove(USER_SESSION_KEY);
}

/// 无条件清除两个会话键
pub fn clear_session<S: SessionStore>(store: &S) {
    store.remove(USER_SESSION_KEY);
    store.remove(CAREGIVER_SESSION_KEY);
}

/// 启动时恢复身份：用户键优先，其次护工键，解析失败视同无会话
pub fn restore_identity<S: SessionStore>(store: &S) -> Option<Identity> {
    if let Some(json) = store.get(USER_SESSION_KEY) {
        if let Ok(user) = serde_json::from_str::<UserProfile>(&json) {
            return Some(Identity::User(user));
        }
    }
    if let Some(json) = store.get(CAREGIVER_SESSION_KEY) {
        if let Ok(caregiver) = serde_json::from_str::<CaregiverProfile>(&json) {
            return Some(Identity::Caregiver(caregiver));
        }
    }
    None
}

// =========================================================
// 响应式上下文 (Context)
// =========================================================

/// 会话上下文，通过 Context 在组件间共享
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub state: ReadSignal<SessionState>,
    pub set_state: WriteSignal<SessionState>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(SessionState::default());
        Self { state, set_state }
    }

    /// 用户身份信号（用于路由守卫注入）
    pub fn is_user_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_user())
    }

    /// 护工身份信号（用于路由守卫注入）
    pub fn is_caregiver_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_caregiver())
    }

    /// 登录成功：更新内存状态并落盘
    pub fn sign_in(&self, identity: Identity) {
        match &identity {
            Identity::User(user) => persist_user(&BrowserSession, user),
            Identity::Caregiver(caregiver) => persist_caregiver(&BrowserSession, caregiver),
        }
        self.set_state.update(|state| {
            state.identity = Some(identity);
        });
    }

    /// 档案更新后的写回（不切换身份种类）
    pub fn refresh_identity(&self, identity: Identity) {
        self.sign_in(identity);
    }

    /// 启动时恢复会话
    pub fn restore(&self) {
        if let Some(identity) = restore_identity(&BrowserSession) {
            self.set_state.update(|state| {
                state.identity = Some(identity);
            });
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

/// 登出（需要交互确认）
///
/// 确认后清除两个存储键、取消仪表盘轮询并重置内存身份。
/// 返回是否真的登出了；导航由调用方完成。
pub fn logout_with_confirm(ctx: &SessionContext) -> bool {
    let confirmed = web_sys::window()
        .and_then(|w| w.confirm_with_message("Are you sure you want to logout?").ok())
        .unwrap_or(false);
    if !confirmed {
        return false;
    }

    clear_session(&BrowserSession);
    crate::poller::cancel();
    ctx.set_state.update(|state| {
        state.identity = None;
    });
    true
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockStore {
        data: RefCell<HashMap<String, String>>,
    }

    impl SessionStore for MockStore {
        fn get(&self, key: &str) -> Option<String> {
            self.data.borrow().get(key).cloned()
        }
        fn set(&self, key: &str, value: &str) {
            self.data
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
        }
        fn remove(&self, key: &str) {
            self.data.borrow_mut().remove(key);
        }
    }

    fn sample_user() -> UserProfile {
        UserProfile {
            user_id: 1,
            name: "Mei".to_string(),
            gender: "Female".to_string(),
            email: "mei@example.com".to_string(),
            phone: "012".to_string(),
            location: "KL".to_string(),
            avatar: "M".to_string(),
        }
    }

    fn sample_caregiver() -> CaregiverProfile {
        serde_json::from_str(r#"{"CaregiverID": 2, "Name": "Siti"}"#).unwrap()
    }

    #[test]
    fn test_persist_user_evicts_caregiver_key() {
        let store = MockStore::default();
        persist_caregiver(&store, &sample_caregiver());
        assert!(store.get(CAREGIVER_SESSION_KEY).is_some());

        persist_user(&store, &sample_user());

        assert!(store.get(USER_SESSION_KEY).is_some());
        assert!(store.get(CAREGIVER_SESSION_KEY).is_none());
    }

    #[test]
    fn test_clear_session_removes_both_keys() {
        let store = MockStore::default();
        // 两种身份分别写入后清除，都必须消失
        persist_user(&store, &sample_user());
        clear_session(&store);
        assert!(store.get(USER_SESSION_KEY).is_none());
        assert!(store.get(CAREGIVER_SESSION_KEY).is_none());

        persist_caregiver(&store, &sample_caregiver());
        clear_session(&store);
        assert!(store.get(USER_SESSION_KEY).is_none());
        assert!(store.get(CAREGIVER_SESSION_KEY).is_none());
    }

    #[test]
    fn test_restore_round_trip() {
        let store = MockStore::default();
        let user = sample_user();
        persist_user(&store, &user);

        match restore_identity(&store) {
            Some(Identity::User(restored)) => assert_eq!(restored, user),
            other => panic!("expected user identity, got {:?}", other),
        }
    }

    #[test]
    fn test_restore_corrupt_json_is_none() {
        let store = MockStore::default();
        store.set(USER_SESSION_KEY, "not json");
        assert!(restore_identity(&store).is_none());
    }

    #[test]
    fn test_landing_routes() {
        assert_eq!(Identity::landing_route(None), AppRoute::Home);
        assert_eq!(
            Identity::landing_route(Some(&Identity::User(sample_user()))),
            AppRoute::BrowseCaregivers
        );
        assert_eq!(
            Identity::landing_route(Some(&Identity::Caregiver(sample_caregiver()))),
            AppRoute::CaregiverDashboard
        );
    }
}
