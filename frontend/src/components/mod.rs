//! UI 组件层
//!
//! 每个逻辑页面一个组件，弹窗（评价、聊天、工单详情、培训、成功提示）
//! 各自带一个通过 Context 共享的打开状态。组件只做三件事：
//! 读表单值、调用业务流程、呈现结果。

use careloop_shared::CaregiverProfile;
use leptos::prelude::*;

pub mod booking;
pub mod browse;
pub mod caregiver_account;
pub mod caregiver_login;
pub mod caregiver_profile;
pub mod caregiver_signup;
pub mod care_type;
pub mod chat;
pub mod dashboard;
pub mod home;
pub mod job_details;
pub mod navbar;
pub mod rating;
pub mod success;
pub mod training_modal;
pub mod user_login;
pub mod user_profile;
pub mod user_signup;

/// 阻塞式提示（校验失败与流程失败的兜底呈现）
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// 浏览状态：当前选择的护理类型与选中的护工档案。
/// 选中档案是瞬态引用，每次重新选择即被替换，从不持久化。
#[derive(Clone, Copy)]
pub struct BrowseContext {
    pub care_type: RwSignal<Option<String>>,
    pub selected: RwSignal<Option<CaregiverProfile>>,
}

impl BrowseContext {
    pub fn new() -> Self {
        Self {
            care_type: RwSignal::new(None),
            selected: RwSignal::new(None),
        }
    }
}

impl Default for BrowseContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_browse() -> BrowseContext {
    use_context::<BrowseContext>().expect("BrowseContext should be provided")
}

/// 预约历史的版本号：评价/确认完工等操作后 bump 一下，
/// 个人中心页据此重新拉取列表。
#[derive(Clone, Copy)]
pub struct HistoryRev(pub RwSignal<u32>);

impl HistoryRev {
    pub fn bump(&self) {
        self.0.update(|v| *v += 1);
    }
}

pub fn use_history_rev() -> HistoryRev {
    use_context::<HistoryRev>().expect("HistoryRev should be provided")
}

/// UI 里可选的护理类型（也是护工注册时的专长选项）
pub const CARE_TYPES: [&str; 4] = [
    "Elderly Care",
    "Child Care",
    "Special Needs Care",
    "Post-Surgery Care",
];
