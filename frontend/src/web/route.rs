//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑层，不依赖 DOM 或 web_sys。定义应用的所有逻辑页面、
//! 认证守卫，以及"进入页面时触发哪个刷新动作"的数据化映射表。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (默认路由)
    #[default]
    Home,
    /// 用户登录
    UserLogin,
    /// 用户注册
    UserSignup,
    /// 护理类型选择 (需要用户身份)
    CareTypeSelection,
    /// 护理需求详情 (需要用户身份)
    CareDetails,
    /// 浏览护工列表
    BrowseCaregivers,
    /// 选中护工的公开档案
    CaregiverProfile,
    /// 预约与支付 (需要用户身份)
    BookingPayment,
    /// 用户个人中心 (需要用户身份)
    UserProfile,
    /// 护工登录
    CaregiverLogin,
    /// 护工注册
    CaregiverSignup,
    /// 护工仪表盘 (需要护工身份)
    CaregiverDashboard,
    /// 护工账户视图 (需要护工身份)
    CaregiverAccount,
    /// 页面未找到
    NotFound,
}

/// 进入页面时需要执行的刷新动作
///
/// 页面 -> 动作是一张一对零/一的映射表（见 [`AppRoute::refresh_hook`]），
/// 新增页面的刷新钩子只需加一行映射。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshHook {
    /// 重新拉取护工列表
    CaregiverListing,
    /// 渲染选中护工的档案
    SelectedCaregiver,
    /// 重新拉取当前用户档案与预约历史
    UserProfile,
    /// 重新拉取仪表盘工单并武装轮询
    Dashboard,
    /// 重算预约价格明细
    BookingPrice,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" => Self::Home,
            "/login" => Self::UserLogin,
            "/signup" => Self::UserSignup,
            "/care-type" => Self::CareTypeSelection,
            "/care-details" => Self::CareDetails,
            "/browse" => Self::BrowseCaregivers,
            "/caregiver" => Self::CaregiverProfile,
            "/booking" => Self::BookingPayment,
            "/profile" => Self::UserProfile,
            "/caregiver/login" => Self::CaregiverLogin,
            "/caregiver/signup" => Self::CaregiverSignup,
            "/dashboard" => Self::CaregiverDashboard,
            "/account" => Self::CaregiverAccount,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::UserLogin => "/login",
            Self::UserSignup => "/signup",
            Self::CareTypeSelection => "/care-type",
            Self::CareDetails => "/care-details",
            Self::BrowseCaregivers => "/browse",
            Self::CaregiverProfile => "/caregiver",
            Self::BookingPayment => "/booking",
            Self::UserProfile => "/profile",
            Self::CaregiverLogin => "/caregiver/login",
            Self::CaregiverSignup => "/caregiver/signup",
            Self::CaregiverDashboard => "/dashboard",
            Self::CaregiverAccount => "/account",
            Self::NotFound => "/404",
        }
    }

    /// **守卫逻辑：该路由是否要求用户身份**
    pub fn requires_user(&self) -> bool {
        matches!(
            self,
            Self::CareTypeSelection | Self::CareDetails | Self::BookingPayment | Self::UserProfile
        )
    }

    /// **守卫逻辑：该路由是否要求护工身份**
    pub fn requires_caregiver(&self) -> bool {
        matches!(self, Self::CaregiverDashboard | Self::CaregiverAccount)
    }

    /// 守卫失败时的重定向目标（按身份种类分流）
    pub fn auth_failure_redirect(&self) -> Self {
        if self.requires_caregiver() {
            Self::CaregiverLogin
        } else {
            Self::UserLogin
        }
    }

    /// 页面 -> 刷新动作映射表
    pub fn refresh_hook(&self) -> Option<RefreshHook> {
        match self {
            Self::BrowseCaregivers => Some(RefreshHook::CaregiverListing),
            Self::CaregiverProfile => Some(RefreshHook::SelectedCaregiver),
            Self::UserProfile => Some(RefreshHook::UserProfile),
            Self::CaregiverDashboard => Some(RefreshHook::Dashboard),
            Self::BookingPayment => Some(RefreshHook::BookingPrice),
            _ => None,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROUTES: [AppRoute; 14] = [
        AppRoute::Home,
        AppRoute::UserLogin,
        AppRoute::UserSignup,
        AppRoute::CareTypeSelection,
        AppRoute::CareDetails,
        AppRoute::BrowseCaregivers,
        AppRoute::CaregiverProfile,
        AppRoute::BookingPayment,
        AppRoute::UserProfile,
        AppRoute::CaregiverLogin,
        AppRoute::CaregiverSignup,
        AppRoute::CaregiverDashboard,
        AppRoute::CaregiverAccount,
        AppRoute::NotFound,
    ];

    #[test]
    fn test_path_round_trip() {
        for route in ALL_ROUTES {
            if route == AppRoute::NotFound {
                continue;
            }
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/caregiver/other"), AppRoute::NotFound);
    }

    #[test]
    fn test_guards_split_by_identity_kind() {
        assert!(AppRoute::CaregiverDashboard.requires_caregiver());
        assert!(!AppRoute::CaregiverDashboard.requires_user());
        assert!(AppRoute::BookingPayment.requires_user());
        assert!(!AppRoute::BookingPayment.requires_caregiver());
        // 公共页面两者都不要求
        assert!(!AppRoute::BrowseCaregivers.requires_user());
        assert!(!AppRoute::Home.requires_caregiver());
    }

    #[test]
    fn test_auth_failure_redirect_targets() {
        assert_eq!(
            AppRoute::CaregiverDashboard.auth_failure_redirect(),
            AppRoute::CaregiverLogin
        );
        assert_eq!(
            AppRoute::UserProfile.auth_failure_redirect(),
            AppRoute::UserLogin
        );
    }

    #[test]
    fn test_refresh_hook_table_covers_exactly_five_pages() {
        let refreshing: Vec<_> = ALL_ROUTES
            .iter()
            .filter(|r| r.refresh_hook().is_some())
            .collect();
        assert_eq!(refreshing.len(), 5);

        assert_eq!(
            AppRoute::CaregiverDashboard.refresh_hook(),
            Some(RefreshHook::Dashboard)
        );
        assert_eq!(
            AppRoute::BookingPayment.refresh_hook(),
            Some(RefreshHook::BookingPrice)
        );
        assert_eq!(AppRoute::Home.refresh_hook(), None);
    }
}
