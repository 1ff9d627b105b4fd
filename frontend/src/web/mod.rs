//! 导航层
//!
//! - `route`: 路由定义与刷新映射表（领域模型，无 DOM 依赖）
//! - `router`: 路由服务（History API 封装与守卫引擎）

pub mod route;
pub mod router;
