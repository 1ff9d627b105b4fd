//! CareLoop 共享领域模型
//!
//! 前端与后端 API 之间的规范化数据模型。后端的历史遗留问题：
//! 部分接口返回 PascalCase 字段（`UserID`、`HourlyRate`），部分返回
//! camelCase（`id`、`rating`）。所有差异在这里通过 serde 的
//! `rename`/`alias` 一次性吸收，业务代码永远只看到规范化后的结构体。

use serde::{Deserialize, Serialize};

pub mod pricing;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 未选择护理类型时，派生工单使用的默认分类
pub const DEFAULT_CARE_TYPE: &str = "General Care";

/// 注册护工时的默认语言列表
pub const DEFAULT_LANGUAGES: [&str; 2] = ["English", "Malay"];

/// 根据显示名派生头像字形（首字母大写）
pub fn avatar_glyph(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default()
}

// =========================================================
// 身份模型 (Identities)
// =========================================================

/// 终端用户（寻求护理服务的一方）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "UserID", alias = "userId", alias = "id")]
    pub user_id: u64,
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(rename = "Gender", alias = "gender", default)]
    pub gender: String,
    #[serde(rename = "Email", alias = "email")]
    pub email: String,
    #[serde(rename = "Phone", alias = "phone", default)]
    pub phone: String,
    #[serde(rename = "Location", alias = "location", default)]
    pub location: String,
    #[serde(rename = "Avatar", alias = "avatar", default)]
    pub avatar: String,
}

/// 护工的列表摘要（浏览页返回的紧凑形态，恒为 camelCase）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaregiverSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub rate_display: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub distance: String,
}

/// 护工的完整档案（详情接口返回）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaregiverProfile {
    #[serde(rename = "CaregiverID", alias = "caregiverId", alias = "id")]
    pub caregiver_id: u64,
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(rename = "Avatar", alias = "avatar", default)]
    pub avatar: String,
    #[serde(rename = "Email", alias = "email", default)]
    pub email: String,
    #[serde(rename = "Phone", alias = "phone", default)]
    pub phone: String,
    #[serde(rename = "Location", alias = "location", default)]
    pub location: String,
    #[serde(rename = "Experience", alias = "experience", default)]
    pub experience: String,
    #[serde(rename = "HourlyRate", alias = "hourlyRate", alias = "rate", default)]
    pub hourly_rate: f64,
    #[serde(
        rename = "AverageRating",
        alias = "averageRating",
        alias = "rating",
        default
    )]
    pub average_rating: f64,
    #[serde(rename = "TotalReviews", alias = "totalReviews", default)]
    pub total_reviews: u32,
    #[serde(rename = "TotalJobs", alias = "totalJobs", default)]
    pub total_jobs: u32,
    #[serde(rename = "TotalEarnings", alias = "totalEarnings", default)]
    pub total_earnings: f64,
    #[serde(rename = "AvailabilityStatus", alias = "availability", default)]
    pub availability_status: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

// =========================================================
// 预约模型 (Bookings)
// =========================================================

/// 预约状态机：in_progress -> pending_completion -> completed（不可逆）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    InProgress,
    PendingCompletion,
    Completed,
}

/// 用户侧预约历史记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub booking_id: u64,
    #[serde(default)]
    pub caregiver_id: u64,
    #[serde(default)]
    pub caregiver_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub status: BookingStatus,
    /// 评价是追加写入且每个预约至多一条，rated 置位后不可再评
    #[serde(default)]
    pub rated: bool,
    #[serde(default)]
    pub user_rating: Option<u8>,
    #[serde(default)]
    pub user_review: Option<String>,
}

// =========================================================
// 工单模型 (Jobs)
// =========================================================

/// 护工侧看到的工作请求（由预约派生，PascalCase 接口）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    #[serde(rename = "JobRequestID", alias = "jobRequestId", alias = "id")]
    pub job_request_id: u64,
    #[serde(rename = "UserID", alias = "userId", default)]
    pub user_id: u64,
    #[serde(rename = "UserName", alias = "userName", default)]
    pub user_name: String,
    #[serde(rename = "UserAvatar", alias = "userAvatar", default)]
    pub user_avatar: String,
    #[serde(rename = "CareType", alias = "careType", default)]
    pub care_type: String,
    #[serde(rename = "HourlyRate", alias = "hourlyRate", default)]
    pub hourly_rate: f64,
    #[serde(rename = "Hours", alias = "hours", default)]
    pub hours: u32,
    #[serde(rename = "StartDate", alias = "startDate", default)]
    pub start_date: String,
    #[serde(rename = "Phone", alias = "phone", default)]
    pub phone: String,
    #[serde(rename = "Address", alias = "address", default)]
    pub address: String,
    #[serde(rename = "Distance", alias = "distance", default)]
    pub distance: Option<String>,
    #[serde(rename = "SpecialRequests", alias = "specialRequests", default)]
    pub special_requests: String,
}

/// 已被接受的工单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedJob {
    #[serde(rename = "AcceptedJobID", alias = "acceptedJobId", alias = "id")]
    pub accepted_job_id: u64,
    #[serde(rename = "UserID", alias = "userId", default)]
    pub user_id: u64,
    #[serde(rename = "UserName", alias = "userName", default)]
    pub user_name: String,
    #[serde(rename = "CareType", alias = "careType", default)]
    pub care_type: String,
    #[serde(rename = "StartDate", alias = "startDate", default)]
    pub start_date: String,
    #[serde(rename = "Distance", alias = "distance", default)]
    pub distance: Option<String>,
}

/// 完工结算：服务端返回的净收入与抽佣金额
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSettlement {
    pub earnings: f64,
    pub commission: f64,
}

// =========================================================
// 评价模型 (Reviews)
// =========================================================

/// 提交后不可变；rating 取值 1..=5
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "Rating", alias = "rating")]
    pub rating: u8,
    #[serde(rename = "UserName", alias = "userName", default)]
    pub user_name: String,
    #[serde(rename = "UserAvatar", alias = "userAvatar", default)]
    pub user_avatar: String,
    #[serde(rename = "ReviewText", alias = "reviewText", default)]
    pub review_text: Option<String>,
    #[serde(rename = "CreatedAt", alias = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "BookingDate", alias = "bookingDate", default)]
    pub booking_date: String,
    #[serde(rename = "Hours", alias = "hours", default)]
    pub hours: u32,
    #[serde(rename = "TotalAmount", alias = "totalAmount", default)]
    pub total_amount: f64,
}

// =========================================================
// 消息模型 (Messaging)
// =========================================================

/// 消息发送方的角色标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    User,
    Caregiver,
}

impl SenderRole {
    /// 会话中的对端角色
    pub fn peer(self) -> Self {
        match self {
            SenderRole::User => SenderRole::Caregiver,
            SenderRole::Caregiver => SenderRole::User,
        }
    }
}

/// 会话句柄：线程由 (用户, 护工) 二元组唯一确定，首次联系时惰性创建
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadHandle {
    pub thread_id: u64,
}

/// 线程内的单条消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "SenderType", alias = "senderType")]
    pub sender_type: SenderRole,
    #[serde(rename = "MessageText", alias = "messageText")]
    pub message_text: String,
    #[serde(rename = "SentAt", alias = "sentAt")]
    pub sent_at: chrono::DateTime<chrono::Utc>,
}

// =========================================================
// 培训模型 (Training)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingProgram {
    #[serde(rename = "TrainingProgramID", alias = "trainingProgramId", alias = "id")]
    pub training_program_id: u64,
    #[serde(rename = "Title", alias = "title")]
    pub title: String,
    #[serde(rename = "Duration", alias = "duration", default)]
    pub duration: String,
    #[serde(rename = "Certificate", alias = "certificate", default)]
    pub certificate: String,
    #[serde(rename = "Description", alias = "description", default)]
    pub description: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// 护工与培训项目的关联记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingEnrollment {
    #[serde(rename = "TrainingProgramID", alias = "trainingProgramId")]
    pub training_program_id: u64,
    #[serde(rename = "Title", alias = "title", default)]
    pub title: String,
    #[serde(rename = "Status", alias = "status", default)]
    pub status: String,
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_glyph_uppercases_first_letter() {
        assert_eq!(avatar_glyph("sarah"), "S");
        assert_eq!(avatar_glyph("Ahmad"), "A");
        assert_eq!(avatar_glyph(""), "");
    }

    #[test]
    fn test_user_profile_pascal_case() {
        let json = r#"{
            "UserID": 7,
            "Name": "Mei Lin",
            "Gender": "Female",
            "Email": "mei@example.com",
            "Phone": "012-3456789",
            "Location": "Kuala Lumpur",
            "Avatar": "M"
        }"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_id, 7);
        assert_eq!(user.name, "Mei Lin");
        assert_eq!(user.avatar, "M");
    }

    #[test]
    fn test_caregiver_profile_accepts_both_casings() {
        // 同一个档案接口，不同部署返回不同大小写
        let pascal = r#"{"CaregiverID": 3, "Name": "Siti", "HourlyRate": 25.0, "TotalJobs": 4}"#;
        let camel = r#"{"id": 3, "name": "Siti", "rate": 25.0, "totalJobs": 4}"#;

        let a: CaregiverProfile = serde_json::from_str(pascal).unwrap();
        let b: CaregiverProfile = serde_json::from_str(camel).unwrap();

        assert_eq!(a.caregiver_id, b.caregiver_id);
        assert_eq!(a.hourly_rate, b.hourly_rate);
        assert_eq!(a.total_jobs, b.total_jobs);
        // 缺省字段回退默认值，不报错
        assert_eq!(a.total_earnings, 0.0);
    }

    #[test]
    fn test_booking_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::PendingCompletion).unwrap(),
            "\"pending_completion\""
        );
        let status: BookingStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, BookingStatus::Completed);
    }

    #[test]
    fn test_sender_role_peer() {
        assert_eq!(SenderRole::User.peer(), SenderRole::Caregiver);
        assert_eq!(SenderRole::Caregiver.peer(), SenderRole::User);
    }
}
