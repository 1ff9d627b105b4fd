//! 认证流程
//!
//! 用户/护工的登录与注册。护工注册是两步 saga：注册拿到 id 后
//! 再拉取一次完整档案（注册接口只返回 id，档案以服务端为准）。

use crate::api::{CareLoopApi, Transport};
use crate::flows::{FlowError, FlowResult};
use careloop_shared::protocol::{
    CaregiverLogin, GetCaregiver, RegisterCaregiver, RegisterUser, UserLogin,
};
use careloop_shared::{CaregiverProfile, DEFAULT_LANGUAGES, UserProfile};

/// 登录失败时面向用户的固定文案（不区分具体原因，避免泄露账号存在性）
pub const LOGIN_FAILURE_MESSAGE: &str =
    "Invalid email or password. Please try again or sign up for a new account.";

// =========================================================
// 登录
// =========================================================

pub async fn login_user<C: Transport>(
    api: &CareLoopApi<C>,
    email: &str,
    password: &str,
) -> FlowResult<UserProfile> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(FlowError::Validation(
            "Please enter both email and password".to_string(),
        ));
    }

    let envelope = api
        .call(&UserLogin {
            email: email.trim().to_string(),
            password: password.to_string(),
        })
        .await?;
    Ok(envelope.user)
}

pub async fn login_caregiver<C: Transport>(
    api: &CareLoopApi<C>,
    email: &str,
    password: &str,
) -> FlowResult<CaregiverProfile> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(FlowError::Validation(
            "Please enter both email and password".to_string(),
        ));
    }

    let envelope = api
        .call(&CaregiverLogin {
            email: email.trim().to_string(),
            password: password.to_string(),
        })
        .await?;
    Ok(envelope.caregiver)
}

// =========================================================
// 用户注册
// =========================================================

/// 用户注册表单
#[derive(Debug, Clone, Default)]
pub struct UserSignupForm {
    pub name: String,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub password: String,
}

impl UserSignupForm {
    pub fn validate(&self) -> FlowResult<()> {
        let all_filled = !self.name.trim().is_empty()
            && !self.gender.is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
            && !self.location.trim().is_empty()
            && !self.password.is_empty();
        if !all_filled {
            return Err(FlowError::Validation("Please fill in all fields".to_string()));
        }
        Ok(())
    }

    fn to_request(&self) -> RegisterUser {
        RegisterUser {
            name: self.name.trim().to_string(),
            gender: self.gender.clone(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            location: self.location.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

pub async fn register_user<C: Transport>(
    api: &CareLoopApi<C>,
    form: &UserSignupForm,
) -> FlowResult<UserProfile> {
    form.validate()?;
    let envelope = api.call(&form.to_request()).await?;
    Ok(envelope.user)
}

// =========================================================
// 护工注册
// =========================================================

/// 护工注册表单
///
/// 证书与身份证件只在客户端记录文件名（内容不上传，作为占位跟踪）。
#[derive(Debug, Clone, Default)]
pub struct CaregiverSignupForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub experience: String,
    pub rate: String,
    pub id_number: String,
    pub password: String,
    pub specialties: Vec<String>,
    pub certifications: Vec<String>,
    pub id_document: Option<String>,
}

impl CaregiverSignupForm {
    /// 校验顺序与交互提示保持一致：必填字段 -> 身份证件 -> 专长
    pub fn validate(&self) -> FlowResult<f64> {
        let all_filled = !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
            && !self.location.trim().is_empty()
            && !self.experience.trim().is_empty()
            && !self.rate.trim().is_empty()
            && !self.id_number.trim().is_empty()
            && !self.password.is_empty();
        if !all_filled {
            return Err(FlowError::Validation(
                "Please fill in all required fields".to_string(),
            ));
        }

        if self.id_document.is_none() {
            return Err(FlowError::Validation(
                "Please upload your ID document".to_string(),
            ));
        }

        if self.specialties.is_empty() {
            return Err(FlowError::Validation(
                "Please select at least one specialty".to_string(),
            ));
        }

        self.rate.trim().parse::<f64>().map_err(|_| {
            FlowError::Validation("Please enter a valid hourly rate".to_string())
        })
    }

    fn to_request(&self, rate: f64) -> RegisterCaregiver {
        RegisterCaregiver {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: self.phone.trim().to_string(),
            location: self.location.trim().to_string(),
            experience: self.experience.trim().to_string(),
            rate,
            specialties: self.specialties.clone(),
            certifications: self.certifications.clone(),
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            id_number: self.id_number.trim().to_string(),
        }
    }
}

/// 注册护工并返回服务端的规范档案
pub async fn register_caregiver<C: Transport>(
    api: &CareLoopApi<C>,
    form: &CaregiverSignupForm,
) -> FlowResult<CaregiverProfile> {
    let rate = form.validate()?;

    let registered = api.call(&form.to_request(rate)).await?;
    let profile = api
        .call(&GetCaregiver {
            caregiver_id: registered.caregiver_id,
        })
        .await?;
    Ok(profile)
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use serde_json::json;

    fn api(client: &MockTransport) -> CareLoopApi<MockTransport> {
        CareLoopApi::new("https://backend.test", client.clone())
    }

    fn filled_caregiver_form() -> CaregiverSignupForm {
        CaregiverSignupForm {
            name: "Siti".to_string(),
            email: "siti@example.com".to_string(),
            phone: "013".to_string(),
            location: "Penang".to_string(),
            experience: "5 years".to_string(),
            rate: "25".to_string(),
            id_number: "900101-07-1234".to_string(),
            password: "secret".to_string(),
            specialties: vec!["Elderly Care".to_string()],
            certifications: vec!["CPR.pdf".to_string()],
            id_document: Some("ic-front.jpg".to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_user_unwraps_envelope() {
        let client = MockTransport::new();
        client.mock_json(
            "/api/users/login",
            200,
            json!({"user": {"UserID": 1, "Name": "Mei", "Email": "mei@example.com"}}),
        );

        let user = login_user(&api(&client), "mei@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(user.user_id, 1);
        assert_eq!(user.name, "Mei");
    }

    #[tokio::test]
    async fn test_login_rejects_blank_credentials_without_network() {
        let client = MockTransport::new();
        let result = login_user(&api(&client), "  ", "").await;

        assert!(matches!(result, Err(FlowError::Validation(_))));
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_login_failure_propagates_api_error() {
        let client = MockTransport::new();
        client.mock_json("/api/caregivers/login", 401, json!({"error": "bad password"}));

        let result = login_caregiver(&api(&client), "siti@example.com", "nope").await;
        assert!(matches!(result, Err(FlowError::Api(_))));
    }

    #[tokio::test]
    async fn test_caregiver_signup_requires_specialty() {
        let client = MockTransport::new();
        let mut form = filled_caregiver_form();
        form.specialties.clear();

        let result = register_caregiver(&api(&client), &form).await;

        match result {
            Err(FlowError::Validation(msg)) => {
                assert!(msg.contains("at least one specialty"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        // 校验失败必须发生在任何网络调用之前
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_caregiver_signup_requires_id_document() {
        let client = MockTransport::new();
        let mut form = filled_caregiver_form();
        form.id_document = None;

        let result = register_caregiver(&api(&client), &form).await;

        match result {
            Err(FlowError::Validation(msg)) => assert!(msg.contains("ID document")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_register_caregiver_refetches_canonical_profile() {
        let client = MockTransport::new();
        client.mock_json("/api/caregivers/register", 201, json!({"caregiverId": 42}));
        client.mock_json(
            "/api/caregivers/42",
            200,
            json!({"CaregiverID": 42, "Name": "Siti", "HourlyRate": 25.0}),
        );

        let profile = register_caregiver(&api(&client), &filled_caregiver_form())
            .await
            .unwrap();

        assert_eq!(profile.caregiver_id, 42);
        assert_eq!(client.request_count(), 2);
        assert!(client.has_request_to("/api/caregivers/42"));
    }
}
