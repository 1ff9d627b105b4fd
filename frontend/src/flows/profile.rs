//! 档案流程
//!
//! 用户档案的查看/编辑，护工账户视图的刷新，以及护工评价的
//! 客户端聚合（均分与星级分布）。

use crate::api::{CareLoopApi, Transport};
use crate::flows::{FlowError, FlowResult};
use careloop_shared::protocol::{GetCaregiver, GetUser, ListCaregiverReviews, UpdateUser};
use careloop_shared::{CaregiverProfile, Review, UserProfile, avatar_glyph};

// =========================================================
// 用户档案
// =========================================================

/// 用户档案编辑表单
#[derive(Debug, Clone, Default)]
pub struct UserEditForm {
    pub name: String,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

impl UserEditForm {
    pub fn from_profile(user: &UserProfile) -> Self {
        Self {
            name: user.name.clone(),
            gender: user.gender.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            location: user.location.clone(),
        }
    }

    pub fn validate(&self) -> FlowResult<()> {
        let all_filled = !self.name.trim().is_empty()
            && !self.gender.is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
            && !self.location.trim().is_empty();
        if !all_filled {
            return Err(FlowError::Validation("Please fill in all fields".to_string()));
        }
        Ok(())
    }
}

/// 保存用户档案；返回更新后的本地档案（头像按新名字重新派生）
pub async fn update_user<C: Transport>(
    api: &CareLoopApi<C>,
    user: &UserProfile,
    form: &UserEditForm,
) -> FlowResult<UserProfile> {
    form.validate()?;

    api.call(&UpdateUser {
        user_id: user.user_id,
        name: form.name.trim().to_string(),
        gender: form.gender.clone(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        location: form.location.trim().to_string(),
    })
    .await?;

    Ok(UserProfile {
        user_id: user.user_id,
        name: form.name.trim().to_string(),
        gender: form.gender.clone(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        location: form.location.trim().to_string(),
        avatar: avatar_glyph(form.name.trim()),
    })
}

/// 从服务端重新拉取用户档案
pub async fn refresh_user<C: Transport>(
    api: &CareLoopApi<C>,
    user_id: u64,
) -> FlowResult<UserProfile> {
    Ok(api.call(&GetUser { user_id }).await?)
}

/// 从服务端重新拉取护工档案
pub async fn refresh_caregiver<C: Transport>(
    api: &CareLoopApi<C>,
    caregiver_id: u64,
) -> FlowResult<CaregiverProfile> {
    Ok(api.call(&GetCaregiver { caregiver_id }).await?)
}

// =========================================================
// 评价聚合
// =========================================================

/// 护工收到的评价的聚合视图
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewStats {
    pub total: usize,
    pub average: f64,
    /// histogram[i] 为 (i+1) 星的条数
    pub histogram: [usize; 5],
}

/// 客户端聚合：均分与星级分布
pub fn aggregate(reviews: &[Review]) -> ReviewStats {
    let mut histogram = [0usize; 5];
    let mut sum = 0u32;
    for review in reviews {
        let rating = review.rating.clamp(1, 5);
        histogram[rating as usize - 1] += 1;
        sum += rating as u32;
    }

    let average = if reviews.is_empty() {
        0.0
    } else {
        // 展示用保留一位小数
        (sum as f64 / reviews.len() as f64 * 10.0).round() / 10.0
    };

    ReviewStats {
        total: reviews.len(),
        average,
        histogram,
    }
}

/// 拉取护工的评价列表
pub async fn caregiver_reviews<C: Transport>(
    api: &CareLoopApi<C>,
    caregiver_id: u64,
) -> FlowResult<Vec<Review>> {
    Ok(api.call(&ListCaregiverReviews { caregiver_id }).await?)
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

    fn sample_user() -> UserProfile {
        serde_json::from_str(
            r#"{"UserID": 1, "Name": "Mei", "Gender": "Female", "Email": "m@x.y",
                "Phone": "012", "Location": "KL", "Avatar": "M"}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_update_user_rederives_avatar() {
        let client = MockTransport::new();
        client.mock_json("/api/users/1", 200, json!({"message": "ok"}));

        let mut form = UserEditForm::from_profile(&sample_user());
        form.name = "aisha".to_string();

        let updated = update_user(&api(&client), &sample_user(), &form)
            .await
            .unwrap();

        assert_eq!(updated.name, "aisha");
        assert_eq!(updated.avatar, "A");
        // id 不从表单来
        assert_eq!(updated.user_id, 1);
    }

    #[tokio::test]
    async fn test_update_user_validates_before_network() {
        let client = MockTransport::new();
        let mut form = UserEditForm::from_profile(&sample_user());
        form.phone = " ".to_string();

        let result = update_user(&api(&client), &sample_user(), &form).await;

        assert!(matches!(result, Err(FlowError::Validation(_))));
        assert_eq!(client.request_count(), 0);
    }

    #[test]
    fn test_aggregate_average_and_histogram() {
        let reviews: Vec<Review> = serde_json::from_str(
            r#"[{"Rating": 5}, {"Rating": 5}, {"Rating": 4}, {"Rating": 2}]"#,
        )
        .unwrap();

        let stats = aggregate(&reviews);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.average, 4.0);
        assert_eq!(stats.histogram, [0, 1, 0, 1, 2]);
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average, 0.0);
    }
}
