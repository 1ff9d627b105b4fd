//! 预约流程
//!
//! 确认预约是两步 saga：先创建 Booking，再由它派生一个 JobRequest
//! 让护工侧可见。两者是服务端相互独立的资源：第二步失败时第一步的
//! 预约依然存在，不做补偿回滚（两者对后端都是通知性质，非资金结算）。

use crate::api::{CareLoopApi, Transport};
use crate::flows::{FlowError, FlowResult};
use careloop_shared::pricing::{self, PriceBreakdown};
use careloop_shared::protocol::{
    ConfirmBookingCompletion, CreateBooking, CreateJobRequest, ListUserBookings,
};
use careloop_shared::{BookingRecord, CaregiverProfile, DEFAULT_CARE_TYPE, UserProfile};

/// 预约表单
#[derive(Debug, Clone)]
pub struct BookingForm {
    pub hours: u32,
    pub date: String,
    pub time: String,
    pub use_custom_location: bool,
    pub custom_location: String,
    pub special_needs: String,
    pub insurance: bool,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            hours: 1,
            date: String::new(),
            time: String::new(),
            use_custom_location: false,
            custom_location: String::new(),
            special_needs: String::new(),
            insurance: false,
        }
    }
}

impl BookingForm {
    pub fn validate(&self) -> FlowResult<()> {
        if self.hours < 1 {
            return Err(FlowError::Validation(
                "Booking must be at least one hour".to_string(),
            ));
        }
        if self.use_custom_location && self.custom_location.trim().is_empty() {
            return Err(FlowError::Validation(
                "Please enter the service address".to_string(),
            ));
        }
        if self.date.is_empty() || self.time.is_empty() {
            return Err(FlowError::Validation(
                "Please select both date and time for your booking".to_string(),
            ));
        }
        Ok(())
    }

    /// 服务地址：自定义地址或用户的默认位置
    pub fn resolved_location(&self, default_location: &str) -> String {
        if self.use_custom_location {
            self.custom_location.trim().to_string()
        } else {
            default_location.to_string()
        }
    }
}

/// 确认成功后用于成功弹窗的摘要
#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfirmation {
    pub caregiver_name: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub special_needs: Option<String>,
    pub breakdown: PriceBreakdown,
}

/// 确认预约：创建 Booking + 派生 JobRequest
pub async fn confirm_booking<C: Transport>(
    api: &CareLoopApi<C>,
    user: &UserProfile,
    caregiver: &CaregiverProfile,
    care_type: Option<&str>,
    form: &BookingForm,
) -> FlowResult<BookingConfirmation> {
    form.validate()?;

    let location = form.resolved_location(&user.location);
    let breakdown = pricing::quote(caregiver.hourly_rate, form.hours, form.insurance);

    api.call(&CreateBooking {
        user_id: user.user_id,
        caregiver_id: caregiver.caregiver_id,
        booking_date: form.date.clone(),
        booking_time: form.time.clone(),
        hours: form.hours,
        hourly_rate: caregiver.hourly_rate,
        subtotal: breakdown.subtotal,
        insurance_fee: breakdown.insurance_fee,
        service_fee: breakdown.service_fee,
        total_amount: breakdown.total,
        has_insurance: form.insurance,
    })
    .await?;

    let special_requests = if form.special_needs.trim().is_empty() {
        "No special requests".to_string()
    } else {
        form.special_needs.trim().to_string()
    };

    api.call(&CreateJobRequest {
        user_id: user.user_id,
        user_name: user.name.clone(),
        user_avatar: user.avatar.clone(),
        care_type: care_type.unwrap_or(DEFAULT_CARE_TYPE).to_string(),
        hourly_rate: caregiver.hourly_rate,
        hours: form.hours,
        start_date: format!("{} at {}", form.date, form.time),
        phone: user.phone.clone(),
        address: location.clone(),
        distance: "Near you".to_string(),
        special_requests,
    })
    .await?;

    Ok(BookingConfirmation {
        caregiver_name: caregiver.name.clone(),
        date: form.date.clone(),
        time: form.time.clone(),
        location,
        special_needs: if form.special_needs.trim().is_empty() {
            None
        } else {
            Some(form.special_needs.trim().to_string())
        },
        breakdown,
    })
}

/// 拉取用户的预约历史
pub async fn load_history<C: Transport>(
    api: &CareLoopApi<C>,
    user_id: u64,
) -> FlowResult<Vec<BookingRecord>> {
    Ok(api.call(&ListUserBookings { user_id }).await?)
}

/// 用户确认完工（pending_completion -> completed）
pub async fn confirm_completion<C: Transport>(
    api: &CareLoopApi<C>,
    booking_id: u64,
) -> FlowResult<()> {
    api.call(&ConfirmBookingCompletion { booking_id }).await?;
    Ok(())
}

/// 演示用：把 in_progress 的预约直接快进到 pending_completion
#[cfg(feature = "demo")]
pub async fn fast_forward<C: Transport>(api: &CareLoopApi<C>, booking_id: u64) -> FlowResult<()> {
    use careloop_shared::BookingStatus;
    use careloop_shared::protocol::SetBookingStatus;

    api.call(&SetBookingStatus {
        booking_id,
        status: BookingStatus::PendingCompletion,
    })
    .await?;
    Ok(())
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
            r#"{"UserID": 1, "Name": "Mei", "Email": "mei@example.com",
                "Phone": "012", "Location": "Bukit Bintang", "Avatar": "M"}"#,
        )
        .unwrap()
    }

    fn sample_caregiver() -> CaregiverProfile {
        serde_json::from_str(r#"{"CaregiverID": 2, "Name": "Siti", "HourlyRate": 20.0}"#).unwrap()
    }

    fn filled_form() -> BookingForm {
        BookingForm {
            hours: 3,
            date: "2026-08-20".to_string(),
            time: "09:00".to_string(),
            insurance: true,
            ..BookingForm::default()
        }
    }

    fn mock_create_endpoints(client: &MockTransport) {
        client.mock_json("/api/bookings", 201, json!({"message": "created"}));
        client.mock_json("/api/jobs", 201, json!({"message": "created"}));
    }

    #[tokio::test]
    async fn test_confirm_booking_runs_two_step_saga() {
        let client = MockTransport::new();
        mock_create_endpoints(&client);

        let confirmation = confirm_booking(
            &api(&client),
            &sample_user(),
            &sample_caregiver(),
            Some("Elderly Care"),
            &filled_form(),
        )
        .await
        .unwrap();

        assert_eq!(client.request_count(), 2);
        assert!(client.has_request_to("/api/bookings"));
        assert!(client.has_request_to("/api/jobs"));
        assert_eq!(confirmation.breakdown.total, 69.0);
        // 未选自定义地址时回退到用户默认位置
        assert_eq!(confirmation.location, "Bukit Bintang");
    }

    #[tokio::test]
    async fn test_booking_body_carries_exact_price_invariant() {
        let client = MockTransport::new();
        mock_create_endpoints(&client);

        confirm_booking(
            &api(&client),
            &sample_user(),
            &sample_caregiver(),
            None,
            &filled_form(),
        )
        .await
        .unwrap();

        let requests = client.requests.borrow();
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["subtotal"], json!(60.0));
        assert_eq!(body["serviceFee"], json!(3.0));
        assert_eq!(body["insuranceFee"], json!(6.0));
        assert_eq!(body["totalAmount"], json!(69.0));
        assert_eq!(body["hasInsurance"], json!(true));

        // 派生工单回退到默认护理类型
        let job_body: serde_json::Value =
            serde_json::from_str(requests[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(job_body["careType"], json!("General Care"));
        assert_eq!(job_body["startDate"], json!("2026-08-20 at 09:00"));
    }

    #[tokio::test]
    async fn test_missing_date_aborts_before_network() {
        let client = MockTransport::new();
        let mut form = filled_form();
        form.date.clear();

        let result = confirm_booking(
            &api(&client),
            &sample_user(),
            &sample_caregiver(),
            None,
            &form,
        )
        .await;

        assert!(matches!(result, Err(FlowError::Validation(_))));
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_custom_location_requires_address() {
        let client = MockTransport::new();
        let mut form = filled_form();
        form.use_custom_location = true;
        form.custom_location = "  ".to_string();

        let result = confirm_booking(
            &api(&client),
            &sample_user(),
            &sample_caregiver(),
            None,
            &form,
        )
        .await;

        match result {
            Err(FlowError::Validation(msg)) => assert!(msg.contains("service address")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_second_step_failure_is_not_rolled_back() {
        let client = MockTransport::new();
        client.mock_json("/api/bookings", 201, json!({"message": "created"}));
        client.mock_json("/api/jobs", 500, json!({"error": "job store down"}));

        let result = confirm_booking(
            &api(&client),
            &sample_user(),
            &sample_caregiver(),
            None,
            &filled_form(),
        )
        .await;

        assert!(matches!(result, Err(FlowError::Api(_))));
        // 两步都已发出；没有针对第一步的删除/补偿请求
        assert_eq!(client.request_count(), 2);
    }

    #[tokio::test]
    async fn test_booking_round_trip_preserves_submitted_fields() {
        let client = MockTransport::new();
        mock_create_endpoints(&client);
        let api = api(&client);

        let form = filled_form();
        let confirmation = confirm_booking(
            &api,
            &sample_user(),
            &sample_caregiver(),
            None,
            &form,
        )
        .await
        .unwrap();

        // 后端按提交内容回放预约历史
        client.mock_json(
            "/api/bookings/user/1",
            200,
            json!([{
                "bookingId": 77,
                "caregiverId": 2,
                "caregiverName": "Siti",
                "date": form.date.clone(),
                "hours": form.hours,
                "total": confirmation.breakdown.total,
                "status": "in_progress",
                "rated": false
            }]),
        );

        let history = load_history(&api, 1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].total, confirmation.breakdown.total);
        assert_eq!(history[0].date, form.date);
        assert_eq!(history[0].hours, form.hours);
    }

    #[cfg(feature = "demo")]
    #[tokio::test]
    async fn test_fast_forward_patches_status() {
        let client = MockTransport::new();
        client.mock_json("/api/bookings/9/status", 200, json!({"message": "ok"}));

        fast_forward(&api(&client), 9).await.unwrap();

        let requests = client.requests.borrow();
        assert_eq!(requests[0].body.as_deref().unwrap(), r#"{"status":"pending_completion"}"#);
    }
}
