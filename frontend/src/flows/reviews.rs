//! 评价流程
//!
//! 评价是追加写入的：每个预约至多一条，提交后不可修改。
//! 重复提交在客户端拦截（`rated` 标志），不依赖服务端拒绝。

use crate::api::{CareLoopApi, Transport};
use crate::flows::{FlowError, FlowResult};
use careloop_shared::protocol::CreateReview;
use careloop_shared::{BookingRecord, BookingStatus};

/// 星级对应的文字描述（1..=5）
pub const RATING_LABELS: [&str; 5] = ["Poor", "Fair", "Good", "Very Good", "Excellent"];

/// 提交评价
pub async fn submit_review<C: Transport>(
    api: &CareLoopApi<C>,
    booking: &BookingRecord,
    user_id: u64,
    rating: u8,
    review_text: &str,
) -> FlowResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(FlowError::Validation("Please select a rating".to_string()));
    }
    if booking.status != BookingStatus::Completed {
        return Err(FlowError::Validation(
            "Only completed bookings can be reviewed".to_string(),
        ));
    }
    if booking.rated {
        return Err(FlowError::Validation(
            "You have already reviewed this booking".to_string(),
        ));
    }

    api.call(&CreateReview {
        booking_id: booking.booking_id,
        user_id,
        caregiver_id: booking.caregiver_id,
        rating,
        review_text: review_text.trim().to_string(),
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

    fn completed_booking(rated: bool) -> BookingRecord {
        serde_json::from_str(&format!(
            r#"{{"bookingId": 7, "caregiverId": 2, "status": "completed", "rated": {}}}"#,
            rated
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_submit_review_posts_rating() {
        let client = MockTransport::new();
        client.mock_json("/api/reviews", 201, json!({"message": "ok"}));

        submit_review(&api(&client), &completed_booking(false), 1, 5, " great ")
            .await
            .unwrap();

        let requests = client.requests.borrow();
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["rating"], json!(5));
        assert_eq!(body["bookingId"], json!(7));
        assert_eq!(body["reviewText"], json!("great"));
    }

    #[tokio::test]
    async fn test_duplicate_review_is_rejected_client_side() {
        let client = MockTransport::new();

        let result = submit_review(&api(&client), &completed_booking(true), 1, 4, "").await;

        match result {
            Err(FlowError::Validation(msg)) => assert!(msg.contains("already reviewed")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_rating_is_rejected() {
        let client = MockTransport::new();

        let result = submit_review(&api(&client), &completed_booking(false), 1, 0, "").await;

        assert!(matches!(result, Err(FlowError::Validation(_))));
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_in_progress_booking_cannot_be_reviewed() {
        let client = MockTransport::new();
        let booking: BookingRecord = serde_json::from_str(
            r#"{"bookingId": 7, "caregiverId": 2, "status": "in_progress", "rated": false}"#,
        )
        .unwrap();

        let result = submit_review(&api(&client), &booking, 1, 3, "").await;

        assert!(matches!(result, Err(FlowError::Validation(_))));
        assert_eq!(client.request_count(), 0);
    }
}
