//! 培训流程
//!
//! 报名是幂等的：同一护工对同一项目只能有一条报名记录。提交前
//! 先重新拉取当前报名列表做客户端去重（尽力而为；对另一标签页的
//! 并发报名不具备事务性保护）。

use crate::api::{CareLoopApi, Transport};
use crate::flows::{FlowError, FlowResult};
use careloop_shared::protocol::{EnrollTraining, GetTrainingProgram, ListCaregiverTrainings};
use careloop_shared::{TrainingEnrollment, TrainingProgram};

/// 拉取培训项目详情
pub async fn program<C: Transport>(
    api: &CareLoopApi<C>,
    training_program_id: u64,
) -> FlowResult<TrainingProgram> {
    Ok(api.call(&GetTrainingProgram { training_program_id }).await?)
}

/// 拉取护工当前的报名列表
pub async fn enrollments<C: Transport>(
    api: &CareLoopApi<C>,
    caregiver_id: u64,
) -> FlowResult<Vec<TrainingEnrollment>> {
    Ok(api.call(&ListCaregiverTrainings { caregiver_id }).await?)
}

/// 是否已报名某项目
pub fn is_enrolled(enrollments: &[TrainingEnrollment], training_program_id: u64) -> bool {
    enrollments
        .iter()
        .any(|e| e.training_program_id == training_program_id)
}

/// 报名：先重查再提交
pub async fn enroll<C: Transport>(
    api: &CareLoopApi<C>,
    caregiver_id: u64,
    training_program_id: u64,
) -> FlowResult<()> {
    let current = enrollments(api, caregiver_id).await?;
    if is_enrolled(&current, training_program_id) {
        return Err(FlowError::Validation(
            "You are already enrolled in this training!".to_string(),
        ));
    }

    api.call(&EnrollTraining {
        caregiver_id,
        training_program_id,
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

    #[tokio::test]
    async fn test_enroll_rechecks_then_posts() {
        let client = MockTransport::new();
        client.mock_json("/api/training/caregiver/2", 200, json!([]));
        client.mock_json("/api/training/enroll", 201, json!({"message": "ok"}));

        enroll(&api(&client), 2, 7).await.unwrap();

        assert_eq!(client.request_count(), 2);
        let requests = client.requests.borrow();
        let body: serde_json::Value =
            serde_json::from_str(requests[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["caregiverId"], json!(2));
        assert_eq!(body["trainingProgramId"], json!(7));
    }

    #[tokio::test]
    async fn test_duplicate_enrollment_is_rejected() {
        let client = MockTransport::new();
        client.mock_json(
            "/api/training/caregiver/2",
            200,
            json!([{"TrainingProgramID": 7, "Title": "First Aid", "Status": "enrolled"}]),
        );

        let result = enroll(&api(&client), 2, 7).await;

        match result {
            Err(FlowError::Validation(msg)) => assert!(msg.contains("already enrolled")),
            other => panic!("expected validation error, got {:?}", other),
        }
        // 只发出了重查请求，没有报名写入
        assert_eq!(client.request_count(), 1);
        assert!(!client.has_request_to("/api/training/enroll"));
    }

    #[test]
    fn test_is_enrolled_matches_by_program_id() {
        let list: Vec<TrainingEnrollment> = serde_json::from_str(
            r#"[{"TrainingProgramID": 1, "Title": "A"}, {"TrainingProgramID": 3, "Title": "B"}]"#,
        )
        .unwrap();

        assert!(is_enrolled(&list, 1));
        assert!(is_enrolled(&list, 3));
        assert!(!is_enrolled(&list, 2));
    }
}
