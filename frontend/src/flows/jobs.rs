//! 工单流程（护工侧）
//!
//! 接单与完工。完工后服务端计算抽佣并返回结算结果，客户端随即
//! 重新拉取护工的规范档案获取权威累计值，从不信任本地累加。

use crate::api::{CareLoopApi, Transport};
use crate::flows::FlowResult;
use careloop_shared::pricing::{self, Settlement};
use careloop_shared::protocol::{
    AcceptJob, CompleteJob, GetCaregiver, GetJob, ListAcceptedJobs, ListJobsForCaregiver,
};
use careloop_shared::{AcceptedJob, CaregiverProfile, JobRequest, JobSettlement};

/// 拉取待接的工作请求
pub async fn load_requests<C: Transport>(
    api: &CareLoopApi<C>,
    caregiver_id: u64,
) -> FlowResult<Vec<JobRequest>> {
    Ok(api.call(&ListJobsForCaregiver { caregiver_id }).await?)
}

/// 拉取已接受的工单
pub async fn load_accepted<C: Transport>(
    api: &CareLoopApi<C>,
    caregiver_id: u64,
) -> FlowResult<Vec<AcceptedJob>> {
    Ok(api.call(&ListAcceptedJobs { caregiver_id }).await?)
}

/// 查看单个工作请求详情
pub async fn job_details<C: Transport>(
    api: &CareLoopApi<C>,
    job_request_id: u64,
) -> FlowResult<JobRequest> {
    Ok(api.call(&GetJob { job_request_id }).await?)
}

/// 接受工作请求，并回读工单用于确认弹窗
pub async fn accept_job<C: Transport>(
    api: &CareLoopApi<C>,
    job_request_id: u64,
    caregiver_id: u64,
) -> FlowResult<JobRequest> {
    api.call(&AcceptJob {
        job_request_id,
        caregiver_id,
    })
    .await?;

    Ok(api.call(&GetJob { job_request_id }).await?)
}

/// 标记完工并取回结算与权威档案
pub async fn complete_job<C: Transport>(
    api: &CareLoopApi<C>,
    accepted_job_id: u64,
    caregiver_id: u64,
) -> FlowResult<(JobSettlement, CaregiverProfile)> {
    let settlement = api.call(&CompleteJob { accepted_job_id }).await?;
    let profile = api.call(&GetCaregiver { caregiver_id }).await?;
    Ok((settlement, profile))
}

/// 接单前的收入预估（总额、15% 抽佣、净收入）
pub fn earnings_preview(job: &JobRequest) -> Settlement {
    pricing::settle(job.hourly_rate * job.hours as f64)
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
    async fn test_accept_job_posts_then_reloads() {
        let client = MockTransport::new();
        client.mock_json("/api/jobs/5/accept", 200, json!({"message": "accepted"}));
        client.mock_json(
            "/api/jobs/5",
            200,
            json!({"JobRequestID": 5, "UserName": "Mei", "HourlyRate": 20.0, "Hours": 3}),
        );

        let job = accept_job(&api(&client), 5, 2).await.unwrap();

        assert_eq!(job.user_name, "Mei");
        assert_eq!(client.request_count(), 2);
        let requests = client.requests.borrow();
        assert_eq!(requests[0].body.as_deref().unwrap(), r#"{"caregiverId":2}"#);
    }

    #[tokio::test]
    async fn test_complete_job_refetches_canonical_profile() {
        let client = MockTransport::new();
        client.mock_json(
            "/api/jobs/accepted/8/complete",
            200,
            json!({"earnings": 85.0, "commission": 15.0}),
        );
        client.mock_json(
            "/api/caregivers/2",
            200,
            json!({"CaregiverID": 2, "Name": "Siti", "TotalJobs": 6, "TotalEarnings": 510.0}),
        );

        let (settlement, profile) = complete_job(&api(&client), 8, 2).await.unwrap();

        assert_eq!(settlement.earnings, 85.0);
        assert_eq!(settlement.commission, 15.0);
        // 权威累计值来自档案回读，而非本地累加
        assert_eq!(profile.total_jobs, 6);
        assert_eq!(profile.total_earnings, 510.0);
        assert!(client.has_request_to("/api/caregivers/2"));
    }

    #[tokio::test]
    async fn test_complete_job_failure_skips_profile_fetch() {
        let client = MockTransport::new();
        client.mock_json(
            "/api/jobs/accepted/8/complete",
            409,
            json!({"error": "already completed"}),
        );

        let result = complete_job(&api(&client), 8, 2).await;

        assert!(result.is_err());
        assert!(!client.has_request_to("/api/caregivers/2"));
    }

    #[test]
    fn test_earnings_preview_commission() {
        let job: JobRequest = serde_json::from_str(
            r#"{"JobRequestID": 1, "HourlyRate": 20.0, "Hours": 5}"#,
        )
        .unwrap();

        // 总额 100 -> 抽佣 15 -> 净收入 85
        let preview = earnings_preview(&job);
        assert_eq!(preview.gross, 100.0);
        assert_eq!(preview.commission, 15.0);
        assert_eq!(preview.net, 85.0);
    }
}
