use crate::{
    AcceptedJob, BookingRecord, CaregiverProfile, CaregiverSummary, JobRequest, JobSettlement,
    Message, Review, SenderRole, ThreadHandle, TrainingEnrollment, TrainingProgram, UserProfile,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Whether requests with this method carry a JSON body.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// A trait that defines the request-response relationship and metadata for an
/// API endpoint. The request value itself is the JSON body (for methods that
/// carry one); `path()` yields the relative URL including path parameters.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path relative to the API base.
    fn path(&self) -> String;
}

/// Generic acknowledgement for endpoints whose response body we do not
/// consume beyond "it parsed as JSON and the status was 2xx".
#[derive(Debug, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

/// Minimal percent-encoding for query values coming from the fixed care-type
/// list (spaces only; the UI never produces other reserved characters).
fn encode_query(value: &str) -> String {
    value.replace(' ', "%20")
}

// =========================================================
// Authentication
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: UserProfile,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CaregiverEnvelope {
    pub caregiver: CaregiverProfile,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaregiverRegistered {
    pub caregiver_id: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLogin {
    pub email: String,
    pub password: String,
}

impl ApiRequest for UserLogin {
    type Response = UserEnvelope;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/users/login".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub password: String,
}

impl ApiRequest for RegisterUser {
    type Response = UserEnvelope;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/users/register".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CaregiverLogin {
    pub email: String,
    pub password: String,
}

impl ApiRequest for CaregiverLogin {
    type Response = CaregiverEnvelope;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/caregivers/login".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCaregiver {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub location: String,
    pub experience: String,
    pub rate: f64,
    pub specialties: Vec<String>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub id_number: String,
}

impl ApiRequest for RegisterCaregiver {
    type Response = CaregiverRegistered;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/caregivers/register".to_string()
    }
}

// =========================================================
// Users
// =========================================================

#[derive(Debug, Serialize)]
pub struct GetUser {
    pub user_id: u64,
}

impl ApiRequest for GetUser {
    type Response = UserProfile;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/users/{}", self.user_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateUser {
    #[serde(skip)]
    pub user_id: u64,
    pub name: String,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

impl ApiRequest for UpdateUser {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/api/users/{}", self.user_id)
    }
}

// =========================================================
// Caregivers
// =========================================================

#[derive(Debug, Default, Serialize)]
pub struct ListCaregivers {
    #[serde(skip)]
    pub care_type: Option<String>,
}

impl ApiRequest for ListCaregivers {
    type Response = Vec<CaregiverSummary>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        match &self.care_type {
            Some(care_type) if !care_type.is_empty() => {
                format!("/api/caregivers?careType={}", encode_query(care_type))
            }
            _ => "/api/caregivers".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetCaregiver {
    pub caregiver_id: u64,
}

impl ApiRequest for GetCaregiver {
    type Response = CaregiverProfile;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/caregivers/{}", self.caregiver_id)
    }
}

// =========================================================
// Bookings
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub user_id: u64,
    pub caregiver_id: u64,
    pub booking_date: String,
    pub booking_time: String,
    pub hours: u32,
    pub hourly_rate: f64,
    pub subtotal: f64,
    pub insurance_fee: f64,
    pub service_fee: f64,
    pub total_amount: f64,
    pub has_insurance: bool,
}

impl ApiRequest for CreateBooking {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/bookings".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ListUserBookings {
    pub user_id: u64,
}

impl ApiRequest for ListUserBookings {
    type Response = Vec<BookingRecord>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/bookings/user/{}", self.user_id)
    }
}

/// 用户确认完工（pending_completion -> completed）
#[derive(Debug, Serialize)]
pub struct ConfirmBookingCompletion {
    #[serde(skip)]
    pub booking_id: u64,
}

impl ApiRequest for ConfirmBookingCompletion {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/api/bookings/{}/confirm", self.booking_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetBookingStatus {
    #[serde(skip)]
    pub booking_id: u64,
    pub status: crate::BookingStatus,
}

impl ApiRequest for SetBookingStatus {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/api/bookings/{}/status", self.booking_id)
    }
}

// =========================================================
// Jobs
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub user_id: u64,
    pub user_name: String,
    pub user_avatar: String,
    pub care_type: String,
    pub hourly_rate: f64,
    pub hours: u32,
    pub start_date: String,
    pub phone: String,
    pub address: String,
    pub distance: String,
    pub special_requests: String,
}

impl ApiRequest for CreateJobRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/jobs".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct GetJob {
    pub job_request_id: u64,
}

impl ApiRequest for GetJob {
    type Response = JobRequest;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/jobs/{}", self.job_request_id)
    }
}

#[derive(Debug, Serialize)]
pub struct ListJobsForCaregiver {
    pub caregiver_id: u64,
}

impl ApiRequest for ListJobsForCaregiver {
    type Response = Vec<JobRequest>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/jobs/for-caregiver/{}", self.caregiver_id)
    }
}

#[derive(Debug, Serialize)]
pub struct ListAcceptedJobs {
    pub caregiver_id: u64,
}

impl ApiRequest for ListAcceptedJobs {
    type Response = Vec<AcceptedJob>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/jobs/accepted/{}", self.caregiver_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptJob {
    #[serde(skip)]
    pub job_request_id: u64,
    pub caregiver_id: u64,
}

impl ApiRequest for AcceptJob {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/api/jobs/{}/accept", self.job_request_id)
    }
}

/// 护工标记完工；服务端计算抽佣并返回结算结果
#[derive(Debug, Serialize)]
pub struct CompleteJob {
    #[serde(skip)]
    pub accepted_job_id: u64,
}

impl ApiRequest for CompleteJob {
    type Response = JobSettlement;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/api/jobs/accepted/{}/complete", self.accepted_job_id)
    }
}

// =========================================================
// Reviews
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    pub booking_id: u64,
    pub user_id: u64,
    pub caregiver_id: u64,
    pub rating: u8,
    pub review_text: String,
}

impl ApiRequest for CreateReview {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/reviews".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ListCaregiverReviews {
    pub caregiver_id: u64,
}

impl ApiRequest for ListCaregiverReviews {
    type Response = Vec<Review>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/reviews/caregiver/{}", self.caregiver_id)
    }
}

// =========================================================
// Messaging
// =========================================================

/// 解析或创建 (用户, 护工) 对应的会话线程
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenThread {
    pub user_id: u64,
    pub caregiver_id: u64,
}

impl ApiRequest for OpenThread {
    type Response = ThreadHandle;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/messages/thread".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ListThreadMessages {
    pub thread_id: u64,
}

impl ApiRequest for ListThreadMessages {
    type Response = Vec<Message>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/messages/thread/{}", self.thread_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub thread_id: u64,
    pub sender_type: SenderRole,
    pub sender_id: u64,
    pub receiver_type: SenderRole,
    pub receiver_id: u64,
    pub message_text: String,
}

impl ApiRequest for SendMessage {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/messages".to_string()
    }
}

// =========================================================
// Training
// =========================================================

#[derive(Debug, Serialize)]
pub struct GetTrainingProgram {
    pub training_program_id: u64,
}

impl ApiRequest for GetTrainingProgram {
    type Response = TrainingProgram;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/training/{}", self.training_program_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollTraining {
    pub caregiver_id: u64,
    pub training_program_id: u64,
}

impl ApiRequest for EnrollTraining {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/training/enroll".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ListCaregiverTrainings {
    pub caregiver_id: u64,
}

impl ApiRequest for ListCaregiverTrainings {
    type Response = Vec<TrainingEnrollment>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/training/caregiver/{}", self.caregiver_id)
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_parameters_are_interpolated() {
        assert_eq!(GetCaregiver { caregiver_id: 9 }.path(), "/api/caregivers/9");
        assert_eq!(
            CompleteJob { accepted_job_id: 4 }.path(),
            "/api/jobs/accepted/4/complete"
        );
        assert_eq!(
            ConfirmBookingCompletion { booking_id: 12 }.path(),
            "/api/bookings/12/confirm"
        );
    }

    #[test]
    fn test_list_caregivers_query_encoding() {
        let all = ListCaregivers { care_type: None };
        assert_eq!(all.path(), "/api/caregivers");

        let filtered = ListCaregivers {
            care_type: Some("Elderly Care".to_string()),
        };
        assert_eq!(filtered.path(), "/api/caregivers?careType=Elderly%20Care");
    }

    #[test]
    fn test_path_only_fields_are_not_serialized() {
        // booking_id 只进 URL，不进请求体
        let req = SetBookingStatus {
            booking_id: 5,
            status: crate::BookingStatus::PendingCompletion,
        };
        let body = serde_json::to_string(&req).unwrap();
        assert_eq!(body, r#"{"status":"pending_completion"}"#);
    }

    #[test]
    fn test_request_bodies_are_camel_case() {
        let req = AcceptJob {
            job_request_id: 3,
            caregiver_id: 8,
        };
        assert_eq!(req.path(), "/api/jobs/3/accept");
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"caregiverId":8}"#);
    }
}
