//! 消息流程
//!
//! 会话线程由 (用户, 护工) 二元组唯一确定，首次联系时由服务端惰性
//! 创建。历史消息按发送时间升序呈现；服务端不保证顺序，客户端兜底
//! 排序。护工侧打开会话时需要先从工单列表反查对方的用户 id。

use crate::api::{CareLoopApi, Transport};
use crate::flows::{FlowError, FlowResult};
use careloop_shared::protocol::{
    ListAcceptedJobs, ListJobsForCaregiver, ListThreadMessages, OpenThread, SendMessage,
};
use careloop_shared::{CaregiverProfile, Message, SenderRole, UserProfile};

/// 一个已打开的会话
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    pub thread_id: u64,
    /// 本端角色
    pub role: SenderRole,
    pub self_id: u64,
    pub peer_id: u64,
    pub peer_name: String,
}

/// 用户侧打开与某护工的会话
pub async fn open_for_user<C: Transport>(
    api: &CareLoopApi<C>,
    user: &UserProfile,
    caregiver_id: u64,
    caregiver_name: &str,
) -> FlowResult<ChatSession> {
    let handle = api
        .call(&OpenThread {
            user_id: user.user_id,
            caregiver_id,
        })
        .await?;

    Ok(ChatSession {
        thread_id: handle.thread_id,
        role: SenderRole::User,
        self_id: user.user_id,
        peer_id: caregiver_id,
        peer_name: caregiver_name.to_string(),
    })
}

/// 护工侧打开与某用户的会话
///
/// 工单里只有用户名，先在待接/已接列表中反查用户 id。
pub async fn open_for_caregiver<C: Transport>(
    api: &CareLoopApi<C>,
    caregiver: &CaregiverProfile,
    user_name: &str,
) -> FlowResult<ChatSession> {
    let caregiver_id = caregiver.caregiver_id;

    let mut user_id = api
        .call(&ListJobsForCaregiver { caregiver_id })
        .await?
        .iter()
        .find(|job| job.user_name == user_name)
        .map(|job| job.user_id);

    if user_id.is_none() {
        user_id = api
            .call(&ListAcceptedJobs { caregiver_id })
            .await?
            .iter()
            .find(|job| job.user_name == user_name)
            .map(|job| job.user_id);
    }

    let Some(user_id) = user_id.filter(|id| *id != 0) else {
        return Err(FlowError::Validation(
            "Unable to start chat at this time. Please try again after the user books you."
                .to_string(),
        ));
    };

    let handle = api.call(&OpenThread { user_id, caregiver_id }).await?;

    Ok(ChatSession {
        thread_id: handle.thread_id,
        role: SenderRole::Caregiver,
        self_id: caregiver_id,
        peer_id: user_id,
        peer_name: user_name.to_string(),
    })
}

/// 拉取会话历史，按发送时间升序
pub async fn history<C: Transport>(
    api: &CareLoopApi<C>,
    session: &ChatSession,
) -> FlowResult<Vec<Message>> {
    let mut messages = api
        .call(&ListThreadMessages {
            thread_id: session.thread_id,
        })
        .await?;
    messages.sort_by_key(|m| m.sent_at);
    Ok(messages)
}

/// 发送一条消息
pub async fn send<C: Transport>(
    api: &CareLoopApi<C>,
    session: &ChatSession,
    text: &str,
) -> FlowResult<()> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FlowError::Validation("Message is empty".to_string()));
    }

    api.call(&SendMessage {
        thread_id: session.thread_id,
        sender_type: session.role,
        sender_id: session.self_id,
        receiver_type: session.role.peer(),
        receiver_id: session.peer_id,
        message_text: text.to_string(),
    })
    .await?;
    Ok(())
}

// =========================================================
// 演示特性：模拟对端回复
// =========================================================

/// 仅演示用：对端在固定延迟后回发一条罐头消息。
/// 不是生产语义，生产构建通过关闭 `demo` 特性整体移除。
#[cfg(feature = "demo")]
pub mod demo {
    use super::*;

    /// 对端回复前的固定延迟（毫秒）
    pub const REPLY_DELAY_MILLIS: u32 = 1_000;

    const CAREGIVER_REPLIES: [&str; 5] = [
        "Thank you for reaching out! I'd be happy to help with your caregiving needs.",
        "I have experience with similar situations. When would you like to schedule?",
        "I'm available and looking forward to helping you!",
        "Feel free to ask me any questions about my experience or certifications.",
        "I can definitely accommodate those requirements. Let me know the details!",
    ];

    const USER_REPLIES: [&str; 5] = [
        "Thank you! That sounds perfect. What time works best for you?",
        "I appreciate your help. Can you confirm the appointment details?",
        "Great! Looking forward to meeting you. Do you have any questions for me?",
        "That's good to know. My address is included in the booking details.",
        "Perfect! Please let me know if you need any additional information.",
    ];

    /// 按回复方角色挑选一条罐头文案（seed 做轮换，保证确定性）
    pub fn canned_reply(replier: SenderRole, seed: usize) -> &'static str {
        match replier {
            SenderRole::Caregiver => CAREGIVER_REPLIES[seed % CAREGIVER_REPLIES.len()],
            SenderRole::User => USER_REPLIES[seed % USER_REPLIES.len()],
        }
    }

    /// 以对端身份回发一条模拟消息
    pub async fn send_counter_reply<C: Transport>(
        api: &CareLoopApi<C>,
        session: &ChatSession,
        seed: usize,
    ) -> FlowResult<()> {
        let replier = session.role.peer();

        api.call(&SendMessage {
            thread_id: session.thread_id,
            sender_type: replier,
            sender_id: session.peer_id,
            receiver_type: session.role,
            receiver_id: session.self_id,
            message_text: canned_reply(replier, seed).to_string(),
        })
        .await?;
        Ok(())
    }
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
        serde_json::from_str(r#"{"UserID": 1, "Name": "Mei", "Email": "m@x.y"}"#).unwrap()
    }

    fn sample_caregiver() -> CaregiverProfile {
        serde_json::from_str(r#"{"CaregiverID": 2, "Name": "Siti"}"#).unwrap()
    }

    fn session() -> ChatSession {
        ChatSession {
            thread_id: 10,
            role: SenderRole::User,
            self_id: 1,
            peer_id: 2,
            peer_name: "Siti".to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_for_user_resolves_thread() {
        let client = MockTransport::new();
        client.mock_json("/api/messages/thread", 200, json!({"threadId": 10}));

        let session = open_for_user(&api(&client), &sample_user(), 2, "Siti")
            .await
            .unwrap();

        assert_eq!(session.thread_id, 10);
        assert_eq!(session.role, SenderRole::User);
        let requests = client.requests.borrow();
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["userId"], json!(1));
        assert_eq!(body["caregiverId"], json!(2));
    }

    #[tokio::test]
    async fn test_open_for_caregiver_resolves_user_from_accepted_jobs() {
        let client = MockTransport::new();
        client.mock_json("/api/jobs/for-caregiver/2", 200, json!([]));
        client.mock_json(
            "/api/jobs/accepted/2",
            200,
            json!([{"AcceptedJobID": 4, "UserID": 1, "UserName": "Mei"}]),
        );
        client.mock_json("/api/messages/thread", 200, json!({"threadId": 11}));

        let session = open_for_caregiver(&api(&client), &sample_caregiver(), "Mei")
            .await
            .unwrap();

        assert_eq!(session.thread_id, 11);
        assert_eq!(session.role, SenderRole::Caregiver);
        assert_eq!(session.peer_id, 1);
    }

    #[tokio::test]
    async fn test_open_for_caregiver_without_booking_fails() {
        let client = MockTransport::new();
        client.mock_json("/api/jobs/for-caregiver/2", 200, json!([]));
        client.mock_json("/api/jobs/accepted/2", 200, json!([]));

        let result = open_for_caregiver(&api(&client), &sample_caregiver(), "Nobody").await;

        assert!(matches!(result, Err(FlowError::Validation(_))));
        // 没有可用的对端 id，不应创建线程
        assert!(!client.has_request_to("/api/messages/thread"));
    }

    #[tokio::test]
    async fn test_history_is_sorted_ascending() {
        let client = MockTransport::new();
        client.mock_json(
            "/api/messages/thread/10",
            200,
            json!([
                {"SenderType": "caregiver", "MessageText": "second", "SentAt": "2026-08-01T10:05:00Z"},
                {"SenderType": "user", "MessageText": "first", "SentAt": "2026-08-01T10:00:00Z"}
            ]),
        );

        let messages = history(&api(&client), &session()).await.unwrap();

        assert_eq!(messages[0].message_text, "first");
        assert_eq!(messages[1].message_text, "second");
    }

    #[tokio::test]
    async fn test_send_tags_roles_and_ids() {
        let client = MockTransport::new();
        client.mock_json("/api/messages", 201, json!({"message": "ok"}));

        send(&api(&client), &session(), "hello there").await.unwrap();

        let requests = client.requests.borrow();
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["senderType"], json!("user"));
        assert_eq!(body["receiverType"], json!("caregiver"));
        assert_eq!(body["senderId"], json!(1));
        assert_eq!(body["receiverId"], json!(2));
    }

    #[tokio::test]
    async fn test_send_rejects_blank_message() {
        let client = MockTransport::new();

        let result = send(&api(&client), &session(), "   ").await;

        assert!(matches!(result, Err(FlowError::Validation(_))));
        assert_eq!(client.request_count(), 0);
    }

    #[cfg(feature = "demo")]
    #[tokio::test]
    async fn test_demo_reply_impersonates_peer() {
        let client = MockTransport::new();
        client.mock_json("/api/messages", 201, json!({"message": "ok"}));

        demo::send_counter_reply(&api(&client), &session(), 3)
            .await
            .unwrap();

        let requests = client.requests.borrow();
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        // 用户发起的会话，模拟回复来自护工
        assert_eq!(body["senderType"], json!("caregiver"));
        assert_eq!(body["senderId"], json!(2));
        assert_eq!(body["messageText"], json!(demo::canned_reply(SenderRole::Caregiver, 3)));
    }
}
