mod common;

use common::TestApp;
use pretty_assertions::assert_eq;
use shared::{
    abstract_trait::ConversationServiceTrait,
    domain::requests::SendMessageRequest,
    errors::ServiceError,
    model::Role,
};

fn text(content: &str) -> SendMessageRequest {
    SendMessageRequest {
        content: content.to_string(),
    }
}

#[tokio::test]
async fn pair_resolves_to_one_conversation_in_either_order() {
    let app = TestApp::new().await;
    let a = app.user("alice", Role::User).await;
    let b = app.user("bob", Role::User).await;
    let service = &app.state.di_container.conversation_service;

    let first = service.find_or_create(a.user_id, b.user_id).await.unwrap();
    let second = service.find_or_create(b.user_id, a.user_id).await.unwrap();
    let third = service.find_or_create(a.user_id, b.user_id).await.unwrap();

    assert_eq!(first.conversation_id, second.conversation_id);
    assert_eq!(first.conversation_id, third.conversation_id);
    assert_eq!(app.store.conversation_count(), 1);
}

#[tokio::test]
async fn messages_flow_both_ways_in_order() {
    let app = TestApp::new().await;
    let a = app.user("alice", Role::User).await;
    let b = app.user("bob", Role::User).await;
    let (ra, rb) = (TestApp::requester(&a), TestApp::requester(&b));
    let service = &app.state.di_container.conversation_service;

    let hello = service
        .send_message(&ra, b.user_id, &text("  Is this still available?  "))
        .await
        .unwrap();
    assert_eq!(hello.data.content, "Is this still available?");

    service
        .send_message(&rb, a.user_id, &text("Yes it is"))
        .await
        .unwrap();

    let history = service
        .messages(&rb, hello.data.conversation_id)
        .await
        .unwrap();
    let contents: Vec<&str> = history.data.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["Is this still available?", "Yes it is"]);

    let listed = service.my_conversations(&ra).await.unwrap();
    assert_eq!(listed.data.len(), 1);
    assert_eq!(listed.data[0].other_user_id, b.user_id);
    assert_eq!(listed.data[0].other_username, "bob");
}

#[tokio::test]
async fn outsiders_and_bad_messages_are_refused() {
    let app = TestApp::new().await;
    let a = app.user("alice", Role::User).await;
    let b = app.user("bob", Role::User).await;
    let eve = app.user("eve", Role::User).await;
    let ra = TestApp::requester(&a);
    let service = &app.state.di_container.conversation_service;

    let sent = service
        .send_message(&ra, b.user_id, &text("hi"))
        .await
        .unwrap();

    assert!(matches!(
        service
            .messages(&TestApp::requester(&eve), sent.data.conversation_id)
            .await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        service.messages(&ra, 9_999).await,
        Err(ServiceError::NotFound(_))
    ));

    match service.send_message(&ra, b.user_id, &text("   ")).await {
        Err(ServiceError::Validation(errors)) => {
            assert_eq!(errors, vec!["Message content cannot be empty".to_string()])
        }
        other => panic!("unexpected: {other:?}"),
    }
    match service.send_message(&ra, a.user_id, &text("me")).await {
        Err(ServiceError::Validation(errors)) => {
            assert_eq!(errors, vec!["Cannot send message to yourself".to_string()])
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(matches!(
        service.send_message(&ra, 9_999, &text("hello?")).await,
        Err(ServiceError::NotFound(_))
    ));
}
