use super::*;

#[tokio::test]
async fn echo_provider_always_returns_the_same_reply() {
    let provider = FakeProvider::echo("echo", "hello");
    let first = provider.complete(&[ChatMessage::user("hi")]).await.unwrap();
    let second = provider.complete(&[ChatMessage::user("again")]).await.unwrap();
    assert_eq!(first.content, "hello");
    assert_eq!(second.content, "hello");
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn scripted_provider_advances_then_repeats_last_response() {
    let provider = FakeProvider::new(
        "scripted",
        vec![
            ScriptedResponse::Err(ProviderError::Network("boom".to_string())),
            ScriptedResponse::Ok("ok".to_string()),
        ],
    );

    let first = provider.complete(&[ChatMessage::user("x")]).await;
    assert!(matches!(first, Err(ProviderError::Network(_))));

    let second = provider.complete(&[ChatMessage::user("x")]).await.unwrap();
    assert_eq!(second.content, "ok");

    let third = provider.complete(&[ChatMessage::user("x")]).await.unwrap();
    assert_eq!(third.content, "ok");
}
