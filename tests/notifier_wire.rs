use deskmate::notifier::PresentationNotifier;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

async fn listener_with_notifier() -> (JoinHandle<Value>, PresentationNotifier) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let receiver = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = String::new();
        stream.read_to_string(&mut buf).await.unwrap();
        serde_json::from_str(&buf).unwrap()
    });

    (receiver, PresentationNotifier::new(port, false))
}

#[tokio::test]
async fn notify_sends_speak_and_action_payload() {
    let (receiver, notifier) = listener_with_notifier().await;

    notifier
        .notify("All done!", Some(vec!["cheek_blush".to_string()]))
        .await;

    let payload = receiver.await.unwrap();
    assert_eq!(payload["type"], "speak_and_action");
    assert_eq!(payload["text"], "All done!");
    assert_eq!(payload["actions"], serde_json::json!(["cheek_blush"]));
}

#[tokio::test]
async fn notify_derives_tags_when_none_are_given() {
    let (receiver, notifier) = listener_with_notifier().await;

    notifier.notify("ok", None).await;

    let payload = receiver.await.unwrap();
    assert_eq!(payload["type"], "speak_and_action");
    assert_eq!(payload["actions"], serde_json::json!(["blink_eyes", "breathing"]));
}

#[tokio::test]
async fn interrupt_sends_stop() {
    let (receiver, notifier) = listener_with_notifier().await;

    notifier.interrupt().await;

    let payload = receiver.await.unwrap();
    assert_eq!(payload, serde_json::json!({ "type": "stop" }));
}

#[tokio::test]
async fn push_failures_are_swallowed() {
    // nothing listening on this port; both calls must return without error
    let notifier = PresentationNotifier::new(1, false);
    notifier.notify("hello", None).await;
    notifier.interrupt().await;
}
