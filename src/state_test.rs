use super::*;

#[test]
fn new_conversation_is_empty() {
    let conversation = Conversation::new();
    assert!(conversation.messages().is_empty());
    assert!(conversation.streaming().is_none());
}

#[test]
fn greeting_is_a_finished_model_message() {
    let conversation = Conversation::with_greeting("Waiting for input...");
    let first = &conversation.messages()[0];
    assert_eq!(first.role, Role::Model);
    assert_eq!(first.text, "Waiting for input...");
    assert!(!first.is_streaming);
}

#[test]
fn ids_are_creation_ordered() {
    let mut conversation = Conversation::with_greeting("hi");
    let user = conversation.push_user("question");
    let model = conversation.begin_model().unwrap();
    assert!(conversation.messages()[0].id < user);
    assert!(user < model);
}

#[test]
fn append_grows_streaming_message() {
    let mut conversation = Conversation::new();
    let id = conversation.begin_model().unwrap();
    assert!(conversation.append(id, "AB"));
    assert!(conversation.append(id, "CD"));
    assert_eq!(conversation.get(id).unwrap().text, "ABCD");
    assert!(conversation.get(id).unwrap().is_streaming);
}

#[test]
fn finish_clears_streaming_and_freezes_text() {
    let mut conversation = Conversation::new();
    let id = conversation.begin_model().unwrap();
    conversation.append(id, "done");
    conversation.finish(id);
    assert!(!conversation.get(id).unwrap().is_streaming);
    assert!(!conversation.append(id, "more"));
    assert_eq!(conversation.get(id).unwrap().text, "done");
}

#[test]
fn second_streaming_message_is_refused() {
    let mut conversation = Conversation::new();
    let open = conversation.begin_model().unwrap();
    let err = conversation.begin_model().unwrap_err();
    assert!(matches!(err, ChatError::StreamInProgress(id) if id == open));
    assert_eq!(conversation.messages().len(), 1);

    conversation.finish(open);
    assert!(conversation.begin_model().is_ok());
}

#[test]
fn user_messages_never_accept_fragments() {
    let mut conversation = Conversation::new();
    let id = conversation.push_user("hello");
    assert!(!conversation.append(id, "x"));
    assert_eq!(conversation.get(id).unwrap().text, "hello");
}

#[test]
fn message_serializes_camel_case() {
    let mut conversation = Conversation::new();
    let id = conversation.begin_model().unwrap();
    let json = serde_json::to_value(conversation.get(id).unwrap()).unwrap();
    assert_eq!(json["isStreaming"], true);
    assert_eq!(json["role"], "model");
}
