use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, SystemContentBlock};
use patsim_core::models::message::Message;
use patsim_llm::bedrock::to_converse;

fn text_of(block: &ContentBlock) -> &str {
    match block {
        ContentBlock::Text(text) => text.as_str(),
        other => panic!("expected a text block, got {other:?}"),
    }
}

#[test]
fn system_messages_become_system_blocks() {
    let (system, turns) = to_converse(&[
        Message::system("You are the patient."),
        Message::user("Where does it hurt?"),
        Message::assistant("My head."),
    ])
    .unwrap();

    assert_eq!(system.len(), 1);
    assert!(matches!(&system[0], SystemContentBlock::Text(t) if t == "You are the patient."));

    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role(), &ConversationRole::User);
    assert_eq!(text_of(&turns[0].content()[0]), "Where does it hurt?");
    assert_eq!(turns[1].role(), &ConversationRole::Assistant);
    assert_eq!(text_of(&turns[1].content()[0]), "My head.");
}

#[test]
fn system_only_request_is_sent_as_a_user_turn() {
    let (system, turns) = to_converse(&[Message::system("Evaluate this consultation.")]).unwrap();

    assert!(system.is_empty());
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role(), &ConversationRole::User);
    assert_eq!(text_of(&turns[0].content()[0]), "Evaluate this consultation.");
}

#[test]
fn several_system_messages_are_joined_into_one_turn() {
    let (system, turns) =
        to_converse(&[Message::system("First part."), Message::system("Second part.")]).unwrap();

    assert!(system.is_empty());
    assert_eq!(turns.len(), 1);
    assert_eq!(text_of(&turns[0].content()[0]), "First part.\n\nSecond part.");
}

#[test]
fn empty_request_has_no_turns() {
    let (system, turns) = to_converse(&[]).unwrap();
    assert!(system.is_empty());
    assert!(turns.is_empty());
}
