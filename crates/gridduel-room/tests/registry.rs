//! Registry lifecycle: create on first join, destroy on empty.

use gridduel_protocol::{CharacterType, PlayerId, RoomId, ServerMessage};
use gridduel_room::{Intent, PlayerSender, RoomConfig, RoomError, RoomRegistry};
use tokio::sync::mpsc;

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

fn room(id: &str) -> RoomId {
    RoomId::new(id)
}

/// A sender whose receiver is dropped straight away.
fn dummy_sender() -> PlayerSender {
    let (tx, _rx) = mpsc::unbounded_channel::<ServerMessage>();
    tx
}

fn registry() -> RoomRegistry {
    RoomRegistry::new(RoomConfig {
        seed: Some(7),
        ..RoomConfig::default()
    })
}

#[tokio::test(start_paused = true)]
async fn test_first_join_creates_room() {
    let mut registry = registry();
    assert_eq!(registry.room_count(), 0);

    registry
        .join(pid(1), room("a"), "ann", CharacterType::Knight, dummy_sender())
        .await
        .unwrap();

    assert_eq!(registry.room_count(), 1);
    assert_eq!(registry.player_room(&pid(1)), Some(&room("a")));
}

#[tokio::test(start_paused = true)]
async fn test_same_room_id_is_shared() {
    let mut registry = registry();
    registry
        .join(pid(1), room("a"), "ann", CharacterType::Knight, dummy_sender())
        .await
        .unwrap();
    registry
        .join(pid(2), room("a"), "bob", CharacterType::Archer, dummy_sender())
        .await
        .unwrap();

    assert_eq!(registry.room_count(), 1);
    let info = registry.room_info(&room("a")).await.unwrap();
    assert_eq!(info.players, vec!["ann".to_string(), "bob".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_player_can_only_be_in_one_room() {
    let mut registry = registry();
    registry
        .join(pid(1), room("a"), "ann", CharacterType::Knight, dummy_sender())
        .await
        .unwrap();

    let err = registry
        .join(pid(1), room("b"), "ann", CharacterType::Knight, dummy_sender())
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::AlreadyInRoom(p, r) if p == pid(1) && r == room("a")));
    assert_eq!(registry.room_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_join_does_not_leave_empty_room() {
    let mut registry = registry();
    let err = registry
        .join(pid(1), room("a"), "much-too-long", CharacterType::Rogue, dummy_sender())
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::NameTooLong { .. }));
    assert_eq!(registry.room_count(), 0);
    assert!(registry.player_room(&pid(1)).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_last_leave_destroys_room() {
    let mut registry = registry();
    registry
        .join(pid(1), room("a"), "ann", CharacterType::Knight, dummy_sender())
        .await
        .unwrap();
    registry
        .join(pid(2), room("a"), "bob", CharacterType::Archer, dummy_sender())
        .await
        .unwrap();

    registry.leave(pid(1)).await.unwrap();
    assert_eq!(registry.room_count(), 1);
    assert!(registry.player_room(&pid(1)).is_none());

    registry.leave(pid(2)).await.unwrap();
    assert_eq!(registry.room_count(), 0);
    assert!(matches!(
        registry.room_info(&room("a")).await,
        Err(RoomError::NotFound(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_leave_without_room_is_error() {
    let mut registry = registry();
    let err = registry.leave(pid(9)).await.unwrap_err();
    assert!(matches!(err, RoomError::NotInAnyRoom(p) if p == pid(9)));
}

#[tokio::test(start_paused = true)]
async fn test_route_without_room_is_error() {
    let registry = registry();
    let err = registry.route(pid(9), Intent::RerollCards).await.unwrap_err();
    assert!(matches!(err, RoomError::NotInAnyRoom(_)));
}

#[tokio::test(start_paused = true)]
async fn test_status_lists_rooms_and_members() {
    let mut registry = registry();
    registry
        .join(pid(1), room("zeta"), "ann", CharacterType::Knight, dummy_sender())
        .await
        .unwrap();
    registry
        .join(pid(2), room("alpha"), "bob", CharacterType::Archer, dummy_sender())
        .await
        .unwrap();
    registry
        .join(pid(3), room("alpha"), "cy", CharacterType::Rogue, dummy_sender())
        .await
        .unwrap();

    let status = registry.status().await;
    assert_eq!(status.len(), 2);
    assert_eq!(status[0].room_id, room("alpha"));
    assert_eq!(status[0].players, vec!["bob".to_string(), "cy".to_string()]);
    assert_eq!(status[1].room_id, room("zeta"));
    assert_eq!(status[1].players, vec!["ann".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_room_can_be_reused_after_destroy() {
    let mut registry = registry();
    registry
        .join(pid(1), room("a"), "ann", CharacterType::Knight, dummy_sender())
        .await
        .unwrap();
    registry.leave(pid(1)).await.unwrap();

    registry
        .join(pid(2), room("a"), "ann", CharacterType::Archer, dummy_sender())
        .await
        .unwrap();
    assert_eq!(registry.room_count(), 1);
    let info = registry.room_info(&room("a")).await.unwrap();
    assert_eq!(info.players, vec!["ann".to_string()]);
}
