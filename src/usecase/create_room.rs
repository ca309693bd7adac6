//! UseCase: create a room and join it.
//!
//! Creation and joining are one atomic operation, not two independently
//! failable steps: either the room exists with the creator as its first
//! member, or nothing changed at all.

use std::sync::Arc;

use crate::{
    common::time::now_millis,
    domain::{
        ConnectionId, PasswordHash, ProtocolError, RoomName, RoomSnapshot, SessionRepository,
        Timestamp, Username,
    },
};

/// Room creation use case
pub struct CreateRoomUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl CreateRoomUseCase {
    /// Create a new CreateRoomUseCase
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Create the room and join it.
    ///
    /// The password, if any, is digested here; the plaintext never reaches
    /// the registries. An empty password string counts as no password.
    ///
    /// # Errors
    ///
    /// `ProtocolError::RoomAlreadyExists` when the name is taken.
    pub async fn execute(
        &self,
        id: &ConnectionId,
        room: RoomName,
        password: Option<String>,
        username: Username,
    ) -> Result<RoomSnapshot, ProtocolError> {
        let password_hash = password
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(PasswordHash::digest);

        self.repository
            .create_and_join(id, room, password_hash, username, Timestamp::new(now_millis()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::time::now_millis,
        domain::User,
        infrastructure::repository::InMemorySessionRepository,
    };

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn name(n: &str) -> Username {
        Username::new(n.to_string()).unwrap()
    }

    fn room(n: &str) -> RoomName {
        RoomName::new(n.to_string()).unwrap()
    }

    async fn repository_with(ids: &[&str]) -> Arc<InMemorySessionRepository> {
        let repository = Arc::new(InMemorySessionRepository::new());
        for id in ids {
            repository
                .register(User::new(
                    conn(id),
                    name(&format!("Guest_{id}")),
                    Timestamp::new(now_millis()),
                ))
                .await
                .unwrap();
        }
        repository
    }

    #[tokio::test]
    async fn test_create_room_joins_creator() {
        // given:
        let repository = repository_with(&["c1"]).await;
        let usecase = CreateRoomUseCase::new(repository.clone());

        // when:
        let snapshot = usecase
            .execute(&conn("c1"), room("lobby"), None, name("alice"))
            .await
            .unwrap();

        // then: creator renamed and inside the room, in the same step
        assert_eq!(snapshot.members.len(), 1);
        assert_eq!(snapshot.members[0].username, name("alice"));
        let user = repository.lookup_user(&conn("c1")).await.unwrap();
        assert_eq!(user.room, Some(room("lobby")));
    }

    #[tokio::test]
    async fn test_create_room_duplicate_name_fails() {
        // given:
        let repository = repository_with(&["c1", "c2"]).await;
        let usecase = CreateRoomUseCase::new(repository.clone());
        usecase
            .execute(&conn("c1"), room("lobby"), None, name("alice"))
            .await
            .unwrap();

        // when:
        let result = usecase
            .execute(&conn("c2"), room("lobby"), None, name("bob"))
            .await;

        // then:
        assert_eq!(result.unwrap_err(), ProtocolError::RoomAlreadyExists);
    }

    #[tokio::test]
    async fn test_create_room_stores_digest_not_plaintext() {
        // given:
        let repository = repository_with(&["c1", "c2"]).await;
        let usecase = CreateRoomUseCase::new(repository.clone());

        // when:
        let snapshot = usecase
            .execute(&conn("c1"), room("lobby"), Some("x123".to_string()), name("alice"))
            .await
            .unwrap();

        // then: the room is protected and the digest verifies
        assert!(snapshot.protected);
        let joined = repository
            .join(
                &conn("c2"),
                room("lobby"),
                Some("x123".to_string()),
                name("bob"),
                Timestamp::new(now_millis()),
            )
            .await;
        assert!(joined.is_ok());
    }

    #[tokio::test]
    async fn test_create_room_empty_password_means_open() {
        // given:
        let repository = repository_with(&["c1", "c2"]).await;
        let usecase = CreateRoomUseCase::new(repository.clone());

        // when: created with an empty password string
        let snapshot = usecase
            .execute(&conn("c1"), room("lobby"), Some(String::new()), name("alice"))
            .await
            .unwrap();

        // then: the room is open, anyone can join without a password
        assert!(!snapshot.protected);
        let joined = repository
            .join(
                &conn("c2"),
                room("lobby"),
                None,
                name("bob"),
                Timestamp::new(now_millis()),
            )
            .await;
        assert!(joined.is_ok());
    }
}
