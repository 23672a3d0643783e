use crate::models::{NewPlayer, Player};
use sqlx::{Sqlite, SqlitePool, Transaction};

pub struct PlayerRepository {
    pool: SqlitePool,
}

impl PlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Finds the player registered under either key. When the two keys belong
    /// to different players, the external id match wins.
    pub async fn find_by_identity(&self, ext_user_id: &str, email: &str) -> Result<Option<Player>, sqlx::Error> {
        sqlx::query_as::<_, Player>(
            "SELECT * FROM players
             WHERE ext_user_id = ? OR email = ?
             ORDER BY CASE WHEN ext_user_id = ? THEN 0 ELSE 1 END, userId
             LIMIT 1"
        )
        .bind(ext_user_id)
        .bind(email)
        .bind(ext_user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Inserts the player unless the email or external id is already taken.
    /// Returns the generated id, or `None` when a unique key conflicted.
    pub async fn insert_if_absent(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        player: &NewPlayer,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO players (ext_user_id, first_name, email, registered_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT DO NOTHING
             RETURNING userId"
        )
        .bind(&player.ext_user_id)
        .bind(&player.first_name)
        .bind(&player.email)
        .bind(player.registered_at)
        .fetch_optional(&mut **tx)
        .await
    }
}

#[cfg(test)]
impl PlayerRepository {
    pub async fn get_by_id(&self, user_id: i64) -> Result<Option<Player>, sqlx::Error> {
        sqlx::query_as::<_, Player>("SELECT * FROM players WHERE userId = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM players")
            .fetch_one(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn insert(repo: &PlayerRepository, pool: &SqlitePool, ext: &str, email: &str) -> Option<i64> {
        let mut tx = pool.begin().await.unwrap();
        let player = NewPlayer::new(ext.to_string(), "nick".to_string(), email.to_string());
        let id = repo.insert_if_absent(&mut tx, &player).await.unwrap();
        tx.commit().await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_insert_applies_schema_defaults() {
        let pool = test_pool().await;
        let repo = PlayerRepository::new(pool.clone());

        let id = insert(&repo, &pool, "ext-1", "a@example.com").await.unwrap();
        let player = repo.get_by_id(id).await.unwrap().unwrap();

        assert_eq!(player.first_name.as_deref(), Some("nick"));
        assert_eq!(player.ext_user_id.as_deref(), Some("ext-1"));
        assert_eq!(player.language, "en");
        assert_eq!(player.status, "ACTIVE");
        assert!(player.password_hash.is_none());
        assert!(player.display_name.is_none());
    }

    #[tokio::test]
    async fn test_insert_if_absent_ignores_unique_conflicts() {
        let pool = test_pool().await;
        let repo = PlayerRepository::new(pool.clone());

        assert!(insert(&repo, &pool, "ext-1", "a@example.com").await.is_some());
        assert!(insert(&repo, &pool, "ext-1", "b@example.com").await.is_none());
        assert!(insert(&repo, &pool, "ext-2", "a@example.com").await.is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_identity_prefers_ext_user_id() {
        let pool = test_pool().await;
        let repo = PlayerRepository::new(pool.clone());

        let first = insert(&repo, &pool, "ext-1", "a@example.com").await.unwrap();
        let second = insert(&repo, &pool, "ext-2", "b@example.com").await.unwrap();

        let by_ext = repo.find_by_identity("ext-2", "a@example.com").await.unwrap().unwrap();
        assert_eq!(by_ext.user_id, second);

        let by_email = repo.find_by_identity("ext-9", "a@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.user_id, first);

        assert!(repo.find_by_identity("ext-9", "z@example.com").await.unwrap().is_none());
    }
}
