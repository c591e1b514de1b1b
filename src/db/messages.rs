//! Message repository for the queued message store.
//!
//! One table, four operations. Retrieval order for a user is
//! `(updated_at ASC, id ASC)`: rows inserted in the same transaction share a
//! timestamp, so the identity column keeps them in insertion order.

use crate::db::DbError;
use sqlx::SqlitePool;

/// A stored chat message.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: i64,
    pub user_id: String,
    pub message: String,
    pub queued: bool,
    /// Epoch milliseconds; set at insert, re-stamped by unqueue.
    pub updated_at: i64,
}

/// Repository for message operations.
pub struct MessageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a batch of messages for one user, all sharing the same
    /// `queued` flag and timestamp.
    ///
    /// The batch is one transaction: either every row commits or none does.
    /// Returns the inserted texts.
    pub async fn enqueue(
        &self,
        user_id: &str,
        queued: bool,
        msgs: &[String],
    ) -> Result<Vec<String>, DbError> {
        let now = chrono::Utc::now().timestamp_millis();

        let mut tx = self.pool.begin().await?;

        for text in msgs {
            sqlx::query(
                r#"
                INSERT INTO messages (user_id, message, queued, updated_at)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(text)
            .bind(queued)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Failed to insert message");
                e
            })?;
        }

        tx.commit().await?;

        Ok(msgs.to_vec())
    }

    /// All messages for a user, ordered by `(updated_at, id)`.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<MessageRecord>, DbError> {
        let rows = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, user_id, message, queued, updated_at
            FROM messages
            WHERE user_id = ?
            ORDER BY updated_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Messages for a user still marked queued. Result order is unspecified.
    pub async fn list_queued(&self, user_id: &str) -> Result<Vec<MessageRecord>, DbError> {
        let rows = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, user_id, message, queued, updated_at
            FROM messages
            WHERE user_id = ? AND queued = 1
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Mark every message of a user delivered, re-stamping `updated_at`.
    ///
    /// The update is not filtered on the current `queued` value: rows that
    /// were already delivered get their timestamp touched again. Returns
    /// the texts of all affected rows in retrieval order.
    pub async fn unqueue(&self, user_id: &str) -> Result<Vec<String>, DbError> {
        let mut tx = self.pool.begin().await?;

        let texts: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT message
            FROM messages
            WHERE user_id = ?
            ORDER BY updated_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let now = chrono::Utc::now().timestamp_millis();

        sqlx::query(
            r#"
            UPDATE messages
            SET queued = 0, updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(now)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Failed to unqueue messages");
            e
        })?;

        tx.commit().await?;

        Ok(texts)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    async fn test_db() -> Database {
        let db = Database::new(":memory:").await.expect("open memory db");
        db.migrate().await.expect("apply migrations");
        db
    }

    fn texts(records: &[super::MessageRecord]) -> Vec<String> {
        records.iter().map(|r| r.message.clone()).collect()
    }

    #[tokio::test]
    async fn enqueue_then_list_preserves_insertion_order() {
        let db = test_db().await;
        let msgs: Vec<String> = (0..5).map(|i| format!("msg-{}", i)).collect();

        let inserted = db.messages().enqueue("alice", true, &msgs).await.unwrap();
        assert_eq!(inserted, msgs);

        let listed = db.messages().list_for_user("alice").await.unwrap();
        assert_eq!(texts(&listed), msgs);

        // Same batch, same timestamp: the identity column is the tiebreak.
        assert!(listed.windows(2).all(|w| w[0].id < w[1].id));
        assert!(
            listed
                .windows(2)
                .all(|w| w[0].updated_at == w[1].updated_at)
        );
    }

    #[tokio::test]
    async fn queued_flag_filters_listing() {
        let db = test_db().await;
        let repo = db.messages();

        repo.enqueue("bob", true, &["a".into(), "b".into()])
            .await
            .unwrap();
        repo.enqueue("bob", false, &["c".into()]).await.unwrap();

        let mut queued = texts(&repo.list_queued("bob").await.unwrap());
        queued.sort();
        assert_eq!(queued, vec!["a".to_string(), "b".to_string()]);

        assert_eq!(repo.list_for_user("bob").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unqueue_marks_everything_delivered() {
        let db = test_db().await;
        let repo = db.messages();

        repo.enqueue("u1", false, &["hi".into()]).await.unwrap();
        repo.enqueue("u1", true, &["there".into()]).await.unwrap();

        assert_eq!(
            texts(&repo.list_for_user("u1").await.unwrap()),
            vec!["hi".to_string(), "there".to_string()]
        );
        assert_eq!(
            texts(&repo.list_queued("u1").await.unwrap()),
            vec!["there".to_string()]
        );

        // Unqueue touches every row for the user, delivered or not.
        let touched = repo.unqueue("u1").await.unwrap();
        assert_eq!(touched, vec!["hi".to_string(), "there".to_string()]);

        assert!(repo.list_queued("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unqueue_restamps_already_delivered_rows() {
        let db = test_db().await;
        let repo = db.messages();

        repo.enqueue("carol", false, &["old".into()]).await.unwrap();

        // Backdate the row so the re-stamp is observable.
        sqlx::query("UPDATE messages SET updated_at = 1000 WHERE user_id = ?")
            .bind("carol")
            .execute(db.pool())
            .await
            .unwrap();

        let touched = repo.unqueue("carol").await.unwrap();
        assert_eq!(touched, vec!["old".to_string()]);

        let rows = repo.list_for_user("carol").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].queued);
        assert!(rows[0].updated_at > 1000);
    }

    #[tokio::test]
    async fn unknown_user_yields_empty_lists() {
        let db = test_db().await;
        let repo = db.messages();

        assert!(repo.list_for_user("nobody").await.unwrap().is_empty());
        assert!(repo.list_queued("nobody").await.unwrap().is_empty());
        assert!(repo.unqueue("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn users_do_not_interleave() {
        let db = test_db().await;

        let a: Vec<String> = (0..10).map(|i| format!("a-{}", i)).collect();
        let b: Vec<String> = (0..10).map(|i| format!("b-{}", i)).collect();

        let repo_a = db.messages();
        let repo_b = db.messages();
        let (ra, rb) = tokio::join!(
            repo_a.enqueue("ua", true, &a),
            repo_b.enqueue("ub", true, &b),
        );
        ra.unwrap();
        rb.unwrap();

        assert_eq!(texts(&db.messages().list_for_user("ua").await.unwrap()), a);
        assert_eq!(texts(&db.messages().list_for_user("ub").await.unwrap()), b);
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let db = test_db().await;
        let repo = db.messages();

        let inserted = repo.enqueue("dave", true, &[]).await.unwrap();
        assert!(inserted.is_empty());
        assert!(repo.list_for_user("dave").await.unwrap().is_empty());
    }
}
