use crate::models::wallet::{DEFAULT_WALLET_CURRENCIES, MAIN_WALLET_TYPE};
use crate::models::Wallet;
use sqlx::{FromRow, Sqlite, Transaction};
#[cfg(test)]
use sqlx::SqlitePool;

/// Row shape as stored; the balance column holds minor units.
#[derive(FromRow)]
struct WalletRow {
    id: i64,
    #[sqlx(rename = "userId")]
    user_id: i64,
    wallet_type: String,
    balance: i64,
    currency: String,
}

impl From<WalletRow> for Wallet {
    fn from(row: WalletRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            wallet_type: row.wallet_type,
            balance: Wallet::balance_from_minor_units(row.balance),
            currency: row.currency,
        }
    }
}

/// Wallets are only written inside a registration transaction, so the
/// repository holds no pool of its own.
pub struct WalletRepository;

impl WalletRepository {
    /// Provisions the MAIN wallets every new player starts with, at a zero balance.
    pub async fn create_defaults(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
    ) -> Result<Vec<Wallet>, sqlx::Error> {
        let mut wallets = Vec::with_capacity(DEFAULT_WALLET_CURRENCIES.len());
        for currency in DEFAULT_WALLET_CURRENCIES {
            let row = sqlx::query_as::<_, WalletRow>(
                "INSERT INTO wallets (userId, wallet_type, balance, currency)
                 VALUES (?, ?, 0, ?)
                 RETURNING id, userId, wallet_type, balance, currency"
            )
            .bind(user_id)
            .bind(MAIN_WALLET_TYPE)
            .bind(currency)
            .fetch_one(&mut **tx)
            .await?;
            wallets.push(Wallet::from(row));
        }
        Ok(wallets)
    }
}

#[cfg(test)]
impl WalletRepository {
    pub async fn list_for_player(pool: &SqlitePool, user_id: i64) -> Result<Vec<Wallet>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WalletRow>(
            "SELECT * FROM wallets WHERE userId = ? ORDER BY id"
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Wallet::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_wallets_require_existing_player() {
        let pool = test_pool().await;
        let mut tx = pool.begin().await.unwrap();
        let result = WalletRepository.create_defaults(&mut tx, 42).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_uncommitted_wallets_are_rolled_back() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO players (email, registered_at) VALUES ('a@example.com', 0)")
            .execute(&pool)
            .await
            .unwrap();
        {
            let mut tx = pool.begin().await.unwrap();
            let wallets = WalletRepository.create_defaults(&mut tx, 1).await.unwrap();
            assert_eq!(wallets.len(), 2);
        }

        assert!(WalletRepository::list_for_player(&pool, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_defaults_returns_committed_wallets() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO players (email, registered_at) VALUES ('a@example.com', 0)")
            .execute(&pool)
            .await
            .unwrap();

        let mut tx = pool.begin().await.unwrap();
        let created = WalletRepository.create_defaults(&mut tx, 1).await.unwrap();
        tx.commit().await.unwrap();

        let stored = WalletRepository::list_for_player(&pool, 1).await.unwrap();
        let created: Vec<(i64, String, String)> = created
            .into_iter()
            .map(|w| (w.id, w.currency, w.balance.to_string()))
            .collect();
        let stored: Vec<(i64, String, String)> = stored
            .into_iter()
            .map(|w| (w.id, w.currency, w.balance.to_string()))
            .collect();
        assert_eq!(created, stored);
        assert_eq!(created[0].1, "VND");
        assert_eq!(created[1].2, "0.00");
    }
}
