use crate::db::player::PlayerRepository;
use crate::db::wallet::WalletRepository;
use crate::models::NewPlayer;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("invalid registration input: {0}")]
    InvalidInput(&'static str),

    #[error("database error during registration: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub status: &'static str,
    pub player_id: i64,
}

impl Registration {
    fn ok(player_id: i64) -> Self {
        Self { status: "OK", player_id }
    }
}

struct Identity {
    nickname: String,
    email: String,
    ext_user_id: String,
}

fn normalize(nickname: &str, email: &str, ext_user_id: &str) -> Result<Identity, RegistrationError> {
    let identity = Identity {
        nickname: nickname.trim().to_string(),
        email: email.trim().to_lowercase(),
        ext_user_id: ext_user_id.trim().to_string(),
    };

    if identity.nickname.is_empty() {
        return Err(RegistrationError::InvalidInput("nickname is empty"));
    }
    if identity.ext_user_id.is_empty() {
        return Err(RegistrationError::InvalidInput("external user id is empty"));
    }
    if identity.email.is_empty() {
        return Err(RegistrationError::InvalidInput("email is empty"));
    }

    Ok(identity)
}

/// Keeps the domain and the first character of the local part.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

/// Returns the id of the player registered under `ext_user_id` or `email`,
/// creating the player and its VND and USD wallets if neither is known.
/// Safe to repeat, including concurrently for the same identity.
pub async fn register(
    pool: &SqlitePool,
    nickname: &str,
    email: &str,
    ext_user_id: &str,
) -> Result<Registration, RegistrationError> {
    let identity = normalize(nickname, email, ext_user_id)?;

    tracing::info!(
        ext_user_id = %identity.ext_user_id,
        email = %mask_email(&identity.email),
        "Registering player"
    );

    let result = register_identity(pool, &identity).await;
    if let Err(e) = &result {
        tracing::error!(
            ext_user_id = %identity.ext_user_id,
            error = ?e,
            "Player registration failed"
        );
    }
    result
}

async fn register_identity(pool: &SqlitePool, identity: &Identity) -> Result<Registration, RegistrationError> {
    let player_repo = PlayerRepository::new(pool.clone());

    if let Some(player) = player_repo
        .find_by_identity(&identity.ext_user_id, &identity.email)
        .await?
    {
        tracing::debug!(player_id = player.user_id, "Player already registered");
        return Ok(Registration::ok(player.user_id));
    }

    tracing::debug!(ext_user_id = %identity.ext_user_id, "No existing player, creating one");

    // Player and wallets commit together; dropping the transaction on any
    // error path rolls both back.
    let mut tx = pool.begin().await?;
    let new_player = NewPlayer::new(
        identity.ext_user_id.clone(),
        identity.nickname.clone(),
        identity.email.clone(),
    );

    let Some(player_id) = player_repo.insert_if_absent(&mut tx, &new_player).await? else {
        tx.rollback().await?;
        tracing::warn!(
            ext_user_id = %identity.ext_user_id,
            "Concurrent registration won the insert, returning the existing player"
        );
        let player = player_repo
            .find_by_identity(&identity.ext_user_id, &identity.email)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        return Ok(Registration::ok(player.user_id));
    };

    let wallets = WalletRepository.create_defaults(&mut tx, player_id).await?;
    tx.commit().await?;

    let provisioned: Vec<String> = wallets
        .iter()
        .map(|w| format!("{} {} {} (wallet {})", w.wallet_type, w.currency, w.balance, w.id))
        .collect();
    tracing::info!(player_id, wallets = ?provisioned, "Created player with default wallets");
    Ok(Registration::ok(player_id))
}
