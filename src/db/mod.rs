use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::models::*;

// Pool setup

/// Builds the shared pool. Connections are opened on first use, so this only
/// fails when `DATABASE_URL` itself cannot be parsed.
pub fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = match config.url {
        Some(ref url) => url.parse::<PgConnectOptions>()?,
        None => {
            let mut options = PgConnectOptions::new()
                .host(&config.host)
                .port(config.port);
            if let Some(ref name) = config.name {
                options = options.database(name);
            }
            if let Some(ref user) = config.user {
                options = options.username(user);
            }
            if let Some(ref password) = config.password {
                options = options.password(password);
            }
            options
        }
    };

    Ok(PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(options))
}

/// Checks out one connection and logs the outcome. Never fails.
pub async fn verify_connection(pool: &PgPool) {
    match pool.acquire().await {
        Ok(_) => tracing::info!("Connected to PostgreSQL database"),
        Err(error) => tracing::error!(%error, "Error connecting to the database"),
    }
}

// Player queries

pub async fn get_all_players(pool: &PgPool) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(r#"SELECT * FROM player"#)
        .fetch_all(pool)
        .await
}

pub async fn get_player_by_id(pool: &PgPool, id: i32) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(r#"SELECT * FROM player WHERE id = $1"#)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_player(pool: &PgPool, player: &NewPlayer) -> Result<Player, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"INSERT INTO player (level, brainrotId, inventory, gold)
           VALUES ($1, $2, $3, $4)
           RETURNING *"#,
    )
    .bind(player.level)
    .bind(player.brainrot_id)
    .bind(&player.inventory)
    .bind(player.gold)
    .fetch_one(pool)
    .await
}

/// Builds `UPDATE player SET ... WHERE id = $n RETURNING *` with one
/// assignment per present field, in column order, and the id bound last.
///
/// Returns `None` when the update assigns nothing.
pub fn build_player_update(id: i32, update: &PlayerUpdate) -> Option<QueryBuilder<'static, Postgres>> {
    if update.is_empty() {
        return None;
    }

    let mut query = QueryBuilder::new("UPDATE player SET ");
    let mut assignments = query.separated(", ");

    if let Some(level) = update.level {
        assignments.push("level = ").push_bind_unseparated(level);
    }
    if let Some(brainrot_id) = update.brainrot_id {
        assignments.push("brainrotId = ").push_bind_unseparated(brainrot_id);
    }
    if let Some(ref inventory) = update.inventory {
        assignments.push("inventory = ").push_bind_unseparated(inventory.clone());
    }
    if let Some(gold) = update.gold {
        assignments.push("gold = ").push_bind_unseparated(gold);
    }

    query.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    Some(query)
}

pub async fn update_player(
    pool: &PgPool,
    mut query: QueryBuilder<'static, Postgres>,
) -> Result<Option<Player>, sqlx::Error> {
    query.build_query_as::<Player>().fetch_optional(pool).await
}

/// Deletes a player, returning the removed row if it existed.
pub async fn delete_player(pool: &PgPool, id: i32) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(r#"DELETE FROM player WHERE id = $1 RETURNING *"#)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update_gold(pool: &PgPool, id: i32, gold: Option<i32>) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(r#"UPDATE player SET gold = $1 WHERE id = $2 RETURNING *"#)
        .bind(gold)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Appends one item to a player's inventory.
///
/// The read locks the row for the rest of the transaction, so concurrent
/// appends to the same player queue up instead of overwriting each other.
pub async fn push_inventory_item(pool: &PgPool, id: i32, item_id: i32) -> Result<Option<Player>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let current: Option<Option<Vec<i32>>> =
        sqlx::query_scalar(r#"SELECT inventory FROM player WHERE id = $1 FOR UPDATE"#)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

    // Dropping `tx` rolls back.
    let Some(inventory) = current else {
        return Ok(None);
    };

    let player = sqlx::query_as::<_, Player>(
        r#"UPDATE player SET inventory = $1 WHERE id = $2 RETURNING *"#,
    )
    .bind(append_item(inventory, item_id))
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some(player))
}
