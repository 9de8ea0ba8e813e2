use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sqlx::postgres::PgPool;

use crate::db;
use crate::error::{ApiError, MessageResponse};
use crate::extract::Payload;
use crate::models::{GoldUpdate, InventoryPush, NewPlayer, Player, PlayerUpdate};

// GET /api/v1/player - List all players
pub async fn get_players(State(pool): State<PgPool>) -> Result<Json<Vec<Player>>, ApiError> {
    let players = db::get_all_players(&pool).await?;

    Ok(Json(players))
}

// GET /api/v1/player/:id - Get player by ID
pub async fn get_player_by_id(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let id = parse_id(&id)?;

    let player = db::get_player_by_id(&pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(player))
}

// POST /api/v1/player - Create a player
pub async fn create_player(
    State(pool): State<PgPool>,
    Payload(new_player): Payload<NewPlayer>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let player = db::create_player(&pool, &new_player).await?;

    tracing::debug!(id = player.id, "created player");

    Ok((StatusCode::CREATED, Json(player)))
}

// PUT /api/v1/player/:id - Update the fields present in the body
pub async fn update_player(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Payload(update): Payload<PlayerUpdate>,
) -> Result<Json<Player>, ApiError> {
    let id = parse_id(&id)?;

    let query = db::build_player_update(id, &update).ok_or(ApiError::NoFieldsProvided)?;

    let player = db::update_player(&pool, query)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(player))
}

// DELETE /api/v1/player/:id - Delete a player
pub async fn delete_player(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;

    db::delete_player(&pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(MessageResponse::new("Player deleted successfully")))
}

// PATCH /api/v1/player/:id/gold - Overwrite gold
pub async fn update_gold(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Payload(body): Payload<GoldUpdate>,
) -> Result<Json<Player>, ApiError> {
    let id = parse_id(&id)?;

    let player = db::update_gold(&pool, id, body.gold)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(player))
}

// PATCH /api/v1/player/:id/inventory - Append one item to the inventory
pub async fn add_item_to_inventory(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Payload(body): Payload<InventoryPush>,
) -> Result<Json<Player>, ApiError> {
    let id = parse_id(&id)?;

    let player = db::push_inventory_item(&pool, id, body.item_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(player))
}

/// Reads a path id the way a lenient base-10 integer parse does: leading
/// whitespace and a sign are accepted, trailing garbage is ignored.
///
/// An id with no leading digits, or one that does not fit in the `id`
/// column, cannot match any row.
fn parse_id(raw: &str) -> Result<i32, ApiError> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return Err(ApiError::NotFound);
    }

    format!("{sign}{}", &rest[..digits_end])
        .parse()
        .map_err(|_| ApiError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> Option<i32> {
        parse_id(raw).ok()
    }

    #[test]
    fn plain_ids() {
        assert_eq!(id("3"), Some(3));
        assert_eq!(id("0"), Some(0));
        assert_eq!(id("007"), Some(7));
    }

    #[test]
    fn sign_and_whitespace() {
        assert_eq!(id("-4"), Some(-4));
        assert_eq!(id("+4"), Some(4));
        assert_eq!(id("  12"), Some(12));
    }

    #[test]
    fn trailing_garbage_is_ignored() {
        assert_eq!(id("12abc"), Some(12));
        assert_eq!(id("5.9"), Some(5));
    }

    #[test]
    fn non_numeric_is_not_found() {
        assert!(matches!(parse_id("abc"), Err(ApiError::NotFound)));
        assert!(matches!(parse_id(""), Err(ApiError::NotFound)));
        assert!(matches!(parse_id("-"), Err(ApiError::NotFound)));
    }

    #[test]
    fn out_of_range_is_not_found() {
        assert_eq!(id("2147483647"), Some(i32::MAX));
        assert_eq!(id("2147483648"), None);
    }
}
