use axum::{
    routing::{get, patch},
    Router,
};
use sqlx::postgres::PgPool;

pub mod health;
pub mod players;

/// Mount point of the player resource.
pub const PLAYER_PREFIX: &str = "/api/v1/player";

pub fn router() -> Router<PgPool> {
    let collection = get(players::get_players).post(players::create_player);

    Router::new()
        .route("/health", get(health::health_check))

        // Player endpoints
        .route(PLAYER_PREFIX, collection.clone())
        .route(&format!("{PLAYER_PREFIX}/"), collection)
        .route(
            &format!("{PLAYER_PREFIX}/{{id}}"),
            get(players::get_player_by_id)
                .put(players::update_player)
                .delete(players::delete_player),
        )
        .route(&format!("{PLAYER_PREFIX}/{{id}}/gold"), patch(players::update_gold))
        .route(&format!("{PLAYER_PREFIX}/{{id}}/inventory"), patch(players::add_item_to_inventory))
}
