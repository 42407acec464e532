//! Drink handlers.
//!
//! Implements the CRUD surface over the drink resource:
//!
//! - `GET /drinks` - public short-form listing
//! - `GET /drinks-detail` - long-form listing (requires `get:drinks-detail`)
//! - `POST /drinks` - create (requires `post:drinks`)
//! - `PATCH /drinks/{id}` - partial update (requires `patch:drinks`)
//! - `DELETE /drinks/{id}` - delete (requires `delete:drinks`)
//!
//! Authorization is enforced by the middleware stages in front of these
//! handlers; the handlers themselves only validate input and talk to the
//! repository.

use crate::errors::ApiError;
use crate::models::{
    CreateDrinkRequest, Drink, DrinkCreatedResponse, DrinkDeletedResponse, DrinkShort,
    DrinksResponse, UpdateDrinkRequest,
};
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Handler for `GET /drinks`.
///
/// Public endpoint returning the short-form projection of every drink.
#[instrument(skip_all, name = "drinks.handlers.list")]
pub async fn list_drinks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DrinksResponse<DrinkShort>>, ApiError> {
    let drinks = state.repo.list().await?;

    Ok(Json(DrinksResponse {
        success: true,
        drinks: drinks.iter().map(Drink::short).collect(),
    }))
}

/// Handler for `GET /drinks-detail`.
///
/// Returns the long-form projection of every drink. Gated on
/// `get:drinks-detail`.
#[instrument(skip_all, name = "drinks.handlers.list_detail")]
pub async fn list_drinks_detail(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DrinksResponse<Drink>>, ApiError> {
    let drinks = state.repo.list().await?;

    Ok(Json(DrinksResponse {
        success: true,
        drinks,
    }))
}

/// Handler for `POST /drinks`.
///
/// Creates a drink. Gated on `post:drinks`.
///
/// # Response
///
/// - 200 OK with the created record, long form
/// - 400 Bad Request if the title or recipe is empty
/// - 409 Conflict if the title is already taken
/// - 422 Unprocessable on storage fault
#[instrument(skip_all, name = "drinks.handlers.create")]
pub async fn create_drink(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateDrinkRequest>,
) -> Result<Json<DrinkCreatedResponse>, ApiError> {
    let title = request.title.trim();
    if title.is_empty() || request.recipe.is_empty() {
        return Err(ApiError::BadRequest(
            "title and recipe are both required".to_string(),
        ));
    }

    // Uniqueness is enforced by the store; a violated constraint surfaces
    // as DuplicateTitle -> 409 without a check-then-insert race.
    let drink = state.repo.insert(title, &request.recipe).await?;

    info!(
        target: "drinks.handlers",
        id = drink.id,
        "Drink created"
    );

    Ok(Json(DrinkCreatedResponse {
        success: true,
        drinks: drink,
    }))
}

/// Handler for `PATCH /drinks/{id}`.
///
/// Partially updates a drink; at least one of title/recipe is required.
/// Gated on `patch:drinks`.
///
/// # Response
///
/// - 200 OK with the updated record, long form, in a one-element array
/// - 400 Bad Request if both fields are absent (blank counts as absent)
/// - 404 Not Found if the id is unknown
/// - 409 Conflict if the new title is already taken
/// - 422 Unprocessable on storage fault
#[instrument(skip_all, name = "drinks.handlers.update", fields(id = %id))]
pub async fn update_drink(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDrinkRequest>,
) -> Result<Json<DrinksResponse<Drink>>, ApiError> {
    let title = request.title();
    let recipe = request.recipe();

    // Checked before the id lookup: a patch with nothing to apply is a bad
    // request no matter whether the drink exists.
    if title.is_none() && recipe.is_none() {
        return Err(ApiError::BadRequest(
            "at least one of title or recipe is required".to_string(),
        ));
    }

    let drink = state.repo.update(id, title, recipe).await?;

    info!(
        target: "drinks.handlers",
        id = drink.id,
        "Drink updated"
    );

    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink],
    }))
}

/// Handler for `DELETE /drinks/{id}`.
///
/// Deletes a drink. Gated on `delete:drinks`.
///
/// # Response
///
/// - 200 OK with the deleted id
/// - 404 Not Found if the id is unknown
/// - 422 Unprocessable on storage fault
#[instrument(skip_all, name = "drinks.handlers.delete", fields(id = %id))]
pub async fn delete_drink(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DrinkDeletedResponse>, ApiError> {
    state.repo.delete(id).await?;

    info!(
        target: "drinks.handlers",
        id = id,
        "Drink deleted"
    );

    Ok(Json(DrinkDeletedResponse {
        success: true,
        delete: id,
    }))
}

