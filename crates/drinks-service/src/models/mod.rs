//! Drinks service models.
//!
//! Contains the drink record, its two projections (short for listings, long
//! for detail/edit views), and the request/response bodies of the HTTP
//! surface.

use serde::{Deserialize, Serialize};

/// One ingredient of a drink recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name (long form only).
    pub name: String,

    /// Display color for the ingredient layer.
    pub color: String,

    /// Relative parts of this ingredient in the recipe.
    pub parts: i64,
}

/// Short-form ingredient: the long form without the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientPart {
    /// Display color for the ingredient layer.
    pub color: String,

    /// Relative parts of this ingredient in the recipe.
    pub parts: i64,
}

/// A drink record.
///
/// This is also the long-form projection returned by detail and mutation
/// endpoints. The recipe is stored serialized as JSON text; `title` is
/// unique across all drinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    /// Unique drink identifier.
    pub id: i64,

    /// Drink title, unique across all drinks.
    pub title: String,

    /// Recipe as an ordered list of ingredients.
    pub recipe: Vec<Ingredient>,
}

/// Short-form projection of a drink, used by the public listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkShort {
    /// Unique drink identifier.
    pub id: i64,

    /// Drink title.
    pub title: String,

    /// Recipe with ingredient names stripped.
    pub recipe: Vec<IngredientPart>,
}

impl Drink {
    /// Short-form projection: ingredient names are stripped.
    #[must_use]
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|ingredient| IngredientPart {
                    color: ingredient.color.clone(),
                    parts: ingredient.parts,
                })
                .collect(),
        }
    }
}

// ============================================================================
// Request bodies
// ============================================================================

/// Request body for `POST /drinks`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDrinkRequest {
    /// Title of the new drink.
    pub title: String,

    /// Recipe of the new drink.
    pub recipe: Vec<Ingredient>,
}

/// Request body for `PATCH /drinks/{id}`.
///
/// Both fields are optional, but at least one must carry a usable value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDrinkRequest {
    /// New title, if changing.
    #[serde(default)]
    pub title: Option<String>,

    /// New recipe, if changing.
    #[serde(default)]
    pub recipe: Option<Vec<Ingredient>>,
}

impl UpdateDrinkRequest {
    /// Normalized title: trimmed, blank treated as absent.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Normalized recipe: an empty list is treated as absent.
    #[must_use]
    pub fn recipe(&self) -> Option<&[Ingredient]> {
        self.recipe.as_deref().filter(|r| !r.is_empty())
    }
}

// ============================================================================
// Response bodies
// ============================================================================

/// Response for the drink listing endpoints.
///
/// `GET /drinks` carries short-form entries, `GET /drinks-detail` and
/// `PATCH /drinks/{id}` carry long-form ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinksResponse<T> {
    /// Always true on the success path.
    pub success: bool,

    /// Drink projections.
    pub drinks: Vec<T>,
}

/// Response for `POST /drinks`: the created record, long form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkCreatedResponse {
    /// Always true on the success path.
    pub success: bool,

    /// The created drink, long form.
    pub drinks: Drink,
}

/// Response for `DELETE /drinks/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkDeletedResponse {
    /// Always true on the success path.
    pub success: bool,

    /// Identifier of the deleted drink.
    pub delete: i64,
}

/// Health check response, returned by `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status ("healthy" or "unhealthy").
    pub status: String,

    /// Storage connectivity status.
    pub database: String,
}
