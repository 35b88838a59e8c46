//! Recipe graph: bottom-up search from Nutrition nodes to Recipes and Foods.

use neo4rs::query;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{GraphClient, GraphError};

/// Nutrition nodes under the limits, their recipes, and the foods using them.
///
/// `ingredients` collects food titles per group, so it holds the food title of
/// the row (or nothing when no food references the recipe).
pub const RECIPE_QUERY: &str = "
MATCH (n:Nutrition)
WHERE n.protein_g >= $min_protein
  AND n.Sodium_mg <= $max_sodium
  AND n.energy_kcal <= $max_kcal
MATCH (r:Recipe)-[:CONTAINS]->(n)
OPTIONAL MATCH (f:Food)-[:HAS_INGREDIENT]->(r)
RETURN
    f.title AS food_title,
    r.title AS recipe_title,
    COLLECT(DISTINCT f.title) AS ingredients,
    n.energy_kcal AS kcal,
    n.protein_g AS protein,
    n.Sodium_mg AS sodium
ORDER BY protein DESC
LIMIT 3
";

/// Nutrient thresholds applied to the recipe search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientLimits {
    /// Minimum protein per serving, grams.
    pub min_protein_g: i64,
    /// Maximum sodium per serving, milligrams.
    pub max_sodium_mg: i64,
    /// Maximum energy per serving, kcal.
    pub max_kcal: i64,
}

/// One recommended recipe with its nutrition facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRow {
    pub food_title: Option<String>,
    pub recipe_title: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub kcal: Option<f64>,
    pub protein: Option<f64>,
    pub sodium: Option<f64>,
}

/// Runs the recipe query with the given limits (at most 3 rows, protein first).
pub async fn find_recipes(
    client: &GraphClient,
    limits: NutrientLimits,
) -> Result<Vec<RecipeRow>, GraphError> {
    debug!(
        min_protein = limits.min_protein_g,
        max_sodium = limits.max_sodium_mg,
        max_kcal = limits.max_kcal,
        "find_recipes"
    );

    let q = query(RECIPE_QUERY)
        .param("min_protein", limits.min_protein_g)
        .param("max_sodium", limits.max_sodium_mg)
        .param("max_kcal", limits.max_kcal);

    client.fetch_all(q, "recipe search").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_accepts_nulls_and_integers() {
        let row: RecipeRow = serde_json::from_value(serde_json::json!({
            "food_title": null,
            "recipe_title": "두부 샐러드",
            "ingredients": [],
            "kcal": 320,
            "protein": 24.5,
            "sodium": null
        }))
        .unwrap();

        assert!(row.food_title.is_none());
        assert_eq!(row.kcal, Some(320.0));
        assert_eq!(row.protein, Some(24.5));
        assert!(row.sodium.is_none());
    }

    #[test]
    fn query_binds_all_limits() {
        for p in ["$min_protein", "$max_sodium", "$max_kcal"] {
            assert!(RECIPE_QUERY.contains(p), "missing {p}");
        }
        assert!(RECIPE_QUERY.contains("LIMIT 3"));
    }
}
