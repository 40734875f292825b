use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use log::debug;
use serde::Serialize;

use super::AppState;
use crate::error::QueryError;

#[derive(Debug, Serialize)]
pub struct PathogenList {
    pub pathogens: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    /// Rows loaded per category.
    pub categories: BTreeMap<&'static str, usize>,
}

/// GET /get_pathogens/:category
pub async fn get_pathogens(
    State(catalog): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<PathogenList>, QueryError> {
    let pathogens = catalog.list_pathogens(&category)?;
    debug!("{category}: {} pathogens", pathogens.len());
    Ok(Json(PathogenList { pathogens }))
}

/// GET /get_details/:category/:pathogen
pub async fn get_details(
    State(catalog): State<AppState>,
    Path((category, pathogen)): Path<(String, String)>,
) -> Result<Json<BTreeMap<String, String>>, QueryError> {
    catalog.get_details(&category, &pathogen).map(Json)
}

/// GET /health
pub async fn health(State(catalog): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        categories: catalog.summary(),
    })
}
