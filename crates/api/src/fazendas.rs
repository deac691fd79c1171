// =============================================================================
// Fazenda API - Fazendas Endpoints
// =============================================================================
// Lookup by id / registry code and the paginated spatial searches.
// =============================================================================

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use geojson::{feature::Id, Feature};

use crate::db::FazendaResponse;
use crate::error::ApiError;
use crate::geo::{PointSearchRequest, RadiusSearchRequest};
use crate::pagination::{PageParams, Paginated};
use crate::AppState;

// =============================================================================
// Helpers
// =============================================================================

fn validate_id(id: i32) -> Result<i32, ApiError> {
    if id < 1 {
        return Err(ApiError::Validation("id deve ser maior que zero".into()));
    }
    Ok(id)
}

fn not_found_by_id(id: i32) -> ApiError {
    ApiError::NotFound(format!("Fazenda com ID {id} não encontrada"))
}

// =============================================================================
// Handlers
// =============================================================================

/// Get a single parcel by ID.
pub async fn get_fazenda(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<FazendaResponse>, ApiError> {
    let Path(id) = id?;
    let id = validate_id(id)?;

    let fazenda = state
        .repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found_by_id(id))?;

    Ok(Json(fazenda.into()))
}

/// Get a single parcel as a GeoJSON Feature.
pub async fn get_fazenda_feature(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Feature>, ApiError> {
    let Path(id) = id?;
    let id = validate_id(id)?;

    let feature = state
        .repo
        .find_feature_by_id(id)
        .await?
        .ok_or_else(|| not_found_by_id(id))?;

    let response = FazendaResponse::from(feature.fazenda);
    let properties = match serde_json::to_value(&response) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(_) => return Err(ApiError::Internal("properties are not an object".into())),
        Err(e) => return Err(ApiError::Internal(e.to_string())),
    };

    Ok(Json(Feature {
        bbox: None,
        geometry: feature.geometry,
        id: Some(Id::Number(id.into())),
        properties: Some(properties),
        foreign_members: None,
    }))
}

/// Get every parcel registered under a `cod_imovel`.
pub async fn get_by_cod_imovel(
    State(state): State<AppState>,
    cod_imovel: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<FazendaResponse>>, ApiError> {
    let Path(cod_imovel) = cod_imovel?;
    let cod_imovel = cod_imovel.trim();
    if cod_imovel.is_empty() {
        return Err(ApiError::Validation("cod_imovel não pode ser vazio".into()));
    }

    let fazendas = state.repo.find_by_cod_imovel(cod_imovel).await?;
    if fazendas.is_empty() {
        return Err(ApiError::NotFound(format!(
            "Fazenda com código {cod_imovel} não encontrada"
        )));
    }

    Ok(Json(fazendas.into_iter().map(Into::into).collect()))
}

/// Search parcels containing a point.
pub async fn search_by_point(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
    body: Result<Json<PointSearchRequest>, JsonRejection>,
) -> Result<Json<Paginated<FazendaResponse>>, ApiError> {
    let Query(params) = params?;
    let params = params.validate()?;
    let Json(req) = body?;
    let point = req.validate()?;

    let page = state.repo.find_by_point(point, params).await?;
    let items = page.items.into_iter().map(Into::into).collect();

    Ok(Json(Paginated::new(items, page.total, params)))
}

/// Search parcels within a radius (km) of a point.
pub async fn search_by_radius(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
    body: Result<Json<RadiusSearchRequest>, JsonRejection>,
) -> Result<Json<Paginated<FazendaResponse>>, ApiError> {
    let Query(params) = params?;
    let params = params.validate()?;
    let Json(req) = body?;
    let (point, radius) = req.validate()?;

    let page = state.repo.find_by_radius(point, radius, params).await?;
    let items = page.items.into_iter().map(Into::into).collect();

    Ok(Json(Paginated::new(items, page.total, params)))
}
