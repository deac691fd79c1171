// =============================================================================
// Fazenda API - Parcel Repository
// =============================================================================
// Table of Contents:
// 1. Repository trait
// 2. SQL fragments
// 3. PostGIS implementation
// =============================================================================
//
// Every spatial predicate runs inside PostGIS. The radius search pairs an
// index-served `&&` envelope test with the exact `ST_DWithin` check on the
// geography column.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::{Database, Fazenda, FazendaFeature};
use crate::geo::{GeoPoint, SearchRadius};
use crate::pagination::{Page, PageParams};

// -----------------------------------------------------------------------------
// 1. Repository trait
// -----------------------------------------------------------------------------

/// Read access to the `fazendas` table.
#[async_trait]
pub trait FazendaRepository: Send + Sync {
    /// Find a parcel by primary key.
    async fn find_by_id(&self, id: i32) -> Result<Option<Fazenda>, sqlx::Error>;

    /// Every row registered under `cod_imovel`, ordered by id.
    async fn find_by_cod_imovel(&self, cod_imovel: &str) -> Result<Vec<Fazenda>, sqlx::Error>;

    /// Find a parcel and its geometry as GeoJSON.
    async fn find_feature_by_id(&self, id: i32) -> Result<Option<FazendaFeature>, sqlx::Error>;

    /// Parcels whose polygon contains `point`.
    async fn find_by_point(
        &self,
        point: GeoPoint,
        page: PageParams,
    ) -> Result<Page<Fazenda>, sqlx::Error>;

    /// Parcels within `radius` of `point`.
    async fn find_by_radius(
        &self,
        point: GeoPoint,
        radius: SearchRadius,
        page: PageParams,
    ) -> Result<Page<Fazenda>, sqlx::Error>;

    /// Round-trip to the database.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

// -----------------------------------------------------------------------------
// 2. SQL fragments
// -----------------------------------------------------------------------------

const COLUMNS: &str = "id, cod_tema, nom_tema, cod_imovel, mod_fiscal, num_area, \
     ind_status, ind_tipo, des_condic, municipio, cod_estado, dat_criaca, dat_atuali";

/// Binds: $1 = longitude, $2 = latitude.
const POINT_FILTER: &str = "ST_Contains(geom, ST_SetSRID(ST_MakePoint($1, $2), 4326))";

/// Binds: $1 = longitude, $2 = latitude, $3 = radius in metres.
const RADIUS_FILTER: &str = "geog::geometry && ST_Envelope(\
     ST_Buffer(ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography, $3)::geometry) \
     AND ST_DWithin(geog, ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography, $3)";

fn page_sql(filter: &str, limit_param: usize) -> String {
    format!(
        "SELECT {COLUMNS} FROM fazendas WHERE {filter} ORDER BY id LIMIT ${limit_param} OFFSET ${}",
        limit_param + 1
    )
}

fn count_sql(filter: &str) -> String {
    format!("SELECT COUNT(*) FROM fazendas WHERE {filter}")
}

#[derive(sqlx::FromRow)]
struct FeatureRow {
    #[sqlx(flatten)]
    fazenda: Fazenda,
    geometry: Option<String>,
}

// -----------------------------------------------------------------------------
// 3. PostGIS implementation
// -----------------------------------------------------------------------------

/// Repository backed by a PostGIS database.
#[derive(Clone)]
pub struct PgFazendaRepository {
    pool: PgPool,
}

impl PgFazendaRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl FazendaRepository for PgFazendaRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Fazenda>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM fazendas WHERE id = $1");
        sqlx::query_as::<_, Fazenda>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_cod_imovel(&self, cod_imovel: &str) -> Result<Vec<Fazenda>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM fazendas WHERE cod_imovel = $1 ORDER BY id");
        sqlx::query_as::<_, Fazenda>(&sql)
            .bind(cod_imovel)
            .fetch_all(&self.pool)
            .await
    }

    async fn find_feature_by_id(&self, id: i32) -> Result<Option<FazendaFeature>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS}, ST_AsGeoJSON(geom) AS geometry FROM fazendas WHERE id = $1"
        );
        let row = sqlx::query_as::<_, FeatureRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let geometry = row
            .geometry
            .as_deref()
            .map(serde_json::from_str::<geojson::Geometry>)
            .transpose()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Some(FazendaFeature {
            fazenda: row.fazenda,
            geometry,
        }))
    }

    async fn find_by_point(
        &self,
        point: GeoPoint,
        page: PageParams,
    ) -> Result<Page<Fazenda>, sqlx::Error> {
        let sql = page_sql(POINT_FILTER, 3);
        let items = sqlx::query_as::<_, Fazenda>(&sql)
            .bind(point.longitude())
            .bind(point.latitude())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total = match page.total_from_page(items.len()) {
            Some(total) => total,
            None => {
                let sql = count_sql(POINT_FILTER);
                sqlx::query_scalar::<_, i64>(&sql)
                    .bind(point.longitude())
                    .bind(point.latitude())
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        tracing::debug!(
            lat = point.latitude(),
            lon = point.longitude(),
            total,
            "point search"
        );
        Ok(Page { items, total })
    }

    async fn find_by_radius(
        &self,
        point: GeoPoint,
        radius: SearchRadius,
        page: PageParams,
    ) -> Result<Page<Fazenda>, sqlx::Error> {
        let meters = radius.meters();
        let sql = page_sql(RADIUS_FILTER, 4);
        let items = sqlx::query_as::<_, Fazenda>(&sql)
            .bind(point.longitude())
            .bind(point.latitude())
            .bind(meters)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total = match page.total_from_page(items.len()) {
            Some(total) => total,
            None => {
                let sql = count_sql(RADIUS_FILTER);
                sqlx::query_scalar::<_, i64>(&sql)
                    .bind(point.longitude())
                    .bind(point.latitude())
                    .bind(meters)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        tracing::debug!(
            lat = point.latitude(),
            lon = point.longitude(),
            radius_m = meters,
            total,
            "radius search"
        );
        Ok(Page { items, total })
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_sql_numbers_limit_after_filter_binds() {
        let sql = page_sql(POINT_FILTER, 3);
        assert!(sql.contains("ST_Contains(geom"));
        assert!(sql.ends_with("ORDER BY id LIMIT $3 OFFSET $4"));

        let sql = page_sql(RADIUS_FILTER, 4);
        assert!(sql.ends_with("LIMIT $4 OFFSET $5"));
    }

    #[test]
    fn radius_filter_prefilters_with_bounding_box() {
        let bbox = RADIUS_FILTER.find("&&").unwrap();
        let exact = RADIUS_FILTER.find("ST_DWithin").unwrap();
        assert!(bbox < exact);
        assert!(RADIUS_FILTER.contains("::geography"));
    }

    #[test]
    fn count_sql_reuses_filter() {
        assert_eq!(
            count_sql(POINT_FILTER),
            "SELECT COUNT(*) FROM fazendas WHERE ST_Contains(geom, ST_SetSRID(ST_MakePoint($1, $2), 4326))"
        );
    }
}
