// =============================================================================
// Fazenda API - Database Layer
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::Config;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

/// Parcel row from the `fazendas` table (geometry columns excluded).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Fazenda {
    pub id: i32,
    pub cod_tema: Option<String>,
    pub nom_tema: Option<String>,
    pub cod_imovel: Option<String>,
    pub mod_fiscal: Option<f64>,
    pub num_area: Option<f64>,
    pub ind_status: Option<String>,
    pub ind_tipo: Option<String>,
    pub des_condic: Option<String>,
    pub municipio: Option<String>,
    pub cod_estado: Option<String>,
    pub dat_criaca: Option<NaiveDate>,
    pub dat_atuali: Option<NaiveDate>,
}

/// Parcel row together with its geometry.
#[derive(Debug, Clone)]
pub struct FazendaFeature {
    pub fazenda: Fazenda,
    pub geometry: Option<geojson::Geometry>,
}

/// Parcel response (dates rendered as ISO strings).
#[derive(Debug, Clone, Serialize)]
pub struct FazendaResponse {
    pub id: i32,
    pub cod_tema: Option<String>,
    pub nom_tema: Option<String>,
    pub cod_imovel: Option<String>,
    pub mod_fiscal: Option<f64>,
    pub num_area: Option<f64>,
    pub ind_status: Option<String>,
    pub ind_tipo: Option<String>,
    pub des_condic: Option<String>,
    pub municipio: Option<String>,
    pub cod_estado: Option<String>,
    pub dat_criaca: Option<String>,
    pub dat_atuali: Option<String>,
}

impl From<Fazenda> for FazendaResponse {
    fn from(f: Fazenda) -> Self {
        Self {
            id: f.id,
            cod_tema: f.cod_tema,
            nom_tema: f.nom_tema,
            cod_imovel: f.cod_imovel,
            mod_fiscal: f.mod_fiscal,
            num_area: f.num_area,
            ind_status: f.ind_status,
            ind_tipo: f.ind_tipo,
            des_condic: f.des_condic,
            municipio: f.municipio,
            cod_estado: f.cod_estado,
            dat_criaca: f.dat_criaca.map(|d| d.format("%Y-%m-%d").to_string()),
            dat_atuali: f.dat_atuali.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl Database {
    /// Create a new database connection pool.
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .test_before_acquire(true)
            .connect(&config.database_url)
            .await?;

        tracing::info!(
            max_connections = config.db_max_connections,
            "Database pool ready"
        );
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_renders_dates_as_iso_strings() {
        let fazenda = Fazenda {
            id: 1,
            cod_tema: Some("AREA_IMOVEL".into()),
            nom_tema: Some("Area do Imovel".into()),
            cod_imovel: Some("SP-3500105-279714F410E746B0B440EFAD4B0933D4".into()),
            mod_fiscal: Some(0.1912),
            num_area: Some(3.8239),
            ind_status: Some("AT".into()),
            ind_tipo: Some("IRU".into()),
            des_condic: Some("Aguardando analise".into()),
            municipio: Some("Adamantina".into()),
            cod_estado: Some("SP".into()),
            dat_criaca: NaiveDate::from_ymd_opt(2025, 10, 9),
            dat_atuali: None,
        };

        let response = FazendaResponse::from(fazenda);
        assert_eq!(response.dat_criaca.as_deref(), Some("2025-10-09"));
        assert_eq!(response.dat_atuali, None);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["municipio"], "Adamantina");
        assert!(json["dat_atuali"].is_null());
    }
}
