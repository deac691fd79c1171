//! # Table layout
//!
//! DDL for the `fazendas` table and the post-load steps: filling the
//! geography column, building the spatial indexes and refreshing planner
//! statistics.

use sqlx::PgPool;

pub const TABLE: &str = "fazendas";

/// Attribute columns in insertion order (geometry excluded).
pub const ATTRIBUTE_COLUMNS: [&str; 12] = [
    "cod_tema",
    "nom_tema",
    "cod_imovel",
    "mod_fiscal",
    "num_area",
    "ind_status",
    "ind_tipo",
    "des_condic",
    "municipio",
    "cod_estado",
    "dat_criaca",
    "dat_atuali",
];

const CREATE_EXTENSION: &str = "CREATE EXTENSION IF NOT EXISTS postgis";

const DROP_TABLE: &str = "DROP TABLE IF EXISTS fazendas CASCADE";

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS fazendas (
        id SERIAL PRIMARY KEY,
        geom GEOMETRY(GEOMETRY, 4326),
        geog GEOGRAPHY(GEOMETRY, 4326),
        cod_tema TEXT,
        nom_tema TEXT,
        cod_imovel TEXT,
        mod_fiscal FLOAT8,
        num_area FLOAT8,
        ind_status TEXT,
        ind_tipo TEXT,
        des_condic TEXT,
        municipio TEXT,
        cod_estado TEXT,
        dat_criaca DATE,
        dat_atuali DATE
    )
"#;

const POPULATE_GEOGRAPHY: &str =
    "UPDATE fazendas SET geog = geom::geography WHERE geom IS NOT NULL AND geog IS NULL";

/// Index DDL. The expression index on `geog::geometry` serves the `&&`
/// envelope pre-filter of the radius search.
pub const INDEXES: [&str; 4] = [
    "CREATE INDEX IF NOT EXISTS idx_fazendas_geom ON fazendas USING GIST (geom)",
    "CREATE INDEX IF NOT EXISTS idx_fazendas_geog ON fazendas USING GIST (geog)",
    "CREATE INDEX IF NOT EXISTS idx_fazendas_geog_geometry ON fazendas USING GIST ((geog::geometry))",
    "CREATE INDEX IF NOT EXISTS idx_fazendas_cod_imovel ON fazendas (cod_imovel)",
];

const ANALYZE: &str = "ANALYZE fazendas";

/// Drop any previous table and create an empty one.
pub async fn recreate(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_EXTENSION).execute(pool).await?;
    sqlx::query(DROP_TABLE).execute(pool).await?;
    create(pool).await
}

/// Create the table when it does not exist yet.
pub async fn create(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_TABLE).execute(pool).await?;
    tracing::info!(
        "Table '{}' ready with {} attribute columns + id + geom + geog",
        TABLE,
        ATTRIBUTE_COLUMNS.len()
    );
    Ok(())
}

/// Fill `geog`, build indexes and refresh statistics.
pub async fn finalize(pool: &PgPool) -> Result<(), sqlx::Error> {
    let filled = sqlx::query(POPULATE_GEOGRAPHY).execute(pool).await?;
    tracing::info!("Populated geography for {} rows", filled.rows_affected());

    for ddl in INDEXES {
        tracing::info!("{}", ddl);
        sqlx::query(ddl).execute(pool).await?;
    }

    sqlx::query(ANALYZE).execute(pool).await?;
    Ok(())
}
