//! Batched `INSERT`s into `fazendas`.
//!
//! Each batch runs in one transaction. A batch is split into several
//! statements when its bind parameters would exceed PostgreSQL's limit.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::record::FazendaRecord;
use crate::schema::ATTRIBUTE_COLUMNS;

/// PostgreSQL's cap on bind parameters per statement.
pub const MAX_BIND_PARAMS: usize = 65_535;

/// Geometry plus the attribute columns.
pub const PARAMS_PER_ROW: usize = ATTRIBUTE_COLUMNS.len() + 1;

/// Rows per statement that stay under [`MAX_BIND_PARAMS`].
pub const fn rows_per_statement() -> usize {
    MAX_BIND_PARAMS / PARAMS_PER_ROW
}

/// One parcel ready to insert.
#[derive(Debug, Clone)]
pub struct FazendaRow {
    pub record: FazendaRecord,
    /// GeoJSON geometry in the source SRID.
    pub geometry: String,
}

pub struct BatchWriter {
    pool: PgPool,
    geom_prefix: String,
    geom_suffix: String,
}

impl BatchWriter {
    /// `source_srid` is the SRID of incoming coordinates; rows are stored in 4326.
    pub fn new(pool: PgPool, source_srid: i32) -> Self {
        let (geom_prefix, geom_suffix) = geometry_expression(source_srid);
        Self {
            pool,
            geom_prefix,
            geom_suffix,
        }
    }

    /// Insert `rows` in one transaction; returns the number of rows written.
    pub async fn insert(&self, rows: &[FazendaRow]) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for chunk in rows.chunks(rows_per_statement()) {
            let mut qb = QueryBuilder::<Postgres>::new(insert_prefix());
            qb.push_values(chunk, |mut b, row| {
                let r = &row.record;
                b.push(&self.geom_prefix)
                    .push_bind_unseparated(row.geometry.clone())
                    .push_unseparated(&self.geom_suffix);
                b.push_bind(r.cod_tema.clone())
                    .push_bind(r.nom_tema.clone())
                    .push_bind(r.cod_imovel.clone())
                    .push_bind(r.mod_fiscal)
                    .push_bind(r.num_area)
                    .push_bind(r.ind_status.clone())
                    .push_bind(r.ind_tipo.clone())
                    .push_bind(r.des_condic.clone())
                    .push_bind(r.municipio.clone())
                    .push_bind(r.cod_estado.clone())
                    .push_bind(r.dat_criaca)
                    .push_bind(r.dat_atuali);
            });

            written += qb.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }
}

fn insert_prefix() -> String {
    format!("INSERT INTO fazendas (geom, {}) ", ATTRIBUTE_COLUMNS.join(", "))
}

/// SQL wrapped around the GeoJSON bind so the stored geometry ends up in 4326.
fn geometry_expression(source_srid: i32) -> (String, String) {
    if source_srid == 4326 {
        (
            "ST_SetSRID(ST_GeomFromGeoJSON(".into(),
            "), 4326)".into(),
        )
    } else {
        (
            "ST_Transform(ST_SetSRID(ST_GeomFromGeoJSON(".into(),
            format!("), {source_srid}), 4326)"),
        )
    }
}
