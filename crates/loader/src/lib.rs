//! # Fazenda Loader
//!
//! Loads rural-registry parcel shapefiles into the PostGIS `fazendas` table
//! served by the API.
//!
//! ## Table of Contents
//! 1. config: connection settings
//! 2. record: dBase attributes → table columns
//! 3. shapes: polygon shapes → GeoJSON
//! 4. schema: DDL, geography fill, indexes
//! 5. writer: batched inserts
//! 6. load: the end-to-end run

pub mod config;
pub mod load;
pub mod record;
pub mod schema;
pub mod shapes;
pub mod writer;

pub use load::{load, LoadOptions, LoadSummary};
