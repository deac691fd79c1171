//! # Parcel attributes
//!
//! Maps a dBase attribute row onto the `fazendas` columns. Fields are matched
//! by lower-cased name; fields the table does not know are ignored.

use chrono::NaiveDate;
use shapefile::dbase::{FieldValue, Record};
use std::collections::HashMap;

/// Attribute columns of one parcel, in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FazendaRecord {
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

impl FazendaRecord {
    /// Read the known columns from a shapefile attribute record.
    pub fn from_record(record: Record) -> Self {
        let fields = lowercase_fields(HashMap::<String, FieldValue>::from(record));
        Self::from_lookup(|name| fields.get(name))
    }

    /// Read the known columns through `lookup`, keyed by lower-case name.
    pub fn from_lookup<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a FieldValue>,
    {
        let text = |name: &str| lookup(name).and_then(text_value);
        let number = |name: &str| lookup(name).and_then(number_value);
        let date = |name: &str| lookup(name).and_then(date_value);

        Self {
            cod_tema: text("cod_tema"),
            nom_tema: text("nom_tema"),
            cod_imovel: text("cod_imovel"),
            mod_fiscal: number("mod_fiscal"),
            num_area: number("num_area"),
            ind_status: text("ind_status"),
            ind_tipo: text("ind_tipo"),
            des_condic: text("des_condic"),
            municipio: text("municipio"),
            cod_estado: text("cod_estado"),
            dat_criaca: date("dat_criaca"),
            dat_atuali: date("dat_atuali"),
        }
    }
}

/// Re-key attribute fields by lower-cased name so `COD_IMOVEL`, `Cod_Imovel`
/// and `cod_imovel` all land on the same column.
pub fn lowercase_fields<I>(fields: I) -> HashMap<String, FieldValue>
where
    I: IntoIterator<Item = (String, FieldValue)>,
{
    fields
        .into_iter()
        .map(|(name, value)| (name.trim().to_lowercase(), value))
        .collect()
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

pub fn text_value(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Character(s) => s.as_deref().and_then(non_blank),
        FieldValue::Memo(s) => non_blank(s),
        FieldValue::Numeric(n) => n.map(|n| n.to_string()),
        FieldValue::Integer(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn number_value(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Numeric(n) => *n,
        FieldValue::Float(n) => n.map(f64::from),
        FieldValue::Double(n) => Some(*n),
        FieldValue::Integer(n) => Some(f64::from(*n)),
        FieldValue::Character(Some(s)) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

pub fn date_value(value: &FieldValue) -> Option<NaiveDate> {
    match value {
        FieldValue::Date(Some(d)) => NaiveDate::from_ymd_opt(d.year() as i32, d.month(), d.day()),
        FieldValue::Character(Some(s)) => parse_date(s),
        _ => None,
    }
}

/// Parse `DD/MM/YYYY` or `YYYY-MM-DD`. Blank and placeholder values
/// (`nan`, `none`, `null`) and anything unparseable become `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() || ["nan", "none", "null"].contains(&s.to_lowercase().as_str()) {
        return None;
    }

    NaiveDate::parse_from_str(s, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}
