use chrono::NaiveDate;

use crate::query::SqlValue;

/// A medicine row as inserted; `MediID` is assigned by the database.
#[derive(Debug, Clone)]
pub struct Medicine {
    pub name: String,
    pub qty: i64,
    pub expiry: NaiveDate,
    pub price: i64,
}

impl Medicine {
    pub const INSERT_COLUMNS: [&'static str; 4] = ["MediName", "Qty", "Expiry", "Price"];

    pub fn params(&self) -> Vec<SqlValue> {
        vec![
            self.name.as_str().into(),
            self.qty.into(),
            self.expiry.into(),
            self.price.into(),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct Meditag {
    pub medi_id: i64,
    pub tag: String,
}

impl Meditag {
    pub const INSERT_COLUMNS: [&'static str; 2] = ["MediID", "MediTag"];
    pub const TAGS: [&'static str; 4] = ["Painkiller", "Antibiotic", "Supplement", "Antiseptic"];

    pub fn params(&self) -> Vec<SqlValue> {
        vec![self.medi_id.into(), self.tag.as_str().into()]
    }
}
