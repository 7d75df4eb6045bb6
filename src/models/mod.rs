//! Hospital data model
//!
//! Table definitions double as the column allow-list: anything a client
//! names (filter columns, update fields) is resolved against these lists.

pub mod bed;
pub mod medicine;
pub mod patient;

pub use bed::{Bed, BedStatus};
pub use medicine::{Medicine, Meditag};
pub use patient::{History, Patient};

/// The tables of the hospital schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Bed,
    Patient,
    Medicine,
    Meditag,
    History,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Bed => "Bed",
            Table::Patient => "Patient",
            Table::Medicine => "Medicine",
            Table::Meditag => "Meditag",
            Table::History => "History",
        }
    }

    /// Every column, in schema order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Bed => &["BedID", "Type", "Location", "Status", "Pid"],
            Table::Patient => &["PatientID", "Name", "Phone", "Age", "Sex"],
            Table::Medicine => &["MediID", "MediName", "Price", "Qty", "Expiry"],
            Table::Meditag => &["MediID", "MediTag"],
            Table::History => &["PID", "Doctor", "Date", "PrescriptionID"],
        }
    }

    /// Single-column key used by update statements, if the table has one.
    pub fn key_column(self) -> Option<&'static str> {
        match self {
            Table::Bed => Some("BedID"),
            Table::Patient => Some("PatientID"),
            Table::Medicine => Some("MediID"),
            Table::Meditag | Table::History => None,
        }
    }

    /// Resolve a client-supplied column name to its canonical spelling.
    /// MySQL column names are case-insensitive, so is this lookup.
    pub fn column(self, raw: &str) -> Option<&'static str> {
        self.columns()
            .iter()
            .copied()
            .find(|column| column.eq_ignore_ascii_case(raw))
    }

    /// Like [`Table::column`], but an unknown name is an error.
    pub fn require_column(self, raw: &str) -> crate::Result<&'static str> {
        self.column(raw).ok_or_else(|| crate::Error::UnknownColumn {
            table: self.name(),
            column: raw.to_string(),
        })
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
