use crate::query::SqlValue;

/// Occupancy state of a bed. The LED client keys its colours off these
/// exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedStatus {
    Available,
    Occupied,
    Reserved,
}

impl BedStatus {
    pub const ALL: [BedStatus; 3] = [BedStatus::Available, BedStatus::Occupied, BedStatus::Reserved];

    pub fn as_str(self) -> &'static str {
        match self {
            BedStatus::Available => "Available",
            BedStatus::Occupied => "Occupied",
            BedStatus::Reserved => "Reserved",
        }
    }

    /// Occupied and reserved beds are tied to a patient.
    pub fn holds_patient(self) -> bool {
        matches!(self, BedStatus::Occupied | BedStatus::Reserved)
    }
}

impl std::fmt::Display for BedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bed row as inserted; `BedID` is assigned by the database.
#[derive(Debug, Clone)]
pub struct Bed {
    pub bed_type: String,
    pub location: String,
    pub status: BedStatus,
    pub pid: Option<i64>,
}

impl Bed {
    pub const INSERT_COLUMNS: [&'static str; 4] = ["Type", "Location", "Status", "Pid"];

    pub fn params(&self) -> Vec<SqlValue> {
        vec![
            self.bed_type.as_str().into(),
            self.location.as_str().into(),
            self.status.as_str().into(),
            self.pid.into(),
        ]
    }
}
