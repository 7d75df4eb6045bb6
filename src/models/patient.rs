use chrono::NaiveDate;

use crate::query::SqlValue;

/// A patient row as inserted; `PatientID` is assigned by the database.
#[derive(Debug, Clone)]
pub struct Patient {
    pub name: String,
    pub phone: String,
    pub age: i64,
    pub sex: String,
}

impl Patient {
    pub const INSERT_COLUMNS: [&'static str; 4] = ["Name", "Phone", "Age", "Sex"];

    pub fn params(&self) -> Vec<SqlValue> {
        vec![
            self.name.as_str().into(),
            self.phone.as_str().into(),
            self.age.into(),
            self.sex.as_str().into(),
        ]
    }
}

/// One visit in a patient's history.
#[derive(Debug, Clone)]
pub struct History {
    pub pid: i64,
    pub doctor: String,
    pub date: NaiveDate,
    pub prescription_id: String,
}

impl History {
    pub const INSERT_COLUMNS: [&'static str; 4] = ["PID", "Doctor", "Date", "PrescriptionID"];

    pub fn params(&self) -> Vec<SqlValue> {
        vec![
            self.pid.into(),
            self.doctor.as_str().into(),
            self.date.into(),
            self.prescription_id.as_str().into(),
        ]
    }
}
