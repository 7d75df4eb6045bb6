//! Schema bootstrap and inspection
//!
//! `CREATE TABLE IF NOT EXISTS` for the five hospital tables, plus a
//! listing of what the database currently holds. There is no versioning.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use super::executor::{execute_query, QueryOutcome};
use super::session::Session;
use crate::query::QueryData;
use crate::Result;

const CREATE_BED: &str = "
    CREATE TABLE IF NOT EXISTS Bed (
        BedID INT AUTO_INCREMENT PRIMARY KEY,
        Type VARCHAR(50),
        Location VARCHAR(100),
        Status VARCHAR(50),
        Pid INT
    )";

const CREATE_MEDICINE: &str = "
    CREATE TABLE IF NOT EXISTS Medicine (
        MediID INT AUTO_INCREMENT PRIMARY KEY,
        MediName VARCHAR(100),
        Price INT,
        Qty INT,
        Expiry DATE
    )";

const CREATE_PATIENT: &str = "
    CREATE TABLE IF NOT EXISTS Patient (
        PatientID INT AUTO_INCREMENT PRIMARY KEY,
        Name VARCHAR(100),
        Phone VARCHAR(15),
        Age INT,
        Sex CHAR(1)
    )";

const CREATE_HISTORY: &str = "
    CREATE TABLE IF NOT EXISTS History (
        PID INT,
        Doctor VARCHAR(100),
        Date DATE,
        PrescriptionID VARCHAR(50),
        FOREIGN KEY (PID) REFERENCES Patient(PatientID),
        PRIMARY KEY (PID, Date, PrescriptionID)
    )";

const CREATE_MEDITAG: &str = "
    CREATE TABLE IF NOT EXISTS Meditag (
        MediID INT,
        MediTag VARCHAR(50),
        FOREIGN KEY (MediID) REFERENCES Medicine(MediID),
        PRIMARY KEY (MediID, MediTag)
    )";

/// Creation order; referenced tables come first.
pub const CREATE_TABLES: [&str; 5] = [
    CREATE_BED,
    CREATE_MEDICINE,
    CREATE_PATIENT,
    CREATE_HISTORY,
    CREATE_MEDITAG,
];

/// Create any missing hospital tables.
#[instrument(skip(session))]
pub async fn initialize_schema<S>(session: &mut S) -> Result<Vec<QueryOutcome>>
where
    S: Session + ?Sized,
{
    let mut outcomes = Vec::with_capacity(CREATE_TABLES.len());
    for statement in CREATE_TABLES {
        outcomes.push(execute_query(session, statement, QueryData::None).await?);
    }
    info!("Schema initialized ({} tables)", CREATE_TABLES.len());
    Ok(outcomes)
}

/// A table and its column descriptions as reported by `SHOW COLUMNS`.
#[derive(Debug, Clone, Serialize)]
pub struct TableDescription {
    pub name: String,
    pub columns: Vec<Vec<Value>>,
}

/// List every table in the current database with its columns.
#[instrument(skip(session))]
pub async fn describe_tables<S>(session: &mut S) -> Result<Vec<TableDescription>>
where
    S: Session + ?Sized,
{
    let tables = execute_query(session, "SHOW TABLES", QueryData::None).await?;
    let names: Vec<String> = tables
        .rows()
        .unwrap_or_default()
        .iter()
        .filter_map(|row| row.first().and_then(Value::as_str).map(str::to_string))
        .collect();

    let mut descriptions = Vec::with_capacity(names.len());
    for name in names {
        // Table names come from the server itself, but still get quoted
        let query = format!("SHOW COLUMNS FROM `{}`", name.replace('`', "``"));
        let columns = match execute_query(session, &query, QueryData::None).await? {
            QueryOutcome::Rows(rows) => rows,
            QueryOutcome::Status(_) => Vec::new(),
        };
        descriptions.push(TableDescription { name, columns });
    }
    Ok(descriptions)
}
