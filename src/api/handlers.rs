//! Request handlers
//!
//! Every handler validates its input before checking out a connection, so
//! bad requests are answered without touching the database.

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::json;
use tracing::{info, instrument};

use super::AppState;
use crate::db::execute_query;
use crate::models::{Patient, Table};
use crate::query::{insert_sql, select, Filters, QueryData, Statement, UpdateStatement};
use crate::seed::{self, SeedOptions, SeedPlan};
use crate::{Error, Result};

/// `?filters=col op value,...`
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub filters: Option<String>,
}

impl FilterQuery {
    fn parse(&self) -> Filters {
        self.filters
            .as_deref()
            .map(Filters::from_query_param)
            .unwrap_or_default()
    }
}

/// Distinguishes a key sent as `null` (`Some(None)`) from an absent key
/// (`None`, via `#[serde(default)]`).
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Row keys are required and zero counts as missing.
fn require_key(value: Option<i64>, missing: &str) -> Result<i64> {
    value
        .filter(|id| *id != 0)
        .ok_or_else(|| Error::MissingField(missing.to_string()))
}

async fn list(state: &AppState, table: Table, query: &FilterQuery) -> Result<HttpResponse> {
    let (sql, data) = select(table, &query.parse())?.into_parts();
    let mut conn = state.db.acquire().await?;
    let outcome = execute_query(&mut *conn, &sql, data).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[instrument(skip(state))]
pub async fn get_beds(state: web::Data<AppState>, query: web::Query<FilterQuery>) -> Result<HttpResponse> {
    list(&state, Table::Bed, &query).await
}

#[instrument(skip(state))]
pub async fn get_patients(state: web::Data<AppState>, query: web::Query<FilterQuery>) -> Result<HttpResponse> {
    list(&state, Table::Patient, &query).await
}

#[instrument(skip(state))]
pub async fn get_medicines(state: web::Data<AppState>, query: web::Query<FilterQuery>) -> Result<HttpResponse> {
    list(&state, Table::Medicine, &query).await
}

#[instrument(skip(state))]
pub async fn get_meditags(state: web::Data<AppState>, query: web::Query<FilterQuery>) -> Result<HttpResponse> {
    list(&state, Table::Meditag, &query).await
}

#[instrument(skip(state))]
pub async fn get_history(state: web::Data<AppState>, query: web::Query<FilterQuery>) -> Result<HttpResponse> {
    list(&state, Table::History, &query).await
}

// ===== Updates =====

#[derive(Debug, Deserialize)]
pub struct SetBedRequest {
    #[serde(rename = "bedID", default)]
    pub bed_id: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<String>>,
    #[serde(rename = "Pid", default, deserialize_with = "present")]
    pub pid: Option<Option<i64>>,
}

impl SetBedRequest {
    pub fn into_statement(self) -> Result<Statement> {
        const MISSING: &str = "'bedID' or both 'status' and 'Pid'";
        let bed_id = require_key(self.bed_id, MISSING)?;
        if self.status.is_none() && self.pid.is_none() {
            return Err(Error::MissingField(MISSING.to_string()));
        }

        UpdateStatement::new(Table::Bed)
            .set_present("Status", self.status)?
            .set_present("Pid", self.pid)?
            .build(bed_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct SetMedicineRequest {
    #[serde(rename = "MediID", default)]
    pub medi_id: Option<i64>,
    #[serde(rename = "Qty", default, deserialize_with = "present")]
    pub qty: Option<Option<i64>>,
    #[serde(rename = "Expiry", default, deserialize_with = "present")]
    pub expiry: Option<Option<NaiveDate>>,
    // INT column
    #[serde(rename = "Price", default, deserialize_with = "present")]
    pub price: Option<Option<i64>>,
}

impl SetMedicineRequest {
    pub fn into_statement(self) -> Result<Statement> {
        let medi_id = require_key(self.medi_id, "MediID")?;

        UpdateStatement::new(Table::Medicine)
            .set_present("Qty", self.qty)?
            .set_present("Expiry", self.expiry)?
            .set_present("Price", self.price)?
            .build(medi_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct SetPatientRequest {
    #[serde(rename = "PatientID", default)]
    pub patient_id: Option<i64>,
    #[serde(rename = "Name", default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(rename = "Phone", default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(rename = "Age", default, deserialize_with = "present")]
    pub age: Option<Option<i64>>,
    #[serde(rename = "Sex", default, deserialize_with = "present")]
    pub sex: Option<Option<String>>,
}

impl SetPatientRequest {
    pub fn into_statement(self) -> Result<Statement> {
        let patient_id = require_key(self.patient_id, "PatientID")?;

        UpdateStatement::new(Table::Patient)
            .set_present("Name", self.name)?
            .set_present("Phone", self.phone)?
            .set_present("Age", self.age)?
            .set_present("Sex", self.sex)?
            .build(patient_id)
    }
}

async fn run_update(state: &AppState, statement: Statement) -> Result<HttpResponse> {
    info!(sql = %statement.sql, "Applying update");
    let (sql, data) = statement.into_parts();
    let mut conn = state.db.acquire().await?;
    let outcome = execute_query(&mut *conn, &sql, data).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Change a bed's status and/or occupant. `"Pid": null` frees the bed.
#[instrument(skip(state, body))]
pub async fn set_bed(state: web::Data<AppState>, body: web::Json<SetBedRequest>) -> Result<HttpResponse> {
    let statement = body.into_inner().into_statement()?;
    run_update(&state, statement).await
}

/// Restock or reprice a medicine.
#[instrument(skip(state, body))]
pub async fn set_medicine(state: web::Data<AppState>, body: web::Json<SetMedicineRequest>) -> Result<HttpResponse> {
    let statement = body.into_inner().into_statement()?;
    run_update(&state, statement).await
}

#[instrument(skip(state, body))]
pub async fn set_patient(state: web::Data<AppState>, body: web::Json<SetPatientRequest>) -> Result<HttpResponse> {
    let statement = body.into_inner().into_statement()?;
    run_update(&state, statement).await
}

// ===== Inserts =====

#[derive(Debug, Deserialize)]
pub struct AddPatientRequest {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
    #[serde(rename = "Age")]
    pub age: Option<i64>,
    #[serde(rename = "Sex")]
    pub sex: Option<String>,
}

impl AddPatientRequest {
    fn into_patient(self) -> Result<Patient> {
        match self {
            AddPatientRequest {
                name: Some(name),
                phone: Some(phone),
                age: Some(age),
                sex: Some(sex),
            } => Ok(Patient { name, phone, age, sex }),
            request => {
                let missing: Vec<&str> = [
                    ("Name", request.name.is_none()),
                    ("Phone", request.phone.is_none()),
                    ("Age", request.age.is_none()),
                    ("Sex", request.sex.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(Error::MissingField(missing.join(", ")))
            }
        }
    }
}

/// Admit a new patient; the database assigns `PatientID`.
#[instrument(skip(state, body))]
pub async fn add_patient(state: web::Data<AppState>, body: web::Json<AddPatientRequest>) -> Result<HttpResponse> {
    let patient = body.into_inner().into_patient()?;
    let sql = insert_sql(Table::Patient, &Patient::INSERT_COLUMNS)?;

    info!(name = %patient.name, "Adding patient");
    let mut conn = state.db.acquire().await?;
    let outcome = execute_query(&mut *conn, &sql, QueryData::Single(patient.params())).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[instrument(skip(state))]
pub async fn insert_random_data(state: web::Data<AppState>) -> Result<HttpResponse> {
    let plan = SeedPlan::generate(&mut rand::thread_rng(), chrono::Local::now().date_naive());
    let mut conn = state.db.acquire().await?;
    let response = seed::insert_random_data(&mut *conn, &plan, SeedOptions::all()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "Random data inserted successfully!",
        "response": response,
    })))
}

pub async fn details(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "hospital_name": state.hospital_name }))
}
