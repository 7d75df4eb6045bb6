//! Demo data for a fresh hospital database
//!
//! Generation is pure (an RNG and today's date in, rows out) so it can be
//! tested; insertion goes row by row through the executor and keeps going
//! past rows the database rejects.

use chrono::{Duration, NaiveDate};
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::db::{execute_query, QueryOutcome, Session};
use crate::models::{Bed, BedStatus, History, Medicine, Meditag, Patient, Table};
use crate::query::{insert_sql, QueryData, SqlValue};
use crate::{Error, Result};

const PATIENT_COUNT: usize = 10;
const BED_COUNT: usize = 11;
const HISTORY_COUNT: usize = 10;
const MEDICINE_COUNT: usize = 10;
const MEDITAG_COUNT: i64 = 50;

const BED_TYPES: [&str; 3] = ["General", "ICU", "Private"];
const WINGS: [&str; 3] = ["A", "B", "C"];
const SEXES: [&str; 2] = ["M", "F"];

const NAME_BASES: [&str; 10] = ["Aero", "Cura", "Helio", "Nova", "Vita", "Zeno", "Riva", "Lumen", "Medi", "Nex"];
const NAME_MODIFIERS: [&str; 10] = ["Clear", "Max", "Prime", "Sure", "Ultra", "Gen", "Flex", "Opti", "Plus", "Pure"];
const NAME_SUFFIXES: [&str; 10] = ["-in", "-ol", "-ex", "-am", "-an", "-ium", "-or", "-ide", "-ine", "-ar"];

/// Which tables to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
    pub patients: bool,
    pub beds: bool,
    pub history: bool,
    pub medicines: bool,
    pub meditags: bool,
}

impl SeedOptions {
    pub fn all() -> Self {
        Self {
            patients: true,
            beds: true,
            history: true,
            medicines: true,
            meditags: true,
        }
    }
}

/// One batch of generated rows for every table.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub patients: Vec<Patient>,
    pub beds: Vec<Bed>,
    pub history: Vec<History>,
    pub medicines: Vec<Medicine>,
    pub meditags: Vec<Meditag>,
}

impl SeedPlan {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> Self {
        let patients = (0..PATIENT_COUNT).map(|_| random_patient(rng)).collect();
        let beds = (0..BED_COUNT).map(|_| random_bed(rng)).collect();
        let history = (0..HISTORY_COUNT).map(|_| random_history(rng, today)).collect();
        let medicines = (0..MEDICINE_COUNT).map(|_| random_medicine(rng, today)).collect();
        let meditags = (1..=MEDITAG_COUNT)
            .map(|medi_id| Meditag {
                medi_id,
                tag: pick(rng, &Meditag::TAGS).to_string(),
            })
            .collect();

        Self {
            patients,
            beds,
            history,
            medicines,
            meditags,
        }
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

fn random_patient<R: Rng + ?Sized>(rng: &mut R) -> Patient {
    let name: String = Name().fake_with_rng(rng);
    let phone: String = PhoneNumber().fake_with_rng(rng);
    Patient {
        name,
        // Phone is VARCHAR(15)
        phone: phone.chars().take(14).collect(),
        age: rng.gen_range(1..=100),
        sex: pick(rng, &SEXES).to_string(),
    }
}

fn random_bed<R: Rng + ?Sized>(rng: &mut R) -> Bed {
    let status = *BedStatus::ALL.choose(rng).unwrap_or(&BedStatus::Available);
    let location = format!(
        "{}/{}{}",
        pick(rng, &WINGS),
        rng.gen_range(0..=3),
        rng.gen_range(10..=99)
    );
    Bed {
        bed_type: pick(rng, &BED_TYPES).to_string(),
        location,
        status,
        pid: status.holds_patient().then(|| rng.gen_range(1..=9)),
    }
}

fn random_history<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> History {
    let doctor: String = Name().fake_with_rng(rng);
    let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
    History {
        pid: rng.gen_range(1..=11),
        doctor,
        date: date_within_last_year(rng, today),
        prescription_id: id.simple().to_string()[..8].to_string(),
    }
}

fn random_medicine<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> Medicine {
    Medicine {
        name: generate_medication_name(rng),
        qty: rng.gen_range(1..=100),
        expiry: date_within_last_year(rng, today),
        price: ((rng.gen::<f64>() * 1000.0) as i64).max(10),
    }
}

fn date_within_last_year<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    today - Duration::days(rng.gen_range(0..=365))
}

/// Made-up brand names such as `NovaMax-ol`.
pub fn generate_medication_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}{}{}",
        pick(rng, &NAME_BASES),
        pick(rng, &NAME_MODIFIERS),
        pick(rng, &NAME_SUFFIXES)
    )
}

/// A row the database refused; seeding carries on regardless.
#[derive(Debug, Clone, Serialize)]
pub struct SeedFailure {
    pub message: String,
    pub query: String,
    pub data: Vec<SqlValue>,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SeedEntry {
    Inserted(QueryOutcome),
    Failed(SeedFailure),
}

/// Insert the selected parts of `plan`, one row per statement.
#[instrument(skip(session, plan))]
pub async fn insert_random_data<S>(session: &mut S, plan: &SeedPlan, options: SeedOptions) -> Result<Vec<SeedEntry>>
where
    S: Session + ?Sized,
{
    info!("Inserting random data into the database...");
    let mut results = Vec::new();

    if options.patients {
        let rows = plan.patients.iter().map(Patient::params).collect();
        insert_rows(session, Table::Patient, &Patient::INSERT_COLUMNS, rows, &mut results).await?;
    }
    if options.beds {
        let rows = plan.beds.iter().map(Bed::params).collect();
        insert_rows(session, Table::Bed, &Bed::INSERT_COLUMNS, rows, &mut results).await?;
    }
    if options.history {
        let rows = plan.history.iter().map(History::params).collect();
        insert_rows(session, Table::History, &History::INSERT_COLUMNS, rows, &mut results).await?;
    }
    if options.medicines {
        let rows = plan.medicines.iter().map(Medicine::params).collect();
        insert_rows(session, Table::Medicine, &Medicine::INSERT_COLUMNS, rows, &mut results).await?;
    }
    if options.meditags {
        let rows = plan.meditags.iter().map(Meditag::params).collect();
        insert_rows(session, Table::Meditag, &Meditag::INSERT_COLUMNS, rows, &mut results).await?;
    }

    Ok(results)
}

async fn insert_rows<S>(
    session: &mut S,
    table: Table,
    columns: &[&str],
    rows: Vec<Vec<SqlValue>>,
    results: &mut Vec<SeedEntry>,
) -> Result<()>
where
    S: Session + ?Sized,
{
    let sql = insert_sql(table, columns)?;
    debug!("{} data: {:?}", table, rows);

    for params in rows {
        match execute_query(session, &sql, QueryData::Single(params.clone())).await {
            Ok(outcome) => results.push(SeedEntry::Inserted(outcome)),
            Err(err) => {
                let reason = match &err {
                    Error::Query { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                error!("Failed to insert {} data {:?}: {}", table, params, reason);
                results.push(SeedEntry::Failed(SeedFailure {
                    message: "Query Failed".to_string(),
                    query: sql.clone(),
                    data: params,
                    error: reason,
                }));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::session::{MockSession, WriteOutcome};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()
    }

    fn plan() -> SeedPlan {
        SeedPlan::generate(&mut StdRng::seed_from_u64(42), today())
    }

    #[test]
    fn generates_the_demo_volumes() {
        let plan = plan();
        assert_eq!(plan.patients.len(), 10);
        assert_eq!(plan.beds.len(), 11);
        assert_eq!(plan.history.len(), 10);
        assert_eq!(plan.medicines.len(), 10);
        assert_eq!(plan.meditags.len(), 50);
    }

    #[test]
    fn only_occupied_or_reserved_beds_hold_a_patient() {
        for bed in plan().beds {
            match bed.pid {
                Some(pid) => {
                    assert!(bed.status.holds_patient(), "{bed:?}");
                    assert!((1..=9).contains(&pid));
                }
                None => assert_eq!(bed.status, BedStatus::Available),
            }
            assert!(BED_TYPES.contains(&bed.bed_type.as_str()));
        }
    }

    #[test]
    fn bed_locations_look_like_wing_and_room() {
        for bed in plan().beds {
            let (wing, room) = bed.location.split_once('/').unwrap();
            assert!(WINGS.contains(&wing), "{}", bed.location);
            assert_eq!(room.len(), 3, "{}", bed.location);
            assert!(room.chars().all(|c| c.is_ascii_digit()));
            assert!(room[..1].parse::<u8>().unwrap() <= 3);
        }
    }

    #[test]
    fn patients_fit_the_schema() {
        for patient in plan().patients {
            assert!(patient.phone.chars().count() <= 14);
            assert!((1..=100).contains(&patient.age));
            assert!(SEXES.contains(&patient.sex.as_str()));
            assert!(!patient.name.is_empty());
        }
    }

    #[test]
    fn dates_fall_within_the_last_year() {
        let plan = plan();
        let earliest = today() - Duration::days(365);
        let dates = plan
            .history
            .iter()
            .map(|h| h.date)
            .chain(plan.medicines.iter().map(|m| m.expiry));
        for date in dates {
            assert!(date >= earliest && date <= today(), "{date}");
        }
    }

    #[test]
    fn prescriptions_and_prices_are_well_formed() {
        let plan = plan();
        for visit in &plan.history {
            assert_eq!(visit.prescription_id.len(), 8);
            assert!(visit.prescription_id.chars().all(|c| c.is_ascii_hexdigit()));
            assert!((1..=11).contains(&visit.pid));
        }
        for medicine in &plan.medicines {
            assert!((10..1000).contains(&medicine.price));
            assert!((1..=100).contains(&medicine.qty));
        }
        let ids: Vec<i64> = plan.meditags.iter().map(|t| t.medi_id).collect();
        assert_eq!(ids, (1..=50).collect::<Vec<_>>());
    }

    #[test]
    fn medication_names_combine_three_parts() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let name = generate_medication_name(&mut rng);
            assert!(NAME_BASES.iter().any(|b| name.starts_with(b)), "{name}");
            assert!(NAME_SUFFIXES.iter().any(|s| name.ends_with(s)), "{name}");
        }
    }

    #[tokio::test]
    async fn rejected_rows_are_recorded_and_seeding_continues() {
        let mut session = MockSession::new();
        session.expect_column_count().returning(|_| Ok(0));
        session.expect_execute_write().returning(|_, data| match data {
            QueryData::Single(params) if params[0] == SqlValue::Int(3) => Err(sqlx::Error::Protocol(
                "Cannot add or update a child row: a foreign key constraint fails".into(),
            )),
            _ => Ok(WriteOutcome {
                rows_affected: 1,
                last_insert_id: None,
                warnings: vec![],
            }),
        });

        let options = SeedOptions {
            patients: false,
            beds: false,
            history: false,
            medicines: false,
            meditags: true,
        };
        let results = insert_random_data(&mut session, &plan(), options).await.unwrap();

        assert_eq!(results.len(), 50);
        let failures: Vec<&SeedFailure> = results
            .iter()
            .filter_map(|entry| match entry {
                SeedEntry::Failed(failure) => Some(failure),
                SeedEntry::Inserted(_) => None,
            })
            .collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "Query Failed");
        assert_eq!(failures[0].query, "INSERT INTO Meditag (MediID, MediTag) VALUES (?, ?)");
        assert!(failures[0].error.contains("foreign key"));
    }

    #[tokio::test]
    async fn all_tables_are_seeded_in_dependency_order() {
        let mut session = MockSession::new();
        session.expect_column_count().returning(|_| Ok(0));
        let tables = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = tables.clone();
        session.expect_execute_write().returning(move |sql, _| {
            let table = sql.split_whitespace().nth(2).unwrap_or_default().to_string();
            let mut seen = seen.lock().unwrap();
            if seen.last() != Some(&table) {
                seen.push(table);
            }
            Ok(WriteOutcome::default())
        });

        let results = insert_random_data(&mut session, &plan(), SeedOptions::all()).await.unwrap();

        assert_eq!(results.len(), 10 + 11 + 10 + 10 + 50);
        assert_eq!(
            *tables.lock().unwrap(),
            vec!["Patient", "Bed", "History", "Medicine", "Meditag"]
        );
    }
}
