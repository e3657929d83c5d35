//! Roster import.
//!
//! Takes a CSV with a `username` column (plus optional `full_name`,
//! `phone` and `salary`), creates every importable row as an Employee
//! with the placeholder password, and reports the rest instead of
//! rolling anything back. Rows land with rating 5 and the Employee
//! default salary unless the file says otherwise.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shared::models::{Role, UserCreate};
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

use crate::db::repository::user as user_repo;
use crate::server::auth::hash_password;

/// Upload cap for roster files.
pub const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// Every imported account starts with this password.
pub const PLACEHOLDER_PASSWORD: &str = "password123";

/// Outcome of one import run. `errors` holds one line per skipped row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    pub created: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

/// Column positions resolved from the header row, case-insensitively.
struct Columns {
    username: usize,
    full_name: Option<usize>,
    phone: Option<usize>,
    salary: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, AppError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let username = find("username")
            .ok_or_else(|| AppError::new(ErrorCode::MissingColumn).with_detail("column", "username"))?;
        Ok(Self {
            username,
            full_name: find("full_name"),
            phone: find("phone"),
            salary: find("salary"),
        })
    }

    fn cell<'a>(record: &'a csv::StringRecord, index: Option<usize>) -> Option<&'a str> {
        index
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Run an import against the live roster. Partial success by design:
/// a bad row is reported and the rest of the file still lands.
pub async fn import_roster(pool: &SqlitePool, data: &[u8]) -> AppResult<ImportReport> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| AppError::import_failed(format!("Unreadable CSV header: {e}")))?
        .clone();
    let columns = Columns::locate(&headers)?;

    // One hash for the whole batch; every row gets the same placeholder
    let hash = hash_password(PLACEHOLDER_PASSWORD)?;

    let mut report = ImportReport::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, record) in reader.records().enumerate() {
        // Header is line 1
        let line = index + 2;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                report.skipped += 1;
                report.errors.push(format!("row {line}: {e}"));
                continue;
            }
        };

        let Some(username) = Columns::cell(&record, Some(columns.username)) else {
            report.skipped += 1;
            report.errors.push(format!("row {line}: username is blank"));
            continue;
        };

        if !seen.insert(username.to_string()) {
            report.skipped += 1;
            report
                .errors
                .push(format!("row {line}: duplicate username '{username}' in file"));
            continue;
        }

        if user_repo::username_exists(pool, username).await? {
            report.skipped += 1;
            report
                .errors
                .push(format!("row {line}: username '{username}' already exists"));
            continue;
        }

        let create = UserCreate {
            username: username.to_string(),
            // Unused; the placeholder hash is passed to the repository
            password: String::new(),
            full_name: Columns::cell(&record, columns.full_name).map(String::from),
            phone: Columns::cell(&record, columns.phone).map(String::from),
            role: Some(Role::Employee),
            salary: Columns::cell(&record, columns.salary).and_then(|s| s.parse::<f64>().ok()),
            rating: None,
        };

        match user_repo::create_user(pool, &create, &hash).await {
            Ok(_) => report.created += 1,
            Err(e) => {
                report.skipped += 1;
                report.errors.push(format!("row {line}: {}", e.message));
            }
        }
    }

    tracing::info!(
        created = report.created,
        skipped = report.skipped,
        "Roster import finished"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::server::auth::verify_password;

    async fn test_db() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        let pool = db.pool().clone();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_import_creates_employees_with_placeholder() {
        let (_dir, pool) = test_db().await;
        let csv = b"username,full_name,phone,salary\n\
                    ana,Ana Ruiz,555-0101,52000\n\
                    bob,Bob Lee,,\n";

        let report = import_roster(&pool, csv).await.unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 0);
        assert!(report.errors.is_empty());

        let ana = user_repo::get_user_by_username(&pool, "ana")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ana.role, Role::Employee);
        assert_eq!(ana.full_name, "Ana Ruiz");
        assert_eq!(ana.salary, 52000.0);
        assert_eq!(ana.rating, 5);
        assert!(verify_password(PLACEHOLDER_PASSWORD, &ana.hash_pass));

        // Missing salary cell falls back to the Employee default
        let bob = user_repo::get_user_by_username(&pool, "bob")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bob.salary, 45000.0);
    }

    #[tokio::test]
    async fn test_header_names_are_case_insensitive() {
        let (_dir, pool) = test_db().await;
        let csv = b"Username,FULL_NAME\nana,Ana Ruiz\n";

        let report = import_roster(&pool, csv).await.unwrap();
        assert_eq!(report.created, 1);
    }

    #[tokio::test]
    async fn test_missing_username_column() {
        let (_dir, pool) = test_db().await;
        let csv = b"name,salary\nAna,52000\n";

        let err = import_roster(&pool, csv).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingColumn);
    }

    #[tokio::test]
    async fn test_empty_file() {
        let (_dir, pool) = test_db().await;
        let err = import_roster(&pool, b"").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyFile);
    }

    #[tokio::test]
    async fn test_blank_and_duplicate_rows_are_skipped() {
        let (_dir, pool) = test_db().await;
        let csv = b"username,full_name\n\
                    ana,Ana Ruiz\n\
                    ,No Name\n\
                    ana,Ana Again\n\
                    bob,Bob Lee\n";

        let report = import_roster(&pool, csv).await.unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].contains("row 3"));
        assert!(report.errors[0].contains("blank"));
        assert!(report.errors[1].contains("row 4"));
        assert!(report.errors[1].contains("duplicate"));
    }

    #[tokio::test]
    async fn test_existing_usernames_stay_untouched() {
        let (_dir, pool) = test_db().await;
        let existing = UserCreate {
            username: "ana".to_string(),
            password: "pw".to_string(),
            full_name: Some("Original Ana".to_string()),
            phone: None,
            role: Some(Role::Supervisor),
            salary: None,
            rating: None,
        };
        user_repo::create_user(&pool, &existing, "original-hash")
            .await
            .unwrap();

        let csv = b"username,full_name\nana,Imported Ana\nbob,Bob Lee\n";
        let report = import_roster(&pool, csv).await.unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 1);
        assert!(report.errors[0].contains("already exists"));

        // The existing account was not overwritten
        let ana = user_repo::get_user_by_username(&pool, "ana")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ana.full_name, "Original Ana");
        assert_eq!(ana.role, Role::Supervisor);
        assert_eq!(ana.hash_pass, "original-hash");
    }

    #[tokio::test]
    async fn test_garbage_salary_falls_back() {
        let (_dir, pool) = test_db().await;
        let csv = b"username,salary\nana,lots\n";

        let report = import_roster(&pool, csv).await.unwrap();
        assert_eq!(report.created, 1);

        let ana = user_repo::get_user_by_username(&pool, "ana")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ana.salary, 45000.0);
    }

    #[tokio::test]
    async fn test_short_rows_are_tolerated() {
        let (_dir, pool) = test_db().await;
        let csv = b"username,full_name,phone\nana\n";

        let report = import_roster(&pool, csv).await.unwrap();
        assert_eq!(report.created, 1);

        let ana = user_repo::get_user_by_username(&pool, "ana")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ana.full_name, "");
    }
}
