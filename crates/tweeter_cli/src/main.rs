//! CLI smoke entry point.
//!
//! Verifies `tweeter_core` linkage and schema bootstrap without touching any
//! on-disk database.

use std::process::ExitCode;
use tweeter_core::db::migrations::{current_user_version, latest_version};
use tweeter_core::db::open_db_in_memory;
use tweeter_core::{SqliteAuthorRepository, SqliteTweetRepository};

struct SmokeReport {
    schema_version: u32,
    authors_ready: bool,
    tweets_ready: bool,
}

impl SmokeReport {
    fn is_ready(&self) -> bool {
        self.schema_version == latest_version() && self.authors_ready && self.tweets_ready
    }
}

fn main() -> ExitCode {
    println!("tweeter_core version={}", tweeter_core::core_version());

    let report = match smoke_check() {
        Ok(report) => report,
        Err(message) => {
            eprintln!("tweeter_core {message}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "tweeter_core schema_version={} latest={} author_repo={} tweet_repo={}",
        report.schema_version,
        latest_version(),
        ready_label(report.authors_ready),
        ready_label(report.tweets_ready)
    );

    if report.is_ready() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn smoke_check() -> Result<SmokeReport, String> {
    let conn = open_db_in_memory().map_err(|err| format!("db_open=error error={err}"))?;
    let schema_version =
        current_user_version(&conn).map_err(|err| format!("schema_version=error error={err}"))?;

    Ok(SmokeReport {
        schema_version,
        authors_ready: SqliteAuthorRepository::try_new(&conn).is_ok(),
        tweets_ready: SqliteTweetRepository::try_new(&conn).is_ok(),
    })
}

fn ready_label(ready: bool) -> &'static str {
    if ready {
        "ok"
    } else {
        "error"
    }
}

#[cfg(test)]
mod tests {
    use super::{smoke_check, SmokeReport};
    use tweeter_core::db::migrations::latest_version;

    #[test]
    fn smoke_check_reports_migrated_in_memory_database() {
        let report = smoke_check().unwrap();
        assert_eq!(report.schema_version, latest_version());
        assert!(report.is_ready());
    }

    #[test]
    fn stale_schema_version_is_not_ready() {
        let report = SmokeReport {
            schema_version: 0,
            authors_ready: true,
            tweets_ready: true,
        };
        assert!(!report.is_ready());
    }
}
