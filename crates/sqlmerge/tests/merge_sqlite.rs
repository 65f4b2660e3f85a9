use asupersync::runtime::RuntimeBuilder;
use asupersync::{Cx, Outcome};
use std::time::Duration;

use sqlmerge::prelude::*;
use sqlmerge::{Row, create_table_sql};
use sqlmerge_core::{DataErrorKind, SchemaErrorKind};
use sqlmerge_sqlite::SqliteConnection;

fn unwrap_outcome<T>(outcome: Outcome<T, Error>) -> T {
    match outcome {
        Outcome::Ok(v) => v,
        Outcome::Err(e) => panic!("unexpected error: {e}"),
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

fn expect_err<T>(outcome: Outcome<T, Error>) -> Error {
    match outcome {
        Outcome::Ok(_) => panic!("expected an error"),
        Outcome::Err(e) => e,
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

fn open() -> SqliteConnection {
    let conn = SqliteConnection::open_memory().expect("open sqlite memory db");
    conn.execute_raw("ATTACH DATABASE ':memory:' AS staging")
        .expect("attach staging db");
    conn
}

fn country() -> TableSchema {
    TableSchema::new("country")
        .column(Column::new("code", SqlType::Char(2)).primary_key())
        .column(Column::new("name", SqlType::VarChar(40)).not_null())
        .column(Column::new("inserted_at", SqlType::Timestamp).track_insert())
        .column(Column::new("updated_at", SqlType::Timestamp).track_update())
}

fn country_batch() -> Batch {
    Batch::new(["code", "name"])
        .row(vec![Value::from("DE"), Value::from("Deutschland")])
        .row(vec![Value::from("IT"), Value::from("Italien")])
}

const SEEDED_AT: &str = "2000-01-01 00:00:00.000";

async fn seed_country(cx: &Cx, conn: &SqliteConnection, rows: &[(&str, &str)]) {
    unwrap_outcome(
        conn.execute(cx, &create_table_sql(&country(), Dialect::Sqlite), &[])
            .await,
    );
    for (code, name) in rows {
        unwrap_outcome(
            conn.execute(
                cx,
                "INSERT INTO country (code, name, inserted_at) VALUES (?1, ?2, ?3)",
                &[Value::from(*code), Value::from(*name), Value::from(SEEDED_AT)],
            )
            .await,
        );
    }
}

async fn countries(cx: &Cx, conn: &SqliteConnection) -> Vec<Row> {
    unwrap_outcome(
        conn.query(
            cx,
            "SELECT code, name, inserted_at, updated_at FROM country ORDER BY code",
            &[],
        )
        .await,
    )
}

/// Current database time, then a pause so later timestamps differ.
async fn db_now(cx: &Cx, conn: &SqliteConnection) -> String {
    let rows = unwrap_outcome(
        conn.query(
            cx,
            "SELECT strftime('%Y-%m-%d %H:%M:%f', 'now') AS now",
            &[],
        )
        .await,
    );
    let now = rows[0].get_named::<String>("now").expect("now column");
    std::thread::sleep(Duration::from_millis(20));
    now
}

#[test]
fn full_merge_deletes_updates_and_inserts() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let conn = open();
        seed_country(&cx, &conn, &[("DE", "Doitschland"), ("??", "Unknown")]).await;
        let before = db_now(&cx, &conn).await;

        let loader = MergeLoader::new(LoadOptions::default());
        let report = unwrap_outcome(loader.load(&cx, &conn, &country(), &country_batch()).await);
        assert_eq!(report.staged, 2);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(report.inserted, 1);

        let rows = countries(&cx, &conn).await;
        assert_eq!(rows.len(), 2);

        let de = &rows[0];
        assert_eq!(de.get_named::<String>("code").unwrap(), "DE");
        assert_eq!(de.get_named::<String>("name").unwrap(), "Deutschland");
        assert_eq!(de.get_named::<String>("inserted_at").unwrap(), SEEDED_AT);
        let updated_at = de.get_named::<String>("updated_at").unwrap();
        assert!(updated_at > before, "{updated_at} <= {before}");

        let it = &rows[1];
        assert_eq!(it.get_named::<String>("code").unwrap(), "IT");
        assert_eq!(it.get_named::<String>("name").unwrap(), "Italien");
        let inserted_at = it.get_named::<String>("inserted_at").unwrap();
        assert!(inserted_at > before, "{inserted_at} <= {before}");
        assert_eq!(it.get_named::<Option<String>>("updated_at").unwrap(), None);

        assert!(!conn.in_transaction());
    });
}

#[test]
fn full_merge_deletes_only_rows_missing_from_batch() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let conn = open();
        seed_country(
            &cx,
            &conn,
            &[("DE", "Deutschland"), ("IT", "Italien"), ("??", "Unknown")],
        )
        .await;

        let loader = MergeLoader::new(LoadOptions::default());
        let report = unwrap_outcome(loader.load(&cx, &conn, &country(), &country_batch()).await);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.updated, 2);
        assert_eq!(report.inserted, 0);

        let codes: Vec<String> = countries(&cx, &conn)
            .await
            .iter()
            .map(|row| row.get_named::<String>("code").unwrap())
            .collect();
        assert_eq!(codes, ["DE", "IT"]);
    });
}

#[test]
fn upsert_keeps_rows_missing_from_batch() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let conn = open();
        seed_country(&cx, &conn, &[("??", "Unknown")]).await;

        let loader = MergeLoader::new(LoadOptions::new().merge(MergeConfig::upsert()));
        let report = unwrap_outcome(loader.load(&cx, &conn, &country(), &country_batch()).await);
        assert_eq!(report.deleted, 0);
        assert_eq!(report.updated, 0);
        assert_eq!(report.inserted, 2);
        assert_eq!(countries(&cx, &conn).await.len(), 3);
    });
}

fn measure() -> TableSchema {
    TableSchema::new("measure")
        .column(Column::new("country", SqlType::Char(2)).primary_key())
        .column(Column::new("year", SqlType::Integer).primary_key())
        .column(Column::new("value", SqlType::Double))
}

fn measure_batch() -> Batch {
    Batch::new(["country", "year", "value"])
        .row(vec![Value::from("DE"), Value::Int(2020), Value::Double(21.0)])
        .row(vec![Value::from("DE"), Value::Int(2021), Value::Double(22.1)])
}

async fn seed_measure(cx: &Cx, conn: &SqliteConnection) {
    unwrap_outcome(
        conn.execute(cx, &create_table_sql(&measure(), Dialect::Sqlite), &[])
            .await,
    );
    unwrap_outcome(
        conn.execute(
            cx,
            "INSERT INTO measure (country, year, value) VALUES ('DE', 2019, 20.0), ('DE', 2020, 20.5)",
            &[],
        )
        .await,
    );
}

async fn measures(cx: &Cx, conn: &SqliteConnection) -> Vec<(String, i64, f64)> {
    unwrap_outcome(
        conn.query(
            cx,
            "SELECT country, year, value FROM measure ORDER BY country, year",
            &[],
        )
        .await,
    )
    .iter()
    .map(|row| {
        (
            row.get_named::<String>("country").unwrap(),
            row.get_named::<i64>("year").unwrap(),
            row.get_named::<f64>("value").unwrap(),
        )
    })
    .collect()
}

#[test]
fn composite_key_upsert() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let conn = open();
        seed_measure(&cx, &conn).await;

        let loader = MergeLoader::new(LoadOptions::new().merge(MergeConfig::upsert()));
        let report = unwrap_outcome(loader.load(&cx, &conn, &measure(), &measure_batch()).await);
        assert_eq!(report.updated, 1);
        assert_eq!(report.inserted, 1);

        assert_eq!(
            measures(&cx, &conn).await,
            vec![
                ("DE".to_string(), 2019, 20.0),
                ("DE".to_string(), 2020, 21.0),
                ("DE".to_string(), 2021, 22.1),
            ]
        );
    });
}

#[test]
fn composite_key_full_merge_matches_on_every_key_column() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let conn = open();
        unwrap_outcome(
            conn.execute(&cx, &create_table_sql(&measure(), Dialect::Sqlite), &[])
                .await,
        );
        conn.execute_raw(
            "INSERT INTO measure (country, year, value) \
             VALUES ('DE', 2019, 1.0), ('DE', 2020, 2.0), ('FR', 2020, 3.0)",
        )
        .unwrap();

        // (FR, 2020) shares one key column with each batch row but matches neither.
        let batch = Batch::new(["country", "year", "value"])
            .row(vec![Value::from("DE"), Value::Int(2020), Value::Double(21.0)])
            .row(vec![Value::from("FR"), Value::Int(2019), Value::Double(4.5)]);

        let loader = MergeLoader::new(LoadOptions::default());
        let report = unwrap_outcome(loader.load(&cx, &conn, &measure(), &batch).await);
        assert_eq!(report.deleted, 2);
        assert_eq!(report.updated, 1);
        assert_eq!(report.inserted, 1);

        assert_eq!(
            measures(&cx, &conn).await,
            vec![
                ("DE".to_string(), 2020, 21.0),
                ("FR".to_string(), 2019, 4.5),
            ]
        );
    });
}

#[test]
fn upsert_is_idempotent() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let conn = open();
        seed_measure(&cx, &conn).await;
        let loader = MergeLoader::new(LoadOptions::new().merge(MergeConfig::upsert()));

        unwrap_outcome(loader.load(&cx, &conn, &measure(), &measure_batch()).await);
        let first = measures(&cx, &conn).await;

        let report = unwrap_outcome(loader.load(&cx, &conn, &measure(), &measure_batch()).await);
        assert_eq!(report.inserted, 0);
        assert_eq!(report.updated, 2);
        assert_eq!(measures(&cx, &conn).await, first);
    });
}

#[test]
fn explicit_join_columns_without_primary_key() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let conn = open();
        let target = TableSchema::new("country")
            .column(Column::new("code", SqlType::Char(2)))
            .column(Column::new("name", SqlType::Text));
        conn.execute_raw("CREATE TABLE country (code TEXT, name TEXT)")
            .unwrap();
        conn.execute_raw("INSERT INTO country VALUES ('DE', 'Doitschland')")
            .unwrap();

        let loader = MergeLoader::new(LoadOptions::new().join_columns(["code"]));
        let report = unwrap_outcome(loader.load(&cx, &conn, &target, &country_batch()).await);
        assert_eq!(report.updated, 1);
        assert_eq!(report.inserted, 1);

        let rows = unwrap_outcome(
            conn.query(&cx, "SELECT name FROM country ORDER BY code", &[])
                .await,
        );
        let names: Vec<String> = rows
            .iter()
            .map(|r| r.get_named::<String>("name").unwrap())
            .collect();
        assert_eq!(names, ["Deutschland", "Italien"]);
    });
}

#[test]
fn missing_join_key_fails_before_any_statement() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let conn = open();
        let target = TableSchema::new("country")
            .column(Column::new("code", SqlType::Char(2)))
            .column(Column::new("name", SqlType::Text));
        conn.execute_raw("CREATE TABLE country (code TEXT, name TEXT)")
            .unwrap();
        conn.execute_raw("INSERT INTO country VALUES ('??', 'Unknown')")
            .unwrap();

        let loader = MergeLoader::new(LoadOptions::default());
        let err = expect_err(loader.load(&cx, &conn, &target, &country_batch()).await);
        assert!(matches!(err, Error::Config(_)), "{err}");

        // Neither the staging table nor the target were touched.
        let staged = unwrap_outcome(
            conn.query(&cx, "SELECT name FROM staging.sqlite_master", &[])
                .await,
        );
        assert!(staged.is_empty());
        let rows = unwrap_outcome(conn.query(&cx, "SELECT * FROM country", &[]).await);
        assert_eq!(rows.len(), 1);
    });
}

#[test]
fn failing_statement_rolls_back_the_merge() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let conn = open();
        seed_country(&cx, &conn, &[("DE", "Doitschland"), ("??", "Unknown")]).await;

        // "name" is NOT NULL in the target; the UPDATE fails after the DELETE ran.
        let batch = Batch::new(["code", "name"]).row(vec![Value::from("DE"), Value::Null]);
        let loader = MergeLoader::new(LoadOptions::default());
        let err = expect_err(loader.load(&cx, &conn, &country(), &batch).await);
        match err {
            Error::Query(ref q) => {
                assert_eq!(q.kind, sqlmerge_core::QueryErrorKind::Constraint);
                assert!(q.sql.as_deref().is_some_and(|sql| sql.starts_with("UPDATE")));
            }
            ref other => panic!("unexpected error: {other}"),
        }

        assert!(!conn.in_transaction());
        let rows = countries(&cx, &conn).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_named::<String>("code").unwrap(), "??");
        assert_eq!(rows[1].get_named::<String>("name").unwrap(), "Doitschland");
    });
}

#[test]
fn duplicate_keys_rejected_before_staging() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let conn = open();
        seed_country(&cx, &conn, &[]).await;

        let batch = country_batch().row(vec![Value::from("DE"), Value::from("Germany")]);
        let loader = MergeLoader::new(LoadOptions::default());
        match expect_err(loader.load(&cx, &conn, &country(), &batch).await) {
            Error::Data(e) => {
                assert_eq!(e.kind, DataErrorKind::DuplicateKey);
                assert_eq!(e.row, Some(2));
            }
            other => panic!("unexpected error: {other}"),
        }
    });
}

#[test]
fn keys_of_different_integer_widths_are_duplicates() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let conn = open();
        conn.execute_raw("CREATE TABLE item (id INTEGER, name TEXT)")
            .unwrap();
        let target = TableSchema::new("item")
            .column(Column::new("id", SqlType::Integer))
            .column(Column::new("name", SqlType::Text));

        let batch = Batch::new(["id", "name"])
            .row(vec![Value::Int(7), Value::from("a")])
            .row(vec![Value::BigInt(7), Value::from("b")]);
        let loader = MergeLoader::new(LoadOptions::new().join_columns(["id"]));
        match expect_err(loader.load(&cx, &conn, &target, &batch).await) {
            Error::Data(e) => {
                assert_eq!(e.kind, DataErrorKind::DuplicateKey);
                assert_eq!(e.row, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }

        let rows = unwrap_outcome(conn.query(&cx, "SELECT id FROM item", &[]).await);
        assert!(rows.is_empty());
    });
}

#[test]
fn strict_matching_requires_every_target_column() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let conn = open();
        seed_country(&cx, &conn, &[]).await;

        let batch = Batch::new(["code"]).row(vec![Value::from("DE")]);
        let loader = MergeLoader::new(LoadOptions::new().merge(MergeConfig::full_merge().strict(true)));
        match expect_err(loader.load(&cx, &conn, &country(), &batch).await) {
            Error::Schema(e) => assert_eq!(e.kind, SchemaErrorKind::ColumnNotFound),
            other => panic!("unexpected error: {other}"),
        }
    });
}
