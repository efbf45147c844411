use std::sync::Arc;

use mysql_driver_adapter::mysql::{MySqlType, build_pool};
use mysql_driver_adapter::prelude::*;
use mysql_driver_adapter::test_utils::{
    MockManager, MockResponse, MockServer, ObservedEvent, RecordingObserver, column,
};

async fn adapter_for(server: &MockServer) -> MySqlAdapter<ConnectionPool<MockManager>> {
    let pool = build_pool(server.manager()).await.expect("pool");
    MySqlAdapter::new(pool)
}

#[tokio::test]
async fn temporal_and_bigint_columns_come_back_as_wire_text() {
    let server = MockServer::new().on(
        "SELECT id, big, created_at, born, qty, name FROM orders WHERE id = ?",
        MockResponse::text_rows(
            vec![
                column("id", MySqlType::Long),
                column("big", MySqlType::LongLong),
                column("created_at", MySqlType::Timestamp),
                column("born", MySqlType::Date),
                column("qty", MySqlType::Short),
                column("name", MySqlType::VarString),
            ],
            &[&[
                Some("7"),
                Some("9007199254740993"),
                Some("2024-02-29 23:59:59.123456"),
                Some("1999-12-31"),
                None,
                Some("widget"),
            ]],
        ),
    );
    let adapter = adapter_for(&server).await;

    let rs = adapter
        .query_raw(&Query::new(
            "SELECT id, big, created_at, born, qty, name FROM orders WHERE id = ?",
            vec![RowValues::Int(7)],
        ))
        .await
        .unwrap();

    assert_eq!(rs.len(), 1);
    assert_eq!(
        rs.rows[0],
        vec![
            RowValues::Int(7),
            RowValues::Text("9007199254740993".into()),
            RowValues::Text("2024-02-29 23:59:59.123456".into()),
            RowValues::Text("1999-12-31".into()),
            RowValues::Null,
            RowValues::Text("widget".into()),
        ]
    );
    assert_eq!(rs.get(0, "name").and_then(RowValues::as_text), Some("widget"));
    assert_eq!(rs.last_insert_id, None);

    let executed = server.executed();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].rows_as_array);
    assert_eq!(executed[0].values, vec![RowValues::Int(7)]);
}

#[tokio::test]
async fn empty_select_keeps_its_columns() {
    let server = MockServer::new().on(
        "SELECT id, name FROM users WHERE 1 = 0",
        MockResponse::text_rows(
            vec![
                column("id", MySqlType::Long),
                column("name", MySqlType::VarString),
            ],
            &[],
        ),
    );
    let adapter = adapter_for(&server).await;

    let rs = adapter
        .query_raw(&Query::raw("SELECT id, name FROM users WHERE 1 = 0"))
        .await
        .unwrap();

    assert!(rs.is_empty());
    assert_eq!(rs.column_names, vec!["id".to_string(), "name".to_string()]);
    assert_eq!(rs.column_types, vec![ColumnType::Int32, ColumnType::Text]);
}

#[tokio::test]
async fn insert_id_is_stringified_without_precision_loss() {
    let server = MockServer::new().on(
        "INSERT INTO ledger (amount) VALUES (?)",
        MockResponse::affected(1, Some(9_007_199_254_740_993)),
    );
    let adapter = adapter_for(&server).await;

    let rs = adapter
        .query_raw(&Query::new(
            "INSERT INTO ledger (amount) VALUES (?)",
            vec![RowValues::Float(12.5)],
        ))
        .await
        .unwrap();

    assert!(rs.is_empty());
    assert!(rs.column_names.is_empty());
    assert_eq!(rs.last_insert_id.as_deref(), Some("9007199254740993"));
}

#[tokio::test]
async fn execute_raw_returns_affected_rows() {
    let server = MockServer::new()
        .on(
            "UPDATE users SET active = 0 WHERE last_seen < ?",
            MockResponse::affected(3, None),
        )
        .on("CREATE TABLE t (id INT)", MockResponse::affected(0, None));
    let adapter = adapter_for(&server).await;

    let updated = adapter
        .execute_raw(&Query::new(
            "UPDATE users SET active = 0 WHERE last_seen < ?",
            vec![RowValues::Text("2024-01-01".into())],
        ))
        .await
        .unwrap();
    assert_eq!(updated, 3);

    let created = adapter
        .execute_raw(&Query::raw("CREATE TABLE t (id INT)"))
        .await
        .unwrap();
    assert_eq!(created, 0);

    // Writes do not ask for array-shaped rows.
    assert!(server.executed().iter().all(|q| !q.rows_as_array));
}

#[tokio::test]
async fn execute_raw_clamps_counts_beyond_u32() {
    let server = MockServer::new().on(
        "DELETE FROM huge",
        MockResponse::affected(u64::from(u32::MAX) + 10, None),
    );
    let adapter = adapter_for(&server).await;

    let count = adapter
        .execute_raw(&Query::raw("DELETE FROM huge"))
        .await
        .unwrap();
    assert_eq!(count, u32::MAX);
}

#[tokio::test]
async fn default_decoding_applies_to_execute_raw_rows() {
    let server = MockServer::new().on(
        "SELECT 1",
        MockResponse::text_rows(vec![column("1", MySqlType::LongLong)], &[&[Some("1")]]),
    );
    let adapter = adapter_for(&server).await;

    // A row-returning statement counts its rows.
    assert_eq!(adapter.execute_raw(&Query::raw("SELECT 1")).await.unwrap(), 1);
    // The same statement through query_raw keeps BIGINT as text.
    let rs = adapter.query_raw(&Query::raw("SELECT 1")).await.unwrap();
    assert_eq!(rs.rows[0][0], RowValues::Text("1".into()));
}

#[tokio::test]
async fn observer_sees_queries_in_order() {
    let server = MockServer::new()
        .on("SELECT 1", MockResponse::text_rows(vec![column("1", MySqlType::Long)], &[]))
        .on("DELETE FROM t", MockResponse::affected(0, None));
    let observer = Arc::new(RecordingObserver::new());
    let adapter = adapter_for(&server).await.with_observer(observer.clone());

    adapter.query_raw(&Query::raw("SELECT 1")).await.unwrap();
    adapter.execute_raw(&Query::raw("DELETE FROM t")).await.unwrap();

    assert_eq!(
        observer.events(),
        vec![
            ObservedEvent::Query {
                tag: "query_raw",
                sql: "SELECT 1".into()
            },
            ObservedEvent::Query {
                tag: "execute_raw",
                sql: "DELETE FROM t".into()
            },
        ]
    );
}

#[tokio::test]
async fn tracing_observer_is_the_default() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let server = MockServer::new().on(
        "SELECT 1",
        MockResponse::text_rows(vec![column("1", MySqlType::Long)], &[&[Some("1")]]),
    );
    let adapter = adapter_for(&server).await;

    let rs = adapter.query_raw(&Query::raw("SELECT 1")).await.unwrap();
    assert_eq!(rs.rows[0][0], RowValues::Int(1));
    assert!(format!("{adapter:?}").contains("TracingObserver"));
}

#[test]
fn result_set_serializes_for_the_consumer() {
    let rs = ResultSet {
        column_names: vec!["id".into()],
        column_types: vec![ColumnType::Int64],
        rows: vec![vec![RowValues::Text("1".into())]],
        last_insert_id: Some("42".into()),
    };

    let json = serde_json::to_value(&rs).unwrap();
    assert_eq!(json["column_types"], serde_json::json!(["Int64"]));
    assert_eq!(json["last_insert_id"], "42");
}
