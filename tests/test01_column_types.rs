use mysql_driver_adapter::mysql::{BINARY_CHARSET, ColumnFlags, MySqlType, build_pool};
use mysql_driver_adapter::native::FieldPacket;
use mysql_driver_adapter::prelude::*;
use mysql_driver_adapter::test_utils::{MockManager, MockResponse, MockServer, column};

async fn adapter_for(server: &MockServer) -> MySqlAdapter<ConnectionPool<MockManager>> {
    let pool = build_pool(server.manager()).await.expect("pool");
    MySqlAdapter::new(pool)
}

fn flagged(name: &str, ty: MySqlType, flags: u16) -> FieldPacket {
    FieldPacket {
        flags,
        ..column(name, ty)
    }
}

fn binary(name: &str, ty: MySqlType) -> FieldPacket {
    FieldPacket {
        character_set: BINARY_CHARSET,
        ..column(name, ty)
    }
}

#[tokio::test]
async fn mixed_select_classifies_every_column() {
    let mut bit1 = column("flag", MySqlType::Bit);
    bit1.column_length = 1;
    let mut bit8 = column("mask", MySqlType::Bit);
    bit8.column_length = 8;

    let fields = vec![
        column("price", MySqlType::NewDecimal),
        column("ratio", MySqlType::Float),
        column("score", MySqlType::Double),
        column("small", MySqlType::Short),
        column("signed_int", MySqlType::Long),
        flagged("unsigned_int", MySqlType::Long, ColumnFlags::UNSIGNED),
        column("big", MySqlType::LongLong),
        column("created_at", MySqlType::Timestamp),
        column("opens", MySqlType::Time),
        column("born", MySqlType::Date),
        column("name", MySqlType::VarString),
        column("notes", MySqlType::Blob),
        binary("avatar", MySqlType::Blob),
        bit1,
        bit8,
        column("doc", MySqlType::Json),
        flagged("mood", MySqlType::Set, ColumnFlags::ENUM),
        column("nothing", MySqlType::Null),
    ];
    let server = MockServer::new().on(
        "SELECT * FROM everything",
        MockResponse::Rows {
            fields,
            rows: Vec::new(),
        },
    );
    let adapter = adapter_for(&server).await;

    let rs = adapter
        .query_raw(&Query::raw("SELECT * FROM everything"))
        .await
        .expect("query");

    assert_eq!(
        rs.column_types,
        vec![
            ColumnType::Numeric,
            ColumnType::Float,
            ColumnType::Double,
            ColumnType::Int32,
            ColumnType::Int32,
            ColumnType::Int64,
            ColumnType::Int64,
            ColumnType::DateTime,
            ColumnType::Time,
            ColumnType::Date,
            ColumnType::Text,
            ColumnType::Text,
            ColumnType::Bytes,
            ColumnType::Boolean,
            ColumnType::Bytes,
            ColumnType::Json,
            ColumnType::Enum,
            ColumnType::Int32,
        ]
    );
    assert_eq!(rs.column_names.len(), rs.column_types.len());
    assert_eq!(rs.column_names[0], "price");
    assert!(rs.is_empty());
}

#[tokio::test]
async fn unsupported_column_fails_the_whole_query() {
    let server = MockServer::new().on(
        "SELECT id, shape FROM places",
        MockResponse::text_rows(
            vec![
                column("id", MySqlType::Long),
                column("shape", MySqlType::Geometry),
            ],
            &[&[Some("1"), Some("POINT(1 1)")]],
        ),
    );
    let adapter = adapter_for(&server).await;

    let err = adapter
        .query_raw(&Query::raw("SELECT id, shape FROM places"))
        .await
        .expect_err("geometry is not mapped");

    assert_eq!(
        err.structured(),
        Some(&DriverAdapterError::UnsupportedNativeDataType {
            type_name: "GEOMETRY".into()
        })
    );
}

#[tokio::test]
async fn unknown_type_code_reports_unknown() {
    let mut weird = column("weird", MySqlType::Long);
    weird.column_type = 99;
    let server = MockServer::new().on(
        "SELECT weird",
        MockResponse::Rows {
            fields: vec![weird],
            rows: Vec::new(),
        },
    );
    let adapter = adapter_for(&server).await;

    let err = adapter
        .query_raw(&Query::raw("SELECT weird"))
        .await
        .unwrap_err();
    let json = serde_json::to_value(err.structured().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"kind": "UnsupportedNativeDataType", "type": "Unknown"})
    );
}
