use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bb8::ManageConnection;
use chrono::NaiveDateTime;
use serde_json::{Map, Value as JsonValue};

use crate::mysql::codes::{BINARY_CHARSET, MySqlType};
use crate::native::{
    FieldDecoding, FieldPacket, NativeError, NativeOutput, NativeQueryable, QueryOptions,
    ResultSetHeader, ServerError,
};
use crate::types::RowValues;

/// Column definition with a utf8mb4 charset and no flags.
#[must_use]
pub fn column(name: &str, ty: MySqlType) -> FieldPacket {
    FieldPacket {
        name: name.to_string(),
        table: "t".to_string(),
        schema: "test".to_string(),
        column_type: ty.code(),
        flags: 0,
        character_set: 45,
        column_length: 255,
        decimals: 0,
    }
}

/// What the mock server answers for one SQL string.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Text-protocol rows: every non-NULL cell is the server's wire text.
    Rows {
        fields: Vec<FieldPacket>,
        rows: Vec<Vec<Option<Vec<u8>>>>,
    },
    Header(ResultSetHeader),
    Error(ServerError),
    /// A client-side failure that is not a server error.
    Fault(String),
}

impl MockResponse {
    /// Rows given as wire text, `None` for NULL.
    #[must_use]
    pub fn text_rows(fields: Vec<FieldPacket>, rows: &[&[Option<&str>]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map(|text| text.as_bytes().to_vec()))
                    .collect()
            })
            .collect();
        Self::Rows { fields, rows }
    }

    #[must_use]
    pub fn affected(affected_rows: u64, insert_id: Option<u64>) -> Self {
        Self::Header(ResultSetHeader {
            affected_rows,
            insert_id,
            ..ResultSetHeader::default()
        })
    }

    #[must_use]
    pub fn server_error(code: &str, errno: u16, state: &str, message: &str) -> Self {
        Self::Error(ServerError {
            code: Some(code.to_string()),
            errno,
            message: message.to_string(),
            state: state.to_string(),
            fields: Map::new(),
        })
    }
}

/// A statement as the mock server received it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedQuery {
    pub connection_id: u32,
    pub sql: String,
    pub values: Vec<RowValues>,
    pub rows_as_array: bool,
}

#[derive(Debug, Default)]
struct ServerState {
    responses: HashMap<String, (MockResponse, Option<Duration>)>,
    executed: Vec<ExecutedQuery>,
    refuse_connections: Option<ServerError>,
}

/// Shared script and query log for every mock connection.
#[derive(Debug, Clone, Default)]
pub struct MockServer {
    state: Arc<Mutex<ServerState>>,
    next_connection_id: Arc<AtomicU32>,
}

impl MockServer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `sql` with `response`.
    #[must_use]
    pub fn on(self, sql: &str, response: MockResponse) -> Self {
        self.insert(sql, response, None);
        self
    }

    /// Answer `sql` with `response` after `delay`.
    #[must_use]
    pub fn on_delayed(self, sql: &str, response: MockResponse, delay: Duration) -> Self {
        self.insert(sql, response, Some(delay));
        self
    }

    /// Fail every new connection attempt with `error`.
    #[must_use]
    pub fn refuse_connections(self, error: ServerError) -> Self {
        self.lock().refuse_connections = Some(error);
        self
    }

    /// Every statement received so far, in arrival order.
    #[must_use]
    pub fn executed(&self) -> Vec<ExecutedQuery> {
        self.lock().executed.clone()
    }

    /// Number of connections ever opened.
    #[must_use]
    pub fn connections_opened(&self) -> u32 {
        self.next_connection_id.load(Ordering::SeqCst)
    }

    /// A bb8 manager that opens connections to this server.
    #[must_use]
    pub fn manager(&self) -> MockManager {
        MockManager {
            server: self.clone(),
        }
    }

    fn insert(&self, sql: &str, response: MockResponse, delay: Option<Duration>) {
        self.lock()
            .responses
            .insert(sql.to_string(), (response, delay));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ServerState> {
        self.state.lock().expect("mock server state poisoned")
    }

    fn connect(&self) -> Result<MockConnection, NativeError> {
        if let Some(error) = self.lock().refuse_connections.clone() {
            return Err(error.into());
        }
        let id = self.next_connection_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(MockConnection {
            id,
            server: self.clone(),
        })
    }

    async fn respond(
        &self,
        connection_id: u32,
        options: QueryOptions<'_>,
    ) -> Result<NativeOutput, NativeError> {
        let scripted = {
            let mut state = self.lock();
            state.executed.push(ExecutedQuery {
                connection_id,
                sql: options.sql.to_string(),
                values: options.values.to_vec(),
                rows_as_array: options.rows_as_array,
            });
            state.responses.get(options.sql).cloned()
        };

        let Some((response, delay)) = scripted else {
            return Err(syntax_error(options.sql).into());
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match response {
            MockResponse::Rows { fields, rows } => {
                let rows = rows
                    .iter()
                    .map(|row| {
                        fields
                            .iter()
                            .zip(row)
                            .map(|(field, cell)| {
                                decode(field, cell.as_deref(), options.decoding_for(field))
                            })
                            .collect()
                    })
                    .collect();
                Ok(NativeOutput::rows(fields, rows))
            }
            MockResponse::Header(header) => Ok(NativeOutput::header(header)),
            MockResponse::Error(error) => Err(error.into()),
            MockResponse::Fault(message) => Err(NativeError::other(message)),
        }
    }
}

fn syntax_error(sql: &str) -> ServerError {
    let mut fields = Map::new();
    fields.insert("sql".into(), JsonValue::from(sql));
    fields.insert("fatal".into(), JsonValue::Bool(false));
    ServerError {
        code: Some("ER_PARSE_ERROR".to_string()),
        errno: 1064,
        message: format!("You have an error in your SQL syntax near '{sql}'"),
        state: "42000".to_string(),
        fields,
    }
}

/// Default text-protocol decoding, roughly what a native client does.
fn decode(field: &FieldPacket, cell: Option<&[u8]>, decoding: FieldDecoding) -> RowValues {
    let Some(bytes) = cell else {
        return RowValues::Null;
    };
    let text = String::from_utf8_lossy(bytes).into_owned();
    if decoding == FieldDecoding::Text {
        return RowValues::Text(text);
    }

    match MySqlType::from_code(field.column_type) {
        Some(
            MySqlType::Tiny
            | MySqlType::Short
            | MySqlType::Long
            | MySqlType::Int24
            | MySqlType::Year
            | MySqlType::LongLong,
        ) => text.parse().map_or(RowValues::Text(text), RowValues::Int),
        Some(MySqlType::Float | MySqlType::Double) => {
            text.parse().map_or(RowValues::Text(text), RowValues::Float)
        }
        Some(MySqlType::Timestamp | MySqlType::DateTime) => {
            NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.f")
                .map_or(RowValues::Text(text), RowValues::Timestamp)
        }
        Some(MySqlType::Json) => {
            serde_json::from_str(&text).map_or(RowValues::Text(text), RowValues::JSON)
        }
        Some(MySqlType::Bit) => RowValues::Blob(bytes.to_vec()),
        Some(
            MySqlType::TinyBlob
            | MySqlType::MediumBlob
            | MySqlType::LongBlob
            | MySqlType::Blob
            | MySqlType::VarString
            | MySqlType::String,
        ) if field.character_set == BINARY_CHARSET => RowValues::Blob(bytes.to_vec()),
        _ => RowValues::Text(text),
    }
}

/// One connection to a [`MockServer`].
#[derive(Debug)]
pub struct MockConnection {
    id: u32,
    server: MockServer,
}

impl MockConnection {
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl NativeQueryable for MockConnection {
    #[allow(clippy::manual_async_fn)]
    fn query(
        &self,
        options: QueryOptions<'_>,
    ) -> impl Future<Output = Result<NativeOutput, NativeError>> + Send {
        async move { self.server.respond(self.id, options).await }
    }
}

/// bb8 manager for mock connections.
#[derive(Debug, Clone)]
pub struct MockManager {
    server: MockServer,
}

impl ManageConnection for MockManager {
    type Connection = MockConnection;
    type Error = NativeError;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let server = self.server.clone();
        async move { server.connect() }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        _conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async move { Ok(()) }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}
