use paladin_orm::{
    Backend, Column, Filters, Record, RecordState, Result, Row, SqliteBackend, TableDef, Value,
};
use std::sync::Mutex;

pub const USERS: TableDef = TableDef::new("users", &[Column::text("name"), Column::integer("age")]);

/// Minimal user model used across the record tests
#[derive(Debug, Default)]
pub struct User {
    state: RecordState,
    name: Option<String>,
    age: Option<i64>,
}

#[allow(dead_code)]
impl User {
    pub fn new(name: &str) -> Self {
        let mut user = Self::default();
        user.set_name(name);
        user
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
        self.state.touch("name");
    }

    pub fn age(&self) -> Option<i64> {
        self.age
    }

    pub fn set_age(&mut self, age: Option<i64>) {
        self.age = age;
        self.state.touch("age");
    }
}

impl Record for User {
    const TABLE: TableDef = USERS;

    fn state(&self) -> &RecordState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RecordState {
        &mut self.state
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![("name", self.name.clone().into()), ("age", self.age.into())]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            state: RecordState::default(),
            name: row.get("name")?,
            age: row.get("age")?,
        })
    }
}

/// One call observed by `RecordingBackend`
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum Call {
    Insert(Vec<(String, Value)>),
    Update(i64, Vec<(String, Value)>),
    Select,
    Delete(Filters),
    DeleteAll,
}

impl Call {
    pub fn is_write(&self) -> bool {
        !matches!(self, Call::Select)
    }
}

fn owned(values: &[(&str, Value)]) -> Vec<(String, Value)> {
    values
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// SQLite backend that records every call it forwards
pub struct RecordingBackend {
    inner: SqliteBackend,
    calls: Mutex<Vec<Call>>,
}

#[allow(dead_code)]
impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            inner: new_backend(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &SqliteBackend {
        &self.inner
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for RecordingBackend {
    fn insert(&self, table: &str, values: &[(&str, Value)]) -> Result<i64> {
        self.record(Call::Insert(owned(values)));
        self.inner.insert(table, values)
    }

    fn update(&self, table: &str, id: i64, values: &[(&str, Value)]) -> Result<usize> {
        self.record(Call::Update(id, owned(values)));
        self.inner.update(table, id, values)
    }

    fn select(
        &self,
        table: &str,
        filters: &Filters,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Row>> {
        self.record(Call::Select);
        self.inner.select(table, filters, limit, offset)
    }

    fn delete(&self, table: &str, filters: &Filters) -> Result<usize> {
        self.record(Call::Delete(filters.clone()));
        self.inner.delete(table, filters)
    }

    fn delete_all(&self, table: &str) -> Result<usize> {
        self.record(Call::DeleteAll);
        self.inner.delete_all(table)
    }
}

/// In-memory SQLite backend with the users table created
pub fn new_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to open in-memory database");
    let mut conn = backend.connection().expect("Failed to check out connection");
    paladin_orm::ensure_tables(&mut conn, &[&USERS]).expect("Failed to create users table");
    drop(conn);
    backend
}
