//! Note record used by the `db` subcommands

use paladin_orm::{Column, Record, RecordState, Result, Row, TableDef, Value};

pub const NOTES: TableDef = TableDef::new("notes", &[Column::text("title"), Column::boolean("done")]);

#[derive(Debug, Default)]
pub struct Note {
    state: RecordState,
    title: Option<String>,
    done: bool,
}

impl Note {
    pub fn new(title: impl Into<String>) -> Self {
        let mut note = Self::default();
        note.set_title(title);
        note.set_done(false);
        note
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
        self.state.touch("title");
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
        self.state.touch("done");
    }
}

impl Record for Note {
    const TABLE: TableDef = NOTES;

    fn state(&self) -> &RecordState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RecordState {
        &mut self.state
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("title", self.title.clone().into()),
            ("done", self.done.into()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            state: RecordState::default(),
            title: row.get("title")?,
            done: row.get::<Option<bool>>("done")?.unwrap_or(false),
        })
    }
}
