use serde::Serialize;
use std::io::Write;

use crate::error::SinkError;
use crate::schema::{Bill, Jurisdiction, VoteEvent};

pub trait Sink {
    fn emit_jurisdiction(&mut self, jurisdiction: &Jurisdiction) -> Result<(), SinkError>;
    fn emit_bill(&mut self, bill: &Bill) -> Result<(), SinkError>;
    fn emit_vote_event(&mut self, vote_event: &VoteEvent) -> Result<(), SinkError>;
}

#[derive(Serialize)]
#[serde(tag = "_type", rename_all = "snake_case")]
enum Record<'a> {
    Jurisdiction(&'a Jurisdiction),
    Bill(&'a Bill),
    VoteEvent(&'a VoteEvent),
}

/// One JSON object per line, tagged with `_type`.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, record: Record<'_>) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Sink for JsonLinesSink<W> {
    fn emit_jurisdiction(&mut self, jurisdiction: &Jurisdiction) -> Result<(), SinkError> {
        self.write(Record::Jurisdiction(jurisdiction))
    }

    fn emit_bill(&mut self, bill: &Bill) -> Result<(), SinkError> {
        self.write(Record::Bill(bill))
    }

    fn emit_vote_event(&mut self, vote_event: &VoteEvent) -> Result<(), SinkError> {
        self.write(Record::VoteEvent(vote_event))
    }
}
