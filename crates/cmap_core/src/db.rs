use rusqlite::{Connection, params};

use crate::error::SinkError;
use crate::schema::{Bill, Jurisdiction, VoteEvent};
use crate::sink::Sink;

pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    pub fn open(db_path: &str) -> Result<Self, SinkError> {
        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        init(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn init(conn: &Connection) -> Result<(), SinkError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS jurisdictions (
          name TEXT PRIMARY KEY,
          division_id TEXT NOT NULL,
          raw_json TEXT NOT NULL,
          inserted_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
        );

        CREATE TABLE IF NOT EXISTS bills (
          legislative_session TEXT NOT NULL,
          identifier TEXT NOT NULL,
          title TEXT NOT NULL,
          local_classification TEXT,
          action_count INTEGER NOT NULL,
          raw_json TEXT NOT NULL,
          inserted_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
          PRIMARY KEY (legislative_session, identifier)
        );

        CREATE TABLE IF NOT EXISTS vote_events (
          id TEXT PRIMARY KEY,
          legislative_session TEXT NOT NULL,
          bill_identifier TEXT NOT NULL,
          start_date TEXT NOT NULL,
          result TEXT NOT NULL,
          raw_json TEXT NOT NULL,
          inserted_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
        );

        CREATE INDEX IF NOT EXISTS idx_vote_events_bill
          ON vote_events(legislative_session, bill_identifier);
        "#,
    )?;
    Ok(())
}

impl Sink for SqliteSink {
    fn emit_jurisdiction(&mut self, jurisdiction: &Jurisdiction) -> Result<(), SinkError> {
        let raw_json = serde_json::to_string(jurisdiction)?;
        self.conn.execute(
            r#"
            INSERT INTO jurisdictions (name, division_id, raw_json)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO UPDATE SET
              division_id=excluded.division_id,
              raw_json=excluded.raw_json
            "#,
            params![jurisdiction.name, jurisdiction.division_id, raw_json],
        )?;
        Ok(())
    }

    fn emit_bill(&mut self, bill: &Bill) -> Result<(), SinkError> {
        let raw_json = serde_json::to_string(bill)?;
        self.conn.execute(
            r#"
            INSERT INTO bills (
              legislative_session, identifier, title,
              local_classification, action_count, raw_json
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(legislative_session, identifier) DO UPDATE SET
              title=excluded.title,
              local_classification=excluded.local_classification,
              action_count=excluded.action_count,
              raw_json=excluded.raw_json
            "#,
            params![
                bill.legislative_session,
                bill.identifier,
                bill.title,
                bill.extras.local_classification,
                bill.actions.len() as i64,
                raw_json
            ],
        )?;
        Ok(())
    }

    fn emit_vote_event(&mut self, vote_event: &VoteEvent) -> Result<(), SinkError> {
        let raw_json = serde_json::to_string(vote_event)?;
        let result = serde_json::to_value(vote_event.result)?;
        self.conn.execute(
            r#"
            INSERT INTO vote_events (
              id, legislative_session, bill_identifier, start_date, result, raw_json
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
              start_date=excluded.start_date,
              result=excluded.result,
              raw_json=excluded.raw_json
            "#,
            params![
                vote_event.id,
                vote_event.legislative_session,
                vote_event.bill_identifier,
                vote_event.start_date,
                result.as_str().unwrap_or_default(),
                raw_json
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BillExtras, OrganizationRef, VoteResult};

    fn bill(title: &str) -> Bill {
        Bill {
            identifier: "23-0001".into(),
            legislative_session: "2023".into(),
            title: title.into(),
            classification: None,
            from_organization: OrganizationRef {
                name: "CMAP Board of Directors".into(),
            },
            actions: Vec::new(),
            sponsorships: Vec::new(),
            subjects: Vec::new(),
            documents: Vec::new(),
            versions: Vec::new(),
            related_bills: Vec::new(),
            sources: Vec::new(),
            extras: BillExtras {
                local_classification: Some("Resolution".into()),
            },
        }
    }

    #[test]
    fn bills_upsert_on_session_and_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmap.db");
        let mut sink = SqliteSink::open(path.to_str().unwrap()).unwrap();

        sink.emit_bill(&bill("first title")).unwrap();
        sink.emit_bill(&bill("second title")).unwrap();

        let (count, title): (i64, String) = sink
            .connection()
            .query_row("SELECT COUNT(*), MAX(title) FROM bills", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(title, "second title");
    }

    #[test]
    fn vote_events_store_result_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmap.db");
        let mut sink = SqliteSink::open(path.to_str().unwrap()).unwrap();

        let vote_event = VoteEvent {
            id: "2023/23-0001/1".into(),
            legislative_session: "2023".into(),
            motion_text: "approved".into(),
            organization: OrganizationRef {
                name: "CMAP Board of Directors".into(),
            },
            classification: Some("passage".into()),
            start_date: "2023-01-10".into(),
            result: VoteResult::Fail,
            bill_identifier: "23-0001".into(),
            bill_action: "approved".into(),
            votes: Vec::new(),
            counts: Vec::new(),
            sources: Vec::new(),
        };
        sink.emit_vote_event(&vote_event).unwrap();

        let result: String = sink
            .connection()
            .query_row("SELECT result FROM vote_events WHERE id = ?1", ["2023/23-0001/1"], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(result, "fail");
    }
}
