// Document backend for the category store
// One logical JSON document per doc_id, last-write-wins upserts. The handle is
// created once and reused for the life of the process; reset() drops it so a
// later call can retry after a failure.

use rusqlite::{params, Connection};

use crate::error::Result;

/// Fixed identity of the category document.
pub const CATEGORIES_DOC_ID: &str = "categories_doc";

/// Connection-lifecycle object around the backing store.
///
/// `connect()` opens and caches the handle on first use; every later call
/// reuses it. There is no automatic retry: after a failure the owner may call
/// `reset()` and try again on the next operation.
pub struct DocStore {
    path: String,
    conn: Option<Connection>,
}

impl DocStore {
    pub fn new(path: impl Into<String>) -> Self {
        DocStore {
            path: path.into(),
            conn: None,
        }
    }

    /// Open (or reuse) the connection and make sure the documents table exists.
    pub fn connect(&mut self) -> Result<&Connection> {
        if self.conn.is_none() {
            let conn = Connection::open(&self.path)?;

            // WAL for crash recovery; harmless on :memory: databases
            conn.pragma_update(None, "journal_mode", "WAL")?;

            conn.execute(
                "CREATE TABLE IF NOT EXISTS documents (
                    doc_id TEXT PRIMARY KEY,
                    body TEXT NOT NULL,
                    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;

            self.conn = Some(conn);
        }

        Ok(self.conn.as_ref().expect("connection cached above"))
    }

    /// Drop the cached handle so the next operation reconnects.
    pub fn reset(&mut self) {
        self.conn = None;
    }

    /// Fetch a document body by id. `None` when the document does not exist.
    pub fn fetch(&mut self, doc_id: &str) -> Result<Option<String>> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare("SELECT body FROM documents WHERE doc_id = ?1")?;
        let mut rows = stmt.query(params![doc_id])?;

        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Idempotent whole-document upsert: overwrites the body wholesale.
    pub fn upsert(&mut self, doc_id: &str, body: &str) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO documents (doc_id, body, updated_at)
             VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(doc_id) DO UPDATE SET
                body = excluded.body,
                updated_at = CURRENT_TIMESTAMP",
            params![doc_id, body],
        )?;

        Ok(())
    }

    /// Targeted single-field update: append one keyword to the named
    /// category's keyword array, without rewriting the rest of the document.
    ///
    /// The entry is addressed by category name in the *stored* document, so
    /// the append lands correctly even when in-memory positions have drifted
    /// from the persisted ones. Returns false when the document or the named
    /// category is missing, in which case the caller falls back to a
    /// whole-document upsert.
    pub fn append_keyword(&mut self, doc_id: &str, category: &str, keyword: &str) -> Result<bool> {
        let conn = self.connect()?;

        // json_each walks the stored array; je.key is the element index, so
        // the '[#]' append path is built against the document itself rather
        // than a caller-supplied position.
        let changed = conn.execute(
            "UPDATE documents
             SET body = json_insert(
                     body,
                     '$.categories[' || (
                         SELECT je.key FROM json_each(body, '$.categories') AS je
                         WHERE json_extract(je.value, '$.name') = ?2
                     ) || '].keywords[#]',
                     ?3
                 ),
                 updated_at = CURRENT_TIMESTAMP
             WHERE doc_id = ?1
               AND EXISTS (
                     SELECT 1 FROM json_each(body, '$.categories') AS je
                     WHERE json_extract(je.value, '$.name') = ?2
                 )",
            params![doc_id, category, keyword],
        )?;

        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> DocStore {
        DocStore::new(":memory:")
    }

    #[test]
    fn test_fetch_missing_document() {
        let mut store = memory_store();
        assert_eq!(store.fetch(CATEGORIES_DOC_ID).unwrap(), None);
    }

    #[test]
    fn test_upsert_overwrites_wholesale() {
        let mut store = memory_store();

        store.upsert("doc", r#"{"categories":[]}"#).unwrap();
        store
            .upsert("doc", r#"{"categories":[{"name":"A","keywords":[]}]}"#)
            .unwrap();

        let body = store.fetch("doc").unwrap().unwrap();
        assert!(body.contains("\"A\""));
    }

    #[test]
    fn test_append_keyword_targets_named_category() {
        let mut store = memory_store();
        store
            .upsert(
                "doc",
                r#"{"categories":[{"name":"Subscriptions","keywords":["spotify"]},{"name":"Groceries","keywords":[]}]}"#,
            )
            .unwrap();

        assert!(store.append_keyword("doc", "Groceries", "trader joes").unwrap());

        let body = store.fetch("doc").unwrap().unwrap();
        let doc: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(doc["categories"][1]["keywords"][0], "trader joes");
        // Other entry untouched
        assert_eq!(doc["categories"][0]["keywords"][0], "spotify");
    }

    #[test]
    fn test_append_keyword_missing_document_reports_false() {
        let mut store = memory_store();
        assert!(!store.append_keyword("doc", "Groceries", "coffee").unwrap());
    }

    #[test]
    fn test_append_keyword_unknown_category_reports_false() {
        let mut store = memory_store();
        store.upsert("doc", r#"{"categories":[]}"#).unwrap();
        assert!(!store.append_keyword("doc", "Groceries", "coffee").unwrap());
    }

    #[test]
    fn test_append_keyword_whitespace_body_not_rewritten_on_miss() {
        // A document written by an external tool may carry whitespace; a
        // failed append must leave it byte-identical and report false, not
        // rewrite it minified without the keyword.
        let mut store = memory_store();
        let pretty = "{\n  \"categories\": [\n    { \"name\": \"A\", \"keywords\": [] }\n  ]\n}";
        store.upsert("doc", pretty).unwrap();

        assert!(!store.append_keyword("doc", "Missing", "coffee").unwrap());
        assert_eq!(store.fetch("doc").unwrap().unwrap(), pretty);
    }

    #[test]
    fn test_append_keyword_whitespace_body_still_appends() {
        let mut store = memory_store();
        let pretty = "{\n  \"categories\": [\n    { \"name\": \"A\", \"keywords\": [] }\n  ]\n}";
        store.upsert("doc", pretty).unwrap();

        assert!(store.append_keyword("doc", "A", "coffee").unwrap());

        let body = store.fetch("doc").unwrap().unwrap();
        let doc: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(doc["categories"][0]["keywords"][0], "coffee");
    }

    #[test]
    fn test_reset_allows_reconnect() {
        let mut store = memory_store();
        store.upsert("doc", "{}").unwrap();
        store.reset();
        // :memory: databases start fresh per connection; the point here is
        // that operations still work after a reset.
        assert_eq!(store.fetch("doc").unwrap(), None);
    }
}
