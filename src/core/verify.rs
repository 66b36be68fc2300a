//! Row counts per target table, for a quick post-cutover sanity check.

use crate::db::session::SqlSession;
use crate::errors::AppResult;
use crate::models::RecordKind;
use crate::utils::table::{Column, Table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub kind: RecordKind,
    pub table: &'static str,
    pub rows: i64,
}

pub fn count_rows<S: SqlSession + ?Sized>(session: &mut S) -> AppResult<Vec<TableCount>> {
    let dialect = session.dialect();
    let mut counts = Vec::new();

    for kind in RecordKind::ORDER {
        let table = kind.class().table;
        let rows = session.query_count(&format!("SELECT COUNT(*) FROM {}", dialect.quote(table)))?;
        counts.push(TableCount { kind, table, rows });
    }

    Ok(counts)
}

pub fn render(counts: &[TableCount]) -> String {
    let mut table = Table::new(vec![
        Column {
            header: "CLASS".into(),
            width: 16,
        },
        Column {
            header: "TABLE".into(),
            width: 16,
        },
        Column {
            header: "ROWS".into(),
            width: 8,
        },
    ]);

    for c in counts {
        table.add_row(vec![
            c.kind.plural().to_string(),
            c.table.to_string(),
            c.rows.to_string(),
        ]);
    }

    table.render()
}
