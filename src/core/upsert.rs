//! Insert-or-update statement rendering.

use crate::db::session::Dialect;
use crate::models::RecordClass;

/// A rendered upsert for one record class. Placeholders follow the order of
/// `RecordClass::fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertStatement {
    pub sql: String,
}

impl UpsertStatement {
    pub fn for_class(class: &RecordClass, dialect: Dialect) -> Self {
        let q = |ident: &str| dialect.quote(ident);

        let columns = class.columns().map(q).collect::<Vec<_>>();
        let placeholders = vec!["?"; columns.len()].join(", ");

        // The conflict key is never rewritten, whatever the class lists.
        let updates = class
            .update_columns
            .iter()
            .filter(|c| **c != class.conflict_key)
            .map(|c| {
                let col = q(*c);
                match dialect {
                    Dialect::MySql => format!("{col} = VALUES({col})"),
                    Dialect::Sqlite => format!("{col} = excluded.{col}"),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let conflict = match dialect {
            Dialect::MySql => format!("ON DUPLICATE KEY UPDATE {updates}"),
            Dialect::Sqlite => format!(
                "ON CONFLICT ({}) DO UPDATE SET {updates}",
                q(class.conflict_key)
            ),
        };

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) {}",
            q(class.table),
            columns.join(", "),
            placeholders,
            conflict
        );

        Self { sql }
    }
}
