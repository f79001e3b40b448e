use async_trait::async_trait;
use sqlx::FromRow;
use std::collections::HashMap;
use std::fmt;

use crate::database::{Connection, ErrorExt, ErrorExt2, Pool, Result};

/// A user account whose email address is shared with at least one
/// other account, once lower-cased.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct DuplicateEmailRow {
    pub email: String,
    pub username: String,
}

impl DuplicateEmailRow {
    #[tracing::instrument(skip(conn))]
    pub async fn fetch_all(conn: &mut Connection, table: &str) -> Result<Vec<Self>> {
        let query = duplicate_emails_query(table);
        sqlx::query_as::<_, Self>(&query)
            .fetch_all(conn)
            .await
            .into_db_error()
    }
}

/// Builds the query listing every account sharing its lower-cased
/// email address with another account, ordered by address then username.
///
/// `table` has to be a plain identifier (see
/// [`is_valid_table_affix`](crate::util::validation::is_valid_table_affix)),
/// it is quoted but not escaped.
pub fn duplicate_emails_query(table: &str) -> String {
    format!(
        r#"SELECT lower(email) AS email, username
FROM "{table}"
WHERE lower(email) IN (
    SELECT lower(email)
    FROM "{table}"
    GROUP BY lower(email)
    HAVING COUNT(*) > 1
)
ORDER BY lower(email), username"#
    )
}

/// Lower-cased email addresses mapped to the usernames sharing them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DuplicateEmails {
    groups: Vec<(String, Vec<String>)>,
}

impl DuplicateEmails {
    /// Groups rows by their email as the store returned it, which is
    /// already lower-cased by the database. Groups and usernames keep
    /// the order of the rows, so the database collation decides it.
    /// Addresses owned by a single account are dropped.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = DuplicateEmailRow>,
    {
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for DuplicateEmailRow { email, username } in rows {
            if let Some(&position) = positions.get(&email) {
                groups[position].1.push(username);
            } else {
                positions.insert(email.clone(), groups.len());
                groups.push((email, vec![username]));
            }
        }
        groups.retain(|(_, usernames)| usernames.len() > 1);

        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn get(&self, email: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(group, _)| group == email)
            .map(|(_, usernames)| usernames.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(email, usernames)| (email.as_str(), usernames.as_slice()))
    }
}

/// `a@b.org (alice, bob); c@d.org (carol, dave)`
impl fmt::Display for DuplicateEmails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (email, usernames)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{email} ({})", usernames.join(", "))?;
        }
        Ok(())
    }
}

/// Read access to the tracker's user accounts.
#[async_trait]
pub trait UserStore: Send {
    /// Every account whose lower-cased email address is used by more
    /// than one account, ordered by lower-cased email then username.
    async fn duplicate_emails(&mut self) -> Result<Vec<DuplicateEmailRow>>;
}

const TIMEOUT_HINT: &str = "database did not answer within the configured timeout";

/// [`UserStore`] backed by the tracker's Postgres database.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: Pool,
    table: String,
}

impl PgUserStore {
    pub fn new(pool: Pool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[tracing::instrument(skip_all)]
    async fn duplicate_emails(&mut self) -> Result<Vec<DuplicateEmailRow>> {
        let mut conn = self.pool.get().await.map_err(|e| {
            if e.is_unhealthy() {
                e.attach_printable(TIMEOUT_HINT)
            } else {
                e
            }
        })?;
        let rows = DuplicateEmailRow::fetch_all(&mut conn, &self.table).await?;
        tracing::debug!(
            table = %self.table,
            rows = rows.len(),
            "fetched accounts with duplicated emails"
        );
        Ok(rows)
    }
}
