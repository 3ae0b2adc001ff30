use sqlx::{self, postgres::PgArguments, postgres::PgRow, FromRow, PgPool, Row};
use uuid::Uuid;

use crate::database::filter::{FilterValue, ListFilter};
use crate::database::manager::DatabaseError;
use crate::database::pagination::PageParams;

/// Generic data access over one table. Every operation is a plain
/// pass-through to PostgreSQL: no caching, no soft deletes, no retry logic.
/// Typed INSERT/UPDATE statements live in the per-entity stores because
/// column lists are entity-specific.
pub struct Repository<T> {
    table_name: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, pool: PgPool) -> Self {
        Self {
            table_name,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    /// One page of rows matching the filter, newest first.
    pub async fn find_page(&self, filter: &ListFilter, page: &PageParams) -> Result<Vec<T>, DatabaseError> {
        let sql = page_sql(self.table_name, filter, page);
        let mut query = sqlx::query_as::<_, T>(&sql);
        for value in filter.values() {
            query = bind_filter_value_as(query, value);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT * FROM \"{}\" WHERE id = $1", self.table_name);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Total rows matching the filter.
    pub async fn count(&self, filter: &ListFilter) -> Result<i64, DatabaseError> {
        let sql = count_sql(self.table_name, filter);
        let mut query = sqlx::query(&sql);
        for value in filter.values() {
            query = bind_filter_value(query, value);
        }
        let row = query.fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    /// Count-based existence check; the primitive behind foreign-key
    /// verification in the controllers.
    pub async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let sql = format!("SELECT COUNT(*) AS count FROM \"{}\" WHERE id = $1", self.table_name);
        let row = sqlx::query(&sql).bind(id).fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }

    /// Hard delete. Returns whether a row was actually removed.
    pub async fn delete_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", self.table_name);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

fn page_sql(table_name: &str, filter: &ListFilter, page: &PageParams) -> String {
    let where_clause = if filter.is_empty() {
        String::new()
    } else {
        format!("WHERE {} ", filter.predicate(1))
    };
    // LIMIT/OFFSET come from PageParams, which clamps to sane values; they
    // are formatted as literals, never client text.
    format!(
        "SELECT * FROM \"{}\" {}ORDER BY \"created_at\" DESC, \"id\" LIMIT {} OFFSET {}",
        table_name,
        where_clause,
        page.limit(),
        page.offset()
    )
}

fn count_sql(table_name: &str, filter: &ListFilter) -> String {
    if filter.is_empty() {
        format!("SELECT COUNT(*) AS count FROM \"{}\"", table_name)
    } else {
        format!(
            "SELECT COUNT(*) AS count FROM \"{}\" WHERE {}",
            table_name,
            filter.predicate(1)
        )
    }
}

fn bind_filter_value<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    value: &FilterValue,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match value {
        FilterValue::Uuid(v) => query.bind(*v),
        FilterValue::Int(v) => query.bind(*v),
        FilterValue::Text(v) => query.bind(v.clone()),
    }
}

fn bind_filter_value_as<'q, O>(
    query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    value: &FilterValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match value {
        FilterValue::Uuid(v) => query.bind(*v),
        FilterValue::Int(v) => query.bind(*v),
        FilterValue::Text(v) => query.bind(v.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_sql_without_filter() {
        let page = PageParams { page: 1, page_size: 20 };
        let sql = page_sql("projects", &ListFilter::new(), &page);
        assert_eq!(
            sql,
            "SELECT * FROM \"projects\" ORDER BY \"created_at\" DESC, \"id\" LIMIT 20 OFFSET 0"
        );
    }

    #[test]
    fn page_sql_with_filter_and_offset() {
        let page = PageParams { page: 3, page_size: 10 };
        let filter = ListFilter::new().eq("project_id", Uuid::nil()).unwrap();
        let sql = page_sql("scenarios", &filter, &page);
        assert_eq!(
            sql,
            "SELECT * FROM \"scenarios\" WHERE \"project_id\" = $1 ORDER BY \"created_at\" DESC, \"id\" LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn count_sql_with_and_without_filter() {
        assert_eq!(
            count_sql("reviews", &ListFilter::new()),
            "SELECT COUNT(*) AS count FROM \"reviews\""
        );
        let filter = ListFilter::new().eq("rating", 5).unwrap();
        assert_eq!(
            count_sql("reviews", &filter),
            "SELECT COUNT(*) AS count FROM \"reviews\" WHERE \"rating\" = $1"
        );
    }
}
