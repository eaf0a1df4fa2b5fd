//! Supabase REST (PostgREST) adapter for the table store port.
//!
//! Queries translate to PostgREST's URL dialect: `select=` with embedded
//! resources, `column=eq.value` filters and `order=column.desc`. Writes ask
//! for `return=representation` so callers get the stored rows back, and
//! counts use a `HEAD` request with `count=exact`.

use async_trait::async_trait;
use reqwest::header::{CONTENT_RANGE, HeaderMap};
use reqwest::{Method, RequestBuilder, Url};
use serde_json::Value;
use tracing::debug;

use super::auth::error_message;
use super::client::{SupabaseClient, TransportFailure, map_status, map_transport_error};
use crate::domain::ports::{Filter, Row, Table, TableQuery, TableStore, TableStoreError};

const PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";
const COUNT_EXACT: &str = "count=exact";

/// Table store backed by a Supabase project's REST interface.
#[derive(Clone)]
pub struct SupabaseTables {
    client: SupabaseClient,
}

impl SupabaseTables {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn table_url(&self, table: Table) -> Url {
        self.client.endpoint(&format!("rest/v1/{}", table.name()))
    }

    async fn fetch_rows(&self, request: RequestBuilder) -> Result<Vec<Row>, TableStoreError> {
        let response = request
            .send()
            .await
            .map_err(|err| map_failure(map_transport_error(err)))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| map_failure(map_transport_error(err)))?;
        if !status.is_success() {
            return Err(map_failure(map_status(status, &error_message(&body))));
        }
        parse_rows(&body)
    }
}

fn map_failure(failure: TransportFailure) -> TableStoreError {
    match failure {
        TransportFailure::Connection(message) => TableStoreError::connection(message),
        TransportFailure::Rejected(message) => TableStoreError::rejected(message),
        TransportFailure::Server(message) => TableStoreError::query(message),
    }
}

fn parse_rows(body: &[u8]) -> Result<Vec<Row>, TableStoreError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| TableStoreError::decode(format!("invalid REST payload: {err}")))?;
    let Value::Array(items) = value else {
        return Err(TableStoreError::decode("expected a JSON array of rows"));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(row) => Ok(row),
            other => Err(TableStoreError::decode(format!(
                "expected row object, got {other}"
            ))),
        })
        .collect()
}

/// Render a filter as a `(column, operator.value)` query pair.
fn filter_pair(filter: &Filter) -> (&'static str, String) {
    let operand = match &filter.value {
        Value::Null => return (filter.column, "is.null".to_owned()),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    (filter.column, format!("eq.{operand}"))
}

fn select_clause(query: &TableQuery) -> String {
    let mut clause = String::from("*");
    for embed in &query.embeds {
        clause.push(',');
        clause.push_str(embed.table.name());
        clause.push('(');
        clause.push_str(&embed.columns.join(","));
        clause.push(')');
    }
    clause
}

fn append_filters(url: &mut Url, filters: &[Filter]) {
    let mut pairs = url.query_pairs_mut();
    for filter in filters {
        let (column, value) = filter_pair(filter);
        pairs.append_pair(column, &value);
    }
}

fn select_url(mut url: Url, query: &TableQuery) -> Url {
    url.query_pairs_mut()
        .append_pair("select", &select_clause(query));
    append_filters(&mut url, &query.filters);
    if let Some(order) = query.order {
        let direction = if order.descending { "desc" } else { "asc" };
        url.query_pairs_mut()
            .append_pair("order", &format!("{}.{direction}", order.column));
    }
    url
}

/// Total from a `Content-Range` header such as `0-9/42` or `*/0`.
fn parse_content_range(headers: &HeaderMap) -> Result<u64, TableStoreError> {
    let raw = headers
        .get(CONTENT_RANGE)
        .ok_or_else(|| TableStoreError::decode("count response missing Content-Range"))?
        .to_str()
        .map_err(|err| TableStoreError::decode(format!("invalid Content-Range: {err}")))?;
    raw.rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse::<u64>().ok())
        .ok_or_else(|| TableStoreError::decode(format!("invalid Content-Range: {raw}")))
}

#[async_trait]
impl TableStore for SupabaseTables {
    async fn insert(&self, table: Table, row: Row) -> Result<Vec<Row>, TableStoreError> {
        let request = self
            .client
            .request(Method::POST, self.table_url(table))
            .header(PREFER, RETURN_REPRESENTATION)
            .json(&row);
        let rows = self.fetch_rows(request).await?;
        debug!(table = table.name(), returned = rows.len(), "supabase insert");
        Ok(rows)
    }

    async fn select(&self, query: &TableQuery) -> Result<Vec<Row>, TableStoreError> {
        let url = select_url(self.table_url(query.table), query);
        let rows = self
            .fetch_rows(self.client.request(Method::GET, url))
            .await?;
        debug!(
            table = query.table.name(),
            filters = ?query.filters,
            returned = rows.len(),
            "supabase select"
        );
        Ok(rows)
    }

    async fn update(
        &self,
        table: Table,
        changes: Row,
        filters: &[Filter],
    ) -> Result<Vec<Row>, TableStoreError> {
        let mut url = self.table_url(table);
        append_filters(&mut url, filters);
        let request = self
            .client
            .request(Method::PATCH, url)
            .header(PREFER, RETURN_REPRESENTATION)
            .json(&changes);
        let rows = self.fetch_rows(request).await?;
        debug!(table = table.name(), ?filters, updated = rows.len(), "supabase update");
        Ok(rows)
    }

    async fn count(&self, table: Table, filters: &[Filter]) -> Result<u64, TableStoreError> {
        let mut url = self.table_url(table);
        url.query_pairs_mut().append_pair("select", "id");
        append_filters(&mut url, filters);
        let response = self
            .client
            .request(Method::HEAD, url)
            .header(PREFER, COUNT_EXACT)
            .send()
            .await
            .map_err(|err| map_failure(map_transport_error(err)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(map_failure(map_status(status, "")));
        }
        let count = parse_content_range(response.headers())?;
        debug!(table = table.name(), ?filters, count, "supabase count");
        Ok(count)
    }
}
