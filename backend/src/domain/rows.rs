//! Helpers shared by services that read and write table store rows.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::Error;
use crate::domain::ports::{Row, TableStoreError};

/// Decode store rows into domain records.
pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, Error> {
    rows.into_iter().map(decode_row).collect()
}

pub(crate) fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T, Error> {
    serde_json::from_value(Value::Object(row))
        .map_err(|err| Error::internal(format!("unexpected row shape: {err}")))
}

/// Encode a record as a store row. Records must serialise to JSON objects.
pub(crate) fn encode_row<T: Serialize>(record: &T) -> Result<Row, Error> {
    match serde_json::to_value(record) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(other) => Err(Error::internal(format!(
            "record did not encode to an object: {other}"
        ))),
        Err(err) => Err(Error::internal(format!("failed to encode record: {err}"))),
    }
}

/// Default translation of store failures into domain errors.
///
/// Rejections are the caller's fault (constraint violations, bad references)
/// and surface as `invalid_request`; connectivity maps to
/// `service_unavailable`; everything else is internal.
pub(crate) fn map_store_error(error: TableStoreError) -> Error {
    match error {
        TableStoreError::Connection { message } => {
            Error::service_unavailable(format!("backend unavailable: {message}"))
        }
        TableStoreError::Rejected { message } => Error::invalid_request(message),
        TableStoreError::Query { message } => {
            Error::internal(format!("backend query failed: {message}"))
        }
        TableStoreError::Decode { message } => {
            Error::internal(format!("backend response malformed: {message}"))
        }
    }
}
