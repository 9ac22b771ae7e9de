//! Response envelope for operation-style endpoints.
//!
//! Plain CRUD handlers return the entity JSON directly; endpoints that
//! report on an operation (sync, regenerate, bulk price, remote
//! catalog) wrap their payload as `{ "data": ... }`.

use serde::Serialize;

/// `{ "data": T }` wrapper.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
