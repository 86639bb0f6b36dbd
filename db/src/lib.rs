//! Persistence for certbox: the certificate record model and the storage
//! backends that hold it.

pub mod models;
pub mod storage;
