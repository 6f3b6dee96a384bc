//! Infrastructure layer - database adapters

pub mod storage;
