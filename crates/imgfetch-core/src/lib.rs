pub mod config;
pub mod logging;

pub mod batch;
pub mod checksum;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod ledger;
pub mod report;
pub mod storage;
pub mod url_model;
pub mod validate;
