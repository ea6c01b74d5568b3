pub mod feed;
pub mod incident;
pub mod storage;
pub mod sync;
