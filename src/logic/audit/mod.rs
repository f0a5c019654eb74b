//! Audit Module - Decision log
//!
//! Mỗi quyết định urgency được ghi lại (JSONL, tự rotate) để operator truy vết sau.
//! Ghi log thất bại KHÔNG làm hỏng quyết định - chỉ log error.

pub mod record;
pub mod writer;

#[cfg(test)]
mod tests;

pub use record::AuditRecord;
pub use writer::{AuditWriter, DEFAULT_MAX_FILE_SIZE};
