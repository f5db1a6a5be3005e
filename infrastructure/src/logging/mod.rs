//! Logging infrastructure — structured audit logging.
//!
//! Provides [`JsonlAuditLogger`], a JSONL file writer that implements the
//! [`AuditLog`](agora_application::AuditLog) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlAuditLogger;
