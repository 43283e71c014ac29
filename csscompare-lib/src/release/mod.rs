pub mod download;
pub mod http;
pub mod tag_data;

/// Sent with every request; the hosting API rejects anonymous agents.
pub const USER_AGENT: &str = "csscompare (bootstrap-less-port)";
