//! Status query: one authenticated `GetUserStatus` call per poll cycle.

mod client;
mod types;
mod wire;

pub use client::{
    body_preview, request_body, status_url, HttpResponse, StatusClient, StatusTransport,
    UreqTransport, BODY_PREVIEW_LIMIT, CSRF_HEADER, STATUS_PATH,
};
pub use types::{CachedStatus, CreditBalance, StatusRecord, SubQuota};
