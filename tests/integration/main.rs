//! End-to-end tests driving the Axum router against in-memory storage.

mod helpers;

mod auth_test;
mod document_test;
mod share_test;
mod shorturl_test;
