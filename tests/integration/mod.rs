//! Integration tests for action generation, replay and pagination.

mod common;
mod pagination;
mod properties;
mod scenarios;
