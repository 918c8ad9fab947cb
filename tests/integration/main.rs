//! Integration tests for the book registry server

mod api_tests;
mod common;
mod identity_tests;
mod relation_tests;
