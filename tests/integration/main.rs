//! Integration tests for the bookshelf HTTP API

mod api_tests;
mod common;
