//! End-to-end tests of the HTTP surface live in `tests/`; this crate has no library code.
