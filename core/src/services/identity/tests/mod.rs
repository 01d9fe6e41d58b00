//! Tests for the identity service
