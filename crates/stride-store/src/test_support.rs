//! Shared test utilities for stride-store.
