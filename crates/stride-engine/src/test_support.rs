//! Shared test utilities for stride-engine.
