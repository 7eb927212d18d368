// ABOUTME: Sync orchestration: sessions, generations, buses and the reconciliation engine
// ABOUTME: Wires provider samples into pod writes month by month
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Single-slot broadcast channels
pub mod bus;
/// Load chain and month loop
pub mod engine;
/// Cooperative cancellation tokens
pub mod generation;
/// Identity-driven session lifecycle
pub mod manager;
/// Calendar month windows
pub mod month;
/// Pure reconciliation planning
pub mod reconcile;
/// Per-identity state
pub mod session;

pub use bus::Bus;
pub use engine::{EngineState, LoadedSession, RunSummary, SyncBuses, SyncEngine};
pub use generation::{GenerationCounter, GenerationToken};
pub use manager::{Identity, SessionManager};
pub use month::MonthWindow;
pub use reconcile::{
    collapse_heart_rate, plan_month, reconcile_daily, reconcile_heart_rate, Create, Modify,
    MonthSamples, ReconcilePlan, ReconcileRules,
};
pub use session::{FitnessSnapshot, Session};
