//! Coffee Empire economy engine.
//!
//! Module map, leaves first:
//!   - formula:     pure cost / rate / display formulas
//!   - condition:   unlock predicates shared by upgrades and achievements
//!   - state:       the economy aggregate
//!   - actions:     brew, buy producer, buy upgrade, idle advance
//!   - achievement: milestone evaluator run after every action
//!   - engine:      single owner of a session; events and command queue
//!   - codec/store: save-slot record shape and its SQLite table

pub mod achievement;
mod actions;
pub mod clock;
pub mod codec;
pub mod command;
pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod formula;
pub mod state;
pub mod store;
pub mod types;
pub mod view;
