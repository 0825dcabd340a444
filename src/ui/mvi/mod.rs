//! Model-View-Intent (MVI) architecture primitives.
//!
//! Base traits for unidirectional data flow between the intent sources,
//! the feed engine and the display adapter.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot of what should be displayed
//! - **Intent**: User requests or fetch outcomes
//! - **Reducer**: Pure function that transforms state based on intents

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
