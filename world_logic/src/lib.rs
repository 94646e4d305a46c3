//! # World Logic
//!
//! The symbolic planning substrate underneath content generation. It holds a typed
//! logic of facts and rules, and the machinery to ask two questions of any world state:
//! "what actions are possible from here" and "what action, reversed, could have led here".
//!
//! ## Core Components
//!
//! - **types**: Type hierarchy and globally known constants
//! - **terms**: Variables (bound objects) and placeholders (typed slots in rule templates)
//! - **logic**: Propositions, rules and grounded actions
//! - **state**: Fact sets, STRIPS-style application and the instantiation engine
//! - **reversal**: Derivation of inverse rules
//!
//! ## Design Philosophy
//!
//! - **Pure**: No I/O, no global state; registries are passed in by reference
//! - **Deterministic**: Enumeration order depends only on the state's fact order and the rule
//! - **Fail-fast**: Ill-typed or incomplete bindings and inapplicable actions are errors, never coerced

mod error;
pub mod logic;
pub mod record;
pub mod reversal;
pub mod state;
pub mod terms;
pub mod types;

pub use error::*;
pub use logic::*;
pub use record::*;
pub use reversal::*;
pub use state::*;
pub use terms::*;
pub use types::*;
