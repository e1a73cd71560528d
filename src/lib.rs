//! Finite automata with epsilon transitions and their conversion into
//! deterministic automata by subset construction.

mod automaton;
mod closure;
mod convert;
mod dfa;
mod nfa;
mod state;
mod symbol;
mod table;

use state::{Arena, Node};

pub use automaton::{Automaton, AutomatonError};
pub use convert::{subset_construction, DEAD_STATE};
pub use dfa::{DState, Dfa, DfaBuilder, DfaRun};
pub use nfa::{NState, Nfa, NfaBuilder, NfaRun};
pub use state::{State, StateId};
pub use symbol::Symbol;
pub use table::{DfaRow, DfaTable, NfaRow, NfaTable};
