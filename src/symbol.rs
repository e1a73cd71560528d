use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of a transition.
///
/// Epsilon transitions consume no input and only appear in NFAs.
/// In serialized tables epsilon is written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Symbol {
	Epsilon,
	Input(String),
}

impl Symbol {
	/// Creates a new input symbol.
	pub fn input<S>(symbol: S) -> Self
	where
		S: Into<String>,
	{
		Self::Input(symbol.into())
	}

	pub fn is_epsilon(&self) -> bool {
		matches!(self, Self::Epsilon)
	}

	/// Returns the input symbol, or `None` for epsilon.
	pub fn as_input(&self) -> Option<&str> {
		match self {
			Self::Epsilon => None,
			Self::Input(symbol) => Some(symbol),
		}
	}
}

impl From<Option<String>> for Symbol {
	fn from(symbol: Option<String>) -> Self {
		symbol.map_or(Self::Epsilon, Self::Input)
	}
}

impl From<Symbol> for Option<String> {
	fn from(symbol: Symbol) -> Self {
		match symbol {
			Symbol::Epsilon => None,
			Symbol::Input(symbol) => Some(symbol),
		}
	}
}

impl From<&str> for Symbol {
	fn from(symbol: &str) -> Self {
		Self::input(symbol)
	}
}

impl From<char> for Symbol {
	fn from(symbol: char) -> Self {
		Self::Input(symbol.to_string())
	}
}

impl fmt::Display for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Epsilon => write!(f, "ε"),
			Self::Input(symbol) => write!(f, "{}", symbol),
		}
	}
}
