use alloc::borrow::ToOwned;
use alloc::string::String;
use core::fmt;

use bitflags::bitflags;

use crate::model::Lexicon;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

bitflags! {
    /// Boolean processing switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct Switches: u16 {
        /// Emit one proposition per clause with every argument as its own field.
        const NARY = 1;
        /// Treat SVA clauses conservatively: the first post-verb adverbial is required.
        const CONSERVATIVE_SVA = 1 << 1;
        /// Same for SVOA.
        const CONSERVATIVE_SVOA = 1 << 2;
        const COORDINATION_ON_VERBS = 1 << 3;
        const COORDINATION_ON_NON_VERBS = 1 << 4;
        /// Derive "X is Y" clauses from appositions.
        const APPOSITIONS = 1 << 5;
        /// Derive "X has Y" clauses from possessives.
        const POSSESSIVES = 1 << 6;
        /// Derive clauses from participial modifiers.
        const PARTICIPIAL_MODIFIERS = 1 << 7;
        /// Render lemmas instead of surface words.
        const LEMMATIZE = 1 << 8;
    }
}

impl Default for Switches {
    fn default() -> Self {
        Switches::CONSERVATIVE_SVA
            | Switches::COORDINATION_ON_VERBS
            | Switches::COORDINATION_ON_NON_VERBS
            | Switches::APPOSITIONS
            | Switches::POSSESSIVES
            | Switches::PARTICIPIAL_MODIFIERS
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    MissingOption(&'static str),
    InvalidBounds { min: usize, max: usize },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::MissingOption(name) => write!(f, "missing required option: {}", name),
            ConfigurationError::InvalidBounds { min, max } => write!(
                f,
                "optional argument bounds are inverted: min {} > max {}",
                min, max
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigurationError {}

/// Read-only options shared by detection and generation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Configuration {
    pub switches: Switches,
    /// Lower bound on optional arguments per triple-mode proposition.
    pub min_optional_args: usize,
    /// Upper bound on optional arguments per triple-mode proposition.
    pub max_optional_args: usize,
    pub apposition_verb: String,
    pub possessive_verb: String,
    pub lexicon: Lexicon,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            switches: Switches::default(),
            min_optional_args: 0,
            max_optional_args: 1,
            apposition_verb: "is".to_owned(),
            possessive_verb: "has".to_owned(),
            lexicon: Lexicon::english(),
        }
    }
}

impl Configuration {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.apposition_verb.trim().is_empty() {
            return Err(ConfigurationError::MissingOption("apposition_verb"));
        }
        if self.possessive_verb.trim().is_empty() {
            return Err(ConfigurationError::MissingOption("possessive_verb"));
        }
        if self.lexicon.copular.is_empty() {
            return Err(ConfigurationError::MissingOption("lexicon.copular"));
        }
        if self.min_optional_args > self.max_optional_args {
            return Err(ConfigurationError::InvalidBounds {
                min: self.min_optional_args,
                max: self.max_optional_args,
            });
        }
        Ok(())
    }

    pub fn nary(&self) -> bool {
        self.switches.contains(Switches::NARY)
    }

    pub fn lemmatize(&self) -> bool {
        self.switches.contains(Switches::LEMMATIZE)
    }

    pub fn conservative_sva(&self) -> bool {
        self.switches.contains(Switches::CONSERVATIVE_SVA)
    }

    pub fn conservative_svoa(&self) -> bool {
        self.switches.contains(Switches::CONSERVATIVE_SVOA)
    }

    pub fn coordination_on_verbs(&self) -> bool {
        self.switches.contains(Switches::COORDINATION_ON_VERBS)
    }

    pub fn coordination_on_non_verbs(&self) -> bool {
        self.switches.contains(Switches::COORDINATION_ON_NON_VERBS)
    }

    pub fn appositions(&self) -> bool {
        self.switches.contains(Switches::APPOSITIONS)
    }

    pub fn possessives(&self) -> bool {
        self.switches.contains(Switches::POSSESSIVES)
    }

    pub fn participial_modifiers(&self) -> bool {
        self.switches.contains(Switches::PARTICIPIAL_MODIFIERS)
    }

    pub fn with_switch(mut self, switch: Switches, enabled: bool) -> Self {
        self.switches.set(switch, enabled);
        self
    }
}
