//! Restricted arithmetic for user-authored character formulas.
//!
//! Hosts let players customise derived numbers such as vitality and the coast
//! number. Formulas are parsed into a small expression tree and evaluated
//! against a character scope; nothing outside that scope is reachable.
//!
//! ## Grammar
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := number | name | name '(' expr (',' expr)* ')' | '(' expr ')'
//! ```
//!
//! Functions: `min`, `max` (one or more arguments), `floor`, `ceil`, `round`.
//!
//! ## Examples
//!
//! ```
//! # use rules_core::formula::{Formula, Scope};
//! # use std::collections::HashMap;
//! let formula = Formula::parse("10 + max(grit, brawn) * 2").unwrap();
//! let scope: HashMap<&str, f64> = [("grit", 3.0), ("brawn", 1.0)].into();
//! assert_eq!(formula.evaluate(&scope).unwrap(), 16.0);
//! ```

pub mod evaluate;
pub mod parse;

use std::collections::HashMap;
use std::str::FromStr;

use crate::character::{Attribute, Character, Skill};
use crate::error::{ErrorSeverity, RulesError};
use crate::progression::BonusTable;

/// Deepest nesting a formula may reach.
pub const MAX_DEPTH: usize = 32;
/// Longest formula text accepted.
pub const MAX_LENGTH: usize = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Function {
    Min,
    Max,
    Floor,
    Ceil,
    Round,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,

    #[error("formula longer than {max} characters")]
    TooLong { max: usize },

    #[error("formula nests deeper than {max} levels")]
    TooDeep { max: usize },

    #[error("unexpected character {found:?} at {position}")]
    UnexpectedChar { found: char, position: usize },

    #[error("unexpected {found} at {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("formula ends unexpectedly")]
    UnexpectedEnd,

    #[error("unknown function {0:?}")]
    UnknownFunction(String),

    #[error("unknown variable {0:?}")]
    UnknownVariable(String),

    #[error("{function} takes {expected}, got {found} argument(s)")]
    Arity {
        function: Function,
        expected: &'static str,
        found: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NonFinite,
}

impl RulesError for FormulaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "formula.empty",
            Self::TooLong { .. } => "formula.too_long",
            Self::TooDeep { .. } => "formula.too_deep",
            Self::UnexpectedChar { .. } => "formula.unexpected_char",
            Self::UnexpectedToken { .. } => "formula.unexpected_token",
            Self::UnexpectedEnd => "formula.unexpected_end",
            Self::UnknownFunction(_) => "formula.unknown_function",
            Self::UnknownVariable(_) => "formula.unknown_variable",
            Self::Arity { .. } => "formula.arity",
            Self::DivisionByZero => "formula.division_by_zero",
            Self::NonFinite => "formula.non_finite",
        }
    }
}

/// Name lookup for formula variables.
pub trait Scope {
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl<S: std::hash::BuildHasher> Scope for HashMap<&str, f64, S> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// Variables visible to character formulas.
///
/// `level`, `boosts` (0 or 1), and every attribute and skill name bound to the
/// bonus of its current tier.
pub struct CharacterScope<'a> {
    character: &'a Character,
    table: BonusTable,
}

impl<'a> CharacterScope<'a> {
    pub fn new(character: &'a Character, table: BonusTable) -> Self {
        Self { character, table }
    }
}

impl Scope for CharacterScope<'_> {
    fn lookup(&self, name: &str) -> Option<f64> {
        match name {
            "level" => return Some(f64::from(self.character.level)),
            "boosts" => return Some(f64::from(u8::from(self.character.progression_boost))),
            _ => {}
        }
        if let Ok(attribute) = Attribute::from_str(name) {
            let tier = self.character.attribute_tier(attribute);
            return Some(f64::from(self.table.get(tier)));
        }
        Skill::from_str(name)
            .ok()
            .map(|skill| f64::from(self.table.get(self.character.skill_tier(skill))))
    }
}

/// A parsed formula together with its source text.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    text: String,
    expr: Expr,
}

impl Formula {
    pub fn parse(text: &str) -> Result<Self, FormulaError> {
        let expr = parse::parse(text)?;
        Ok(Self {
            text: text.to_owned(),
            expr,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn evaluate(&self, scope: &impl Scope) -> Result<f64, FormulaError> {
        evaluate::evaluate(&self.expr, scope)
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

/// Parse and evaluate in one step.
pub fn eval_str(text: &str, scope: &impl Scope) -> Result<f64, FormulaError> {
    Formula::parse(text)?.evaluate(scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::ProgressionTier;

    #[test]
    fn character_scope_binds_tiers_to_bonuses() {
        let mut character = Character::new("Ada", 5);
        character.attributes.insert(Attribute::Grit, ProgressionTier::Awesome);
        character.skills.insert(Skill::Lore, ProgressionTier::Specialty);
        character.progression_boost = true;
        let table = BonusTable::for_level(character.level, character.progression_boost);
        let scope = CharacterScope::new(&character, table);

        assert_eq!(scope.lookup("level"), Some(5.0));
        assert_eq!(scope.lookup("boosts"), Some(1.0));
        assert_eq!(scope.lookup("grit"), Some(f64::from(table.awesome)));
        assert_eq!(scope.lookup("lore"), Some(f64::from(table.specialty)));
        // Unlisted skills sit at mediocre.
        assert_eq!(scope.lookup("stealth"), Some(f64::from(table.mediocre)));
        assert_eq!(scope.lookup("luck"), None);
    }

    #[test]
    fn eval_str_reports_unknown_names() {
        let scope: HashMap<&str, f64> = HashMap::new();
        assert_eq!(
            eval_str("luck + 1", &scope),
            Err(FormulaError::UnknownVariable("luck".into()))
        );
    }
}
