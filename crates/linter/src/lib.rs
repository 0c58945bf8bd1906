mod error;
mod functions;
mod motor;
mod registry;
mod results;
mod rule;
mod traits;

pub mod path;
pub mod rulesets;
pub mod schema;

pub use error::{ConfigError, MotorError, Result};
pub use functions::{
    AlphabeticalFunctionImpl, ApiServersFunctionImpl, PatternFunctionImpl, TruthyFunctionImpl,
    XorFunctionImpl,
};
pub use motor::{apply_rules, Motor, MotorConfig};
pub use path::{JsonPath, PathError, ResolvedNode};
pub use registry::FunctionRegistry;
pub use results::{RuleFunctionResult, RuleResult, RuleResultSet, SpecInfo};
pub use rule::{Rule, RuleAction, RuleSet};
pub use schema::{
    validate_options, OptionError, OptionKind, OptionProperty, OptionValue, RuleFunctionSchema,
    RuleOptions,
};
pub use traits::{RuleFunction, RuleFunctionContext};

pub use oaslint_index::{DocumentIndex, ParseError};
pub use oaslint_types::{Position, Range, RuleCategory, RuleSeverity};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types for working with
/// the linter. Import with:
///
/// ```rust,ignore
/// use oaslint_linter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::motor::{apply_rules, Motor, MotorConfig};
    pub use crate::results::{RuleFunctionResult, RuleResultSet, SpecInfo};
    pub use crate::rule::{Rule, RuleAction, RuleSet};
    pub use crate::traits::{RuleFunction, RuleFunctionContext};
    pub use oaslint_types::{RuleCategory, RuleSeverity};
}
