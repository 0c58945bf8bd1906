/// Registry of available rule functions, keyed by the name rules refer to
use crate::functions::{
    AlphabeticalFunctionImpl, ApiServersFunctionImpl, PatternFunctionImpl, TruthyFunctionImpl,
    XorFunctionImpl,
};
use crate::traits::RuleFunction;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Lazily initialized built-in functions.
/// Functions are created once and shared by every motor.
static BUILTIN_FUNCTIONS: LazyLock<FunctionRegistry> = LazyLock::new(|| {
    let mut registry = FunctionRegistry::empty();
    registry.register(Arc::new(XorFunctionImpl));
    registry.register(Arc::new(ApiServersFunctionImpl));
    registry.register(Arc::new(TruthyFunctionImpl));
    registry.register(Arc::new(PatternFunctionImpl));
    registry.register(Arc::new(AlphabeticalFunctionImpl));
    registry
});

#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<&'static str, Arc<dyn RuleFunction>>,
}

impl FunctionRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The shared registry of built-in functions.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN_FUNCTIONS
    }

    /// Add a function under its schema name, replacing any previous entry.
    pub fn register(&mut self, function: Arc<dyn RuleFunction>) {
        let name = function.schema().name;
        self.functions.insert(name, function);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn RuleFunction>> {
        self.functions.get(name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
