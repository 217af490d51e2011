//! Sandboxed evaluation of user-typed formulas.
//!
//! Rotation formulas see two constants, `a` (the bone's rest angle) and `s`
//! (the current wave sample). Wave formulas see one, `x` (the phase position
//! in radians over one period). Nothing else is in scope.
//!
//! Formulas are compiled with [`rhai`] as single expressions: statements,
//! assignments and function definitions do not parse, `eval` is disabled, and
//! operation/depth limits bound how much work one formula can do. The rhai
//! math library (`sin`, `cos`, `atan`, `sqrt`, `PI()`, ...) and the `**`
//! operator are available. The one-argument math functions also accept
//! integers, so `sin(1)` and `sin(1.0)` agree.

use hashbrown::HashMap;
use rhai::{Dynamic, Engine, Scope, AST, FLOAT, INT};
use std::fmt;

use crate::config::FormulaLimits;

/// Why a formula produced no usable angle or sample.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FormulaError {
    #[error("formula '{formula}' does not parse: {message}")]
    Parse { formula: String, message: String },

    #[error("formula '{formula}' failed: {message}")]
    Runtime { formula: String, message: String },

    #[error("formula '{formula}' returned {type_name}, expected a number")]
    NotANumber { formula: String, type_name: String },

    #[error("formula '{formula}' returned non-finite value {value}")]
    NonFinite { formula: String, value: f64 },
}

impl FormulaError {
    /// The formula text that failed.
    pub fn formula(&self) -> &str {
        match self {
            FormulaError::Parse { formula, .. }
            | FormulaError::Runtime { formula, .. }
            | FormulaError::NotANumber { formula, .. }
            | FormulaError::NonFinite { formula, .. } => formula,
        }
    }
}

/// Expression evaluator with a per-text cache of compiled formulas.
pub struct FormulaEngine {
    engine: Engine,
    cache: HashMap<String, Result<AST, FormulaError>>,
    cache_capacity: usize,
}

impl fmt::Debug for FormulaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaEngine")
            .field("cached", &self.cache.len())
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new(&FormulaLimits::default())
    }
}

impl FormulaEngine {
    pub fn new(limits: &FormulaLimits) -> Self {
        let mut engine = Engine::new();
        engine.set_max_operations(limits.max_operations);
        engine.set_max_expr_depths(limits.max_expr_depth, limits.max_expr_depth);
        engine.set_max_call_levels(limits.max_call_levels);
        engine.set_max_string_size(limits.max_string_size);
        engine.set_max_array_size(64);
        engine.set_max_map_size(64);
        engine.disable_symbol("eval");
        register_int_math(&mut engine);
        engine.on_print(|msg| log::debug!("formula print: {msg}"));
        engine.on_debug(|msg, _source, pos| log::debug!("formula debug ({pos}): {msg}"));

        Self {
            engine,
            cache: HashMap::new(),
            cache_capacity: limits.cache_capacity.max(1),
        }
    }

    /// Evaluate a rotation formula with `a` and `s` bound.
    pub fn eval_rotation(&mut self, formula: &str, a: f64, s: f64) -> Result<f64, FormulaError> {
        self.evaluate(formula, &[("a", a), ("s", s)])
    }

    /// Evaluate a wave formula with `x` bound.
    pub fn eval_wave(&mut self, formula: &str, x: f64) -> Result<f64, FormulaError> {
        self.evaluate(formula, &[("x", x)])
    }

    /// Compile `formula` without running it.
    pub fn check(&mut self, formula: &str) -> Result<(), FormulaError> {
        self.make_room(formula);
        let engine = &self.engine;
        self.cache
            .entry_ref(formula)
            .or_insert_with(|| compile(engine, formula))
            .as_ref()
            .map(|_| ())
            .map_err(Clone::clone)
    }

    /// Number of compiled formulas currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn make_room(&mut self, formula: &str) {
        if self.cache.len() >= self.cache_capacity && !self.cache.contains_key(formula) {
            log::debug!("formula cache full ({} entries), flushing", self.cache.len());
            self.cache.clear();
        }
    }

    fn evaluate(&mut self, formula: &str, bindings: &[(&'static str, f64)]) -> Result<f64, FormulaError> {
        self.make_room(formula);
        let engine = &self.engine;
        let ast = self
            .cache
            .entry_ref(formula)
            .or_insert_with(|| compile(engine, formula))
            .as_ref()
            .map_err(Clone::clone)?;

        let mut scope = Scope::new();
        for (name, value) in bindings {
            scope.push_constant(*name, *value as FLOAT);
        }

        let result = engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, ast)
            .map_err(|err| FormulaError::Runtime {
                formula: formula.to_string(),
                message: err.to_string(),
            })?;
        to_number(formula, result)
    }
}

/// Float math functions that rhai only registers for `FLOAT`.
const FLOAT_MATH: &[(&str, fn(FLOAT) -> FLOAT)] = &[
    ("sin", FLOAT::sin),
    ("cos", FLOAT::cos),
    ("tan", FLOAT::tan),
    ("asin", FLOAT::asin),
    ("acos", FLOAT::acos),
    ("atan", FLOAT::atan),
    ("sinh", FLOAT::sinh),
    ("cosh", FLOAT::cosh),
    ("tanh", FLOAT::tanh),
    ("sqrt", FLOAT::sqrt),
    ("exp", FLOAT::exp),
    ("ln", FLOAT::ln),
    ("log", FLOAT::log10),
];

fn register_int_math(engine: &mut Engine) {
    for &(name, f) in FLOAT_MATH {
        engine.register_fn(name, move |x: INT| f(x as FLOAT));
    }
}

fn compile(engine: &Engine, formula: &str) -> Result<AST, FormulaError> {
    engine
        .compile_expression(formula)
        .map_err(|err| FormulaError::Parse {
            formula: formula.to_string(),
            message: err.to_string(),
        })
}

fn to_number(formula: &str, value: Dynamic) -> Result<f64, FormulaError> {
    let number = if let Ok(f) = value.as_float() {
        f as f64
    } else if let Ok(i) = value.as_int() {
        i as f64
    } else {
        return Err(FormulaError::NotANumber {
            formula: formula.to_string(),
            type_name: value.type_name().to_string(),
        });
    };
    if !number.is_finite() {
        return Err(FormulaError::NonFinite {
            formula: formula.to_string(),
            value: number,
        });
    }
    Ok(number)
}
