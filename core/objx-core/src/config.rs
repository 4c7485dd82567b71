//! Store configuration
//!
//! Defaults, JSON loading and `OBJX_*` environment overrides.

use crate::error::{ObjxError, ObjxResult};
use crate::query::{DEFAULT_MAX_DEPTH, GrammarVersion};
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_LOCK_STRIPES: usize = 64;

/// 환경 변수 이름
pub const ENV_GRAMMAR: &str = "OBJX_GRAMMAR";
pub const ENV_LOCK_STRIPES: &str = "OBJX_LOCK_STRIPES";
pub const ENV_LOG_QUERIES: &str = "OBJX_LOG_QUERIES";
pub const ENV_MAX_DEPTH: &str = "OBJX_MAX_DEPTH";

/// Object store 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Grammar used to compile query text
    pub grammar: GrammarVersion,

    /// Number of identity-key locks serializing `save`; rounded up to a power of two
    pub lock_stripes: usize,

    /// Log every compiled query at INFO
    pub log_queries: bool,

    /// Deepest nesting the nested grammar accepts; a leaf counts as one.
    /// Clamped to `1..=DEPTH_CEILING` by the compiler.
    pub max_depth: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            grammar: GrammarVersion::default(),
            lock_stripes: DEFAULT_LOCK_STRIPES,
            log_queries: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grammar(mut self, grammar: GrammarVersion) -> Self {
        self.grammar = grammar;
        self
    }

    pub fn with_lock_stripes(mut self, stripes: usize) -> Self {
        self.lock_stripes = stripes;
        self
    }

    pub fn with_log_queries(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// JSON에서 로드 (missing keys keep their defaults)
    pub fn from_json(json: &str) -> ObjxResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 환경 변수에서 로드
    ///
    /// Applies `OBJX_GRAMMAR`, `OBJX_LOCK_STRIPES`, `OBJX_LOG_QUERIES` and
    /// `OBJX_MAX_DEPTH` on top of `self`. Unparsable values are rejected.
    pub fn load_from_env(self) -> ObjxResult<Self> {
        self.apply_vars(env::vars())
    }

    fn apply_vars(mut self, vars: impl IntoIterator<Item = (String, String)>) -> ObjxResult<Self> {
        for (key, value) in vars {
            match key.as_str() {
                ENV_GRAMMAR => {
                    self.grammar = GrammarVersion::parse_grammar(&value).ok_or_else(|| {
                        ObjxError::Config(format!("{ENV_GRAMMAR}: unknown grammar '{value}'"))
                    })?;
                }
                ENV_LOCK_STRIPES => {
                    self.lock_stripes = value.trim().parse().map_err(|_| {
                        ObjxError::Config(format!("{ENV_LOCK_STRIPES}: expected a number, got '{value}'"))
                    })?;
                }
                ENV_LOG_QUERIES => {
                    self.log_queries = parse_flag(&value).ok_or_else(|| {
                        ObjxError::Config(format!("{ENV_LOG_QUERIES}: expected a boolean, got '{value}'"))
                    })?;
                }
                ENV_MAX_DEPTH => {
                    self.max_depth = value.trim().parse().map_err(|_| {
                        ObjxError::Config(format!("{ENV_MAX_DEPTH}: expected a number, got '{value}'"))
                    })?;
                }
                _ => {}
            }
        }
        Ok(self)
    }

    /// Effective number of save locks: at least one, a power of two.
    pub fn stripe_count(&self) -> usize {
        self.lock_stripes.max(1).next_power_of_two()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
