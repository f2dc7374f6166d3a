//! 五子棋 AI 引擎
//!
//! 包含:
//! - 棋型表与棋局评估函数
//! - 连五、活四等战术扫描
//! - Minimax + Alpha-Beta 搜索
//! - 迭代加深
//! - Zobrist 哈希
//! - 置换表

mod config;
mod engine;
mod error;
mod evaluate;
mod pattern;
mod search;
pub mod tactics;
mod transposition;
mod zobrist;

pub use config::{
    AiConfig, Difficulty, DEFAULT_TIME_LIMIT_MS, MAX_DEFENSE_BIAS_PERCENT, MAX_PATTERN_WEIGHT,
};
pub use engine::{AiEngine, MoveSource, SearchReport};
pub use error::{AiError, Result};
pub use evaluate::Evaluator;
pub use pattern::{Pattern, PatternCatalog, PatternWeight};
pub use search::{SearchResult, Searcher};
pub use transposition::{EntryType, TTEntry, TTStats, TranspositionTable};
pub use zobrist::ZobristTable;

/// 胜负分（加上剩余深度，越快获胜分越高）
pub const WIN_SCORE: i32 = 100_000_000;

/// 搜索深度上限
pub const MAX_SEARCH_DEPTH: u8 = 10;
