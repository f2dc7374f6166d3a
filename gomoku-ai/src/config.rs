//! AI 配置

use serde::{Deserialize, Serialize};

use crate::error::{AiError, Result};
use crate::pattern::{PatternCatalog, PatternWeight};
use crate::{MAX_SEARCH_DEPTH, WIN_SCORE};

/// 默认思考时间（毫秒）
pub const DEFAULT_TIME_LIMIT_MS: u64 = 2000;

/// 单个棋型分值上限
pub const MAX_PATTERN_WEIGHT: i32 = WIN_SCORE / 1000;

/// 防守偏向上限（百分比）
pub const MAX_DEFENSE_BIAS_PERCENT: i32 = 100;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单：depth=2，30% 概率从优势分前五中随机选
    Easy,
    /// 中等：depth=3
    Medium,
    /// 困难：depth=5
    Hard,
}

/// AI 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// 迭代加深的最大深度
    pub max_depth: u8,
    /// 迭代加深的起始深度
    pub min_depth: u8,
    pub time_limit_ms: u64,
    pub use_transposition: bool,
    pub tt_size_mb: usize,
    /// 每个节点最多展开的子节点数（按邻近棋子排序后截断），None 为全宽搜索
    ///
    /// 预设难度都设了上限：全宽搜索在 16 路棋盘上每层有两百多个子节点，
    /// 在时间预算内到不了预设深度。截断会漏掉远离已有棋子的走法。
    pub branch_limit: Option<usize>,
    /// 搜索分数低于该值时改用优势分最高的走法
    pub confidence_threshold: Option<i32>,
    /// 对手棋型额外权重（百分比，0..=100）
    pub defense_bias_percent: i32,
    /// 用随机走法替换搜索结果的概率
    pub random_move_chance: f32,
    /// 开局是否在中心附近随机落子
    pub randomize_opening: bool,
    pub seed: u64,
    pub pattern_weights: Vec<PatternWeight>,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let base = Self {
            difficulty,
            max_depth: 3,
            min_depth: 1,
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
            use_transposition: true,
            tt_size_mb: 16,
            branch_limit: Some(20),
            confidence_threshold: Some(-2_000),
            defense_bias_percent: 20,
            random_move_chance: 0.0,
            randomize_opening: false,
            seed: 0x5EED,
            pattern_weights: PatternWeight::defaults(),
        };

        match difficulty {
            Difficulty::Easy => Self {
                max_depth: 2,
                time_limit_ms: 1000,
                branch_limit: Some(12),
                random_move_chance: 0.3,
                randomize_opening: true,
                ..base
            },
            Difficulty::Medium => base,
            Difficulty::Hard => Self {
                max_depth: 5,
                min_depth: 2,
                time_limit_ms: 5000,
                tt_size_mb: 64,
                branch_limit: Some(24),
                ..base
            },
        }
    }

    /// 从 JSON 解析配置（缺省字段取中等难度的值）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AiConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 检查配置是否有效
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(AiError::InvalidConfig { reason });

        if self.min_depth == 0 {
            return invalid("min_depth must be at least 1".to_string());
        }
        if self.min_depth > self.max_depth {
            return invalid(format!(
                "min_depth {} exceeds max_depth {}",
                self.min_depth, self.max_depth
            ));
        }
        if self.max_depth > MAX_SEARCH_DEPTH {
            return invalid(format!(
                "max_depth {} exceeds limit {}",
                self.max_depth, MAX_SEARCH_DEPTH
            ));
        }
        if self.use_transposition && self.tt_size_mb == 0 {
            return invalid("tt_size_mb must be positive".to_string());
        }
        if self.branch_limit == Some(0) {
            return invalid("branch_limit must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.random_move_chance) {
            return invalid(format!(
                "random_move_chance {} is outside [0, 1]",
                self.random_move_chance
            ));
        }
        if !(0..=MAX_DEFENSE_BIAS_PERCENT).contains(&self.defense_bias_percent) {
            return invalid(format!(
                "defense_bias_percent {} is outside [0, {}]",
                self.defense_bias_percent, MAX_DEFENSE_BIAS_PERCENT
            ));
        }
        if self.pattern_weights.is_empty() {
            return invalid("pattern_weights must not be empty".to_string());
        }
        if let Some(w) = self
            .pattern_weights
            .iter()
            .find(|w| !(1..=MAX_PATTERN_WEIGHT).contains(&w.weight))
        {
            return invalid(format!(
                "weight {} of pattern '{}' is outside [1, {}]",
                w.weight, w.pattern, MAX_PATTERN_WEIGHT
            ));
        }
        PatternCatalog::from_weights(&self.pattern_weights)?;

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}
