//! 棋型表
//!
//! 棋型用字符串描述：`X` 为己方棋子，`O` 为对方棋子，`_` 为空位。
//! 同一张表同时用于双方，匹配时按视角把 `X` 解释为"该方"。

use gomoku_core::Side;
use serde::{Deserialize, Serialize};

use crate::error::{AiError, Result};

/// 默认棋型分值（五连远高于活四，活的高于眠的）
const DEFAULT_WEIGHTS: &[(&str, i32)] = &[
    ("XXXXX", 100_000), // 五连
    ("_XXXX_", 10_000), // 活四
    ("XXXX_", 5_000),   // 冲四
    ("_XXXX", 5_000),
    ("_XXX_", 2_000), // 活三
    ("XX_XX", 1_500), // 跳四
    ("XXX_", 500),    // 眠三
    ("_XXX", 500),
    ("XX_X", 400), // 跳三
    ("X_XX", 400),
    ("_XX_X_", 300),
    ("_X_XX_", 300),
    ("_XX_", 200), // 活二
    ("XX_", 50),   // 眠二
    ("_XX", 50),
    ("X_X", 40),
    ("__XX__", 200),
    ("__X__", 10),
];

/// 棋型分值配置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternWeight {
    pub pattern: String,
    pub weight: i32,
}

impl PatternWeight {
    pub fn new(pattern: impl Into<String>, weight: i32) -> Self {
        Self {
            pattern: pattern.into(),
            weight,
        }
    }

    /// 默认棋型分值表
    pub fn defaults() -> Vec<PatternWeight> {
        DEFAULT_WEIGHTS
            .iter()
            .map(|(pattern, weight)| PatternWeight::new(*pattern, *weight))
            .collect()
    }
}

/// 棋型中的单个格子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternCell {
    /// 视角方棋子
    Mine,
    /// 另一方棋子
    Theirs,
    /// 空位
    Empty,
}

/// 棋型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    text: String,
    cells: Vec<PatternCell>,
}

impl Pattern {
    /// 解析棋型字符串
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: &str| AiError::InvalidPattern {
            pattern: text.to_string(),
            reason: reason.to_string(),
        };

        let cells = text
            .chars()
            .map(|c| match c {
                'X' => Ok(PatternCell::Mine),
                'O' => Ok(PatternCell::Theirs),
                '_' => Ok(PatternCell::Empty),
                _ => Err(invalid("only 'X', 'O' and '_' are allowed")),
            })
            .collect::<Result<Vec<_>>>()?;

        if !cells.contains(&PatternCell::Mine) {
            return Err(invalid("pattern must contain at least one 'X'"));
        }

        Ok(Self {
            text: text.to_string(),
            cells,
        })
    }

    /// 棋型字符串
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 棋型长度
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 从 `perspective` 视角统计棋型在一条线上出现的次数（允许重叠）
    pub fn count_in(&self, line: &[Option<Side>], perspective: Side) -> usize {
        if line.len() < self.cells.len() {
            return 0;
        }
        line.windows(self.cells.len())
            .filter(|window| self.matches(window, perspective))
            .count()
    }

    fn matches(&self, window: &[Option<Side>], perspective: Side) -> bool {
        self.cells.iter().zip(window).all(|(cell, stone)| match cell {
            PatternCell::Mine => *stone == Some(perspective),
            PatternCell::Theirs => *stone == Some(perspective.opponent()),
            PatternCell::Empty => stone.is_none(),
        })
    }
}

/// 棋型表
///
/// 引擎创建时构建一次，搜索过程中只读
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    entries: Vec<(Pattern, i32)>,
}

impl PatternCatalog {
    /// 从配置项构建
    pub fn from_weights(weights: &[PatternWeight]) -> Result<Self> {
        let entries = weights
            .iter()
            .map(|w| Pattern::parse(&w.pattern).map(|p| (p, w.weight)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// 棋型数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 遍历 (棋型, 分值)
    pub fn iter(&self) -> impl Iterator<Item = (&Pattern, i32)> {
        self.entries.iter().map(|(p, w)| (p, *w))
    }

    /// 统计一条线上每个棋型的出现次数，累加到 `counts`（与表项一一对应）
    pub fn count_line(&self, line: &[Option<Side>], perspective: Side, counts: &mut [usize]) {
        // 所有棋型都包含视角方棋子
        if !line.contains(&Some(perspective)) {
            return;
        }
        for ((pattern, _), count) in self.entries.iter().zip(counts.iter_mut()) {
            *count += pattern.count_in(line, perspective);
        }
    }

    /// 一条线上 `perspective` 方的棋型总分
    pub fn score_line(&self, line: &[Option<Side>], perspective: Side) -> i32 {
        if !line.contains(&Some(perspective)) {
            return 0;
        }
        self.entries.iter().fold(0i32, |score, (pattern, weight)| {
            let count = pattern.count_in(line, perspective) as i32;
            score.saturating_add(weight.saturating_mul(count))
        })
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        // 内置表均为合法棋型
        let entries = DEFAULT_WEIGHTS
            .iter()
            .filter_map(|(text, weight)| Pattern::parse(text).ok().map(|p| (p, *weight)))
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Option<Side> = Some(Side::Own);
    const O: Option<Side> = Some(Side::Opponent);
    const E: Option<Side> = None;

    fn weight_of(catalog: &PatternCatalog, text: &str) -> Option<i32> {
        catalog.iter().find(|(p, _)| p.as_str() == text).map(|(_, w)| w)
    }

    #[test]
    fn test_default_catalog() {
        let catalog = PatternCatalog::default();
        assert_eq!(catalog.len(), DEFAULT_WEIGHTS.len());
        assert_eq!(weight_of(&catalog, "XXXXX"), Some(100_000));
        assert_eq!(weight_of(&catalog, "_XXXX_"), Some(10_000));
        assert_eq!(weight_of(&catalog, "OOOOO"), None);

        // 连五 > 活四 > 冲四 > 活三
        let five = weight_of(&catalog, "XXXXX").unwrap();
        let open_four = weight_of(&catalog, "_XXXX_").unwrap();
        let closed_four = weight_of(&catalog, "XXXX_").unwrap();
        let open_three = weight_of(&catalog, "_XXX_").unwrap();
        assert!(five > open_four && open_four > closed_four && closed_four > open_three);
    }

    #[test]
    fn test_parse_pattern() {
        let pattern = Pattern::parse("_XO_").unwrap();
        assert_eq!(pattern.len(), 4);
        assert_eq!(pattern.as_str(), "_XO_");

        assert!(Pattern::parse("").is_err());
        assert!(Pattern::parse("___").is_err());
        assert!(matches!(
            Pattern::parse("X?X"),
            Err(AiError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_count_overlapping() {
        let pattern = Pattern::parse("X_X").unwrap();
        let line = [X, E, X, E, X];
        assert_eq!(pattern.count_in(&line, Side::Own), 2);
        assert_eq!(pattern.count_in(&line, Side::Opponent), 0);
    }

    #[test]
    fn test_perspective() {
        let pattern = Pattern::parse("_XXXX_").unwrap();
        let line = [E, O, O, O, O, E, X];
        assert_eq!(pattern.count_in(&line, Side::Opponent), 1);
        assert_eq!(pattern.count_in(&line, Side::Own), 0);

        // 'O' 表示另一方棋子
        let blocked = Pattern::parse("OXXXX_").unwrap();
        let line = [O, X, X, X, X, E];
        assert_eq!(blocked.count_in(&line, Side::Own), 1);
    }

    #[test]
    fn test_short_line() {
        let pattern = Pattern::parse("XXXXX").unwrap();
        assert_eq!(pattern.count_in(&[X, X, X], Side::Own), 0);
    }

    #[test]
    fn test_score_line() {
        let catalog = PatternCatalog::from_weights(&[
            PatternWeight::new("_XX_", 200),
            PatternWeight::new("XX", 7),
        ])
        .unwrap();
        let line = [E, X, X, E, E];
        assert_eq!(catalog.score_line(&line, Side::Own), 207);
        assert_eq!(catalog.score_line(&line, Side::Opponent), 0);

        let mut counts = vec![0; catalog.len()];
        catalog.count_line(&line, Side::Own, &mut counts);
        catalog.count_line(&line, Side::Own, &mut counts);
        assert_eq!(counts, vec![2, 2]);
    }

    #[test]
    fn test_invalid_weights() {
        let result = PatternCatalog::from_weights(&[PatternWeight::new("XX?", 1)]);
        assert!(result.is_err());
    }
}
