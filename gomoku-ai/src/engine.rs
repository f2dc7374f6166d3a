//! 走法选择器
//!
//! 先尝试一组快速规则（开局、连五、堵五、活四、堵活四），
//! 都不适用时再进行迭代加深搜索。

use std::collections::HashMap;
use std::time::{Duration, Instant};

use gomoku_core::{Board, Move, MoveGenerator, Side};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{AiConfig, Difficulty};
use crate::error::Result;
use crate::pattern::PatternCatalog;
use crate::search::Searcher;
use crate::tactics;
use crate::transposition::TTStats;
use crate::WIN_SCORE;

/// 随机开局的候选数量
const OPENING_CHOICES: usize = 6;

/// 随机走法从优势分前几名中挑选
const RANDOM_TOP_N: usize = 5;

/// 走法来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveSource {
    /// 开局落在中心附近
    Opening,
    /// 一步连五
    ImmediateWin,
    /// 堵住对手的连五点
    BlockWin,
    /// 形成己方活四
    OpenFour,
    /// 堵住对手的活四点
    BlockOpenFour,
    /// 搜索结果
    Search,
    /// 搜索未完成或分数过低时取优势分最高的走法
    Fallback,
    /// 随机走法（简单难度）
    Random,
}

/// 一次选择的完整结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub best_move: Move,
    /// 搜索分数；规则走法为该点的棋型分
    pub score: i32,
    pub source: MoveSource,
    /// 完成的搜索深度，规则走法为 0
    pub depth: u8,
    pub nodes: u64,
    pub elapsed_ms: u64,
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    searcher: Searcher,
    rng: ChaCha8Rng,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎（配置无效时返回错误）
    pub fn new(config: AiConfig) -> Result<Self> {
        config.validate()?;
        let searcher = Searcher::new(&config)?;
        Ok(Self::with_searcher(config, searcher))
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let config = AiConfig::from_difficulty(difficulty);
        let searcher = Searcher::with_catalog(&config, PatternCatalog::default());
        Self::with_searcher(config, searcher)
    }

    fn with_searcher(config: AiConfig, searcher: Searcher) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            searcher,
            nodes_searched: 0,
        }
    }

    /// 选择己方的下一步
    ///
    /// 没有空位时返回 None。`time_budget_secs` 为负数或 NaN 时按零处理。
    pub fn best_move(
        &mut self,
        board: &Board,
        max_depth: u8,
        time_budget_secs: f64,
    ) -> Option<Move> {
        self.analyze(board, max_depth, budget_from_secs(time_budget_secs))
            .map(|report| report.best_move)
    }

    /// 使用配置中的深度和时间选择走法
    pub fn search(&mut self, board: &Board) -> Option<Move> {
        let budget = Duration::from_millis(self.config.time_limit_ms);
        self.analyze(board, self.config.max_depth, budget)
            .map(|report| report.best_move)
    }

    /// 选择走法并返回来源、分数等信息
    pub fn analyze(
        &mut self,
        board: &Board,
        max_depth: u8,
        time_budget: Duration,
    ) -> Option<SearchReport> {
        let start = Instant::now();
        self.nodes_searched = 0;

        let candidates = MoveGenerator::generate(board, Side::Own);
        if candidates.is_empty() {
            debug!("No legal move left");
            return None;
        }

        let report = match self.shortcut(board, &candidates) {
            Some((best_move, score, source)) => SearchReport {
                best_move,
                score,
                source,
                depth: 0,
                nodes: 0,
                elapsed_ms: 0,
            },
            None => self.search_and_adjust(board, &candidates, max_depth, time_budget)?,
        };

        let report = SearchReport {
            elapsed_ms: start.elapsed().as_millis() as u64,
            ..report
        };
        info!(
            "AI chose {} via {:?} (score: {}, depth: {}, nodes: {}, {}ms)",
            report.best_move,
            report.source,
            report.score,
            report.depth,
            report.nodes,
            report.elapsed_ms
        );
        Some(report)
    }

    /// 不需要搜索的走法
    fn shortcut(
        &mut self,
        board: &Board,
        candidates: &[Move],
    ) -> Option<(Move, i32, MoveSource)> {
        if board.count(Side::Own) == 0 && board.stone_count() <= 1 {
            let choice = if self.config.randomize_opening {
                let n = candidates.len().min(OPENING_CHOICES);
                candidates[..n].choose(&mut self.rng).copied()
            } else {
                candidates.first().copied()
            };
            if let Some(mv) = choice {
                let score = self.searcher.evaluator().move_score(board, mv, Side::Own);
                return Some((mv, score, MoveSource::Opening));
            }
        }

        if let Some(mv) = tactics::first_winning_move(board, Side::Own, candidates) {
            return Some((mv, WIN_SCORE, MoveSource::ImmediateWin));
        }

        let opponent_wins = tactics::winning_moves(board, Side::Opponent, candidates);
        if let Some(&mv) = opponent_wins.first() {
            if opponent_wins.len() > 1 {
                debug!("Opponent has {} winning points, blocking {}", opponent_wins.len(), mv);
            } else {
                debug!("Blocking opponent five at {}", mv);
            }
            let score = self.searcher.evaluator().move_score(board, mv, Side::Opponent);
            return Some((mv, score, MoveSource::BlockWin));
        }

        let (threats, favors) = self.searcher.evaluator().threats_and_favors(board, candidates);

        let own_fours = tactics::open_four_moves(board, Side::Own, candidates);
        if let Some(mv) = highest(&own_fours, &favors) {
            return Some((mv, score_of(&favors, mv), MoveSource::OpenFour));
        }

        let opponent_fours = tactics::open_four_moves(board, Side::Opponent, candidates);
        if let Some(mv) = highest(&opponent_fours, &threats) {
            debug!("Blocking opponent open four at {}", mv);
            return Some((mv, score_of(&threats, mv), MoveSource::BlockOpenFour));
        }

        None
    }

    /// 搜索，再按置信度和随机率调整结果
    fn search_and_adjust(
        &mut self,
        board: &Board,
        candidates: &[Move],
        max_depth: u8,
        time_budget: Duration,
    ) -> Option<SearchReport> {
        let result = self.searcher.search(board, max_depth, time_budget)?;
        self.nodes_searched = result.nodes;

        let mut report = SearchReport {
            best_move: result.best_move,
            score: result.score,
            source: MoveSource::Search,
            depth: result.depth,
            nodes: result.nodes,
            elapsed_ms: 0,
        };

        let unconfident = self
            .config
            .confidence_threshold
            .is_some_and(|threshold| result.score < threshold);

        let mut favors = None;
        if !result.completed() || unconfident {
            let map = self.favors(board, candidates);
            if let Some(mv) = highest(candidates, &map) {
                debug!(
                    "Search {} (score {}), falling back to {}",
                    if result.completed() { "not confident" } else { "incomplete" },
                    result.score,
                    mv
                );
                report.best_move = mv;
                report.source = MoveSource::Fallback;
            }
            favors = Some(map);
        }

        let chance = self.config.random_move_chance;
        if chance > 0.0 && self.rng.gen::<f32>() < chance {
            let map = match favors {
                Some(map) => map,
                None => self.favors(board, candidates),
            };
            let mut ranked = candidates.to_vec();
            ranked.sort_by_key(|mv| std::cmp::Reverse(score_of(&map, *mv)));
            ranked.truncate(RANDOM_TOP_N);
            if let Some(&mv) = ranked.choose(&mut self.rng) {
                debug!("Random move {} replaces {}", mv, report.best_move);
                report.best_move = mv;
                report.source = MoveSource::Random;
            }
        }

        Some(report)
    }

    fn favors(&self, board: &Board, candidates: &[Move]) -> HashMap<Move, i32> {
        self.searcher.evaluator().threats_and_favors(board, candidates).1
    }

    /// 获取最近一次选择搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn tt_stats(&self) -> TTStats {
        self.searcher.tt_stats()
    }
}

impl Default for AiEngine {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// 分数最高的走法，分数相同时取靠前的
fn highest(moves: &[Move], scores: &HashMap<Move, i32>) -> Option<Move> {
    let mut best: Option<(Move, i32)> = None;
    for &mv in moves {
        let score = score_of(scores, mv);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((mv, score));
        }
    }
    best.map(|(mv, _)| mv)
}

fn score_of(scores: &HashMap<Move, i32>, mv: Move) -> i32 {
    scores.get(&mv).copied().unwrap_or(i32::MIN)
}

/// 秒数转时间预算
fn budget_from_secs(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_DEFENSE_BIAS_PERCENT, MAX_PATTERN_WEIGHT};
    use crate::error::AiError;
    use crate::pattern::PatternWeight;
    use gomoku_core::Notation;

    const AMPLE_SECS: f64 = 60.0;

    fn engine() -> AiEngine {
        AiEngine::new(AiConfig {
            max_depth: 2,
            tt_size_mb: 1,
            ..AiConfig::default()
        })
        .unwrap()
    }

    fn board(text: &str) -> Board {
        Notation::parse(text).unwrap()
    }

    fn standard_with(stones: &[(i32, i32, Side)]) -> Board {
        let mut board = Board::standard();
        for &(row, col, side) in stones {
            assert!(board.place(row, col, side));
        }
        board
    }

    #[test]
    fn test_completes_open_four_on_row_eight() {
        // 第 8 行 _XXXX_
        let board = standard_with(&[
            (8, 5, Side::Own),
            (8, 6, Side::Own),
            (8, 7, Side::Own),
            (8, 8, Side::Own),
            (7, 6, Side::Opponent),
            (9, 7, Side::Opponent),
            (10, 10, Side::Opponent),
        ]);

        let mut ai = engine();
        let report = ai.analyze(&board, 2, Duration::from_secs(60)).unwrap();
        assert!(
            report.best_move == Move::new(8, 4) || report.best_move == Move::new(8, 9),
            "应该连五: {}",
            report.best_move
        );
        assert_eq!(report.source, MoveSource::ImmediateWin);
        assert_eq!(report.nodes, 0);
    }

    #[test]
    fn test_blocks_opponent_open_four() {
        // 对手第 8 行 _OOOO_，己方无连五
        let board = standard_with(&[
            (8, 5, Side::Opponent),
            (8, 6, Side::Opponent),
            (8, 7, Side::Opponent),
            (8, 8, Side::Opponent),
            (7, 6, Side::Own),
            (9, 7, Side::Own),
            (3, 3, Side::Own),
        ]);

        let mut ai = engine();
        let report = ai.analyze(&board, 2, Duration::from_secs(60)).unwrap();
        assert!(report.best_move == Move::new(8, 4) || report.best_move == Move::new(8, 9));
        assert_eq!(report.source, MoveSource::BlockWin);
    }

    #[test]
    fn test_win_preferred_over_block() {
        let b = board(
            "
            .........
            .........
            .OOOO....
            .........
            .XXXX....
            .........
            .........
            .........
            .........
            ",
        );
        let report = engine().analyze(&b, 2, Duration::from_secs(60)).unwrap();
        assert_eq!(report.source, MoveSource::ImmediateWin);
        assert_eq!(report.best_move.row, 4);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let b = board(
            "
            XXOOX
            OOXXO
            XXOOX
            OOXXO
            XXOOX
            ",
        );
        let mut ai = engine();
        assert!(ai.best_move(&b, 2, AMPLE_SECS).is_none());
        assert!(ai.search(&b).is_none());
    }

    #[test]
    fn test_best_move_idempotent() {
        let b = board(
            "
            .........
            .........
            .........
            ...XO....
            ...OX....
            ..O......
            .........
            .........
            .........
            ",
        );
        let mut ai = engine();
        let first = ai.best_move(&b, 2, AMPLE_SECS).unwrap();
        let second = ai.best_move(&b, 2, AMPLE_SECS).unwrap();
        assert_eq!(first, second);
        assert!(b.is_empty_at(first));

        // 新引擎得到同样的结果
        assert_eq!(engine().best_move(&b, 2, AMPLE_SECS), Some(first));
    }

    #[test]
    fn test_opening_takes_center() {
        let empty = Board::standard();
        let mut ai = engine();
        let report = ai.analyze(&empty, 2, Duration::from_secs(60)).unwrap();
        assert_eq!(report.best_move, MoveGenerator::center(&empty));
        assert_eq!(report.source, MoveSource::Opening);

        // 对手占了中心，下在旁边
        let reply = standard_with(&[(8, 8, Side::Opponent)]);
        let report = ai.analyze(&reply, 2, Duration::from_secs(60)).unwrap();
        assert_eq!(report.source, MoveSource::Opening);
        assert_eq!(report.best_move.chebyshev(Move::new(8, 8)), 1);
    }

    #[test]
    fn test_randomized_opening_stays_near_center() {
        let mut ai = AiEngine::from_difficulty(Difficulty::Easy);
        let empty = Board::standard();
        let center = MoveGenerator::center(&empty);
        for _ in 0..20 {
            let mv = ai.best_move(&empty, 2, 1.0).unwrap();
            assert!(mv.chebyshev(center) <= 1, "开局离中心太远: {}", mv);
        }
    }

    #[test]
    fn test_creates_open_four() {
        let b = board(
            "
            .........
            .........
            .........
            .........
            ..XXX....
            .........
            ......O..
            .O.......
            .......O.
            ",
        );
        let report = engine().analyze(&b, 2, Duration::from_secs(60)).unwrap();
        assert_eq!(report.source, MoveSource::OpenFour);
        assert!(report.best_move == Move::new(4, 1) || report.best_move == Move::new(4, 5));
    }

    #[test]
    fn test_blocks_open_three() {
        // 对手三连，下一步就是活四
        let b = board(
            "
            .........
            .........
            .........
            .........
            ..OOO....
            .........
            ......X..
            .X.......
            .........
            ",
        );
        let report = engine().analyze(&b, 2, Duration::from_secs(60)).unwrap();
        assert_eq!(report.source, MoveSource::BlockOpenFour);
        assert!(report.best_move == Move::new(4, 1) || report.best_move == Move::new(4, 5));
    }

    #[test]
    fn test_search_used_without_shortcut() {
        let b = board(
            "
            .........
            .........
            .........
            ...XO....
            ...OX....
            .........
            .........
            .........
            .........
            ",
        );
        let mut ai = AiEngine::new(AiConfig {
            max_depth: 2,
            confidence_threshold: None,
            ..AiConfig::default()
        })
        .unwrap();
        let report = ai.analyze(&b, 2, Duration::from_secs(60)).unwrap();
        assert_eq!(report.source, MoveSource::Search);
        assert!(report.depth >= 1);
        assert!(report.nodes > 0);
        assert_eq!(ai.nodes_searched(), report.nodes);
    }

    #[test]
    fn test_zero_budget_falls_back_to_favor() {
        let b = board(
            "
            .........
            .........
            .........
            ...XO....
            ...OX....
            .........
            .........
            .........
            .........
            ",
        );
        let mut ai = engine();
        let report = ai.analyze(&b, 3, Duration::ZERO).unwrap();
        assert_eq!(report.source, MoveSource::Fallback);
        assert_eq!(report.depth, 0);
        assert!(b.is_empty_at(report.best_move));

        // 负数和 NaN 按零处理
        assert!(ai.best_move(&b, 3, -1.0).is_some());
        assert!(ai.best_move(&b, 3, f64::NAN).is_some());
    }

    #[test]
    fn test_confidence_threshold_fallback() {
        let b = board(
            "
            .........
            .........
            .........
            ...XO....
            ...OX....
            .........
            .........
            .........
            .........
            ",
        );
        let mut ai = AiEngine::new(AiConfig {
            max_depth: 1,
            confidence_threshold: Some(i32::MAX),
            ..AiConfig::default()
        })
        .unwrap();
        let report = ai.analyze(&b, 1, Duration::from_secs(60)).unwrap();
        assert_eq!(report.source, MoveSource::Fallback);

        let candidates = MoveGenerator::generate(&b, Side::Own);
        let favors = ai.favors(&b, &candidates);
        let best = favors.values().copied().max().unwrap();
        assert_eq!(favors[&report.best_move], best);
    }

    #[test]
    fn test_random_move_among_top_favors() {
        let b = board(
            "
            .........
            .........
            .........
            ...XO....
            ...OX....
            .........
            .........
            .........
            .........
            ",
        );
        let mut ai = AiEngine::new(AiConfig {
            max_depth: 1,
            random_move_chance: 1.0,
            ..AiConfig::default()
        })
        .unwrap();

        let candidates = MoveGenerator::generate(&b, Side::Own);
        let favors = ai.favors(&b, &candidates);
        let mut scores: Vec<i32> = favors.values().copied().collect();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        let fifth = scores[RANDOM_TOP_N - 1];

        for _ in 0..10 {
            let report = ai.analyze(&b, 1, Duration::from_secs(60)).unwrap();
            assert_eq!(report.source, MoveSource::Random);
            assert!(favors[&report.best_move] >= fifth);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AiConfig {
            min_depth: 0,
            ..AiConfig::default()
        };
        assert!(AiEngine::new(config).is_err());

        // 分值过大会在评估时溢出
        let huge = AiConfig {
            pattern_weights: vec![PatternWeight::new("X", i32::MAX / 2)],
            ..AiConfig::default()
        };
        assert!(matches!(
            AiEngine::new(huge),
            Err(AiError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_max_weights_do_not_overflow() {
        let weights = PatternWeight::defaults()
            .into_iter()
            .map(|w| PatternWeight::new(w.pattern, MAX_PATTERN_WEIGHT))
            .collect();
        let mut ai = AiEngine::new(AiConfig {
            max_depth: 2,
            defense_bias_percent: MAX_DEFENSE_BIAS_PERCENT,
            pattern_weights: weights,
            ..AiConfig::default()
        })
        .unwrap();

        let b = standard_with(&[
            (8, 8, Side::Own),
            (8, 9, Side::Own),
            (9, 9, Side::Opponent),
        ]);
        let mv = ai.best_move(&b, 2, 5.0).unwrap();
        assert!(b.is_empty_at(mv));
    }

    #[test]
    fn test_budget_from_secs() {
        assert_eq!(budget_from_secs(-3.0), Duration::ZERO);
        assert_eq!(budget_from_secs(f64::NAN), Duration::ZERO);
        assert_eq!(budget_from_secs(1.5), Duration::from_millis(1500));
        assert_eq!(budget_from_secs(f64::INFINITY), Duration::MAX);
    }

    #[test]
    fn test_report_serializes() {
        let report = SearchReport {
            best_move: Move::new(3, 4),
            score: 120,
            source: MoveSource::OpenFour,
            depth: 0,
            nodes: 0,
            elapsed_ms: 1,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("OpenFour"));
        let back: SearchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
