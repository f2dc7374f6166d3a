//! 搜索引擎
//!
//! 实现 Minimax + Alpha-Beta 剪枝 + 迭代加深 + 置换表
//!
//! 己方（`Side::Own`）为极大方，对手为极小方。每个节点持有独立的棋盘副本，
//! 子节点之间不存在别名。

use std::time::{Duration, Instant};

use gomoku_core::{Board, Move, MoveGenerator, Side};
use tracing::{debug, trace};

use crate::config::AiConfig;
use crate::error::Result;
use crate::evaluate::Evaluator;
use crate::pattern::PatternCatalog;
use crate::transposition::{EntryType, TTStats, TranspositionTable};
use crate::zobrist::ZobristTable;
use crate::{MAX_SEARCH_DEPTH, WIN_SCORE};

/// 和棋分
const DRAW_SCORE: i32 = 0;

/// 走法排序时统计邻近棋子的半径
const NEARBY_RADIUS: i32 = 2;

/// 一次顶层搜索的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// 最佳走法（至少为第一个候选走法）
    pub best_move: Move,
    /// 最后一次完成迭代的分数（己方视角）
    pub score: i32,
    /// 最后一次完成迭代的深度，0 表示没有任何迭代完成
    pub depth: u8,
    /// 搜索的节点数
    pub nodes: u64,
}

impl SearchResult {
    /// 是否至少完成了一次迭代
    pub fn completed(&self) -> bool {
        self.depth > 0
    }
}

/// 搜索节点
struct SearchNode {
    board: Board,
    /// 产生该局面的走法
    last_move: Option<Move>,
    side_to_move: Side,
    /// 目前找到的最佳子走法
    best_child: Option<Move>,
    /// Zobrist 哈希（包含走子方）
    key: u64,
}

impl SearchNode {
    fn root(board: &Board, side_to_move: Side, zobrist: &ZobristTable) -> Self {
        Self {
            board: board.clone(),
            last_move: None,
            side_to_move,
            best_child: None,
            key: zobrist.hash(board, side_to_move),
        }
    }

    fn child(&self, mv: Move, zobrist: &ZobristTable) -> Self {
        let mut board = self.board.clone();
        board.play(mv, self.side_to_move);
        Self {
            board,
            last_move: Some(mv),
            side_to_move: self.side_to_move.opponent(),
            best_child: None,
            key: self.key ^ zobrist.stone_hash(mv, self.side_to_move) ^ zobrist.side_hash(),
        }
    }

    /// 终局检查：只有刚走棋的一方可能获胜；根节点两方都检查
    fn winner(&self) -> Option<Side> {
        match self.last_move {
            Some(mv) => {
                let mover = self.side_to_move.opponent();
                self.board.wins_through(mv, mover).then_some(mover)
            }
            None => self.board.winner(),
        }
    }
}

/// 搜索器
///
/// 置换表、棋型表都是搜索器自己的字段，不存在全局状态
pub struct Searcher {
    evaluator: Evaluator,
    zobrist: ZobristTable,
    tt: TranspositionTable,
    use_transposition: bool,
    min_depth: u8,
    branch_limit: Option<usize>,
    nodes_searched: u64,
    deadline: Instant,
    timed_out: bool,
}

impl Searcher {
    /// 按配置创建搜索器（棋型表从配置构建）
    pub fn new(config: &AiConfig) -> Result<Self> {
        let catalog = PatternCatalog::from_weights(&config.pattern_weights)?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// 使用给定棋型表创建搜索器
    pub fn with_catalog(config: &AiConfig, catalog: PatternCatalog) -> Self {
        let tt_size_mb = if config.use_transposition { config.tt_size_mb.max(1) } else { 1 };
        Self {
            evaluator: Evaluator::new(catalog, config.defense_bias_percent),
            zobrist: ZobristTable::new(),
            tt: TranspositionTable::new(tt_size_mb),
            use_transposition: config.use_transposition,
            min_depth: config.min_depth.max(1),
            branch_limit: config.branch_limit,
            nodes_searched: 0,
            deadline: Instant::now(),
            timed_out: false,
        }
    }

    /// 评估器
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// 迭代加深搜索己方最佳走法
    ///
    /// 没有空位时返回 None。搜索开始前先确定后备走法，所以零时间预算
    /// 也会返回合法走法；超时的迭代结果被丢弃，保留上一次完成迭代的结果。
    pub fn search(
        &mut self,
        board: &Board,
        max_depth: u8,
        time_budget: Duration,
    ) -> Option<SearchResult> {
        self.nodes_searched = 0;
        self.timed_out = false;
        let start = Instant::now();
        self.deadline = start
            .checked_add(time_budget)
            .unwrap_or_else(|| start + Duration::from_secs(24 * 60 * 60));

        // 旧的条目可能来自不同的时间预算，不能复用
        if self.use_transposition {
            self.tt.clear();
        }

        let candidates = self.ordered_children(board, Side::Own);
        let fallback = *candidates.first()?;

        let mut result = SearchResult {
            best_move: fallback,
            score: self.evaluator.score_board(board),
            depth: 0,
            nodes: 0,
        };

        let max_depth = max_depth.clamp(1, MAX_SEARCH_DEPTH);
        let min_depth = self.min_depth.min(max_depth);

        for depth in min_depth..=max_depth {
            if Instant::now() >= self.deadline {
                break;
            }

            let mut root = SearchNode::root(board, Side::Own, &self.zobrist);
            let score = self.minimax(&mut root, depth, i32::MIN, i32::MAX);

            if self.timed_out {
                debug!(
                    "Depth {} timed out after {} nodes, result discarded",
                    depth, self.nodes_searched
                );
                break;
            }

            if let Some(best_move) = root.best_child {
                result = SearchResult {
                    best_move,
                    score,
                    depth,
                    nodes: self.nodes_searched,
                };
            }
            debug!(
                "Depth {} complete, best move: {}, score: {}, nodes: {}",
                depth, result.best_move, score, self.nodes_searched
            );

            // 已找到必胜或必败，更深的搜索不会改变结论
            if score.abs() >= WIN_SCORE {
                break;
            }
        }

        result.nodes = self.nodes_searched;
        debug!(
            "Search finished in {:?}: {:?}, tt hit rate {:.2}",
            start.elapsed(),
            result,
            self.tt.hit_rate()
        );
        Some(result)
    }

    /// Minimax + Alpha-Beta
    fn minimax(&mut self, node: &mut SearchNode, depth: u8, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes_searched += 1;

        // 越快获胜分越高，越快失败分越低
        match node.winner() {
            Some(Side::Own) => return WIN_SCORE + depth as i32,
            Some(Side::Opponent) => return -WIN_SCORE - depth as i32,
            None => {}
        }

        if depth == 0 {
            return self.evaluator.score_board(&node.board);
        }
        if Instant::now() >= self.deadline {
            self.timed_out = true;
            return self.evaluator.score_board(&node.board);
        }

        let original_alpha = alpha;
        let original_beta = beta;

        if self.use_transposition {
            if let Some(entry) = self.tt.lookup(node.key) {
                if entry.depth >= depth {
                    match entry.entry_type {
                        EntryType::Exact => {
                            node.best_child = entry.best_move;
                            return entry.score;
                        }
                        EntryType::LowerBound => alpha = alpha.max(entry.score),
                        EntryType::UpperBound => beta = beta.min(entry.score),
                    }
                    if alpha >= beta {
                        node.best_child = entry.best_move;
                        return entry.score;
                    }
                }
            }
        }

        let children = self.ordered_children(&node.board, node.side_to_move);
        if children.is_empty() {
            return DRAW_SCORE;
        }

        let maximizing = node.side_to_move == Side::Own;
        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;

        for mv in children {
            let mut child = node.child(mv, &self.zobrist);
            let eval = self.minimax(&mut child, depth - 1, alpha, beta);

            if maximizing {
                if best_move.is_none() || eval > best_score {
                    best_score = eval;
                    best_move = Some(mv);
                }
                alpha = alpha.max(eval);
            } else {
                if best_move.is_none() || eval < best_score {
                    best_score = eval;
                    best_move = Some(mv);
                }
                beta = beta.min(eval);
            }

            if alpha >= beta || self.timed_out {
                break;
            }
        }

        node.best_child = best_move;

        if self.use_transposition && !self.timed_out {
            let entry_type = if best_score <= original_alpha {
                EntryType::UpperBound
            } else if best_score >= original_beta {
                EntryType::LowerBound
            } else {
                EntryType::Exact
            };
            self.tt.store(node.key, best_score, depth, entry_type, best_move);
        }

        trace!("depth {} {:?} -> {:?} ({})", depth, node.last_move, best_move, best_score);
        best_score
    }

    /// 生成子走法并按邻近棋子数排序（己方棋子计两次）
    ///
    /// 排序稳定，分数相同时保持中心向外的顺序
    fn ordered_children(&self, board: &Board, side: Side) -> Vec<Move> {
        let mut moves = MoveGenerator::generate(board, side);
        if board.is_empty() {
            moves.truncate(self.branch_limit.unwrap_or(usize::MAX));
            return moves;
        }

        let mut scored: Vec<(Move, i32)> = moves
            .drain(..)
            .map(|mv| (mv, nearby_score(board, mv, side)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let limit = self.branch_limit.unwrap_or(usize::MAX);
        scored.into_iter().take(limit).map(|(mv, _)| mv).collect()
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 置换表统计
    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }
}

/// 半径 2 内的棋子数，`side` 的棋子额外计一次
fn nearby_score(board: &Board, mv: Move, side: Side) -> i32 {
    let (row, col) = (mv.row as i32, mv.col as i32);
    let mut score = 0;
    for dr in -NEARBY_RADIUS..=NEARBY_RADIUS {
        for dc in -NEARBY_RADIUS..=NEARBY_RADIUS {
            if let Some(stone) = board.cell_at(row + dr, col + dc).side() {
                score += if stone == side { 2 } else { 1 };
            }
        }
    }
    score
}
