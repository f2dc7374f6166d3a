//! 局面评估函数
//!
//! 扫描所有横、竖、两条对角线方向的线，按棋型表计分，再加上位置分。

use std::collections::HashMap;

use gomoku_core::{Board, Cell, Move, Side, DIRECTIONS};

use crate::pattern::PatternCatalog;
use crate::WIN_SCORE;

/// 中心加成覆盖的圈数
const CENTER_RADIUS: i32 = 3;

/// 己方棋子在中心的加成（每离中心一圈减 5）
const OWN_CENTER_BONUS: i32 = 30;
const OWN_CENTER_DECAY: i32 = 5;

/// 对手棋子在中心的扣分（每离中心一圈减 3）
const OPPONENT_CENTER_PENALTY: i32 = 20;
const OPPONENT_CENTER_DECAY: i32 = 3;

/// 相邻己方棋子数平方的系数
const CONNECTIVITY_FACTOR: i32 = 5;

/// 边线棋子的分值调整
const OWN_EDGE_PENALTY: i32 = 15;
const OPPONENT_EDGE_BONUS: i32 = 10;

/// 评估器
#[derive(Debug, Clone)]
pub struct Evaluator {
    catalog: PatternCatalog,
    /// 对手棋型的额外权重（百分比），偏向防守
    defense_bias_percent: i32,
}

impl Evaluator {
    pub fn new(catalog: PatternCatalog, defense_bias_percent: i32) -> Self {
        Self {
            catalog,
            defense_bias_percent,
        }
    }

    /// 评估棋局（己方视角，正值对己方有利）
    pub fn score_board(&self, board: &Board) -> i32 {
        let mut own_counts = vec![0usize; self.catalog.len()];
        let mut opponent_counts = vec![0usize; self.catalog.len()];
        let mut line = Vec::with_capacity(board.size());

        for_each_line(board, |row, col, dr, dc| {
            read_line(board, row, col, dr, dc, &mut line);
            self.catalog.count_line(&line, Side::Own, &mut own_counts);
            self.catalog.count_line(&line, Side::Opponent, &mut opponent_counts);
        });

        let mut score = 0i32;
        for (((_, weight), own), opponent) in self
            .catalog
            .iter()
            .zip(&own_counts)
            .zip(&opponent_counts)
        {
            let bias = weight.saturating_mul(self.defense_bias_percent) / 100;
            let biased = weight.saturating_add(bias);
            score = score
                .saturating_add(weight.saturating_mul(*own as i32))
                .saturating_sub(biased.saturating_mul(*opponent as i32));
        }

        // 局面分不能达到胜负分
        score
            .saturating_add(Self::positional_score(board))
            .clamp(-(WIN_SCORE - 1), WIN_SCORE - 1)
    }

    /// 位置分：中心控制、己方棋子连通、边线
    pub fn positional_score(board: &Board) -> i32 {
        let n = board.size() as i32;
        let center = n / 2;
        let mut score = 0;

        for row in 0..n {
            for col in 0..n {
                let Cell::Stone(side) = board.cell_at(row, col) else {
                    continue;
                };

                let distance = (row - center).abs().max((col - center).abs());
                if distance <= CENTER_RADIUS {
                    score += match side {
                        Side::Own => OWN_CENTER_BONUS - OWN_CENTER_DECAY * distance,
                        Side::Opponent => {
                            -(OPPONENT_CENTER_PENALTY - OPPONENT_CENTER_DECAY * distance)
                        }
                    };
                }

                if side == Side::Own {
                    let neighbours = count_neighbours(board, row, col, Side::Own);
                    score += CONNECTIVITY_FACTOR * neighbours * neighbours;
                }

                if row == 0 || row == n - 1 || col == 0 || col == n - 1 {
                    score += match side {
                        Side::Own => -OWN_EDGE_PENALTY,
                        Side::Opponent => OPPONENT_EDGE_BONUS,
                    };
                }
            }
        }

        score
    }

    /// 计算每个候选点的威胁分和优势分
    ///
    /// - 威胁分：假设对手下在该点，经过该点的四条线上对手的棋型分
    /// - 优势分：假设己方下在该点，经过该点的四条线上己方的棋型分
    ///
    /// 两个表都包含每个候选点（无棋型时为 0）
    pub fn threats_and_favors(
        &self,
        board: &Board,
        candidates: &[Move],
    ) -> (HashMap<Move, i32>, HashMap<Move, i32>) {
        let mut threats = HashMap::with_capacity(candidates.len());
        let mut favors = HashMap::with_capacity(candidates.len());

        for &mv in candidates {
            threats.insert(mv, self.move_score(board, mv, Side::Opponent));
            favors.insert(mv, self.move_score(board, mv, Side::Own));
        }

        (threats, favors)
    }

    /// 假设 `side` 下在 `mv`，经过该点四条线上 `side` 的棋型分
    pub fn move_score(&self, board: &Board, mv: Move, side: Side) -> i32 {
        let mut line = Vec::with_capacity(board.size());
        DIRECTIONS
            .iter()
            .map(|&(dr, dc)| {
                read_line_through(board, mv, dr, dc, side, &mut line);
                self.catalog.score_line(&line, side)
            })
            .fold(0i32, i32::saturating_add)
    }
}

/// 遍历所有线的起点和方向
fn for_each_line(board: &Board, mut f: impl FnMut(i32, i32, i32, i32)) {
    let n = board.size() as i32;

    for i in 0..n {
        // 横线、竖线
        f(i, 0, 0, 1);
        f(0, i, 1, 0);
        // 主对角线（左上到右下）
        f(0, i, 1, 1);
        // 副对角线（右上到左下）
        f(0, i, 1, -1);
    }
    for i in 1..n {
        f(i, 0, 1, 1);
        f(i, n - 1, 1, -1);
    }
}

/// 从起点沿方向读取到棋盘边缘
fn read_line(board: &Board, row: i32, col: i32, dr: i32, dc: i32, line: &mut Vec<Option<Side>>) {
    line.clear();
    let (mut r, mut c) = (row, col);
    loop {
        match board.cell_at(r, c) {
            Cell::OffBoard => break,
            cell => line.push(cell.side()),
        }
        r += dr;
        c += dc;
    }
}

/// 读取经过 `mv` 的整条线，`mv` 处视为 `side` 的棋子
fn read_line_through(
    board: &Board,
    mv: Move,
    dr: i32,
    dc: i32,
    side: Side,
    line: &mut Vec<Option<Side>>,
) {
    let (mut row, mut col) = (mv.row as i32, mv.col as i32);
    while board.cell_at(row - dr, col - dc) != Cell::OffBoard {
        row -= dr;
        col -= dc;
    }
    read_line(board, row, col, dr, dc, line);

    let offset = (mv.row as i32 - row).abs().max((mv.col as i32 - col).abs()) as usize;
    if let Some(cell) = line.get_mut(offset) {
        *cell = Some(side);
    }
}

/// 八邻域内指定阵营的棋子数
fn count_neighbours(board: &Board, row: i32, col: i32, side: Side) -> i32 {
    let mut count = 0;
    for dr in -1..=1 {
        for dc in -1..=1 {
            if (dr != 0 || dc != 0) && board.cell_at(row + dr, col + dc).is_side(side) {
                count += 1;
            }
        }
    }
    count
}
