//! 走法与走法生成

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::side::Side;

/// 走法（落子坐标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    /// 行
    pub row: u8,
    /// 列
    pub col: u8,
}

impl Move {
    /// 创建新走法
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 到另一点的切比雪夫距离
    pub fn chebyshev(&self, other: Move) -> u8 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成所有空位，按到中心的切比雪夫距离由近到远排列
    ///
    /// 中心点在前，之后一圈一圈向外：每圈先逐列取上下两行，再取左右两列。
    /// 五子棋中没有非法空位，`side` 仅为接口对称保留。
    pub fn generate(board: &Board, _side: Side) -> Vec<Move> {
        let size = board.size() as i32;
        let center = size / 2;
        let mut moves = Vec::with_capacity(board.size() * board.size() - board.stone_count());

        let push = |row: i32, col: i32, moves: &mut Vec<Move>| {
            if board.cell_at(row, col).is_empty() {
                moves.push(Move::new(row as u8, col as u8));
            }
        };

        push(center, center, &mut moves);

        for offset in 1..=center {
            // 上下两行
            for col in (center - offset)..=(center + offset) {
                push(center - offset, col, &mut moves);
                push(center + offset, col, &mut moves);
            }
            // 左右两列（不含角）
            for row in (center - offset + 1)..=(center + offset - 1) {
                push(row, center - offset, &mut moves);
                push(row, center + offset, &mut moves);
            }
        }

        moves
    }

    /// 棋盘中心
    pub fn center(board: &Board) -> Move {
        let center = (board.size() / 2) as u8;
        Move::new(center, center)
    }

    /// 检查走法是否合法（在棋盘内且为空位）
    pub fn is_legal(board: &Board, mv: Move) -> bool {
        board.is_empty_at(mv)
    }
}
