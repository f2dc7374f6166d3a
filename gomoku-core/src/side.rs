//! 阵营与格子状态

use serde::{Deserialize, Serialize};

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 己方（AI 搜索方）
    Own,
    /// 对手
    Opponent,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::Own => Side::Opponent,
            Side::Opponent => Side::Own,
        }
    }

    /// 索引（Zobrist 表等使用）
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Side::Own => 0,
            Side::Opponent => 1,
        }
    }

    /// 获取文本字符
    pub fn to_char(&self) -> char {
        match self {
            Side::Own => 'X',
            Side::Opponent => 'O',
        }
    }

    /// 从文本字符解析
    pub fn from_char(c: char) -> Option<Side> {
        match c {
            'X' | 'x' => Some(Side::Own),
            'O' | 'o' => Some(Side::Opponent),
            _ => None,
        }
    }
}

/// 格子状态
///
/// 越界坐标返回 `OffBoard`，而不是 panic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// 空位
    Empty,
    /// 有棋子
    Stone(Side),
    /// 棋盘外（不可落子）
    OffBoard,
}

impl Cell {
    /// 是否为空位
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// 是否为指定阵营的棋子
    #[inline]
    pub fn is_side(&self, side: Side) -> bool {
        matches!(self, Cell::Stone(s) if *s == side)
    }

    /// 获取棋子阵营
    pub fn side(&self) -> Option<Side> {
        match self {
            Cell::Stone(side) => Some(*side),
            _ => None,
        }
    }
}
