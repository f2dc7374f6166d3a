//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BOARD_SIZE, DIRECTIONS, MAX_BOARD_SIZE, MIN_BOARD_SIZE, WIN_LENGTH};
use crate::error::{GomokuError, Result};
use crate::moves::Move;
use crate::side::{Cell, Side};

/// 对局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// 对局进行中
    InProgress,
    /// 某方获胜
    Won(Side),
    /// 棋盘已满，和棋
    Draw,
}

/// 棋盘
///
/// N×N 网格，索引为 row * N + col。`clone` 为深拷贝（包括走子历史），
/// 搜索时在副本上落子，不会影响调用方的棋盘。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// 边长
    size: usize,
    /// 获胜所需连子数
    win_length: usize,
    /// 格子，使用 Vec 以支持 serde
    cells: Vec<Option<Side>>,
    /// 走子历史（按时间顺序）
    history: Vec<(Move, Side)>,
    /// 终局标记（有人连成或棋盘已满）
    game_over: bool,
}

impl Board {
    /// 创建指定边长的空棋盘（五子获胜）
    pub fn new(size: usize) -> Result<Self> {
        Self::with_win_length(size, WIN_LENGTH)
    }

    /// 创建指定边长和获胜连子数的空棋盘
    pub fn with_win_length(size: usize, win_length: usize) -> Result<Self> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size)
            || win_length < 2
            || win_length > size
        {
            return Err(GomokuError::InvalidBoardSize { size, win_length });
        }
        Ok(Self {
            size,
            win_length,
            cells: vec![None; size * size],
            history: Vec::new(),
            game_over: false,
        })
    }

    /// 标准 16×16 棋盘
    pub fn standard() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            win_length: WIN_LENGTH,
            cells: vec![None; DEFAULT_BOARD_SIZE * DEFAULT_BOARD_SIZE],
            history: Vec::new(),
            game_over: false,
        }
    }

    /// 棋盘边长
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// 获胜所需连子数
    #[inline]
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// 坐标是否在棋盘内
    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    #[inline]
    fn index(&self, mv: Move) -> usize {
        mv.row as usize * self.size + mv.col as usize
    }

    /// 获取格子状态，越界返回 `Cell::OffBoard`
    pub fn cell_at(&self, row: i32, col: i32) -> Cell {
        if !self.in_bounds(row, col) {
            return Cell::OffBoard;
        }
        match self.cells[row as usize * self.size + col as usize] {
            Some(side) => Cell::Stone(side),
            None => Cell::Empty,
        }
    }

    /// 获取指定位置的棋子（越界视为无子）
    #[inline]
    pub fn get(&self, mv: Move) -> Option<Side> {
        if self.contains(mv) {
            self.cells[self.index(mv)]
        } else {
            None
        }
    }

    /// 走法坐标是否在棋盘内
    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        (mv.row as usize) < self.size && (mv.col as usize) < self.size
    }

    /// 指定位置是否为空位
    #[inline]
    pub fn is_empty_at(&self, mv: Move) -> bool {
        self.contains(mv) && self.cells[self.index(mv)].is_none()
    }

    /// 落子
    ///
    /// 越界或已有棋子时返回 false，棋盘不变
    pub fn place(&mut self, row: i32, col: i32, side: Side) -> bool {
        self.try_place(row, col, side).is_ok()
    }

    /// 落子（返回失败原因）
    pub fn try_place(&mut self, row: i32, col: i32, side: Side) -> Result<Move> {
        if !self.in_bounds(row, col) {
            return Err(GomokuError::OutOfBounds { row, col });
        }
        let mv = Move::new(row as u8, col as u8);
        let index = self.index(mv);
        if self.cells[index].is_some() {
            return Err(GomokuError::Occupied { row: mv.row, col: mv.col });
        }

        self.cells[index] = Some(side);
        self.history.push((mv, side));
        if !self.game_over {
            self.game_over = self.wins_through(mv, side) || self.is_full();
        }
        Ok(mv)
    }

    /// 按走法落子
    pub fn play(&mut self, mv: Move, side: Side) -> bool {
        self.place(mv.row as i32, mv.col as i32, side)
    }

    /// 悔棋：撤销最后一步
    pub fn undo(&mut self) -> Option<(Move, Side)> {
        let (mv, side) = self.history.pop()?;
        let index = self.index(mv);
        self.cells[index] = None;
        self.game_over = self.is_win(Side::Own) || self.is_win(Side::Opponent) || self.is_full();
        Some((mv, side))
    }

    /// 检查指定阵营是否已连成
    ///
    /// 对每个起点的四个方向各检查一次
    pub fn is_win(&self, side: Side) -> bool {
        if self.count(side) < self.win_length {
            return false;
        }

        let n = self.size as i32;
        let span = self.win_length as i32 - 1;
        for row in 0..n {
            for col in 0..n {
                if self.cells[(row * n + col) as usize] != Some(side) {
                    continue;
                }
                for &(dr, dc) in &DIRECTIONS {
                    if !self.in_bounds(row + dr * span, col + dc * span) {
                        continue;
                    }
                    if (1..=span).all(|k| self.cell_at(row + dr * k, col + dc * k).is_side(side)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// 检查经过指定位置的四条线上是否有指定阵营的连五
    pub fn wins_through(&self, mv: Move, side: Side) -> bool {
        if self.get(mv) != Some(side) {
            return false;
        }
        let (row, col) = (mv.row as i32, mv.col as i32);
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let forward = self.run_length(row, col, dr, dc, side);
            let backward = self.run_length(row, col, -dr, -dc, side);
            forward + backward + 1 >= self.win_length
        })
    }

    /// 从 (row, col) 出发（不含自身）沿方向连续同色棋子数
    fn run_length(&self, row: i32, col: i32, dr: i32, dc: i32, side: Side) -> usize {
        let mut count = 0;
        let (mut r, mut c) = (row + dr, col + dc);
        while self.cell_at(r, c).is_side(side) {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    /// 棋盘是否已满
    pub fn is_full(&self) -> bool {
        self.history.len() == self.cells.len()
    }

    /// 棋盘是否为空
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// 棋子总数
    pub fn stone_count(&self) -> usize {
        self.history.len()
    }

    /// 指定阵营的棋子数
    pub fn count(&self, side: Side) -> usize {
        self.cells.iter().filter(|c| **c == Some(side)).count()
    }

    /// 最后一步
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|(mv, _)| *mv)
    }

    /// 走子历史
    pub fn history(&self) -> &[(Move, Side)] {
        &self.history
    }

    /// 终局标记
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// 获胜方
    pub fn winner(&self) -> Option<Side> {
        if self.is_win(Side::Own) {
            Some(Side::Own)
        } else if self.is_win(Side::Opponent) {
            Some(Side::Opponent)
        } else {
            None
        }
    }

    /// 对局状态
    pub fn status(&self) -> GameStatus {
        match self.winner() {
            Some(side) => GameStatus::Won(side),
            None if self.is_full() => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }

    /// 所有空位（按行优先顺序）
    pub fn empty_cells(&self) -> impl Iterator<Item = Move> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.is_none()
                .then(|| Move::new((i / self.size) as u8, (i % self.size) as u8))
        })
    }

    /// 指定阵营的所有棋子位置
    pub fn stones(&self, side: Side) -> impl Iterator<Item = Move> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            (*c == Some(side)).then(|| Move::new((i / self.size) as u8, (i % self.size) as u8))
        })
    }

    /// 交换双方棋子（局面不变，视角互换）
    pub fn swap_sides(&self) -> Board {
        Board {
            size: self.size,
            win_length: self.win_length,
            cells: self.cells.iter().map(|c| c.map(|s| s.opponent())).collect(),
            history: self.history.iter().map(|(mv, s)| (*mv, s.opponent())).collect(),
            game_over: self.game_over,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
