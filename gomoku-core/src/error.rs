//! 错误类型定义

use thiserror::Error;

/// 棋盘规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GomokuError {
    /// 坐标超出棋盘
    #[error("Position out of bounds: ({row}, {col})")]
    OutOfBounds { row: i32, col: i32 },

    /// 该位置已有棋子
    #[error("Cell is already occupied: ({row}, {col})")]
    Occupied { row: u8, col: u8 },

    /// 棋盘尺寸不受支持
    #[error("Unsupported board size: {size} (win length {win_length})")]
    InvalidBoardSize { size: usize, win_length: usize },

    /// 无效的棋盘文本
    #[error("Invalid board notation: {reason}")]
    InvalidNotation { reason: String },
}

/// 棋盘操作结果类型
pub type Result<T> = std::result::Result<T, GomokuError>;
