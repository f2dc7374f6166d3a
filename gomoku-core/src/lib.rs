//! 五子棋核心数据结构
//!
//! 包含:
//! - 棋盘、格子、阵营等核心数据结构
//! - 胜负判定
//! - 中心向外的走法生成
//! - 棋盘文本格式

mod board;
mod constants;
mod error;
mod moves;
mod notation;
mod side;

pub use board::{Board, GameStatus};
pub use constants::*;
pub use error::{GomokuError, Result};
pub use moves::{Move, MoveGenerator};
pub use notation::Notation;
pub use side::{Cell, Side};
