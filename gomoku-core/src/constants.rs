//! 棋盘常量定义

/// 默认棋盘边长（本地对局）
pub const DEFAULT_BOARD_SIZE: usize = 16;

/// 在线对战使用的棋盘边长
pub const ONLINE_BOARD_SIZE: usize = 19;

/// 允许的最小棋盘边长
pub const MIN_BOARD_SIZE: usize = 5;

/// 允许的最大棋盘边长
pub const MAX_BOARD_SIZE: usize = 19;

/// 获胜所需的连子数
pub const WIN_LENGTH: usize = 5;

/// 四个方向：横、竖、主对角线、副对角线 (d_row, d_col)
pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
