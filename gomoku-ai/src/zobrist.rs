//! Zobrist 哈希
//!
//! 用于快速计算棋局的哈希值，支持增量更新

use gomoku_core::{Board, Move, Side, MAX_BOARD_SIZE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const CELLS: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE;

/// Zobrist 哈希表
///
/// 按最大棋盘尺寸为每个格子的每一方生成随机数，索引为 row * MAX_BOARD_SIZE + col
pub struct ZobristTable {
    /// 棋子哈希值 [cell][side]
    stones: Vec<[u64; 2]>,
    /// 对手走子时的哈希值
    side_to_move: u64,
}

impl ZobristTable {
    /// 创建新的 Zobrist 表（使用固定种子保证确定性）
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(0x60B0_4B05_EED5_1234);

        let stones = (0..CELLS).map(|_| [rng.gen(), rng.gen()]).collect();

        Self {
            stones,
            side_to_move: rng.gen(),
        }
    }

    /// 计算棋盘的完整哈希值
    pub fn hash(&self, board: &Board, side_to_move: Side) -> u64 {
        let mut hash = 0u64;

        for (mv, side) in board.history() {
            hash ^= self.stone_hash(*mv, *side);
        }

        if side_to_move == Side::Opponent {
            hash ^= self.side_to_move;
        }

        hash
    }

    /// 获取棋子的哈希值
    #[inline]
    pub fn stone_hash(&self, mv: Move, side: Side) -> u64 {
        self.stones[mv.row as usize * MAX_BOARD_SIZE + mv.col as usize][side.index()]
    }

    /// 获取走子方切换的哈希值
    #[inline]
    pub fn side_hash(&self) -> u64 {
        self.side_to_move
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}
