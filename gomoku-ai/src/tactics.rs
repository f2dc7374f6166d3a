//! 战术扫描
//!
//! 搜索前的快速检查：一步成五、一步成活四。

use gomoku_core::{Board, Move, Side, DIRECTIONS};

/// 假设 `side` 下在 `mv`，在方向 (dr, dc) 上经过该点的连续棋子数，
/// 以及两端的延伸格子是否开放
fn run_through(board: &Board, mv: Move, side: Side, dr: i32, dc: i32) -> (usize, bool, bool) {
    let (row, col) = (mv.row as i32, mv.col as i32);
    let mut length = 1;

    let mut forward = 1;
    while board.cell_at(row + dr * forward, col + dc * forward).is_side(side) {
        forward += 1;
    }
    let mut backward = 1;
    while board.cell_at(row - dr * backward, col - dc * backward).is_side(side) {
        backward += 1;
    }
    length += (forward - 1 + backward - 1) as usize;

    let forward_open = board.cell_at(row + dr * forward, col + dc * forward).is_empty();
    let backward_open = board.cell_at(row - dr * backward, col - dc * backward).is_empty();
    (length, forward_open, backward_open)
}

/// `side` 下在 `mv` 是否立即获胜
pub fn wins_with(board: &Board, mv: Move, side: Side) -> bool {
    board.is_empty_at(mv)
        && DIRECTIONS
            .iter()
            .any(|&(dr, dc)| run_through(board, mv, side, dr, dc).0 >= board.win_length())
}

/// 所有能让 `side` 立即获胜的候选点
pub fn winning_moves(board: &Board, side: Side, candidates: &[Move]) -> Vec<Move> {
    candidates
        .iter()
        .copied()
        .filter(|mv| wins_with(board, *mv, side))
        .collect()
}

/// 第一个能让 `side` 立即获胜的候选点
pub fn first_winning_move(board: &Board, side: Side, candidates: &[Move]) -> Option<Move> {
    candidates.iter().copied().find(|mv| wins_with(board, *mv, side))
}

/// 假设 `side` 下在 `mv`，是否形成经过该点、长度至少为 `len` 的开放连子
///
/// 至少一端延伸格为空即为开放；达到获胜长度的连子总是开放的。
/// 连子取极大长度，所以延伸格不会是同色棋子。
pub fn open_run_through(board: &Board, mv: Move, side: Side, len: usize) -> bool {
    if !board.is_empty_at(mv) {
        return false;
    }
    DIRECTIONS.iter().any(|&(dr, dc)| {
        let (length, forward_open, backward_open) = run_through(board, mv, side, dr, dc);
        length >= board.win_length() || (length >= len && (forward_open || backward_open))
    })
}

/// 棋盘上 `side` 是否已有长度至少为 `len` 的开放连子
pub fn has_open_run(board: &Board, side: Side, len: usize) -> bool {
    board.stones(side).any(|mv| {
        let (row, col) = (mv.row as i32, mv.col as i32);
        DIRECTIONS.iter().any(|&(dr, dc)| {
            // 只从连子的起点开始数
            if board.cell_at(row - dr, col - dc).is_side(side) {
                return false;
            }
            let mut length = 1;
            while board.cell_at(row + dr * length, col + dc * length).is_side(side) {
                length += 1;
            }
            let open = board.cell_at(row - dr, col - dc).is_empty()
                || board.cell_at(row + dr * length, col + dc * length).is_empty();
            length as usize >= board.win_length() || (length as usize >= len && open)
        })
    })
}

/// 所有能让 `side` 形成活四（获胜长度减一的开放连子）的候选点
pub fn open_four_moves(board: &Board, side: Side, candidates: &[Move]) -> Vec<Move> {
    let len = board.win_length().saturating_sub(1).max(1);
    candidates
        .iter()
        .copied()
        .filter(|mv| open_run_through(board, *mv, side, len))
        .collect()
}
