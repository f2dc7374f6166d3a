//! 棋盘文本格式
//!
//! 每行一个字符串，`X` 为己方，`O` 为对手，`.` 或 `_` 为空位。
//! 行之间用换行或 `/` 分隔，例如 5×5 棋盘：
//! `...../.XO../..X../...../.....`

use crate::board::Board;
use crate::error::{GomokuError, Result};
use crate::side::{Cell, Side};

/// 棋盘文本格式处理
pub struct Notation;

impl Notation {
    /// 解析文本为棋盘（走子历史按阅读顺序）
    pub fn parse(text: &str) -> Result<Board> {
        let rows: Vec<&str> = text
            .split(['/', '\n'])
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();

        if rows.is_empty() {
            return Err(GomokuError::InvalidNotation {
                reason: "Empty board text".to_string(),
            });
        }

        let size = rows.len();
        let mut board = Board::new(size).map_err(|e| GomokuError::InvalidNotation {
            reason: e.to_string(),
        })?;

        for (row_idx, row) in rows.iter().enumerate() {
            let cells: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != size {
                return Err(GomokuError::InvalidNotation {
                    reason: format!(
                        "Row {} has {} columns, expected {}",
                        row_idx,
                        cells.len(),
                        size
                    ),
                });
            }

            for (col_idx, c) in cells.into_iter().enumerate() {
                match c {
                    '.' | '_' => {}
                    _ => {
                        let side = Side::from_char(c).ok_or_else(|| GomokuError::InvalidNotation {
                            reason: format!("Invalid cell character: {}", c),
                        })?;
                        board.try_place(row_idx as i32, col_idx as i32, side)?;
                    }
                }
            }
        }

        Ok(board)
    }

    /// 将棋盘转换为多行文本
    pub fn to_string(board: &Board) -> String {
        Self::rows(board).join("\n")
    }

    /// 将棋盘转换为单行文本（`/` 分隔）
    pub fn to_compact(board: &Board) -> String {
        Self::rows(board).join("/")
    }

    fn rows(board: &Board) -> Vec<String> {
        let n = board.size() as i32;
        (0..n)
            .map(|row| {
                (0..n)
                    .map(|col| match board.cell_at(row, col) {
                        Cell::Stone(side) => side.to_char(),
                        _ => '.',
                    })
                    .collect()
            })
            .collect()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&Notation::to_string(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;

    #[test]
    fn test_parse_board() {
        let board = Notation::parse(
            "
            .....
            .XO..
            ..X..
            .....
            .....
            ",
        )
        .unwrap();

        assert_eq!(board.size(), 5);
        assert_eq!(board.cell_at(1, 1), Cell::Stone(Side::Own));
        assert_eq!(board.cell_at(1, 2), Cell::Stone(Side::Opponent));
        assert_eq!(board.cell_at(2, 2), Cell::Stone(Side::Own));
        assert_eq!(board.stone_count(), 3);
        assert_eq!(board.last_move(), Some(Move::new(2, 2)));
    }

    #[test]
    fn test_compact_form() {
        let text = "...../.XO../..X../...../.....";
        let board = Notation::parse(text).unwrap();
        assert_eq!(Notation::to_compact(&board), text);
        assert_eq!(board.to_string().lines().count(), 5);
    }

    #[test]
    fn test_invalid_notation() {
        // 空文本
        assert!(Notation::parse("").is_err());

        // 列数不对
        assert!(Notation::parse("...../..../...../...../.....").is_err());

        // 无效字符
        assert!(matches!(
            Notation::parse("...../..#../...../...../....."),
            Err(GomokuError::InvalidNotation { .. })
        ));

        // 尺寸过小
        assert!(Notation::parse("../..").is_err());
    }
}
