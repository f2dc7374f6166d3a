//! 自我对弈
//!
//! 运行方式:
//! ```bash
//! cargo run -p gomoku-ai --example self_play -- [medium|easy|hard]
//! ```

use gomoku_ai::{tactics, AiEngine, Difficulty};
use gomoku_core::{Board, GameStatus, Notation, Side};

fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let difficulty = match std::env::args().nth(1).as_deref() {
        Some("easy") => Difficulty::Easy,
        Some("hard") => Difficulty::Hard,
        _ => Difficulty::Medium,
    };

    // 两个引擎都以己方身份思考，每步后交换视角
    let mut black = AiEngine::from_difficulty(difficulty);
    let mut white = AiEngine::from_difficulty(difficulty);
    let max_depth = black.config().max_depth;
    let budget = black.config().time_limit_ms as f64 / 1000.0;

    let mut board = Board::standard();
    let mut black_to_move = true;

    println!("=== 五子棋自我对弈 ({:?}) ===\n", difficulty);

    while board.status() == GameStatus::InProgress {
        let engine = if black_to_move { &mut black } else { &mut white };
        let Some(mv) = engine.best_move(&board, max_depth, budget) else {
            break;
        };
        board.try_place(mv.row as i32, mv.col as i32, Side::Own)?;
        println!(
            "{} 第 {} 手: {}",
            if black_to_move { "黑" } else { "白" },
            board.stone_count(),
            mv
        );

        if board.is_win(Side::Own) {
            println!("\n{}\n", board);
            println!("{} 胜", if black_to_move { "黑" } else { "白" });
            println!("终局: {}", Notation::to_compact(&board));
            return Ok(());
        }
        if tactics::has_open_run(&board, Side::Own, board.win_length() - 1) {
            println!("  形成活四");
        }

        board = board.swap_sides();
        black_to_move = !black_to_move;
    }

    println!("\n{}\n", board);
    println!("和棋");
    println!("终局: {}", Notation::to_compact(&board));
    Ok(())
}
