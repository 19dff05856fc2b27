//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive `taskboard_core` end-to-end against the SQLite gateway to
//!   verify crate wiring without any UI runtime.
//! - Keep output deterministic for quick local sanity checks.

use taskboard_core::db::open_db_in_memory;
use taskboard_core::{
    board_of, comments_of, BoardService, MemoryIdentityStore, SqliteGateway,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = std::env::temp_dir().join("taskboard-cli-logs");
    if let Some(log_dir) = log_dir.to_str() {
        if let Err(err) = taskboard_core::init_logging(taskboard_core::default_log_level(), log_dir)
        {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("taskboard_core version={}", taskboard_core::core_version());

    let conn = open_db_in_memory()?;
    let mut board = BoardService::new(SqliteGateway::new(&conn), MemoryIdentityStore::new());
    board.init().await?;

    let user_id = board.register_user("Tanaka", "tanaka@example.com").await?;
    let milk = board.create_task("buy milk").await?;
    let report = board.create_task("write report").await?;
    board.create_comment(milk, "low fat, please").await?;
    board.toggle_task(report).await?;

    let view = board_of(board.snapshot(), user_id);
    println!("incomplete={}", view.incomplete.len());
    for task in &view.incomplete {
        let thread = comments_of(board.snapshot(), task.id);
        println!("  [ ] {} comments={}", task.text, thread.len());
    }
    println!("complete={}", view.complete.len());
    for task in &view.complete {
        println!("  [x] {}", task.text);
    }

    board.logout();
    Ok(())
}
