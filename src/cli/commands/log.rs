use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::recent;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::formatting::{pad_right, truncate};
use unicode_width::UnicodeWidthStr;

/// Widest the `operation (target)` column may get.
const OP_WIDTH: usize = 60;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log { print, limit } = cmd else {
        return Ok(());
    };
    if !*print {
        return Ok(());
    }

    let pool = DbPool::new(&cfg.database)?;
    let mut entries = recent(&pool.conn, *limit)?;
    if entries.is_empty() {
        info("The internal log is empty.");
        return Ok(());
    }
    // oldest first, like a log file
    entries.reverse();

    let rows: Vec<(String, String, String, String)> = entries
        .into_iter()
        .map(|e| {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(e.date);
            let op_target = if e.target.is_empty() {
                e.operation
            } else {
                format!("{} ({})", e.operation, e.target)
            };
            (e.id.to_string(), date, truncate(&op_target, OP_WIDTH), e.message)
        })
        .collect();

    let id_w = rows.iter().map(|r| r.0.len()).max().unwrap_or(1);
    let date_w = rows.iter().map(|r| r.1.len()).max().unwrap_or(10);
    let op_w = rows
        .iter()
        .map(|r| UnicodeWidthStr::width(r.2.as_str()))
        .max()
        .unwrap_or(10);

    println!("📜 Internal log:\n");
    for (id, date, op_target, message) in rows {
        println!(
            "{:>id_w$}: {:<date_w$} | {} => {}",
            id,
            date,
            pad_right(&op_target, op_w),
            message,
            id_w = id_w,
            date_w = date_w
        );
    }

    Ok(())
}
