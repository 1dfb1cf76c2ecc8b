use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::issue::{end_time_of, issue_before, issue_now, start_time_of};
use crate::errors::AppResult;
use crate::models::board::{BasicSection, Board};
use crate::ui::messages::{header, info};
use crate::utils::date::{format_instant, now_local, parse_instant};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, _cfg: &Config) -> AppResult<()> {
    let Commands::Issue { at, board, issue } = cmd else {
        return Ok(());
    };

    let now = match at {
        Some(s) => parse_instant(s)?,
        None => now_local(),
    };

    if let Some(id) = board {
        let board = Board::at(id, *issue, now)?;
        header(board.display_name());
        println!("Board : {}", board.full_id());
        println!("Issue : {}", board.issue);
        match board.rank_date_range() {
            Some(range) => println!("Range : {range}"),
            None => info("Special boards have no fixed time window."),
        }
        return Ok(());
    }

    // one clock reading for the header and both columns
    let before = issue_before(now);
    let open = issue_now(now);

    header(format!("Issues at {}", format_instant(now)));

    let mut table = Table::new(vec![
        Column::new("Section", 10),
        Column::new("Closed", 8),
        Column::new("Open", 8),
        Column::new("Open since", 16),
        Column::new("Closes at", 16),
    ]);

    for section in BasicSection::ALL {
        let current = open.get(section);
        table.add_row(vec![
            section.as_str().to_string(),
            before.get(section).to_string(),
            current.to_string(),
            format_instant(start_time_of(current, section)),
            format_instant(end_time_of(current, section)),
        ]);
    }

    print!("{}", table.render());
    Ok(())
}
