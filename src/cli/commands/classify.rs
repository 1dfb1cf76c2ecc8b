use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::filename::classify;
use crate::errors::AppResult;
use crate::models::identity::FileIdentity;
use crate::ui::messages::{success, warning};
use std::path::Path;

pub fn handle(cmd: &Commands, _cfg: &Config) -> AppResult<()> {
    let Commands::Classify { file } = cmd else {
        return Ok(());
    };

    let name = Path::new(file)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file.as_str());
    let identity = classify(name);

    match identity.validate() {
        Ok(()) => success(format!("{name}: {identity}")),
        Err(e) => warning(format!("{name}: {identity} ({e})")),
    }

    match &identity {
        FileIdentity::Board(b) => {
            println!("board : {}", b.board.as_str());
            println!("part  : {}", b.part.as_str());
            println!("date  : {}", b.date_text);
            if let Ok(issue) = b.issue() {
                println!("issue : {issue}");
            }
        }
        FileIdentity::Data(d) => {
            if let Ok(date) = d.date_string() {
                println!("date  : {date}");
            } else {
                println!("date  : {}", d.date_text);
            }
        }
    }

    Ok(())
}
