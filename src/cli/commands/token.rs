use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::storage::{self, API_TOKEN_KEY};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Token { set, clear, show } = cmd else {
        return Ok(());
    };

    let pool = DbPool::new(&cfg.database)?;

    if let Some(token) = set {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Other("the token must not be empty".into()));
        }
        storage::set(&pool.conn, API_TOKEN_KEY, token)?;
        ttlog_quiet(&pool.conn, "token", "set", "API token stored");
        success("API token stored.");
    } else if *clear {
        if storage::remove(&pool.conn, API_TOKEN_KEY)? {
            ttlog_quiet(&pool.conn, "token", "clear", "API token removed");
            success("API token removed.");
        } else {
            info("No API token was stored.");
        }
    } else if *show {
        match storage::get(&pool.conn, API_TOKEN_KEY)? {
            Some(token) => println!("🔑 {}", mask(&token)),
            None => warning("No API token stored. Use `vocamark token --set <TOKEN>`."),
        }
    } else {
        info("Nothing to do: use --set, --clear or --show.");
    }

    Ok(())
}

/// Keep the last four characters visible.
pub fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

/// The stored credential, if any.
pub fn load_token(pool: &DbPool) -> AppResult<Option<String>> {
    storage::get(&pool.conn, API_TOKEN_KEY)
}
