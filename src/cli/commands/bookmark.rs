use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::bookmarks::{BookmarkStore, default_export_file_name};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::storage::SqliteBookmarkPersistence;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::today;
use crate::utils::path::{display_name, expand_tilde};
use crate::utils::table::{Column, Table};
use chrono::{Local, TimeZone};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Bookmark {
        list,
        add,
        remove,
        toggle,
        annotate,
        title,
        note,
        export,
        import,
        clear,
        force,
    } = cmd
    else {
        return Ok(());
    };

    let pool = DbPool::new(&cfg.database)?;
    let mut store = BookmarkStore::open(SqliteBookmarkPersistence::new(pool))?;
    let title = title.as_deref().unwrap_or_default();

    if let Some(index) = add {
        if store.add(*index, title, note.clone())? {
            success(format!("Bookmarked #{index} {title}"));
        } else {
            warning(format!("#{index} is already bookmarked."));
        }
    }

    if let Some(index) = toggle {
        if store.toggle(*index, title, note.clone())? {
            success(format!("Bookmarked #{index} {title}"));
        } else {
            info(format!("Bookmark #{index} removed."));
        }
    }

    if let Some(index) = remove {
        if store.remove(*index)? {
            success(format!("Bookmark #{index} removed."));
        } else {
            warning(format!("#{index} is not bookmarked."));
        }
    }

    if let Some(index) = annotate {
        let text = note.as_deref().unwrap_or_default();
        if store.update_note(*index, text)? {
            success(format!("Note of #{index} updated."));
        } else {
            warning(format!("#{index} is not bookmarked."));
        }
    }

    if let Some(path) = import {
        let path = expand_tilde(path);
        let count = ExportLogic::import_bookmarks(&mut store, &path)?;
        success(format!("{count} bookmarks imported from {}", path.display()));
        ttlog_quiet(
            store_conn(&store),
            "bookmark_import",
            &display_name(&path),
            &format!("{count} bookmarks imported"),
        );
    }

    if let Some(out) = export {
        let path = if out.trim().is_empty() {
            expand_tilde(&default_export_file_name(today()))
        } else {
            expand_tilde(out)
        };
        let count = ExportLogic::export_bookmarks(&store, &path, *force)?;
        ttlog_quiet(
            store_conn(&store),
            "bookmark_export",
            &display_name(&path),
            &format!("{count} bookmarks exported"),
        );
    }

    if *clear {
        store.clear()?;
        success("All bookmarks cleared.");
    }

    if *list {
        if store.is_empty() {
            info("No bookmarks.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("#", 6),
            Column::new("Title", 40),
            Column::new("Added", 16),
            Column::new("Note", 40),
        ]);
        for b in store.all() {
            let added = Some(b.timestamp)
                .filter(|ts| *ts > 0)
                .and_then(|ts| Local.timestamp_millis_opt(ts).single())
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            table.add_row(vec![
                b.index.to_string(),
                b.title.clone(),
                added,
                b.note.clone().unwrap_or_default(),
            ]);
        }
        print!("{}", table.render());
        info(format!("{} bookmarks", store.len()));
    }

    Ok(())
}

fn store_conn(store: &BookmarkStore<SqliteBookmarkPersistence>) -> &rusqlite::Connection {
    store.persistence().conn()
}
