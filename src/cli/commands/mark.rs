use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::bookmarks::{BookmarkPersistence, BookmarkStore};
use crate::core::ingest::ParseTask;
use crate::core::pagination::render_page_items;
use crate::core::session::{MarkingMode, MarkingSession};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::storage::SqliteBookmarkPersistence;
use crate::errors::{AppError, AppResult};
use crate::export::{ExportFormat, ExportLogic, ExportOptions};
use crate::models::marking::{Copyright, SvChart, split_tags, suspicious_tags, video_url};
use crate::models::record::{Record, fields};
use crate::ui::messages::{info, success, warning};
use crate::utils::formatting::check_mark;
use crate::utils::path::{display_name, expand_tilde};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Mark {
        file,
        sv,
        page,
        page_size,
        search,
        jump,
        include_all,
        exclude_all,
        include,
        exclude,
        set,
        bookmark,
        bookmarked,
        export,
        keep_excluded,
        format,
        force,
    } = cmd
    else {
        return Ok(());
    };

    let mode = if *sv {
        MarkingMode::Sv
    } else {
        MarkingMode::Standard
    };
    let mut session = MarkingSession::new(mode, page_size.unwrap_or(cfg.page_size));

    let source = expand_tilde(file);
    info(format!("Loading {}…", source.display()));
    let count = session.load_from(ParseTask::from_path(&source)?)?;
    success(format!(
        "{count} rows loaded, {} included.",
        session.included_count()
    ));

    if *include_all {
        session.set_all_included(true);
    }
    if *exclude_all {
        session.set_all_included(false);
    }
    for &index in include {
        session.set_include(index, true)?;
    }
    for &index in exclude {
        session.set_include(index, false)?;
    }
    for edit in set {
        let (index, field, value) = parse_cell_edit(edit)?;
        session.update_field(index, &field, value)?;
    }

    let pool = DbPool::new(&cfg.database)?;
    let mut store = BookmarkStore::open(SqliteBookmarkPersistence::new(pool))?;

    if let Some(index) = bookmark {
        let record = session.record(*index).ok_or(AppError::InvalidIndex {
            index: *index,
            len: session.len(),
        })?;
        let title = record_title(record);
        if store.toggle(*index, &title, None)? {
            success(format!("Bookmarked #{index} {title}"));
        } else {
            info(format!("Bookmark removed from #{index} {title}"));
        }
    }

    if let Some(out) = export {
        let out_path = if out.trim().is_empty() {
            expand_tilde(&cfg.export_file_name)
        } else {
            expand_tilde(out)
        };
        let format = format
            .or_else(|| ExportFormat::from_path(&out_path))
            .unwrap_or_default();
        let options = ExportOptions {
            keep_excluded: *keep_excluded,
        };

        let written = ExportLogic::export_session(&session, options, format, &out_path, *force)?;
        ttlog_quiet(
            store.persistence().conn(),
            "export",
            &display_name(&out_path),
            &format!(
                "{written} of {} rows from {} exported as {}",
                session.len(),
                display_name(&source),
                format.as_str()
            ),
        );
        return Ok(());
    }

    if let Some(query) = search {
        let hits = session.search(query);
        if hits.is_empty() {
            warning(format!("No rows match '{query}'."));
            return Ok(());
        }
        info(format!("{} rows match '{query}':", hits.len()));
        print_rows(&session, &hits, &store);
        return Ok(());
    }

    if *bookmarked {
        let marks: Vec<usize> = store
            .all()
            .iter()
            .map(|b| b.index)
            .filter(|i| *i < session.len())
            .collect();
        if marks.is_empty() {
            info("No bookmarked rows in this file.");
        } else {
            print_rows(&session, &marks, &store);
        }
        return Ok(());
    }

    if session.is_empty() {
        warning("The workbook has no data rows.");
        return Ok(());
    }

    if let Some(index) = jump {
        session.jump_to(*index)?;
    } else if let Some(p) = page {
        session.set_page(*p)?;
    }

    let offset = session.page_offset();
    let indices: Vec<usize> = (offset..offset + session.current_page().len()).collect();
    print_rows(&session, &indices, &store);
    println!(
        "\nPage {}  {}",
        session.page_number(),
        render_page_items(session.page_number(), session.page_count())
    );

    Ok(())
}

/// `INDEX:FIELD=VALUE`, e.g. `3:vocalist=初音ミク`.
fn parse_cell_edit(edit: &str) -> AppResult<(usize, String, String)> {
    let bad = || AppError::Other(format!("expected INDEX:FIELD=VALUE, got '{edit}'"));
    let (index, rest) = edit.split_once(':').ok_or_else(bad)?;
    let (field, value) = rest.split_once('=').ok_or_else(bad)?;
    let index = index.trim().parse::<usize>().map_err(|_| bad())?;
    let field = field.trim();
    if field.is_empty() {
        return Err(bad());
    }
    Ok((index, field.to_string(), value.to_string()))
}

fn record_title(record: &Record) -> String {
    let title = record.text(fields::TITLE);
    if title.is_empty() {
        record.text(fields::NAME)
    } else {
        title
    }
}

fn print_rows<P: BookmarkPersistence>(
    session: &MarkingSession,
    indices: &[usize],
    store: &BookmarkStore<P>,
) {
    let mode = session.mode();
    let mut table = match mode {
        MarkingMode::Standard => Table::new(vec![
            Column::new("#", 6),
            Column::new("In", 2),
            Column::new("★", 2),
            Column::new("Title", 36),
            Column::new("Producer", 20),
            Column::new("Vocalist", 20),
            Column::new("Synth", 12),
            Column::new("Copyright", 10),
            Column::new("Link", 45),
        ]),
        MarkingMode::Sv => Table::new(vec![
            Column::new("#", 6),
            Column::new("In", 2),
            Column::new("★", 2),
            Column::new("Title", 36),
            Column::new("Chart", 20),
            Column::new("Copyright", 10),
            Column::new("Link", 45),
        ]),
    };

    let mut slips: Vec<String> = Vec::new();

    for &index in indices {
        let Some(record) = session.record(index) else {
            continue;
        };
        let included = check_mark(session.is_included(index).unwrap_or(false)).to_string();
        let star = if store.is_bookmarked(index) { "★" } else { "" }.to_string();
        let copyright = copyright_label(record);
        let link = video_url(record, mode).unwrap_or_default();

        for field in [fields::PRODUCER, fields::VOCALIST, fields::SYNTHESIZER] {
            for tag in suspicious_tags(&record.text(field)) {
                slips.push(format!("#{index} {field}: '{tag}'"));
            }
        }

        let row = match mode {
            MarkingMode::Standard => vec![
                index.to_string(),
                included,
                star,
                record_title(record),
                record.text(fields::PRODUCER),
                record.text(fields::VOCALIST),
                record.text(fields::SYNTHESIZER),
                copyright,
                link,
            ],
            MarkingMode::Sv => vec![
                index.to_string(),
                included,
                star,
                record_title(record),
                chart_labels(&record.text(fields::SYNTHESIZER)),
                copyright,
                link,
            ],
        };
        table.add_row(row);
    }

    print!("{}", table.render());

    if !slips.is_empty() {
        warning("Names with leading/trailing blanks:");
        for slip in slips {
            println!("   - {slip}");
        }
    }
}

fn copyright_label(record: &Record) -> String {
    let raw = record.text(fields::COPYRIGHT);
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(Copyright::from_code)
        .map(|c| c.label().to_string())
        .unwrap_or(raw)
}

fn chart_labels(cell: &str) -> String {
    split_tags(cell)
        .iter()
        .map(|code| {
            SvChart::from_code(code)
                .map(|c| c.label().to_string())
                .unwrap_or_else(|| code.clone())
        })
        .collect::<Vec<_>>()
        .join("、")
}
