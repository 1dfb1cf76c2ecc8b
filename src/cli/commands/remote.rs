use crate::api::client::ApiClient;
use crate::cli::commands::token::load_token;
use crate::cli::parser::{Commands, RemoteAction};
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::marking::{Copyright, SongType};
use crate::ui::messages::{info, success, warning};
use serde_json::Value;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Remote { action } = cmd else {
        return Ok(());
    };

    let pool = DbPool::new(&cfg.database)?;
    let token = load_token(&pool)?;
    let client = ApiClient::new(cfg, token.as_deref())?;

    match action {
        RemoteAction::Search {
            kind,
            keyword,
            page,
            page_size,
        } => {
            let result = client.search(kind, keyword, *page, *page_size)?;
            if result.data.is_empty() {
                warning(format!("No {kind} matches '{keyword}'."));
            } else {
                for item in &result.data {
                    println!("{}", summarize(item));
                }
            }
            if let Some(total) = result.extra.get("total") {
                info(format!("total: {total}"));
            }
        }

        RemoteAction::Song { id } => {
            let song = client.select_song(*id)?;
            println!("{}", serde_json::to_string_pretty(&song)?);
        }

        RemoteAction::Video { bvid } => {
            let video = client.select_video(bvid)?;
            println!("{}", serde_json::to_string_pretty(&video)?);
            if let Some(c) = video.copyright_kind() {
                info(format!("copyright: {}", c.label()));
            }
        }

        RemoteAction::Artist { kind, id } => {
            let artist = client.select_artist(kind, *id)?;
            println!("{}", serde_json::to_string_pretty(&artist)?);
        }

        RemoteAction::RenameArtist {
            kind,
            id,
            name,
            yes,
        } => {
            let preview = client.edit_artist_check(kind, *id, name)?;
            println!("Current : {}", summarize(&preview.old_artist));
            println!("New name: {name}");
            if *yes {
                client.edit_artist_confirm(&preview.task_id)?;
                success("Rename confirmed.");
                ttlog_quiet(
                    &pool.conn,
                    "edit_artist",
                    &format!("{kind}/{id}"),
                    &format!("renamed to {name}"),
                );
            } else {
                info(format!(
                    "Pending task {}. Re-run with --yes to confirm.",
                    preview.task_id
                ));
            }
        }

        RemoteAction::EditSong {
            id,
            name,
            song_type,
            vocadb_id,
            display_name,
        } => {
            let mut song = client.select_song(*id)?;
            if let Some(n) = name {
                song.name = n.clone();
            }
            if let Some(t) = song_type {
                let parsed = SongType::parse(t)
                    .ok_or_else(|| AppError::Other(format!("unknown song type '{t}'")))?;
                song.song_type = parsed.as_str().to_string();
            }
            if let Some(v) = vocadb_id {
                song.vocadb_id = *v;
            }
            if let Some(d) = display_name {
                song.display_name = d.clone();
            }
            client.edit_song(&song)?;
            success(format!("Song {} saved.", song.id));
            ttlog_quiet(&pool.conn, "edit_song", &song.id.to_string(), &song.name);
        }

        RemoteAction::EditVideo {
            bvid,
            title,
            copyright,
        } => {
            let mut video = client.select_video(bvid)?;
            if let Some(t) = title {
                video.title = t.clone();
            }
            if let Some(code) = copyright {
                Copyright::from_code(*code)
                    .ok_or_else(|| AppError::Other(format!("unknown copyright code {code}")))?;
                video.copyright = *code;
            }
            client.edit_video(&video)?;
            success(format!("Video {} saved.", video.bvid));
            ttlog_quiet(&pool.conn, "edit_video", &video.bvid, &video.title);
        }
    }

    Ok(())
}

/// One line for a search hit or artist object: id, then the first name-like field.
fn summarize(item: &Value) -> String {
    let id = item
        .get("id")
        .or_else(|| item.get("bvid"))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default();
    let name = ["display_name", "name", "title"]
        .iter()
        .find_map(|k| item.get(*k).and_then(Value::as_str))
        .unwrap_or_default();
    if id.is_empty() && name.is_empty() {
        item.to_string()
    } else {
        format!("{id}\t{name}")
    }
}
