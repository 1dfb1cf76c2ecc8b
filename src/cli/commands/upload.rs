use crate::api::client::ApiClient;
use crate::api::events::CancelHandle;
use crate::cli::commands::token::load_token;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::upload::{UploadOptions, UploadOutcome, UploadPlan};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, progress, progress_done, success};
use crate::utils::path::{display_name, expand_tilde};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Upload {
        file,
        check_only,
        old,
    } = cmd
    else {
        return Ok(());
    };

    let path = expand_tilde(file);
    let plan = UploadPlan::from_path(&path)?;
    info(format!("{}: {}", display_name(&path), plan.identity));

    let pool = DbPool::new(&cfg.database)?;
    let token = load_token(&pool)?;
    let client = ApiClient::new(cfg, token.as_deref())?;

    let options = UploadOptions {
        check_only: *check_only,
        old: *old,
    };

    info(format!("Uploading to {}…", client.base_url()));
    let mut saw_progress = false;
    // Ctrl-C ends the process and drops the stream; nothing here fires the handle.
    let result = plan.execute(&client, options, CancelHandle::new(), |text| {
        saw_progress = true;
        progress(text);
    });
    if saw_progress {
        progress_done();
    }

    let target = display_name(&path);
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            ttlog_quiet(&pool.conn, "upload_failed", &target, &e.to_string());
            return Err(e);
        }
    };

    let summary = match &outcome {
        UploadOutcome::Board {
            url,
            identity,
            issue,
            completion,
        } => {
            if let Some(url) = url {
                info(format!("Stored at {url}"));
            }
            success(format!("Check passed for {} #{issue}", identity.board.label()));
            let label = format!(
                "{} {} #{issue}",
                identity.board.as_str(),
                identity.part.as_str()
            );
            match completion {
                Some(msg) => {
                    if msg.is_empty() {
                        success("Ranking updated.");
                    } else {
                        success(format!("Ranking updated: {msg}"));
                    }
                    format!("{label} updated")
                }
                None => format!("{label} checked"),
            }
        }
        UploadOutcome::Data { url, date, updated } => {
            if let Some(url) = url {
                info(format!("Stored at {url}"));
            }
            if *updated {
                success(format!("Snapshot for {date} updated."));
                format!("snapshot {date} updated")
            } else {
                success(format!("Snapshot file for {date} uploaded."));
                format!("snapshot {date} uploaded")
            }
        }
    };

    ttlog_quiet(&pool.conn, "upload", &target, &summary);
    Ok(())
}
