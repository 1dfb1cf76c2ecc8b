use crate::api::events::{CancelHandle, JobStream};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::marking::{Copyright, SongType};
use reqwest::blocking::{Client, RequestBuilder, Response, multipart};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

pub mod endpoint {
    pub const UPLOAD_FILE: &str = "/upload";
    pub const CHECK_FILE: &str = "/upload/check";
    pub const UPDATE_RANKING: &str = "/update/ranking";
    pub const UPDATE_SNAPSHOT: &str = "/update/snapshot";
    pub const EDIT_ARTIST_CHECK: &str = "/edit/artist/check";
    pub const EDIT_ARTIST_CONFIRM: &str = "/edit/artist/confirm";
    pub const EDIT_SONG: &str = "/edit/song";
    pub const EDIT_VIDEO: &str = "/edit/video";
    pub const SELECT_ARTIST: &str = "/select/artist";
    pub const SELECT_SONG: &str = "/select/song";
    pub const SELECT_VIDEO: &str = "/select/video";

    pub fn search(kind: &str) -> String {
        format!("/search/{kind}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongInfo {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub song_type: String,
    #[serde(default)]
    pub vocadb_id: i64,
    #[serde(default)]
    pub display_name: String,
}

impl SongInfo {
    pub fn kind(&self) -> Option<SongType> {
        SongType::parse(&self.song_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub bvid: String,
    pub title: String,
    pub copyright: i64,
}

impl VideoInfo {
    pub fn copyright_kind(&self) -> Option<Copyright> {
        Copyright::from_code(self.copyright)
    }
}

/// `{ "data": ... }` wrapper used by the select endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Answer of the pre-update check; an empty `detail` means the file is accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckReport {
    #[serde(default)]
    pub detail: String,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.detail.is_empty()
    }
}

/// Where the server stored an upload. Servers may answer with an empty or
/// non-object body; the upload still succeeded then, just without a link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReceipt {
    pub url: Option<String>,
}

impl UploadReceipt {
    pub fn from_body(body: &str) -> Self {
        let url = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("url")?.as_str().map(str::to_string))
            .filter(|u| !u.is_empty());
        Self { url }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pending artist rename, confirmed later by `task_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistEditPreview {
    pub task_id: String,
    pub old_artist: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct ApiClient {
    base_url: String,
    http: Client,
    /// No overall timeout: ranking updates stream for as long as the job runs.
    stream_http: Client,
    upload_timeout: Duration,
}

impl ApiClient {
    pub fn new(cfg: &Config, token: Option<&str>) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            let mut value = HeaderValue::from_str(token.trim())
                .map_err(|e| AppError::Config(format!("API token is not a valid header: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .default_headers(headers.clone())
            .build()?;
        let stream_http = Client::builder()
            .timeout(None::<Duration>)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
            http,
            stream_http,
            upload_timeout: Duration::from_secs(cfg.upload_timeout_secs),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn upload_file(&self, path: &Path) -> AppResult<UploadReceipt> {
        let form = multipart::Form::new().file("file", path)?;
        let req = self
            .http
            .post(self.url(endpoint::UPLOAD_FILE))
            .multipart(form)
            .timeout(self.upload_timeout);
        let response = ensure_success(send(req)?)?;
        Ok(UploadReceipt::from_body(&response.text()?))
    }

    pub fn check_file(&self, board: &str, part: &str, issue: i64) -> AppResult<CheckReport> {
        let req = self
            .http
            .get(self.url(endpoint::CHECK_FILE))
            .query(&[("board", board), ("part", part)])
            .query(&[("issue", issue)]);
        read_json(send(req)?)
    }

    /// Start the ranking update and return its event stream.
    pub fn update_ranking(
        &self,
        board: &str,
        part: &str,
        issue: i64,
        old: bool,
        cancel: CancelHandle,
    ) -> AppResult<JobStream<Box<dyn BufRead + Send>>> {
        let mut req = self
            .stream_http
            .get(self.url(endpoint::UPDATE_RANKING))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .query(&[("board", board), ("part", part)])
            .query(&[("issue", issue)]);
        if old {
            req = req.query(&[("old", "true")]);
        }

        let response = ensure_success(send(req)?)?;
        let reader: Box<dyn BufRead + Send> = Box::new(BufReader::new(response));
        Ok(JobStream::new(reader, cancel))
    }

    /// `date` is `yyyy-MM-dd`.
    pub fn update_snapshot(&self, date: &str, old: bool) -> AppResult<Value> {
        let mut req = self
            .http
            .get(self.url(endpoint::UPDATE_SNAPSHOT))
            .query(&[("date", date)])
            .timeout(self.upload_timeout);
        if old {
            req = req.query(&[("old", "true")]);
        }
        read_json(send(req)?)
    }

    pub fn search(
        &self,
        kind: &str,
        keyword: &str,
        page: usize,
        page_size: usize,
    ) -> AppResult<SearchPage> {
        let req = self
            .http
            .get(self.url(&endpoint::search(kind)))
            .query(&[("keyword", keyword)])
            .query(&[("page", page), ("page_size", page_size)]);
        read_json(send(req)?)
    }

    pub fn select_artist(&self, kind: &str, id: i64) -> AppResult<Value> {
        let req = self
            .http
            .get(self.url(endpoint::SELECT_ARTIST))
            .query(&[("type", kind)])
            .query(&[("id", id)]);
        read_json(send(req)?)
    }

    pub fn select_song(&self, id: i64) -> AppResult<SongInfo> {
        let req = self
            .http
            .get(self.url(endpoint::SELECT_SONG))
            .query(&[("id", id)]);
        read_json::<DataEnvelope<SongInfo>>(send(req)?).map(|env| env.data)
    }

    pub fn select_video(&self, bvid: &str) -> AppResult<VideoInfo> {
        let req = self
            .http
            .get(self.url(endpoint::SELECT_VIDEO))
            .query(&[("bvid", bvid)]);
        read_json::<DataEnvelope<VideoInfo>>(send(req)?).map(|env| env.data)
    }

    pub fn edit_artist_check(&self, kind: &str, id: i64, name: &str) -> AppResult<ArtistEditPreview> {
        let req = self
            .http
            .post(self.url(endpoint::EDIT_ARTIST_CHECK))
            .json(&json!({ "type": kind, "id": id, "name": name }));
        read_json(send(req)?)
    }

    pub fn edit_artist_confirm(&self, task_id: &str) -> AppResult<Value> {
        let req = self
            .http
            .post(self.url(endpoint::EDIT_ARTIST_CONFIRM))
            .json(&json!({ "task_id": task_id }));
        read_json(send(req)?)
    }

    pub fn edit_song(&self, song: &SongInfo) -> AppResult<Value> {
        let req = self.http.post(self.url(endpoint::EDIT_SONG)).json(song);
        read_json(send(req)?)
    }

    pub fn edit_video(&self, video: &VideoInfo) -> AppResult<Value> {
        let req = self.http.post(self.url(endpoint::EDIT_VIDEO)).json(video);
        read_json(send(req)?)
    }
}

fn send(req: RequestBuilder) -> AppResult<Response> {
    Ok(req.send()?)
}

/// Turn a non-2xx answer into [`AppError::Api`], preferring the server's own message.
fn ensure_success(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(AppError::Api {
        status: status.as_u16(),
        message: error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
    })
}

fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let response = ensure_success(response)?;
    let body = response.text()?;
    if body.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_str(&body)?)
}

/// `message` or `detail` from a JSON error body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "detail"].iter().find_map(|key| match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}
