use crate::Topic;

pub const UPLOAD_PATH: &str = "/upload";
pub const DUE_PATH: &str = "/due";
pub const RECALL_PATH: &str = "/recall";
pub const HISTORY_PATH: &str = "/history";
pub const HEALTH_PATH: &str = "/health";

/// `GET /history/:topic` with the topic escaped as one segment.
pub fn history_endpoint(topic: &Topic) -> String {
    format!("{HISTORY_PATH}/{}", topic.encoded())
}

/// Client-side pages, addressed by path like the browser app they mirror.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Upload,
    Due,
    Recall(Topic),
    History,
}

impl Route {
    /// Resolve a navigation path. Unknown paths land on the due list.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_matches('/');
        let mut parts = trimmed.splitn(2, '/');
        match (parts.next(), parts.next()) {
            (Some("upload"), None) => Route::Upload,
            (Some("due"), None) => Route::Due,
            (Some("history"), None) => Route::History,
            (Some("recall"), Some(seg)) if !seg.is_empty() && !seg.contains('/') => {
                Topic::from_encoded(seg).map(Route::Recall).unwrap_or(Route::Due)
            }
            _ => Route::Due,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Upload => UPLOAD_PATH.to_string(),
            Route::Due => DUE_PATH.to_string(),
            Route::Recall(topic) => format!("{RECALL_PATH}/{}", topic.encoded()),
            Route::History => HISTORY_PATH.to_string(),
        }
    }
}
