use dirs::data_dir;
use once_cell::sync::Lazy;
use std::path::PathBuf;

static DATA_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    let base = data_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    base.join("phish-setlists")
});

pub fn data_root() -> PathBuf {
    DATA_ROOT.clone()
}

pub fn config_path() -> PathBuf {
    data_root().join("config.json")
}

/// Replaces the value of `apikey` in a request URL so it can be logged.
pub fn redact_api_key(url: &str) -> String {
    match url.split_once("apikey=") {
        Some((head, tail)) => {
            let rest = tail.find('&').map(|idx| &tail[idx..]).unwrap_or("");
            format!("{head}apikey=REDACTED{rest}")
        }
        None => url.to_string(),
    }
}
