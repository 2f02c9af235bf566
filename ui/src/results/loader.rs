//! Loads the snapshot and history payloads for the page.
//!
//! Both files are requested together and the load fails as a whole if
//! either one does.

use crate::core::{
    history::HistoryStore,
    model::TestSummary,
    storage::{self, StorageError, HISTORY_FILE, SNAPSHOT_FILE},
};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not fetch {what}: {message}")]
    Fetch { what: &'static str, message: String },

    #[error("{what} responded with HTTP {status}")]
    Status { what: &'static str, status: u16 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub async fn load_dashboard_data() -> Result<(Vec<TestSummary>, HistoryStore), LoadError> {
    let (snapshot, history) = futures::join!(load_snapshot(), load_history());
    Ok((snapshot?, history?))
}

async fn load_snapshot() -> Result<Vec<TestSummary>, LoadError> {
    #[cfg(target_arch = "wasm32")]
    {
        let bytes = fetch_bytes(SNAPSHOT_FILE).await?;
        Ok(storage::decode_snapshot(&bytes)?)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let path = crate::core::platform::data_dir().join(SNAPSHOT_FILE);
        Ok(storage::read_snapshot_file(&path)?)
    }
}

async fn load_history() -> Result<HistoryStore, LoadError> {
    #[cfg(target_arch = "wasm32")]
    {
        history_from_fetch(fetch_bytes(HISTORY_FILE).await)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let path = crate::core::platform::data_dir().join(HISTORY_FILE);
        Ok(storage::read_history_file(&path)?)
    }
}

/// A 404 on the history file means nothing has been recorded yet.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn history_from_fetch(fetched: Result<Vec<u8>, LoadError>) -> Result<HistoryStore, LoadError> {
    match fetched {
        Ok(bytes) => Ok(storage::decode_history(&bytes)?),
        Err(LoadError::Status { status: 404, .. }) => Ok(HistoryStore::default()),
        Err(err) => Err(err),
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(what: &'static str) -> Result<Vec<u8>, LoadError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{RequestCache, RequestInit, Response};

    let fetch_err = |message: String| LoadError::Fetch { what, message };
    let describe = |value: wasm_bindgen::JsValue| format!("{value:?}");

    let window = web_sys::window().ok_or_else(|| fetch_err("window unavailable".into()))?;
    let init = RequestInit::new();
    init.set_method("GET");
    init.set_cache(RequestCache::NoStore);

    let response = JsFuture::from(window.fetch_with_str_and_init(what, &init))
        .await
        .map_err(|err| fetch_err(describe(err)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| fetch_err("unexpected fetch result".into()))?;
    if !response.ok() {
        return Err(LoadError::Status {
            what,
            status: response.status(),
        });
    }

    let buffer = response
        .array_buffer()
        .map_err(|err| fetch_err(describe(err)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|err| fetch_err(describe(err)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
