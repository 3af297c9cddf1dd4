use std::cell::RefCell;
use std::rc::Rc;

use opx_core::{AssetError, AssetId, PointCloud};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::constants::ASSET_BASE_PATH;

/// Finished loads waiting for the next frame to hand them to the scene.
pub type AssetInbox = Rc<RefCell<Vec<(AssetId, Result<PointCloud, AssetError>)>>>;

/// In-flight point-cloud fetches. Aborting drops every pending load without
/// reporting it.
pub struct AssetLoader {
    controller: Option<web::AbortController>,
    inbox: AssetInbox,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self {
            controller: web::AbortController::new().ok(),
            inbox: AssetInbox::default(),
        }
    }

    pub fn inbox(&self) -> AssetInbox {
        self.inbox.clone()
    }

    /// Start one fetch per asset.
    pub fn spawn_all(&self) {
        let signal = self.controller.as_ref().map(|c| c.signal());
        for id in AssetId::ALL {
            let inbox = self.inbox.clone();
            let signal = signal.clone();
            spawn_local(async move {
                let url = format!("{ASSET_BASE_PATH}{}", id.file_name());
                let result = fetch_cloud(&url, signal.as_ref()).await;
                if signal.as_ref().is_some_and(|s| s.aborted()) {
                    return;
                }
                // Failures are reported by the scene's registry.
                if let Ok(cloud) = &result {
                    log::info!("[assets] {id} ready ({} points)", cloud.len());
                }
                inbox.borrow_mut().push((id, result));
            });
        }
    }

    pub fn abort(&mut self) {
        if let Some(c) = self.controller.take() {
            c.abort();
        }
        self.inbox.borrow_mut().clear();
    }
}

fn fetch_error(e: wasm_bindgen::JsValue) -> AssetError {
    AssetError::Fetch(format!("{:?}", e))
}

async fn fetch_cloud(url: &str, signal: Option<&web::AbortSignal>) -> Result<PointCloud, AssetError> {
    let window = web::window().ok_or_else(|| AssetError::Fetch("no window".into()))?;
    let init = web::RequestInit::new();
    init.set_signal(signal);
    let request = web::Request::new_with_str_and_init(url, &init).map_err(fetch_error)?;
    let response: web::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(fetch_error)?
        .dyn_into()
        .map_err(fetch_error)?;
    if !response.ok() {
        return Err(AssetError::Fetch(format!("HTTP {}", response.status())));
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(fetch_error)?)
        .await
        .map_err(fetch_error)?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    PointCloud::decode(&bytes)
}
