use canvas_logging::{canvas_info, canvas_warn};
use tagcanvas_core::Ticket;

use crate::{asset_filename, EngineEvent, EventSink, GenerationBackend, ImageStore};

/// Downloads each rendered image into `store`.
///
/// Every image is reported individually; one failure does not stop the rest.
pub async fn save_images(
    backend: &dyn GenerationBackend,
    ticket: Ticket,
    images: &[String],
    store: &ImageStore,
    sink: &dyn EventSink,
) {
    for source in images {
        let event = match save_one(backend, source, store).await {
            Ok(path) => {
                canvas_info!("Saved {} to {:?}", source, path);
                EngineEvent::AssetSaved {
                    ticket,
                    source: source.clone(),
                    path,
                }
            }
            Err(reason) => {
                canvas_warn!("Could not save {}: {}", source, reason);
                EngineEvent::AssetFailed {
                    ticket,
                    source: source.clone(),
                    reason,
                }
            }
        };
        sink.emit(event);
    }
}

async fn save_one(
    backend: &dyn GenerationBackend,
    source: &str,
    store: &ImageStore,
) -> Result<std::path::PathBuf, String> {
    let bytes = backend
        .fetch_asset(source)
        .await
        .map_err(|err| err.to_string())?;
    let filename = asset_filename(source);
    let store = store.clone();
    tokio::task::spawn_blocking(move || store.save(&filename, &bytes))
        .await
        .map_err(|err| err.to_string())?
        .map_err(|err| err.to_string())
}
