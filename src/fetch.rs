use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::model::ModelGraph;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Read an already-parsed model description from a local JSON file.
pub fn load_model_file(path: &Path) -> Result<ModelGraph, FetchError> {
    let text = std::fs::read_to_string(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph: ModelGraph = serde_json::from_str(&text)?;
    debug!(path = %path.display(), layers = graph.layers.len(), "loaded model file");
    Ok(graph)
}

/// Upload a raw model file to the backend parsing service and decode the
/// returned layer graph. The backend reports its own failures as a JSON
/// body `{"error": ...}` with a 200 status, so that shape is checked before
/// decoding the graph.
pub fn upload_model(backend_url: &str, path: &Path) -> Result<ModelGraph, FetchError> {
    let form = reqwest::blocking::multipart::Form::new()
        .file("file", path)
        .map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let response = client
        .post(format!("{}/tensorflow", backend_url.trim_end_matches('/')))
        .multipart(form)
        .send()?
        .error_for_status()?;

    let value: serde_json::Value = response.json()?;
    if let Some(message) = value.get("error") {
        let message = message.as_str().unwrap_or("unknown backend error");
        return Err(FetchError::Backend(message.to_string()));
    }
    let graph: ModelGraph = serde_json::from_value(value)?;
    debug!(layers = graph.layers.len(), "backend parsed model");
    Ok(graph)
}

/// What the worker thread should fetch.
#[derive(Debug, Clone)]
pub enum FetchRequest {
    LocalFile(PathBuf),
    Upload { backend_url: String, path: PathBuf },
}

/// Run one fetch on a worker thread; the UI polls the receiver each frame.
/// Rapid re-requests are not cancelled or sequenced: the last response to
/// arrive wins.
pub fn spawn_fetch(request: FetchRequest) -> Receiver<Result<ModelGraph, FetchError>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let result = match &request {
            FetchRequest::LocalFile(path) => load_model_file(path),
            FetchRequest::Upload { backend_url, path } => upload_model(backend_url, path),
        };
        if let Err(error) = &result {
            warn!(%error, "model fetch failed");
        }
        // The UI may have been torn down; a dead receiver is fine.
        let _ = sender.send(result);
    });
    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_model_file_round_trips_backend_payload() {
        let mut file = tempfile_path("layerviz-model.json");
        write!(
            file.1,
            r#"{{"model_name":"m","total_params":10,"layers":[
                {{"name":"d","type":"Dense","output_shape":"(None, 10)"}}
            ]}}"#
        )
        .unwrap();
        let graph = load_model_file(&file.0).unwrap();
        assert_eq!(graph.model_name, "m");
        assert_eq!(graph.layers[0].layer_type, "Dense");
        std::fs::remove_file(&file.0).ok();
    }

    #[test]
    fn missing_file_reports_the_path() {
        let error = load_model_file(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(error, FetchError::Io { .. }));
        assert!(error.to_string().contains("/nonexistent/model.json"));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let mut file = tempfile_path("layerviz-broken.json");
        write!(file.1, "not json").unwrap();
        let error = load_model_file(&file.0).unwrap_err();
        assert!(matches!(error, FetchError::Json(_)));
        std::fs::remove_file(&file.0).ok();
    }

    #[test]
    fn spawn_fetch_delivers_on_the_channel() {
        let mut file = tempfile_path("layerviz-chan.json");
        write!(
            file.1,
            r#"{{"model_name":"m","total_params":0,"layers":[]}}"#
        )
        .unwrap();
        let receiver = spawn_fetch(FetchRequest::LocalFile(file.0.clone()));
        let result = receiver
            .recv_timeout(Duration::from_secs(5))
            .expect("worker reply");
        assert!(result.unwrap().layers.is_empty());
        std::fs::remove_file(&file.0).ok();
    }

    fn tempfile_path(name: &str) -> (PathBuf, std::fs::File) {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        let file = std::fs::File::create(&path).unwrap();
        (path, file)
    }
}
