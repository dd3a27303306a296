use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::shared::error::CollaboratorError;

/// Return the preferred ONNX execution providers for the current platform.
///
/// Falls back to CPU if the platform-specific provider is unavailable.
pub fn preferred_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

/// An ONNX Runtime session shared between pipeline runs.
///
/// `Session::run` needs exclusive access, so concurrent callers are
/// serialised on the inner lock.
pub struct SharedSession {
    session: Mutex<ort::session::Session>,
}

impl SharedSession {
    pub fn load(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let intra_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;
        log::debug!("Loaded ONNX model {}", model_path.display());
        Ok(Self {
            session: Mutex::new(session),
        })
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, ort::session::Session>, CollaboratorError> {
        self.session
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}").into())
    }

    /// First input's `[d0, d1, d2, d3]` shape with dynamic axes as `None`,
    /// or `None` when the model does not declare a tensor input.
    pub fn input_shape(&self) -> Option<Vec<Option<usize>>> {
        let session = self.lock().ok()?;
        let input = session.inputs().first()?;
        if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
            Some(
                shape
                    .iter()
                    .map(|&d| if d > 0 { Some(d as usize) } else { None })
                    .collect(),
            )
        } else {
            None
        }
    }
}
