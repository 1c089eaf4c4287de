//! The readiness gate state machine

use chrono::Utc;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    EnvironmentMode, GateState, OwnedInstance, ReaderFactory, ReadyInfo, RootValidator,
};
use crate::error::ReadinessError;
use crate::VERSION;

struct GateInner<R> {
    state: GateState,
    root: Option<PathBuf>,
    developer_root: Option<PathBuf>,
    reader: Option<Arc<R>>,
    /// Root the current reader was built for
    reader_root: Option<PathBuf>,
    ready: Option<ReadyInfo>,
    last_error: Option<ReadinessError>,
}

/// Lazily validates a root directory and builds the reader for it
///
/// All transitions happen under one lock, so a validation and the reader
/// construction that follows it are never interleaved with another caller.
pub struct ReadinessGate<R> {
    id: Uuid,
    mode: EnvironmentMode,
    validator: Box<dyn RootValidator>,
    factory: Box<dyn ReaderFactory<R>>,
    inner: Mutex<GateInner<R>>,
}

impl<R> ReadinessGate<R> {
    /// Create an unconfigured gate
    pub fn new(
        mode: EnvironmentMode,
        validator: impl RootValidator + 'static,
        factory: impl ReaderFactory<R> + 'static,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            validator: Box::new(validator),
            factory: Box::new(factory),
            inner: Mutex::new(GateInner {
                state: GateState::Unconfigured,
                root: None,
                developer_root: None,
                reader: None,
                reader_root: None,
                ready: None,
                last_error: None,
            }),
        }
    }

    pub fn with_root(self, root: impl Into<PathBuf>) -> Self {
        self.inner.lock().root = Some(root.into());
        self
    }

    /// Return the reader, validating first unless already ready
    pub fn ensure_ready(&self) -> Result<Arc<R>, ReadinessError> {
        let mut inner = self.inner.lock();
        if inner.state == GateState::Ready {
            if let Some(reader) = &inner.reader {
                return Ok(reader.clone());
            }
        }
        self.validate_locked(&mut inner)
    }

    /// Validate again even if ready, for roots that changed out-of-band
    pub fn refresh(&self) -> Result<Arc<R>, ReadinessError> {
        let mut inner = self.inner.lock();
        self.validate_locked(&mut inner)
    }

    /// Per-frame poll
    pub fn tick(&self) {
        if let Err(e) = self.ensure_ready() {
            debug!(gate = %self.id, error = %e, "Gate not ready");
        }
    }

    /// Point the gate at a new root
    ///
    /// A different root starts a new readiness cycle and drops the reader.
    pub fn set_root(&self, root: impl Into<PathBuf>) {
        let root = root.into();
        let mut inner = self.inner.lock();
        if inner.root.as_ref() == Some(&root) {
            return;
        }

        info!(gate = %self.id, root = %root.display(), "Root changed");
        inner.root = Some(root);
        inner.state = GateState::Unconfigured;
        inner.reader = None;
        inner.reader_root = None;
        inner.ready = None;
        inner.last_error = None;
    }

    /// Root tried in editor sessions when no root is configured
    pub fn set_developer_root(&self, root: Option<PathBuf>) {
        self.inner.lock().developer_root = root;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> GateState {
        self.inner.lock().state
    }

    pub fn is_ready(&self) -> bool {
        self.state() == GateState::Ready
    }

    pub fn root(&self) -> Option<PathBuf> {
        self.inner.lock().root.clone()
    }

    /// The reader, only while ready
    pub fn reader(&self) -> Option<Arc<R>> {
        let inner = self.inner.lock();
        match inner.state {
            GateState::Ready => inner.reader.clone(),
            _ => None,
        }
    }

    pub fn ready_info(&self) -> Option<ReadyInfo> {
        self.inner.lock().ready.clone()
    }

    pub fn last_error(&self) -> Option<ReadinessError> {
        self.inner.lock().last_error.clone()
    }

    fn validate_locked(&self, inner: &mut GateInner<R>) -> Result<Arc<R>, ReadinessError> {
        let result = self.run_cycle(inner);
        inner.last_error = result.as_ref().err().cloned();
        result
    }

    fn run_cycle(&self, inner: &mut GateInner<R>) -> Result<Arc<R>, ReadinessError> {
        let (root, from_developer) = match (&inner.root, &inner.developer_root, self.mode) {
            (Some(root), _, _) => (root.clone(), false),
            (None, Some(dev), EnvironmentMode::Editor) => (dev.clone(), true),
            _ => {
                inner.state = GateState::Unconfigured;
                return Err(ReadinessError::NoRootConfigured);
            }
        };

        inner.state = GateState::Validating;
        info!(gate = %self.id, root = %root.display(), version = VERSION, "Validating root");

        let report = self.validator.validate(&root);
        if !report.appears_valid {
            inner.state = GateState::Failed;
            warn!(
                gate = %self.id,
                root = %root.display(),
                details = ?report.details,
                version = VERSION,
                "Root failed validation"
            );
            return Err(ReadinessError::ValidationFailed {
                root,
                details: report.details,
            });
        }

        if from_developer {
            info!(gate = %self.id, root = %root.display(), "Adopted developer root");
            inner.root = Some(root.clone());
        }

        let reader = self.reader_for(inner, &root)?;

        inner.state = GateState::Ready;
        inner.ready = Some(ReadyInfo {
            root: root.clone(),
            validated_at: Utc::now(),
        });
        info!(gate = %self.id, root = %root.display(), version = VERSION, "Ready");
        Ok(reader)
    }

    /// Reuse the reader built for `root`, or build one
    fn reader_for(&self, inner: &mut GateInner<R>, root: &Path) -> Result<Arc<R>, ReadinessError> {
        if let (Some(reader), Some(built_for)) = (&inner.reader, &inner.reader_root) {
            if built_for == root {
                return Ok(reader.clone());
            }
        }

        info!(gate = %self.id, root = %root.display(), "Constructing resource reader");
        match self.factory.construct(root) {
            Ok(reader) => {
                let reader = Arc::new(reader);
                inner.reader = Some(reader.clone());
                inner.reader_root = Some(root.to_path_buf());
                Ok(reader)
            }
            Err(e) => {
                inner.state = GateState::Failed;
                warn!(gate = %self.id, root = %root.display(), error = %e, "Reader construction failed");
                Err(ReadinessError::ReaderConstruction {
                    root: root.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

impl<R> OwnedInstance for ReadinessGate<R> {
    fn instance_id(&self) -> Uuid {
        self.id
    }
}
