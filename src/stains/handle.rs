use std::sync::{Arc, RwLock};

use super::ColorDeconvolutionStains;

#[derive(Debug, Default)]
struct StainState {
    stains: Option<Arc<ColorDeconvolutionStains>>,
    version: u64,
}

/// Shared reference to an image's current stains.
///
/// Channels built from an image hold a clone of the handle rather than a copy
/// of the stains, so editing the stains through any clone changes what those
/// channels report. Every edit bumps `version`.
#[derive(Debug, Clone, Default)]
pub struct StainsHandle {
    state: Arc<RwLock<StainState>>,
}

impl StainsHandle {
    pub fn new(stains: Option<ColorDeconvolutionStains>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StainState {
                stains: stains.map(Arc::new),
                version: 0,
            })),
        }
    }

    pub fn current(&self) -> (Option<Arc<ColorDeconvolutionStains>>, u64) {
        let state = self
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        (state.stains.clone(), state.version)
    }

    pub fn stains(&self) -> Option<Arc<ColorDeconvolutionStains>> {
        self.current().0
    }

    pub fn version(&self) -> u64 {
        self.current().1
    }

    pub fn set(&self, stains: Option<ColorDeconvolutionStains>) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.stains = stains.map(Arc::new);
        state.version = state.version.saturating_add(1);
    }

    pub fn shares_state_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}
