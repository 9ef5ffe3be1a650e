use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::{error::EcsError, sparse_set::DEFAULT_PAGE_SIZE};

/// Tunables for a world. Missing fields take their default value, so `()` is a valid
/// configuration.
///
/// ```ron
/// (page_size: 64)
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EcsSettings {
    /// Number of entries in each page of a component's entity sparse set.
    pub page_size: usize,
}

impl Default for EcsSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE.get(),
        }
    }
}

impl EcsSettings {
    /// Parses and validates settings from RON text.
    pub fn from_ron(text: &str) -> Result<Self, EcsError> {
        let settings: EcsSettings = ron::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    #[inline]
    pub fn validate(&self) -> Result<(), EcsError> {
        self.page_size().map(|_| ())
    }

    #[inline]
    pub fn page_size(&self) -> Result<NonZeroUsize, EcsError> {
        NonZeroUsize::new(self.page_size).ok_or(EcsError::ZeroPageSize)
    }
}
