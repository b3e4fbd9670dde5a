//! Process-wide capture configuration.
//!
//! This module provides [`CaptureConfig`] and [`CaptureConfigBuilder`] for
//! configuring how call sites are recorded, and [`InstalledConfig`], the guard
//! that owns an installed configuration.
//!
//! The only knob today is the file-name sanitizer. Deployments use it to redact
//! absolute build-machine paths from captured locations without touching any
//! call site.

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwapOption;

/// Signature of a file-name sanitizer.
pub type CleanFileNameFn = dyn Fn(&'static str) -> Cow<'static, str> + Send + Sync;

// ============================================================================
// Process-wide holder
// ============================================================================
//
// None = default configuration (identity sanitizer). Reads on the capture path
// are lock-free; installs swap the whole configuration.

static ACTIVE: LazyLock<ArcSwapOption<CaptureConfig>> = LazyLock::new(ArcSwapOption::empty);

/// Run `f` against the active configuration.
pub(crate) fn with_active<R>(f: impl FnOnce(Option<&CaptureConfig>) -> R) -> R {
    let guard = ACTIVE.load();
    f(guard.as_deref())
}

// ============================================================================
// CaptureConfig
// ============================================================================

/// Configuration for location capture.
///
/// Build one with [`CaptureConfig::builder()`] and make it active with
/// [`install()`](CaptureConfig::install):
///
/// ```rust
/// use errchain::CaptureConfig;
///
/// let _config = CaptureConfig::builder()
///     .strip_prefix("/home/builder/src/")
///     .build()
///     .install();
///
/// // Locations captured while `_config` is alive have the prefix removed.
/// ```
///
/// Install once at process start (calling [`InstalledConfig::keep`]) or per
/// test. Installing concurrently with active captures is not ordered against
/// them: a capture in flight sees either the old or the new configuration.
#[derive(Default)]
pub struct CaptureConfig {
    clean_file_name: Option<Box<CleanFileNameFn>>,
}

impl CaptureConfig {
    /// Create a builder for a configuration.
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder::new()
    }

    /// Apply the file-name sanitizer.
    pub fn clean_file_name(&self, file: &'static str) -> Cow<'static, str> {
        match &self.clean_file_name {
            Some(clean) => clean(file),
            None => Cow::Borrowed(file),
        }
    }

    /// Make this the process-wide configuration.
    ///
    /// The previous configuration comes back when the returned guard drops.
    #[must_use = "dropping the guard immediately restores the previous configuration"]
    pub fn install(self) -> InstalledConfig {
        let previous = ACTIVE.swap(Some(Arc::new(self)));
        tracing::debug!(
            replaced_custom = previous.is_some(),
            "installed errchain capture config"
        );
        InstalledConfig {
            previous: Some(previous),
        }
    }

    /// Whether a configuration other than the default is installed.
    pub fn is_installed() -> bool {
        ACTIVE.load().is_some()
    }
}

impl fmt::Debug for CaptureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureConfig")
            .field("clean_file_name", &self.clean_file_name.is_some())
            .finish()
    }
}

/// Sanitize a file name with the active configuration.
pub(crate) fn clean_file_name(file: &'static str) -> Cow<'static, str> {
    with_active(|config| match config {
        Some(config) => config.clean_file_name(file),
        None => Cow::Borrowed(file),
    })
}

// ============================================================================
// InstalledConfig - teardown guard
// ============================================================================

/// Owns an installed [`CaptureConfig`].
///
/// Dropping the guard reinstates whatever configuration was active before.
pub struct InstalledConfig {
    // Outer None once kept.
    previous: Option<Option<Arc<CaptureConfig>>>,
}

impl InstalledConfig {
    /// Leave the configuration installed for the rest of the process.
    pub fn keep(mut self) {
        self.previous = None;
    }
}

impl Drop for InstalledConfig {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            tracing::debug!(
                restored_custom = previous.is_some(),
                "restored errchain capture config"
            );
            ACTIVE.store(previous);
        }
    }
}

impl fmt::Debug for InstalledConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstalledConfig")
            .field("kept", &self.previous.is_none())
            .finish()
    }
}

// ============================================================================
// CaptureConfigBuilder
// ============================================================================

/// Builder for [`CaptureConfig`].
///
/// ```rust
/// use std::borrow::Cow;
/// use errchain::CaptureConfig;
///
/// let config = CaptureConfig::builder()
///     .clean_file_name(|file| Cow::Owned(file.replace('\\', "/")))
///     .build();
///
/// assert_eq!(config.clean_file_name("src\\lib.rs"), "src/lib.rs");
/// ```
#[derive(Default)]
pub struct CaptureConfigBuilder {
    clean_file_name: Option<Box<CleanFileNameFn>>,
}

impl CaptureConfigBuilder {
    /// Create a builder with the identity sanitizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file-name sanitizer, replacing any previous one.
    pub fn clean_file_name<F>(mut self, clean: F) -> Self
    where
        F: Fn(&'static str) -> Cow<'static, str> + Send + Sync + 'static,
    {
        self.clean_file_name = Some(Box::new(clean));
        self
    }

    /// Sanitize by removing `prefix` from file names that start with it.
    ///
    /// ```rust
    /// use errchain::CaptureConfig;
    ///
    /// let config = CaptureConfig::builder().strip_prefix("/build/").build();
    /// assert_eq!(config.clean_file_name("/build/src/main.rs"), "src/main.rs");
    /// assert_eq!(config.clean_file_name("src/main.rs"), "src/main.rs");
    /// ```
    pub fn strip_prefix(self, prefix: &'static str) -> Self {
        self.clean_file_name(move |file| Cow::Borrowed(file.strip_prefix(prefix).unwrap_or(file)))
    }

    /// Build the final configuration.
    pub fn build(self) -> CaptureConfig {
        CaptureConfig {
            clean_file_name: self.clean_file_name,
        }
    }
}

impl fmt::Debug for CaptureConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureConfigBuilder")
            .field("clean_file_name", &self.clean_file_name.is_some())
            .finish()
    }
}
