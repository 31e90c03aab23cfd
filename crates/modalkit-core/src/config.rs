#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! A [`ModalConfig`] is supplied once when the [`ModalManager`] is built and
//! is read-only afterwards. It parameterizes gesture matching and z-index
//! allocation but never the stack's own invariants.
//!
//! Defaults match the markup convention most pages already use:
//!
//! | Option | Default |
//! |--------|---------|
//! | `close_on_escape` | `true` |
//! | `close_on_outside_click` | `true` |
//! | `modal_selector` | `.modal-wrapper` |
//! | `modal_trigger_attribute` | `data-modal` |
//! | `close_button_selector` | `.modal-close` |
//! | `base_z_index` | `1000` |
//! | `open_marker` | `modal-open` |
//! | `focus_delay_ms` | `100` |
//!
//! With the `serde` feature a partial options record deserializes over
//! these defaults.
//!
//! [`ModalManager`]: crate::ModalManager

use std::fmt;
use std::time::Duration;

pub const DEFAULT_MODAL_SELECTOR: &str = ".modal-wrapper";
pub const DEFAULT_TRIGGER_ATTRIBUTE: &str = "data-modal";
pub const DEFAULT_CLOSE_SELECTOR: &str = ".modal-close";
pub const DEFAULT_BASE_Z_INDEX: i32 = 1000;
pub const DEFAULT_OPEN_MARKER: &str = "modal-open";
pub const DEFAULT_FOCUS_DELAY_MS: u32 = 100;

/// Z-index range reserved above `base_z_index` for stacked modals.
pub const Z_INDEX_HEADROOM: i32 = 10_000;

/// Host-interpreted node selector.
///
/// The engine never parses selectors; it hands them to
/// [`ModalHost::matches`](crate::ModalHost::matches). A browser host treats
/// them as CSS selectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Selector(String);

impl Selector {
    /// Wrap a selector string.
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// The raw selector text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A selector option was empty or whitespace.
    #[error("selector option `{option}` must not be empty")]
    EmptySelector { option: &'static str },
    /// The trigger attribute name was empty.
    #[error("trigger attribute name must not be empty")]
    EmptyTriggerAttribute,
    /// The document-level open marker was empty.
    #[error("document open marker must not be empty")]
    EmptyOpenMarker,
    /// `base_z_index` is too close to `i32::MAX` to stack modals above it.
    #[error("base z-index {base} leaves no headroom for stacked modals")]
    BaseZIndexOverflow { base: i32 },
}

/// Recognized engine options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct ModalConfig {
    close_on_escape: bool,
    close_on_outside_click: bool,
    modal_selector: Selector,
    modal_trigger_attribute: String,
    close_button_selector: Selector,
    base_z_index: i32,
    open_marker: String,
    focus_delay_ms: u32,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            close_on_escape: true,
            close_on_outside_click: true,
            modal_selector: Selector::new(DEFAULT_MODAL_SELECTOR),
            modal_trigger_attribute: DEFAULT_TRIGGER_ATTRIBUTE.to_owned(),
            close_button_selector: Selector::new(DEFAULT_CLOSE_SELECTOR),
            base_z_index: DEFAULT_BASE_Z_INDEX,
            open_marker: DEFAULT_OPEN_MARKER.to_owned(),
            focus_delay_ms: DEFAULT_FOCUS_DELAY_MS,
        }
    }
}

impl ModalConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> ModalConfigBuilder {
        ModalConfigBuilder::default()
    }

    /// Check every option. `ModalConfig::default()` always passes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.modal_selector.is_blank() {
            return Err(ConfigError::EmptySelector {
                option: "modal_selector",
            });
        }
        if self.close_button_selector.is_blank() {
            return Err(ConfigError::EmptySelector {
                option: "close_button_selector",
            });
        }
        if self.modal_trigger_attribute.trim().is_empty() {
            return Err(ConfigError::EmptyTriggerAttribute);
        }
        if self.open_marker.trim().is_empty() {
            return Err(ConfigError::EmptyOpenMarker);
        }
        if self.base_z_index > i32::MAX - Z_INDEX_HEADROOM {
            return Err(ConfigError::BaseZIndexOverflow {
                base: self.base_z_index,
            });
        }
        Ok(())
    }

    /// Whether Escape closes the topmost modal.
    #[inline]
    pub fn close_on_escape(&self) -> bool {
        self.close_on_escape
    }

    /// Whether a backdrop hit closes the modal it lands on.
    #[inline]
    pub fn close_on_outside_click(&self) -> bool {
        self.close_on_outside_click
    }

    /// Selector identifying modal surfaces.
    #[inline]
    pub fn modal_selector(&self) -> &Selector {
        &self.modal_selector
    }

    /// Attribute whose value names the modal a trigger opens.
    #[inline]
    pub fn modal_trigger_attribute(&self) -> &str {
        &self.modal_trigger_attribute
    }

    /// Selector identifying close controls.
    #[inline]
    pub fn close_button_selector(&self) -> &Selector {
        &self.close_button_selector
    }

    #[inline]
    pub fn base_z_index(&self) -> i32 {
        self.base_z_index
    }

    /// Document-level marker present while any modal is open.
    #[inline]
    pub fn open_marker(&self) -> &str {
        &self.open_marker
    }

    /// Delay before initial focus lands inside a newly opened modal.
    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.focus_delay_ms))
    }
}

/// Builder for [`ModalConfig`]; `build()` validates.
#[derive(Debug, Clone, Default)]
pub struct ModalConfigBuilder {
    config: ModalConfig,
}

impl ModalConfigBuilder {
    pub fn close_on_escape(mut self, enabled: bool) -> Self {
        self.config.close_on_escape = enabled;
        self
    }

    pub fn close_on_outside_click(mut self, enabled: bool) -> Self {
        self.config.close_on_outside_click = enabled;
        self
    }

    pub fn modal_selector(mut self, selector: impl Into<Selector>) -> Self {
        self.config.modal_selector = selector.into();
        self
    }

    pub fn modal_trigger_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.config.modal_trigger_attribute = attribute.into();
        self
    }

    pub fn close_button_selector(mut self, selector: impl Into<Selector>) -> Self {
        self.config.close_button_selector = selector.into();
        self
    }

    pub fn base_z_index(mut self, base: i32) -> Self {
        self.config.base_z_index = base;
        self
    }

    pub fn open_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.open_marker = marker.into();
        self
    }

    pub fn focus_delay_ms(mut self, millis: u32) -> Self {
        self.config.focus_delay_ms = millis;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<ModalConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
