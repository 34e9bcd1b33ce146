//! Cutscene/popup presentation sink.
//!
//! Hooks request popups and cutscenes as one-way sends: the call returns
//! immediately, display is asynchronous, and the engine never waits for or
//! assumes anything about completion.

/// Layout parameters for a popup request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopupLayout {
    pub width: u32,
    pub height: u32,
    pub centered: bool,
}

impl Default for PopupLayout {
    fn default() -> Self {
        Self {
            width: 420,
            height: 300,
            centered: true,
        }
    }
}

/// One-way sink for presentation requests.
pub trait SceneSink: Send + Sync {
    /// Requests a popup for `asset`. Returns immediately.
    fn show_popup(&self, asset: &str, layout: PopupLayout);

    /// Requests a cutscene for `asset`. Returns immediately.
    fn play_cutscene(&self, asset: &str);
}

/// Sink that drops every presentation request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSceneSink;

impl SceneSink for NullSceneSink {
    fn show_popup(&self, _asset: &str, _layout: PopupLayout) {}

    fn play_cutscene(&self, _asset: &str) {}
}
