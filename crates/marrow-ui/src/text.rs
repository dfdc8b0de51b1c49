//! Text measurement.
//!
//! Layout resolves text through a [`TextMeasurer`]. Headless environments
//! use [`MonospacedTextMeasurer`], which wraps words greedily on a fixed
//! character grid; an embedder with real font metrics installs its own
//! measurer with [`set_text_measurer`].

use std::sync::{Arc, OnceLock, RwLock};

/// Result of measuring a run of text within a width constraint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
    pub line_height: f32,
    pub line_count: usize,
}

pub trait TextMeasurer: Send + Sync {
    /// Measure `text` wrapped to `max_width` pixels. An infinite or
    /// non-positive `max_width` means no wrapping.
    fn measure(&self, text: &str, max_width: f32) -> TextMetrics;
}

/// Fixed-advance measurer with greedy word wrapping. A word longer than the
/// wrap width gets a line of its own and overflows it.
#[derive(Clone, Copy, Debug)]
pub struct MonospacedTextMeasurer {
    char_width: f32,
    line_height: f32,
}

impl MonospacedTextMeasurer {
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl Default for MonospacedTextMeasurer {
    fn default() -> Self {
        Self::new(8.0, 20.0)
    }
}

impl TextMeasurer for MonospacedTextMeasurer {
    fn measure(&self, text: &str, max_width: f32) -> TextMetrics {
        if text.is_empty() {
            return TextMetrics {
                width: 0.0,
                height: self.line_height,
                line_height: self.line_height,
                line_count: 1,
            };
        }
        let max_chars = if max_width.is_finite() && max_width > 0.0 {
            ((max_width / self.char_width).floor() as usize).max(1)
        } else {
            usize::MAX
        };

        let mut line_count = 0usize;
        let mut widest = 0usize;
        for paragraph in text.split('\n') {
            let mut current = 0usize;
            for word in paragraph.split_whitespace() {
                let word_len = word.chars().count();
                if current == 0 {
                    current = word_len;
                } else if current + 1 + word_len <= max_chars {
                    current += 1 + word_len;
                } else {
                    widest = widest.max(current);
                    line_count += 1;
                    current = word_len;
                }
            }
            widest = widest.max(current);
            line_count += 1;
        }

        TextMetrics {
            width: widest as f32 * self.char_width,
            height: line_count as f32 * self.line_height,
            line_height: self.line_height,
            line_count,
        }
    }
}

static MEASURER: OnceLock<RwLock<Arc<dyn TextMeasurer>>> = OnceLock::new();

fn measurer_slot() -> &'static RwLock<Arc<dyn TextMeasurer>> {
    MEASURER.get_or_init(|| RwLock::new(Arc::new(MonospacedTextMeasurer::default())))
}

/// Install the process-wide measurer used by compositions that do not carry
/// their own.
pub fn set_text_measurer(measurer: Arc<dyn TextMeasurer>) {
    let mut slot = measurer_slot().write().unwrap_or_else(|poison| {
        log::warn!("text measurer lock poisoned, replacing anyway");
        poison.into_inner()
    });
    *slot = measurer;
}

pub fn text_measurer() -> Arc<dyn TextMeasurer> {
    let slot = measurer_slot()
        .read()
        .unwrap_or_else(|poison| poison.into_inner());
    Arc::clone(&slot)
}
