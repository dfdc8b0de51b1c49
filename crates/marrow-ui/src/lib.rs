//! Skeleton-placeholder widgets over the `marrow-core` runtime.
//!
//! The centerpiece is [`SkeletonText`]: text that, while a screen is
//! loading, renders as placeholder bars with the exact footprint the real
//! text will occupy, so nothing shifts when the data lands. [`Phrase`] and
//! [`GroupText`] wire it to the ambient [`SkeletonGroup`] flag, and
//! [`Skeleton`] is the bare bar for non-text placeholders.

mod geometry;
mod hidden_text;
mod layout;
mod nodes;
mod phrase;
mod skeleton;
mod skeleton_text;
mod text;
mod theme;
mod widgets;

pub use geometry::Size;
pub use hidden_text::HiddenText;
pub use layout::{layout_tree, BAR_HEIGHT_RATIO};
pub use nodes::{Arrangement, BarNode, BlockNode, BlockRole, TextNode};
pub use phrase::{GroupText, Phrase, DEFAULT_ESTIMATED_CHARS};
pub use skeleton::Skeleton;
pub use skeleton_text::{line_count, render_mode, MeasuredBox, RenderMode, SkeletonText};
pub use text::{
    set_text_measurer, text_measurer, MonospacedTextMeasurer, TextMeasurer, TextMetrics,
};
pub use theme::{
    show_skeletons, skeleton_style, SkeletonGroup, SkeletonStyle, LOCAL_SHOW_SKELETONS,
    LOCAL_SKELETON_STYLE,
};
pub use widgets::{Block, BlockSpec, Text};
