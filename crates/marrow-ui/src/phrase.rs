//! Convenience wrappers that read the ambient skeleton flag.

use crate::skeleton_text::SkeletonText;
use crate::theme::show_skeletons;

/// Character count assumed for text that has not arrived yet.
pub const DEFAULT_ESTIMATED_CHARS: usize = 12;

/// Text that turns into a skeleton whenever the nearest [`SkeletonGroup`]
/// says to. Empty content is simulated from `estimated_chars` filler so a
/// placeholder shows up before the data does.
///
/// [`SkeletonGroup`]: crate::theme::SkeletonGroup
#[allow(non_snake_case)]
pub fn GroupText(content: &str, estimated_chars: usize, class_name: Option<&str>) {
    let simulate = show_skeletons();
    if simulate && content.is_empty() {
        let filler = "x".repeat(estimated_chars.max(1));
        SkeletonText(&filler, true, class_name);
    } else {
        SkeletonText(content, simulate, class_name);
    }
}

/// [`GroupText`] with the default content estimate.
#[allow(non_snake_case)]
pub fn Phrase(content: &str, class_name: Option<&str>) {
    GroupText(content, DEFAULT_ESTIMATED_CHARS, class_name);
}
