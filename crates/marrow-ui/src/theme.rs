//! Ambient skeleton styling.

use marrow_core::CompositionLocal;

/// Visual style applied to every placeholder bar below a [`SkeletonGroup`].
#[derive(Clone, Debug, PartialEq)]
pub struct SkeletonStyle {
    pub color: String,
    pub border_radius: String,
    pub class_name: Option<String>,
    /// Extra inline style passed through to each bar untouched.
    pub style: Option<String>,
}

impl Default for SkeletonStyle {
    fn default() -> Self {
        Self {
            color: "#dde1e6".to_string(),
            border_radius: "3px".to_string(),
            class_name: None,
            style: None,
        }
    }
}

thread_local! {
    pub static LOCAL_SKELETON_STYLE: CompositionLocal<SkeletonStyle> =
        const { CompositionLocal::new(SkeletonStyle::default) };
    pub static LOCAL_SHOW_SKELETONS: CompositionLocal<bool> =
        const { CompositionLocal::new(|| false) };
}

/// The skeleton style in scope at the current call.
pub fn skeleton_style() -> SkeletonStyle {
    LOCAL_SKELETON_STYLE.with(|local| local.current())
}

/// Whether the nearest enclosing [`SkeletonGroup`] is showing skeletons.
pub fn show_skeletons() -> bool {
    LOCAL_SHOW_SKELETONS.with(|local| local.current())
}

/// Scope `show` and an optional style override over `content`. Text widgets
/// below pick both up ambiently, so a whole screen flips between loading
/// and loaded by toggling one flag here.
#[allow(non_snake_case)]
pub fn SkeletonGroup(show: bool, style: Option<SkeletonStyle>, content: impl FnOnce()) {
    let style = style.unwrap_or_else(skeleton_style);
    LOCAL_SHOW_SKELETONS.with(|shows| {
        shows.provides(show, || {
            LOCAL_SKELETON_STYLE.with(|styles| styles.provides(style, content))
        })
    })
}
