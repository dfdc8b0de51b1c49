use marrow_ui::{show_skeletons, skeleton_style, SkeletonStyle, LOCAL_SHOW_SKELETONS, LOCAL_SKELETON_STYLE};

#[test]
fn defaults_apply_outside_any_group() {
    assert!(!show_skeletons());
    let style = skeleton_style();
    assert_eq!(style.color, "#dde1e6");
    assert_eq!(style.border_radius, "3px");
    assert_eq!(style.class_name, None);
}

#[test]
fn provided_values_scope_and_unwind() {
    let custom = SkeletonStyle {
        color: "#112233".to_string(),
        border_radius: "8px".to_string(),
        class_name: Some("custom".to_string()),
        style: None,
    };

    LOCAL_SHOW_SKELETONS.with(|shows| {
        shows.provides(true, || {
            assert!(show_skeletons());
            shows.provides(false, || assert!(!show_skeletons()));
            assert!(show_skeletons());
        })
    });
    assert!(!show_skeletons());

    LOCAL_SKELETON_STYLE.with(|styles| {
        styles.provides(custom.clone(), || {
            assert_eq!(skeleton_style(), custom);
        })
    });
    assert_eq!(skeleton_style(), SkeletonStyle::default());
}
