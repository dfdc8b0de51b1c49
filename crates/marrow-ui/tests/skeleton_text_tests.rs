use std::cell::RefCell;
use std::rc::Rc;

use marrow_core::{useState, MutableState};
use marrow_testing::{fixed_metrics, TestRule};

use marrow_ui::{
    BarNode, BlockNode, BlockRole, GroupText, Phrase, Size, SkeletonGroup, SkeletonStyle,
    SkeletonText, TextNode,
};

fn rule_300_wide() -> TestRule {
    let mut rule = TestRule::with_viewport(Size::new(300.0, 600.0));
    rule.set_measurer(fixed_metrics(10.0, 24.0));
    rule
}

// Nine 9-char words: wraps to three 29-char lines at 30 chars per line.
fn three_line_text() -> String {
    "abcdefghi ".repeat(9).trim_end().to_string()
}

fn simulated_boxes(rule: &TestRule) -> Vec<marrow_core::NodeId> {
    rule.find_nodes::<BlockNode>()
        .into_iter()
        .filter(|&id| {
            rule.with_node::<BlockNode, _>(id, |block| block.role == BlockRole::SimulatedBox)
                .unwrap_or(false)
        })
        .collect()
}

#[test]
fn passthrough_renders_plain_text() {
    let mut rule = rule_300_wide();
    rule.set_content(|| {
        SkeletonText("hello world", false, None);
    });
    rule.pump_until_idle().unwrap();

    assert_eq!(rule.count_nodes::<BarNode>(), 0);
    let texts = rule.find_nodes::<TextNode>();
    assert_eq!(texts.len(), 1);
    rule.with_node::<TextNode, _>(texts[0], |text| {
        assert_eq!(text.text, "hello world");
        assert!(text.visible);
    })
    .unwrap();
}

#[test]
fn measurement_resolves_into_one_bar_per_line() {
    let mut rule = rule_300_wide();
    let content = three_line_text();
    rule.set_content(move || {
        SkeletonText(&content, true, None);
    });
    rule.pump_until_idle().unwrap();

    // The probe and its hidden text are gone once simulation starts.
    assert_eq!(rule.count_nodes::<TextNode>(), 0);

    let boxes = simulated_boxes(&rule);
    assert_eq!(boxes.len(), 1);
    let box_geometry = rule.geometry_of(boxes[0]).unwrap();
    assert_eq!(box_geometry.width, 300.0);
    assert_eq!(box_geometry.height, 72.0);

    let bars = rule.find_nodes::<BarNode>();
    assert_eq!(bars.len(), 3);
    for bar in bars {
        let geometry = rule.geometry_of(bar).unwrap();
        assert_eq!(geometry.width, 300.0);
        // 80% of the 24px line slot.
        assert!((geometry.height - 19.2).abs() < 1e-4);
    }
}

#[test]
fn short_text_simulates_a_single_line() {
    let mut rule = rule_300_wide();
    rule.set_content(|| {
        SkeletonText("hi", true, None);
    });
    rule.pump_until_idle().unwrap();

    assert_eq!(rule.count_nodes::<BarNode>(), 1);
    let boxes = simulated_boxes(&rule);
    assert_eq!(rule.geometry_of(boxes[0]).unwrap().height, 24.0);
}

#[test]
fn instance_is_measured_only_once() {
    let mut rule = rule_300_wide();
    let content = three_line_text();
    rule.set_content(move || {
        SkeletonText(&content, true, None);
    });
    rule.pump_until_idle().unwrap();

    // Recompose without any input change: the measured footprint is
    // remembered, so no probe reappears.
    rule.render();
    assert_eq!(rule.count_nodes::<TextNode>(), 0);
    rule.pump_until_idle().unwrap();
    assert_eq!(rule.count_nodes::<BarNode>(), 3);
}

#[test]
fn content_change_remeasures_with_fresh_nodes() {
    let mut rule = rule_300_wide();
    let content = Rc::new(RefCell::new("tiny".to_string()));
    let handle: Rc<RefCell<Option<MutableState<u32>>>> = Rc::new(RefCell::new(None));

    let content_for_composition = Rc::clone(&content);
    let captured = Rc::clone(&handle);
    rule.set_content(move || {
        let revision = useState(|| 0u32);
        *captured.borrow_mut() = Some(revision);
        let text = content_for_composition.borrow().clone();
        SkeletonText(&text, true, None);
    });
    rule.pump_until_idle().unwrap();

    let before: Vec<_> = rule.find_nodes::<BarNode>();
    assert_eq!(before.len(), 1);

    *content.borrow_mut() = three_line_text();
    let revision = handle.borrow().as_ref().unwrap().clone();
    revision.set(1);
    rule.pump_until_idle().unwrap();

    let after: Vec<_> = rule.find_nodes::<BarNode>();
    assert_eq!(after.len(), 3);
    for id in &after {
        assert!(!before.contains(id));
    }
}

#[test]
fn toggling_off_mid_measurement_is_safe() {
    let mut rule = rule_300_wide();
    let handle: Rc<RefCell<Option<MutableState<bool>>>> = Rc::new(RefCell::new(None));

    let captured = Rc::clone(&handle);
    rule.set_content(move || {
        let show = useState(|| true);
        *captured.borrow_mut() = Some(show.clone());
        SkeletonText("hello world", show.get(), None);
    });

    // The probe effect is scheduled but has not run; flip to passthrough
    // before it gets the chance.
    let show = handle.borrow().as_ref().unwrap().clone();
    show.set(false);
    rule.pump_until_idle().unwrap();

    assert_eq!(rule.count_nodes::<BarNode>(), 0);
    let texts = rule.find_nodes::<TextNode>();
    assert_eq!(texts.len(), 1);
    rule.with_node::<TextNode, _>(texts[0], |text| assert!(text.visible))
        .unwrap();
}

#[test]
fn dropping_a_rule_with_a_pending_probe_is_safe() {
    let mut rule = rule_300_wide();
    rule.set_content(|| {
        SkeletonText("hello world", true, None);
    });
    drop(rule);
}

#[test]
fn group_text_simulates_empty_content_from_the_estimate() {
    let mut rule = rule_300_wide();
    rule.set_content(|| {
        SkeletonGroup(true, None, || {
            // 20 chars at 10px each still fits one 300px line.
            GroupText("", 20, None);
        });
    });
    rule.pump_until_idle().unwrap();

    assert_eq!(rule.count_nodes::<BarNode>(), 1);
    assert_eq!(rule.count_nodes::<TextNode>(), 0);
}

#[test]
fn phrase_passes_through_when_skeletons_are_off() {
    let mut rule = rule_300_wide();
    rule.set_content(|| {
        SkeletonGroup(false, None, || {
            Phrase("ready", None);
        });
    });
    rule.pump_until_idle().unwrap();

    assert_eq!(rule.count_nodes::<BarNode>(), 0);
    let texts = rule.find_nodes::<TextNode>();
    assert_eq!(texts.len(), 1);
    rule.with_node::<TextNode, _>(texts[0], |text| assert_eq!(text.text, "ready"))
        .unwrap();
}

#[test]
fn group_style_override_reaches_the_bars() {
    let mut rule = rule_300_wide();
    rule.set_content(|| {
        let style = SkeletonStyle {
            color: "#223344".to_string(),
            ..SkeletonStyle::default()
        };
        SkeletonGroup(true, Some(style), || {
            Phrase("", None);
        });
    });
    rule.pump_until_idle().unwrap();

    let bars = rule.find_nodes::<BarNode>();
    assert_eq!(bars.len(), 1);
    rule.with_node::<BarNode, _>(bars[0], |bar| {
        assert_eq!(bar.color, "#223344");
        assert_eq!(bar.border_radius, "3px");
    })
    .unwrap();
}
