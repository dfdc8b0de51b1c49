//! Measurement-driven skeleton text.
//!
//! [`SkeletonText`] replaces a run of text with placeholder bars matching
//! the footprint the real text would occupy. It renders in three modes:
//!
//! 1. passthrough, when simulation is off: plain visible text;
//! 2. measuring: the text is laid out hidden inside a full-width probe and
//!    its resolved geometry is read back after layout;
//! 3. simulated: a fixed-size box replays the measured footprint as one
//!    placeholder bar per line of text.
//!
//! Each piece of content is measured once. Changing the content tears the
//! instance down and measures again from scratch.

use marrow_core::{
    location_key, useState, with_composer, with_key, Applier, LayoutEffect, LayoutEffectScope,
    MutableState, NodeId,
};

use crate::geometry::Size;
use crate::nodes::{Arrangement, BlockRole};
use crate::skeleton::Skeleton;
use crate::widgets::{Block, BlockSpec, Text};
use crate::HiddenText;

/// Geometry captured from a measurement probe. All three fields come from
/// the same layout pass; a value of this type is never partially filled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasuredBox {
    pub line_height: f32,
    pub height: f32,
    pub width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Passthrough,
    Measuring,
    Simulated,
}

pub fn render_mode(simulate: bool, measured: Option<&MeasuredBox>) -> RenderMode {
    if !simulate {
        RenderMode::Passthrough
    } else if measured.is_none() {
        RenderMode::Measuring
    } else {
        RenderMode::Simulated
    }
}

/// Number of text lines a box of `box_height` holds at `line_height`,
/// rounded to the nearest whole line and clamped to at least one.
/// Degenerate geometry falls back to a single line.
pub fn line_count(box_height: f32, line_height: f32) -> usize {
    if !box_height.is_finite()
        || !line_height.is_finite()
        || box_height <= 0.0
        || line_height <= 0.0
    {
        log::warn!(
            "degenerate geometry for skeleton simulation: height {box_height}, line height {line_height}"
        );
        return 1;
    }
    ((box_height / line_height).round() as usize).max(1)
}

#[allow(non_snake_case)]
pub fn SkeletonText(content: &str, simulate: bool, class_name: Option<&str>) {
    let key = location_key(file!(), line!(), column!());
    with_composer(|composer| {
        composer.with_group(key, || {
            // Passthrough is decided before the keyed group is entered, so
            // toggling simulation off tears the measurement state down.
            if render_mode(simulate, None) == RenderMode::Passthrough {
                Text(content);
                return;
            }
            with_key(&content, || {
                let measured = useState(|| None::<MeasuredBox>);
                let found = measured.get();
                if render_mode(simulate, found.as_ref()) == RenderMode::Measuring {
                    measuring_shell(content, class_name, measured);
                } else if let Some(found) = found {
                    simulated_block(found, class_name);
                }
            });
        })
    });
}

fn measuring_shell(
    content: &str,
    class_name: Option<&str>,
    measured: MutableState<Option<MeasuredBox>>,
) {
    let probe = Block(
        BlockSpec::new()
            .role(BlockRole::Probe)
            .maybe_class_name(class_name),
        || {
            HiddenText(content);
        },
    );
    LayoutEffect!((), move |scope| measure_probe(scope, probe, &measured));
}

fn measure_probe(
    scope: &LayoutEffectScope,
    probe: NodeId,
    measured: &MutableState<Option<MeasuredBox>>,
) {
    if measured.with(|found| found.is_some()) {
        return;
    }
    let geometry = scope
        .runtime()
        .with_applier(|applier| applier.node(probe).and_then(|node| node.resolved_geometry()));
    match geometry {
        Some(Some(resolved)) => {
            measured.set(Some(MeasuredBox {
                line_height: resolved.line_height.unwrap_or(0.0),
                height: resolved.height,
                width: resolved.width,
            }));
        }
        // Layout has not reached the probe yet; try again next pass.
        Some(None) => scope.relaunch(),
        // The composition is gone.
        None => {}
    }
}

fn simulated_block(measured: MeasuredBox, class_name: Option<&str>) {
    let rows = line_count(measured.height, measured.line_height);
    Block(
        BlockSpec::new()
            .role(BlockRole::SimulatedBox)
            .arrangement(Arrangement::SpaceEvenly)
            .size(Size::new(measured.width, measured.height))
            .maybe_class_name(class_name),
        || {
            for index in 0..rows {
                let row_key = (measured.height.to_bits(), measured.width.to_bits(), index);
                with_key(&row_key, || {
                    Block(BlockSpec::new().role(BlockRole::Line), || {
                        Skeleton(None);
                    });
                });
            }
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_rounds_to_nearest() {
        assert_eq!(line_count(96.0, 24.0), 4);
        assert_eq!(line_count(100.0, 24.0), 4);
        assert_eq!(line_count(110.0, 24.0), 5);
    }

    #[test]
    fn line_count_never_drops_below_one() {
        assert_eq!(line_count(5.0, 24.0), 1);
        assert_eq!(line_count(0.0, 24.0), 1);
    }

    #[test]
    fn degenerate_geometry_falls_back_to_one_line() {
        assert_eq!(line_count(96.0, 0.0), 1);
        assert_eq!(line_count(96.0, -1.0), 1);
        assert_eq!(line_count(f32::NAN, 24.0), 1);
        assert_eq!(line_count(f32::INFINITY, 24.0), 1);
        assert_eq!(line_count(96.0, f32::NAN), 1);
    }

    #[test]
    fn render_mode_tracks_inputs() {
        let measured = MeasuredBox {
            line_height: 24.0,
            height: 96.0,
            width: 300.0,
        };
        assert_eq!(render_mode(false, None), RenderMode::Passthrough);
        assert_eq!(render_mode(false, Some(&measured)), RenderMode::Passthrough);
        assert_eq!(render_mode(true, None), RenderMode::Measuring);
        assert_eq!(render_mode(true, Some(&measured)), RenderMode::Simulated);
    }
}
