//! Headless test harness.
//!
//! [`TestRule`] owns a composition, a viewport and a text measurer, and
//! drives the compose / layout / layout-effect cycle the way a host shell
//! would, so tests can pump a UI to quiescence and inspect the node tree.

use std::sync::Arc;

use marrow_core::{
    Applier, Composition, Geometry, Key, MemoryApplier, Node, NodeError, NodeId, RuntimeHandle,
};
use marrow_ui::{layout_tree, MonospacedTextMeasurer, Size, TextMeasurer};

/// A monospaced measurer with the given metrics, for deterministic layout.
pub fn fixed_metrics(char_width: f32, line_height: f32) -> Arc<dyn TextMeasurer> {
    Arc::new(MonospacedTextMeasurer::new(char_width, line_height))
}

pub struct TestRule {
    composition: Composition<MemoryApplier>,
    content: Option<Box<dyn FnMut()>>,
    root_key: Key,
    viewport: Size,
    measurer: Arc<dyn TextMeasurer>,
}

impl TestRule {
    pub fn new() -> Self {
        Self::with_viewport(Size::new(300.0, 600.0))
    }

    pub fn with_viewport(viewport: Size) -> Self {
        Self {
            composition: Composition::new(MemoryApplier::new()),
            content: None,
            root_key: 1,
            viewport,
            measurer: Arc::new(MonospacedTextMeasurer::default()),
        }
    }

    pub fn set_measurer(&mut self, measurer: Arc<dyn TextMeasurer>) {
        self.measurer = measurer;
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Install `content` and compose the first frame.
    pub fn set_content(&mut self, content: impl FnMut() + 'static) {
        self.content = Some(Box::new(content));
        self.render();
    }

    /// Compose one frame of the installed content.
    pub fn render(&mut self) {
        let mut content = self.content.take().expect("set_content was not called");
        self.composition.render(self.root_key, || content());
        self.content = Some(content);
    }

    pub fn run_layout(&mut self) -> Result<(), NodeError> {
        let root = self.composition.root();
        let viewport = self.viewport;
        let measurer = Arc::clone(&self.measurer);
        let mut applier = self.composition.applier_mut();
        layout_tree(&mut applier, root, viewport, measurer.as_ref())
    }

    pub fn flush_layout_effects(&mut self) {
        self.composition.run_layout_effects();
    }

    /// Alternate compose, layout and layout-effect passes until nothing is
    /// pending. Returns the number of frames composed.
    ///
    /// # Panics
    ///
    /// Panics when the composition fails to settle, which in practice means
    /// an effect that endlessly invalidates.
    pub fn pump_until_idle(&mut self) -> Result<usize, NodeError> {
        let mut frames = 0;
        for _ in 0..100 {
            if self.composition.should_render() {
                self.render();
                frames += 1;
                self.run_layout()?;
                continue;
            }
            if self.composition.has_pending_layout_effects() {
                self.run_layout()?;
                self.flush_layout_effects();
                continue;
            }
            return Ok(frames);
        }
        panic!("composition did not settle within 100 iterations");
    }

    pub fn root(&self) -> NodeId {
        self.composition.root()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.composition.runtime_handle()
    }

    pub fn dump_tree(&self) -> String {
        let root = self.composition.root();
        self.composition.applier_mut().dump_tree(root)
    }

    pub fn geometry_of(&self, id: NodeId) -> Option<Geometry> {
        self.composition
            .applier_mut()
            .node(id)
            .and_then(|node| node.resolved_geometry())
    }

    /// Ids of all live nodes of type `N`, in creation order.
    pub fn find_nodes<N: Node + 'static>(&self) -> Vec<NodeId> {
        let applier = self.composition.applier_mut();
        applier
            .node_ids()
            .into_iter()
            .filter(|&id| applier.with_node::<N, _>(id, |_| ()).is_ok())
            .collect()
    }

    pub fn count_nodes<N: Node + 'static>(&self) -> usize {
        self.find_nodes::<N>().len()
    }

    pub fn find_blocks(&self) -> Vec<NodeId> {
        self.find_nodes::<marrow_ui::BlockNode>()
    }

    pub fn find_bars(&self) -> Vec<NodeId> {
        self.find_nodes::<marrow_ui::BarNode>()
    }

    pub fn find_texts(&self) -> Vec<NodeId> {
        self.find_nodes::<marrow_ui::TextNode>()
    }

    /// Read node `id` as its concrete type.
    pub fn with_node<N: Node + 'static, R>(
        &self,
        id: NodeId,
        f: impl FnOnce(&N) -> R,
    ) -> Result<R, NodeError> {
        self.composition.applier_mut().with_node(id, f)
    }
}

impl Default for TestRule {
    fn default() -> Self {
        Self::new()
    }
}
