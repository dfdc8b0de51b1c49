//! Renders a profile card twice: once while "loading", with every text run
//! replaced by skeleton bars of the right footprint, and once with the real
//! content. The node trees are printed so the transition can be compared.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use marrow_core::{useState, Composition, MemoryApplier, MutableState};
use marrow_ui::{
    layout_tree, set_text_measurer, text_measurer, Block, BlockSpec, GroupText,
    MonospacedTextMeasurer, Phrase, Size, SkeletonGroup,
};

const ROOT_KEY: u64 = 1;
const VIEWPORT: Size = Size::new(320.0, 480.0);

type LoadingHandle = Rc<RefCell<Option<MutableState<bool>>>>;

fn profile_card(loading_out: &LoadingHandle) {
    let loading = useState(|| true);
    *loading_out.borrow_mut() = Some(loading.clone());
    SkeletonGroup(loading.get(), None, || {
        Block(BlockSpec::new().class_name("card"), || {
            Phrase("Ada Lovelace", Some("name"));
            GroupText("Analyst, Analytical Engines", 24, Some("title"));
            // Bio text has not "arrived" yet; the estimate sizes its bars.
            GroupText("", 40, Some("bio"));
        });
    });
}

fn run_layout(composition: &mut Composition<MemoryApplier>) {
    let root = composition.root();
    let measurer = text_measurer();
    let mut applier = composition.applier_mut();
    if let Err(err) = layout_tree(&mut applier, root, VIEWPORT, measurer.as_ref()) {
        log::error!("layout failed: {err}");
    }
}

fn pump(composition: &mut Composition<MemoryApplier>, content: &mut dyn FnMut()) {
    for _ in 0..100 {
        if composition.should_render() {
            composition.render(ROOT_KEY, &mut *content);
            run_layout(composition);
        } else if composition.has_pending_layout_effects() {
            run_layout(composition);
            composition.run_layout_effects();
        } else {
            return;
        }
    }
    log::warn!("composition did not settle");
}

fn main() {
    env_logger::init();
    set_text_measurer(Arc::new(MonospacedTextMeasurer::new(9.0, 22.0)));

    let mut composition = Composition::new(MemoryApplier::new());
    let loading: LoadingHandle = Rc::new(RefCell::new(None));

    let captured = Rc::clone(&loading);
    let mut content = move || profile_card(&captured);

    composition.render(ROOT_KEY, &mut content);
    run_layout(&mut composition);
    pump(&mut composition, &mut content);

    let root = composition.root();
    println!("-- loading --");
    print!("{}", composition.applier_mut().dump_tree(root));

    if let Some(flag) = loading.borrow().as_ref() {
        flag.set(false);
    }
    pump(&mut composition, &mut content);

    println!("-- loaded --");
    print!("{}", composition.applier_mut().dump_tree(root));
}
