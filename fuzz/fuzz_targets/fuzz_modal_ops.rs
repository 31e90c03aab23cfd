#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use modalkit_core::testing::{self, ElementSpec, MemoryDocument, NodeRef};
use modalkit_core::{InputEvent, Key, ModalHost, ModalManager, Modifiers, Point, Rect};

const IDS: [&str; 4] = ["a", "b", "c", "d"];

#[derive(Debug, Arbitrary)]
enum Op {
    Open(u8),
    Close(u8),
    CloseAll,
    Timers,
    PointerDown { node: u8, x: i16, y: i16 },
    Click { node: u8 },
    Key { node: u8, escape: bool, shift: bool },
    Detach(u8),
}

fn document() -> (MemoryDocument, Vec<NodeRef>) {
    let mut doc = MemoryDocument::new();
    let mut nodes = vec![doc.body()];
    for id in IDS {
        nodes.push(doc.append(doc.body(), ElementSpec::new("button").attr("data-modal", id)));
        let surface = doc.modal_surface(id);
        let content = doc.append(
            surface,
            ElementSpec::new("div").rect(Rect::new(200.0, 100.0, 400.0, 300.0)),
        );
        nodes.push(surface);
        nodes.push(content);
        nodes.push(doc.append(content, ElementSpec::new("button")));
        nodes.push(doc.append(content, ElementSpec::new("span").class("modal-close")));
    }
    (doc, nodes)
}

fuzz_target!(|ops: Vec<Op>| {
    let (doc, nodes) = document();
    let mut manager = ModalManager::with_defaults(doc);
    let pick = |i: u8| nodes[usize::from(i) % nodes.len()];
    let mut high = i32::MIN;

    for op in ops.into_iter().take(64) {
        match op {
            Op::Open(i) => {
                let id = IDS[usize::from(i) % IDS.len()];
                if manager.open(id) {
                    let z = manager.z_index(id).unwrap_or(i32::MIN);
                    assert!(z > high);
                    high = z;
                }
            }
            Op::Close(i) => {
                manager.close(IDS[usize::from(i) % IDS.len()]);
            }
            Op::CloseAll => {
                manager.close_all();
            }
            Op::Timers => {
                testing::run_scheduled(&mut manager);
            }
            Op::PointerDown { node, x, y } => {
                let at = Point::new(f64::from(x), f64::from(y));
                manager.handle_input(&InputEvent::pointer_down(pick(node), at));
            }
            Op::Click { node } => {
                manager.handle_input(&InputEvent::click(pick(node)));
            }
            Op::Key { node, escape, shift } => {
                let key = if escape { Key::Escape } else { Key::Tab };
                let modifiers = if shift { Modifiers::SHIFT } else { Modifiers::empty() };
                manager.handle_input(&InputEvent::key_down(pick(node), key, modifiers));
            }
            Op::Detach(i) => {
                let id = IDS[usize::from(i) % IDS.len()];
                if let Some(surface) = manager.host().find(id) {
                    manager.host_mut().detach(surface);
                }
            }
        }

        let open = manager.list_open();
        assert_eq!(manager.host().has_marker("modal-open"), !open.is_empty());
        let z: Vec<i32> = open.iter().filter_map(|id| manager.z_index(id.as_str())).collect();
        assert_eq!(z.len(), open.len());
        assert!(z.windows(2).all(|w| w[0] < w[1]));
        for id in &open {
            if let Some(surface) = manager.host().resolve(id) {
                let state = manager.host().surface_state(surface);
                assert!(state.is_some_and(|s| s.is_visible()));
            }
        }
    }
});
