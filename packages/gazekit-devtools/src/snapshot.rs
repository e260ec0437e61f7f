use gazekit_core::{Scene, Widget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetNode {
    pub id: u64,
    pub kind: String,
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub size: [f32; 3],
    pub visible: bool,
    pub hovering: bool,
    pub valid: bool,
    pub children: Vec<u64>,
}

/// Serializable view of a scene tree at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub title: Option<String>,
    pub roots: Vec<u64>,
    pub widgets: BTreeMap<u64, WidgetNode>,
}

impl SceneSnapshot {
    pub fn capture(scene: &Scene) -> Self {
        let mut widgets = BTreeMap::new();
        let roots = scene.widgets().map(|w| visit(w, &mut widgets)).collect();
        Self {
            title: scene.title().map(str::to_string),
            roots,
            widgets,
        }
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn visit(widget: &dyn Widget, out: &mut BTreeMap<u64, WidgetNode>) -> u64 {
    let mut children = Vec::new();
    widget.for_each_child(&mut |child| children.push(visit(child, out)));

    let base = widget.base();
    let id = base.id().raw();
    out.insert(
        id,
        WidgetNode {
            id,
            kind: widget.kind().to_string(),
            position: base.position().to_array(),
            scale: base.scale_factors().to_array(),
            size: [base.width(), base.height(), base.depth()],
            visible: base.is_visible(),
            hovering: base.is_hovering(),
            valid: base.is_valid(),
            children,
        },
    );
    id
}
