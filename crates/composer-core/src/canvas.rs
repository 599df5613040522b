//! Canvas rendering.
//!
//! The canvas is the editing surface: every block wrapped with a drag
//! handle, drop zones between blocks, and a floating toolbar on the
//! selected block.
//!
//! ## Bindings
//!
//! Interactive elements carry a `data-target` key. Each render pass builds
//! a fresh [`Bindings`] table resolving those keys to what they act on.
//! A host hands back `(pass, key)` when the user clicks or drops; keys from
//! an older pass no longer resolve.
//!
//! | Key                     | Element              |
//! |-------------------------|----------------------|
//! | `zone:{index}`          | drop zone            |
//! | `block:{id}`            | block body (select)  |
//! | `handle:{id}`           | drag handle          |
//! | `toolbar:{action}:{id}` | toolbar button       |

use std::collections::HashMap;

use composer_blocks::{Block, BlockId, RenderMode, escape_html};
use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Preview width of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Device {
    /// CSS width of the canvas.
    pub fn width(self) -> &'static str {
        match self {
            Device::Desktop => "100%",
            Device::Tablet => "768px",
            Device::Mobile => "375px",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Device::Desktop => "desktop",
            Device::Tablet => "tablet",
            Device::Mobile => "mobile",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "desktop" => Some(Device::Desktop),
            "tablet" => Some(Device::Tablet),
            "mobile" => Some(Device::Mobile),
            _ => None,
        }
    }

    fn margin(self) -> &'static str {
        match self {
            Device::Desktop => "0",
            Device::Tablet | Device::Mobile => "0 auto",
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Buttons of the floating block toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    MoveUp,
    MoveDown,
    Duplicate,
    Delete,
}

impl ToolbarAction {
    pub const ALL: [ToolbarAction; 4] = [
        ToolbarAction::MoveUp,
        ToolbarAction::MoveDown,
        ToolbarAction::Duplicate,
        ToolbarAction::Delete,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ToolbarAction::MoveUp => "move-up",
            ToolbarAction::MoveDown => "move-down",
            ToolbarAction::Duplicate => "duplicate",
            ToolbarAction::Delete => "delete",
        }
    }

    fn title(self) -> &'static str {
        match self {
            ToolbarAction::MoveUp => "Move up",
            ToolbarAction::MoveDown => "Move down",
            ToolbarAction::Duplicate => "Duplicate",
            ToolbarAction::Delete => "Delete",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            ToolbarAction::MoveUp => "arrow_upward",
            ToolbarAction::MoveDown => "arrow_downward",
            ToolbarAction::Duplicate => "content_copy",
            ToolbarAction::Delete => "delete",
        }
    }

    fn hover(self) -> &'static str {
        match self {
            ToolbarAction::Delete => "hover:bg-red-500",
            _ => "hover:bg-white/10",
        }
    }
}

/// What an interactive canvas element acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Insertion point before block `index` (or after the last block)
    DropZone { index: usize },
    /// Block body: selects the block
    Block { id: BlockId },
    /// Drag handle: starts a reorder drag
    Handle { id: BlockId },
    /// Toolbar button of the selected block
    Toolbar { id: BlockId, action: ToolbarAction },
}

impl Binding {
    /// The `data-target` key of this binding.
    pub fn key(&self) -> String {
        match self {
            Binding::DropZone { index } => format!("zone:{}", index),
            Binding::Block { id } => format!("block:{}", id),
            Binding::Handle { id } => format!("handle:{}", id),
            Binding::Toolbar { id, action } => format!("toolbar:{}:{}", action.key(), id),
        }
    }
}

/// Target table of one render pass.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    pass: u64,
    targets: HashMap<String, Binding>,
}

impl Bindings {
    fn new(pass: u64) -> Self {
        Self {
            pass,
            targets: HashMap::new(),
        }
    }

    /// Registers a binding and returns its escaped key for markup.
    fn bind(&mut self, binding: Binding) -> String {
        let key = binding.key();
        let attr = escape_html(&key);
        self.targets.insert(key, binding);
        attr
    }

    /// Render pass this table belongs to.
    pub fn pass(&self) -> u64 {
        self.pass
    }

    /// Resolves a target reported by the host.
    ///
    /// Returns `None` for unknown keys and for keys from another pass.
    pub fn resolve(&self, pass: u64, key: &str) -> Option<&Binding> {
        if pass != self.pass {
            tracing::debug!("Ignoring target {} from stale pass {}", key, pass);
            return None;
        }
        self.targets.get(key)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterates over all bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.targets.iter().map(|(k, b)| (k.as_str(), b))
    }
}

/// Output of one render pass.
#[derive(Debug, Clone, Default)]
pub struct CanvasView {
    pub html: String,
    pub bindings: Bindings,
}

/// Renders documents onto the editing canvas.
#[derive(Debug, Default)]
pub struct CanvasRenderer {
    device: Device,
    passes: u64,
}

impl CanvasRenderer {
    pub fn new(device: Device) -> Self {
        Self { device, passes: 0 }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    /// Renders the document, starting a new binding pass.
    ///
    /// The markup depends only on the document and the device.
    pub fn render(&mut self, doc: &Document) -> CanvasView {
        self.passes += 1;
        let mut bindings = Bindings::new(self.passes);

        let body = if doc.is_empty() {
            empty_state(&mut bindings)
        } else {
            let mut html = drop_zone(&mut bindings, 0);
            for (index, block) in doc.blocks().iter().enumerate() {
                let selected = doc.selected() == Some(&block.id);
                html.push_str(&canvas_block(&mut bindings, block, selected));
                html.push_str(&drop_zone(&mut bindings, index + 1));
            }
            html
        };

        let html = format!(
            "<div id=\"canvas\" data-device=\"{}\" style=\"width: {}; margin: {}\"><div id=\"canvas-content\">{}</div></div>",
            self.device,
            self.device.width(),
            self.device.margin(),
            body
        );

        CanvasView { html, bindings }
    }
}

fn empty_state(bindings: &mut Bindings) -> String {
    let target = bindings.bind(Binding::DropZone { index: 0 });
    format!(
        "<div id=\"empty-state\" class=\"drop-zone flex flex-col items-center justify-center py-24 text-center border-2 border-dashed border-slate-200 dark:border-slate-700 rounded-xl\" data-index=\"0\" data-target=\"{}\">\
<span class=\"material-symbols-outlined text-5xl text-slate-300 mb-3\">add_circle</span>\
<p class=\"text-slate-500\">Drag blocks here to start building</p></div>",
        target
    )
}

fn drop_zone(bindings: &mut Bindings, index: usize) -> String {
    let target = bindings.bind(Binding::DropZone { index });
    format!(
        "<div class=\"drop-zone\" data-index=\"{}\" data-target=\"{}\"></div>",
        index, target
    )
}

fn canvas_block(bindings: &mut Bindings, block: &Block, selected: bool) -> String {
    let id = &block.id;
    let body = bindings.bind(Binding::Block { id: id.clone() });
    let handle = bindings.bind(Binding::Handle { id: id.clone() });
    let toolbar = if selected {
        toolbar(bindings, id)
    } else {
        String::new()
    };

    format!(
        "<div class=\"canvas-block relative group{}\" data-block-id=\"{}\" data-target=\"{}\" draggable=\"true\">\
<div class=\"drag-handle absolute -left-10 top-1/2 -translate-y-1/2 cursor-move p-1 rounded hover:bg-slate-100 dark:hover:bg-slate-800\" data-target=\"{}\">\
<span class=\"material-symbols-outlined text-slate-400\">drag_indicator</span></div>\
<div class=\"block-content\">{}</div>{}</div>",
        if selected { " selected" } else { "" },
        escape_html(id.as_str()),
        body,
        handle,
        block.render(None, RenderMode::Edit),
        toolbar
    )
}

fn toolbar(bindings: &mut Bindings, id: &BlockId) -> String {
    let mut html = String::from(
        "<div class=\"block-toolbar flex items-center gap-1 bg-slate-900 dark:bg-slate-700 rounded-lg p-1 shadow-xl\">",
    );
    for action in ToolbarAction::ALL {
        if action == ToolbarAction::Duplicate {
            html.push_str("<div class=\"w-px h-5 bg-white/20 mx-1\"></div>");
        }
        let target = bindings.bind(Binding::Toolbar {
            id: id.clone(),
            action,
        });
        html.push_str(&format!(
            "<button class=\"p-1.5 rounded {} text-white\" title=\"{}\" data-target=\"{}\">\
<span class=\"material-symbols-outlined text-lg\">{}</span></button>",
            action.hover(),
            action.title(),
            target,
            action.icon()
        ));
    }
    html.push_str("</div>");
    html
}
