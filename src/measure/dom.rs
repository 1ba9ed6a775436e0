//! Browser measurement surface: Canvas 2D text metrics plus DOM probes.
//!
//! Probe elements are inserted into the grid's own DOM so they inherit the
//! grid's fonts and cell padding, but are forced hidden and absolutely
//! positioned so the visible layout never changes.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, Node,
};

use super::{markup, MeasurementSurface, ProbeContent, ProbeHandle};
use crate::error::{AutosizeError, Result};
use crate::types::Representation;

/// Inline style forced onto cloned header cells.
const CLONE_CSS: &str = "position: absolute; visibility: hidden; right: auto; \
                         text-overflow: initial; white-space: nowrap;";

fn surface_err(context: &str, err: &wasm_bindgen::JsValue) -> AutosizeError {
    AutosizeError::Surface(format!("{context}: {err:?}"))
}

struct Probe {
    /// Node attached to the document; removing it removes the whole probe.
    attached: Element,
    /// Node whose outer width is read.
    measured: HtmlElement,
}

/// DOM-backed [`MeasurementSurface`] for a SlickGrid-style container.
pub struct DomSurface {
    document: Document,
    container: HtmlElement,
    context: CanvasRenderingContext2d,
    headers: HashMap<String, HtmlElement>,
    probes: Vec<Option<Probe>>,
}

impl DomSurface {
    /// Create a surface for the grid rooted at `container`.
    ///
    /// # Errors
    /// Fails when there is no document or the browser refuses a 2D context.
    pub fn new(container: HtmlElement) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| AutosizeError::Surface("no document".to_string()))?;
        let context = document
            .create_element("canvas")
            .map_err(|e| surface_err("create canvas", &e))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| AutosizeError::Surface("canvas element cast".to_string()))?
            .get_context("2d")
            .map_err(|e| surface_err("get 2d context", &e))?
            .ok_or_else(|| AutosizeError::Surface("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AutosizeError::Surface("2d context cast".to_string()))?;

        Ok(Self {
            document,
            container,
            context,
            headers: HashMap::new(),
            probes: Vec::new(),
        })
    }

    /// The grid container this surface measures in.
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Replace the rendered header cells, keyed by column id.
    pub fn set_header_elements(&mut self, headers: HashMap<String, HtmlElement>) {
        self.headers = headers;
    }

    /// Probes currently attached.
    pub fn attached_probes(&self) -> usize {
        self.probes.iter().filter(|p| p.is_some()).count()
    }

    /// Hidden `.slick-row > .slick-cell` appended to the grid canvas.
    fn create_probe_row(&self) -> Result<(Element, HtmlElement)> {
        let row = self
            .document
            .create_element("div")
            .map_err(|e| surface_err("create row", &e))?;
        row.set_class_name("slick-row");
        let cell = self
            .document
            .create_element("div")
            .map_err(|e| surface_err("create cell", &e))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| AutosizeError::Surface("cell element cast".to_string()))?;
        cell.set_class_name("slick-cell");
        let style = cell.style();
        for (name, value) in [
            ("visibility", "hidden"),
            ("text-overflow", "initial"),
            ("white-space", "nowrap"),
        ] {
            style
                .set_property(name, value)
                .map_err(|e| surface_err("style probe cell", &e))?;
        }
        row.append_child(&cell)
            .map_err(|e| surface_err("append cell", &e))?;

        let parent: Element = self
            .container
            .query_selector(".grid-canvas")
            .ok()
            .flatten()
            .unwrap_or_else(|| self.container.clone().into());
        parent
            .append_child(&row)
            .map_err(|e| surface_err("append row", &e))?;
        Ok((row, cell))
    }

    fn clone_header(&self, column_id: &str) -> Result<Probe> {
        let source = self
            .headers
            .get(column_id)
            .ok_or_else(|| AutosizeError::Surface(format!("no header for {column_id}")))?;
        let clone = source
            .clone_node_with_deep(true)
            .map_err(|e| surface_err("clone header", &e))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| AutosizeError::Surface("header clone cast".to_string()))?;
        clone.style().set_css_text(CLONE_CSS);
        let parent = source
            .parent_node()
            .ok_or_else(|| AutosizeError::Surface(format!("header {column_id} detached")))?;
        let anchor: &Node = source;
        parent
            .insert_before(&clone, Some(anchor))
            .map_err(|e| surface_err("insert header clone", &e))?;
        Ok(Probe {
            attached: clone.clone().into(),
            measured: clone,
        })
    }

    fn fill_cell(&self, content: &Representation) -> Result<Probe> {
        let (row, cell) = self.create_probe_row()?;
        match content {
            Representation::Text(text) => cell.set_text_content(Some(text.as_str())),
            Representation::Markup(html) => {
                cell.set_inner_html(html);
                if let Ok(children) = cell.query_selector_all("*") {
                    for i in 0..children.length() {
                        if let Some(child) = children
                            .item(i)
                            .and_then(|n| n.dyn_into::<HtmlElement>().ok())
                        {
                            let _ = child.style().set_property("position", "relative");
                        }
                    }
                }
            }
        }
        Ok(Probe {
            attached: row,
            measured: cell,
        })
    }
}

impl MeasurementSurface for DomSurface {
    fn measure_text(&mut self, text: &str, font: &str) -> Option<f64> {
        self.context.set_font(font);
        self.context.measure_text(text).ok().map(|m| m.width())
    }

    fn cell_font(&mut self) -> Option<String> {
        let (row, cell) = self.create_probe_row().ok()?;
        let font = web_sys::window()
            .and_then(|w| w.get_computed_style(&cell).ok().flatten())
            .and_then(|style| {
                let size = style.get_property_value("font-size").ok()?;
                let family = style.get_property_value("font-family").ok()?;
                Some(format!("{size} {family}"))
            });
        row.remove();
        font.filter(|f| !f.trim().is_empty())
    }

    fn insert_probe(&mut self, content: &ProbeContent) -> Result<ProbeHandle> {
        let probe = match content {
            ProbeContent::HeaderClone { column_id, .. } => self.clone_header(column_id)?,
            ProbeContent::Cell(representation) => self.fill_cell(representation)?,
        };
        self.probes.push(Some(probe));
        Ok(ProbeHandle::new(self.probes.len() - 1))
    }

    fn probe_width(&mut self, probe: ProbeHandle) -> Result<f64> {
        match self.probes.get(probe.index()) {
            Some(Some(p)) => Ok(f64::from(p.measured.offset_width())),
            _ => Err(AutosizeError::Surface(format!(
                "probe {} is not attached",
                probe.index()
            ))),
        }
    }

    fn remove_probe(&mut self, probe: ProbeHandle) {
        if let Some(slot) = self.probes.get_mut(probe.index()) {
            if let Some(p) = slot.take() {
                p.attached.remove();
            }
        }
        if self.probes.iter().all(Option::is_none) {
            self.probes.clear();
        }
    }

    fn text_content(&self, representation: &Representation) -> String {
        match representation {
            Representation::Text(text) => text.clone(),
            Representation::Markup(html) => match self.document.create_element("span") {
                Ok(span) => {
                    span.set_inner_html(html);
                    span.text_content().unwrap_or_default()
                }
                Err(_) => markup::text_content(html),
            },
        }
    }
}
