//! JavaScript plugin binding for SlickGrid-style grids.
//!
//! ```javascript
//! const plugin = new AutoColumnSize({ autoSizeOnRender: true });
//! plugin.init(grid);   // subscribes to grid.onRendered, listens for dblclick
//! plugin.destroy();
//! ```
//!
//! The JS grid is adapted to [`ColumnLayoutHost`] through reflection on its
//! public API (`getColumns`, `setColumns`, `getColumnIndex`, `getData`,
//! `getViewport`, `getContainerNode`, `getUID`, `onRendered`,
//! `onColumnsResized`).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use js_sys::{Array, Function, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, MouseEvent};

use crate::error::AutosizeError;
use crate::host::{header_column_id, ColumnLayoutHost, RowSource};
use crate::measure::DomSurface;
use crate::sizer::{AutoColumnSizer, SizingOutcome, SkipReason};
use crate::types::{
    AutoSizeOptions, Column, FormatContext, Formatter, Representation, RowRecord, ViewportRows,
};

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn call(target: &JsValue, method: &str, args: &Array) -> Option<JsValue> {
    let function = get(target, method)?.dyn_into::<Function>().ok()?;
    function.apply(target, args).ok()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_usize(value: f64) -> Option<usize> {
    (value.is_finite() && value >= 0.0).then(|| value as usize)
}

#[allow(clippy::cast_possible_truncation)]
fn to_i64(value: f64) -> i64 {
    if value.is_finite() {
        value as i64
    } else {
        0
    }
}

fn index_arg(index: usize) -> JsValue {
    JsValue::from(u32::try_from(index).unwrap_or(u32::MAX))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

/// Wrap a JS formatter `(row, cell, value, columnDef, dataContext) => html`.
fn wrap_formatter(function: Function, column_def: JsValue) -> Formatter {
    Rc::new(move |ctx: &FormatContext<'_>| {
        let record = ctx.record.map_or(JsValue::UNDEFINED, |r| to_js(r));
        let args = Array::of5(
            &index_arg(ctx.row),
            &index_arg(ctx.column_index),
            &to_js(ctx.value),
            &column_def,
            &record,
        );
        let output = function
            .apply(&JsValue::NULL, &args)
            .map_err(|e| AutosizeError::Formatter {
                row: ctx.row,
                column: ctx.column_index,
                message: format!("{e:?}"),
            })?;
        Ok(match output.as_string() {
            Some(html) => Representation::Markup(html),
            None => Representation::Text(String::new()),
        })
    })
}

fn column_from_js(def: &JsValue) -> Option<Column> {
    let id = get(def, "id")?.as_string()?;
    let field = get(def, "field")
        .and_then(|f| f.as_string())
        .unwrap_or_else(|| id.clone());
    let mut column = Column::new(id, field);
    if let Some(name) = get(def, "name").and_then(|n| n.as_string()) {
        column.name = name;
    }
    column.width = get(def, "width").and_then(|w| w.as_f64());
    column.max_width = get(def, "maxWidth").and_then(|w| w.as_f64());
    column.resizable = get(def, "resizable")
        .and_then(|r| r.as_bool())
        .unwrap_or(true);
    if let Some(function) = get(def, "formatter").and_then(|f| f.dyn_into::<Function>().ok()) {
        column.formatter = Some(wrap_formatter(function, def.clone()));
    }
    Some(column)
}

/// A JS grid seen through [`ColumnLayoutHost`].
struct JsGrid {
    grid: JsValue,
    /// `grid.getUID()`, the prefix of every header cell's DOM id.
    uid: String,
    /// Header ids found by the last [`JsGrid::scan_headers`].
    rendered: Vec<String>,
}

impl JsGrid {
    fn container(&self) -> Option<HtmlElement> {
        call(&self.grid, "getContainerNode", &Array::new())?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn js_columns(&self) -> Array {
        call(&self.grid, "getColumns", &Array::new())
            .and_then(|c| c.dyn_into::<Array>().ok())
            .unwrap_or_else(Array::new)
    }

    fn column_ids(&self) -> Vec<String> {
        self.js_columns()
            .iter()
            .filter_map(|def| get(&def, "id").and_then(|id| id.as_string()))
            .collect()
    }

    fn new(grid: JsValue) -> Self {
        let uid = call(&grid, "getUID", &Array::new())
            .and_then(|uid| uid.as_string())
            .unwrap_or_default();
        Self {
            grid,
            uid,
            rendered: Vec::new(),
        }
    }

    /// Column id of a rendered header cell.
    fn header_column_id(&self, ids: &[String], header: &Element) -> Option<String> {
        header_column_id(&self.uid, &header.id(), ids).map(str::to_string)
    }

    /// Find the rendered header cells, remember their order, and return them
    /// keyed by column id.
    fn scan_headers(&mut self) -> HashMap<String, HtmlElement> {
        let ids = self.column_ids();
        let mut found = HashMap::new();
        self.rendered.clear();

        let Some(row) = self
            .container()
            .and_then(|c| c.query_selector(".slick-header-columns").ok().flatten())
        else {
            return found;
        };
        let children = row.children();
        for i in 0..children.length() {
            let Some(header) = children.item(i) else {
                continue;
            };
            let Some(id) = self.header_column_id(&ids, &header) else {
                continue;
            };
            if let Ok(element) = header.dyn_into::<HtmlElement>() {
                self.rendered.push(id.clone());
                found.insert(id, element);
            }
        }
        found
    }

    fn data(&self) -> Option<JsValue> {
        call(&self.grid, "getData", &Array::new())
    }
}

impl RowSource for JsGrid {
    fn data_len(&self) -> usize {
        self.data()
            .and_then(|d| call(&d, "getLength", &Array::new()))
            .and_then(|n| n.as_f64())
            .and_then(to_usize)
            .unwrap_or(0)
    }

    fn row(&self, index: usize) -> Option<RowRecord> {
        let item = call(&self.data()?, "getItem", &Array::of1(&index_arg(index)))?;
        serde_wasm_bindgen::from_value(item).ok()
    }
}

impl ColumnLayoutHost for JsGrid {
    fn columns(&self) -> Vec<Column> {
        self.js_columns()
            .iter()
            .filter_map(|def| column_from_js(&def))
            .collect()
    }

    fn set_columns(&mut self, columns: Vec<Column>) {
        let widths: HashMap<String, Option<f64>> =
            columns.into_iter().map(|c| (c.id, c.width)).collect();
        let updated = Array::new();
        for def in self.js_columns().iter() {
            let copy = Object::assign(&Object::new(), &Object::from(def.clone()));
            let width = get(&def, "id")
                .and_then(|id| id.as_string())
                .and_then(|id| widths.get(&id).copied().flatten());
            if let Some(width) = width {
                let _ = Reflect::set(&copy, &JsValue::from_str("width"), &JsValue::from(width));
            }
            updated.push(&copy);
        }
        call(&self.grid, "setColumns", &Array::of1(&updated));
    }

    fn column_index(&self, id: &str) -> Option<usize> {
        let index = call(&self.grid, "getColumnIndex", &Array::of1(&JsValue::from_str(id)))?;
        to_usize(index.as_f64()?)
    }

    fn viewport(&self) -> ViewportRows {
        let Some(viewport) = call(&self.grid, "getViewport", &Array::new()) else {
            return ViewportRows::default();
        };
        let read = |key| get(&viewport, key).and_then(|v| v.as_f64()).map_or(0, to_i64);
        ViewportRows::new(read("top"), read("bottom"))
    }

    fn is_attached(&self) -> bool {
        self.container().is_some_and(|c| c.is_connected())
    }

    fn rendered_headers(&self) -> Vec<String> {
        self.rendered.clone()
    }

    fn notify_columns_resized(&mut self) {
        if let Some(event) = get(&self.grid, "onColumnsResized") {
            call(&event, "notify", &Array::new());
        }
    }
}

struct Session {
    grid: JsGrid,
    surface: DomSurface,
    container: HtmlElement,
    render_handler: Option<Closure<dyn FnMut()>>,
    dblclick_handler: Option<Closure<dyn FnMut(MouseEvent)>>,
}

struct PluginState {
    sizer: AutoColumnSizer,
    session: RefCell<Option<Session>>,
}

impl PluginState {
    fn auto_size(&self) -> bool {
        // A nested notification raised by our own setColumns finds the
        // session borrowed and is dropped.
        let Ok(mut guard) = self.session.try_borrow_mut() else {
            return false;
        };
        let Some(session) = guard.as_mut() else {
            return false;
        };
        let headers = session.grid.scan_headers();
        session.surface.set_header_elements(headers);
        let outcome = self
            .sizer
            .on_post_render(&mut session.grid, &mut session.surface);
        matches!(outcome, SizingOutcome::Resized { .. })
    }

    fn resize(&self, column_id: &str) -> SizingOutcome {
        let Ok(mut guard) = self.session.try_borrow_mut() else {
            return SizingOutcome::Skipped(SkipReason::InProgress);
        };
        let Some(session) = guard.as_mut() else {
            return SizingOutcome::Skipped(SkipReason::Inactive);
        };
        let headers = session.grid.scan_headers();
        session.surface.set_header_elements(headers);
        self.sizer
            .on_double_click_resize_handle(&mut session.grid, &mut session.surface, column_id)
    }

    fn on_double_click(&self, event: &MouseEvent) {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let is_handle = target
            .closest(".slick-resizable-handle")
            .ok()
            .flatten()
            .is_some();
        if !is_handle {
            return;
        }
        let Some(header) = target.closest(".slick-header-column").ok().flatten() else {
            return;
        };
        let column_id = {
            let Ok(guard) = self.session.try_borrow() else {
                return;
            };
            let Some(session) = guard.as_ref() else {
                return;
            };
            session
                .grid
                .header_column_id(&session.grid.column_ids(), &header)
        };
        let Some(column_id) = column_id else {
            return;
        };
        if self.resize(&column_id).suppresses_default() {
            event.prevent_default();
            event.stop_propagation();
        }
    }
}

/// Auto column size plugin for SlickGrid-compatible grids.
#[wasm_bindgen]
pub struct AutoColumnSize {
    state: Rc<PluginState>,
}

#[wasm_bindgen]
impl AutoColumnSize {
    /// Create the plugin. `options` may be `undefined` or a partial
    /// `{ maxWidth, autoSizeOnRender, extraColumnHeaderWidth }` object.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<AutoColumnSize, JsValue> {
        console_error_panic_hook::set_once();
        let options: AutoSizeOptions = if options.is_undefined() || options.is_null() {
            AutoSizeOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        Ok(Self {
            state: Rc::new(PluginState {
                sizer: AutoColumnSizer::new(options),
                session: RefCell::new(None),
            }),
        })
    }

    /// Attach to `grid`: subscribe to render completion (when enabled) and
    /// listen for double-clicks on resize handles.
    pub fn init(&self, grid: JsValue) -> Result<(), JsValue> {
        self.destroy();

        let grid = JsGrid::new(grid);
        let container = grid
            .container()
            .ok_or_else(|| JsValue::from_str("grid has no container node"))?;
        let surface = DomSurface::new(container.clone())?;

        let weak: Weak<PluginState> = Rc::downgrade(&self.state);
        let render_handler = if self.state.sizer.options().auto_size_on_render {
            let weak = weak.clone();
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.auto_size();
                }
            }) as Box<dyn FnMut()>);
            if let Some(event) = get(&grid.grid, "onRendered") {
                call(&event, "subscribe", &Array::of1(closure.as_ref()));
            }
            Some(closure)
        } else {
            None
        };

        let dblclick_handler = Closure::wrap(Box::new(move |event: MouseEvent| {
            if let Some(state) = weak.upgrade() {
                state.on_double_click(&event);
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        container
            .add_event_listener_with_callback("dblclick", dblclick_handler.as_ref().unchecked_ref())
            .ok();

        *self.state.session.borrow_mut() = Some(Session {
            grid,
            surface,
            container,
            render_handler,
            dblclick_handler: Some(dblclick_handler),
        });
        self.state.sizer.init();
        Ok(())
    }

    /// Detach from the grid and remove all listeners.
    pub fn destroy(&self) {
        let Ok(mut guard) = self.state.session.try_borrow_mut() else {
            return;
        };
        if let Some(session) = guard.take() {
            if let Some(handler) = session.dblclick_handler.as_ref() {
                session
                    .container
                    .remove_event_listener_with_callback("dblclick", handler.as_ref().unchecked_ref())
                    .ok();
            }
            if let (Some(handler), Some(event)) = (
                session.render_handler.as_ref(),
                get(&session.grid.grid, "onRendered"),
            ) {
                call(&event, "unsubscribe", &Array::of1(handler.as_ref()));
            }
        }
        self.state.sizer.destroy();
    }

    /// Run the auto-size pass now. Returns whether any width changed.
    #[wasm_bindgen(js_name = autoSizeColumns)]
    pub fn auto_size_columns(&self) -> bool {
        self.state.auto_size()
    }

    /// Fit one column, as a double-click on its resize handle would.
    /// Returns whether the column was resized.
    #[wasm_bindgen(js_name = resizeColumn)]
    pub fn resize_column(&self, column_id: &str) -> bool {
        matches!(
            self.state.resize(column_id),
            SizingOutcome::Resized { .. }
        )
    }
}
