//! DOM tile surface (wasm32 only).
//!
//! Structure inside the host container:
//!
//! ```text
//! div.photogrid-surface          (clips, receives input)
//! └─ div.photogrid-layer         (translated by the pan offset)
//!    └─ div.photogrid-tile       (absolutely positioned, one per mounted cell)
//!       └─ img.photogrid-tile__img
//! ```
//!
//! Tiles are placed in lattice coordinates once; panning only rewrites the
//! layer's `transform`. Images get their `src` lazily from `begin_loading`.

use std::collections::HashMap;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlDivElement, HtmlElement, HtmlImageElement};

use super::backend::TileSurface;
use super::grid::{container_transform, LoadState, PlacedTile, RenderPlan, TileRect};
use crate::error::{PhotoGridError, Result};
use crate::types::{CellCoordinate, ScrollOffset};

pub const SURFACE_CLASS: &str = "photogrid-surface";
pub const LAYER_CLASS: &str = "photogrid-layer";
pub const TILE_CLASS: &str = "photogrid-tile";
pub const IMAGE_CLASS: &str = "photogrid-tile__img";
pub const LOADED_CLASS: &str = "photogrid-tile--loaded";
pub const FAILED_CLASS: &str = "photogrid-tile--failed";

/// Attributes on each `<img>` that identify its cell in load/error events.
pub const ROW_ATTR: &str = "data-row";
pub const COL_ATTR: &str = "data-col";

fn dom_err(what: &'static str) -> impl Fn(JsValue) -> PhotoGridError {
    move |value| PhotoGridError::Dom(format!("{what}: {value:?}"))
}

struct TileNode {
    wrapper: HtmlDivElement,
    img: HtmlImageElement,
    /// Image URL assigned when loading starts.
    src: String,
}

/// Tile surface backed by real DOM elements.
pub struct DomSurface {
    document: Document,
    surface: HtmlDivElement,
    layer: HtmlDivElement,
    tiles: HashMap<CellCoordinate, TileNode>,
    /// `load` and `error` listeners attached to every tile image.
    image_handlers: Option<(Function, Function)>,
}

impl DomSurface {
    /// Build the surface inside `container`.
    pub fn new(container: &HtmlElement) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| PhotoGridError::Dom("no document".to_string()))?;

        let surface = create_div(&document)?;
        surface.set_class_name(SURFACE_CLASS);
        let style = surface.style();
        let _ = style.set_property("position", "relative");
        let _ = style.set_property("overflow", "hidden");
        let _ = style.set_property("width", "100%");
        let _ = style.set_property("height", "100%");
        let _ = style.set_property("touch-action", "none");
        let _ = style.set_property("user-select", "none");
        let _ = style.set_property("cursor", "grab");

        let layer = create_div(&document)?;
        layer.set_class_name(LAYER_CLASS);
        let style = layer.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("top", "0");
        let _ = style.set_property("left", "0");
        let _ = style.set_property("will-change", "transform");
        let _ = style.set_property("transform", &container_transform(ScrollOffset::ORIGIN));

        surface
            .append_child(&layer)
            .map_err(dom_err("append layer"))?;
        container
            .append_child(&surface)
            .map_err(dom_err("append surface"))?;

        Ok(Self {
            document,
            surface,
            layer,
            tiles: HashMap::new(),
            image_handlers: None,
        })
    }

    /// Listeners for tile image `load`/`error` events, applied to tiles
    /// created from now on. They find the cell through [`cell_from_image`].
    pub fn set_image_handlers(&mut self, on_load: Function, on_error: Function) {
        self.image_handlers = Some((on_load, on_error));
    }

    /// Element that receives pointer input.
    pub fn surface(&self) -> &HtmlDivElement {
        &self.surface
    }

    /// Viewport size of the surface in CSS pixels.
    pub fn client_size(&self) -> (f64, f64) {
        let rect = self.surface.get_bounding_client_rect();
        (rect.width(), rect.height())
    }

    /// Detach the surface from its container.
    pub fn unmount(&mut self) {
        self.clear();
        self.surface.remove();
    }

    fn create_tile(&self, tile: &PlacedTile) -> Result<TileNode> {
        let wrapper = create_div(&self.document)?;
        wrapper.set_class_name(TILE_CLASS);
        let style = wrapper.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("overflow", "hidden");
        place(&wrapper, &tile.rect);

        let img = self
            .document
            .create_element("img")
            .map_err(dom_err("create img"))?
            .dyn_into::<HtmlImageElement>()
            .map_err(|_| PhotoGridError::Dom("img is not an HtmlImageElement".to_string()))?;
        img.set_class_name(IMAGE_CLASS);
        img.set_alt(&tile.photo.alt_text());
        img.set_draggable(false);
        let _ = img.set_attribute(ROW_ATTR, &tile.cell.row.to_string());
        let _ = img.set_attribute(COL_ATTR, &tile.cell.col.to_string());
        let style = img.style();
        let _ = style.set_property("width", "100%");
        let _ = style.set_property("height", "100%");
        let _ = style.set_property("object-fit", "cover");
        let _ = style.set_property("pointer-events", "none");
        if let Some((on_load, on_error)) = &self.image_handlers {
            img.add_event_listener_with_callback("load", on_load)
                .map_err(dom_err("image load listener"))?;
            img.add_event_listener_with_callback("error", on_error)
                .map_err(dom_err("image error listener"))?;
        }

        wrapper.append_child(&img).map_err(dom_err("append img"))?;
        self.layer
            .append_child(&wrapper)
            .map_err(dom_err("append tile"))?;

        Ok(TileNode {
            wrapper,
            img,
            src: tile.photo.image_ref.clone(),
        })
    }

    fn remove_tile(&self, node: &TileNode) {
        detach(node, self.image_handlers.as_ref());
    }
}

impl TileSurface for DomSurface {
    fn apply_plan(&mut self, plan: &RenderPlan) -> Result<()> {
        for cell in &plan.removed {
            if let Some(node) = self.tiles.remove(cell) {
                self.remove_tile(&node);
            }
        }
        for tile in &plan.added {
            let node = self.create_tile(tile)?;
            if let Some(old) = self.tiles.insert(tile.cell, node) {
                self.remove_tile(&old);
            }
        }
        for tile in &plan.changed {
            let Some(node) = self.tiles.get_mut(&tile.cell) else {
                continue;
            };
            place(&node.wrapper, &tile.rect);
            if tile.reload {
                node.src = tile.photo.image_ref.clone();
                node.img.set_alt(&tile.photo.alt_text());
                let _ = node.img.remove_attribute("src");
                let classes = node.wrapper.class_list();
                let _ = classes.remove_2(LOADED_CLASS, FAILED_CLASS);
            }
        }
        Ok(())
    }

    fn set_offset(&mut self, offset: ScrollOffset) {
        let _ = self
            .layer
            .style()
            .set_property("transform", &container_transform(offset));
    }

    fn begin_loading(&mut self, cells: &[CellCoordinate]) -> Result<()> {
        for cell in cells {
            if let Some(node) = self.tiles.get(cell) {
                node.img.set_src(&node.src);
            }
        }
        Ok(())
    }

    fn show_load_state(&mut self, cell: CellCoordinate, state: LoadState) {
        let Some(node) = self.tiles.get(&cell) else {
            return;
        };
        let classes = node.wrapper.class_list();
        let _ = match state {
            LoadState::Loaded => classes.add_1(LOADED_CLASS),
            LoadState::Failed => classes.add_1(FAILED_CLASS),
            LoadState::Pending | LoadState::Loading => classes.remove_2(LOADED_CLASS, FAILED_CLASS),
        };
    }

    fn clear(&mut self) {
        for (_, node) in self.tiles.drain() {
            detach(&node, self.image_handlers.as_ref());
        }
    }
}

/// Cell encoded on a tile image by [`DomSurface`].
pub fn cell_from_image(img: &web_sys::Element) -> Option<CellCoordinate> {
    let row = img.get_attribute(ROW_ATTR)?.parse().ok()?;
    let col = img.get_attribute(COL_ATTR)?.parse().ok()?;
    Some(CellCoordinate::new(row, col))
}

fn create_div(document: &Document) -> Result<HtmlDivElement> {
    document
        .create_element("div")
        .map_err(dom_err("create div"))?
        .dyn_into::<HtmlDivElement>()
        .map_err(|_| PhotoGridError::Dom("div is not an HtmlDivElement".to_string()))
}

fn detach(node: &TileNode, handlers: Option<&(Function, Function)>) {
    if let Some((on_load, on_error)) = handlers {
        let _ = node
            .img
            .remove_event_listener_with_callback("load", on_load);
        let _ = node
            .img
            .remove_event_listener_with_callback("error", on_error);
    }
    node.wrapper.remove();
}

fn place(element: &HtmlDivElement, rect: &TileRect) {
    let style = element.style();
    let _ = style.set_property("left", &format!("{}px", rect.left));
    let _ = style.set_property("top", &format!("{}px", rect.top));
    let _ = style.set_property("width", &format!("{}px", rect.width));
    let _ = style.set_property("height", &format!("{}px", rect.height));
}
