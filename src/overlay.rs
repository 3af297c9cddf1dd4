use opx_core::animators::text::{PanelAlign, PanelSpec, TextFrame};
use opx_core::animators::{BackdropStyle, PanelStyle};
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::{
    BACKDROP_ID, BACKDROP_MAX_BLUR_PX, CONTENT_ID, PANEL_MAX_BLUR_PX, SCROLL_LENGTH_VH,
};

/// DOM elements driven by the text animator.
pub struct Overlay {
    panels: Vec<web::HtmlElement>,
    backdrop: Option<web::HtmlElement>,
}

fn create(document: &web::Document, tag: &str) -> anyhow::Result<web::HtmlElement> {
    document
        .create_element(tag)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

fn append(parent: &web::Node, child: &web::Node) -> anyhow::Result<()> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

fn build_panel(document: &web::Document, spec: &PanelSpec) -> anyhow::Result<web::HtmlElement> {
    let section = create(document, "section")?;
    section.set_class_name(match spec.align {
        PanelAlign::Left => "panel panel-left",
        PanelAlign::Right => "panel panel-right",
    });
    let heading = create(document, "h2")?;
    for (i, line) in spec.heading.iter().enumerate() {
        if i > 0 {
            append(&heading, &create(document, "br")?)?;
        }
        append(&heading, &document.create_text_node(line))?;
    }
    append(&section, &heading)?;
    let body = create(document, "p")?;
    body.set_text_content(Some(spec.body));
    append(&section, &body)?;
    if !spec.image.is_empty() {
        let img = create(document, "img")?;
        _ = img.set_attribute("src", spec.image);
        _ = img.set_attribute("alt", "");
        append(&section, &img)?;
    }
    let style = section.style();
    _ = style.set_property("position", "fixed");
    _ = style.set_property("top", "50%");
    _ = style.set_property("will-change", "transform, opacity");
    _ = style.set_property(
        match spec.align {
            PanelAlign::Left => "left",
            PanelAlign::Right => "right",
        },
        "6vw",
    );
    apply_panel(&section, &PanelStyle::HIDDEN);
    Ok(section)
}

impl Overlay {
    /// Create one panel per spec under the scroll container (made if the page
    /// lacks one), plus the backdrop layer.
    pub fn build(document: &web::Document, specs: &[PanelSpec]) -> anyhow::Result<Self> {
        let body = document
            .body()
            .ok_or_else(|| anyhow::anyhow!("document has no body"))?;
        let content = match document.get_element_by_id(CONTENT_ID) {
            Some(el) => el
                .dyn_into::<web::HtmlElement>()
                .map_err(|e| anyhow::anyhow!("{:?}", e))?,
            None => {
                let el = create(document, "div")?;
                el.set_id(CONTENT_ID);
                append(&body, &el)?;
                el
            }
        };
        _ = content
            .style()
            .set_property("height", &format!("{SCROLL_LENGTH_VH}vh"));

        let backdrop = match document.get_element_by_id(BACKDROP_ID) {
            Some(el) => el.dyn_into::<web::HtmlElement>().ok(),
            None => {
                let el = create(document, "div")?;
                el.set_id(BACKDROP_ID);
                let style = el.style();
                _ = style.set_property("position", "fixed");
                _ = style.set_property("inset", "0");
                _ = style.set_property("pointer-events", "none");
                append(&content, &el)?;
                Some(el)
            }
        };
        if let Some(el) = &backdrop {
            apply_backdrop(el, &BackdropStyle::default());
        }

        let panels = specs
            .iter()
            .map(|spec| -> anyhow::Result<web::HtmlElement> {
                let panel = build_panel(document, spec)?;
                append(&content, &panel)?;
                Ok(panel)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { panels, backdrop })
    }

    pub fn apply(&self, frame: &TextFrame) {
        for (el, style) in self.panels.iter().zip(&frame.panels) {
            apply_panel(el, style);
        }
        if let Some(el) = &self.backdrop {
            apply_backdrop(el, &frame.backdrop);
        }
    }
}

fn apply_panel(el: &web::HtmlElement, s: &PanelStyle) {
    let css = el.style();
    if !s.visible() {
        _ = css.set_property("visibility", "hidden");
        _ = css.set_property("opacity", "0");
        return;
    }
    _ = css.set_property("visibility", "visible");
    _ = css.set_property("opacity", &format!("{:.4}", s.opacity));
    _ = css.set_property(
        "transform",
        &format!(
            "translate3d({:.2}px, calc(-50% + {:.2}px), 0) scale({:.4}) rotate({:.3}deg)",
            s.translate_px.x,
            s.translate_px.y,
            s.scale,
            s.roll.to_degrees()
        ),
    );
    let blur = s.blur_px.clamp(0.0, PANEL_MAX_BLUR_PX);
    _ = css.set_property("filter", &format!("blur({blur:.2}px)"));
}

fn apply_backdrop(el: &web::HtmlElement, s: &BackdropStyle) {
    let css = el.style();
    _ = css.set_property("opacity", &format!("{:.4}", s.opacity));
    let blur = (s.displacement * BACKDROP_MAX_BLUR_PX).clamp(0.0, BACKDROP_MAX_BLUR_PX);
    _ = css.set_property("backdrop-filter", &format!("blur({blur:.2}px)"));
}
