use js_sys::{Object, Reflect, JSON};
use mascot_core::{MascotConfig, MascotError, ThemeProvider};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

const CANVAS_ID_KEY: &str = "canvasId";

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Best-effort message for a thrown JS value.
pub fn describe(err: &JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// Parse a JS config object. `canvasId` may hold the canvas element itself
/// instead of an id, in which case the element is returned alongside.
pub fn parse_config(
    value: &JsValue,
) -> Result<(MascotConfig, Option<web::HtmlCanvasElement>), MascotError> {
    if value.is_undefined() || value.is_null() {
        return Ok((MascotConfig::default(), None));
    }
    if !value.is_object() {
        return Err(MascotError::Config("expected an object".into()));
    }
    let key = JsValue::from_str(CANVAS_ID_KEY);
    let element = Reflect::get(value, &key)
        .ok()
        .and_then(|v| v.dyn_into::<web::HtmlCanvasElement>().ok());

    let plain = Object::assign(&Object::new(), value.unchecked_ref());
    if element.is_some() {
        _ = Reflect::delete_property(&plain, &key);
    }
    let json = JSON::stringify(&plain).map_err(|e| MascotError::Config(describe(&e)))?;
    let config = MascotConfig::from_json(&String::from(json))?;
    Ok((config, element))
}

pub fn find_canvas(canvas_id: &str) -> Result<web::HtmlCanvasElement, MascotError> {
    window_document()
        .and_then(|d| d.get_element_by_id(canvas_id))
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
        .ok_or_else(|| MascotError::CanvasNotFound(canvas_id.to_string()))
}

/// Theme values from the computed style of `document.body`.
pub struct CssTheme {
    style: Option<web::CssStyleDeclaration>,
}

impl CssTheme {
    pub fn from_body() -> Self {
        let style = web::window().and_then(|w| {
            let body = w.document()?.body()?;
            w.get_computed_style(&body).ok().flatten()
        });
        if style.is_none() {
            log::debug!("[theme] no computed style for body; using defaults");
        }
        Self { style }
    }
}

impl ThemeProvider for CssTheme {
    fn lookup(&self, property: &str) -> Option<String> {
        self.style.as_ref()?.get_property_value(property).ok()
    }
}
