use glam::DVec2;
use web_sys as web;

/// Client coordinates relative to the canvas's bounding-rect origin, in CSS pixels.
#[inline]
pub fn canvas_local_point(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> DVec2 {
    DVec2::new(client_x - rect_left, client_y - rect_top)
}

// ---------------- Event helpers ----------------
#[inline]
pub fn mouse_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> DVec2 {
    let rect = canvas.get_bounding_client_rect();
    canvas_local_point(ev.client_x() as f64, ev.client_y() as f64, rect.left(), rect.top())
}

/// Position of the first touch point, if the event carries one.
#[inline]
pub fn touch_canvas_px(ev: &web::TouchEvent, canvas: &web::HtmlCanvasElement) -> Option<DVec2> {
    let touch = ev.touches().get(0)?;
    let rect = canvas.get_bounding_client_rect();
    Some(canvas_local_point(
        touch.client_x() as f64,
        touch.client_y() as f64,
        rect.left(),
        rect.top(),
    ))
}

/// Usable device pixel ratio; hosts occasionally report 0.
#[inline]
pub fn effective_dpr(reported: f64) -> f64 {
    if reported.is_finite() && reported > 0.0 {
        reported
    } else {
        1.0
    }
}
