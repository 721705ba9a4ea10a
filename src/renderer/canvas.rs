//! Canvas 2D painter

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scene::DrawCmd;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Paint a frame's draw list
pub fn paint(ctx: &CanvasRenderingContext2d, commands: &[DrawCmd]) {
    ctx.clear_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);

    for command in commands {
        match command {
            DrawCmd::FillRect { rect, color, glow } => {
                if let Some(glow) = glow {
                    ctx.set_shadow_blur(glow.blur as f64);
                    ctx.set_shadow_color(glow.color);
                }
                ctx.set_fill_style_str(color);
                ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                if glow.is_some() {
                    ctx.set_shadow_blur(0.0);
                }
            }
            DrawCmd::DashedLine {
                x,
                dash,
                gap,
                offset,
                width,
                color,
            } => {
                let pattern = js_sys::Array::of2(
                    &JsValue::from_f64(*dash as f64),
                    &JsValue::from_f64(*gap as f64),
                );
                if let Err(e) = ctx.set_line_dash(&pattern) {
                    log::warn!("setLineDash failed: {e:?}");
                }
                ctx.set_line_dash_offset(*offset as f64);
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(*width as f64);
                ctx.begin_path();
                ctx.move_to(*x as f64, 0.0);
                ctx.line_to(*x as f64, CANVAS_HEIGHT as f64);
                ctx.stroke();
            }
        }
    }

    let _ = ctx.set_line_dash(&js_sys::Array::new());
}
