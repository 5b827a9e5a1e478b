use leptos::*;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{CanvasRenderingContext2d, MouseEvent, TouchEvent, WheelEvent};

use crate::models::{LineInfo, LineTopology, TrainMarker};
use crate::viewport::{MapViewport, ViewRect};

// Drawing constants for the line map canvas
const BACKGROUND_COLOR: &str = "#0b1118";
const TRACK_WIDTH: f64 = 6.0;
const TRACK_ALPHA: f64 = 0.6;
const STATION_RADIUS: f64 = 5.0;
const STATION_FILL: &str = "#1f2937";
const STATION_OUTLINE_WIDTH: f64 = 2.5;
const LABEL_COLOR: &str = "#d1d5db";
const LABEL_FONT: &str = "10px sans-serif";
const MARKER_RADIUS: f64 = 7.0;
const MARKER_OUTLINE_COLOR: &str = "#ffffff";
const MARKER_OUTLINE_WIDTH: f64 = 1.5;
const EXPRESS_OUTLINE_COLOR: &str = "#ef4444";
const EXPRESS_OUTLINE_WIDTH: f64 = 2.5;
const EXPRESS_LABEL_FONT: &str = "bold 9px sans-serif";
const LAST_RUN_RING_COLOR: &str = "#fbbf24";
const SELECTION_RING_COLOR: &str = "#ffffff";
const MARKER_HIT_RADIUS: f64 = 14.0;

#[component]
#[must_use]
pub fn MapCanvas(
    topology: Memo<Option<LineTopology>>,
    markers: Memo<Vec<TrainMarker>>,
    line: Memo<LineInfo>,
    compact: Signal<bool>,
    selected_train: ReadSignal<Option<TrainMarker>>,
    set_selected_train: WriteSignal<Option<TrainMarker>>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<leptos::html::Canvas>();
    let (viewport, set_viewport) = create_signal(MapViewport::default());

    // Reframe whenever the active line changes; every bit of pan/zoom
    // state from the previous line is discarded here.
    create_effect(move |_| {
        if let Some(topology) = topology.get() {
            let compact_now = compact.get_untracked();
            set_viewport.update(|vp| vp.load_line(&topology, compact_now));
        }
    });

    setup_render_effect(canvas_ref, topology, markers, line, viewport, selected_train);

    let handle_mouse_down = move |ev: MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        if let Some((x, y, _, _)) = surface_position(canvas_ref, f64::from(ev.client_x()), f64::from(ev.client_y())) {
            set_viewport.update(|vp| vp.begin_pan(x, y));
        }
    };

    let handle_mouse_move = move |ev: MouseEvent| {
        if !viewport.with_untracked(MapViewport::is_panning) {
            return;
        }
        if let Some((x, y, w, h)) = surface_position(canvas_ref, f64::from(ev.client_x()), f64::from(ev.client_y())) {
            set_viewport.update(|vp| vp.pan_to(x, y, w, h));
        }
    };

    let handle_mouse_up = move |_ev: MouseEvent| {
        if viewport.with_untracked(MapViewport::is_panning) {
            set_viewport.update(MapViewport::end_pan);
        }
    };

    let handle_wheel = move |ev: WheelEvent| {
        ev.prevent_default();
        if let Some((x, y, w, h)) = surface_position(canvas_ref, f64::from(ev.client_x()), f64::from(ev.client_y())) {
            set_viewport.update(|vp| vp.wheel_zoom(x, y, ev.delta_y(), w, h));
        }
    };

    let handle_touch_start = move |ev: TouchEvent| {
        let touches = ev.touches();
        if touches.length() == 1 {
            if let Some(touch) = touches.get(0) {
                if let Some((x, y, _, _)) = surface_position(
                    canvas_ref,
                    f64::from(touch.client_x()),
                    f64::from(touch.client_y()),
                ) {
                    set_viewport.update(|vp| vp.begin_pan(x, y));
                }
            }
        } else if touches.length() == 2 {
            if let (Some(t0), Some(t1)) = (touches.get(0), touches.get(1)) {
                let distance = pinch_distance(&t0, &t1);
                set_viewport.update(|vp| {
                    vp.end_pan();
                    vp.pinch_begin(distance);
                });
            }
        }
    };

    let handle_touch_move = move |ev: TouchEvent| {
        let touches = ev.touches();
        if touches.length() == 2 {
            ev.prevent_default();
            if let (Some(t0), Some(t1)) = (touches.get(0), touches.get(1)) {
                let distance = pinch_distance(&t0, &t1);
                set_viewport.update(|vp| vp.pinch_move(distance));
            }
        } else if touches.length() == 1 && viewport.with_untracked(MapViewport::is_panning) {
            if let Some(touch) = touches.get(0) {
                if let Some((x, y, w, h)) = surface_position(
                    canvas_ref,
                    f64::from(touch.client_x()),
                    f64::from(touch.client_y()),
                ) {
                    set_viewport.update(|vp| vp.pan_to(x, y, w, h));
                }
            }
        }
    };

    let handle_touch_end = move |ev: TouchEvent| {
        let remaining = ev.touches().length();
        set_viewport.update(|vp| {
            if remaining < 2 {
                vp.pinch_end();
            }
            if remaining == 0 {
                vp.end_pan();
            }
        });
    };

    // A click that follows a drag is filtered out by the tap-slop check;
    // a real tap selects the marker under the pointer or, on empty track,
    // toggles the zoom level.
    let handle_click = move |ev: MouseEvent| {
        let Some((x, y, w, h)) = surface_position(canvas_ref, f64::from(ev.client_x()), f64::from(ev.client_y())) else {
            return;
        };
        if !viewport.with_untracked(MapViewport::was_tap) {
            return;
        }
        let hit = viewport.with_untracked(|vp| {
            markers.with_untracked(|all| marker_at(all, vp.rect(), x, y, w, h))
        });
        match hit {
            Some(marker) => set_selected_train.update(|selected| {
                *selected = match selected.take() {
                    Some(previous) if previous.train_no == marker.train_no => None,
                    _ => Some(marker),
                };
            }),
            None => set_viewport.update(|vp| vp.tap_toggle_zoom(x, y, w, h)),
        }
    };

    view! {
        <div class="canvas-container">
            <canvas
                node_ref=canvas_ref
                class="map-canvas"
                on:mousedown=handle_mouse_down
                on:mousemove=handle_mouse_move
                on:mouseup=handle_mouse_up
                on:mouseleave=handle_mouse_up
                on:wheel=handle_wheel
                on:click=handle_click
                on:touchstart=handle_touch_start
                on:touchmove=handle_touch_move
                on:touchend=handle_touch_end
                on:touchcancel=handle_touch_end
            ></canvas>
        </div>
    }
}

/// Pointer position relative to the canvas plus the canvas's client size,
/// or `None` before the canvas is mounted.
fn surface_position(
    canvas_ref: NodeRef<leptos::html::Canvas>,
    client_x: f64,
    client_y: f64,
) -> Option<(f64, f64, f64, f64)> {
    let canvas = canvas_ref.get_untracked()?;
    let rect = canvas.get_bounding_client_rect();
    Some((
        client_x - rect.left(),
        client_y - rect.top(),
        rect.width(),
        rect.height(),
    ))
}

fn pinch_distance(t0: &web_sys::Touch, t1: &web_sys::Touch) -> f64 {
    let dx = f64::from(t1.client_x() - t0.client_x());
    let dy = f64::from(t1.client_y() - t0.client_y());
    dx.hypot(dy)
}

/// Nearest marker within the hit radius of a screen point.
fn marker_at(
    markers: &[TrainMarker],
    view: ViewRect,
    x: f64,
    y: f64,
    surface_width: f64,
    surface_height: f64,
) -> Option<TrainMarker> {
    if view.width <= 0.0 || view.height <= 0.0 {
        return None;
    }
    let sx = surface_width / view.width;
    let sy = surface_height / view.height;

    let mut best: Option<(f64, &TrainMarker)> = None;
    for marker in markers {
        let (mx, my) = marker.draw_position();
        let dx = (mx - view.x) * sx - x;
        let dy = (my - view.y) * sy - y;
        let distance = dx.hypot(dy);
        if distance <= MARKER_HIT_RADIUS && best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, marker));
        }
    }
    best.map(|(_, marker)| marker.clone())
}

fn setup_render_effect(
    canvas_ref: NodeRef<leptos::html::Canvas>,
    topology: Memo<Option<LineTopology>>,
    markers: Memo<Vec<TrainMarker>>,
    line: Memo<LineInfo>,
    viewport: ReadSignal<MapViewport>,
    selected_train: ReadSignal<Option<TrainMarker>>,
) {
    let (render_requested, set_render_requested) = create_signal(false);

    create_effect(move |_| {
        // Track all dependencies
        let _ = topology.get();
        let _ = markers.get();
        let _ = line.get();
        let _ = viewport.get();
        let _ = selected_train.get();

        if !render_requested.get_untracked() {
            set_render_requested.set(true);

            let window = web_sys::window().expect("window");
            let callback = Closure::once(move || {
                set_render_requested.set(false);

                let Some(canvas) = canvas_ref.get_untracked() else {
                    return;
                };
                let canvas_elem: &web_sys::HtmlCanvasElement = &canvas;
                // Browser dimensions are always non-negative
                #[allow(clippy::cast_sign_loss)]
                let container_width = canvas_elem.client_width() as u32;
                #[allow(clippy::cast_sign_loss)]
                let container_height = canvas_elem.client_height() as u32;
                if container_width > 0 && container_height > 0 {
                    canvas_elem.set_width(container_width);
                    canvas_elem.set_height(container_height);
                }

                render_map(
                    canvas_elem,
                    topology.get_untracked().as_ref(),
                    &markers.get_untracked(),
                    &line.get_untracked(),
                    viewport.get_untracked().rect(),
                    selected_train.get_untracked().as_ref(),
                );
            });

            let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
            callback.forget();
        }
    });
}

fn render_map(
    canvas: &web_sys::HtmlCanvasElement,
    topology: Option<&LineTopology>,
    markers: &[TrainMarker],
    line: &LineInfo,
    view: ViewRect,
    selected: Option<&TrainMarker>,
) {
    let width = f64::from(canvas.width());
    let height = f64::from(canvas.height());

    let Ok(Some(context)) = canvas.get_context("2d") else {
        leptos::logging::warn!("Failed to get 2D context");
        return;
    };
    let Ok(ctx) = context.dyn_into::<CanvasRenderingContext2d>() else {
        leptos::logging::warn!("Failed to cast to 2D rendering context");
        return;
    };

    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str(BACKGROUND_COLOR);
    ctx.fill_rect(0.0, 0.0, width, height);

    let Some(topology) = topology else {
        return;
    };
    if topology.is_empty() || view.width <= 0.0 || view.height <= 0.0 {
        return;
    }

    let sx = width / view.width;
    let sy = height / view.height;
    let world_stroke = 2.0 / (sx + sy);

    ctx.save();
    let _ = ctx.scale(sx, sy);
    let _ = ctx.translate(-view.x, -view.y);

    draw_track(&ctx, topology, line, TRACK_WIDTH * world_stroke);
    draw_stations(&ctx, topology, line, sx, sy, world_stroke);
    for marker in markers {
        let selected_here =
            selected.is_some_and(|s| s.train_no == marker.train_no);
        draw_train_marker(&ctx, marker, line, sx, sy, selected_here);
    }

    ctx.restore();
}

fn draw_track(
    ctx: &CanvasRenderingContext2d,
    topology: &LineTopology,
    line: &LineInfo,
    stroke_width: f64,
) {
    ctx.begin_path();
    for (i, station) in topology.stations().enumerate() {
        if i == 0 {
            ctx.move_to(station.x, station.y);
        } else {
            ctx.line_to(station.x, station.y);
        }
    }
    if topology.is_circular() {
        ctx.close_path();
    }
    ctx.set_stroke_style_str(&line.color);
    ctx.set_line_width(stroke_width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.set_global_alpha(TRACK_ALPHA);
    ctx.stroke();
    ctx.set_global_alpha(1.0);
}

fn draw_stations(
    ctx: &CanvasRenderingContext2d,
    topology: &LineTopology,
    line: &LineInfo,
    sx: f64,
    sy: f64,
    world_stroke: f64,
) {
    let center_x = topology.centroid().0;
    for (i, station) in topology.stations().enumerate() {
        ctx.begin_path();
        let _ = ctx.arc(
            station.x,
            station.y,
            STATION_RADIUS * world_stroke,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.set_fill_style_str(STATION_FILL);
        ctx.fill();
        ctx.set_stroke_style_str(&line.color);
        ctx.set_line_width(STATION_OUTLINE_WIDTH * world_stroke);
        ctx.stroke();

        // Labels render in screen pixels so zoom never distorts the text.
        let (anchor, dx, dy) = label_layout(topology, i, center_x);
        ctx.save();
        let _ = ctx.translate(station.x, station.y);
        let _ = ctx.scale(1.0 / sx, 1.0 / sy);
        ctx.set_text_align(anchor);
        ctx.set_fill_style_str(LABEL_COLOR);
        ctx.set_font(LABEL_FONT);
        let _ = ctx.fill_text(&station.name, dx, dy);
        ctx.restore();
    }
}

/// Label placement for one station: beside the track on steep segments,
/// above it on flat ones, mirrored across the map's vertical middle so
/// labels point away from the line.
fn label_layout(topology: &LineTopology, index: usize, center_x: f64) -> (&'static str, f64, f64) {
    let last = topology.len().saturating_sub(1);
    let prev = topology.station_at(index.saturating_sub(1));
    let next = topology.station_at((index + 1).min(last));
    let (Some(prev), Some(next), Some(station)) = (prev, next, topology.station_at(index)) else {
        return ("center", 0.0, -12.0);
    };

    let dx = (next.x - prev.x).abs();
    let dy = (next.y - prev.y).abs();
    if dy > dx * 1.5 {
        if station.x > center_x {
            ("left", 14.0, 4.0)
        } else {
            ("right", -14.0, 4.0)
        }
    } else {
        ("center", 0.0, -12.0)
    }
}

fn draw_train_marker(
    ctx: &CanvasRenderingContext2d,
    marker: &TrainMarker,
    line: &LineInfo,
    sx: f64,
    sy: f64,
    selected: bool,
) {
    let (x, y) = marker.draw_position();
    ctx.save();
    let _ = ctx.translate(x, y);
    let _ = ctx.scale(1.0 / sx, 1.0 / sy);

    // Body
    ctx.begin_path();
    let _ = ctx.arc(0.0, 0.0, MARKER_RADIUS, 0.0, std::f64::consts::TAU);
    ctx.set_fill_style_str(&line.color);
    ctx.fill();
    if marker.is_express {
        ctx.set_stroke_style_str(EXPRESS_OUTLINE_COLOR);
        ctx.set_line_width(EXPRESS_OUTLINE_WIDTH);
    } else {
        ctx.set_stroke_style_str(MARKER_OUTLINE_COLOR);
        ctx.set_line_width(MARKER_OUTLINE_WIDTH);
    }
    ctx.stroke();

    if marker.is_last_run {
        ctx.begin_path();
        let _ = ctx.arc(0.0, 0.0, MARKER_RADIUS + 3.0, 0.0, std::f64::consts::TAU);
        ctx.set_stroke_style_str(LAST_RUN_RING_COLOR);
        ctx.set_line_width(1.5);
        ctx.stroke();
    }

    if selected {
        ctx.begin_path();
        let _ = ctx.arc(0.0, 0.0, MARKER_RADIUS + 6.0, 0.0, std::f64::consts::TAU);
        ctx.set_stroke_style_str(SELECTION_RING_COLOR);
        ctx.set_line_width(2.0);
        ctx.stroke();
    }

    if marker.is_express {
        ctx.set_fill_style_str(EXPRESS_OUTLINE_COLOR);
        ctx.set_font(EXPRESS_LABEL_FONT);
        ctx.set_text_align("center");
        let _ = ctx.fill_text("EXP", 0.0, -(MARKER_RADIUS + 4.0));
    }

    // Heading arrow, rotated to the direction of travel
    let _ = ctx.rotate(marker.heading_degrees.to_radians());
    ctx.begin_path();
    ctx.move_to(-3.0, -2.5);
    ctx.line_to(4.0, 0.0);
    ctx.line_to(-3.0, 2.5);
    ctx.close_path();
    ctx.set_fill_style_str(MARKER_OUTLINE_COLOR);
    ctx.fill();

    ctx.restore();
}
