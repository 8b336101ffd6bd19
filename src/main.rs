//! Curve Tilt entry point
//!
//! On the web: wires the canvas, display refresh, device tilt and pointer
//! drag to a curve model. Natively: runs a scripted headless session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, PointerEvent};

    use curve_tilt::input::bind_orientation;
    use curve_tilt::platform::{AnimationFrameClock, DeviceOrientationSource, OrientationSource};
    use curve_tilt::render::{CanvasPainter, FrameGeometry};
    use curve_tilt::{CurveModel, Settings};

    fn to_js(e: curve_tilt::Error) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// Optional `<script id="curve-settings" type="application/json">` block
    fn read_settings(document: &web_sys::Document) -> Settings {
        let json = document
            .get_element_by_id("curve-settings")
            .and_then(|el| el.text_content());
        Settings::from_json_or_default(json.as_deref())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| e.to_string())?;

        log::info!("Curve Tilt starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let settings = read_settings(&document);
        let painter = Rc::new(CanvasPainter::new(canvas.clone()).map_err(to_js)?);
        painter.resize(window.device_pixel_ratio());

        let model = Rc::new(RefCell::new(CurveModel::with_physics(
            Box::new(AnimationFrameClock::new()),
            settings.physics,
        )));
        {
            let (w, h) = painter.logical_size();
            model.borrow_mut().set_size(w, h);
        }

        // Redraw on every frame-ready notification
        {
            let painter = Rc::clone(&painter);
            let render = settings.render;
            model
                .borrow_mut()
                .subscribe(move |snapshot| {
                    painter.paint(&FrameGeometry::build(snapshot, &render));
                })
                .detach();
        }

        // Resize
        {
            let model = Rc::clone(&model);
            let painter = Rc::clone(&painter);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(window) = web_sys::window() {
                    painter.resize(window.device_pixel_ratio());
                }
                let (w, h) = painter.logical_size();
                model.borrow_mut().set_size(w, h);
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        setup_drag(&canvas, &model, &settings);

        // Device tilt
        let mut orientation = DeviceOrientationSource::new();
        match bind_orientation(&mut orientation, &model, settings.tilt) {
            Ok(()) => log::info!("Listening for device orientation"),
            Err(e) => log::warn!("No device orientation: {}", e),
        }

        // Stop everything when the page goes away
        {
            let model = Rc::clone(&model);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                orientation.stop();
                model.borrow_mut().stop();
                log::info!("Stopped (page hidden)");
            });
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        model.borrow_mut().start().map_err(to_js)?;
        log::info!("Curve Tilt running!");
        Ok(())
    }

    /// Dragging on the canvas overrides the tilt targets while the pointer is down
    fn setup_drag(canvas: &HtmlCanvasElement, model: &Rc<RefCell<CurveModel>>, settings: &Settings) {
        let pressed = Rc::new(Cell::new(false));
        let drag = settings.drag;

        let handler = {
            let model = Rc::clone(model);
            let pressed = Rc::clone(&pressed);
            move |event: PointerEvent, down: Option<bool>| {
                if let Some(down) = down {
                    pressed.set(down);
                }
                if !pressed.get() {
                    return;
                }
                let location = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                drag.apply(location, &mut model.borrow_mut());
            }
        };

        for (name, down) in [
            ("pointerdown", Some(true)),
            ("pointermove", None),
            ("pointerup", Some(false)),
            ("pointercancel", Some(false)),
        ] {
            let handler = handler.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                handler(event, down);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    web_app::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use curve_tilt::Settings;
    use curve_tilt::curve::CurveModel;
    use curve_tilt::input::bind_orientation;
    use curve_tilt::platform::{HeadlessClock, Orientation, ScriptedOrientation};
    use std::cell::RefCell;
    use std::rc::Rc;

    env_logger::init();
    log::info!("Curve Tilt (native) starting...");
    log::info!("Native mode runs a scripted tilt session - build for wasm32 for the interactive version");

    let settings = Settings::default();

    let clock = HeadlessClock::new();
    let model = Rc::new(RefCell::new(CurveModel::with_physics(
        Box::new(clock.clone()),
        settings.physics,
    )));
    model.borrow_mut().set_size(1000.0, 500.0);

    let mut tilt = ScriptedOrientation::new();
    if let Err(e) = bind_orientation(&mut tilt, &model, settings.tilt) {
        log::error!("Could not bind orientation: {}", e);
        return;
    }

    if let Err(e) = model.borrow_mut().start() {
        log::error!("Could not start frame driver: {}", e);
        return;
    }

    // Tilt right and forward, hold, then level out
    let script = [
        (Orientation::new(0.2, 0.3, 0.0), 3),
        (Orientation::new(0.0, 0.0, 0.0), 3),
    ];
    for (sample, seconds) in script {
        tilt.push(sample);
        for second in 0..seconds {
            clock.run_frames(60, 60.0);
            let c = model.borrow().control_points();
            println!(
                "tilt roll={:+.2} pitch={:+.2} t+{}s  P1=({:7.2}, {:7.2})  P2=({:7.2}, {:7.2})",
                sample.roll,
                sample.pitch,
                second + 1,
                c.p1.x,
                c.p1.y,
                c.p2.x,
                c.p2.y
            );
        }
    }

    model.borrow_mut().stop();
    log::info!("Delivered {} ticks", clock.ticks());
}
