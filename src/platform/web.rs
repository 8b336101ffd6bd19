//! Browser platform: `requestAnimationFrame` clock and `deviceorientation` source

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{DeviceOrientationEvent, Window};

use super::{FrameClock, Orientation, OrientationHandler, OrientationSource, TickHandler};
use crate::error::{Error, Result};

type FrameSlot = RefCell<Option<Closure<dyn FnMut(f64)>>>;
type FrameCallback = Rc<FrameSlot>;

struct FrameLoop {
    /// Taken out while running so the handler may stop the clock
    handler: Option<TickHandler>,
    request_id: Option<i32>,
    cancelled: bool,
}

/// Frame clock backed by the browser's display refresh
#[derive(Default)]
pub struct AnimationFrameClock {
    frame_loop: Option<Rc<RefCell<FrameLoop>>>,
    callback: Option<FrameCallback>,
}

impl AnimationFrameClock {
    pub fn new() -> Self {
        Self::default()
    }
}

fn request_frame(window: &Window, callback: &Weak<FrameSlot>) -> Option<i32> {
    let callback = callback.upgrade()?;
    let callback = callback.borrow();
    let closure = callback.as_ref()?;
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(e) => {
            log::warn!("requestAnimationFrame failed: {:?}", e);
            None
        }
    }
}

impl FrameClock for AnimationFrameClock {
    fn start(&mut self, handler: TickHandler) -> Result<()> {
        let window =
            web_sys::window().ok_or_else(|| Error::ClockUnavailable("no window".into()))?;
        self.stop();

        let frame_loop = Rc::new(RefCell::new(FrameLoop {
            handler: Some(handler),
            request_id: None,
            cancelled: false,
        }));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let weak_loop = Rc::downgrade(&frame_loop);
        let weak_callback = Rc::downgrade(&callback);
        let tick_window = window.clone();
        *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |time_ms: f64| {
            let Some(frame_loop) = weak_loop.upgrade() else {
                return;
            };
            let handler = {
                let mut l = frame_loop.borrow_mut();
                l.request_id = None;
                l.handler.take()
            };
            let Some(mut handler) = handler else {
                return;
            };

            handler(time_ms / 1000.0);

            let mut l = frame_loop.borrow_mut();
            if l.cancelled {
                return;
            }
            l.handler = Some(handler);
            l.request_id = request_frame(&tick_window, &weak_callback);
        }));

        let first = request_frame(&window, &Rc::downgrade(&callback))
            .ok_or_else(|| Error::ClockUnavailable("requestAnimationFrame rejected".into()))?;
        frame_loop.borrow_mut().request_id = Some(first);

        self.frame_loop = Some(frame_loop);
        self.callback = Some(callback);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(frame_loop) = self.frame_loop.take() {
            let mut l = frame_loop.borrow_mut();
            l.cancelled = true;
            if let (Some(id), Some(window)) = (l.request_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
        }
        self.callback = None;
    }
}

impl Drop for AnimationFrameClock {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Orientation source backed by `deviceorientation` events
///
/// `beta` maps to pitch, `gamma` to roll and `alpha` to yaw. The browser
/// reports degrees; samples are delivered in radians.
#[derive(Default)]
pub struct DeviceOrientationSource {
    listeners: Vec<Closure<dyn FnMut(DeviceOrientationEvent)>>,
}

impl DeviceOrientationSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrientationSource for DeviceOrientationSource {
    fn subscribe(&mut self, mut handler: OrientationHandler) -> Result<()> {
        let window =
            web_sys::window().ok_or_else(|| Error::OrientationUnavailable("no window".into()))?;

        let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceOrientationEvent| {
            let deg = |v: Option<f64>| v.unwrap_or(0.0).to_radians() as f32;
            handler(Orientation {
                pitch: deg(event.beta()),
                roll: deg(event.gamma()),
                yaw: deg(event.alpha()),
            });
        });
        window
            .add_event_listener_with_callback("deviceorientation", closure.as_ref().unchecked_ref())
            .map_err(|e| Error::OrientationUnavailable(format!("{:?}", e)))?;

        self.listeners.push(closure);
        Ok(())
    }

    fn stop(&mut self) {
        let Some(window) = web_sys::window() else {
            self.listeners.clear();
            return;
        };
        for closure in self.listeners.drain(..) {
            let _ = window.remove_event_listener_with_callback(
                "deviceorientation",
                closure.as_ref().unchecked_ref(),
            );
        }
    }
}

impl Drop for DeviceOrientationSource {
    fn drop(&mut self) {
        self.stop();
    }
}
