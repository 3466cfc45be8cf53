use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{js_sys, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::Callback;

use super::visibility::{IntersectionNotice, ObservationBackend, RevealPolicy};

pub const STEP_ATTRIBUTE: &str = "data-step";

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Browser `IntersectionObserver` feeding notices into a Yew callback.
/// The observer is disconnected when this is dropped.
pub struct DomObserver {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl DomObserver {
    /// Fails when the platform has no `IntersectionObserver`; callers fall
    /// back to revealing everything.
    pub fn new(policy: &RevealPolicy, on_notices: Callback<Vec<IntersectionNotice>>) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        if !js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver"))? {
            return Err(JsValue::from_str("IntersectionObserver is not supported"));
        }

        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _observer: IntersectionObserver| {
            let notices: Vec<IntersectionNotice> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .filter_map(|entry| notice_from_entry(&entry))
                .collect();
            if !notices.is_empty() {
                on_notices.emit(notices);
            }
        }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_root_margin(&policy.root_margin());
        options.set_threshold(&JsValue::from_f64(policy.threshold));

        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

fn notice_from_entry(entry: &IntersectionObserverEntry) -> Option<IntersectionNotice> {
    let raw = entry.target().get_attribute(STEP_ATTRIBUTE)?;
    let Ok(step) = raw.parse::<usize>() else {
        debug!("Skipping entry with bad {} value {:?}", STEP_ATTRIBUTE, raw);
        return None;
    };
    Some(IntersectionNotice {
        step,
        is_intersecting: entry.is_intersecting(),
        ratio: entry.intersection_ratio(),
    })
}

impl ObservationBackend for DomObserver {
    type Target = Element;

    fn observe(&mut self, target: &Element) {
        self.observer.observe(target);
    }

    fn unobserve(&mut self, target: &Element) {
        self.observer.unobserve(target);
    }

    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

impl Drop for DomObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
