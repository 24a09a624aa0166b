use crate::util::Timer;
use js_sys::{Function, Promise};
use std::time::Duration;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// Sleeps using window.setTimeout
#[derive(Copy, Clone, Debug, Default)]
pub struct JsTimer;

impl Timer for JsTimer {
    async fn sleep(&self, duration: Duration) {
        let millis = duration.as_millis().min(i32::MAX as u128) as i32;
        let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
            let scheduled = web_sys::window()
                .map(|window| window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis).is_ok())
                .unwrap_or(false);
            if !scheduled {
                // no timers available, resolve right away instead of never
                let _ = resolve.call0(&JsValue::NULL);
            }
        });

        let _ = JsFuture::from(promise).await;
    }
}
