use std::time::Duration;

/// Wall clock time, in milliseconds since the unix epoch.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

///
/// Something that can wait. Retrieval uses this between attempts, so that the browser can plug in
/// setTimeout and tests can record the delays instead of actually sleeping.
///
#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

impl<T: Timer + ?Sized> Timer for &T {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }
}
