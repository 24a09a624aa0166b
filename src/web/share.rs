use crate::connections::share::{ShareBackend, ShareErr};
use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use super::describe_js_err;

///
/// navigator.share and navigator.clipboard.
///
/// Both are looked up dynamically through Reflect, since neither exists in every browser (and
/// clipboard is only there in secure contexts).
///
#[derive(Clone, Debug)]
pub struct NavigatorShare {
    navigator: web_sys::Navigator,
}

impl NavigatorShare {
    pub fn open() -> Option<Self> {
        Some(Self {
            navigator: web_sys::window()?.navigator(),
        })
    }

    fn method(target: &JsValue, name: &str) -> Option<Function> {
        Reflect::get(target, &JsValue::from_str(name)).ok()?.dyn_into::<Function>().ok()
    }

    fn clipboard(&self) -> Option<JsValue> {
        Reflect::get(&self.navigator, &JsValue::from_str("clipboard"))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
    }

    fn share_data(text: &str) -> JsValue {
        let data = Object::new();
        let _ = Reflect::set(&data, &JsValue::from_str("text"), &JsValue::from_str(text));
        data.into()
    }
}

/// Calls a promise returning method and waits for it
async fn call_promise(target: &JsValue, method: &Function, arg: &JsValue) -> Result<(), ShareErr> {
    let promise = method
        .call1(target, arg)
        .map_err(|err| ShareErr::Rejected(describe_js_err(&err)))?
        .dyn_into::<Promise>()
        .map_err(|_| ShareErr::Unavailable)?;

    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|err| ShareErr::Rejected(describe_js_err(&err)))
}

impl ShareBackend for NavigatorShare {
    fn user_agent(&self) -> Option<String> {
        self.navigator.user_agent().ok()
    }

    fn can_share(&self, text: &str) -> bool {
        if Self::method(&self.navigator, "share").is_none() {
            return false;
        }

        // older browsers have share without canShare, in which case we just try
        match Self::method(&self.navigator, "canShare") {
            Some(can_share) => can_share
                .call1(&self.navigator, &Self::share_data(text))
                .ok()
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            None => true,
        }
    }

    async fn share(&self, text: &str) -> Result<(), ShareErr> {
        let share = Self::method(&self.navigator, "share").ok_or(ShareErr::Unavailable)?;
        call_promise(&self.navigator, &share, &Self::share_data(text)).await
    }

    fn has_clipboard(&self) -> bool {
        self.clipboard()
            .map(|clipboard| Self::method(&clipboard, "writeText").is_some())
            .unwrap_or(false)
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), ShareErr> {
        let clipboard = self.clipboard().ok_or(ShareErr::Unavailable)?;
        let write_text = Self::method(&clipboard, "writeText").ok_or(ShareErr::Unavailable)?;
        call_promise(&clipboard, &write_text, &JsValue::from_str(text)).await
    }
}
