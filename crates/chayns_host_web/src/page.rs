//! Reading the hosting page and publishing runtime state back to it.

use chayns_host::PageContext;
use serde::Serialize;

/// `window` property the runtime info is published under.
pub const RUNTIME_INFO_GLOBAL: &str = "chaynsInfo";

/// Function attached to the published runtime info that returns the global data object.
pub const GLOBAL_DATA_ACCESSOR: &str = "getGlobalData";

/// CSS custom property carrying the location color.
pub const COLOR_CSS_VARIABLE: &str = "--chayns-color";

/// Captures the current page URL, host and referrer.
///
/// Outside the browser this returns an empty context.
pub fn current_page_context() -> PageContext {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return PageContext::default();
        };
        let href = window.location().href().unwrap_or_default();
        let referrer = window
            .document()
            .map(|document| document.referrer())
            .unwrap_or_default();
        PageContext::from_href(href).with_referrer(referrer)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        PageContext::default()
    }
}

/// Assigns `value` as a plain JavaScript object to `window[name]`.
///
/// # Errors
///
/// Returns an error when `value` cannot be serialized or the assignment fails.
pub fn publish_window_value<T: Serialize>(name: &str, value: &T) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsValue;

        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        let js_value = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| format!("serialize {name} failed: {e}"))?;
        js_sys::Reflect::set(&window, &JsValue::from_str(name), &js_value)
            .map_err(|e| format!("publish window.{name} failed: {e:?}"))?;
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        serde_json::to_value(value)
            .map(|_| ())
            .map_err(|e| format!("serialize {name} failed: {e}"))
    }
}

/// Publishes `info` as `window.chaynsInfo`, with a [`GLOBAL_DATA_ACCESSOR`] function returning
/// a fresh copy of `global_data` on every call.
///
/// # Errors
///
/// Returns an error when either value cannot be serialized, `info` is not a JSON object, or the
/// assignment fails.
pub fn publish_runtime_info<T: Serialize, G: Serialize>(
    info: &T,
    global_data: &G,
) -> Result<(), String> {
    let payload = RuntimeInfoPayload::new(info, global_data)?;

    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::{closure::Closure, JsValue};

        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        let info = payload
            .info
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| format!("serialize {RUNTIME_INFO_GLOBAL} failed: {e}"))?;
        let global_data_json = payload.global_data_json;
        let accessor = Closure::<dyn Fn() -> JsValue>::new(move || {
            js_sys::JSON::parse(&global_data_json).unwrap_or(JsValue::NULL)
        });
        js_sys::Reflect::set(
            &info,
            &JsValue::from_str(GLOBAL_DATA_ACCESSOR),
            accessor.as_ref(),
        )
        .map_err(|e| format!("attach {GLOBAL_DATA_ACCESSOR} failed: {e:?}"))?;
        // The page keeps the accessor for as long as the object stays reachable.
        accessor.forget();
        js_sys::Reflect::set(&window, &JsValue::from_str(RUNTIME_INFO_GLOBAL), &info)
            .map_err(|e| format!("publish window.{RUNTIME_INFO_GLOBAL} failed: {e:?}"))?;
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = payload;
        Ok(())
    }
}

/// Serialized halves of the published runtime info.
#[derive(Debug)]
struct RuntimeInfoPayload {
    info: serde_json::Value,
    global_data_json: String,
}

impl RuntimeInfoPayload {
    fn new<T: Serialize, G: Serialize>(info: &T, global_data: &G) -> Result<Self, String> {
        let info = serde_json::to_value(info)
            .map_err(|e| format!("serialize {RUNTIME_INFO_GLOBAL} failed: {e}"))?;
        if !info.is_object() {
            return Err(format!("{RUNTIME_INFO_GLOBAL} must serialize to an object"));
        }
        let global_data_json = serde_json::to_string(global_data)
            .map_err(|e| format!("serialize global data failed: {e}"))?;
        Ok(Self {
            info,
            global_data_json,
        })
    }
}

/// Sets the location color on the document root as [`COLOR_CSS_VARIABLE`].
///
/// # Errors
///
/// Returns an error when the document root is unavailable or rejects the style.
pub fn apply_color_variable(color: &str) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;

        let root = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
            .ok_or_else(|| "document root unavailable".to_string())?;
        root.style()
            .set_property(COLOR_CSS_VARIABLE, color)
            .map_err(|e| format!("set {COLOR_CSS_VARIABLE} failed: {e:?}"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = color;
        Ok(())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn native_page_context_is_empty() {
        assert_eq!(current_page_context(), PageContext::default());
    }

    #[test]
    fn publishing_checks_serializability() {
        assert_eq!(publish_window_value("chaynsDebug", &json!({ "enabled": true })), Ok(()));
        assert_eq!(
            publish_runtime_info(
                &json!({ "LocationID": 1214, "Tapps": [] }),
                &json!({ "AppInfo": { "LocationID": 1214 } })
            ),
            Ok(())
        );
        assert_eq!(apply_color_variable("#6E6E6E"), Ok(()));
    }

    #[test]
    fn runtime_info_payload_carries_info_and_global_data() {
        let payload = RuntimeInfoPayload::new(
            &json!({ "LocationID": 1214, "Tapps": [] }),
            &json!({ "AppUser": { "TobitUserID": 0 }, "AppInfo": { "LocationID": 1214 } }),
        )
        .expect("payload");

        assert_eq!(payload.info, json!({ "LocationID": 1214, "Tapps": [] }));
        let global_data: serde_json::Value =
            serde_json::from_str(&payload.global_data_json).expect("global data json");
        assert_eq!(global_data["AppInfo"]["LocationID"], json!(1214));
        assert_eq!(global_data["AppUser"]["TobitUserID"], json!(0));
    }

    #[test]
    fn runtime_info_must_be_an_object() {
        let err = publish_runtime_info(&json!([1, 2]), &json!({})).expect_err("array info");
        assert!(err.contains(RUNTIME_INFO_GLOBAL));
    }
}
