//! Structured log sink writing to the browser console.

use chayns_host::{LogEntry, LogLevel, RuntimeLogger};

#[derive(Debug, Clone, Copy, Default)]
/// Logger printing each entry as a plain object at `console.debug` level.
///
/// Human-readable traces are already printed by the runtime; this sink carries the structured
/// record (location id, file name, section, exception) for inspection in devtools.
pub struct WebConsoleLogger;

fn label(level: LogLevel) -> String {
    format!("[chayns:{}]", level.as_str())
}

impl RuntimeLogger for WebConsoleLogger {
    fn log(&self, level: LogLevel, mut entry: LogEntry) {
        entry.level = level;

        #[cfg(target_arch = "wasm32")]
        {
            use serde::Serialize;
            use wasm_bindgen::JsValue;

            let prefix = JsValue::from_str(&label(level));
            match entry.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
                Ok(record) => web_sys::console::debug_2(&prefix, &record),
                Err(_) => web_sys::console::debug_2(&prefix, &JsValue::from_str(&entry.message)),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Ok(record) = serde_json::to_string(&entry) {
                eprintln!("{} {record}", label(level));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_carries_level() {
        assert_eq!(label(LogLevel::Warning), "[chayns:warning]");
    }

    #[test]
    fn logging_never_panics() {
        WebConsoleLogger.error(
            LogEntry::new("Load Tapps failed.")
                .location_id(1214)
                .exception("offline"),
        );
    }
}
