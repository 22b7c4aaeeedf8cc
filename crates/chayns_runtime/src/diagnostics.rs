//! Dual-channel logging: a console trace for developers plus the structured entry for the host
//! logger.

use chayns_host::{HostServices, LogEntry};
use leptos::logging;

fn describe(entry: &LogEntry) -> String {
    let mut line = String::new();
    if let Some(section) = &entry.section {
        line.push_str(&format!("[{section}] "));
    }
    line.push_str(&entry.message);
    if let Some(location_id) = entry.location_id {
        line.push_str(&format!(" locationId={location_id}"));
    }
    if let Some(custom_number) = entry.custom_number {
        line.push_str(&format!(" customNumber={custom_number}"));
    }
    if let Some(ex) = &entry.ex {
        line.push_str(&format!(": {}", ex.message));
    }
    line
}

pub(crate) fn info(services: &HostServices, entry: LogEntry) {
    logging::log!("{}", describe(&entry));
    services.logger.info(entry);
}

pub(crate) fn warning(services: &HostServices, entry: LogEntry) {
    logging::warn!("{}", describe(&entry));
    services.logger.warning(entry);
}

pub(crate) fn error(services: &HostServices, entry: LogEntry) {
    logging::error!("{}", describe(&entry));
    services.logger.error(entry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_context_in_one_line() {
        let entry = LogEntry::new("Load location failed.")
            .location_id(1214)
            .source("bootstrap", "loadLocation")
            .exception("offline");
        assert_eq!(
            describe(&entry),
            "[loadLocation] Load location failed. locationId=1214: offline"
        );
    }
}
