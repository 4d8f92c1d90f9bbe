//! Component lifecycle
//!
//! A UI binding (custom element, native widget, test harness) drives the
//! grid through these hooks instead of browser callbacks.

use crate::grid::{DataGrid, GridMode};
use crate::row::DEFAULT_ROW_KEY;

/// Lifecycle hooks of a mountable component
pub trait Component {
    /// The component was attached to its host
    fn on_mount(&mut self);

    /// An observed attribute changed. `None` means absent.
    fn on_attribute_change(&mut self, name: &str, old_value: Option<&str>, new_value: Option<&str>);

    /// The component was detached; listeners must be released
    fn on_unmount(&mut self);

    /// Attributes reported through [`Component::on_attribute_change`]
    fn observed_attributes() -> &'static [&'static str]
    where
        Self: Sized;
}

impl Component for DataGrid {
    fn on_mount(&mut self) {
        tracing::debug!("grid mounted");
        self.mount();
    }

    fn on_attribute_change(&mut self, name: &str, old_value: Option<&str>, new_value: Option<&str>) {
        if old_value == new_value {
            return;
        }
        match name {
            "mode" => {
                let mode = new_value
                    .and_then(|v| match v.parse::<GridMode>() {
                        Ok(mode) => Some(mode),
                        Err(e) => {
                            tracing::warn!("{}", e);
                            None
                        }
                    })
                    .unwrap_or_default();
                self.set_mode(mode);
            }
            "row-key" => {
                let field = new_value.filter(|v| !v.is_empty()).unwrap_or(DEFAULT_ROW_KEY);
                self.set_row_key_field(field);
            }
            // Boolean attribute: present means on
            "selectable" => self.set_selectable(new_value.is_some_and(|v| v != "false")),
            other => tracing::trace!(attribute = other, "ignored attribute"),
        }
    }

    fn on_unmount(&mut self) {
        tracing::debug!("grid unmounted");
        self.unmount();
    }

    fn observed_attributes() -> &'static [&'static str] {
        &["mode", "row-key", "selectable"]
    }
}
