// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HUD port: text and progress-bar readouts keyed by element id.

/// Minimal readout port for volume displays and fill bars.
///
/// Element ids are fixed strings. Adapters must silently skip ids they do not
/// know about; the lab never checks whether an element exists.
pub trait HudPort {
    /// Replace the text content of `element`.
    fn set_text(&mut self, element: &str, text: &str);

    /// Set the width of the bar `element` as a percentage in `[0, 100]`.
    fn set_bar(&mut self, element: &str, percent: f32);
}

/// Element id of the volume text readout for the vessel labelled `label`.
pub fn volume_element(label: &str) -> String {
    format!("{label}-volume")
}

/// Element id of the fill bar for the vessel labelled `label`.
pub fn progress_element(label: &str) -> String {
    format!("{label}-progress")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_ids_follow_label() {
        assert_eq!(volume_element("beaker"), "beaker-volume");
        assert_eq!(progress_element("flask"), "flask-progress");
    }
}
