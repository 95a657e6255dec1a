// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording HUD with a fixed element registry.

use std::collections::BTreeMap;

use lab_scene_port::HudPort;
use tracing::trace;

/// HUD adapter that stores the latest text and bar value per element.
///
/// Only ids registered at construction exist; writes to anything else are
/// dropped, mirroring a page that lacks the element.
#[derive(Debug, Default, Clone)]
pub struct HeadlessHud {
    texts: BTreeMap<String, String>,
    bars: BTreeMap<String, f32>,
    skipped: usize,
}

impl HeadlessHud {
    /// Create a HUD with the given text elements and bar elements.
    pub fn with_elements<I, J, S, T>(texts: I, bars: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            texts: texts.into_iter().map(|s| (s.into(), String::new())).collect(),
            bars: bars.into_iter().map(|s| (s.into(), 0.0)).collect(),
            skipped: 0,
        }
    }

    /// Latest text of `element`, if the element exists.
    pub fn text(&self, element: &str) -> Option<&str> {
        self.texts.get(element).map(String::as_str)
    }

    /// Latest bar percentage of `element`, if the element exists.
    pub fn bar(&self, element: &str) -> Option<f32> {
        self.bars.get(element).copied()
    }

    /// Number of writes dropped because the element was missing.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl HudPort for HeadlessHud {
    fn set_text(&mut self, element: &str, text: &str) {
        if let Some(slot) = self.texts.get_mut(element) {
            text.clone_into(slot);
        } else {
            trace!(element, "hud text element missing; skipped");
            self.skipped += 1;
        }
    }

    fn set_bar(&mut self, element: &str, percent: f32) {
        if let Some(slot) = self.bars.get_mut(element) {
            *slot = percent.clamp(0.0, 100.0);
        } else {
            trace!(element, "hud bar element missing; skipped");
            self.skipped += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_to_known_elements() {
        let mut hud = HeadlessHud::with_elements(["beaker-volume"], ["beaker-progress"]);
        hud.set_text("beaker-volume", "150 mL");
        hud.set_bar("beaker-progress", 60.0);
        assert_eq!(hud.text("beaker-volume"), Some("150 mL"));
        assert_eq!(hud.bar("beaker-progress"), Some(60.0));
        assert_eq!(hud.skipped(), 0);
    }

    #[test]
    fn missing_elements_are_skipped_silently() {
        let mut hud = HeadlessHud::default();
        hud.set_text("nope", "x");
        hud.set_bar("nope", 10.0);
        assert_eq!(hud.text("nope"), None);
        assert_eq!(hud.skipped(), 2);
    }

    #[test]
    fn bar_is_clamped() {
        let mut hud = HeadlessHud::with_elements(Vec::<String>::new(), ["b"]);
        hud.set_bar("b", 140.0);
        assert_eq!(hud.bar("b"), Some(100.0));
        hud.set_bar("b", -3.0);
        assert_eq!(hud.bar("b"), Some(0.0));
    }
}
