// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config port shared by lab front-ends (CLI, viewers).

use tracing::warn;

use crate::config::{ConfigService, ConfigStore};
use crate::settings::{LabConfig, LAB_CONFIG_KEY};

/// Config-facing port for loading/saving the lab configuration.
pub trait ConfigPort {
    /// Load the lab config, sanitized (returns None if missing or unreadable).
    fn load_lab(&self) -> Option<LabConfig>;
    /// Persist the lab config (best-effort; failures are logged).
    fn save_lab(&self, config: &LabConfig);
}

impl<S> ConfigPort for ConfigService<S>
where
    S: ConfigStore,
{
    fn load_lab(&self) -> Option<LabConfig> {
        match self.load::<LabConfig>(LAB_CONFIG_KEY) {
            Ok(cfg) => cfg.map(|raw| {
                let clean = raw.clone().sanitized();
                if clean != raw {
                    warn!("lab config had out-of-range values; repaired");
                }
                clean
            }),
            Err(err) => {
                warn!(%err, "failed to load lab config; using defaults");
                None
            }
        }
    }

    fn save_lab(&self, config: &LabConfig) {
        if let Err(err) = self.save(LAB_CONFIG_KEY, config) {
            warn!(%err, "failed to save lab config");
        }
    }
}
