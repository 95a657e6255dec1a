// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-frame volume transfer between vessels.

use lab_app_core::settings::PourConfig;
use tracing::debug;

use crate::container::{Container, ContainerId};
use crate::stream::StreamSim;

/// Outcome of one pour step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PourReport {
    /// Vessel that poured.
    pub source: ContainerId,
    /// Vessel that caught the stream, if any.
    pub target: Option<ContainerId>,
    /// Instantaneous rate, volume per second.
    pub rate: f32,
    /// Volume that left the source this frame.
    pub removed: f32,
    /// Volume credited to the target this frame; the rest is spilled.
    pub credited: f32,
}

/// Selects source/target pairs and moves volume between them.
#[derive(Debug, Clone)]
pub struct PourManager {
    config: PourConfig,
    pouring: bool,
}

impl PourManager {
    /// Creates a manager using `config` for thresholds and efficiency.
    pub fn new(config: PourConfig) -> Self {
        Self {
            config: config.sanitized(),
            pouring: false,
        }
    }

    /// Pour parameters.
    pub fn config(&self) -> &PourConfig {
        &self.config
    }

    /// True if the previous step moved liquid.
    pub fn is_pouring(&self) -> bool {
        self.pouring
    }

    /// Runs one frame of transfer.
    ///
    /// Only the held vessel can pour. Starts or stops `stream` to match.
    pub fn step(
        &mut self,
        dt: f32,
        containers: &mut [Container],
        dragged: Option<ContainerId>,
        stream: &mut StreamSim,
    ) -> Option<PourReport> {
        let source_idx = containers
            .iter()
            .position(|c| Some(c.id) == dragged && c.can_pour(&self.config));
        let Some(source_idx) = source_idx else {
            self.set_pouring(false);
            stream.stop();
            return None;
        };

        let target_idx = find_target(containers, source_idx);
        let rate = containers[source_idx].pour_rate(&self.config);
        let removed = containers[source_idx].drain(rate * dt.max(0.0));
        let credited = match target_idx {
            Some(t) => {
                let before = containers[t].volume();
                containers[t].add_volume(removed * self.config.efficiency);
                containers[t].volume() - before
            }
            None => 0.0,
        };

        let source = containers[source_idx].id;
        let target = target_idx.map(|t| containers[t].id);
        self.set_pouring(true);
        stream.start(source, target);
        Some(PourReport {
            source,
            target,
            rate,
            removed,
            credited,
        })
    }

    fn set_pouring(&mut self, pouring: bool) {
        if pouring != self.pouring {
            debug!(pouring, "pour state");
            self.pouring = pouring;
        }
    }
}

/// Nearest other vessel whose opening sits under the source's spout.
///
/// A vessel qualifies when the spout's horizontal distance to its axis is
/// within its capture radius and the spout is above its rim.
pub fn find_target(containers: &[Container], source_idx: usize) -> Option<usize> {
    let spout = containers.get(source_idx)?.spout_world();
    containers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != source_idx)
        .filter_map(|(i, c)| {
            let opening = c.opening_world();
            let horizontal = (spout - opening).with_y(0.0).length();
            (horizontal < c.shape.capture_radius && spout.y > opening.y).then_some((i, horizontal))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
