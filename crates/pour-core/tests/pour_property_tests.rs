// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use std::f32::consts::PI;

use lab_app_core::settings::{InteractionConfig, PhysicsConfig, PourConfig, StreamConfig};
use pour_core::interaction::ease_out_cubic;
use pour_core::{
    Container, ContainerId, Euler, InteractionManager, PourManager, ShapeDescriptor, StreamSim,
};
use proptest::prelude::*;

fn beaker(volume: f32) -> Container {
    Container::new(
        ContainerId(0),
        "beaker",
        ShapeDescriptor::beaker(),
        250.0,
        volume,
        [0, 0, 255, 255],
    )
}

fn stream() -> StreamSim {
    StreamSim::new(
        PhysicsConfig::default(),
        PourConfig::default(),
        StreamConfig::default(),
    )
}

proptest! {
    #[test]
    fn stored_volume_is_always_in_range(initial in any::<f32>(), deltas in prop::collection::vec(any::<f32>(), 0..16)) {
        let mut c = beaker(initial);
        prop_assert!((0.0..=c.max_volume()).contains(&c.volume()));
        for d in deltas {
            c.add_volume(d);
            prop_assert!((0.0..=c.max_volume()).contains(&c.volume()));
            c.set_volume(d);
            prop_assert!((0.0..=c.max_volume()).contains(&c.volume()));
        }
    }

    #[test]
    fn tilt_is_within_zero_and_pi(x in -10.0f32..10.0, y in -10.0f32..10.0, z in -10.0f32..10.0) {
        let mut c = beaker(100.0);
        c.orientation = Euler::new(x, y, z);
        let tilt = c.tilt_angle();
        prop_assert!((0.0..=PI).contains(&tilt));
    }

    #[test]
    fn can_pour_matches_threshold_and_volume(z in -PI..PI, volume in -50.0f32..300.0) {
        let cfg = PourConfig::default();
        let mut c = beaker(volume);
        c.orientation = Euler::new(0.0, 0.0, z);
        let expected = c.tilt_angle().to_degrees() > cfg.threshold_deg && c.volume() > 0.0;
        prop_assert_eq!(c.can_pour(&cfg), expected);
        if c.tilt_angle().to_degrees() <= cfg.threshold_deg {
            prop_assert_eq!(c.pour_rate(&cfg), 0.0);
        }
    }

    #[test]
    fn rate_is_bounded_and_monotone_in_tilt(a in 0.0f32..PI, b in 0.0f32..PI) {
        let cfg = PourConfig::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mut c = beaker(150.0);
        c.orientation = Euler::new(0.0, 0.0, -lo);
        let r_lo = c.pour_rate(&cfg);
        c.orientation = Euler::new(0.0, 0.0, -hi);
        let r_hi = c.pour_rate(&cfg);
        prop_assert!((0.0..=cfg.max_rate).contains(&r_lo));
        prop_assert!((0.0..=cfg.max_rate).contains(&r_hi));
        prop_assert!(r_lo <= r_hi + 1e-3);
    }

    #[test]
    fn target_gains_efficiency_times_source_loss(
        tilt_deg in 35.0f32..120.0,
        steps in prop::collection::vec(0.0f32..0.1, 1..40),
    ) {
        let cfg = PourConfig::default();
        let mut source = beaker(200.0).placed(0.0, 2.5, 0.0);
        source.orientation = Euler::new(0.0, 0.0, -tilt_deg.to_radians());
        let spout = source.spout_world();
        let target = Container::new(
            ContainerId(1),
            "sink",
            ShapeDescriptor::beaker(),
            10_000.0,
            0.0,
            [0, 0, 255, 255],
        )
        .placed(spout.x, 0.0, spout.z);
        let mut lab = vec![source, target];
        let mut mgr = PourManager::new(cfg.clone());
        let mut s = stream();

        for dt in steps {
            let before = (lab[0].volume(), lab[1].volume());
            if let Some(report) = mgr.step(dt, &mut lab, Some(ContainerId(0)), &mut s) {
                prop_assert_eq!(report.target, Some(ContainerId(1)));
                let lost = before.0 - lab[0].volume();
                let gained = lab[1].volume() - before.1;
                prop_assert!((gained - lost * cfg.efficiency).abs() < 1e-3);
                prop_assert!(lost <= report.rate * dt + 1e-4);
            }
        }
    }

    #[test]
    fn return_always_lands_exactly_upright(
        tilt in 0.0f32..2.0,
        yaw in -3.0f32..3.0,
        duration in 0.0f32..2.0,
        dt in 0.001f32..0.1,
    ) {
        let cfg = InteractionConfig { return_duration: duration, ..InteractionConfig::default() };
        let mut mgr = InteractionManager::new(cfg);
        let mut lab = vec![beaker(100.0)];
        lab[0].orientation = Euler::new(0.0, yaw, -tilt);
        mgr.begin_return(&lab[0], lab[0].position.y);
        let frames = (duration / dt).ceil() as usize + 2;
        for _ in 0..frames {
            mgr.update(dt, &mut lab);
        }
        prop_assert_eq!(lab[0].orientation, Euler::upright(yaw));
        prop_assert!(mgr.return_animation(ContainerId(0)).is_none());
    }

    #[test]
    fn ease_stays_in_unit_interval(t in -1.0f32..2.0) {
        let e = ease_out_cubic(t);
        prop_assert!((0.0..=1.0).contains(&e));
    }
}
