//! Property tests over random configurations.

use proptest::prelude::*;

use aether_protocol::{AetherProtocol, FixedController, RunConfig};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn noiseless_unlocked_key_has_no_errors(seed in any::<u64>(), loss in 0.0f64..0.5) {
        let cfg = RunConfig::new()
            .with_total_signals(200)
            .with_loss(loss)
            .with_hardware_noise(0.0)
            .with_seed(seed);
        let outcome = AetherProtocol::new(cfg)
            .with_controller(FixedController::no_lock())
            .run()
            .unwrap();
        prop_assert_eq!(outcome.streams.high_quality().errors(), 0);
        prop_assert_eq!(outcome.streams.recycled().errors(), 0);
        prop_assert!(outcome.streams.total_len() <= 200);
    }

    #[test]
    fn rate_and_leakage_stay_in_range(
        seed in any::<u64>(),
        noise in 0.0f64..0.2,
        strength in 0.0f64..1.0,
        block in 2usize..6,
    ) {
        let cfg = RunConfig::new()
            .with_total_signals(block * 40)
            .with_block_size(block)
            .with_hardware_noise(noise)
            .with_leakage(aether_protocol::LeakageSource::Static { strength })
            .with_seed(seed);
        let outcome = AetherProtocol::new(cfg).run().unwrap();
        prop_assert!((0.0..=1.0).contains(&outcome.leakage_rate));
        prop_assert!((0.0..=1.0).contains(&outcome.report.secure_key_rate));
        prop_assert_eq!(
            outcome.streams.high_quality().alice().len(),
            outcome.streams.high_quality().bob().len()
        );
    }
}
