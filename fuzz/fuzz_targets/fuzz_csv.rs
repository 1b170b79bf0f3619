#![no_main]

use forest_growth_projector::{io::read_stands_csv_from_bytes, EngineConfig, GrowthEngine};
use libfuzzer_sys::fuzz_target;

// Arbitrary snapshots may be rejected, but never panic the engine.
fuzz_target!(|data: &[u8]| {
    if let Ok(records) = read_stands_csv_from_bytes(data) {
        let config = EngineConfig {
            parallel: false,
            ..Default::default()
        };
        if let Ok(engine) = GrowthEngine::new(config) {
            let _ = engine.run(&records);
        }
    }
});
