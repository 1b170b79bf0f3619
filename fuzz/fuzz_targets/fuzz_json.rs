#![no_main]

use forest_growth_projector::{io::read_stands_json_from_bytes, EngineConfig, GrowthEngine};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(records) = read_stands_json_from_bytes(data) {
        let config = EngineConfig {
            parallel: false,
            ..Default::default()
        };
        if let Ok(engine) = GrowthEngine::new(config) {
            for record in &records {
                let _ = engine.project(record);
            }
            let _ = engine.run(&records);
        }
    }
});
