//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `atlas_core` wiring.
//! - Drive the open/close dispatch path when given a store path.

use atlas_core::{Engine, InboundEvent};
use std::path::PathBuf;

fn main() {
    println!("atlas_core version={}", atlas_core::core_version());

    if let Some(path) = std::env::args().nth(1) {
        let mut engine = Engine::new();
        for event in engine.process(InboundEvent::OpenDatabase(PathBuf::from(path))) {
            println!("{event:?}");
        }
        for event in engine.process(InboundEvent::CloseDatabase) {
            println!("{event:?}");
        }
    }
}
