// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use revpick::prelude::*;

fuzz_target!(|data: &[u8]| {
    let Ok(store) = serde_json::from_slice::<CatalogStore>(data) else {
        return;
    };
    let Ok(catalog) = Catalog::from_store(store) else {
        return;
    };
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let options = ViewOptions::at(now);
    let selection: SelectionSet = catalog.revisions().iter().step_by(2).map(|r| r.id).collect();

    for arch in catalog.architectures() {
        for risk in [Risk::Available, Risk::Stable] {
            let filter = FilterContext::new("latest", risk, arch);
            for mode in [AvailableMode::All, AvailableMode::LaunchpadBuilt] {
                let model = compute_view(
                    &catalog,
                    Some(&filter),
                    &selection,
                    mode,
                    &DisclosureState::new(),
                    &options,
                );
                for group in model.version_siblings.iter().chain(model.build_siblings.iter()) {
                    assert!(!group.covered_architectures.contains(arch));
                    assert!(group.members.iter().all(|m| !selection.contains(m.id)));
                }
            }
        }
    }
});
