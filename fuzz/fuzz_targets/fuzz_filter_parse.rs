// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use libfuzzer_sys::fuzz_target;
use revpick::disclosure::GroupingKey;
use revpick::types::{AvailableMode, FilterContext};

fuzz_target!(|input: (&str, &str)| {
    let (channel, arch) = input;
    if let Ok(filter) = FilterContext::parse(channel, arch) {
        // a parsed channel prints back to something that parses the same
        let again = FilterContext::parse(&filter.channel(), &filter.architecture);
        assert_eq!(again.as_ref(), Ok(&filter));
        let _ = GroupingKey::new(Some(&filter), AvailableMode::Recent);
    }
});
