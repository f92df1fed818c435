// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where no telephony stack exists.
//
// The permission gate passes so callers see the real failure: every
// telephony access returns `PlatformUnavailable`.

use simreader_core::error::{Result, SimReaderError};
use simreader_core::{AvailabilityRule, Capability};

use crate::traits::*;

/// Bridge returned on non-mobile platforms.
pub struct StubBridge;

impl TelephonyBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn has_read_phone_state(&self) -> bool {
        true
    }

    fn capability(&self) -> Capability {
        Capability::SingleContext
    }

    fn availability_rule(&self) -> AvailabilityRule {
        AvailabilityRule::OperatorCode
    }

    fn telephony(&self) -> Result<Box<dyn TelephonyContext + '_>> {
        tracing::warn!("TelephonyBridge::telephony called on stub bridge");
        Err(SimReaderError::PlatformUnavailable)
    }

    fn active_subscriptions(&self) -> Result<Vec<SubscriptionInfo>> {
        tracing::warn!("TelephonyBridge::active_subscriptions called on stub bridge");
        Err(SimReaderError::PlatformUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_reports_platform_unavailable() {
        let bridge = StubBridge;
        assert_eq!(bridge.platform_name(), "Desktop (stub)");
        assert!(matches!(bridge.telephony(), Err(SimReaderError::PlatformUnavailable)));
        assert!(matches!(
            bridge.active_subscriptions(),
            Err(SimReaderError::PlatformUnavailable)
        ));
    }
}
