// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for telephony access.
//
// A bridge hands out a `TelephonyContext` per call; the context exposes one
// method per platform field so that a failure in one read stays confined to
// that field. Nothing here normalizes values: empty strings, placeholder
// codes, and errors are passed through for the normalizer to deal with.

use simreader_core::error::Result;
use simreader_core::{AvailabilityRule, Capability, OperatorIdentity, RawRadioTechnology, SimState};

/// Outcome of one platform field read.
///
/// `Ok(None)` means the platform reported no value; `Err` means the read
/// itself failed (security exception, unsupported OS version, ...).
pub type FieldRead<T> = Result<Option<T>>;

/// Entry point into a platform's telephony stack.
pub trait TelephonyBridge: Send + Sync {
    /// Human-readable platform name (e.g. "Android", "iOS").
    fn platform_name(&self) -> &str;

    /// Whether the process holds the "read phone state" grant.
    ///
    /// Implementations report `false` when the check itself fails.
    fn has_read_phone_state(&self) -> bool;

    /// Which SIM record assembly path this OS version supports.
    fn capability(&self) -> Capability;

    /// How this platform decides `isNetworkAvailable`.
    fn availability_rule(&self) -> AvailabilityRule;

    /// Obtain the active telephony context.
    fn telephony(&self) -> Result<Box<dyn TelephonyContext + '_>>;

    /// Enumerate active subscriptions in platform order.
    ///
    /// Only meaningful when [`capability`](Self::capability) reports
    /// [`Capability::SubscriptionEnumeration`].
    fn active_subscriptions(&self) -> Result<Vec<SubscriptionInfo>>;
}

/// Field reads against the single active telephony context.
pub trait TelephonyContext {
    fn sim_operator_name(&self) -> FieldRead<String>;

    fn sim_country_iso(&self) -> FieldRead<String>;

    /// MCC/MNC of the SIM provider, combined or split depending on platform.
    fn sim_operator(&self) -> FieldRead<OperatorIdentity>;

    fn line1_number(&self) -> FieldRead<String>;

    fn sim_serial_number(&self) -> FieldRead<String>;

    fn subscriber_id(&self) -> FieldRead<String>;

    /// Device-wide roaming flag.
    fn is_network_roaming(&self) -> Result<bool>;

    fn sim_state(&self) -> Result<SimState>;

    fn network_operator_name(&self) -> FieldRead<String>;

    /// MCC/MNC of the registered network.
    fn network_operator(&self) -> FieldRead<OperatorIdentity>;

    fn radio_technology(&self) -> FieldRead<RawRadioTechnology>;
}

/// Fields reported directly by one enumerated subscription.
///
/// Each field carries its own read outcome so one failing getter does not
/// poison its siblings.
#[derive(Debug)]
pub struct SubscriptionInfo {
    pub carrier_name: FieldRead<String>,
    pub country_iso: FieldRead<String>,
    pub mcc: FieldRead<String>,
    pub mnc: FieldRead<String>,
    pub number: FieldRead<String>,
    pub icc_id: FieldRead<String>,
}

impl<T: TelephonyBridge + ?Sized> TelephonyBridge for Box<T> {
    fn platform_name(&self) -> &str {
        (**self).platform_name()
    }

    fn has_read_phone_state(&self) -> bool {
        (**self).has_read_phone_state()
    }

    fn capability(&self) -> Capability {
        (**self).capability()
    }

    fn availability_rule(&self) -> AvailabilityRule {
        (**self).availability_rule()
    }

    fn telephony(&self) -> Result<Box<dyn TelephonyContext + '_>> {
        (**self).telephony()
    }

    fn active_subscriptions(&self) -> Result<Vec<SubscriptionInfo>> {
        (**self).active_subscriptions()
    }
}

impl<T: TelephonyBridge + ?Sized> TelephonyBridge for &T {
    fn platform_name(&self) -> &str {
        (**self).platform_name()
    }

    fn has_read_phone_state(&self) -> bool {
        (**self).has_read_phone_state()
    }

    fn capability(&self) -> Capability {
        (**self).capability()
    }

    fn availability_rule(&self) -> AvailabilityRule {
        (**self).availability_rule()
    }

    fn telephony(&self) -> Result<Box<dyn TelephonyContext + '_>> {
        (**self).telephony()
    }

    fn active_subscriptions(&self) -> Result<Vec<SubscriptionInfo>> {
        (**self).active_subscriptions()
    }
}
