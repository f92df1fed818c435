// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS telephony bridge via objc2.
//
// Requires compilation with the iOS SDK (Xcode). Reads `CTTelephonyNetworkInfo`
// and its `CTCarrier` objects through Objective-C message sends; CoreTelephony
// is linked explicitly because nothing else references its symbols.
//
// iOS exposes no phone number, ICCID, or IMSI to third-party apps, and no
// roaming flag, so those fields always come back absent / `false`. There is
// no runtime permission for telephony metadata either.
//
// ## Unsafe code
//
// 1. **ObjC message sends** (`msg_send!`): selectors are the documented
//    CoreTelephony properties. Each property is guarded by
//    `respondsToSelector:` where it is not available on every supported
//    iOS version.
// 2. **Class lookup**: `CTTelephonyNetworkInfo` is resolved at runtime so a
//    missing framework surfaces as an error instead of a crash.

#![cfg(target_os = "ios")]

use objc2::rc::Retained;
use objc2::runtime::{AnyClass, AnyObject, Sel};
use objc2::{msg_send, sel};
use objc2_foundation::{NSDictionary, NSString};

use simreader_core::error::{Result, SimReaderError};
use simreader_core::{AvailabilityRule, Capability, OperatorIdentity, RawRadioTechnology, SimState};

use crate::traits::*;

#[link(name = "CoreTelephony", kind = "framework")]
unsafe extern "C" {}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a fresh `CTTelephonyNetworkInfo`.
fn network_info() -> Result<Retained<AnyObject>> {
    let class = AnyClass::get(c"CTTelephonyNetworkInfo").ok_or_else(|| {
        SimReaderError::ServiceUnavailable("CTTelephonyNetworkInfo class not found".into())
    })?;
    // SAFETY: `+new` on an NSObject subclass returns a retained instance or nil.
    let info: Option<Retained<AnyObject>> = unsafe { msg_send![class, new] };
    info.ok_or_else(|| {
        SimReaderError::ServiceUnavailable("CTTelephonyNetworkInfo could not be created".into())
    })
}

fn responds_to(obj: &AnyObject, selector: Sel) -> bool {
    // SAFETY: `respondsToSelector:` is implemented by every NSObject.
    unsafe { msg_send![obj, respondsToSelector: selector] }
}

/// Read an `NSString?` property as a Rust string. Must be used inside an
/// `unsafe` block whose SAFETY comment covers the property's return type.
macro_rules! string_property {
    ($obj:expr, $property:ident) => {{
        let value: Option<Retained<NSString>> = msg_send![$obj, $property];
        value.map(|s| s.to_string())
    }};
}

/// Entries of a `[String: T]` dictionary, sorted by service identifier.
///
/// CoreTelephony returns unordered dictionaries; sorting keeps the slot
/// order stable between calls.
fn sorted_entries(dict: &NSDictionary<NSString, AnyObject>) -> Vec<(String, Retained<AnyObject>)> {
    let keys = dict.allKeys();
    let mut entries: Vec<(String, Retained<AnyObject>)> = (0..keys.count())
        .filter_map(|i| {
            let key = keys.objectAtIndex(i);
            dict.objectForKey(&key).map(|value| (key.to_string(), value))
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

/// Per-service carriers (iOS 12+) or the single legacy carrier.
fn carriers(info: &AnyObject) -> Vec<Retained<AnyObject>> {
    if responds_to(info, sel!(serviceSubscriberCellularProviders)) {
        // SAFETY: property exists (checked above) and returns
        // `NSDictionary<NSString *, CTCarrier *> *` or nil.
        let dict: Option<Retained<NSDictionary<NSString, AnyObject>>> =
            unsafe { msg_send![info, serviceSubscriberCellularProviders] };
        dict.map(|d| sorted_entries(&d).into_iter().map(|(_, carrier)| carrier).collect())
            .unwrap_or_default()
    } else {
        // SAFETY: `subscriberCellularProvider` exists on every iOS version
        // that lacks the per-service variant.
        let carrier: Option<Retained<AnyObject>> =
            unsafe { msg_send![info, subscriberCellularProvider] };
        carrier.into_iter().collect()
    }
}

/// Radio technology of the first service, or the legacy single value.
fn radio_technology(info: &AnyObject) -> Option<String> {
    if responds_to(info, sel!(serviceCurrentRadioAccessTechnology)) {
        // SAFETY: property exists (checked above) and returns
        // `NSDictionary<NSString *, NSString *> *` or nil.
        let dict: Option<Retained<NSDictionary<NSString, AnyObject>>> =
            unsafe { msg_send![info, serviceCurrentRadioAccessTechnology] };
        let (_, first) = dict.and_then(|d| sorted_entries(&d).into_iter().next())?;
        first.downcast::<NSString>().ok().map(|value| value.to_string())
    } else {
        // SAFETY: `currentRadioAccessTechnology` returns `NSString *` or nil.
        unsafe { string_property!(info, currentRadioAccessTechnology) }
    }
}

struct CarrierFields {
    name: Option<String>,
    iso: Option<String>,
    mcc: Option<String>,
    mnc: Option<String>,
}

fn carrier_fields(carrier: &AnyObject) -> CarrierFields {
    // SAFETY: all four are `NSString *` properties of CTCarrier.
    unsafe {
        CarrierFields {
            name: string_property!(carrier, carrierName),
            iso: string_property!(carrier, isoCountryCode),
            mcc: string_property!(carrier, mobileCountryCode),
            mnc: string_property!(carrier, mobileNetworkCode),
        }
    }
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// iOS implementation of the telephony bridge.
///
/// Holds no Objective-C objects; each call creates its own
/// `CTTelephonyNetworkInfo`.
pub struct IosBridge;

impl IosBridge {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IosBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl TelephonyBridge for IosBridge {
    fn platform_name(&self) -> &str {
        "iOS"
    }

    fn has_read_phone_state(&self) -> bool {
        true
    }

    fn capability(&self) -> Capability {
        match network_info() {
            Ok(info) if responds_to(&info, sel!(serviceSubscriberCellularProviders)) => {
                Capability::SubscriptionEnumeration
            }
            Ok(_) => Capability::SingleContext,
            Err(e) => {
                tracing::warn!(error = %e, "iOS: telephony info unavailable, using single context");
                Capability::SingleContext
            }
        }
    }

    fn availability_rule(&self) -> AvailabilityRule {
        AvailabilityRule::CarrierName
    }

    fn telephony(&self) -> Result<Box<dyn TelephonyContext + '_>> {
        let info = network_info()?;
        let carrier = carriers(&info).into_iter().next().map(|c| carrier_fields(&c));
        let radio = radio_technology(&info);
        tracing::debug!(
            has_carrier = carrier.is_some(),
            radio = radio.as_deref().unwrap_or("none"),
            "iOS: telephony context resolved"
        );
        Ok(Box::new(IosTelephony { carrier, radio }))
    }

    fn active_subscriptions(&self) -> Result<Vec<SubscriptionInfo>> {
        let info = network_info()?;
        let subscriptions: Vec<SubscriptionInfo> = carriers(&info)
            .iter()
            .map(|carrier| {
                let fields = carrier_fields(carrier);
                SubscriptionInfo {
                    carrier_name: Ok(fields.name),
                    country_iso: Ok(fields.iso),
                    mcc: Ok(fields.mcc),
                    mnc: Ok(fields.mnc),
                    number: Ok(None),
                    icc_id: Ok(None),
                }
            })
            .collect();
        tracing::info!(count = subscriptions.len(), "iOS: cellular providers enumerated");
        Ok(subscriptions)
    }
}

// ---------------------------------------------------------------------------
// TelephonyContext: first CTCarrier
// ---------------------------------------------------------------------------

/// Values copied out of the first carrier when the context was created.
struct IosTelephony {
    carrier: Option<CarrierFields>,
    radio: Option<String>,
}

impl IosTelephony {
    fn operator(&self) -> Option<OperatorIdentity> {
        self.carrier.as_ref().map(|c| OperatorIdentity::Split {
            mcc: c.mcc.clone(),
            mnc: c.mnc.clone(),
        })
    }
}

impl TelephonyContext for IosTelephony {
    fn sim_operator_name(&self) -> FieldRead<String> {
        Ok(self.carrier.as_ref().and_then(|c| c.name.clone()))
    }

    fn sim_country_iso(&self) -> FieldRead<String> {
        Ok(self.carrier.as_ref().and_then(|c| c.iso.clone()))
    }

    fn sim_operator(&self) -> FieldRead<OperatorIdentity> {
        Ok(self.operator())
    }

    fn line1_number(&self) -> FieldRead<String> {
        Ok(None)
    }

    fn sim_serial_number(&self) -> FieldRead<String> {
        Ok(None)
    }

    fn subscriber_id(&self) -> FieldRead<String> {
        Ok(None)
    }

    fn is_network_roaming(&self) -> Result<bool> {
        Ok(false)
    }

    fn sim_state(&self) -> Result<SimState> {
        Ok(if self.carrier.is_some() {
            SimState::Ready
        } else {
            SimState::Absent
        })
    }

    fn network_operator_name(&self) -> FieldRead<String> {
        self.sim_operator_name()
    }

    fn network_operator(&self) -> FieldRead<OperatorIdentity> {
        Ok(self.operator())
    }

    fn radio_technology(&self) -> FieldRead<RawRadioTechnology> {
        Ok(self.radio.clone().map(RawRadioTechnology::Ios))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify that the bridge reports the correct platform name.
    #[test]
    fn platform_name() {
        let bridge = IosBridge::new();
        assert_eq!(bridge.platform_name(), "iOS");
    }

    #[test]
    fn missing_carrier_reads_as_absent_sim() {
        let ctx = IosTelephony {
            carrier: None,
            radio: None,
        };
        assert_eq!(ctx.sim_state().unwrap(), SimState::Absent);
        assert_eq!(ctx.sim_operator().unwrap(), None);
    }

    // Reads against CTTelephonyNetworkInfo need a device with a SIM. They
    // are exercised in the Xcode test target rather than via `cargo test`.
}
