// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SIM record assembly.
//
// Two paths feed the same record shape: the single active telephony context
// (older OS versions, or when one record is asked for) and the enumerated
// subscription list. Both run under `guard_record`, so a bridge that faults
// mid-assembly yields an all-default record for that slot instead of
// failing the whole response.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use simreader_bridge::traits::{SubscriptionInfo, TelephonyContext};
use simreader_core::{SimRecord, TelephonyField};
use tracing::warn;

use crate::extract::{safe_flag, safe_operator, safe_text};

/// Run a record assembly, replacing a fault with [`SimRecord::empty`].
pub fn guard_record(slot: u32, assemble: impl FnOnce() -> SimRecord) -> SimRecord {
    match panic::catch_unwind(AssertUnwindSafe(assemble)) {
        Ok(record) => record,
        Err(payload) => {
            warn!(
                slot,
                fault = %panic_message(payload.as_ref()),
                "SIM record assembly faulted, reporting defaults"
            );
            SimRecord::empty(slot)
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Build one record from the single active telephony context.
pub fn single_slot(ctx: &dyn TelephonyContext, slot: u32) -> SimRecord {
    guard_record(slot, || {
        // Read once; both codes come from the same value.
        let operator = safe_operator(TelephonyField::SimOperator, ctx.sim_operator());
        SimRecord {
            carrier_name: safe_text(TelephonyField::CarrierName, ctx.sim_operator_name()),
            country_code: safe_text(TelephonyField::CountryIso, ctx.sim_country_iso()),
            mobile_country_code: operator.mcc,
            mobile_network_code: operator.mnc,
            phone_number: safe_text(TelephonyField::PhoneNumber, ctx.line1_number()),
            sim_serial_number: safe_text(TelephonyField::SimSerialNumber, ctx.sim_serial_number()),
            subscriber_id: safe_text(TelephonyField::SubscriberId, ctx.subscriber_id()),
            sim_slot_index: slot,
            is_network_roaming: safe_flag(TelephonyField::NetworkRoaming, ctx.is_network_roaming()),
        }
    })
}

/// Build one record from an enumerated subscription.
///
/// The subscription API never exposes the subscriber id, and roaming is the
/// device-wide flag passed in by the caller.
pub fn from_subscription(info: SubscriptionInfo, slot: u32, is_network_roaming: bool) -> SimRecord {
    guard_record(slot, move || SimRecord {
        carrier_name: safe_text(TelephonyField::CarrierName, info.carrier_name),
        country_code: safe_text(TelephonyField::CountryIso, info.country_iso),
        mobile_country_code: safe_text(TelephonyField::MobileCountryCode, info.mcc),
        mobile_network_code: safe_text(TelephonyField::MobileNetworkCode, info.mnc),
        phone_number: safe_text(TelephonyField::PhoneNumber, info.number),
        sim_serial_number: safe_text(TelephonyField::SimSerialNumber, info.icc_id),
        subscriber_id: None,
        sim_slot_index: slot,
        is_network_roaming,
    })
}

/// Build records for every subscription; slot index is the position in
/// enumeration order.
pub fn from_subscriptions(
    subscriptions: Vec<SubscriptionInfo>,
    is_network_roaming: bool,
) -> Vec<SimRecord> {
    subscriptions
        .into_iter()
        .enumerate()
        .map(|(position, info)| {
            let slot = u32::try_from(position).unwrap_or(u32::MAX);
            from_subscription(info, slot, is_network_roaming)
        })
        .collect()
}
