// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The four reader operations.
//
// Each operation runs to completion on the calling thread, reads live
// platform state, and returns either a value or an `OperationError` tagged
// with the code the caller sees. Nothing escapes as a panic.

use std::panic::{self, AssertUnwindSafe};

use simreader_bridge::traits::TelephonyBridge;
use simreader_core::error::{ErrorCode, Result, SimReaderError};
use simreader_core::{Capability, NetworkInfo, SimRecord, TelephonyField};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extract::safe_flag;
use crate::network;
use crate::records::{self, panic_message};

/// A failed operation: the wire code plus the underlying error.
#[derive(Debug, Error)]
#[error("{code}: {source}")]
pub struct OperationError {
    pub code: ErrorCode,
    #[source]
    pub source: SimReaderError,
}

impl OperationError {
    pub fn new(code: ErrorCode, source: SimReaderError) -> Self {
        Self { code, source }
    }

    pub fn permission_denied() -> Self {
        Self::new(ErrorCode::PermissionDenied, SimReaderError::PermissionDenied)
    }

    /// Human-readable message sent alongside the code.
    pub fn message(&self) -> String {
        self.source.to_string()
    }
}

/// Reads SIM and network metadata through a platform bridge.
pub struct SimReader<B> {
    bridge: B,
}

impl<B: TelephonyBridge> SimReader<B> {
    pub fn new(bridge: B) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn platform_name(&self) -> &str {
        self.bridge.platform_name()
    }

    /// Primary SIM as a single slot-0 record.
    pub fn get_sim_info(&self) -> std::result::Result<SimRecord, OperationError> {
        info!(operation = "getSimInfo", platform = self.platform_name(), "reading SIM info");
        self.require_phone_state()?;
        run_guarded(ErrorCode::SimError, || {
            let ctx = self.bridge.telephony()?;
            Ok(records::single_slot(ctx.as_ref(), 0))
        })
    }

    /// One record per active subscription, or one single-slot record when
    /// the platform cannot enumerate subscriptions.
    pub fn get_all_sim_info(&self) -> std::result::Result<Vec<SimRecord>, OperationError> {
        info!(operation = "getAllSimInfo", platform = self.platform_name(), "reading all SIM info");
        self.require_phone_state()?;
        run_guarded(ErrorCode::SimError, || match self.bridge.capability() {
            Capability::SubscriptionEnumeration => {
                let subscriptions = self.bridge.active_subscriptions()?;
                if subscriptions.is_empty() {
                    debug!("no active subscriptions");
                    return Ok(Vec::new());
                }
                let ctx = self.bridge.telephony()?;
                let roaming = safe_flag(TelephonyField::NetworkRoaming, ctx.is_network_roaming());
                Ok(records::from_subscriptions(subscriptions, roaming))
            }
            Capability::SingleContext => {
                debug!("subscription enumeration unavailable, reading single context");
                let ctx = self.bridge.telephony()?;
                Ok(vec![records::single_slot(ctx.as_ref(), 0)])
            }
        })
    }

    /// Whether a usable SIM is inserted. Not gated on the phone-state grant.
    pub fn has_sim_card(&self) -> std::result::Result<bool, OperationError> {
        info!(operation = "hasSimCard", platform = self.platform_name(), "checking SIM presence");
        run_guarded(ErrorCode::SimError, || {
            let ctx = self.bridge.telephony()?;
            let ready = match ctx.sim_state() {
                Ok(state) => state.is_ready(),
                Err(e) => {
                    debug!(error = %e, "SIM state unreadable, reporting no SIM");
                    false
                }
            };
            Ok(ready)
        })
    }

    /// Current network attachment.
    pub fn get_network_info(&self) -> std::result::Result<NetworkInfo, OperationError> {
        info!(operation = "getNetworkInfo", platform = self.platform_name(), "reading network info");
        self.require_phone_state()?;
        run_guarded(ErrorCode::NetworkError, || {
            let ctx = self.bridge.telephony()?;
            network::assemble(ctx.as_ref(), self.bridge.availability_rule())
        })
    }

    fn require_phone_state(&self) -> std::result::Result<(), OperationError> {
        if self.bridge.has_read_phone_state() {
            Ok(())
        } else {
            warn!(platform = self.platform_name(), "READ_PHONE_STATE not granted");
            Err(OperationError::permission_denied())
        }
    }
}

/// Run an operation body, turning errors and panics into `OperationError`.
pub fn run_guarded<T>(
    code: ErrorCode,
    body: impl FnOnce() -> Result<T>,
) -> std::result::Result<T, OperationError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        Err(SimReaderError::Fault(panic_message(payload.as_ref())))
    });
    outcome.map_err(|source| {
        let code = match source {
            SimReaderError::PermissionDenied => ErrorCode::PermissionDenied,
            _ => code,
        };
        warn!(code = %code, error = %source, "operation failed");
        OperationError::new(code, source)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use simreader_bridge::snapshot::{SnapshotBridge, SubscriptionFields, TelephonySnapshot};
    use simreader_core::{AvailabilityRule, OperatorIdentity, RawRadioTechnology, SimState};

    fn denied() -> TelephonySnapshot {
        TelephonySnapshot {
            permission_granted: false,
            ..TelephonySnapshot::example()
        }
    }

    #[test]
    fn gated_operations_deny_without_reading() {
        let bridge = SnapshotBridge::new(denied());
        let reader = SimReader::new(&bridge);

        let err = reader.get_sim_info().unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(err.message(), "READ_PHONE_STATE permission required");
        assert_eq!(
            reader.get_all_sim_info().unwrap_err().code,
            ErrorCode::PermissionDenied
        );
        assert_eq!(
            reader.get_network_info().unwrap_err().code,
            ErrorCode::PermissionDenied
        );
        assert_eq!(bridge.read_count(), 0);
    }

    #[test]
    fn has_sim_card_ignores_the_gate() {
        let bridge = SnapshotBridge::new(denied());
        let reader = SimReader::new(&bridge);
        assert!(reader.has_sim_card().unwrap());
    }

    #[test]
    fn has_sim_card_is_a_boolean_for_any_state() {
        for state in [SimState::Absent, SimState::PinRequired, SimState::Unknown] {
            let mut snapshot = TelephonySnapshot::example();
            snapshot.sim.state = state;
            let bridge = SnapshotBridge::new(snapshot);
            assert!(!SimReader::new(&bridge).has_sim_card().unwrap());
        }

        let mut snapshot = TelephonySnapshot::example();
        snapshot.failing.insert(TelephonyField::SimState);
        let bridge = SnapshotBridge::new(snapshot);
        assert!(!SimReader::new(&bridge).has_sim_card().unwrap());
    }

    #[test]
    fn has_sim_card_without_service_is_sim_error() {
        let snapshot = TelephonySnapshot {
            service_unavailable: true,
            ..TelephonySnapshot::default()
        };
        let bridge = SnapshotBridge::new(snapshot);
        let err = SimReader::new(&bridge).has_sim_card().unwrap_err();
        assert_eq!(err.code, ErrorCode::SimError);
    }

    #[test]
    fn sim_info_is_slot_zero() {
        let bridge = SnapshotBridge::new(TelephonySnapshot::example());
        let record = SimReader::new(&bridge).get_sim_info().unwrap();
        assert_eq!(record.sim_slot_index, 0);
        assert_eq!(record.carrier_name.as_deref(), Some("T-Mobile"));
    }

    #[test]
    fn all_sim_info_enumerates_subscriptions() {
        let mut snapshot = TelephonySnapshot::example();
        snapshot.sim.roaming = true;
        let bridge = SnapshotBridge::new(snapshot);
        let records = SimReader::new(&bridge).get_all_sim_info().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sim_slot_index, 0);
        assert_eq!(records[1].sim_slot_index, 1);
        assert_eq!(records[1].carrier_name.as_deref(), Some("Google Fi"));
        assert!(records.iter().all(|r| r.subscriber_id.is_none()));
        assert!(records.iter().all(|r| r.is_network_roaming));
    }

    #[test]
    fn zero_subscriptions_is_empty_not_fallback() {
        let mut snapshot = TelephonySnapshot::example();
        snapshot.subscriptions.clear();
        let bridge = SnapshotBridge::new(snapshot);
        assert!(SimReader::new(&bridge).get_all_sim_info().unwrap().is_empty());
    }

    #[test]
    fn single_context_platform_yields_one_record() {
        let mut snapshot = TelephonySnapshot::example();
        snapshot.capability = Capability::SingleContext;
        snapshot.subscriptions = vec![SubscriptionFields::default(); 3];
        let bridge = SnapshotBridge::new(snapshot);
        let records = SimReader::new(&bridge).get_all_sim_info().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subscriber_id.as_deref(), Some("310260123456789"));
    }

    #[test]
    fn failed_enumeration_is_sim_error() {
        let mut snapshot = TelephonySnapshot::example();
        snapshot.failing.insert(TelephonyField::Subscriptions);
        let bridge = SnapshotBridge::new(snapshot);
        let err = SimReader::new(&bridge).get_all_sim_info().unwrap_err();
        assert_eq!(err.code, ErrorCode::SimError);
        assert!(err.message().contains("injected failure"));
    }

    #[test]
    fn network_info_maps_type_and_never_reports_signal() {
        let bridge = SnapshotBridge::new(TelephonySnapshot::example());
        let info = SimReader::new(&bridge).get_network_info().unwrap();
        assert_eq!(info.network_type, "LTE");
        assert_eq!(info.network_operator.as_deref(), Some("310260"));
        assert!(info.is_network_available);
        assert_eq!(info.signal_strength(), None);
    }

    #[test]
    fn network_read_failure_is_network_error() {
        let mut snapshot = TelephonySnapshot::example();
        snapshot.failing.insert(TelephonyField::RadioTechnology);
        let bridge = SnapshotBridge::new(snapshot);
        let err = SimReader::new(&bridge).get_network_info().unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
    }

    #[test]
    fn unknown_radio_is_reported_as_unknown() {
        let mut snapshot = TelephonySnapshot::example();
        snapshot.availability = AvailabilityRule::CarrierName;
        snapshot.network.operator = Some(OperatorIdentity::Combined("31".into()));
        snapshot.network.radio = Some(RawRadioTechnology::Android(99));
        let bridge = SnapshotBridge::new(snapshot);
        let info = SimReader::new(&bridge).get_network_info().unwrap();
        assert_eq!(info.network_type, "UNKNOWN");
        assert_eq!(info.network_operator.as_deref(), Some("31"));
        assert!(info.is_network_available);
    }

    #[test]
    fn short_network_operator_is_available_under_operator_code_rule() {
        let mut snapshot = TelephonySnapshot::example();
        snapshot.network.operator_name = None;
        snapshot.network.operator = Some(OperatorIdentity::Combined("31".into()));
        let bridge = SnapshotBridge::new(snapshot);
        let info = SimReader::new(&bridge).get_network_info().unwrap();
        assert_eq!(info.network_operator.as_deref(), Some("31"));
        assert!(info.is_network_available);
    }

    #[test]
    fn failing_serial_on_one_subscription_keeps_the_rest_of_the_record() {
        let mut snapshot = TelephonySnapshot::example();
        snapshot.failing.insert(TelephonyField::SimSerialNumber);
        let bridge = SnapshotBridge::new(snapshot);
        let records = SimReader::new(&bridge).get_all_sim_info().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.sim_serial_number.is_none()));
        assert_eq!(records[0].carrier_name.as_deref(), Some("T-Mobile"));
        assert_eq!(records[0].mobile_country_code.as_deref(), Some("310"));
        assert_eq!(records[0].phone_number.as_deref(), Some("+15555550100"));
        assert_eq!(records[1].carrier_name.as_deref(), Some("Google Fi"));
        assert_eq!(records[1].mobile_network_code.as_deref(), Some("580"));
    }

    #[test]
    fn panicking_body_becomes_typed_error() {
        let result: std::result::Result<(), _> =
            run_guarded(ErrorCode::NetworkError, || panic!("bridge exploded"));
        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert!(matches!(err.source, SimReaderError::Fault(ref msg) if msg == "bridge exploded"));
    }
}
