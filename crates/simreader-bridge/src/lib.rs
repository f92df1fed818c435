// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SIM reader: native telephony bridge abstractions.
//
// Defines the traits the normalizer reads from and picks the implementation
// for the target OS: Android (TelephonyManager over JNI), iOS
// (CoreTelephony over the Objective-C runtime), or a stub elsewhere. The
// snapshot bridge is available on every target.

pub mod snapshot;
pub mod traits;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod stub;

/// Retrieves the bridge implementation for the target operating system.
pub fn platform_bridge() -> Box<dyn traits::TelephonyBridge> {
    #[cfg(target_os = "ios")]
    {
        // iOS: `objc2` message sends to CTTelephonyNetworkInfo.
        Box::new(ios::IosBridge::new())
    }
    #[cfg(target_os = "android")]
    {
        // Android: `jni-rs` calls into TelephonyManager on the ART runtime.
        Box::new(android::AndroidBridge::new())
    }
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        // Desktop/CI: every telephony access reports PlatformUnavailable.
        Box::new(stub::StubBridge)
    }
}
