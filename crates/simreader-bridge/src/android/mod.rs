// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android telephony bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Every field read is a separate JNI call into
// `TelephonyManager` / `SubscriptionInfo`, so a `SecurityException` from one
// getter (e.g. `getLine1Number` without READ_PHONE_NUMBERS) only fails that
// field.
//
// ## Architecture notes
//
// A Java exception thrown by a getter leaves the exception pending on the
// JNI thread. It is cleared before the error is returned; otherwise every
// subsequent JNI call on the thread would fail.
//
// The calling thread is attached permanently, so local references are never
// freed by a detach. Every read runs inside `in_local_frame`, which pops the
// frame (and every local reference created in it) before returning. Only
// plain Rust values and `GlobalRef`s leave a frame.

#![cfg(target_os = "android")]

use std::sync::OnceLock;

use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};

use simreader_core::error::{Result, SimReaderError};
use simreader_core::{AvailabilityRule, Capability, OperatorIdentity, RawRadioTechnology, SimState};

use crate::traits::*;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// `Context.TELEPHONY_SERVICE`.
const TELEPHONY_SERVICE: &str = "phone";

/// `Context.TELEPHONY_SUBSCRIPTION_SERVICE`.
const TELEPHONY_SUBSCRIPTION_SERVICE: &str = "telephony_subscription_service";

/// `Manifest.permission.READ_PHONE_STATE`.
const READ_PHONE_STATE: &str = "android.permission.READ_PHONE_STATE";

/// `PackageManager.PERMISSION_GRANTED`.
const PERMISSION_GRANTED: i32 = 0;

/// `Build.VERSION_CODES.LOLLIPOP_MR1`: SubscriptionManager appears.
const API_SUBSCRIPTIONS: i32 = 22;

/// `Build.VERSION_CODES.Q`: `getMccString` / `getMncString` appear.
const API_MCC_STRING: i32 = 29;

const STRING_SIG: &str = "()Ljava/lang/String;";

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// The process-wide `JavaVM`, resolved from the NDK context on first use.
fn java_vm() -> Result<&'static JavaVM> {
    static VM: OnceLock<JavaVM> = OnceLock::new();
    if let Some(vm) = VM.get() {
        return Ok(vm);
    }
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| SimReaderError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    Ok(VM.get_or_init(|| vm))
}

/// Obtain a [`JNIEnv`] for the current thread, attaching it if needed.
fn jni_env() -> Result<JNIEnv<'static>> {
    java_vm()?
        .attach_current_thread_permanently()
        .map_err(|e| SimReaderError::Bridge(format!("failed to attach JNI thread: {e}")))
}

/// The hosting Android `Context` (application or activity).
fn android_context() -> Result<JObject<'static>> {
    let ptr = ndk_context::android_context().context();
    if ptr.is_null() {
        return Err(SimReaderError::Bridge(
            "Android context is null, native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Context.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

/// Local reference slots reserved for a single getter call.
const FIELD_FRAME: i32 = 4;

/// Slots for a service lookup or one subscription's getters.
const OBJECT_FRAME: i32 = 16;

/// Run `read` inside a fresh JNI local frame.
///
/// Every local reference `read` creates is released when the frame is
/// popped, so repeated calls on a permanently attached thread do not fill
/// the local reference table. `T` must not hold local references.
fn in_local_frame<T>(
    env: &mut JNIEnv<'_>,
    capacity: i32,
    read: impl FnOnce(&mut JNIEnv<'_>) -> T,
) -> Result<T> {
    env.with_local_frame(capacity, |env| Ok::<T, jni::errors::Error>(read(env)))
        .map_err(|e| SimReaderError::Bridge(format!("failed to push JNI local frame: {e}")))
}

/// Map a JNI failure into a field error, clearing any pending Java exception.
fn jni_err(env: &mut JNIEnv<'_>, context: &str, e: jni::errors::Error) -> SimReaderError {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_clear();
    }
    SimReaderError::Telephony(format!("{context}: {e}"))
}

/// Convert a possibly-null `java.lang.String` into a Rust string.
fn java_string(env: &mut JNIEnv<'_>, obj: JObject<'_>, context: &str) -> FieldRead<String> {
    if obj.is_null() {
        return Ok(None);
    }
    let jstr = JString::from(obj);
    let value = env
        .get_string(&jstr)
        .map_err(|e| jni_err(env, context, e))?;
    Ok(Some(value.into()))
}

/// Call a no-arg `String` getter.
fn call_string(env: &mut JNIEnv<'_>, target: &JObject<'_>, method: &str) -> FieldRead<String> {
    let obj = match env.call_method(target, method, STRING_SIG, &[]).and_then(|v| v.l()) {
        Ok(obj) => obj,
        Err(e) => return Err(jni_err(env, method, e)),
    };
    java_string(env, obj, method)
}

/// Call a no-arg `CharSequence` getter and stringify the result.
fn call_char_sequence(
    env: &mut JNIEnv<'_>,
    target: &JObject<'_>,
    method: &str,
) -> FieldRead<String> {
    let seq = match env
        .call_method(target, method, "()Ljava/lang/CharSequence;", &[])
        .and_then(|v| v.l())
    {
        Ok(seq) => seq,
        Err(e) => return Err(jni_err(env, method, e)),
    };
    if seq.is_null() {
        return Ok(None);
    }
    call_string(env, &seq, "toString")
}

/// Call a no-arg `int` getter.
fn call_int(env: &mut JNIEnv<'_>, target: &JObject<'_>, method: &str) -> Result<i32> {
    match env.call_method(target, method, "()I", &[]).and_then(|v| v.i()) {
        Ok(value) => Ok(value),
        Err(e) => Err(jni_err(env, method, e)),
    }
}

/// Call a no-arg `boolean` getter.
fn call_bool(env: &mut JNIEnv<'_>, target: &JObject<'_>, method: &str) -> Result<bool> {
    match env.call_method(target, method, "()Z", &[]).and_then(|v| v.z()) {
        Ok(value) => Ok(value),
        Err(e) => Err(jni_err(env, method, e)),
    }
}

/// `Build.VERSION.SDK_INT`.
fn sdk_int(env: &mut JNIEnv<'_>) -> Result<i32> {
    match env
        .get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
        .and_then(|v| v.i())
    {
        Ok(value) => Ok(value),
        Err(e) => Err(jni_err(env, "Build.VERSION.SDK_INT", e)),
    }
}

/// `context.getSystemService(name)` as a global reference.
fn system_service(env: &mut JNIEnv<'_>, name: &str) -> Result<GlobalRef> {
    let context = android_context()?;
    let j_name: JString = env
        .new_string(name)
        .map_err(|e| jni_err(env, "new_string(service)", e))?;
    let service = match env
        .call_method(
            &context,
            "getSystemService",
            "(Ljava/lang/String;)Ljava/lang/Object;",
            &[JValue::Object(&j_name)],
        )
        .and_then(|v| v.l())
    {
        Ok(service) => service,
        Err(e) => {
            let err = jni_err(env, "getSystemService", e);
            return Err(SimReaderError::ServiceUnavailable(err.to_string()));
        }
    };
    if service.is_null() {
        return Err(SimReaderError::ServiceUnavailable(format!(
            "getSystemService(\"{name}\") returned null"
        )));
    }
    env.new_global_ref(&service)
        .map_err(|e| SimReaderError::Bridge(format!("new_global_ref({name}): {e}")))
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the telephony bridge.
///
/// Zero-sized; every call resolves the system services afresh.
pub struct AndroidBridge;

impl AndroidBridge {
    /// Create a new Android bridge.
    ///
    /// This does **not** touch JNI; the first JNI call happens lazily when
    /// a trait method is invoked.
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl TelephonyBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }

    /// `context.checkPermission(READ_PHONE_STATE, myPid(), myUid())`.
    ///
    /// Works on every API level, including pre-23 where install-time grants
    /// always report granted.
    fn has_read_phone_state(&self) -> bool {
        let check = || -> Result<bool> {
            let mut env = jni_env()?;
            in_local_frame(&mut env, OBJECT_FRAME, check_phone_state)?
        };

        match check() {
            Ok(granted) => granted,
            Err(e) => {
                tracing::warn!(error = %e, "Android: permission check failed, treating as denied");
                false
            }
        }
    }

    fn capability(&self) -> Capability {
        let sdk = jni_env().and_then(|mut env| in_local_frame(&mut env, FIELD_FRAME, sdk_int)?);
        match sdk {
            Ok(level) if level >= API_SUBSCRIPTIONS => Capability::SubscriptionEnumeration,
            Ok(_) => Capability::SingleContext,
            Err(e) => {
                tracing::warn!(error = %e, "Android: SDK_INT unreadable, using single context");
                Capability::SingleContext
            }
        }
    }

    fn availability_rule(&self) -> AvailabilityRule {
        AvailabilityRule::OperatorCode
    }

    fn telephony(&self) -> Result<Box<dyn TelephonyContext + '_>> {
        let mut env = jni_env()?;
        let manager = in_local_frame(&mut env, OBJECT_FRAME, |env| {
            system_service(env, TELEPHONY_SERVICE)
        })??;
        tracing::debug!("Android: TelephonyManager resolved");
        Ok(Box::new(AndroidTelephony { manager }))
    }

    fn active_subscriptions(&self) -> Result<Vec<SubscriptionInfo>> {
        let mut env = jni_env()?;
        let subscriptions = in_local_frame(&mut env, OBJECT_FRAME, enumerate_subscriptions)??;
        tracing::info!(count = subscriptions.len(), "Android: active subscriptions enumerated");
        Ok(subscriptions)
    }
}

/// `context.checkPermission(READ_PHONE_STATE, myPid(), myUid())`.
fn check_phone_state(env: &mut JNIEnv<'_>) -> Result<bool> {
    let context = android_context()?;
    let pid = match env
        .call_static_method("android/os/Process", "myPid", "()I", &[])
        .and_then(|v| v.i())
    {
        Ok(pid) => pid,
        Err(e) => return Err(jni_err(env, "Process.myPid", e)),
    };
    let uid = match env
        .call_static_method("android/os/Process", "myUid", "()I", &[])
        .and_then(|v| v.i())
    {
        Ok(uid) => uid,
        Err(e) => return Err(jni_err(env, "Process.myUid", e)),
    };
    let j_perm: JString = env
        .new_string(READ_PHONE_STATE)
        .map_err(|e| jni_err(env, "new_string(permission)", e))?;
    let status = match env
        .call_method(
            &context,
            "checkPermission",
            "(Ljava/lang/String;II)I",
            &[JValue::Object(&j_perm), JValue::Int(pid), JValue::Int(uid)],
        )
        .and_then(|v| v.i())
    {
        Ok(status) => status,
        Err(e) => return Err(jni_err(env, "checkPermission", e)),
    };
    Ok(status == PERMISSION_GRANTED)
}

/// Walk `SubscriptionManager.getActiveSubscriptionInfoList()`.
///
/// Each element is read in its own frame, so the number of live local
/// references stays bounded however many subscriptions there are.
fn enumerate_subscriptions(env: &mut JNIEnv<'_>) -> Result<Vec<SubscriptionInfo>> {
    let sdk = sdk_int(env)?;
    let manager = system_service(env, TELEPHONY_SUBSCRIPTION_SERVICE)?;

    let list = match env
        .call_method(
            manager.as_obj(),
            "getActiveSubscriptionInfoList",
            "()Ljava/util/List;",
            &[],
        )
        .and_then(|v| v.l())
    {
        Ok(list) => list,
        Err(e) => return Err(jni_err(env, "getActiveSubscriptionInfoList", e)),
    };

    // A null list means no active subscriptions.
    if list.is_null() {
        tracing::info!("Android: no active subscriptions");
        return Ok(Vec::new());
    }

    let size = call_int(env, &list, "size")?;
    let mut subscriptions = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
    for index in 0..size {
        let subscription = in_local_frame(env, OBJECT_FRAME, |env| {
            let info = match env
                .call_method(&list, "get", "(I)Ljava/lang/Object;", &[JValue::Int(index)])
                .and_then(|v| v.l())
            {
                Ok(info) => info,
                Err(e) => return Err(jni_err(env, "List.get", e)),
            };
            Ok(read_subscription(env, &info, sdk))
        })??;
        subscriptions.push(subscription);
    }
    Ok(subscriptions)
}

/// Read each `SubscriptionInfo` getter independently.
fn read_subscription(env: &mut JNIEnv<'_>, info: &JObject<'_>, sdk: i32) -> SubscriptionInfo {
    let (mcc, mnc) = if sdk >= API_MCC_STRING {
        (
            call_string(env, info, "getMccString"),
            call_string(env, info, "getMncString"),
        )
    } else {
        (
            call_int(env, info, "getMcc").map(legacy_code),
            call_int(env, info, "getMnc").map(legacy_code),
        )
    };

    SubscriptionInfo {
        carrier_name: call_char_sequence(env, info, "getCarrierName"),
        country_iso: call_string(env, info, "getCountryIso"),
        mcc,
        mnc,
        number: call_string(env, info, "getNumber"),
        icc_id: call_string(env, info, "getIccId"),
    }
}

/// Integer MCC/MNC getters report 0 when unknown.
fn legacy_code(value: i32) -> Option<String> {
    (value > 0).then(|| value.to_string())
}

// ---------------------------------------------------------------------------
// TelephonyContext: android.telephony.TelephonyManager
// ---------------------------------------------------------------------------

struct AndroidTelephony {
    manager: GlobalRef,
}

impl AndroidTelephony {
    fn string_field(&self, method: &str) -> FieldRead<String> {
        let mut env = jni_env()?;
        in_local_frame(&mut env, FIELD_FRAME, |env| {
            call_string(env, self.manager.as_obj(), method)
        })?
    }

    fn int_field(&self, method: &str) -> Result<i32> {
        let mut env = jni_env()?;
        in_local_frame(&mut env, FIELD_FRAME, |env| {
            call_int(env, self.manager.as_obj(), method)
        })?
    }
}

impl TelephonyContext for AndroidTelephony {
    fn sim_operator_name(&self) -> FieldRead<String> {
        self.string_field("getSimOperatorName")
    }

    fn sim_country_iso(&self) -> FieldRead<String> {
        self.string_field("getSimCountryIso")
    }

    fn sim_operator(&self) -> FieldRead<OperatorIdentity> {
        Ok(self.string_field("getSimOperator")?.map(OperatorIdentity::Combined))
    }

    fn line1_number(&self) -> FieldRead<String> {
        self.string_field("getLine1Number")
    }

    fn sim_serial_number(&self) -> FieldRead<String> {
        self.string_field("getSimSerialNumber")
    }

    fn subscriber_id(&self) -> FieldRead<String> {
        self.string_field("getSubscriberId")
    }

    fn is_network_roaming(&self) -> Result<bool> {
        let mut env = jni_env()?;
        in_local_frame(&mut env, FIELD_FRAME, |env| {
            call_bool(env, self.manager.as_obj(), "isNetworkRoaming")
        })?
    }

    fn sim_state(&self) -> Result<SimState> {
        self.int_field("getSimState").map(SimState::from_android)
    }

    fn network_operator_name(&self) -> FieldRead<String> {
        self.string_field("getNetworkOperatorName")
    }

    fn network_operator(&self) -> FieldRead<OperatorIdentity> {
        Ok(self
            .string_field("getNetworkOperator")?
            .map(OperatorIdentity::Combined))
    }

    fn radio_technology(&self) -> FieldRead<RawRadioTechnology> {
        self.int_field("getNetworkType")
            .map(|id| Some(RawRadioTechnology::Android(id)))
    }
}
