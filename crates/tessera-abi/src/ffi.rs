use core::ffi::{c_char, c_void};

/// Bump this when you break the ABI. Host checks it at load time.
pub const TESSERA_ABI_VERSION: u32 = 1;

pub const PLUGIN_ENTRY_SYMBOL: &str = "tessera_plugin_entry_v1";

pub const ERR_OK: i32 = 0;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct TesseraString {
    pub ptr: *mut c_char,
    pub len: usize,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct Int32Array {
    pub ptr: *mut i32,
    pub len: usize,
}

/// Borrowed view into plugin-owned floats; valid until the next evaluate call.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct FloatSlice {
    pub ptr: *mut f32,
    pub len: usize,
}

#[repr(C)]
pub struct PluginInfo {
    pub abi_version: u32,
    pub id: *const c_char,     // "llama"
    pub semver: *const c_char, // "0.1.0"
}

// ---------- Function pointer types (C ABI) ----------

pub type FreeStringFn = unsafe extern "C" fn(s: TesseraString);

/// `params_json` is UTF-8 JSON of `tessera_abi::params::ContextParams`.
pub type CreateSessionFn =
    unsafe extern "C" fn(model_path: *const c_char, params_json: *const c_char) -> *mut c_void;
pub type DestroySessionFn = unsafe extern "C" fn(session: *mut c_void);

pub type TokenizeUtf8Fn =
    unsafe extern "C" fn(session: *mut c_void, text: *const c_char, add_bos: bool) -> Int32Array;
pub type FreeIntsFn = unsafe extern "C" fn(arr: Int32Array);

pub type EvaluateFn =
    unsafe extern "C" fn(session: *mut c_void, tokens: *const i32, len: usize, n_past: i32) -> i32;

/// `sampling_json` is UTF-8 JSON of `tessera_abi::sampling::SamplingParams::normalized()`.
/// Returns next token id (>= 0) or a negative error code.
pub type SampleJsonFn = unsafe extern "C" fn(
    session: *mut c_void,
    sampling_json: *const c_char,
    last_tokens: *const i32,
    last_len: usize,
) -> i32;

pub type DecodeTokenFn = unsafe extern "C" fn(session: *mut c_void, token_id: i32) -> TesseraString;

pub type EosTokenFn = unsafe extern "C" fn(session: *mut c_void) -> i32;
pub type LogitsFn = unsafe extern "C" fn(session: *mut c_void) -> FloatSlice;

pub type LastErrorFn = unsafe extern "C" fn() -> TesseraString;
pub type SystemInfoFn = unsafe extern "C" fn() -> TesseraString;
pub type ContextWindowHintFn = unsafe extern "C" fn(session: *mut c_void) -> i32; // 0 if unknown

// ---------- VTables ----------

#[repr(C)]
pub struct LlmApi {
    pub create_session: CreateSessionFn,
    pub destroy_session: DestroySessionFn,

    pub tokenize_utf8: TokenizeUtf8Fn,
    pub free_ints: FreeIntsFn,

    pub evaluate: EvaluateFn,
    pub sample_json: SampleJsonFn,
    pub decode_token: DecodeTokenFn,
    pub eos_token: EosTokenFn,
    pub logits: LogitsFn,

    // Diagnostics & memory management
    pub last_error: LastErrorFn,
    pub system_info: SystemInfoFn,
    pub free_string: FreeStringFn,

    pub context_window_hint: ContextWindowHintFn,
}

#[repr(C)]
pub struct PluginApi {
    pub info: PluginInfo,
    pub llm: LlmApi,
}

/// Plugin must export `tessera_plugin_entry_v1` returning a pointer to a static `PluginApi`.
pub type PluginEntryFn = unsafe extern "C" fn() -> *const PluginApi;
