use core::ffi::c_void;
use std::{ffi::CString, path::Path, slice};

use super::loader::{LoadedPlugin, load_plugin_once};
use tessera_abi::{
    backend::LLMBackend, ffi::*, params::ContextParams, sampling::SamplingParams, token::Token,
};

/// A model session living inside the backend plugin.
pub struct PluginBackend {
    plugin: &'static LoadedPlugin,
    session: *mut c_void,
    eos_token: Token,
    n_ctx: Option<usize>,
}

impl Drop for PluginBackend {
    fn drop(&mut self) {
        if !self.session.is_null() {
            unsafe { (self.plugin.api.llm.destroy_session)(self.session) };
            self.session = std::ptr::null_mut();
        }
    }
}

fn make_cstring(s: &str) -> Result<CString, String> {
    CString::new(s).map_err(|_| "string contains interior NUL".to_string())
}

unsafe fn take_plugin_string(api_free: FreeStringFn, s: TesseraString) -> String {
    if s.ptr.is_null() || s.len == 0 {
        return String::new();
    }
    let out = {
        let slice = unsafe { slice::from_raw_parts(s.ptr as *const u8, s.len) };
        String::from_utf8_lossy(slice).into_owned()
    };
    unsafe { api_free(s) };
    out
}

impl PluginBackend {
    fn last_error(&self, fallback: &str) -> String {
        let msg = unsafe {
            let s = (self.plugin.api.llm.last_error)();
            take_plugin_string(self.plugin.api.llm.free_string, s)
        };
        if msg.is_empty() { fallback.into() } else { msg }
    }
}

impl LLMBackend for PluginBackend {
    fn load<P: AsRef<Path>>(model_path: P, params: &ContextParams) -> Result<Self, String> {
        let plugin = load_plugin_once(None)?;
        let cpath = make_cstring(
            model_path
                .as_ref()
                .to_str()
                .ok_or("model path not valid UTF-8")?,
        )?;
        let params_json = serde_json::to_string(params).map_err(|e| e.to_string())?;
        let cparams = make_cstring(&params_json)?;

        let session =
            unsafe { (plugin.api.llm.create_session)(cpath.as_ptr(), cparams.as_ptr()) };
        if session.is_null() {
            let msg = unsafe {
                let s = (plugin.api.llm.last_error)();
                take_plugin_string(plugin.api.llm.free_string, s)
            };
            return Err(if msg.is_empty() {
                format!("failed to load model '{}'", model_path.as_ref().display())
            } else {
                msg
            });
        }

        let eos = unsafe { (plugin.api.llm.eos_token)(session) };
        let hint = unsafe { (plugin.api.llm.context_window_hint)(session) };

        Ok(Self {
            plugin,
            session,
            eos_token: Token(eos),
            n_ctx: (hint > 0).then_some(hint as usize),
        })
    }

    fn tokenize(&self, text: &str, add_bos: bool) -> Result<Vec<Token>, String> {
        let ctext = make_cstring(text)?;
        let arr =
            unsafe { (self.plugin.api.llm.tokenize_utf8)(self.session, ctext.as_ptr(), add_bos) };

        if arr.ptr.is_null() || arr.len == 0 {
            let msg = unsafe {
                let s = (self.plugin.api.llm.last_error)();
                take_plugin_string(self.plugin.api.llm.free_string, s)
            };
            return if msg.is_empty() {
                Ok(Vec::new())
            } else {
                Err(msg)
            };
        }

        let out = unsafe { slice::from_raw_parts(arr.ptr, arr.len) }
            .iter()
            .copied()
            .map(Token)
            .collect();
        unsafe { (self.plugin.api.llm.free_ints)(arr) };
        Ok(out)
    }

    fn evaluate(&mut self, tokens: &[Token], n_past: i32) -> Result<(), String> {
        let tmp: Vec<i32> = tokens.iter().map(|t| t.0).collect();
        let rc = unsafe {
            (self.plugin.api.llm.evaluate)(self.session, tmp.as_ptr(), tmp.len(), n_past)
        };
        if rc == ERR_OK {
            Ok(())
        } else {
            Err(self.last_error("evaluate failed"))
        }
    }

    fn sample(
        &mut self,
        _n_past: i32,
        params: &SamplingParams,
        repetition_context: &[Token],
    ) -> Result<Token, String> {
        let js = serde_json::to_string(&params.normalized()).map_err(|e| e.to_string())?;
        let cjs = make_cstring(&js)?;
        let last: Vec<i32> = repetition_context.iter().map(|t| t.0).collect();
        let tok = unsafe {
            (self.plugin.api.llm.sample_json)(self.session, cjs.as_ptr(), last.as_ptr(), last.len())
        };
        if tok >= 0 {
            Ok(Token(tok))
        } else {
            Err(self.last_error("sample failed"))
        }
    }

    fn decode_token(&self, token: Token) -> Result<String, String> {
        let s = unsafe { (self.plugin.api.llm.decode_token)(self.session, token.0) };
        let out = unsafe { take_plugin_string(self.plugin.api.llm.free_string, s) };

        if out.is_empty() {
            // empty pieces are legal (specials); only an error message makes it a failure
            let msg = unsafe {
                let se = (self.plugin.api.llm.last_error)();
                take_plugin_string(self.plugin.api.llm.free_string, se)
            };
            if msg.is_empty() { Ok(out) } else { Err(msg) }
        } else {
            Ok(out)
        }
    }

    fn eos_token(&self) -> Token {
        self.eos_token
    }

    fn logits_mut(&mut self) -> Option<&mut [f32]> {
        let view = unsafe { (self.plugin.api.llm.logits)(self.session) };
        if view.ptr.is_null() || view.len == 0 {
            return None;
        }
        // SAFETY: plugin guarantees the buffer lives until the next evaluate call,
        // and `&mut self` keeps evaluate from running while the slice is borrowed.
        Some(unsafe { slice::from_raw_parts_mut(view.ptr, view.len) })
    }

    fn context_window_hint(&self) -> Option<usize> {
        self.n_ctx
    }

    fn system_info(&self) -> Option<String> {
        let info = unsafe {
            let s = (self.plugin.api.llm.system_info)();
            take_plugin_string(self.plugin.api.llm.free_string, s)
        };
        (!info.is_empty()).then_some(info)
    }
}
