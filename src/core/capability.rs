//! Accelerated-rendering capability probe
//!
//! The probe never fails outward: errors and panics inside it are folded
//! into [`Capability::ProbeFailed`], which callers treat as unavailable.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{info, warn};

/// Outcome of a one-time capability probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capability {
    Supported,
    Unsupported,
    ProbeFailed(String),
}

impl Capability {
    /// Run a fallible probe. `Ok(true)` means supported.
    ///
    /// On wasm32 panics abort, so probes there must report failures as `Err`.
    pub fn probe<F, E>(probe: F) -> Self
    where
        F: FnOnce() -> Result<bool, E>,
        E: fmt::Display,
    {
        match panic::catch_unwind(AssertUnwindSafe(probe)) {
            Ok(Ok(true)) => Capability::Supported,
            Ok(Ok(false)) => Capability::Unsupported,
            Ok(Err(e)) => Capability::ProbeFailed(e.to_string()),
            Err(payload) => Capability::ProbeFailed(panic_message(payload.as_ref())),
        }
    }

    /// Collapse to the boolean the animator mounts with.
    pub fn is_available(&self) -> bool {
        match self {
            Capability::Supported => true,
            Capability::Unsupported => {
                info!("Accelerated rendering unavailable, using static background");
                false
            }
            Capability::ProbeFailed(reason) => {
                warn!(reason = %reason, "Capability probe failed, using static background");
                false
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "probe panicked".to_string()
    }
}

/// Probe for WebGL by asking a detached canvas for a context.
#[cfg(target_arch = "wasm32")]
pub fn probe_webgl() -> Capability {
    use wasm_bindgen::JsCast;

    fn js_err(e: wasm_bindgen::JsValue) -> String {
        e.as_string().unwrap_or_else(|| format!("{e:?}"))
    }

    Capability::probe(|| -> Result<bool, String> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| "no document".to_string())?;
        let canvas = document
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| "not a canvas element".to_string())?;

        if canvas.get_context("webgl").map_err(js_err)?.is_some() {
            return Ok(true);
        }
        Ok(canvas.get_context("webgl2").map_err(js_err)?.is_some())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_outcomes() {
        assert_eq!(Capability::probe(|| Ok::<_, String>(true)), Capability::Supported);
        assert_eq!(Capability::probe(|| Ok::<_, String>(false)), Capability::Unsupported);
        assert_eq!(
            Capability::probe(|| Err::<bool, _>("context lost")),
            Capability::ProbeFailed("context lost".into())
        );
    }

    #[test]
    fn test_probe_panic_is_contained() {
        let capability = Capability::probe(|| -> Result<bool, String> {
            panic!("getContext threw");
        });
        assert_eq!(capability, Capability::ProbeFailed("getContext threw".into()));
        assert!(!capability.is_available());
    }

    #[test]
    fn test_only_supported_is_available() {
        assert!(Capability::Supported.is_available());
        assert!(!Capability::Unsupported.is_available());
        assert!(!Capability::ProbeFailed("x".into()).is_available());
    }
}
