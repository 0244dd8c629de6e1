//! Panic capturing for hooks, bodies and matchers.
//!
//! Panics are how a hook or body raises an unhandled error. The engine catches
//! them with [`catch_panic`] and turns them into test errors, so the default
//! panic hook printing to stderr would only be noise.
//!
//! [`install_panic_capture`] installs a hook that, on threads currently inside
//! [`catch_panic`], records the panic location instead of printing. Every other
//! thread is forwarded to the previously installed hook.

use std::{
    any::Any,
    cell::RefCell,
    fmt::Display,
    panic::{self, AssertUnwindSafe, PanicHookInfo},
    sync::{Arc, Once},
};

type PanicHook = Arc<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

#[derive(Debug, Default)]
struct PanicCapture {
    depth: usize,
    location: Option<String>,
}

thread_local! {
    static PANIC_CAPTURE: RefCell<PanicCapture> = RefCell::new(PanicCapture::default());
}

static INSTALL: Once = Once::new();

/// Install the capturing panic hook for this process.
///
/// The hook is installed once and stays installed. Calling this again is a no-op.
pub fn install_panic_capture() {
    INSTALL.call_once(|| {
        let old_hook: PanicHook = Arc::from(panic::take_hook());

        panic::set_hook(Box::new(move |panic_hook_info| {
            let captured = PANIC_CAPTURE.with_borrow_mut(|capture| {
                if capture.depth == 0 {
                    return false;
                }
                capture.location = panic_hook_info
                    .location()
                    .map(|location| location.to_string());
                true
            });

            if !captured {
                old_hook(panic_hook_info);
            }
        }));
    });
}

/// A panic caught while running user code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaughtPanic {
    pub message: String,
    pub location: Option<String>,
}

impl Display for CaughtPanic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} (at {location})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Convert a panic payload into a string.
///
/// This matches the common payload types produced by `panic!` (`&'static str` and `String`).
/// Other payload types are formatted as a generic placeholder.
pub fn payload_as_string(err: Box<dyn Any + Send + 'static>) -> String {
    err.downcast::<&'static str>()
        .map(|s| s.to_string())
        .or_else(|err| err.downcast::<String>().map(|s| *s))
        .unwrap_or_else(|_| String::from("Box<dyn Any>"))
}

/// Run `f`, turning a panic into a [`CaughtPanic`].
pub fn catch_panic<R>(f: impl FnOnce() -> R) -> Result<R, CaughtPanic> {
    PANIC_CAPTURE.with_borrow_mut(|capture| {
        capture.depth += 1;
        capture.location = None;
    });

    let result = panic::catch_unwind(AssertUnwindSafe(f));

    let location = PANIC_CAPTURE.with_borrow_mut(|capture| {
        capture.depth -= 1;
        capture.location.take()
    });

    result.map_err(|payload| CaughtPanic {
        message: payload_as_string(payload),
        location,
    })
}
