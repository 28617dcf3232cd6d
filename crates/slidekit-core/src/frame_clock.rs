use crate::runtime::{RuntimeHandle, TaskHandle};

/// Paint-cycle view of the runtime used by animation drivers.
#[derive(Clone)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    pub fn with_frame_nanos(&self, callback: impl FnOnce(u64) + 'static) -> TaskHandle {
        self.runtime.register_frame_callback(callback)
    }

    pub fn with_frame_millis(&self, callback: impl FnOnce(u64) + 'static) -> TaskHandle {
        self.with_frame_nanos(move |nanos| {
            let millis = nanos / 1_000_000;
            callback(millis);
        })
    }
}
