//! Call dispatcher
//!
//! Owns every per-instance resource and drives one host call through its
//! lifecycle. The dispatcher is an ordinary value: the wasm entry point
//! keeps exactly one in a static, tests build as many as they like.
//!
//! ## State
//!
//! ```text
//! Uninitialized ──(first call: grow memory, carve regions)──► Ready
//! ```
//!
//! There is no way back; once Ready, every call reuses the same regions.

use shim_arena::Arena;
use shim_blob::{Blob, ByteSink, OutputBuffer, ReadCursor};
use shim_envelope::MIN_ENVELOPE_LEN;

use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::host::Host;

/// Program logic run once per call.
pub trait Program {
    /// Called once, right after the regions are carved and before the
    /// first `call`. Typically preloads the `data` blob.
    fn on_init(&mut self, _data: &mut Blob<'static>, _save: &mut Blob<'static>) -> Result<(), RuntimeError> {
        Ok(())
    }

    /// Handle one call. Whatever was written to `ctx.output()` becomes the
    /// reply.
    fn call(&mut self, ctx: &mut CallContext<'_>) -> Result<(), RuntimeError>;
}

impl<F> Program for F
where
    F: FnMut(&mut CallContext<'_>) -> Result<(), RuntimeError>,
{
    fn call(&mut self, ctx: &mut CallContext<'_>) -> Result<(), RuntimeError> {
        self(ctx)
    }
}

/// Observable lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatcherState {
    Uninitialized,
    Ready,
}

/// Regions carved on the first call.
struct Resources {
    arena: Arena<'static>,
    data: Blob<'static>,
    save: Blob<'static>,
    staging: &'static mut [u8],
    output: OutputBuffer<'static>,
}

impl Resources {
    fn carve(heap: &'static mut [u8], config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        let mut arena = Arena::new(heap);
        let data = Blob::new(arena.allocate(config.data_blob_len)?);
        let save = Blob::new(arena.allocate(config.save_blob_len)?);
        let staging = arena.allocate(config.input_capacity)?;
        let output = OutputBuffer::new(arena.allocate(config.output_capacity)?)?;

        Ok(Self {
            arena,
            data,
            save,
            staging,
            output,
        })
    }
}

/// Drives host calls against one set of instance resources.
pub struct Dispatcher<H: Host> {
    host: H,
    config: RuntimeConfig,
    /// `None` until the first call has carved the regions
    resources: Option<Resources>,
}

impl<H: Host> Dispatcher<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, RuntimeConfig::DEFAULT)
    }

    pub fn with_config(host: H, config: RuntimeConfig) -> Self {
        Self {
            host,
            config,
            resources: None,
        }
    }

    pub fn state(&self) -> DispatcherState {
        match self.resources {
            Some(_) => DispatcherState::Ready,
            None => DispatcherState::Uninitialized,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The `data` blob, once Ready.
    pub fn data(&self) -> Option<&Blob<'static>> {
        self.resources.as_ref().map(|r| &r.data)
    }

    /// The `save` blob, once Ready.
    pub fn save(&self) -> Option<&Blob<'static>> {
        self.resources.as_ref().map(|r| &r.save)
    }

    /// Handle one call; any error is logged and the call traps.
    pub fn run<P: Program + ?Sized>(&mut self, program: &mut P) {
        if let Err(err) = self.dispatch(program) {
            crate::shim_debug!(self.host, "fatal: {}", err);
            self.host.trap();
        }
    }

    /// Handle one call, returning the error instead of trapping.
    ///
    /// No reply is sent unless this returns `Ok`.
    pub fn dispatch<P: Program + ?Sized>(&mut self, program: &mut P) -> Result<(), RuntimeError> {
        let Self {
            host,
            config,
            resources,
        } = self;

        let res = Self::ensure_ready(resources, host, config, program)?;

        let size = host.incoming_size();
        if size > res.staging.len() {
            return Err(RuntimeError::IncomingTooLarge {
                size,
                capacity: res.staging.len(),
            });
        }
        host.copy_incoming(&mut res.staging[..size], 0)?;
        let incoming: &[u8] = &res.staging[..size];

        let request = if size < MIN_ENVELOPE_LEN {
            crate::shim_debug!(*host, "degenerate call: {} byte argument, empty request", size);
            ReadCursor::empty()
        } else {
            ReadCursor::new(shim_envelope::decode(incoming)?)
        };

        res.output.reset();

        let mut ctx = CallContext {
            request,
            output: &mut res.output,
            data: &mut res.data,
            save: &mut res.save,
            arena: &mut res.arena,
            host: &mut *host,
        };
        program.call(&mut ctx)?;

        let reply = res.output.finish()?;
        host.append_reply(reply);
        host.finish_reply();
        Ok(())
    }

    fn ensure_ready<'r, P: Program + ?Sized>(
        resources: &'r mut Option<Resources>,
        host: &mut H,
        config: &RuntimeConfig,
        program: &mut P,
    ) -> Result<&'r mut Resources, RuntimeError> {
        let ready = match resources.take() {
            Some(ready) => ready,
            None => {
                let heap = host.grow_linear_memory(config.operating_pages)?;
                let heap_len = heap.len();
                let mut carved = Resources::carve(heap, config)?;
                program.on_init(&mut carved.data, &mut carved.save)?;
                crate::shim_debug!(
                    *host,
                    "initialized: heap {} bytes, data {}, save {}, staging {}, scratch {}",
                    heap_len,
                    carved.data.len(),
                    carved.save.len(),
                    carved.staging.len(),
                    config.output_capacity
                );
                carved
            }
        };
        Ok(resources.insert(ready))
    }
}

impl<H: Host + core::fmt::Debug> core::fmt::Debug for Dispatcher<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("host", &self.host)
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

/// Everything program logic can reach during one call.
pub struct CallContext<'c> {
    request: ReadCursor<'c>,
    output: &'c mut OutputBuffer<'static>,
    data: &'c mut Blob<'static>,
    save: &'c mut Blob<'static>,
    arena: &'c mut Arena<'static>,
    host: &'c mut dyn Host,
}

impl<'c> CallContext<'c> {
    /// The decoded request payload as a read stream (stdin).
    pub fn request(&mut self) -> &mut ReadCursor<'c> {
        &mut self.request
    }

    /// The whole request payload, independent of the stream position.
    pub fn read_argument(&self) -> &'c [u8] {
        self.request.as_bytes()
    }

    /// Copy the rest of the request into `line` and NUL-terminate (`gets`).
    pub fn gets(&mut self, line: &mut [u8]) -> Result<usize, RuntimeError> {
        Ok(self.request.gets(line)?)
    }

    /// The reply payload under construction (stdout).
    pub fn output(&mut self) -> &mut OutputBuffer<'static> {
        &mut *self.output
    }

    /// Append raw bytes to the reply.
    pub fn write_output(&mut self, bytes: &[u8]) -> Result<(), RuntimeError> {
        Ok(self.output.write_exact(bytes)?)
    }

    /// Write one byte to the reply (`putchar`).
    pub fn put_char(&mut self, byte: u8) -> Result<(), RuntimeError> {
        Ok(self.output.put_char(byte)?)
    }

    /// Write a line plus newline to the reply (`puts`).
    pub fn put_line(&mut self, line: &[u8]) -> Result<(), RuntimeError> {
        Ok(self.output.put_line(line)?)
    }

    /// The `data` blob, rewound (`fopen` of the data file).
    pub fn open_data(&mut self) -> &mut Blob<'static> {
        self.data.open()
    }

    /// The `save` blob, rewound (`fopen` of the save file).
    pub fn open_save(&mut self) -> &mut Blob<'static> {
        self.save.open()
    }

    /// The `data` blob at its current position.
    pub fn data(&mut self) -> &mut Blob<'static> {
        &mut *self.data
    }

    /// The `save` blob at its current position.
    pub fn save(&mut self) -> &mut Blob<'static> {
        &mut *self.save
    }

    /// Read-only stream over text compiled into the module.
    pub fn open_text(text: &'static [u8]) -> ReadCursor<'static> {
        ReadCursor::new(text)
    }

    /// `n` bytes from the instance arena (`malloc`). Never freed.
    pub fn alloc(&mut self, n: usize) -> Result<&'static mut [u8], RuntimeError> {
        Ok(self.arena.allocate(n)?)
    }

    /// `count * size` zeroed bytes from the instance arena (`calloc`).
    pub fn alloc_zeroed(&mut self, count: usize, size: usize) -> Result<&'static mut [u8], RuntimeError> {
        Ok(self.arena.allocate_zeroed(count, size)?)
    }

    /// Bytes left in the instance arena.
    pub fn arena_remaining(&self) -> usize {
        self.arena.remaining()
    }

    /// Send a diagnostic through the host debug channel.
    pub fn debug(&mut self, args: core::fmt::Arguments<'_>) {
        crate::shim_debug!(*self.host, "{}", args);
    }

    /// Stop the program (`exit`). Logs the code and traps, so the call
    /// ends without a reply and nothing after this runs.
    pub fn exit(&mut self, code: i32) -> ! {
        crate::shim_debug!(*self.host, "exit({})", code);
        self.host.trap()
    }
}
